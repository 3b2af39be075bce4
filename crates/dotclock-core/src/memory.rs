//! Shared definitions for the PPU memory map.
//!
//! Centralizing address-related constants keeps the hardware layout in one
//! location and makes it easier to reference the console documentation while
//! reading the rest of the code base.

/// First CPU-visible PPU register address.
pub const REGISTER_BASE: u16 = 0x2000;
/// Last CPU-visible address at which the registers repeat (`$3FFF`).
pub const REGISTER_MIRROR_END: u16 = 0x3FFF;
/// Mask for decoding register mirrors (`addr & 0x0007`).
pub const REGISTER_SELECT_MASK: u16 = 0x0007;

/// Total VRAM space the PPU maps through `$2007` (16 KiB, mirrored above).
pub const VRAM_SIZE: usize = 0x4000;
/// Address mask applied before each VRAM access.
pub const VRAM_MIRROR_MASK: u16 = 0x3FFF;

/// Pattern table base address for table 0.
pub const PATTERN_TABLE_0: u16 = 0x0000;
/// Pattern table base address for table 1.
pub const PATTERN_TABLE_1: u16 = 0x1000;
/// First address past the cartridge pattern window.
pub const PATTERN_TABLE_END: u16 = 0x2000;

/// Base address of nametable 0.
pub const NAMETABLE_BASE: u16 = 0x2000;
/// Size of a single nametable in bytes.
pub const NAMETABLE_SIZE: u16 = 0x0400;
/// Offset of the attribute table within a nametable.
pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;
/// Base of the attribute table of nametable 0 (`$23C0`).
pub const ATTRIBUTE_BASE: u16 = NAMETABLE_BASE + ATTRIBUTE_OFFSET;

/// Palette RAM base address (`$3F00`).
pub const PALETTE_BASE: u16 = 0x3F00;
/// Palette mirroring period (32 bytes).
pub const PALETTE_STRIDE: u16 = 0x20;

/// Primary OAM byte count (64 sprites of 4 bytes).
pub const OAM_RAM_SIZE: usize = 256;
/// Secondary OAM byte count (8 sprites of 4 bytes).
pub const SECONDARY_OAM_RAM_SIZE: usize = 32;

/// CPU-visible PPU register identifiers.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// `$2000` - PPUCTRL
    Control = 0x2000,
    /// `$2001` - PPUMASK
    Mask = 0x2001,
    /// `$2002` - PPUSTATUS
    Status = 0x2002,
    /// `$2003` - OAMADDR
    OamAddr = 0x2003,
    /// `$2004` - OAMDATA
    OamData = 0x2004,
    /// `$2005` - PPUSCROLL
    Scroll = 0x2005,
    /// `$2006` - PPUADDR
    Addr = 0x2006,
    /// `$2007` - PPUDATA
    Data = 0x2007,
}

impl Register {
    /// All eight ports in address order.
    pub const ALL: [Register; 8] = [
        Register::Control,
        Register::Mask,
        Register::Status,
        Register::OamAddr,
        Register::OamData,
        Register::Scroll,
        Register::Addr,
        Register::Data,
    ];

    /// Raw address backing the register.
    pub const fn addr(self) -> u16 {
        self as u16
    }

    /// Resolves the canonical register for a CPU address in `$2000-$3FFF`.
    pub const fn from_cpu_addr(addr: u16) -> Self {
        match addr & REGISTER_SELECT_MASK {
            0 => Self::Control,
            1 => Self::Mask,
            2 => Self::Status,
            3 => Self::OamAddr,
            4 => Self::OamData,
            5 => Self::Scroll,
            6 => Self::Addr,
            7 => Self::Data,
            _ => unreachable!(),
        }
    }

    /// Whether the CPU can fetch a meaningful value from this port.
    pub const fn readable(self) -> bool {
        matches!(self, Register::Status | Register::OamData | Register::Data)
    }

    /// Whether the CPU can store through this port.
    pub const fn writable(self) -> bool {
        !matches!(self, Register::Status)
    }
}
