#![allow(dead_code)]

use dotclock_core::{Mirroring, PatternBus, Ppu};

pub const CTRL: u16 = 0x2000;
pub const MASK: u16 = 0x2001;
pub const STATUS: u16 = 0x2002;
pub const OAM_ADDR: u16 = 0x2003;
pub const OAM_DATA: u16 = 0x2004;
pub const SCROLL: u16 = 0x2005;
pub const ADDR: u16 = 0x2006;
pub const DATA: u16 = 0x2007;

pub const SHOW_BACKGROUND: u8 = 0x08;
pub const SHOW_SPRITES: u8 = 0x10;
pub const SHOW_BACKGROUND_LEFT: u8 = 0x02;
pub const SHOW_SPRITES_LEFT: u8 = 0x04;

pub const VBLANK_BIT: u8 = 0x80;
pub const SPRITE0_BIT: u8 = 0x40;
pub const OVERFLOW_BIT: u8 = 0x20;

pub fn new_ppu() -> Ppu {
    Ppu::new(Mirroring::Horizontal)
}

pub fn write(ppu: &mut Ppu, addr: u16, value: u8) {
    let mut pattern = PatternBus::none();
    ppu.cpu_write(addr, value, &mut pattern);
}

pub fn read(ppu: &mut Ppu, addr: u16) -> u8 {
    let mut pattern = PatternBus::none();
    ppu.cpu_read(addr, &mut pattern)
}

/// Clocks the PPU until it sits at the given position (about to run it).
pub fn run_to(ppu: &mut Ppu, scanline: u16, dot: u16) {
    let mut pattern = PatternBus::none();
    while !(ppu.scanline() == scanline && ppu.dot() == dot) {
        ppu.clock(&mut pattern);
    }
}

/// Clocks the PPU `dots` times.
pub fn step(ppu: &mut Ppu, dots: u32) {
    let mut pattern = PatternBus::none();
    ppu.tick(&mut pattern, dots);
}

/// Points `v` at `addr` through the `$2006` pair (clears `w` first).
pub fn set_vram_addr(ppu: &mut Ppu, addr: u16) {
    let _ = read(ppu, STATUS);
    write(ppu, ADDR, (addr >> 8) as u8);
    write(ppu, ADDR, addr as u8);
}

/// Stores one byte at `addr` through the data port.
pub fn store_vram(ppu: &mut Ppu, addr: u16, value: u8) {
    set_vram_addr(ppu, addr);
    write(ppu, DATA, value);
}

/// Reads one byte at `addr` through the data port (handles the buffer).
pub fn fetch_vram(ppu: &mut Ppu, addr: u16) -> u8 {
    set_vram_addr(ppu, addr);
    if addr >= 0x3F00 {
        read(ppu, DATA)
    } else {
        let _ = read(ppu, DATA);
        read(ppu, DATA)
    }
}

/// Writes one OAM entry through the `$2003`/`$2004` pair.
pub fn store_sprite(ppu: &mut Ppu, index: u8, y: u8, tile: u8, attr: u8, x: u8) {
    write(ppu, OAM_ADDR, index * 4);
    for byte in [y, tile, attr, x] {
        write(ppu, OAM_DATA, byte);
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().try_init();
}
