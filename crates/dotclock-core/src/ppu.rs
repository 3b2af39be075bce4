//! Cycle-level RP2C02 picture-processing-unit core.
//!
//! **Quick primer**
//! - The PPU draws 262 scanlines per frame, 341 dots each. Scanlines
//!   `0..=239` are visible, `240` is post-render, `241..=260` are vblank,
//!   and `261` is the prerender line.
//! - The CPU sees eight registers at `$2000-$2007` (mirrored up to `$3FFF`).
//!   Most PPU state lives in tiny internal latches and shift registers;
//!   mirroring that behavior is what makes some code look odd.
//! - Background tiles and sprites are handled by separate pipelines. The
//!   background side runs interleaved nametable/attribute/pattern fetches in
//!   8-dot slots; the sprite side evaluates primary OAM into secondary OAM
//!   during dots 1..=256 and fetches the selected patterns during 257..=320.
//! - Several features depend on *which* dot or scanline you are on (the
//!   odd-frame skipped dot, scroll copies, the vblank edge). Those checks
//!   are explicit in [`Ppu::clock`].
//!
//! The external scheduler drives the core one dot at a time through
//! [`Ppu::clock`], or hands it a dot budget through [`Ppu::tick`]. Register
//! accesses happen between dots; the NMI callback runs synchronously inside
//! the dot that raises vblank.

mod background_pipeline;
mod frame;
mod oam;
mod registers;
mod sprite;
mod sprite_pipeline;

pub use frame::{FrameHandler, SCREEN_HEIGHT, SCREEN_WIDTH};

use core::fmt;

use tracing::{debug, trace};

use crate::{
    bus::{MappedMemory, Mirroring, PatternBus},
    memory::{self as ppu_mem, Register},
    ppu::{
        background_pipeline::BgPipeline,
        frame::FrameBuffer,
        oam::Oam,
        registers::{Mask, Registers, Status},
        sprite_pipeline::{SpriteLineBuffers, SpritePipeline, SpritePixel},
    },
    reset_kind::ResetKind,
};

const DOTS_PER_SCANLINE: u16 = 341;
const SCANLINES_PER_FRAME: u16 = 262;
const POST_RENDER_SCANLINE: u16 = 240;
const VBLANK_SCANLINE: u16 = 241;
const PRE_RENDER_SCANLINE: u16 = 261;
/// Scanline the device wakes up on; the first vblank follows immediately.
const POWERUP_SCANLINE: u16 = 241;

/// Interrupt line callback; invoked with `true` when the vblank NMI fires.
pub type InterruptHandler = Box<dyn FnMut(bool)>;

/// Minimal PPU position/register snapshot for tests and trace alignment.
#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugState {
    pub scanline: u16,
    pub dot: u16,
    pub frame: u64,
    pub v: u16,
    pub t: u16,
    pub fine_x: u8,
    pub w: bool,
    pub status: u8,
    pub oam_addr: u8,
}

/// The RP2C02 core: register file, OAM machinery, memory bus and the
/// per-dot rendering pipeline.
pub struct Ppu {
    /// CPU-visible registers and their helper latches.
    registers: Registers,
    /// 14-bit PPU address space (nametables, palette, pattern fallback).
    memory: MappedMemory,
    /// Primary/secondary OAM and the evaluation state machine.
    oam: Oam,
    /// Background fetch/shift pipeline.
    bg: BgPipeline,
    /// Sprite output units for the current scanline.
    sprites: SpritePipeline,
    /// Sprite bytes fetched during dots 257..=320 for the next scanline.
    sprite_line: SpriteLineBuffers,
    /// Indexed-color frame output.
    frame_buffer: FrameBuffer,
    /// Current dot (0..=340) within the active scanline.
    dot: u16,
    /// Current scanline (0..=261; 261 is the prerender line).
    scanline: u16,
    /// Total number of frames completed so far.
    frame: u64,
    /// Whether rendering was enabled at any point during this frame.
    rendered_this_frame: bool,
    /// Last value on the register data bus (open-bus reads).
    bus_latch: u8,
    interrupt: Option<InterruptHandler>,
}

impl fmt::Debug for Ppu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ppu")
            .field("registers", &self.registers)
            .field("scanline", &self.scanline)
            .field("dot", &self.dot)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl Ppu {
    /// Creates a powered-on PPU with the given nametable arrangement.
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            registers: Registers::new(),
            memory: MappedMemory::new(mirroring),
            oam: Oam::new(),
            bg: BgPipeline::new(),
            sprites: SpritePipeline::new(),
            sprite_line: SpriteLineBuffers::new(),
            frame_buffer: FrameBuffer::new(),
            dot: 0,
            scanline: POWERUP_SCANLINE,
            frame: 0,
            rendered_this_frame: false,
            bus_latch: 0,
            interrupt: None,
        }
    }

    /// Registers the NMI callback, replacing any previous one.
    pub fn set_interrupt_handler(&mut self, handler: InterruptHandler) {
        self.interrupt = Some(handler);
    }

    /// Registers the end-of-frame callback receiving the presented plane.
    pub fn set_frame_handler(&mut self, handler: FrameHandler) {
        self.frame_buffer.set_handler(handler);
    }

    /// Restores the device to its reset state.
    ///
    /// Registers, latches and pipelines are cleared either way; primary OAM
    /// and VRAM survive a [`ResetKind::Soft`] reset, matching hardware.
    pub fn reset(&mut self, kind: ResetKind) {
        self.registers.reset();
        self.oam.reset(kind);
        if kind == ResetKind::PowerOn {
            self.memory.clear();
            self.frame_buffer.clear();
        }
        self.bg.clear();
        self.sprites.clear();
        self.sprite_line.clear();
        self.dot = 0;
        self.scanline = POWERUP_SCANLINE;
        self.frame = 0;
        self.rendered_this_frame = false;
        self.bus_latch = 0;
    }

    /// Current scanline (0..=261).
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// Current dot within the scanline (0..=340).
    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Frames completed since power-on.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// The frame plane currently being written (one palette index per
    /// pixel). Completed frames are delivered through the frame handler.
    pub fn framebuffer(&self) -> &[u8] {
        self.frame_buffer.back()
    }

    /// The most recently presented frame plane.
    pub fn last_frame(&self) -> &[u8] {
        self.frame_buffer.front()
    }

    /// Number of frames presented to the output so far.
    pub fn frames_presented(&self) -> u64 {
        self.frame_buffer.frame_seq()
    }

    /// Seeds the pattern window `$0000-$1FFF` from CHR data.
    ///
    /// Pattern accesses still prefer the mapper via [`PatternBus`]; this
    /// helper serves setups that poke pattern RAM directly.
    pub fn load_pattern_data(&mut self, chr: &[u8]) {
        for (addr, byte) in chr.iter().take(ppu_mem::PATTERN_TABLE_END as usize).enumerate() {
            self.memory.store(addr as u16, *byte);
        }
    }

    /// Position/register snapshot for tests and trace alignment.
    #[doc(hidden)]
    pub fn debug_state(&self) -> DebugState {
        DebugState {
            scanline: self.scanline,
            dot: self.dot,
            frame: self.frame,
            v: self.registers.vram.v.raw(),
            t: self.registers.vram.t.raw(),
            fine_x: self.registers.vram.x,
            w: self.registers.vram.w,
            status: self.registers.status.bits(),
            oam_addr: self.registers.oam_addr,
        }
    }

    /// Overrides the position counters. Intended for tests only.
    #[doc(hidden)]
    pub fn debug_set_position(&mut self, scanline: u16, dot: u16, frame: u64) {
        self.scanline = scanline;
        self.dot = dot;
        self.frame = frame;
    }

    /// Secondary OAM contents. Intended for tests only.
    #[doc(hidden)]
    pub fn debug_secondary_oam(&self) -> &[u8] {
        self.oam.secondary()
    }

    // ------------------------------------------------------------------
    // CPU register ports
    // ------------------------------------------------------------------

    /// Handles CPU writes to the mirrored register space (`$2000-$3FFF`).
    pub fn cpu_write(&mut self, addr: u16, value: u8, pattern: &mut PatternBus<'_>) {
        self.bus_latch = value;
        match Register::from_cpu_addr(addr) {
            Register::Control => {
                let was_enabled = self.registers.control.nmi_enabled();
                self.registers.write_control(value);
                if was_enabled != self.registers.control.nmi_enabled() {
                    debug!(
                        value,
                        nmi = self.registers.control.nmi_enabled(),
                        scanline = u64::from(self.scanline),
                        dot = u64::from(self.dot),
                        "control write flips NMI enable"
                    );
                }
            }
            Register::Mask => self.registers.mask = Mask::from_bits_retain(value),
            Register::Status => {} // read-only
            Register::OamAddr => self.registers.oam_addr = value,
            Register::OamData => self.write_oam_data(value),
            Register::Scroll => self.registers.vram.write_scroll(value),
            Register::Addr => {
                if let Some(addr) = self.registers.vram.write_addr(value) {
                    self.registers.vram.v = addr;
                }
            }
            Register::Data => self.write_vram_data(value, pattern),
        }
    }

    /// Handles CPU reads from the mirrored register space (`$2000-$3FFF`).
    ///
    /// Store-only ports return the last value seen on the data bus.
    pub fn cpu_read(&mut self, addr: u16, pattern: &mut PatternBus<'_>) -> u8 {
        let value = match Register::from_cpu_addr(addr) {
            Register::Status => self.read_status(),
            Register::OamData => self.oam.fetch(self.registers.oam_addr),
            Register::Data => self.read_vram_data(pattern),
            _ => self.bus_latch,
        };
        self.bus_latch = value;
        value
    }

    fn read_status(&mut self) -> u8 {
        // The low five bits are not driven; they decay from the bus latch.
        let value = self.registers.status.bits() | (self.bus_latch & 0x1F);
        self.registers.status.remove(Status::VERTICAL_BLANK);
        self.registers.vram.reset_latch();
        value
    }

    fn write_oam_data(&mut self, value: u8) {
        // Ignored while rendering, except on the idle post-render line.
        if !self.registers.mask.rendering_enabled() || self.scanline == POST_RENDER_SCANLINE {
            self.oam.store(self.registers.oam_addr, value);
            self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
        }
    }

    fn write_vram_data(&mut self, value: u8, pattern: &mut PatternBus<'_>) {
        let addr = self.registers.vram.v.raw() & ppu_mem::VRAM_MIRROR_MASK;
        self.write_vram(pattern, addr, value);
        self.increment_vram_addr();
    }

    fn read_vram_data(&mut self, pattern: &mut PatternBus<'_>) -> u8 {
        let addr = self.registers.vram.v.raw() & ppu_mem::VRAM_MIRROR_MASK;
        let data = self.read_vram(pattern, addr);
        let buffered = core::mem::replace(&mut self.registers.vram_buffer, data);
        self.increment_vram_addr();

        // Palette reads skip the delay buffer; the buffer still refills from
        // the address underneath the palette.
        if addr >= ppu_mem::PALETTE_BASE {
            data
        } else {
            buffered
        }
    }

    /// `$2007` address stepping.
    ///
    /// While rendering on a visible or prerender scanline, the shared
    /// increment hardware glitches: +32 performs the fine-Y increment and +1
    /// a plain 15-bit increment. Outside rendering it is a simple add.
    fn increment_vram_addr(&mut self) {
        let rendering_scanline =
            self.scanline <= 239 || self.scanline == PRE_RENDER_SCANLINE;
        if self.registers.mask.rendering_enabled() && rendering_scanline {
            if self.registers.control.vram_increment() == 32 {
                self.increment_scroll_y();
            } else {
                self.registers.vram.v.increment(1);
            }
        } else {
            let step = self.registers.control.vram_increment();
            self.registers.vram.v.increment(step);
        }
    }

    // ------------------------------------------------------------------
    // PPU-side memory access
    // ------------------------------------------------------------------

    fn read_vram(&mut self, pattern: &mut PatternBus<'_>, addr: u16) -> u8 {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        if addr < ppu_mem::PATTERN_TABLE_END {
            if let Some(value) = pattern.read(addr) {
                return value;
            }
        }
        self.memory.fetch(addr)
    }

    fn write_vram(&mut self, pattern: &mut PatternBus<'_>, addr: u16, value: u8) {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        if addr < ppu_mem::PATTERN_TABLE_END && pattern.write(addr, value) {
            return;
        }
        self.memory.store(addr, value);
    }

    // ------------------------------------------------------------------
    // Timing
    // ------------------------------------------------------------------

    /// Advances the PPU by exactly `dots` dots.
    pub fn tick(&mut self, pattern: &mut PatternBus<'_>, dots: u32) {
        for _ in 0..dots {
            self.clock(pattern);
        }
    }

    /// Advances the PPU by a single dot.
    pub fn clock(&mut self, pattern: &mut PatternBus<'_>) {
        let rendering = self.registers.mask.rendering_enabled();
        if rendering {
            self.rendered_this_frame = true;
        }

        // Odd frames drop dot 0 of scanline 0 while rendering is enabled,
        // so those frames are one dot short.
        if self.scanline == 0 && self.dot == 0 && rendering && self.frame & 1 == 1 {
            self.dot = 1;
        }

        match self.scanline {
            0..=239 | PRE_RENDER_SCANLINE => self.render_scanline_dot(pattern, rendering),
            POST_RENDER_SCANLINE => {}
            VBLANK_SCANLINE..=260 => {
                if self.scanline == VBLANK_SCANLINE && self.dot == 1 {
                    self.enter_vblank();
                }
            }
            _ => unreachable!("PPU scanline {} out of range", self.scanline),
        }

        self.advance_dot();
    }

    /// One dot of a visible or prerender scanline.
    fn render_scanline_dot(&mut self, pattern: &mut PatternBus<'_>, rendering: bool) {
        if self.scanline == PRE_RENDER_SCANLINE && self.dot == 1 {
            self.registers.status.remove(
                Status::VERTICAL_BLANK | Status::SPRITE_ZERO_HIT | Status::SPRITE_OVERFLOW,
            );
        }

        // Load the sprite shifters evaluated and fetched on the previous
        // scanline. The prerender line evaluates nothing, so scanline 0
        // never shows sprites.
        if self.dot == 1 && (1..=239).contains(&self.scanline) {
            self.sprites.load_scanline(
                self.oam.sprite_count(),
                self.oam.sprite0_in_range(),
                &self.sprite_line,
            );
        }

        if rendering {
            match self.dot {
                1..=256 | 321..=336 => {
                    self.fetch_background_data(pattern);
                    if self.dot == 256 {
                        self.increment_scroll_y();
                    }
                }
                257 => {
                    self.bg.reload();
                    self.transfer_scroll_x();
                }
                280..=304 if self.scanline == PRE_RENDER_SCANLINE => {
                    self.transfer_scroll_y();
                }
                // Two dummy nametable fetches; some mappers count these.
                337 | 339 => {
                    let _ = self.fetch_name(pattern);
                }
                _ => {}
            }

            if (257..=320).contains(&self.dot) && self.scanline != PRE_RENDER_SCANLINE {
                self.fetch_sprite_data(pattern);
            }
        } else {
            // Keep pipelines idle so a mid-frame enable starts clean.
            self.bg.clear();
            self.sprites.clear();
            self.sprite_line.clear();
        }

        if (1..=256).contains(&self.dot) {
            self.render_pixel(pattern);

            if rendering {
                let height = self.registers.control.sprite_height();
                if self.oam.evaluate(self.scanline, self.dot, height) {
                    self.registers.status.insert(Status::SPRITE_OVERFLOW);
                }
            }
        }

        if (2..=257).contains(&self.dot) || (322..=337).contains(&self.dot) {
            self.bg.shift();
        }
    }

    fn enter_vblank(&mut self) {
        self.registers.status.insert(Status::VERTICAL_BLANK);
        trace!(frame = self.frame, "vblank start");
        if self.registers.control.nmi_enabled() {
            if let Some(interrupt) = self.interrupt.as_mut() {
                interrupt(true);
            }
        }
    }

    /// Advances to the next dot / scanline / frame.
    fn advance_dot(&mut self) {
        self.dot += 1;
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;

            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame = self.frame.wrapping_add(1);
                self.finish_frame();
            }
        }
    }

    /// Frame boundary: present the finished plane if anything rendered.
    fn finish_frame(&mut self) {
        if self.rendered_this_frame {
            self.frame_buffer.present();
        }
        self.rendered_this_frame = false;
    }

    // ------------------------------------------------------------------
    // Background fetch pipeline
    // ------------------------------------------------------------------

    /// Runs the interleaved name/attribute/pattern fetch slot for this dot.
    fn fetch_background_data(&mut self, pattern: &mut PatternBus<'_>) {
        match self.dot % 8 {
            1 => {
                self.bg.reload();
                let name = self.fetch_name(pattern);
                let base = self.registers.control.background_pattern_table();
                let fine_y = self.registers.vram.v.fine_y();
                self.bg.begin_tile(base, name, fine_y);
            }
            3 => {
                let attr = self.fetch_attribute(pattern);
                let v = self.registers.vram.v.raw();
                // Which 2-bit quadrant of the attribute byte applies is
                // selected by coarse X bit 1 and coarse Y bit 1.
                let quadrant = ((v & 0x0002) | ((v >> 4) & 0x0004)) as u8;
                self.bg.set_attribute(attr >> quadrant);
            }
            5 => {
                let low = self.read_vram(pattern, self.bg.pattern_addr());
                self.bg.load_low(low);
            }
            7 => {
                let high = self.read_vram(pattern, self.bg.pattern_addr() | 0x0008);
                self.bg.load_high(high);
            }
            0 => {
                if self.dot >= 8 {
                    self.increment_scroll_x();
                }
            }
            _ => {}
        }
    }

    /// Nametable fetch at `$2000 | (v & $0FFF)`.
    fn fetch_name(&mut self, pattern: &mut PatternBus<'_>) -> u8 {
        let addr = ppu_mem::NAMETABLE_BASE | (self.registers.vram.v.raw() & 0x0FFF);
        self.read_vram(pattern, addr)
    }

    /// Attribute fetch at `$23C0 | NN | (coarse_y / 4) * 8 | coarse_x / 4`.
    fn fetch_attribute(&mut self, pattern: &mut PatternBus<'_>) -> u8 {
        let v = self.registers.vram.v.raw();
        let addr =
            ppu_mem::ATTRIBUTE_BASE | (v & 0x0C00) | ((v >> 4) & 0x0038) | ((v >> 2) & 0x0007);
        self.read_vram(pattern, addr)
    }

    // ------------------------------------------------------------------
    // Sprite fetch (dots 257..=320)
    // ------------------------------------------------------------------

    /// Fetches sprite metadata and pattern rows for the next scanline.
    ///
    /// Each of the eight secondary-OAM slots owns an 8-dot window; the
    /// metadata latches at the start and the two bitplanes load at sub-dots
    /// 4 and 6.
    fn fetch_sprite_data(&mut self, pattern: &mut PatternBus<'_>) {
        if self.dot == 257 {
            self.sprite_line.clear();
        }

        let offset = self.dot - 257;
        let slot = (offset / 8) as usize;
        let sub = offset % 8;

        let base = slot * 4;
        let y = self.oam.secondary()[base];
        if y == 0xFF {
            // Cleared slot: fewer than `slot + 1` sprites this scanline.
            return;
        }
        let tile = self.oam.secondary()[base + 1];
        let attr = self.oam.secondary()[base + 2];
        let x = self.oam.secondary()[base + 3];

        if sub == 0 {
            self.sprite_line.set_meta(slot, y, tile, attr, x);
        }

        if sub != 4 && sub != 6 {
            return;
        }

        // Row of the sprite crossing the next scanline. Evaluation matched
        // `scanline - y < height`; the mask also covers a mid-scanline
        // sprite-size change between evaluation and fetch.
        let height = self.registers.control.sprite_height();
        let mut row = self.scanline.wrapping_sub(u16::from(y)) & (height - 1);
        if attr & sprite::SpriteAttributes::FLIP_VERTICAL.bits() != 0 {
            row = height - 1 - row;
        }

        let (table, tile_index) = if height == 16 {
            // Tile bit 0 selects the table; the row selects top or bottom.
            let table = if tile & 0x01 != 0 {
                ppu_mem::PATTERN_TABLE_1
            } else {
                ppu_mem::PATTERN_TABLE_0
            };
            let top = tile & 0xFE;
            let index = if row < 8 { top } else { top.wrapping_add(1) };
            (table, index)
        } else {
            (self.registers.control.sprite_pattern_table(), tile)
        };

        let addr = table + u16::from(tile_index) * 16 + (row & 0x7);
        if sub == 4 {
            let low = self.read_vram(pattern, addr);
            self.sprite_line.set_pattern_low(slot, low);
        } else {
            let high = self.read_vram(pattern, addr + 8);
            self.sprite_line.set_pattern_high(slot, high);
        }
    }

    // ------------------------------------------------------------------
    // Pixel composition
    // ------------------------------------------------------------------

    /// Composes and emits the pixel for dots 1..=256.
    fn render_pixel(&mut self, pattern: &mut PatternBus<'_>) {
        let mask = self.registers.mask;
        let x = u16::from(self.dot - 1);

        let (mut bg_palette, mut bg_color) = self.bg.sample(self.registers.vram.x);
        let bg_visible = mask.contains(Mask::SHOW_BACKGROUND)
            && (x >= 8 || mask.contains(Mask::SHOW_BACKGROUND_LEFT));
        if !bg_visible {
            bg_palette = 0;
            bg_color = 0;
        }

        let mut sprite = if self.scanline <= 239 && mask.rendering_enabled() {
            self.sprites.sample_and_shift()
        } else {
            SpritePixel::default()
        };
        let sprite_visible =
            mask.contains(Mask::SHOW_SPRITES) && (x >= 8 || mask.contains(Mask::SHOW_SPRITES_LEFT));
        if !sprite_visible {
            sprite.color = 0;
        }

        let bg_opaque = bg_color != 0;
        let sprite_opaque = sprite.color != 0;

        // Priority: an opaque sprite wins unless it is marked behind an
        // opaque background pixel.
        let (from_sprite, palette, color) = match (bg_opaque, sprite_opaque) {
            (false, false) => (false, 0, 0),
            (false, true) => (true, sprite.palette, sprite.color),
            (true, false) => (false, bg_palette, bg_color),
            (true, true) => {
                if sprite.behind_background {
                    (false, bg_palette, bg_color)
                } else {
                    (true, sprite.palette, sprite.color)
                }
            }
        };

        // Sprite 0 hit: both layers opaque and unmasked, away from the
        // right edge. A sprite at X=255 starts at dot 256 and can never
        // qualify.
        if bg_opaque && sprite_opaque && sprite.sprite0 && (2..=255).contains(&self.dot) {
            if !self.registers.status.contains(Status::SPRITE_ZERO_HIT) {
                trace!(
                    scanline = u64::from(self.scanline),
                    dot = u64::from(self.dot),
                    "sprite 0 hit"
                );
            }
            self.registers.status.insert(Status::SPRITE_ZERO_HIT);
        }

        let palette_addr = if color == 0 {
            ppu_mem::PALETTE_BASE
        } else if from_sprite {
            ppu_mem::PALETTE_BASE + 0x10 + u16::from(palette) * 4 + u16::from(color)
        } else {
            ppu_mem::PALETTE_BASE + u16::from(palette) * 4 + u16::from(color)
        };
        let mut color_index = self.read_vram(pattern, palette_addr) & 0x3F;
        if mask.contains(Mask::GRAYSCALE) {
            color_index &= 0x30;
        }

        if self.scanline <= 239 && mask.rendering_enabled() {
            self.frame_buffer
                .set_pixel(x as usize, self.scanline as usize, color_index);
        }
    }

    // ------------------------------------------------------------------
    // Loopy scroll helpers
    // ------------------------------------------------------------------

    /// Increments the coarse X component of `v`, wrapping horizontally.
    fn increment_scroll_x(&mut self) {
        let v = &mut self.registers.vram.v;
        let cx = v.coarse_x();
        if cx == 31 {
            v.set_coarse_x(0);
            let nt = v.nametable() ^ 0b01;
            v.set_nametable(nt);
        } else {
            v.set_coarse_x(cx + 1);
        }
    }

    /// Increments the vertical components of `v`, including fine Y.
    fn increment_scroll_y(&mut self) {
        let v = &mut self.registers.vram.v;
        let fine_y = v.fine_y();
        if fine_y < 7 {
            v.set_fine_y(fine_y + 1);
            return;
        }

        v.set_fine_y(0);
        let coarse_y = v.coarse_y();
        if coarse_y == 29 {
            v.set_coarse_y(0);
            let nt = v.nametable() ^ 0b10;
            v.set_nametable(nt);
        } else if coarse_y == 31 {
            // Coarse Y can be pointed into the attribute rows; it wraps
            // without switching nametables.
            v.set_coarse_y(0);
        } else {
            v.set_coarse_y(coarse_y + 1);
        }
    }

    /// Copies the horizontal scroll bits from `t` into `v` (dot 257).
    fn transfer_scroll_x(&mut self) {
        let t = self.registers.vram.t;
        let v = &mut self.registers.vram.v;
        v.set_coarse_x(t.coarse_x());
        let nt = (v.nametable() & 0b10) | (t.nametable() & 0b01);
        v.set_nametable(nt);
    }

    /// Copies the vertical scroll bits from `t` into `v` (prerender
    /// dots 280..=304).
    fn transfer_scroll_y(&mut self) {
        let t = self.registers.vram.t;
        let v = &mut self.registers.vram.v;
        v.set_coarse_y(t.coarse_y());
        v.set_fine_y(t.fine_y());
        let nt = (v.nametable() & 0b01) | (t.nametable() & 0b10);
        v.set_nametable(nt);
    }
}
