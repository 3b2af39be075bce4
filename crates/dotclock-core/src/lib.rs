//! Cycle-accurate RP2C02 (NES picture-processing unit) core.
//!
//! The crate models the chip the way the console uses it: an external
//! scheduler feeds dots through [`Ppu::clock`] or [`Ppu::tick`], the CPU
//! touches the eight mirrored register ports through [`Ppu::cpu_read`] /
//! [`Ppu::cpu_write`], the cartridge services pattern-table fetches through
//! a [`PatternBus`], and finished 256x240 palette-index frames come back
//! through a frame handler. The vertical-blank NMI is delivered through a
//! callback raised synchronously inside scanline 241, dot 1.
//!
//! There is no CPU, mapper, or output device in here; those are the
//! embedder's. The core itself is infallible: every address is mapped and
//! every port access is defined, so nothing in the public surface returns a
//! `Result`.

pub mod bus;
pub mod mem_block;
pub mod memory;
pub mod ppu;
pub mod reset_kind;

pub use bus::{MappedMemory, Mapper, Mirroring, PatternBus};
pub use ppu::{DebugState, FrameHandler, InterruptHandler, Ppu, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use reset_kind::ResetKind;
