//! Sprite output units for the current scanline.
//!
//! The PPU has eight sprite slots. Each slot carries the two pattern
//! bitplanes fetched during dots 257..=320 of the previous scanline, the
//! latched attributes, and an X counter that delays output until the beam
//! reaches the sprite. Slots shift once per dot after the delay expires; the
//! first opaque pixel across slots wins.

use super::sprite::SpriteAttributes;
use crate::mem_block::ppu::SpriteLineRam;

/// A single sprite slot for the current scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SpriteSlot {
    /// Pattern bitplane 0 (shifted left once per dot after X expires).
    pattern_low: u8,
    /// Pattern bitplane 1.
    pattern_high: u8,
    /// Latched attributes (palette select, priority, flips).
    attributes: SpriteAttributes,
    /// X counter delaying sprite visibility.
    x_counter: u8,
    /// Marks the slot holding OAM sprite 0.
    sprite0: bool,
}

impl Default for SpriteSlot {
    fn default() -> Self {
        Self {
            pattern_low: 0,
            pattern_high: 0,
            attributes: SpriteAttributes::empty(),
            x_counter: 0,
            sprite0: false,
        }
    }
}

/// Sprite pixel information produced by the pipeline for a single dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub(crate) struct SpritePixel {
    /// Sprite palette select (0..=3).
    pub(crate) palette: u8,
    /// Color index within the palette (0 means transparent).
    pub(crate) color: u8,
    /// Whether the sprite is drawn behind opaque background.
    pub(crate) behind_background: bool,
    /// Whether this pixel came from sprite 0.
    pub(crate) sprite0: bool,
}

/// Buffered sprite bytes fetched for the upcoming scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct SpriteLineBuffers {
    pub(crate) y: SpriteLineRam,
    pub(crate) tile: SpriteLineRam,
    pub(crate) attr: SpriteLineRam,
    pub(crate) x: SpriteLineRam,
    pub(crate) pattern_low: SpriteLineRam,
    pub(crate) pattern_high: SpriteLineRam,
}

impl SpriteLineBuffers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn set_meta(&mut self, slot: usize, y: u8, tile: u8, attr: u8, x: u8) {
        if slot < 8 {
            self.y[slot] = y;
            self.tile[slot] = tile;
            self.attr[slot] = attr;
            self.x[slot] = x;
        }
    }

    pub(crate) fn set_pattern_low(&mut self, slot: usize, value: u8) {
        if slot < 8 {
            self.pattern_low[slot] = value;
        }
    }

    pub(crate) fn set_pattern_high(&mut self, slot: usize, value: u8) {
        if slot < 8 {
            self.pattern_high[slot] = value;
        }
    }
}

/// Sprite pixel pipeline for the current scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SpritePipeline {
    slots: [SpriteSlot; 8],
    active: u8,
}

impl Default for SpritePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SpritePipeline {
    pub(crate) fn new() -> Self {
        Self {
            slots: [SpriteSlot::default(); 8],
            active: 0,
        }
    }

    /// Clears all active sprite shifters.
    pub(crate) fn clear(&mut self) {
        self.slots = [SpriteSlot::default(); 8];
        self.active = 0;
    }

    /// Loads the slots from the evaluation/fetch output for a new scanline.
    ///
    /// Pattern bytes are bit-reversed up front when horizontal flip is set,
    /// so shifting left always walks pixels left-to-right on output.
    pub(crate) fn load_scanline(&mut self, count: u8, sprite0_in_range: bool, line: &SpriteLineBuffers) {
        self.clear();
        self.active = count.min(8);

        for slot in 0..self.active as usize {
            let mut low = line.pattern_low[slot];
            let mut high = line.pattern_high[slot];
            let attributes = SpriteAttributes::from_bits_retain(line.attr[slot]);

            if attributes.contains(SpriteAttributes::FLIP_HORIZONTAL) {
                low = low.reverse_bits();
                high = high.reverse_bits();
            }

            self.slots[slot] = SpriteSlot {
                pattern_low: low,
                pattern_high: high,
                attributes,
                x_counter: line.x[slot],
                sprite0: sprite0_in_range && slot == 0,
            };
        }
    }

    /// Samples the current sprite pixel and advances active shifters.
    pub(crate) fn sample_and_shift(&mut self) -> SpritePixel {
        let mut chosen: Option<SpritePixel> = None;

        for slot in self.slots.iter_mut().take(self.active as usize) {
            // The X counter delays output; the shifter starts producing on
            // the dot after it reaches zero.
            if slot.x_counter > 0 {
                slot.x_counter -= 1;
                continue;
            }

            let bit0 = (slot.pattern_low >> 7) & 1;
            let bit1 = (slot.pattern_high >> 7) & 1;
            let color = (bit1 << 1) | bit0;

            if chosen.is_none() && color != 0 {
                chosen = Some(SpritePixel {
                    palette: slot.attributes.palette(),
                    color,
                    behind_background: slot
                        .attributes
                        .contains(SpriteAttributes::PRIORITY_BEHIND_BACKGROUND),
                    sprite0: slot.sprite0,
                });
            }

            slot.pattern_low <<= 1;
            slot.pattern_high <<= 1;
        }

        chosen.unwrap_or_default()
    }
}
