//! West Story bootleg sprite RAM.
//!
//! Lacks the big-sprite feature of the original chip, and the tile ROM
//! swaps two code ranges.
//!
//! ```text
//! +0   x....... ........  disabled
//! +0   ........ xxxxxxxx  y (stored as 0xf0 - y)
//! +1   ...xxxxx xxxxxxxx  tile number
//! +2   xxxx.... ........  color bank
//! +2   ......x. ........  flip x
//! +2   ........ x.......  priority (unverified)
//! +3   .......x xxxxxxxx  x
//! ```

use super::gfx::{Bitmap, GfxElement, Rect};
use super::sprites::{sign_extend_9, SPRITE_TRANSPARENT_PEN, SPRITE_WORDS};
use crate::debug_flags;

const Y_BASELINE: i32 = 0xF0;

/// Swap bits 11 and 12 of a 13-bit tile code
#[inline]
pub fn remap_tile_code(raw: u32) -> u32 {
    (raw & 0x7FF) | ((raw & 0x800) << 1) | ((raw & 0x1000) >> 1)
}

/// One decoded bootleg sprite record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootlegSprite {
    pub disabled: bool,
    pub code: u32,
    pub color: u32,
    pub flip_x: bool,
    pub priority_mask: u32,
    pub x: i32,
    pub y: i32,
}

impl BootlegSprite {
    pub fn decode(words: &[u16]) -> Self {
        let data0 = words[0];
        let data = words[2];
        Self {
            disabled: data0 & 0x8000 != 0,
            code: remap_tile_code((words[1] & 0x1FFF) as u32),
            color: ((data & 0xF000) >> 12) as u32,
            flip_x: data & 0x0200 != 0,
            priority_mask: if data & 0x0080 != 0 { 0x02 } else { 0 },
            x: sign_extend_9(words[3]),
            y: Y_BASELINE - (data0 & 0xFF) as i32,
        }
    }
}

/// Draw every enabled bootleg sprite, highest slot first.
pub fn draw_bootleg_sprites(
    gfx: &GfxElement,
    dest: &mut Bitmap<u16>,
    priority: &mut Bitmap<u8>,
    clip: &Rect,
    spriteram: &[u16],
) -> usize {
    let mut drawn = 0;
    for (slot, words) in spriteram.chunks_exact(SPRITE_WORDS).enumerate().rev() {
        let sprite = BootlegSprite::decode(words);
        if sprite.disabled {
            continue;
        }
        if debug_flags::sprites() {
            log::trace!("bootleg sprite {:3}: {:?}", slot, sprite);
        }
        gfx.prio_transpen(
            dest,
            clip,
            sprite.code,
            sprite.color,
            sprite.flip_x,
            false,
            sprite.x,
            sprite.y,
            priority,
            sprite.priority_mask,
            SPRITE_TRANSPARENT_PEN,
        );
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_swaps_bits_11_and_12() {
        assert_eq!(remap_tile_code(0x0800), 0x1000);
        assert_eq!(remap_tile_code(0x1000), 0x0800);
        assert_eq!(remap_tile_code(0x1800), 0x1800);
        assert_eq!(remap_tile_code(0x07FF), 0x07FF);
    }

    #[test]
    fn test_remap_is_an_involution() {
        for raw in 0..0x2000u32 {
            assert_eq!(remap_tile_code(remap_tile_code(raw)), raw);
        }
    }

    #[test]
    fn test_x_sign_correction() {
        assert_eq!(BootlegSprite::decode(&[0, 0, 0, 300]).x, -212);
        assert_eq!(BootlegSprite::decode(&[0, 0, 0, 100]).x, 100);
        // bits above the 9-bit field are ignored
        assert_eq!(BootlegSprite::decode(&[0, 0, 0, 0xFE00 | 100]).x, 100);
    }

    #[test]
    fn test_y_baseline() {
        assert_eq!(BootlegSprite::decode(&[0x0010, 0, 0, 0]).y, 0xE0);
        assert_eq!(BootlegSprite::decode(&[0x00FF, 0, 0, 0]).y, -15);
    }

    #[test]
    fn test_word2_fields() {
        let s = BootlegSprite::decode(&[0, 0xE800, 0xA280, 0]);
        assert_eq!(s.code, 0x1000);
        assert_eq!(s.color, 0xA);
        assert!(s.flip_x);
        assert_eq!(s.priority_mask, 0x02);

        let s = BootlegSprite::decode(&[0, 0, 0x0400, 0]);
        assert!(!s.flip_x);
        assert_eq!(s.priority_mask, 0);
    }

    #[test]
    fn test_disabled_slot_is_skipped() {
        let gfx = GfxElement::new(16, 16, 0, vec![1u8; 256]);
        let mut dest: Bitmap<u16> = Bitmap::new(256, 256);
        let mut prio: Bitmap<u8> = Bitmap::new(256, 256);
        let clip = dest.bounds();
        // every other field says "draw at (10, 0xE0)"
        let ram = [0x8010, 0x0001, 0x3080, 10];

        let drawn = draw_bootleg_sprites(&gfx, &mut dest, &mut prio, &clip, &ram);
        assert_eq!(drawn, 0);
        assert!(dest.as_slice().iter().all(|&p| p == 0));
        assert!(prio.as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_lower_slots_draw_on_top() {
        let mut pixels = vec![1u8; 256];
        pixels.extend_from_slice(&[2u8; 256]);
        let gfx = GfxElement::new(16, 16, 0, pixels);
        let mut dest: Bitmap<u16> = Bitmap::new(256, 256);
        let mut prio: Bitmap<u8> = Bitmap::new(256, 256);
        let clip = dest.bounds();
        // both at (0, 0xE0); slot 0 uses code 1, slot 1 code 0
        let ram = [0x0010, 1, 0, 0, 0x0010, 0, 0, 0];

        assert_eq!(draw_bootleg_sprites(&gfx, &mut dest, &mut prio, &clip, &ram), 2);
        assert_eq!(dest.pix(0, 0xE0), 2);
    }
}
