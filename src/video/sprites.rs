//! Blood Bros / Sky Smasher sprite chip.
//!
//! Slightly more sophisticated successor to the Toki sprite chip. Setting
//! width or height above zero builds a "big sprite" out of consecutive
//! tile numbers.
//!
//! ```text
//! +0   x....... ........  disabled
//! +0   .x...... ........  flip y (unverified)
//! +0   ..x..... ........  flip x
//! +0   ....x... ........  priority
//! +0   ......xx x.......  width - 1
//! +0   ........ .xxx....  height - 1
//! +0   ........ ....xxxx  color bank
//! +1   ...xxxxx xxxxxxxx  tile number
//! +2   .......x xxxxxxxx  x
//! +3   .......x xxxxxxxx  y
//! ```

use super::gfx::{Bitmap, GfxElement, Rect};
use crate::debug_flags;

pub const SPRITE_WORDS: usize = 4;
pub const SPRITE_TRANSPARENT_PEN: u8 = 15;

/// Maps (priority bit, extra bits) of a record to a `prio_transpen` mask
pub type PriorityCallback = fn(u8, u8) -> u32;

/// Priority policy wired on the base board: prioritized sprites hide
/// behind foreground pixels.
pub fn bloodbro_pri_cb(pri: u8, _ext: u8) -> u32 {
    if pri != 0 {
        0x02
    } else {
        0
    }
}

/// Sign-correct a 9-bit screen coordinate
#[inline]
pub fn sign_extend_9(value: u16) -> i32 {
    let v = (value & 0x1FF) as i32;
    if v >= 256 {
        v - 512
    } else {
        v
    }
}

/// Draws the contents of sprite RAM onto a frame
pub trait SpriteGenerator {
    fn draw_sprites(
        &mut self,
        gfx: &GfxElement,
        dest: &mut Bitmap<u16>,
        priority: &mut Bitmap<u8>,
        clip: &Rect,
        spriteram: &[u16],
    );
}

/// One decoded base-hardware sprite record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseSprite {
    pub disabled: bool,
    // No evidence this bit is wired; kept decoded as documented
    pub flip_y: bool,
    pub flip_x: bool,
    pub priority: bool,
    pub width: u8,
    pub height: u8,
    pub color: u32,
    pub code: u32,
    pub x: i32,
    pub y: i32,
}

impl BaseSprite {
    pub fn decode(words: &[u16]) -> Self {
        let attr = words[0];
        Self {
            disabled: attr & 0x8000 != 0,
            flip_y: attr & 0x4000 != 0,
            flip_x: attr & 0x2000 != 0,
            priority: attr & 0x0800 != 0,
            width: ((attr >> 7) & 0x7) as u8,
            height: ((attr >> 4) & 0x7) as u8,
            color: (attr & 0xF) as u32,
            code: (words[1] & 0x1FFF) as u32,
            x: sign_extend_9(words[2]),
            y: sign_extend_9(words[3]),
        }
    }

    /// Tiles consumed by this sprite
    pub fn tile_count(&self) -> u32 {
        (self.width as u32 + 1) * (self.height as u32 + 1)
    }

    /// Screen position of each tile in draw order, with its code.
    /// Codes advance down each column, then across.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, i32, i32)> + '_ {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..=w).flat_map(move |tx| (0..=h).map(move |ty| (tx, ty))).enumerate().map(
            move |(n, (tx, ty))| {
                let sx = if self.flip_x { self.x + 16 * (w - tx) } else { self.x + 16 * tx };
                let sy = if self.flip_y { self.y + 16 * (h - ty) } else { self.y + 16 * ty };
                (self.code.wrapping_add(n as u32), sx, sy)
            },
        )
    }
}

/// Default sprite chip for the base hardware
#[derive(Debug, Clone)]
pub struct SeibuSpriteGen {
    pri_cb: PriorityCallback,
}

impl SeibuSpriteGen {
    pub fn new(pri_cb: PriorityCallback) -> Self {
        Self { pri_cb }
    }
}

impl Default for SeibuSpriteGen {
    fn default() -> Self {
        Self::new(bloodbro_pri_cb)
    }
}

impl SpriteGenerator for SeibuSpriteGen {
    fn draw_sprites(
        &mut self,
        gfx: &GfxElement,
        dest: &mut Bitmap<u16>,
        priority: &mut Bitmap<u8>,
        clip: &Rect,
        spriteram: &[u16],
    ) {
        // Highest slot first so low slots end up on top
        for (slot, words) in spriteram.chunks_exact(SPRITE_WORDS).enumerate().rev() {
            let sprite = BaseSprite::decode(words);
            if sprite.disabled {
                continue;
            }
            if debug_flags::sprites() {
                log::trace!("sprite {:3}: {:?}", slot, sprite);
            }
            let pmask = (self.pri_cb)(sprite.priority as u8, 0);
            for (code, sx, sy) in sprite.tiles() {
                gfx.prio_transpen(
                    dest,
                    clip,
                    code,
                    sprite.color,
                    sprite.flip_x,
                    sprite.flip_y,
                    sx,
                    sy,
                    priority,
                    pmask,
                    SPRITE_TRANSPARENT_PEN,
                );
            }
        }
    }
}
