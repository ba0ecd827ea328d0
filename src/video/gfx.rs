/// Inclusive clip rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Rect {
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}

/// Row-major pixel canvas. `Bitmap<u16>` holds pen numbers for the screen,
/// `Bitmap<u8>` is the priority buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap<T> {
    width: usize,
    height: usize,
    pixels: Vec<T>,
}

impl<T: Copy + Default> Bitmap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![T::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, self.width as i32 - 1, 0, self.height as i32 - 1)
    }

    pub fn pix(&self, x: usize, y: usize) -> T {
        self.pixels[y * self.width + x]
    }

    pub fn pix_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.pixels[y * self.width + x]
    }

    pub fn fill(&mut self, value: T, clip: &Rect) {
        let clip = clip.intersect(&self.bounds());
        if clip.is_empty() {
            return;
        }
        for y in clip.min_y..=clip.max_y {
            let row = y as usize * self.width;
            self.pixels[row + clip.min_x as usize..=row + clip.max_x as usize].fill(value);
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.pixels
    }
}

/// A bank of already-decoded tiles, one byte (pen) per pixel.
///
/// Colors resolve to `color_base + color * 16 + pen`. Codes past the end of
/// the bank wrap around, like the real hardware reading whatever sits at
/// that ROM address.
#[derive(Debug, Clone)]
pub struct GfxElement {
    width: usize,
    height: usize,
    color_base: u16,
    total: usize,
    pixels: Vec<u8>,
}

pub const COLOR_GRANULARITY: u16 = 16;

impl GfxElement {
    pub fn new(width: usize, height: usize, color_base: u16, pixels: Vec<u8>) -> Self {
        let total = (pixels.len() / (width * height)).max(1);
        let mut pixels = pixels;
        // An empty bank still yields one blank tile so lookups never fail
        pixels.resize(total * width * height, 0);
        Self { width, height, color_base, total, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn elements(&self) -> usize {
        self.total
    }

    pub fn color_base(&self) -> u16 {
        self.color_base
    }

    /// Pen at (x, y) inside tile `code`, no flipping applied.
    pub fn pixel(&self, code: u32, x: usize, y: usize) -> u8 {
        let tile = code as usize % self.total;
        self.pixels[(tile * self.height + y) * self.width + x]
    }

    pub fn pen(&self, color: u32, pen: u8) -> u16 {
        self.color_base
            .wrapping_add((color as u16).wrapping_mul(COLOR_GRANULARITY))
            .wrapping_add(pen as u16)
    }

    /// Draw one tile with a transparent pen, gated by the priority buffer.
    ///
    /// A pixel lands on `dest` only when bit `prio & 0x1f` of `pmask` is
    /// clear. Every opaque pixel marks the priority buffer with 31,
    /// visible or not, so later sprites stay behind earlier ones.
    #[allow(clippy::too_many_arguments)]
    pub fn prio_transpen(
        &self,
        dest: &mut Bitmap<u16>,
        clip: &Rect,
        code: u32,
        color: u32,
        flip_x: bool,
        flip_y: bool,
        sx: i32,
        sy: i32,
        priority: &mut Bitmap<u8>,
        pmask: u32,
        trans_pen: u8,
    ) {
        let clip = clip.intersect(&dest.bounds()).intersect(&priority.bounds());
        for ty in 0..self.height {
            let dy = sy + ty as i32;
            if dy < clip.min_y || dy > clip.max_y {
                continue;
            }
            let src_y = if flip_y { self.height - 1 - ty } else { ty };
            for tx in 0..self.width {
                let dx = sx + tx as i32;
                if dx < clip.min_x || dx > clip.max_x {
                    continue;
                }
                let src_x = if flip_x { self.width - 1 - tx } else { tx };
                let pen = self.pixel(code, src_x, src_y);
                if pen == trans_pen {
                    continue;
                }
                let (x, y) = (dx as usize, dy as usize);
                let pri = priority.pix_mut(x, y);
                if (1u32 << (*pri & 0x1f)) & pmask == 0 {
                    *dest.pix_mut(x, y) = self.pen(color, pen);
                }
                *pri = 31;
            }
        }
    }
}

/// Graphics slots as wired on the board: text, background, foreground, sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GfxSlot {
    Text = 0,
    Background = 1,
    Foreground = 2,
    Sprites = 3,
}

#[derive(Debug, Clone)]
pub struct GfxSet {
    elements: [GfxElement; 4],
}

impl GfxSet {
    pub fn new(text: GfxElement, background: GfxElement, foreground: GfxElement, sprites: GfxElement) -> Self {
        Self {
            elements: [text, background, foreground, sprites],
        }
    }

    /// Empty banks with the board's tile sizes and palette bases.
    pub fn blank() -> Self {
        Self::new(
            GfxElement::new(8, 8, 0x700, Vec::new()),
            GfxElement::new(16, 16, 0x400, Vec::new()),
            GfxElement::new(16, 16, 0x500, Vec::new()),
            GfxElement::new(16, 16, 0x000, Vec::new()),
        )
    }

    pub fn get(&self, slot: GfxSlot) -> &GfxElement {
        &self.elements[slot as usize]
    }

    pub fn by_index(&self, index: u8) -> &GfxElement {
        &self.elements[index as usize & 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_tile(size: usize, pen: u8) -> GfxElement {
        GfxElement::new(size, size, 0, vec![pen; size * size])
    }

    #[test]
    fn test_fill_respects_clip() {
        let mut bmp: Bitmap<u8> = Bitmap::new(8, 8);
        bmp.fill(7, &Rect::new(2, 3, 4, 4));
        assert_eq!(bmp.pix(2, 4), 7);
        assert_eq!(bmp.pix(3, 4), 7);
        assert_eq!(bmp.pix(4, 4), 0);
        assert_eq!(bmp.pix(2, 3), 0);
    }

    #[test]
    fn test_codes_wrap_around_bank() {
        let mut pixels = vec![1u8; 4];
        pixels.extend_from_slice(&[2u8; 4]);
        let gfx = GfxElement::new(2, 2, 0, pixels);
        assert_eq!(gfx.elements(), 2);
        assert_eq!(gfx.pixel(0, 0, 0), 1);
        assert_eq!(gfx.pixel(3, 0, 0), 2);
    }

    #[test]
    fn test_prio_transpen_masks_against_priority_one() {
        let gfx = solid_tile(2, 5);
        let mut dest: Bitmap<u16> = Bitmap::new(4, 4);
        let mut prio: Bitmap<u8> = Bitmap::new(4, 4);
        *prio.pix_mut(0, 0) = 1;
        let clip = dest.bounds();

        gfx.prio_transpen(&mut dest, &clip, 0, 1, false, false, 0, 0, &mut prio, 0x02, 15);

        // pixel over priority 1 is hidden, the rest draws
        assert_eq!(dest.pix(0, 0), 0);
        assert_eq!(dest.pix(1, 0), 16 + 5);
        // every opaque pixel claims the priority buffer
        assert_eq!(prio.pix(0, 0), 31);
        assert_eq!(prio.pix(1, 1), 31);
        assert_eq!(prio.pix(2, 2), 0);
    }

    #[test]
    fn test_prio_transpen_skips_transparent_pen_and_clips() {
        let gfx = GfxElement::new(2, 1, 0, vec![15, 3]);
        let mut dest: Bitmap<u16> = Bitmap::new(4, 4);
        let mut prio: Bitmap<u8> = Bitmap::new(4, 4);
        let clip = Rect::new(0, 3, 0, 3);

        gfx.prio_transpen(&mut dest, &clip, 0, 0, false, false, 3, 0, &mut prio, 0, 15);
        assert_eq!(dest.pix(3, 0), 0);
        assert_eq!(prio.pix(3, 0), 0);

        // flipped, the opaque pen lands on the column still inside the clip
        gfx.prio_transpen(&mut dest, &clip, 0, 0, true, false, 3, 0, &mut prio, 0, 15);
        assert_eq!(dest.pix(3, 0), 3);
        assert_eq!(prio.pix(3, 0), 31);

        gfx.prio_transpen(&mut dest, &clip, 0, 0, true, false, 0, 0, &mut prio, 0, 15);
        assert_eq!(dest.pix(0, 0), 3);
        assert_eq!(dest.pix(1, 0), 0);
    }
}
