use super::gfx::{Bitmap, GfxSet, Rect};
use super::tile_decode::{TileFlags, TileInfo};

/// Fixed cell geometry of a tilemap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilemapGeometry {
    pub tile_width: usize,
    pub tile_height: usize,
    pub cols: usize,
    pub rows: usize,
}

impl TilemapGeometry {
    pub const fn cells(&self) -> usize {
        self.cols * self.rows
    }

    pub const fn pixel_width(&self) -> usize {
        self.cols * self.tile_width
    }

    pub const fn pixel_height(&self) -> usize {
        self.rows * self.tile_height
    }
}

/// Scrollable grid of tiles with a per-cell decode cache.
///
/// Cells start dirty. `refresh` only runs the decoder on dirty cells, so a
/// frame with no RAM writes decodes nothing.
#[derive(Debug, Clone)]
pub struct Tilemap {
    geometry: TilemapGeometry,
    transparent_pen: Option<u8>,
    cache: Vec<TileInfo>,
    dirty: Vec<bool>,
    scroll_x: i32,
    scroll_y: i32,
    decodes: u64,
}

impl Tilemap {
    pub fn new(geometry: TilemapGeometry) -> Self {
        Self {
            geometry,
            transparent_pen: None,
            cache: vec![TileInfo::default(); geometry.cells()],
            dirty: vec![true; geometry.cells()],
            scroll_x: 0,
            scroll_y: 0,
            decodes: 0,
        }
    }

    pub fn geometry(&self) -> TilemapGeometry {
        self.geometry
    }

    pub fn set_transparent_pen(&mut self, pen: u8) {
        self.transparent_pen = Some(pen);
    }

    pub fn transparent_pen(&self) -> Option<u8> {
        self.transparent_pen
    }

    pub fn set_scrollx(&mut self, value: i32) {
        self.scroll_x = value;
    }

    pub fn set_scrolly(&mut self, value: i32) {
        self.scroll_y = value;
    }

    pub fn scroll(&self) -> (i32, i32) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn mark_tile_dirty(&mut self, index: usize) {
        self.dirty[index] = true;
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty[index]
    }

    /// Total decoder invocations since construction
    pub fn decode_count(&self) -> u64 {
        self.decodes
    }

    pub fn tile_info(&self, index: usize) -> TileInfo {
        self.cache[index]
    }

    /// Re-decode dirty cells. Returns how many cells were decoded.
    pub fn refresh(&mut self, mut get_info: impl FnMut(usize) -> TileInfo) -> usize {
        let mut decoded = 0;
        for (index, dirty) in self.dirty.iter_mut().enumerate() {
            if *dirty {
                self.cache[index] = get_info(index);
                *dirty = false;
                decoded += 1;
            }
        }
        self.decodes += decoded as u64;
        decoded
    }

    /// Draw the cached tiles over `clip`, wrapping the scrolled source.
    /// Each opaque pixel ORs `priority_value` into the priority buffer.
    pub fn draw(
        &self,
        gfx: &GfxSet,
        dest: &mut Bitmap<u16>,
        priority: &mut Bitmap<u8>,
        clip: &Rect,
        priority_value: u8,
    ) {
        let clip = clip.intersect(&dest.bounds()).intersect(&priority.bounds());
        if clip.is_empty() {
            return;
        }
        let g = self.geometry;
        let width = g.pixel_width() as i32;
        let height = g.pixel_height() as i32;

        for y in clip.min_y..=clip.max_y {
            let src_y = (y + self.scroll_y).rem_euclid(height) as usize;
            let row = src_y / g.tile_height;
            let fine_y = src_y % g.tile_height;
            for x in clip.min_x..=clip.max_x {
                let src_x = (x + self.scroll_x).rem_euclid(width) as usize;
                let info = &self.cache[row * g.cols + src_x / g.tile_width];
                let element = gfx.by_index(info.gfx);

                let mut px = src_x % g.tile_width;
                let mut py = fine_y;
                if info.flags.contains(TileFlags::FLIP_X) {
                    px = g.tile_width - 1 - px;
                }
                if info.flags.contains(TileFlags::FLIP_Y) {
                    py = g.tile_height - 1 - py;
                }

                let pen = element.pixel(info.code, px, py);
                if self.transparent_pen == Some(pen) {
                    continue;
                }
                let (ux, uy) = (x as usize, y as usize);
                *dest.pix_mut(ux, uy) = element.pen(info.color, pen);
                *priority.pix_mut(ux, uy) |= priority_value;
            }
        }
    }
}
