use bitflags::bitflags;

use super::gfx::{Bitmap, GfxSet, Rect};
use super::tile_decode::LayerKind;
use super::tilemap::{Tilemap, TilemapGeometry};
use crate::debug_flags;

bitflags! {
    /// Seibu CRTC layer register. A set bit switches that layer OFF.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerDisable: u8 {
        const BACKGROUND = 0b00000001;
        const FOREGROUND = 0b00000010;
        // Extra CRTC layer, not tied to any RAM on this board
        const EXTRA = 0b00000100;
        const TEXT = 0b00001000;
        const SPRITES = 0b00010000;
    }
}

impl LayerDisable {
    pub fn draws(self, layer: LayerDisable) -> bool {
        !self.contains(layer)
    }
}

/// Merge `data` into `slot` under a 16-bit write-enable mask
#[inline]
pub fn combine_data(slot: &mut u16, data: u16, mask: u16) {
    *slot = (*slot & !mask) | (data & mask);
}

pub const SCROLL_BG_X: usize = 0;
pub const SCROLL_BG_Y: usize = 1;
pub const SCROLL_FG_X: usize = 2;
pub const SCROLL_FG_Y: usize = 3;

/// Raw scroll RAM as written by the CRTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollRegisters {
    pub regs: [u16; 4],
}

impl ScrollRegisters {
    pub fn write(&mut self, index: usize, data: u16, mask: u16) {
        combine_data(&mut self.regs[index], data, mask);
        if debug_flags::scroll() {
            log::trace!("scroll[{}] <= {:04X} (mask {:04X})", index, self.regs[index], mask);
        }
    }

    pub fn get(&self, index: usize) -> u16 {
        self.regs[index]
    }

    /// Low byte of a register as a signed value, as the bootleg CRTC reads it
    pub fn signed_low(&self, index: usize) -> i32 {
        self.regs[index] as u8 as i8 as i32
    }
}

pub const BG_GEOMETRY: TilemapGeometry = TilemapGeometry {
    tile_width: 16,
    tile_height: 16,
    cols: 32,
    rows: 16,
};

pub const TX_GEOMETRY: TilemapGeometry = TilemapGeometry {
    tile_width: 8,
    tile_height: 8,
    cols: 32,
    rows: 32,
};

/// One tile RAM plus the tilemap that caches its decode
#[derive(Debug, Clone)]
pub struct TileLayer {
    kind: LayerKind,
    ram: Vec<u16>,
    tilemap: Tilemap,
}

impl TileLayer {
    pub fn new(kind: LayerKind) -> Self {
        let geometry = match kind {
            LayerKind::Background | LayerKind::Foreground => BG_GEOMETRY,
            LayerKind::Text => TX_GEOMETRY,
        };
        let mut tilemap = Tilemap::new(geometry);
        if kind != LayerKind::Background {
            tilemap.set_transparent_pen(15);
        }
        Self {
            kind,
            ram: vec![0; geometry.cells()],
            tilemap,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn ram(&self) -> &[u16] {
        &self.ram
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn tilemap_mut(&mut self) -> &mut Tilemap {
        &mut self.tilemap
    }

    /// Bus write into tile RAM. `offset` is a cell index and must be in range.
    pub fn write(&mut self, offset: usize, data: u16, mask: u16) {
        combine_data(&mut self.ram[offset], data, mask);
        self.tilemap.mark_tile_dirty(offset);
        if debug_flags::vram_write() {
            log::trace!("{:?} ram[{:03X}] <= {:04X}", self.kind, offset, self.ram[offset]);
        }
    }

    /// Decode dirty cells, then draw with the given priority value.
    pub fn draw(
        &mut self,
        gfx: &GfxSet,
        dest: &mut Bitmap<u16>,
        priority: &mut Bitmap<u8>,
        clip: &Rect,
        priority_value: u8,
    ) {
        let kind = self.kind;
        let ram = &self.ram;
        let decoded = self.tilemap.refresh(|index| kind.decode(ram[index]));
        if decoded > 0 && debug_flags::render_verbose() {
            log::debug!("{:?}: decoded {} dirty cells", kind, decoded);
        }
        self.tilemap.draw(gfx, dest, priority, clip, priority_value);
    }
}
