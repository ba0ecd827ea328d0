use bitflags::bitflags;

use super::gfx::GfxSlot;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        const FLIP_X = 0b00000001;
        const FLIP_Y = 0b00000010;
    }
}

/// Which of the three tile RAMs a word came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Background,
    Foreground,
    Text,
}

/// Foreground tiles live in the upper half of the shared tile ROM
pub const FG_TILE_OFFSET: u32 = 0x1000;

/// Decoded attributes for one tilemap cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileInfo {
    pub gfx: u8,
    pub code: u32,
    pub color: u32,
    pub flags: TileFlags,
}

impl LayerKind {
    pub fn gfx_slot(self) -> GfxSlot {
        match self {
            LayerKind::Background => GfxSlot::Background,
            LayerKind::Foreground => GfxSlot::Foreground,
            LayerKind::Text => GfxSlot::Text,
        }
    }

    /// Layout of a tile RAM word: `CCCC TTTT TTTT TTTT`. None of the layers
    /// carry flip bits.
    pub fn decode(self, value: u16) -> TileInfo {
        let base = (value & 0x0FFF) as u32;
        let code = match self {
            LayerKind::Foreground => base + FG_TILE_OFFSET,
            LayerKind::Background | LayerKind::Text => base,
        };
        TileInfo {
            gfx: self.gfx_slot() as u8,
            code,
            color: (value >> 12) as u32,
            flags: TileFlags::empty(),
        }
    }
}
