// Blood Bros / West Story video hardware
pub mod bootleg_sprites;
pub mod gfx;
pub mod layer;
pub mod sprites;
pub mod tile_decode;
pub mod tilemap;

use bootleg_sprites::draw_bootleg_sprites;
use gfx::{Bitmap, GfxSet, GfxSlot, Rect};
use layer::{LayerDisable, ScrollRegisters, TileLayer};
use sprites::{SeibuSpriteGen, SpriteGenerator};
use tile_decode::LayerKind;

use crate::debug_flags;
use crate::save_state::VideoSaveState;


pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 256;
pub const VISIBLE_AREA: Rect = Rect::new(0, 255, 16, 239);

/// Sprite RAM size in 16-bit words (0x800 bytes, 256 records)
pub const SPRITERAM_WORDS: usize = 0x400;

// Bootleg CRTC foreground alignment
const BOOTLEG_FG_SCROLLX_ADJUST: i32 = -13;
const BOOTLEG_FG_SCROLLY_ADJUST: i32 = 1;

/// Board revision, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hardware {
    /// Blood Bros / Sky Smasher: Seibu CRTC and sprite chip
    Base,
    /// West Story: bootleg sprite RAM and foreground scroll
    Bootleg,
}

/// Priority values the tilemaps leave behind for sprite masking
const PRI_BACKGROUND: u8 = 0;
const PRI_FOREGROUND: u8 = 1;
const PRI_TEXT: u8 = 0;

pub struct Video {
    hardware: Hardware,
    gfx: GfxSet,
    bg: TileLayer,
    fg: TileLayer,
    tx: TileLayer,
    scroll: ScrollRegisters,
    layer_en: LayerDisable,
    spriteram: Vec<u16>,
    sprite_gen: Box<dyn SpriteGenerator>,
    priority: Bitmap<u8>,
    frame: u64,
}

impl Video {
    pub fn new(hardware: Hardware, gfx: GfxSet) -> Self {
        Self::with_sprite_generator(hardware, gfx, Box::new(SeibuSpriteGen::default()))
    }

    /// Build with a custom sprite chip for the base hardware. The bootleg
    /// board ignores it and decodes its own sprite RAM.
    pub fn with_sprite_generator(
        hardware: Hardware,
        gfx: GfxSet,
        sprite_gen: Box<dyn SpriteGenerator>,
    ) -> Self {
        Self {
            hardware,
            gfx,
            bg: TileLayer::new(LayerKind::Background),
            fg: TileLayer::new(LayerKind::Foreground),
            tx: TileLayer::new(LayerKind::Text),
            scroll: ScrollRegisters::default(),
            layer_en: LayerDisable::empty(),
            spriteram: vec![0; SPRITERAM_WORDS],
            sprite_gen,
            priority: Bitmap::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            frame: 0,
        }
    }

    pub fn hardware(&self) -> Hardware {
        self.hardware
    }

    pub fn layer(&self, kind: LayerKind) -> &TileLayer {
        match kind {
            LayerKind::Background => &self.bg,
            LayerKind::Foreground => &self.fg,
            LayerKind::Text => &self.tx,
        }
    }

    pub fn priority(&self) -> &Bitmap<u8> {
        &self.priority
    }

    pub fn scroll(&self) -> &ScrollRegisters {
        &self.scroll
    }

    pub fn layer_enable(&self) -> LayerDisable {
        self.layer_en
    }

    pub fn spriteram(&self) -> &[u16] {
        &self.spriteram
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    // Bus-facing write handlers

    pub fn write_bg_videoram(&mut self, offset: usize, data: u16, mask: u16) {
        self.bg.write(offset, data, mask);
    }

    pub fn write_fg_videoram(&mut self, offset: usize, data: u16, mask: u16) {
        self.fg.write(offset, data, mask);
    }

    pub fn write_tx_videoram(&mut self, offset: usize, data: u16, mask: u16) {
        self.tx.write(offset, data, mask);
    }

    pub fn write_spriteram(&mut self, offset: usize, data: u16, mask: u16) {
        layer::combine_data(&mut self.spriteram[offset], data, mask);
    }

    pub fn write_scroll(&mut self, index: usize, data: u16, mask: u16) {
        self.scroll.write(index, data, mask);
    }

    pub fn write_layer_enable(&mut self, data: u16) {
        self.layer_en = LayerDisable::from_bits_retain(data as u8);
        if debug_flags::render_verbose() {
            log::debug!("layer_en <= {:02X}", self.layer_en.bits());
        }
    }

    /// Compose one frame into `surface` over `clip`. Never fails.
    pub fn render_frame(&mut self, surface: &mut Bitmap<u16>, clip: &Rect) {
        if debug_flags::render_verbose() && self.frame < debug_flags::render_frame_limit() {
            log::debug!(
                "frame {} ({:?}): scroll={:04X?} layer_en={:02X}",
                self.frame,
                self.hardware,
                self.scroll.regs,
                self.layer_en.bits()
            );
        }
        match self.hardware {
            Hardware::Base => self.render_base(surface, clip),
            Hardware::Bootleg => self.render_bootleg(surface, clip),
        }
        self.frame += 1;
    }

    fn render_base(&mut self, surface: &mut Bitmap<u16>, clip: &Rect) {
        let bg_map = self.bg.tilemap_mut();
        bg_map.set_scrollx(self.scroll.get(layer::SCROLL_BG_X) as i32);
        bg_map.set_scrolly(self.scroll.get(layer::SCROLL_BG_Y) as i32);
        let fg_map = self.fg.tilemap_mut();
        fg_map.set_scrollx(self.scroll.get(layer::SCROLL_FG_X) as i32);
        fg_map.set_scrolly(self.scroll.get(layer::SCROLL_FG_Y) as i32);

        self.priority.fill(0, clip);

        let en = self.layer_en;
        if en.draws(LayerDisable::BACKGROUND) {
            self.bg.draw(&self.gfx, surface, &mut self.priority, clip, PRI_BACKGROUND);
        }
        if en.draws(LayerDisable::FOREGROUND) {
            self.fg.draw(&self.gfx, surface, &mut self.priority, clip, PRI_FOREGROUND);
        }
        if en.draws(LayerDisable::SPRITES) {
            self.sprite_gen.draw_sprites(
                self.gfx.get(GfxSlot::Sprites),
                surface,
                &mut self.priority,
                clip,
                &self.spriteram,
            );
        }
        if en.draws(LayerDisable::TEXT) {
            self.tx.draw(&self.gfx, surface, &mut self.priority, clip, PRI_TEXT);
        }
    }

    fn render_bootleg(&mut self, surface: &mut Bitmap<u16>, clip: &Rect) {
        // The bootleg probably scrolls BG too, but West Story never uses it.
        // Its CRTC hands us the foreground X in register 1 and Y in register 0.
        let fg_map = self.fg.tilemap_mut();
        fg_map.set_scrollx(self.scroll.signed_low(1) + BOOTLEG_FG_SCROLLX_ADJUST);
        fg_map.set_scrolly(self.scroll.signed_low(0) + BOOTLEG_FG_SCROLLY_ADJUST);

        self.priority.fill(0, clip);

        self.bg.draw(&self.gfx, surface, &mut self.priority, clip, PRI_BACKGROUND);
        self.fg.draw(&self.gfx, surface, &mut self.priority, clip, PRI_FOREGROUND);
        draw_bootleg_sprites(
            self.gfx.get(GfxSlot::Sprites),
            surface,
            &mut self.priority,
            clip,
            &self.spriteram,
        );
        self.tx.draw(&self.gfx, surface, &mut self.priority, clip, PRI_TEXT);
    }

    pub fn save_state(&self) -> VideoSaveState {
        VideoSaveState {
            version: VideoSaveState::CURRENT_VERSION,
            scroll: self.scroll.regs,
            layer_enable: self.layer_en.bits(),
        }
    }

    pub fn load_state(&mut self, state: &VideoSaveState) -> Result<(), String> {
        state.check_version()?;
        self.scroll.regs = state.scroll;
        self.layer_en = LayerDisable::from_bits_retain(state.layer_enable);
        if !debug_flags::quiet() {
            log::info!("video state restored (layer_en={:02X})", state.layer_enable);
        }
        Ok(())
    }
}
