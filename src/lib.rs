//! Video hardware for Blood Bros / Sky Smasher and the West Story bootleg.
//!
//! Three tile RAMs (background, foreground, text) and a sprite RAM are
//! composited once per frame into an indexed surface. The bus writes tile
//! RAM through the `write_*` handlers on [`Video`]; the frontend calls
//! [`Video::render_frame`].

pub mod debug_flags;
pub mod save_state;
pub mod video;

pub use save_state::VideoSaveState;
pub use video::gfx::{Bitmap, GfxElement, GfxSet, Rect};
pub use video::{Hardware, Video, VISIBLE_AREA};
