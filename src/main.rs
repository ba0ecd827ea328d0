use bloodbro_video::video::{SCREEN_HEIGHT, SCREEN_WIDTH};
use bloodbro_video::{Bitmap, GfxElement, GfxSet, Hardware, Video, VideoSaveState, VISIBLE_AREA};
use std::env;
use std::process;

// Headless frame renderer for the Blood Bros video core.
// Fills tile/sprite RAM with a synthetic scene, renders N frames and dumps
// the last one as a PPM.
//
//   bloodbro_frame [--variant base|bootleg] [--frames N] [--out frame.ppm]
//                  [--layer-en 0xNN] [--save-state FILE] [--load-state FILE]
//
// Environment switches: see debug_flags (DEBUG_RENDER, DEBUG_SPRITES, ...).

struct Options {
    hardware: Hardware,
    frames: u64,
    out: String,
    layer_en: u16,
    save_state: Option<String>,
    load_state: Option<String>,
}

fn parse_u16_hex_or_dec(s: &str) -> Option<u16> {
    let s = s.trim();
    if let Some(stripped) = s.strip_prefix("0x") {
        u16::from_str_radix(stripped, 16).ok()
    } else {
        s.parse::<u16>().ok()
    }
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        hardware: Hardware::Base,
        frames: 1,
        out: "frame.ppm".to_string(),
        layer_en: 0,
        save_state: None,
        load_state: None,
    };
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--variant" => {
                opts.hardware = match value.map(String::as_str) {
                    Some("base") => Hardware::Base,
                    Some("bootleg") => Hardware::Bootleg,
                    other => return Err(format!("unknown variant: {:?}", other)),
                };
            }
            "--frames" => {
                opts.frames = value
                    .and_then(|v| v.parse().ok())
                    .ok_or("--frames needs a number")?;
            }
            "--out" => {
                opts.out = value.ok_or("--out needs a path")?.clone();
            }
            "--layer-en" => {
                opts.layer_en = value
                    .and_then(|v| parse_u16_hex_or_dec(v))
                    .ok_or("--layer-en needs a value")?;
            }
            "--save-state" => {
                opts.save_state = Some(value.ok_or("--save-state needs a path")?.clone());
            }
            "--load-state" => {
                opts.load_state = Some(value.ok_or("--load-state needs a path")?.clone());
            }
            "--help" | "-h" => {
                return Err(format!(
                    "Usage: {} [--variant base|bootleg] [--frames N] [--out FILE] [--layer-en N] [--save-state FILE] [--load-state FILE]",
                    args[0]
                ));
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 2;
    }
    Ok(opts)
}

// Procedural tile banks: each tile is a diagonal stripe pattern keyed on its
// code so scrolling and remapping are visible in the dump.
fn pattern_bank(size: usize, tiles: usize, color_base: u16, transparent_border: bool) -> GfxElement {
    let mut pixels = Vec::with_capacity(size * size * tiles);
    for code in 0..tiles {
        for y in 0..size {
            for x in 0..size {
                let edge = x == 0 || y == 0 || x == size - 1 || y == size - 1;
                let pen = if transparent_border && edge {
                    15
                } else {
                    ((x + y + code) % 15) as u8
                };
                pixels.push(pen);
            }
        }
    }
    GfxElement::new(size, size, color_base, pixels)
}

fn demo_gfx() -> GfxSet {
    GfxSet::new(
        pattern_bank(8, 0x100, 0x700, true),
        pattern_bank(16, 0x2000, 0x400, false),
        pattern_bank(16, 0x2000, 0x500, true),
        pattern_bank(16, 0x2000, 0x000, true),
    )
}

fn populate(video: &mut Video) {
    for i in 0..32 * 16 {
        video.write_bg_videoram(i, ((i as u16 & 0xF) << 12) | (i as u16 & 0xFFF), 0xFFFF);
        if i % 3 == 0 {
            video.write_fg_videoram(i, 0x3000 | (i as u16 * 7 & 0xFFF), 0xFFFF);
        }
    }
    for (i, ch) in b"BLOOD BROS".iter().enumerate() {
        video.write_tx_videoram(2 * 32 + 4 + i, 0xF000 | *ch as u16, 0xFFFF);
    }
}

fn place_sprites(video: &mut Video, frame: u64) {
    for slot in 0..8usize {
        let x = ((frame as usize * 2 + slot * 30) % 512) as u16;
        let y = (32 + slot * 20) as u16;
        let words = match video.hardware() {
            // width 1, height 0, color = slot
            Hardware::Base => [(1 << 7) | slot as u16, 0x100 + slot as u16 * 2, x, y],
            Hardware::Bootleg => [0xF0 - y, 0x800 + slot as u16, (slot as u16) << 12, x],
        };
        for (i, w) in words.iter().enumerate() {
            video.write_spriteram(slot * 4 + i, *w, 0xFFFF);
        }
    }
}

// Pens carry no palette here; spread them over RGB so layers stay distinct.
fn pen_to_rgb(pen: u16) -> [u8; 3] {
    let bank = (pen >> 8) as u8;
    let idx = (pen & 0xFF) as u8;
    [bank.wrapping_mul(36), idx.wrapping_mul(17), (bank ^ idx).wrapping_mul(9)]
}

fn write_ppm(path: &str, surface: &Bitmap<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut data = format!("P6\n{} {}\n255\n", surface.width(), surface.height()).into_bytes();
    for &pen in surface.as_slice() {
        data.extend_from_slice(&pen_to_rgb(pen));
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn run(opts: Options) -> Result<(), Box<dyn std::error::Error>> {
    let mut video = Video::new(opts.hardware, demo_gfx());
    populate(&mut video);
    video.write_layer_enable(opts.layer_en);

    if let Some(path) = &opts.load_state {
        let state = VideoSaveState::load_from_file(path)?;
        video.load_state(&state)?;
    }

    let mut surface = Bitmap::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    for frame in 0..opts.frames {
        video.write_scroll(0, frame as u16, 0xFFFF);
        video.write_scroll(2, (frame * 2) as u16, 0xFFFF);
        place_sprites(&mut video, frame);
        video.render_frame(&mut surface, &VISIBLE_AREA);
    }
    log::info!("rendered {} frame(s) on {:?} hardware", video.frame_count(), video.hardware());

    write_ppm(&opts.out, &surface)?;
    println!("Frame written to: {}", opts.out);

    if let Some(path) = &opts.save_state {
        video.save_state().save_to_file(path)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(2);
        }
    };
    if let Err(e) = run(opts) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
