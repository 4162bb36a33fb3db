use std::{
    collections::{HashMap, HashSet},
    io::Cursor,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, Mutex,
    },
    thread,
    time::Instant,
};

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::DynamicImage;
use zune_jpeg::JpegDecoder;

use crate::catalog::Catalog;

/// Longest edge of a list thumbnail, in pixels.
pub const THUMB_SIZE: u32 = 64;
/// Longest edge of the click-to-enlarge preview.
pub const PREVIEW_SIZE: u32 = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Purpose {
    Thumbnail,
    Preview,
}

impl Purpose {
    fn max_edge(self) -> u32 {
        match self {
            Purpose::Thumbnail => THUMB_SIZE,
            Purpose::Preview => PREVIEW_SIZE,
        }
    }
}

struct Job {
    path: String,
    purpose: Purpose,
}

struct Decoded {
    path: String,
    purpose: Purpose,
    result: Result<egui::ColorImage>,
}

/// What the preview window should show.
pub enum PreviewState<'a> {
    Loading(&'a str),
    Ready(&'a str, &'a egui::TextureHandle),
    Failed(&'a str),
}

struct Preview {
    path: String,
    texture: Option<egui::TextureHandle>,
    failed: bool,
}

/// Decodes thumbnails for the rows the list actually renders, plus one
/// larger preview at a time.
pub struct Thumbnails {
    job_tx: Sender<Job>,
    decoded_rx: Receiver<Decoded>,
    requested: HashSet<String>,
    failed: HashSet<String>,
    textures: HashMap<String, egui::TextureHandle>,
    preview: Option<Preview>,
}

impl Thumbnails {
    pub fn new(concurrency: usize) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (decoded_tx, decoded_rx) = mpsc::channel();
        let rx = Arc::new(Mutex::new(job_rx));
        for _ in 0..concurrency.max(1) {
            Self::spawn_decoder(rx.clone(), decoded_tx.clone());
        }
        Self {
            job_tx,
            decoded_rx,
            requested: HashSet::new(),
            failed: HashSet::new(),
            textures: HashMap::new(),
            preview: None,
        }
    }

    fn spawn_decoder(rx: Arc<Mutex<Receiver<Job>>>, tx: Sender<Decoded>) {
        thread::spawn(move || loop {
            let job = {
                let Ok(lock) = rx.lock() else { break };
                match lock.recv() {
                    Ok(job) => job,
                    Err(_) => break,
                }
            };
            let start = Instant::now();
            let result = load_scaled(&job.path, job.purpose.max_edge());
            tracing::trace!("{:?} for {} took {:?}", job.purpose, job.path, start.elapsed());
            let decoded = Decoded {
                path: job.path,
                purpose: job.purpose,
                result,
            };
            if tx.send(decoded).is_err() {
                break;
            }
        });
    }

    fn send(&self, path: &str, purpose: Purpose) -> bool {
        let job = Job {
            path: path.to_string(),
            purpose,
        };
        if self.job_tx.send(job).is_err() {
            tracing::error!("thumbnail decoders are gone, cannot load {path}");
            return false;
        }
        true
    }

    /// Queues `path` unless it was already requested.
    pub fn request(&mut self, path: &str) {
        if self.requested.contains(path) {
            return;
        }
        if self.send(path, Purpose::Thumbnail) {
            self.requested.insert(path.to_string());
        }
    }

    pub fn get(&self, path: &str) -> Option<&egui::TextureHandle> {
        self.textures.get(path)
    }

    /// True when decoding `path` was attempted and failed.
    pub fn is_failed(&self, path: &str) -> bool {
        self.failed.contains(path)
    }

    pub fn open_preview(&mut self, path: &str) {
        if self.preview.as_ref().is_some_and(|p| p.path == path) {
            return;
        }
        let failed = !self.send(path, Purpose::Preview);
        self.preview = Some(Preview {
            path: path.to_string(),
            texture: None,
            failed,
        });
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<PreviewState<'_>> {
        let preview = self.preview.as_ref()?;
        Some(match (&preview.texture, preview.failed) {
            (Some(texture), _) => PreviewState::Ready(&preview.path, texture),
            (None, true) => PreviewState::Failed(&preview.path),
            (None, false) => PreviewState::Loading(&preview.path),
        })
    }

    /// Uploads finished decodes. Returns true if anything changed.
    pub fn update(&mut self, ctx: &egui::Context) -> bool {
        let mut changed = false;
        while let Ok(decoded) = self.decoded_rx.try_recv() {
            match decoded.purpose {
                Purpose::Thumbnail => changed |= self.thumbnail_done(ctx, decoded),
                Purpose::Preview => changed |= self.preview_done(ctx, decoded),
            }
        }
        changed
    }

    fn thumbnail_done(&mut self, ctx: &egui::Context, decoded: Decoded) -> bool {
        // dropped from the catalog while decoding
        if !self.requested.contains(&decoded.path) {
            return false;
        }
        match decoded.result {
            Ok(color_image) => {
                let texture = ctx.load_texture(
                    format!("thumb:{}", decoded.path),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                self.textures.insert(decoded.path, texture);
            }
            Err(err) => {
                tracing::warn!("no thumbnail for {}: {err:#}", decoded.path);
                self.failed.insert(decoded.path);
            }
        }
        true
    }

    fn preview_done(&mut self, ctx: &egui::Context, decoded: Decoded) -> bool {
        let Some(preview) = self.preview.as_mut().filter(|p| p.path == decoded.path) else {
            return false;
        };
        match decoded.result {
            Ok(color_image) => {
                preview.texture = Some(ctx.load_texture(
                    format!("preview:{}", decoded.path),
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
            }
            Err(err) => {
                tracing::warn!("no preview for {}: {err:#}", decoded.path);
                preview.failed = true;
            }
        }
        true
    }

    /// Drops textures of entries no longer in the catalog.
    pub fn retain(&mut self, catalog: &Catalog) {
        self.requested.retain(|path| catalog.contains(path));
        self.failed.retain(|path| catalog.contains(path));
        self.textures.retain(|path, _| catalog.contains(path));
        if self.preview.as_ref().is_some_and(|p| !catalog.contains(&p.path)) {
            self.preview = None;
        }
    }
}

pub fn load_thumbnail(path: &str) -> Result<egui::ColorImage> {
    load_scaled(path, THUMB_SIZE)
}

/// Decodes `path` and shrinks it so its longest edge is at most `max_edge`.
pub fn load_scaled(path: &str, max_edge: u32) -> Result<egui::ColorImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Unable to read {path}"))?;
    let is_jpeg = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.eq_ignore_ascii_case("jpg") || s.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false);

    let image = if is_jpeg {
        decode_jpeg(&bytes).or_else(|_| image::load_from_memory(&bytes))?
    } else {
        image::load_from_memory(&bytes)?
    };
    drop(bytes);

    let rgba = shrink_to_fit(image, max_edge)?;
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [rgba.width() as usize, rgba.height() as usize],
        rgba.as_raw(),
    ))
}

fn decode_jpeg(bytes: &[u8]) -> Result<DynamicImage> {
    let mut decoder = JpegDecoder::new(Cursor::new(bytes));
    let pixels = decoder.decode().map_err(|e| anyhow!("{e:?}"))?;
    let info = decoder.info().ok_or_else(|| anyhow!("JPEG without header info"))?;
    image::RgbImage::from_raw(info.width as u32, info.height as u32, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| anyhow!("Unexpected JPEG pixel layout"))
}

/// Scales down so the longest edge is at most `max_edge`, keeping aspect.
pub fn shrink_to_fit(image: DynamicImage, max_edge: u32) -> Result<image::RgbaImage> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width <= max_edge && height <= max_edge {
        return Ok(rgba);
    }
    let (new_w, new_h) = fitted_size(width, height, max_edge);

    let src = Image::from_vec_u8(width, height, rgba.into_raw(), PixelType::U8x4)?;
    let mut dst = Image::new(new_w, new_h, PixelType::U8x4);
    Resizer::new().resize(&src, &mut dst, &ResizeOptions::default())?;
    image::RgbaImage::from_raw(new_w, new_h, dst.into_vec())
        .ok_or_else(|| anyhow!("Resized buffer has the wrong size"))
}

pub fn fitted_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width >= height {
        let h = (height as u64 * max_edge as u64 / width.max(1) as u64).max(1) as u32;
        (max_edge, h)
    } else {
        let w = (width as u64 * max_edge as u64 / height.max(1) as u64).max(1) as u32;
        (w, max_edge)
    }
}
