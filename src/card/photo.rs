use std::path::Path;

use image::imageops::FilterType;
use thiserror::Error;
use tracing::warn;

use crate::util;

use super::draw;
use super::template::PhotoShape;
use super::Surface;

#[derive(Debug, Error)]
enum PhotoError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid data uri")]
    DataUri,
    #[error("path escapes upload dir")]
    Traversal,
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Composite the teacher photo into the card. The shape-matched placeholder
/// is drawn first so geometry is identical whether or not the load succeeds.
/// `tint` is the placeholder/silhouette base color (white on dark layouts).
/// Load or decode failures are logged and replaced by the silhouette icon;
/// this function never reports an error upward.
#[allow(clippy::too_many_arguments)]
pub async fn composite(
    img: &mut Surface,
    http: &reqwest::Client,
    upload_dir: &Path,
    photo_url: Option<&str>,
    shape: PhotoShape,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    sf: f32,
    tint: image::Rgba<u8>,
) {
    draw_placeholder_frame(img, shape, x, y, w, h, sf, tint);

    let Some(url) = photo_url.filter(|u| !u.trim().is_empty()) else {
        draw_silhouette(img, x, y, w, h, sf, tint);
        return;
    };

    match load_photo(http, upload_dir, url).await {
        Ok(photo) => {
            // aspect-fill: stretch to exactly w×h
            let resized = image::imageops::resize(&photo, w, h, FilterType::Lanczos3);
            let clipped = clip_to_shape(resized, shape);
            overlay(img, &clipped, x, y);
        }
        Err(err) => {
            warn!(%url, error = %err, "failed to load teacher photo, using placeholder");
            draw_silhouette(img, x, y, w, h, sf, tint);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_placeholder_frame(
    img: &mut Surface,
    shape: PhotoShape,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    sf: f32,
    tint: image::Rgba<u8>,
) {
    let fill = draw::with_alpha(tint, 51);
    let stroke = draw::with_alpha(tint, 76);
    let t = (2.0 * sf).round().max(1.0) as u32;
    match shape {
        PhotoShape::Circle => {
            let r = (w.min(h) / 2) as i32;
            let cx = x + w as i32 / 2;
            let cy = y + h as i32 / 2;
            draw::fill_circle(img, cx, cy, r, fill);
            draw::stroke_circle(img, cx, cy, r, t as i32, stroke);
        }
        PhotoShape::Square => {
            draw::fill_rect(img, x, y, w, h, fill);
            draw::stroke_border(
                img,
                x,
                y,
                w,
                h,
                0,
                t,
                stroke,
                super::template::BorderStyle::Solid,
            );
        }
        PhotoShape::Rounded => {
            let r = (8.0 * sf).round() as u32;
            draw::fill_rounded_rect(img, x, y, w, h, r, fill);
            draw::stroke_border(
                img,
                x,
                y,
                w,
                h,
                r,
                t,
                stroke,
                super::template::BorderStyle::Solid,
            );
        }
    }
}

fn draw_silhouette(img: &mut Surface, x: i32, y: i32, w: u32, h: u32, sf: f32, tint: image::Rgba<u8>) {
    let cx = x + w as i32 / 2;
    let cy = y + h as i32 / 2;
    draw::user_icon(img, cx, cy, sf, draw::with_alpha(tint, 153));
}

async fn load_photo(
    http: &reqwest::Client,
    upload_dir: &Path,
    url: &str,
) -> Result<Surface, PhotoError> {
    let bytes = if url.starts_with("data:") {
        util::b64_decode(url).ok_or(PhotoError::DataUri)?
    } else if url.starts_with("http://") || url.starts_with("https://") {
        let resp = http
            .get(url)
            .send()
            .await
            .map_err(|e| PhotoError::Fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PhotoError::Fetch(format!("http {}", resp.status())));
        }
        resp.bytes()
            .await
            .map_err(|e| PhotoError::Fetch(e.to_string()))?
            .to_vec()
    } else {
        // relative upload path, e.g. /uploads/<file>
        let rel = url.trim_start_matches('/');
        let file = rel.strip_prefix("uploads/").unwrap_or(rel);
        // same guard as the upload-serving route: bare filenames only
        if file.contains("..") || file.contains('/') || file.contains('\\') {
            return Err(PhotoError::Traversal);
        }
        tokio::fs::read(upload_dir.join(file)).await?
    };

    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

fn clip_to_shape(mut img: Surface, shape: PhotoShape) -> Surface {
    let (w, h) = (img.width() as i32, img.height() as i32);
    match shape {
        PhotoShape::Square => img,
        PhotoShape::Circle => {
            let r = w.min(h) / 2;
            let (cx, cy) = (w / 2, h / 2);
            for y in 0..h {
                for x in 0..w {
                    let dx = x - cx;
                    let dy = y - cy;
                    if dx * dx + dy * dy > r * r {
                        img.get_pixel_mut(x as u32, y as u32).0[3] = 0;
                    }
                }
            }
            img
        }
        PhotoShape::Rounded => {
            let r = (w.min(h) / 12).max(4);
            for y in 0..h {
                for x in 0..w {
                    let in_corner = (x < r || x >= w - r) && (y < r || y >= h - r);
                    if !in_corner {
                        continue;
                    }
                    let cx = if x < r { r - 1 } else { w - r };
                    let cy = if y < r { r - 1 } else { h - r };
                    let dx = x - cx;
                    let dy = y - cy;
                    if dx * dx + dy * dy > r * r {
                        img.get_pixel_mut(x as u32, y as u32).0[3] = 0;
                    }
                }
            }
            img
        }
    }
}

fn overlay(base: &mut Surface, over: &Surface, x: i32, y: i32) {
    for oy in 0..over.height() as i32 {
        for ox in 0..over.width() as i32 {
            let p = *over.get_pixel(ox as u32, oy as u32);
            draw::blend_px(base, x + ox, y + oy, p);
        }
    }
}
