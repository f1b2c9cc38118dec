use chrono::Duration;
use image::Rgba;
use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use tracing::warn;

use super::display::DisplayTeacher;
use super::draw;
use super::{fonts, Surface};

/// Identity + validity payload encoded into the card's QR matrix.
/// Ephemeral: built at render time, never persisted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QrPayload<'a> {
    employee_id: &'a str,
    name: &'a str,
    institution: &'a str,
    department: &'a str,
    issued_at: String,
    expires_at: String,
}

/// Rasterize the identity QR into a `size`×`size` square at (x, y).
/// Encoding failure degrades to a white box with a "QR" label and is never
/// surfaced to the caller.
pub async fn render_qr(img: &mut Surface, teacher: &DisplayTeacher, x: i32, y: i32, size: u32) {
    let payload = QrPayload {
        employee_id: &teacher.employee_id,
        name: &teacher.name,
        institution: &teacher.institution,
        department: &teacher.department,
        issued_at: teacher.issued_at.to_rfc3339(),
        expires_at: (teacher.issued_at + Duration::days(365)).to_rfc3339(),
    };
    let text = match serde_json::to_string(&payload) {
        Ok(t) => t,
        Err(err) => {
            warn!(error = %err, "failed to serialize qr payload");
            draw_fallback(img, x, y, size);
            return;
        }
    };

    match QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M) {
        Ok(code) => overlay_matrix(img, &code, x, y, size),
        Err(err) => {
            warn!(error = %err, "qr encoding failed, drawing fallback");
            draw_fallback(img, x, y, size);
        }
    }
}

fn overlay_matrix(img: &mut Surface, code: &QrCode, x: i32, y: i32, size: u32) {
    let width_modules = code.width() as u32;
    let margin = 1u32;
    let total_modules = width_modules + 2 * margin;
    let module_px = (size / total_modules).max(1);
    let actual = total_modules * module_px;

    let mut qr = Surface::from_pixel(actual, actual, Rgba([255, 255, 255, 255]));
    for my in 0..width_modules {
        for mx in 0..width_modules {
            if matches!(code[(mx as usize, my as usize)], qrcode::Color::Dark) {
                let px0 = (mx + margin) * module_px;
                let py0 = (my + margin) * module_px;
                for py in py0..(py0 + module_px) {
                    for px in px0..(px0 + module_px) {
                        qr.put_pixel(px, py, Rgba([0, 0, 0, 255]));
                    }
                }
            }
        }
    }

    let qr = if actual != size {
        image::imageops::resize(&qr, size, size, image::imageops::FilterType::Nearest)
    } else {
        qr
    };

    for oy in 0..qr.height() as i32 {
        for ox in 0..qr.width() as i32 {
            draw::blend_px(img, x + ox, y + oy, *qr.get_pixel(ox as u32, oy as u32));
        }
    }
}

/// Deterministic visual stand-in when encoding fails: white square with a
/// centered gray "QR" label at size/4.
fn draw_fallback(img: &mut Surface, x: i32, y: i32, size: u32) {
    draw::fill_rect(img, x, y, size, size, Rgba([255, 255, 255, 255]));
    let label_px = size as f32 / 4.0;
    draw::draw_text_centered(
        img,
        fonts::regular(),
        label_px,
        x + size as i32 / 2,
        y + size as i32 / 2 + (label_px / 3.0) as i32,
        Rgba([102, 102, 102, 255]),
        "QR",
    );
}
