//! Card rendering engine: resolves a template, normalizes the record, and
//! dispatches to one of the seven layout strategies.

pub mod display;
pub mod draw;
pub mod export;
pub mod fonts;
mod layouts;
pub mod photo;
pub mod qr;
pub mod template;

use thiserror::Error;

use crate::model::Teacher;

use display::DisplayTeacher;
use template::LayoutKind;

/// Caller-owned raster target. Mutated in place for the duration of one
/// render call, never retained.
pub type Surface = image::ImageBuffer<image::Rgba<u8>, Vec<u8>>;

/// Logical card dimensions; larger surfaces render the same card scaled.
pub const CARD_WIDTH: u32 = 320;
pub const CARD_HEIGHT: u32 = 500;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("render surface has zero size")]
    BadSurface,
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Primary entry point. Recoverable sub-failures (photo load, QR encoding,
/// unknown template id) never escape; once the surface is writable the call
/// always completes.
pub async fn render(
    surface: &mut Surface,
    http: &reqwest::Client,
    upload_dir: &std::path::Path,
    teacher: Option<&Teacher>,
    template_id: &str,
) -> Result<(), CardError> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(CardError::BadSurface);
    }
    let sf = surface.width() as f32 / CARD_WIDTH as f32;

    draw::clear(surface, draw::rgba(255, 255, 255, 255));

    let Some(teacher) = teacher else {
        render_empty(surface, sf);
        return Ok(());
    };

    let desc = template::resolve(template_id);
    let dt = DisplayTeacher::new(teacher);
    let ctx = layouts::Ctx {
        http,
        upload_dir,
        dt: &dt,
        desc,
        photo_url: teacher.photo_url.as_deref(),
        sf,
    };

    match desc.layout {
        LayoutKind::Classic => layouts::classic(surface, &ctx).await,
        LayoutKind::Modern => layouts::modern(surface, &ctx).await,
        LayoutKind::Minimal => layouts::minimal(surface, &ctx).await,
        LayoutKind::Professional => layouts::professional(surface, &ctx).await,
        LayoutKind::Academic => layouts::academic(surface, &ctx).await,
        LayoutKind::Government => layouts::government(surface, &ctx).await,
        LayoutKind::Corporate => layouts::corporate(surface, &ctx).await,
    }

    Ok(())
}

/// No record: neutral gray surface with a centered prompt, identical for
/// every template id.
fn render_empty(surface: &mut Surface, sf: f32) {
    draw::clear(surface, draw::rgba(229, 231, 235, 255));
    draw::draw_text_centered(
        surface,
        fonts::regular(),
        14.0 * sf,
        surface.width() as i32 / 2,
        surface.height() as i32 / 2,
        draw::rgba(107, 114, 128, 255),
        display::NO_TEACHER_PROMPT,
    );
}
