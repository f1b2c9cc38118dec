use image::{ImageEncoder, Rgba};
use tracing::warn;

use crate::model::Teacher;

use super::{render, CardError, Surface, CARD_HEIGHT, CARD_WIDTH};

/// "Pdf" is a relabeled PNG: same bytes, different name and MIME. Known
/// simplification carried over from the original exporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(ExportFormat::Png),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Content-Disposition cannot carry quotes or control characters; strip
/// them from the name before it becomes a filename.
fn filename_base(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/'))
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "card".to_string()
    } else {
        cleaned
    }
}

/// Render one card at 2× the logical dimensions and encode it for download.
pub async fn export_card(
    http: &reqwest::Client,
    upload_dir: &std::path::Path,
    teacher: &Teacher,
    template_id: &str,
    format: ExportFormat,
) -> Result<Export, CardError> {
    let mut surface = Surface::from_pixel(CARD_WIDTH * 2, CARD_HEIGHT * 2, Rgba([0, 0, 0, 0]));
    render(&mut surface, http, upload_dir, Some(teacher), template_id).await?;

    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
    encoder.write_image(
        &surface,
        surface.width(),
        surface.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    Ok(Export {
        filename: format!("{}_ID_Card.{}", filename_base(&teacher.name), format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}

/// Sequential batch export. A failed record is logged and skipped, never
/// aborting the rest; the short pause keeps the host responsive.
pub async fn export_batch(
    http: &reqwest::Client,
    upload_dir: &std::path::Path,
    teachers: &[Teacher],
    template_id: &str,
    format: ExportFormat,
) -> Vec<Export> {
    let mut out = Vec::with_capacity(teachers.len());
    for teacher in teachers {
        match export_card(http, upload_dir, teacher, template_id, format).await {
            Ok(export) => out.push(export),
            Err(err) => {
                warn!(teacher = %teacher.id, error = %err, "batch export item failed, continuing");
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_base_strips_header_breaking_characters() {
        assert_eq!(filename_base("Karim"), "Karim");
        assert_eq!(filename_base("Ka\"rim"), "Karim");
        assert_eq!(filename_base("Ka\r\nrim"), "Karim");
        assert_eq!(filename_base("a/b\\c"), "abc");
        assert_eq!(filename_base("\"\r\n"), "card");
    }
}
