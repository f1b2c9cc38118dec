use std::path::Path;

use chrono::{TimeZone, Utc};
use image::Rgba;

use idcard_backend::card::export::{export_batch, export_card, ExportFormat};
use idcard_backend::card::{render, Surface, CARD_HEIGHT, CARD_WIDTH};
use idcard_backend::model::Teacher;

const ALL_TEMPLATE_IDS: [&str; 8] = [
    "classic-blue",
    "modern-gradient",
    "nature-green",
    "minimal-white",
    "royal-red",
    "deep-blue",
    "corporate-gold",
    "tech-purple",
];

// 1x1 red (220, 38, 38) PNG
const RED_PIXEL_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGO4o6YGAAMKASng8MlTAAAAAElFTkSuQmCC";

fn karim() -> Teacher {
    Teacher {
        id: "t-1".into(),
        name: "Karim".into(),
        department: "Math".into(),
        employee_id: "EMP001234".into(),
        designation: None,
        phone: None,
        institution: None,
        photo_url: None,
        template: "classic-blue".into(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    }
}

fn surface() -> Surface {
    Surface::from_pixel(CARD_WIDTH, CARD_HEIGHT, Rgba([0, 0, 0, 0]))
}

fn http() -> reqwest::Client {
    reqwest::Client::new()
}

fn updir() -> &'static Path {
    Path::new("uploads")
}

fn count_black(img: &Surface, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    let mut n = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = img.get_pixel(x, y);
            if p.0[0] < 40 && p.0[1] < 40 && p.0[2] < 40 {
                n += 1;
            }
        }
    }
    n
}

#[tokio::test]
async fn every_template_renders_fully_opaque() {
    let http = http();
    for id in ALL_TEMPLATE_IDS {
        let mut img = surface();
        render(&mut img, &http, updir(), Some(&karim()), id)
            .await
            .unwrap_or_else(|e| panic!("{id} failed: {e}"));
        assert!(
            img.pixels().all(|p| p.0[3] == 255),
            "{id} left transparent pixels"
        );
    }
}

#[tokio::test]
async fn absent_record_is_template_independent() {
    let http = http();
    let mut a = surface();
    let mut b = surface();
    render(&mut a, &http, updir(), None, "classic-blue").await.unwrap();
    render(&mut b, &http, updir(), None, "tech-purple").await.unwrap();
    assert_eq!(a.as_raw(), b.as_raw());

    // neutral gray dominates
    let p = a.get_pixel(10, 10);
    assert_eq!((p.0[0], p.0[1], p.0[2]), (229, 231, 235));
}

#[tokio::test]
async fn unknown_template_matches_default() {
    let http = http();
    let mut a = surface();
    let mut b = surface();
    render(&mut a, &http, updir(), Some(&karim()), "nonexistent").await.unwrap();
    render(&mut b, &http, updir(), Some(&karim()), "classic-blue").await.unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[tokio::test]
async fn render_is_deterministic() {
    let http = http();
    let mut a = surface();
    let mut b = surface();
    render(&mut a, &http, updir(), Some(&karim()), "royal-red").await.unwrap();
    render(&mut b, &http, updir(), Some(&karim()), "royal-red").await.unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[tokio::test]
async fn different_issue_dates_render_differently() {
    let http = http();
    let mut later = karim();
    later.created_at = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();

    // the issued/expiry dates differ only in their Bengali numerals, so the
    // cards must not be pixel-identical
    let mut a = surface();
    let mut b = surface();
    render(&mut a, &http, updir(), Some(&karim()), "classic-blue").await.unwrap();
    render(&mut b, &http, updir(), Some(&later), "classic-blue").await.unwrap();
    assert_ne!(a.as_raw(), b.as_raw());
}

#[tokio::test]
async fn unreadable_photo_falls_back_to_placeholder() {
    let http = http();
    let mut teacher = karim();
    teacher.photo_url = Some("data:image/png;base64,@@@not-base64@@@".into());

    let mut img = surface();
    render(&mut img, &http, updir(), Some(&teacher), "classic-blue").await.unwrap();
    assert!(img.pixels().all(|p| p.0[3] == 255));

    // with the load failing, output matches the no-photo render exactly
    let mut without = surface();
    render(&mut without, &http, updir(), Some(&karim()), "classic-blue").await.unwrap();
    assert_eq!(img.as_raw(), without.as_raw());
}

#[tokio::test]
async fn photo_path_cannot_escape_upload_dir() {
    let http = http();
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");
    std::fs::create_dir(&upload_dir).unwrap();

    // a real image one level above the upload dir
    let outside = root.path().join("secret.png");
    image::save_buffer(&outside, &[220u8, 38, 38, 255], 1, 1, image::ExtendedColorType::Rgba8)
        .unwrap();

    let mut teacher = karim();
    teacher.photo_url = Some("/uploads/../secret.png".into());

    let mut img = surface();
    render(&mut img, &http, &upload_dir, Some(&teacher), "classic-blue").await.unwrap();

    let mut without = surface();
    render(&mut without, &http, &upload_dir, Some(&karim()), "classic-blue").await.unwrap();
    assert_eq!(img.as_raw(), without.as_raw(), "escaped photo must not be drawn");
}

#[tokio::test]
async fn data_uri_photo_is_composited() {
    let http = http();
    let mut teacher = karim();
    teacher.photo_url = Some(RED_PIXEL_DATA_URI.into());

    let mut img = surface();
    render(&mut img, &http, updir(), Some(&teacher), "classic-blue").await.unwrap();

    // classic photo box is 96x96 at (112, 150); its center must now be red
    let p = img.get_pixel(160, 198);
    assert!(p.0[0] > 180 && p.0[1] < 100, "center pixel not red: {:?}", p);
}

#[tokio::test]
async fn uploaded_photo_is_read_from_upload_dir() {
    let http = http();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("photo.png");
    image::save_buffer(&file, &[220u8, 38, 38, 255], 1, 1, image::ExtendedColorType::Rgba8)
        .unwrap();

    let mut teacher = karim();
    teacher.photo_url = Some("/uploads/photo.png".into());

    let mut img = surface();
    render(&mut img, &http, dir.path(), Some(&teacher), "classic-blue").await.unwrap();
    let p = img.get_pixel(160, 198);
    assert!(p.0[0] > 180 && p.0[1] < 100, "center pixel not red: {:?}", p);
}

#[tokio::test]
async fn qr_failure_draws_textual_fallback() {
    let http = http();
    let mut teacher = karim();
    // payload far beyond QR capacity forces an encoding error
    teacher.institution = Some("x".repeat(5000));

    let mut img = surface();
    render(&mut img, &http, updir(), Some(&teacher), "classic-blue").await.unwrap();

    // classic QR box is 64x64 at (30, 424): a real matrix has black modules,
    // the fallback is a white box with a gray "QR" label only
    assert_eq!(count_black(&img, 30, 424, 94, 488), 0);
}

#[tokio::test]
async fn qr_matrix_is_drawn_on_success() {
    let http = http();
    let mut img = surface();
    render(&mut img, &http, updir(), Some(&karim()), "classic-blue").await.unwrap();
    assert!(count_black(&img, 30, 424, 94, 488) > 100);
}

#[tokio::test]
async fn zero_sized_surface_is_rejected() {
    let http = http();
    let mut img = Surface::new(0, 0);
    assert!(render(&mut img, &http, updir(), Some(&karim()), "classic-blue").await.is_err());
}

#[tokio::test]
async fn export_names_and_sizes() {
    let http = http();

    let png = export_card(&http, updir(), &karim(), "classic-blue", ExportFormat::Png)
        .await
        .unwrap();
    assert_eq!(png.filename, "Karim_ID_Card.png");
    assert_eq!(png.content_type, "image/png");
    assert_eq!(&png.bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&png.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (640, 1000));

    let pdf = export_card(&http, updir(), &karim(), "classic-blue", ExportFormat::Pdf)
        .await
        .unwrap();
    assert_eq!(pdf.filename, "Karim_ID_Card.pdf");
    assert_eq!(pdf.content_type, "application/pdf");
    // deliberately the same raster bytes under a different label
    assert_eq!(&pdf.bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn export_filename_survives_hostile_names() {
    let http = http();
    let mut teacher = karim();
    teacher.name = "Ka\"rim\r\n".into();

    let export = export_card(&http, updir(), &teacher, "classic-blue", ExportFormat::Png)
        .await
        .unwrap();
    assert_eq!(export.filename, "Karim_ID_Card.png");
}

#[tokio::test]
async fn batch_export_processes_every_record() {
    let http = http();
    let mut second = karim();
    second.id = "t-2".into();
    second.name = "Rahim".into();
    second.employee_id = "EMP005678".into();

    let exports = export_batch(&http, updir(), &[karim(), second], "deep-blue", ExportFormat::Png).await;
    assert_eq!(exports.len(), 2);
    assert_eq!(exports[0].filename, "Karim_ID_Card.png");
    assert_eq!(exports[1].filename, "Rahim_ID_Card.png");
}

#[tokio::test]
async fn larger_surface_scales_the_same_card() {
    let http = http();
    let mut img = Surface::from_pixel(640, 1000, Rgba([0, 0, 0, 0]));
    render(&mut img, &http, updir(), Some(&karim()), "corporate-gold").await.unwrap();
    assert!(img.pixels().all(|p| p.0[3] == 255));
}
