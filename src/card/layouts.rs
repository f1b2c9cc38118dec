//! The seven layout strategies. Each is a deterministic sequence of drawing
//! calls over the shared primitives, parameterized by the resolved template
//! descriptor and the normalized display record. Logical coordinate space is
//! 320×500; every position is multiplied by the scale factor.

use std::path::Path;

use image::Rgba;

use crate::util::truncate_with_ellipsis;

use super::display::{self, DisplayTeacher};
use super::draw::{self, white};
use super::template::{BorderStyle, PhotoShape, TemplateDescriptor};
use super::{photo, qr, Surface};
use super::fonts;

pub(crate) struct Ctx<'a> {
    pub http: &'a reqwest::Client,
    pub upload_dir: &'a Path,
    pub dt: &'a DisplayTeacher,
    pub desc: &'a TemplateDescriptor,
    pub photo_url: Option<&'a str>,
    pub sf: f32,
}

impl Ctx<'_> {
    fn s(&self, v: f32) -> i32 {
        (v * self.sf).round() as i32
    }

    fn su(&self, v: f32) -> u32 {
        (v * self.sf).round().max(1.0) as u32
    }

    fn px(&self, v: f32) -> f32 {
        v * self.sf
    }

    fn gradient_stops(&self) -> [Rgba<u8>; 3] {
        let p = &self.desc.palette;
        [p.primary, p.secondary, p.accent]
    }

    fn background_fill(&self, img: &mut Surface, radius: f32) {
        let r = self.su(radius);
        let w = img.width();
        let h = img.height();
        if self.desc.features.gradient {
            draw::fill_gradient_rounded_rect(img, 0, 0, w, h, r, &self.gradient_stops());
        } else {
            let flat = self
                .desc
                .palette
                .background
                .unwrap_or(self.desc.palette.primary);
            draw::fill_rounded_rect(img, 0, 0, w, h, r, flat);
        }
    }

    fn ornaments(&self, img: &mut Surface) {
        if let Some(kind) = self.desc.features.pattern {
            draw::decorative_pattern(img, self.sf, kind);
        }
        if let Some(word) = self.desc.features.watermark {
            draw::watermark(img, self.sf, word);
        }
    }

    fn display_name(&self) -> String {
        truncate_with_ellipsis(self.dt.name.clone(), 22)
    }
}

fn header_texts(img: &mut Surface, ctx: &Ctx<'_>, name_y: f32, sub_y: f32, main: Rgba<u8>, sub: Rgba<u8>) {
    let institution = truncate_with_ellipsis(ctx.dt.institution.clone(), 26);
    draw::draw_text_centered(img, fonts::bold(), ctx.px(18.0), ctx.s(160.0), ctx.s(name_y), main, &institution);
    draw::draw_text_centered(
        img,
        fonts::regular(),
        ctx.px(14.0),
        ctx.s(160.0),
        ctx.s(sub_y),
        sub,
        display::CARD_SUBTITLE,
    );
}

fn name_block(img: &mut Surface, ctx: &Ctx<'_>, name_y: f32, desig_y: f32, main: Rgba<u8>, sub: Rgba<u8>) {
    draw::draw_text_centered(
        img,
        fonts::bold(),
        ctx.px(20.0),
        ctx.s(160.0),
        ctx.s(name_y),
        main,
        &ctx.display_name(),
    );
    draw::draw_text_centered(
        img,
        fonts::regular(),
        ctx.px(14.0),
        ctx.s(160.0),
        ctx.s(desig_y),
        sub,
        &ctx.dt.designation,
    );
}

fn info_row(img: &mut Surface, ctx: &Ctx<'_>, label: &str, value: &str, y: f32, label_c: Rgba<u8>, value_c: Rgba<u8>) {
    let value = truncate_with_ellipsis(value.to_string(), 24);
    draw::labeled_value_line(
        img,
        label,
        &value,
        ctx.s(30.0),
        ctx.s(290.0),
        ctx.s(y),
        ctx.px(12.0),
        label_c,
        value_c,
    );
}

fn dates_right(img: &mut Surface, ctx: &Ctx<'_>, issued_y: f32, expiry_y: f32, color: Rgba<u8>) {
    let issued = format!("{} {}", display::LABEL_ISSUED, ctx.dt.issued);
    let expiry = format!("{} {}", display::LABEL_EXPIRY, ctx.dt.expiry);
    draw::draw_text_right(img, fonts::regular(), ctx.px(10.0), ctx.s(290.0), ctx.s(issued_y), color, &issued);
    draw::draw_text_right(img, fonts::regular(), ctx.px(10.0), ctx.s(290.0), ctx.s(expiry_y), color, &expiry);
}

async fn photo_block(img: &mut Surface, ctx: &Ctx<'_>, shape: PhotoShape, top_y: f32) {
    photo::composite(
        img,
        ctx.http,
        ctx.upload_dir,
        ctx.photo_url,
        shape,
        ctx.s(112.0),
        ctx.s(top_y),
        ctx.su(96.0),
        ctx.su(96.0),
        ctx.sf,
        white(255),
    )
    .await;
}

/// Classic: 3-stop diagonal gradient, rounded photo, single translucent
/// 3-row info box, corner radius 12. Geometry follows the original preview
/// card.
pub(crate) async fn classic(img: &mut Surface, ctx: &Ctx<'_>) {
    ctx.background_fill(img, 12.0);
    ctx.ornaments(img);

    draw::fill_circle(img, ctx.s(160.0), ctx.s(70.0), ctx.s(32.0), white(51));
    header_texts(img, ctx, 110.0, 130.0, white(255), white(230));

    photo_block(img, ctx, ctx.desc.features.photo_shape, 150.0).await;

    name_block(img, ctx, 280.0, 300.0, white(255), white(230));

    draw::fill_rounded_rect(img, ctx.s(20.0), ctx.s(320.0), ctx.su(280.0), ctx.su(100.0), ctx.su(8.0), white(26));
    info_row(img, ctx, display::LABEL_DEPARTMENT, &ctx.dt.department, 340.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_EMPLOYEE_ID, &ctx.dt.employee_id, 360.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_PHONE, &ctx.dt.phone, 380.0, white(204), white(255));

    qr::render_qr(img, ctx.dt, ctx.s(30.0), ctx.s(424.0), ctx.su(64.0)).await;
    dates_right(img, ctx, 450.0, 466.0, white(178));

    draw::stroke_border(
        img,
        0,
        0,
        img.width(),
        img.height(),
        ctx.su(12.0),
        ctx.su(2.0),
        white(76),
        ctx.desc.features.border,
    );
}

/// Modern: gradient with a translucent header band, circular photo, three
/// separate equal-width info cards, corner radius 20.
pub(crate) async fn modern(img: &mut Surface, ctx: &Ctx<'_>) {
    ctx.background_fill(img, 20.0);
    draw::fill_rounded_rect(img, 0, 0, img.width(), ctx.su(110.0), ctx.su(20.0), white(31));
    ctx.ornaments(img);

    header_texts(img, ctx, 56.0, 80.0, white(255), white(230));

    photo_block(img, ctx, PhotoShape::Circle, 124.0).await;

    name_block(img, ctx, 254.0, 274.0, white(255), white(230));

    // three equal-width cards
    let rows = [
        (display::LABEL_DEPARTMENT, ctx.dt.department.as_str()),
        (display::LABEL_EMPLOYEE_ID, ctx.dt.employee_id.as_str()),
        (display::LABEL_PHONE, ctx.dt.phone.as_str()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let x = 20.0 + i as f32 * 96.0;
        draw::fill_rounded_rect(img, ctx.s(x), ctx.s(300.0), ctx.su(88.0), ctx.su(84.0), ctx.su(10.0), white(26));
        let cx = ctx.s(x + 44.0);
        draw::draw_text_centered(img, fonts::regular(), ctx.px(10.0), cx, ctx.s(330.0), white(204), label);
        let value = truncate_with_ellipsis(value.to_string(), 11);
        draw::draw_text_centered(img, fonts::bold(), ctx.px(11.0), cx, ctx.s(356.0), white(255), &value);
    }

    qr::render_qr(img, ctx.dt, ctx.s(132.0), ctx.s(398.0), ctx.su(56.0)).await;

    let issued = format!("{} {}", display::LABEL_ISSUED, ctx.dt.issued);
    let expiry = format!("{} {}", display::LABEL_EXPIRY, ctx.dt.expiry);
    draw::draw_text_centered(img, fonts::regular(), ctx.px(10.0), ctx.s(160.0), ctx.s(472.0), white(178), &issued);
    draw::draw_text_centered(img, fonts::regular(), ctx.px(10.0), ctx.s(160.0), ctx.s(486.0), white(178), &expiry);
}

/// Minimal: flat background, solid rectangular border, square photo, plain
/// two-column rows without a box, dark text. Expiry runs one year longer.
pub(crate) async fn minimal(img: &mut Surface, ctx: &Ctx<'_>) {
    let p = &ctx.desc.palette;
    let flat = p.background.unwrap_or(white(255));
    draw::fill_rounded_rect(img, 0, 0, img.width(), img.height(), 0, flat);
    draw::stroke_border(
        img,
        0,
        0,
        img.width(),
        img.height(),
        0,
        ctx.su(2.0),
        p.accent,
        BorderStyle::Solid,
    );

    header_texts(img, ctx, 70.0, 92.0, p.primary, p.secondary);

    photo::composite(
        img,
        ctx.http,
        ctx.upload_dir,
        ctx.photo_url,
        PhotoShape::Square,
        ctx.s(112.0),
        ctx.s(120.0),
        ctx.su(96.0),
        ctx.su(96.0),
        ctx.sf,
        p.secondary,
    )
    .await;

    name_block(img, ctx, 250.0, 272.0, p.primary, p.secondary);

    info_row(img, ctx, display::LABEL_DEPARTMENT, &ctx.dt.department, 312.0, p.secondary, p.primary);
    info_row(img, ctx, display::LABEL_EMPLOYEE_ID, &ctx.dt.employee_id, 336.0, p.secondary, p.primary);
    info_row(img, ctx, display::LABEL_PHONE, &ctx.dt.phone, 360.0, p.secondary, p.primary);

    qr::render_qr(img, ctx.dt, ctx.s(128.0), ctx.s(386.0), ctx.su(64.0)).await;

    let issued = format!("{} {}", display::LABEL_ISSUED, ctx.dt.issued);
    let expiry = format!("{} {}", display::LABEL_EXPIRY, ctx.dt.expiry_extended);
    draw::draw_text_centered(img, fonts::regular(), ctx.px(10.0), ctx.s(160.0), ctx.s(472.0), p.secondary, &issued);
    draw::draw_text_centered(img, fonts::regular(), ctx.px(10.0), ctx.s(160.0), ctx.s(486.0), p.secondary, &expiry);
}

/// Professional: gradient, descriptor photo shape, 4-row box including the
/// institution, radius 12, optional nested double border.
pub(crate) async fn professional(img: &mut Surface, ctx: &Ctx<'_>) {
    ctx.background_fill(img, 12.0);
    ctx.ornaments(img);

    draw::stroke_border(
        img,
        ctx.s(4.0),
        ctx.s(4.0),
        img.width() - ctx.su(8.0),
        img.height() - ctx.su(8.0),
        ctx.su(10.0),
        ctx.su(2.0),
        white(102),
        ctx.desc.features.border,
    );

    draw::fill_circle(img, ctx.s(160.0), ctx.s(64.0), ctx.s(30.0), white(51));
    header_texts(img, ctx, 104.0, 124.0, white(255), white(230));

    photo_block(img, ctx, ctx.desc.features.photo_shape, 140.0).await;

    name_block(img, ctx, 268.0, 288.0, white(255), white(230));

    draw::fill_rounded_rect(img, ctx.s(20.0), ctx.s(305.0), ctx.su(280.0), ctx.su(124.0), ctx.su(8.0), white(26));
    info_row(img, ctx, display::LABEL_INSTITUTION, &ctx.dt.institution, 327.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_DEPARTMENT, &ctx.dt.department, 351.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_EMPLOYEE_ID, &ctx.dt.employee_id, 375.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_PHONE, &ctx.dt.phone, 399.0, white(204), white(255));

    qr::render_qr(img, ctx.dt, ctx.s(30.0), ctx.s(436.0), ctx.su(56.0)).await;
    dates_right(img, ctx, 456.0, 470.0, white(178));
}

/// Academic: gradient, circular emblem with a mortarboard glyph, 4-row box
/// including an email placeholder, radius 15.
pub(crate) async fn academic(img: &mut Surface, ctx: &Ctx<'_>) {
    ctx.background_fill(img, 15.0);
    ctx.ornaments(img);

    draw::fill_circle(img, ctx.s(160.0), ctx.s(66.0), ctx.s(32.0), white(51));
    emblem_cap(img, ctx, 160.0, 64.0);
    header_texts(img, ctx, 112.0, 132.0, white(255), white(230));

    photo_block(img, ctx, ctx.desc.features.photo_shape, 150.0).await;

    name_block(img, ctx, 278.0, 298.0, white(255), white(230));

    draw::fill_rounded_rect(img, ctx.s(20.0), ctx.s(315.0), ctx.su(280.0), ctx.su(124.0), ctx.su(8.0), white(26));
    info_row(img, ctx, display::LABEL_DEPARTMENT, &ctx.dt.department, 337.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_EMPLOYEE_ID, &ctx.dt.employee_id, 361.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_PHONE, &ctx.dt.phone, 385.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_EMAIL, &ctx.dt.email, 409.0, white(204), white(255));

    qr::render_qr(img, ctx.dt, ctx.s(234.0), ctx.s(432.0), ctx.su(56.0)).await;

    let issued = format!("{} {}", display::LABEL_ISSUED, ctx.dt.issued);
    let expiry = format!("{} {}", display::LABEL_EXPIRY, ctx.dt.expiry);
    draw::draw_text(img, fonts::regular(), ctx.px(10.0), ctx.s(30.0), ctx.s(456.0), white(178), &issued);
    draw::draw_text(img, fonts::regular(), ctx.px(10.0), ctx.s(30.0), ctx.s(470.0), white(178), &expiry);

    draw::stroke_border(
        img,
        0,
        0,
        img.width(),
        img.height(),
        ctx.su(15.0),
        ctx.su(2.0),
        white(76),
        ctx.desc.features.border,
    );
}

/// Government: 2-stop gradient, photo forced rounded, 5-row box with a fixed
/// joining-date row, radius 8.
pub(crate) async fn government(img: &mut Surface, ctx: &Ctx<'_>) {
    let p = &ctx.desc.palette;
    let r = ctx.su(8.0);
    if ctx.desc.features.gradient {
        draw::fill_gradient_rounded_rect(img, 0, 0, img.width(), img.height(), r, &[p.primary, p.accent]);
    } else {
        draw::fill_rounded_rect(img, 0, 0, img.width(), img.height(), r, p.background.unwrap_or(p.primary));
    }
    ctx.ornaments(img);

    header_texts(img, ctx, 56.0, 76.0, white(255), white(230));

    // rounded regardless of descriptor
    photo_block(img, ctx, PhotoShape::Rounded, 100.0).await;

    name_block(img, ctx, 228.0, 248.0, white(255), white(230));

    draw::fill_rounded_rect(img, ctx.s(20.0), ctx.s(265.0), ctx.su(280.0), ctx.su(150.0), ctx.su(8.0), white(26));
    info_row(img, ctx, display::LABEL_DEPARTMENT, &ctx.dt.department, 287.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_EMPLOYEE_ID, &ctx.dt.employee_id, 311.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_PHONE, &ctx.dt.phone, 335.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_INSTITUTION, &ctx.dt.institution, 359.0, white(204), white(255));
    info_row(img, ctx, display::LABEL_JOINED, display::JOINING_DATE_PLACEHOLDER, 383.0, white(204), white(255));

    qr::render_qr(img, ctx.dt, ctx.s(30.0), ctx.s(428.0), ctx.su(48.0)).await;
    dates_right(img, ctx, 450.0, 464.0, white(178));

    draw::stroke_border(
        img,
        0,
        0,
        img.width(),
        img.height(),
        r,
        ctx.su(2.0),
        white(102),
        ctx.desc.features.border,
    );
}

/// Corporate: gradient, accent header band, photo forced rounded, 3-row box
/// with larger padding, radius 18.
pub(crate) async fn corporate(img: &mut Surface, ctx: &Ctx<'_>) {
    ctx.background_fill(img, 18.0);
    ctx.ornaments(img);

    let band = draw::with_alpha(ctx.desc.palette.accent, 140);
    draw::fill_rounded_rect(img, ctx.s(12.0), ctx.s(14.0), ctx.su(296.0), ctx.su(64.0), ctx.su(12.0), band);
    header_texts(img, ctx, 42.0, 64.0, white(255), white(230));

    // rounded regardless of descriptor
    photo_block(img, ctx, PhotoShape::Rounded, 100.0).await;

    name_block(img, ctx, 230.0, 250.0, white(255), white(230));

    draw::fill_rounded_rect(img, ctx.s(24.0), ctx.s(268.0), ctx.su(272.0), ctx.su(116.0), ctx.su(12.0), white(26));
    let rows = [
        (display::LABEL_DEPARTMENT, ctx.dt.department.as_str()),
        (display::LABEL_EMPLOYEE_ID, ctx.dt.employee_id.as_str()),
        (display::LABEL_PHONE, ctx.dt.phone.as_str()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let y = 298.0 + i as f32 * 30.0;
        let value = truncate_with_ellipsis(value.to_string(), 24);
        draw::labeled_value_line(
            img,
            label,
            &value,
            ctx.s(40.0),
            ctx.s(280.0),
            ctx.s(y),
            ctx.px(12.0),
            white(204),
            white(255),
        );
    }

    qr::render_qr(img, ctx.dt, ctx.s(130.0), ctx.s(404.0), ctx.su(60.0)).await;
    dates_right(img, ctx, 478.0, 492.0, white(178));
}

/// Small mortarboard drawn from primitives so it never depends on emoji
/// glyph coverage.
fn emblem_cap(img: &mut Surface, ctx: &Ctx<'_>, cx: f32, cy: f32) {
    let (x, y) = (ctx.s(cx), ctx.s(cy));
    let hw = ctx.s(16.0);
    let hh = ctx.s(7.0);
    let color = white(230);
    draw::fill_triangle(img, (x - hw, y), (x, y - hh), (x + hw, y), color);
    draw::fill_triangle(img, (x - hw, y), (x, y + hh), (x + hw, y), color);
    draw::fill_rect(img, x - ctx.s(7.0), y + ctx.s(3.0), ctx.su(14.0), ctx.su(7.0), color);
    draw::draw_line(img, x + hw, y, x + hw, y + ctx.s(12.0), color);
    draw::fill_circle(img, x + hw, y + ctx.s(13.0), ctx.s(2.0).max(1), color);
}
