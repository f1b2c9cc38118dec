use rusttype::{point, Font, Scale};

use super::fonts;
use super::template::{BorderStyle, PatternKind};
use super::Surface;

pub fn white(alpha: u8) -> image::Rgba<u8> {
    image::Rgba([255, 255, 255, alpha])
}

pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> image::Rgba<u8> {
    image::Rgba([r, g, b, a])
}

pub fn with_alpha(c: image::Rgba<u8>, alpha: u8) -> image::Rgba<u8> {
    image::Rgba([c.0[0], c.0[1], c.0[2], alpha])
}

/// Source-over blend of one pixel, bounds-checked.
pub fn blend_px(img: &mut Surface, x: i32, y: i32, color: image::Rgba<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= img.width() || y >= img.height() {
        return;
    }
    let a = color.0[3] as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    let inv = 1.0 - a;
    dst.0[0] = (color.0[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
    dst.0[1] = (color.0[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
    dst.0[2] = (color.0[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
    dst.0[3] = dst.0[3].max(color.0[3]);
}

/// Opaque fill of the whole surface.
pub fn clear(img: &mut Surface, color: image::Rgba<u8>) {
    for px in img.pixels_mut() {
        *px = image::Rgba([color.0[0], color.0[1], color.0[2], 255]);
    }
}

fn in_rounded(xx: i32, yy: i32, w: i32, h: i32, r: i32) -> bool {
    if xx < 0 || yy < 0 || xx >= w || yy >= h {
        return false;
    }
    if r <= 0 {
        return true;
    }
    // Corner circle test, one quadrant at a time.
    let (cx, cy) = if xx < r {
        if yy < r {
            (r - 1, r - 1)
        } else if yy >= h - r {
            (r - 1, h - r)
        } else {
            return true;
        }
    } else if xx >= w - r {
        if yy < r {
            (w - r, r - 1)
        } else if yy >= h - r {
            (w - r, h - r)
        } else {
            return true;
        }
    } else {
        return true;
    };
    let dx = xx - cx;
    let dy = yy - cy;
    dx * dx + dy * dy <= r * r
}

pub fn fill_rect(img: &mut Surface, x: i32, y: i32, w: u32, h: u32, color: image::Rgba<u8>) {
    for yy in 0..h as i32 {
        for xx in 0..w as i32 {
            blend_px(img, x + xx, y + yy, color);
        }
    }
}

pub fn fill_rounded_rect(
    img: &mut Surface,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    r: u32,
    color: image::Rgba<u8>,
) {
    let (wi, hi, ri) = (w as i32, h as i32, r as i32);
    for yy in 0..hi {
        for xx in 0..wi {
            if in_rounded(xx, yy, wi, hi, ri) {
                blend_px(img, x + xx, y + yy, color);
            }
        }
    }
}

fn lerp_color(a: image::Rgba<u8>, b: image::Rgba<u8>, t: f32) -> image::Rgba<u8> {
    let mix = |p: u8, q: u8| (p as f32 + (q as f32 - p as f32) * t) as u8;
    image::Rgba([
        mix(a.0[0], b.0[0]),
        mix(a.0[1], b.0[1]),
        mix(a.0[2], b.0[2]),
        255,
    ])
}

fn gradient_at(stops: &[image::Rgba<u8>], t: f32) -> image::Rgba<u8> {
    debug_assert!(stops.len() >= 2);
    let t = t.clamp(0.0, 1.0);
    let seg = t * (stops.len() - 1) as f32;
    let i = (seg.floor() as usize).min(stops.len() - 2);
    lerp_color(stops[i], stops[i + 1], seg - i as f32)
}

/// Diagonal linear gradient (top-left to bottom-right) clipped to a rounded
/// outline. Matches the canvas `createLinearGradient(0, 0, w, h)` fill.
pub fn fill_gradient_rounded_rect(
    img: &mut Surface,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    r: u32,
    stops: &[image::Rgba<u8>],
) {
    let (wi, hi, ri) = (w as i32, h as i32, r as i32);
    let span = (wi + hi - 2).max(1) as f32;
    for yy in 0..hi {
        for xx in 0..wi {
            if in_rounded(xx, yy, wi, hi, ri) {
                let t = (xx + yy) as f32 / span;
                blend_px(img, x + xx, y + yy, gradient_at(stops, t));
            }
        }
    }
}

fn stroke_rounded(
    img: &mut Surface,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    r: i32,
    t: i32,
    color: image::Rgba<u8>,
    dash: Option<i32>,
) {
    for yy in 0..h {
        for xx in 0..w {
            let outer = in_rounded(xx, yy, w, h, r);
            let inner = in_rounded(xx - t, yy - t, w - 2 * t, h - 2 * t, (r - t).max(0));
            if outer && !inner {
                if let Some(d) = dash {
                    if ((xx + yy) / d) % 2 == 1 {
                        continue;
                    }
                }
                blend_px(img, x + xx, y + yy, color);
            }
        }
    }
}

/// Border stroke honoring the descriptor's style. `Double` nests a second
/// stroke inside the first.
pub fn stroke_border(
    img: &mut Surface,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    r: u32,
    thickness: u32,
    color: image::Rgba<u8>,
    style: BorderStyle,
) {
    let (wi, hi, ri, ti) = (w as i32, h as i32, r as i32, thickness.max(1) as i32);
    match style {
        BorderStyle::None => {}
        BorderStyle::Solid => stroke_rounded(img, x, y, wi, hi, ri, ti, color, None),
        BorderStyle::Dashed => {
            stroke_rounded(img, x, y, wi, hi, ri, ti, color, Some((ti * 4).max(6)))
        }
        BorderStyle::Double => {
            stroke_rounded(img, x, y, wi, hi, ri, ti, color, None);
            let inset = ti * 2 + 2;
            stroke_rounded(
                img,
                x + inset,
                y + inset,
                wi - 2 * inset,
                hi - 2 * inset,
                (ri - inset).max(0),
                ti,
                color,
                None,
            );
        }
    }
}

pub fn fill_circle(img: &mut Surface, cx: i32, cy: i32, radius: i32, color: image::Rgba<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                blend_px(img, cx + dx, cy + dy, color);
            }
        }
    }
}

pub fn stroke_circle(
    img: &mut Surface,
    cx: i32,
    cy: i32,
    radius: i32,
    thickness: i32,
    color: image::Rgba<u8>,
) {
    let inner = (radius - thickness).max(0);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = dx * dx + dy * dy;
            if d2 <= radius * radius && d2 > inner * inner {
                blend_px(img, cx + dx, cy + dy, color);
            }
        }
    }
}

pub fn fill_triangle(
    img: &mut Surface,
    a: (i32, i32),
    b: (i32, i32),
    c: (i32, i32),
    color: image::Rgba<u8>,
) {
    let edge = |p: (i32, i32), q: (i32, i32), x: i32, y: i32| {
        (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
    };
    let min_x = a.0.min(b.0).min(c.0);
    let max_x = a.0.max(b.0).max(c.0);
    let min_y = a.1.min(b.1).min(c.1);
    let max_y = a.1.max(b.1).max(c.1);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let e0 = edge(a, b, x, y);
            let e1 = edge(b, c, x, y);
            let e2 = edge(c, a, x, y);
            if (e0 >= 0 && e1 >= 0 && e2 >= 0) || (e0 <= 0 && e1 <= 0 && e2 <= 0) {
                blend_px(img, x, y, color);
            }
        }
    }
}

pub fn draw_line(
    img: &mut Surface,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: image::Rgba<u8>,
) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = dx.abs().max(dy.abs()).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = x0 as f32 + dx as f32 * t;
        let y = y0 as f32 + dy as f32 * t;
        blend_px(img, x.round() as i32, y.round() as i32, color);
    }
}

/// Low-opacity ornamental motif. Purely decorative: callers never derive
/// geometry from it.
pub fn decorative_pattern(img: &mut Surface, sf: f32, kind: PatternKind) {
    let w = img.width() as i32;
    let h = img.height() as i32;
    let s = |v: f32| (v * sf).round() as i32;
    match kind {
        PatternKind::Circles => {
            fill_circle(img, w - s(32.0), s(32.0), s(64.0), white(26));
            fill_circle(img, s(32.0), h - s(32.0), s(48.0), white(26));
        }
        PatternKind::Triangles => {
            for &(x, y, size) in &[(48.0f32, 96.0f32, 36.0f32), (256.0, 210.0, 28.0), (72.0, 430.0, 32.0)] {
                let (x, y, r) = (s(x), s(y), s(size));
                fill_triangle(img, (x, y - r), (x - r, y + r), (x + r, y + r), white(20));
            }
        }
        PatternKind::Lines => {
            let step = s(24.0).max(2);
            let mut x = s(16.0);
            while x < w {
                fill_rect(img, x, 0, s(2.0).max(1) as u32, h as u32, white(15));
                x += step;
            }
        }
        PatternKind::Glyphs => {
            let step = s(48.0).max(4);
            let r = s(6.0).max(1);
            let mut y = s(32.0);
            let mut row = 0;
            while y < h {
                let mut x = if row % 2 == 0 { s(24.0) } else { s(48.0) };
                while x < w {
                    // small diamond, drawn from primitives
                    fill_triangle(img, (x - r, y), (x, y - r), (x + r, y), white(20));
                    fill_triangle(img, (x - r, y), (x, y + r), (x + r, y), white(20));
                    x += step;
                }
                y += step;
                row += 1;
            }
        }
        PatternKind::Hexagons => {
            let r = s(22.0).max(3);
            let step_x = r * 3;
            let step_y = (r as f32 * 1.73) as i32;
            let mut y = 0;
            let mut row = 0;
            while y < h + r {
                let offset = if row % 2 == 0 { 0 } else { step_x / 2 };
                let mut x = offset;
                while x < w + r {
                    hexagon_outline(img, x, y, r, white(20));
                    x += step_x;
                }
                y += step_y;
                row += 1;
            }
        }
    }
}

fn hexagon_outline(img: &mut Surface, cx: i32, cy: i32, r: i32, color: image::Rgba<u8>) {
    let mut pts = [(0i32, 0i32); 6];
    for (i, p) in pts.iter_mut().enumerate() {
        let angle = std::f32::consts::PI / 3.0 * i as f32 + std::f32::consts::FRAC_PI_6;
        *p = (
            cx + (r as f32 * angle.cos()).round() as i32,
            cy + (r as f32 * angle.sin()).round() as i32,
        );
    }
    for i in 0..6 {
        let (x0, y0) = pts[i];
        let (x1, y1) = pts[(i + 1) % 6];
        draw_line(img, x0, y0, x1, y1, color);
    }
}

/// One large word, heavily transparent, rotated 45 degrees around the
/// surface center.
pub fn watermark(img: &mut Surface, sf: f32, word: &str) {
    let font = fonts::bold();
    let px = 48.0 * sf;
    let scale = Scale::uniform(px);
    let tw = text_width(font, px, word);
    let v_metrics = font.v_metrics(scale);
    let cx = img.width() as f32 / 2.0;
    let cy = img.height() as f32 / 2.0;
    // -45°: text reads bottom-left to top-right
    let angle = -std::f32::consts::FRAC_PI_4;
    let (sin, cos) = angle.sin_cos();

    let glyphs: Vec<_> = font
        .layout(word, scale, point(-tw / 2.0, v_metrics.ascent / 2.0))
        .collect();
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let tx = (bb.min.x + gx as i32) as f32;
                let ty = (bb.min.y + gy as i32) as f32;
                let rx = tx * cos - ty * sin;
                let ry = tx * sin + ty * cos;
                let a = (v * 7.0) as u8; // ≈3% peak alpha
                if a > 0 {
                    blend_px(
                        img,
                        (cx + rx).round() as i32,
                        (cy + ry).round() as i32,
                        white(a),
                    );
                }
            });
        }
    }
}

/// Generic silhouette drawn wherever a photo is unavailable.
pub fn user_icon(img: &mut Surface, cx: i32, cy: i32, sf: f32, color: image::Rgba<u8>) {
    let s = |v: f32| (v * sf).round() as i32;
    // head
    fill_circle(img, cx, cy - s(10.0), s(12.0), color);
    // shoulders: upper half disc
    let r = s(20.0);
    let base_y = cy + s(24.0);
    for dy in -r..=0 {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                blend_px(img, cx + dx, base_y + dy, color);
            }
        }
    }
}

pub fn text_width(font: &Font<'static>, px: f32, text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();

    let mut width: f32 = 0.0;
    for g in &glyphs {
        if let Some(bb) = g.pixel_bounding_box() {
            width = width.max(bb.max.x as f32);
        }
        width = width.max(g.position().x + g.unpositioned().h_metrics().advance_width);
    }
    width
}

/// Draw text with `y` as the baseline, alpha-blending glyph coverage.
pub fn draw_text(
    img: &mut Surface,
    font: &Font<'static>,
    px: f32,
    x: i32,
    baseline_y: i32,
    color: image::Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let color_alpha = color.0[3] as f32 / 255.0;
    for glyph in font.layout(text, scale, point(x as f32, baseline_y as f32)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let a = (v * color_alpha * 255.0) as u8;
                if a > 0 {
                    blend_px(
                        img,
                        bb.min.x + gx as i32,
                        bb.min.y + gy as i32,
                        with_alpha(color, a),
                    );
                }
            });
        }
    }
}

pub fn draw_text_centered(
    img: &mut Surface,
    font: &Font<'static>,
    px: f32,
    center_x: i32,
    baseline_y: i32,
    color: image::Rgba<u8>,
    text: &str,
) {
    let w = text_width(font, px, text);
    draw_text(img, font, px, center_x - (w / 2.0).round() as i32, baseline_y, color, text);
}

pub fn draw_text_right(
    img: &mut Surface,
    font: &Font<'static>,
    px: f32,
    right_x: i32,
    baseline_y: i32,
    color: image::Rgba<u8>,
    text: &str,
) {
    let w = text_width(font, px, text);
    draw_text(img, font, px, right_x - w.round() as i32, baseline_y, color, text);
}

/// The recurring two-column info row: left-aligned label, right-aligned bold
/// value, shared baseline.
#[allow(clippy::too_many_arguments)]
pub fn labeled_value_line(
    img: &mut Surface,
    label: &str,
    value: &str,
    left_x: i32,
    right_x: i32,
    baseline_y: i32,
    px: f32,
    label_color: image::Rgba<u8>,
    value_color: image::Rgba<u8>,
) {
    draw_text(img, fonts::regular(), px, left_x, baseline_y, label_color, label);
    draw_text_right(img, fonts::bold(), px, right_x, baseline_y, value_color, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn surface(w: u32, h: u32) -> Surface {
        Surface::from_pixel(w, h, Rgba([0, 0, 0, 0]))
    }

    #[test]
    fn clear_makes_every_pixel_opaque() {
        let mut img = surface(10, 10);
        clear(&mut img, rgba(200, 200, 200, 255));
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn rounded_fill_leaves_corners_untouched() {
        let mut img = surface(40, 40);
        fill_rounded_rect(&mut img, 0, 0, 40, 40, 10, rgba(255, 0, 0, 255));
        assert_eq!(img.get_pixel(0, 0).0[3], 0, "corner must stay empty");
        assert_eq!(img.get_pixel(20, 20).0[0], 255, "center must be filled");
    }

    #[test]
    fn gradient_spans_the_stops() {
        let mut img = surface(64, 64);
        let stops = [rgba(0, 0, 0, 255), rgba(255, 255, 255, 255)];
        fill_gradient_rounded_rect(&mut img, 0, 0, 64, 64, 0, &stops);
        let tl = img.get_pixel(0, 0).0[0];
        let br = img.get_pixel(63, 63).0[0];
        assert!(tl < 10 && br > 245, "tl={tl} br={br}");
    }

    #[test]
    fn blend_is_clipped_at_bounds() {
        let mut img = surface(4, 4);
        blend_px(&mut img, -1, 0, white(255));
        blend_px(&mut img, 4, 4, white(255));
        fill_circle(&mut img, 0, 0, 10, white(255));
        draw_line(&mut img, -5, -5, 10, 10, white(255));
        // no panic is the assertion; spot-check one inside pixel
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn text_is_rasterized() {
        let mut img = surface(100, 30);
        draw_text(&mut img, fonts::bold(), 16.0, 2, 20, white(255), "EMP001234");
        assert!(img.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn right_alignment_stays_left_of_edge() {
        let w = text_width(fonts::bold(), 12.0, "EMP001234");
        assert!(w > 0.0 && w < 100.0);
    }

    #[test]
    fn bengali_dates_rasterize_distinctly() {
        let mut a = surface(200, 40);
        let mut b = surface(200, 40);
        draw_text(&mut a, fonts::regular(), 16.0, 2, 28, white(255), "০১/০১/২০২৪");
        draw_text(&mut b, fonts::regular(), 16.0, 2, 28, white(255), "৩১/১২/২০২৫");
        assert!(a.pixels().any(|p| p.0[3] > 0));
        assert_ne!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn double_border_draws_two_rings() {
        let mut img = surface(60, 60);
        stroke_border(&mut img, 0, 0, 60, 60, 6, 2, rgba(255, 0, 0, 255), BorderStyle::Double);
        // outer ring
        assert!(img.get_pixel(30, 0).0[0] == 255);
        // gap between rings
        assert_eq!(img.get_pixel(30, 4).0[3], 0);
        // inner ring
        assert!(img.get_pixel(30, 7).0[0] == 255);
    }
}
