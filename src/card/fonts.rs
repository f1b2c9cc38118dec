use once_cell::sync::Lazy;
use rusttype::Font;

// Faces are embedded so rendering never depends on a system font path.
// Noto Sans Bengali covers the Bengali block (labels, dates in Bengali
// numerals) as well as Latin.
static REGULAR: Lazy<Font<'static>> = Lazy::new(|| {
    Font::try_from_bytes(include_bytes!("../../assets/fonts/NotoSansBengali-Regular.ttf"))
        .expect("embedded regular font parses")
});

static BOLD: Lazy<Font<'static>> = Lazy::new(|| {
    Font::try_from_bytes(include_bytes!("../../assets/fonts/NotoSansBengali-Bold.ttf"))
        .expect("embedded bold font parses")
});

pub fn regular() -> &'static Font<'static> {
    &REGULAR
}

pub fn bold() -> &'static Font<'static> {
    &BOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bengali_digits_have_glyphs() {
        for c in '০'..='৯' {
            assert_ne!(regular().glyph(c).id().0, 0, "regular missing {c}");
            assert_ne!(bold().glyph(c).id().0, 0, "bold missing {c}");
        }
    }

    #[test]
    fn label_and_latin_text_has_glyphs() {
        for c in "মেয়াদ:বিভাগ:আইডি:EMP0123N/A".chars() {
            assert_ne!(regular().glyph(c).id().0, 0, "regular missing {c}");
        }
    }
}
