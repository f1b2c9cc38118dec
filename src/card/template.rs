use image::Rgba;
use once_cell::sync::Lazy;

/// The seven fixed card arrangements. Dispatch is over this closed enum,
/// never over the raw template id string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Classic,
    Modern,
    Minimal,
    Professional,
    Academic,
    Government,
    Corporate,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 7] = [
        LayoutKind::Classic,
        LayoutKind::Modern,
        LayoutKind::Minimal,
        LayoutKind::Professional,
        LayoutKind::Academic,
        LayoutKind::Government,
        LayoutKind::Corporate,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoShape {
    Square,
    Circle,
    Rounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderStyle {
    Solid,
    Dashed,
    None,
    Double,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    Circles,
    Triangles,
    Lines,
    Glyphs,
    Hexagons,
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub primary: Rgba<u8>,
    pub secondary: Rgba<u8>,
    pub accent: Rgba<u8>,
    pub background: Option<Rgba<u8>>,
}

#[derive(Clone, Copy, Debug)]
pub struct Features {
    pub gradient: bool,
    pub pattern: Option<PatternKind>,
    pub watermark: Option<&'static str>,
    pub photo_shape: PhotoShape,
    pub border: BorderStyle,
}

#[derive(Clone, Debug)]
pub struct TemplateDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub layout: LayoutKind,
    pub palette: Palette,
    pub features: Features,
}

pub const DEFAULT_TEMPLATE_ID: &str = "classic-blue";

fn rgb(s: &str) -> Rgba<u8> {
    let b = hex::decode(s.trim_start_matches('#')).expect("palette hex");
    Rgba([b[0], b[1], b[2], 255])
}

static TEMPLATES: Lazy<Vec<TemplateDescriptor>> = Lazy::new(|| {
    vec![
        TemplateDescriptor {
            id: "classic-blue",
            name: "ক্লাসিক ব্লু",
            layout: LayoutKind::Classic,
            palette: Palette {
                primary: rgb("#3B82F6"),
                secondary: rgb("#8B5CF6"),
                accent: rgb("#1E40AF"),
                background: None,
            },
            features: Features {
                gradient: true,
                pattern: Some(PatternKind::Circles),
                watermark: None,
                photo_shape: PhotoShape::Rounded,
                border: BorderStyle::None,
            },
        },
        TemplateDescriptor {
            id: "modern-gradient",
            name: "আধুনিক গ্রেডিয়েন্ট",
            layout: LayoutKind::Modern,
            palette: Palette {
                primary: rgb("#4F46E5"),
                secondary: rgb("#DB2777"),
                accent: rgb("#7C3AED"),
                background: None,
            },
            features: Features {
                gradient: true,
                pattern: Some(PatternKind::Lines),
                watermark: Some("modern"),
                photo_shape: PhotoShape::Circle,
                border: BorderStyle::None,
            },
        },
        TemplateDescriptor {
            id: "nature-green",
            name: "প্রকৃতি সবুজ",
            layout: LayoutKind::Academic,
            palette: Palette {
                primary: rgb("#059669"),
                secondary: rgb("#0D9488"),
                accent: rgb("#047857"),
                background: None,
            },
            features: Features {
                gradient: true,
                pattern: Some(PatternKind::Hexagons),
                watermark: None,
                photo_shape: PhotoShape::Rounded,
                border: BorderStyle::Solid,
            },
        },
        TemplateDescriptor {
            id: "minimal-white",
            name: "সাদা মিনিমাল",
            layout: LayoutKind::Minimal,
            palette: Palette {
                primary: rgb("#1F2937"),
                secondary: rgb("#4B5563"),
                accent: rgb("#111827"),
                background: Some(rgb("#FFFFFF")),
            },
            features: Features {
                gradient: false,
                pattern: None,
                watermark: None,
                photo_shape: PhotoShape::Square,
                border: BorderStyle::Solid,
            },
        },
        TemplateDescriptor {
            id: "royal-red",
            name: "রাজকীয় লাল",
            layout: LayoutKind::Professional,
            palette: Palette {
                primary: rgb("#DC2626"),
                secondary: rgb("#EC4899"),
                accent: rgb("#B91C1C"),
                background: None,
            },
            features: Features {
                gradient: true,
                pattern: Some(PatternKind::Triangles),
                watermark: Some("professional"),
                photo_shape: PhotoShape::Rounded,
                border: BorderStyle::Double,
            },
        },
        TemplateDescriptor {
            id: "deep-blue",
            name: "গাঢ় নীল",
            layout: LayoutKind::Government,
            palette: Palette {
                primary: rgb("#4F46E5"),
                secondary: rgb("#3B82F6"),
                accent: rgb("#1E3A8A"),
                background: None,
            },
            features: Features {
                gradient: true,
                pattern: Some(PatternKind::Circles),
                watermark: Some("government"),
                photo_shape: PhotoShape::Rounded,
                border: BorderStyle::Solid,
            },
        },
        TemplateDescriptor {
            id: "corporate-gold",
            name: "কর্পোরেট গোল্ড",
            layout: LayoutKind::Corporate,
            palette: Palette {
                primary: rgb("#CA8A04"),
                secondary: rgb("#EA580C"),
                accent: rgb("#92400E"),
                background: None,
            },
            features: Features {
                gradient: true,
                pattern: Some(PatternKind::Glyphs),
                watermark: Some("corporate"),
                photo_shape: PhotoShape::Rounded,
                border: BorderStyle::None,
            },
        },
        TemplateDescriptor {
            id: "tech-purple",
            name: "টেক পার্পল",
            layout: LayoutKind::Modern,
            palette: Palette {
                primary: rgb("#7C3AED"),
                secondary: rgb("#8B5CF6"),
                accent: rgb("#5B21B6"),
                background: None,
            },
            features: Features {
                gradient: true,
                pattern: Some(PatternKind::Lines),
                watermark: Some("official"),
                photo_shape: PhotoShape::Circle,
                border: BorderStyle::None,
            },
        },
    ]
});

pub fn all() -> &'static [TemplateDescriptor] {
    &TEMPLATES
}

/// Never fails: unknown ids resolve to the default descriptor.
pub fn resolve(template_id: &str) -> &'static TemplateDescriptor {
    TEMPLATES
        .iter()
        .find(|t| t.id == template_id)
        .unwrap_or_else(|| {
            TEMPLATES
                .iter()
                .find(|t| t.id == DEFAULT_TEMPLATE_ID)
                .expect("default template registered")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_resolves_to_default() {
        let t = resolve("nonexistent");
        assert_eq!(t.id, DEFAULT_TEMPLATE_ID);
        assert_eq!(t.layout, LayoutKind::Classic);
    }

    #[test]
    fn every_layout_kind_has_a_descriptor() {
        for kind in LayoutKind::ALL {
            assert!(
                all().iter().any(|t| t.layout == kind),
                "no descriptor for {kind:?}"
            );
        }
    }

    #[test]
    fn canonical_ids_are_registered() {
        for id in [
            "classic-blue",
            "modern-gradient",
            "nature-green",
            "minimal-white",
            "royal-red",
            "deep-blue",
            "corporate-gold",
            "tech-purple",
        ] {
            assert_eq!(resolve(id).id, id);
        }
    }
}
