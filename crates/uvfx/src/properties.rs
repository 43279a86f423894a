//! User-editable property schema, as plain data for the host's UI.

use serde::Serialize;

/// Extensions accepted by the file picker. Every entry is readable by
/// [`FileDecoder`](crate::FileDecoder).
pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "tga", "png", "jpeg", "jpg", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Property {
    Path {
        key: &'static str,
        label: &'static str,
        filter: String,
    },
    Bool {
        key: &'static str,
        label: &'static str,
    },
}

impl Property {
    pub fn key(&self) -> &'static str {
        match self {
            Property::Path { key, .. } | Property::Bool { key, .. } => key,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Property::Path { label, .. } | Property::Bool { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Properties {
    pub items: Vec<Property>,
}

impl Properties {
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.items.iter().find(|property| property.key() == key)
    }
}

/// File dialog filter string, one `Label (*.ext ...)` group per format.
pub fn image_filter() -> String {
    let all = IMAGE_EXTENSIONS
        .iter()
        .map(|ext| format!("*.{ext}"))
        .collect::<Vec<_>>()
        .join(" ");

    let formats = [
        ("BMP Files", "*.bmp"),
        ("Targa Files", "*.tga"),
        ("PNG Files", "*.png"),
        ("JPEG Files", "*.jpeg *.jpg"),
        ("GIF Files", "*.gif"),
        ("WebP Files", "*.webp"),
        ("All Files", "*.*"),
    ];

    std::iter::once(format!("All formats ({all})"))
        .chain(
            formats
                .iter()
                .map(|(label, pattern)| format!("{label} ({pattern})")),
        )
        .collect::<Vec<_>>()
        .join(";;")
}

/// The schema shown for every overlay instance. `is_slide` is never exposed.
pub fn describe() -> Properties {
    Properties {
        items: vec![
            Property::Path {
                key: "file",
                label: "File",
                filter: image_filter(),
            },
            Property::Bool {
                key: "unload",
                label: "Unload image when not showing",
            },
            Property::Bool {
                key: "linear_alpha",
                label: "Apply alpha in linear space",
            },
        ],
    }
}
