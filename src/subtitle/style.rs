//! Render-time subtitle styling.
//!
//! A [`StyleSpec`] holds the `force_style` parameter handed to the burn
//! filter: either an opaque caller-supplied string or the default attribute
//! table combined with a font name derived from the fetched font file.

/// Default style attributes, in emission order. `FontName` is prepended.
const DEFAULT_STYLE_ATTRS: &[(&str, &str)] = &[
    ("FontSize", "24"),
    ("PrimaryColour", "&H00E0E0E0"),
    ("Outline", "2"),
    ("OutlineColour", "&H00000000"),
    ("Shadow", "1"),
    ("BackColour", "&H80000000"),
    ("BorderStyle", "1"),
    ("MarginV", "60"),
    ("Alignment", "2"),
];

/// Fallback family when a derived font name sanitizes to nothing.
const FALLBACK_FONT: &str = "Sans";

/// A `force_style` override for the subtitle burn filter.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    force_style: String,
}

impl StyleSpec {
    /// Use a caller-supplied style string as-is.
    ///
    /// The value is treated as opaque here; the render invoker escapes it
    /// when embedding it in the filter expression.
    pub fn custom(style: impl Into<String>) -> Self {
        Self {
            force_style: style.into(),
        }
    }

    /// Build the default style for the given font family name.
    pub fn with_font(font_name: &str) -> Self {
        let font = sanitize_font_name(font_name);
        let mut attrs = Vec::with_capacity(DEFAULT_STYLE_ATTRS.len() + 1);
        attrs.push(format!("FontName={font}"));
        attrs.extend(
            DEFAULT_STYLE_ATTRS
                .iter()
                .map(|(key, value)| format!("{key}={value}")),
        );
        Self {
            force_style: attrs.join(","),
        }
    }

    /// The style as a `force_style` parameter value.
    pub fn as_force_style(&self) -> &str {
        &self.force_style
    }
}

/// Restrict a derived font name to characters that cannot alter the
/// `force_style` attribute list it is embedded in.
pub fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_FONT.to_string()
    } else {
        cleaned.to_string()
    }
}
