// SPDX-License-Identifier: Apache-2.0

//! The two small recognized enumerations from design §6 (`style`,
//! `syntax`). Shared between the Public Compile Façade and the Protocol
//! Codec, so they live here rather than in either crate alone.

/// CSS output style. Spec.md §6 lists a fourth value, `nested`, but the
/// Embedded Sass wire protocol this system delegates to has never
/// accepted it as a wire discriminant — it is a legacy Dart-API-only
/// alias for `Expanded`. Callers that pass `nested` get mapped to
/// `Expanded` at the façade boundary (see `OutputStyle::from_legacy_name`);
/// recorded as an Open Question resolution in DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compact,
    Compressed,
}

impl OutputStyle {
    /// Maps the legacy `nested` alias onto `Expanded`; every other name
    /// passes through unchanged. Callers that already have an
    /// `OutputStyle` in hand (rather than a caller-supplied string) never
    /// need this.
    pub fn from_legacy_name(name: &str) -> Option<Self> {
        match name {
            "expanded" | "nested" => Some(OutputStyle::Expanded),
            "compact" => Some(OutputStyle::Compact),
            "compressed" => Some(OutputStyle::Compressed),
            _ => None,
        }
    }
}

/// Input syntax: SCSS, the indented ("Sass") syntax, or plain CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputSyntax {
    #[default]
    Scss,
    Indented,
    Css,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_is_an_alias_for_expanded() {
        assert_eq!(OutputStyle::from_legacy_name("nested"), Some(OutputStyle::Expanded));
        assert_eq!(OutputStyle::from_legacy_name("expanded"), Some(OutputStyle::Expanded));
    }

    #[test]
    fn unknown_style_name_is_none() {
        assert_eq!(OutputStyle::from_legacy_name("fancy"), None);
    }
}
