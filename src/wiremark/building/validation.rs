//! Field validation rules applied by the builders.

use once_cell::sync::Lazy;
use regex::Regex;

/// Declaration and component names: PascalCase identifiers.
static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9_]*$").unwrap());

/// CSS custom property names, optionally vendor-prefixed.
static CSS_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[a-zA-Z][a-zA-Z0-9-]*$").unwrap());

/// Modifiers that take a numeric suffix.
static SIZED_MODIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:gap|cols)-[0-9]+$").unwrap());

/// Layout modifiers without arguments.
pub const LAYOUT_MODIFIERS: &[&str] = &[
    "center", "start", "end", "between", "around", "wrap", "fill", "scroll", "bordered",
    "padded",
];

/// Button styles other than `default`.
pub const BUTTON_VARIANTS: &[&str] = &["primary", "secondary", "danger", "ghost", "outline"];

pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

pub fn is_valid_css_name(name: &str) -> bool {
    CSS_NAME_REGEX.is_match(name)
}

pub fn is_valid_modifier(modifier: &str) -> bool {
    LAYOUT_MODIFIERS.contains(&modifier) || SIZED_MODIFIER_REGEX.is_match(modifier)
}

/// Split modifiers into accepted ones and rejected ones, both in source order.
pub fn partition_modifiers(modifiers: Vec<String>) -> (Vec<String>, Vec<String>) {
    modifiers.into_iter().partition(|m| is_valid_modifier(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Home", true)]
    #[case("UserSettings2", true)]
    #[case("Edit_Profile", true)]
    #[case("home", false)]
    #[case("My Home", false)]
    #[case("2Fast", false)]
    #[case("", false)]
    fn test_names(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(is_valid_name(name), valid);
    }

    #[rstest]
    #[case("primary-color", true)]
    #[case("-webkit-gap", true)]
    #[case("radius", true)]
    #[case("1st", false)]
    #[case("bad name", false)]
    fn test_css_names(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(is_valid_css_name(name), valid);
    }

    #[test]
    fn test_partition_modifiers() {
        let (valid, invalid) = partition_modifiers(vec![
            "center".into(),
            "gap-4".into(),
            "gap-x".into(),
            "cols-12".into(),
            "wobble".into(),
        ]);
        assert_eq!(valid, vec!["center", "gap-4", "cols-12"]);
        assert_eq!(invalid, vec!["gap-x", "wobble"]);
    }
}
