//! # Casing Transforms
//!
//! Model classes and field names are written in dromedary/Pascal case
//! (`dataType`, `OrganizationalUnit`), schema URLs and vocabulary names in
//! kebab case (`data-type`, `organizational-unit`).

use std::sync::LazyLock;

use regex::Regex;

static TEXT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z_-]+").expect("valid regex"));

/// Convert `dromedaryCase` or `PascalCase` to `kebab-case`.
///
/// A hyphen is inserted before every uppercase letter that follows a
/// lowercase letter or digit, and before the last capital of an acronym
/// run that is followed by a lowercase letter (`MExPerson` → `m-ex-person`).
pub fn dromedary_to_kebab(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                out.push('-');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Apply `repl` to the textual runs of `value` only.
///
/// Runs are maximal sequences of ASCII letters, `_` and `-`. Everything
/// else, such as `/`, `#` and digits, is copied through untouched.
pub fn sub_only_text(repl: impl Fn(&str) -> String, value: &str) -> String {
    TEXT_TOKEN
        .replace_all(value, |caps: &regex::Captures<'_>| repl(&caps[0]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dromedary_to_kebab() {
        assert_eq!(dromedary_to_kebab("dataType"), "data-type");
        assert_eq!(dromedary_to_kebab("DataType"), "data-type");
        assert_eq!(dromedary_to_kebab("OrganizationalUnit"), "organizational-unit");
        assert_eq!(dromedary_to_kebab("resource"), "resource");
        assert_eq!(dromedary_to_kebab("already-kebab"), "already-kebab");
        assert_eq!(dromedary_to_kebab("MExPerson"), "m-ex-person");
        assert_eq!(dromedary_to_kebab("level2Unit"), "level2-unit");
        assert_eq!(dromedary_to_kebab(""), "");
    }

    #[test]
    fn test_kebab_is_idempotent() {
        for input in ["PrimarySource", "accessRestriction", "x"] {
            let once = dromedary_to_kebab(input);
            assert_eq!(dromedary_to_kebab(&once), once);
        }
    }

    #[test]
    fn test_sub_only_text_leaves_separators() {
        assert_eq!(
            sub_only_text(dromedary_to_kebab, "/schema/entities/PrimarySource#/identifier"),
            "/schema/entities/primary-source#/identifier"
        );
        assert_eq!(
            sub_only_text(dromedary_to_kebab, "/schema/fields/DataType"),
            "/schema/fields/data-type"
        );
        assert_eq!(sub_only_text(|s| s.to_uppercase(), "a1b/c"), "A1B/C");
    }
}
