//! Ref name validation following git-style conventions.
//!
//! A valid name is non-empty, contains no whitespace or revision-syntax
//! characters (`~`, `^`, `:`, `?`, `*`, `[`, `\`), no `..` or `@{`, does
//! not start or end with `.` or `/`, has no empty or dot-leading path
//! components, and does not end with `.lock`.

use crate::error::{RefError, RefResult};

const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a branch or tag name.
///
/// Rejecting revision-syntax characters here keeps ref names and reference
/// expressions unambiguous: `main^` can only ever mean "parent of main".
pub fn validate_ref_name(name: &str) -> RefResult<()> {
    let fail = |reason: String| {
        Err(RefError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return fail("name must not be empty".into());
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return fail(format!("contains forbidden character {ch:?}"));
    }
    if name.contains("..") {
        return fail("must not contain '..'".into());
    }
    if name.contains("@{") {
        return fail("must not contain '@{'".into());
    }
    if name.starts_with('.') || name.ends_with('.') {
        return fail("must not start or end with '.'".into());
    }
    if name.starts_with('/') || name.ends_with('/') {
        return fail("must not start or end with '/'".into());
    }
    if name.ends_with(".lock") {
        return fail("must not end with '.lock'".into());
    }
    for component in name.split('/') {
        if component.is_empty() {
            return fail("path components must not be empty".into());
        }
        if component.starts_with('.') {
            return fail(format!("component must not start with '.': {component:?}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["main", "develop", "my-branch", "v1.0", "feature/auth", "user/alice/fix-123"] {
            assert!(validate_ref_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn reject_empty() {
        assert!(validate_ref_name("").is_err());
    }

    #[test]
    fn reject_revision_syntax_chars() {
        for name in ["a~1", "a^", "a:b", "a?b", "a*b", "a[b", "a\\b", "ref@{0}"] {
            assert!(validate_ref_name(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn reject_whitespace() {
        for name in ["has space", "has\ttab", "has\nnewline"] {
            assert!(validate_ref_name(name).is_err());
        }
    }

    #[test]
    fn reject_double_dot() {
        assert!(validate_ref_name("bad..name").is_err());
    }

    #[test]
    fn reject_boundary_dots_and_slashes() {
        for name in [".hidden", "trailing.", "/leading", "trailing/", "a//b", "feature/.hidden"] {
            assert!(validate_ref_name(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn reject_lock_suffix() {
        assert!(validate_ref_name("main.lock").is_err());
    }
}
