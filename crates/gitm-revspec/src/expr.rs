//! The reference-expression grammar.
//!
//! `<anchor><modifier>*` where the anchor is a branch name, tag name, hash
//! (full or abbreviated), or `HEAD`, and each modifier is one of:
//!
//! - `^` — first parent
//! - `~N` — N-th first-parent ancestor (`~` alone means `~1`)
//! - `@{date}` — latest commit at or before `date`

use gitm_types::Timestamp;

use crate::error::{ResolveError, ResolveResult};

/// The leading name part of an expression, before any modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// The symbolic `HEAD`.
    Head,
    /// A branch, tag, or (abbreviated) hash; disambiguated at resolution.
    Name(String),
}

/// One navigation modifier, applied left to right.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// `^` — move to the first parent.
    Parent,
    /// `~N` — move N first-parent steps up.
    Ancestor(u32),
    /// `@{date}` — move to the latest commit at or before the date.
    AtDate(Timestamp),
}

/// A parsed reference expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevSpec {
    pub anchor: Anchor,
    pub steps: Vec<Step>,
}

impl RevSpec {
    /// Returns `true` if the expression has no navigation modifiers.
    pub fn is_plain(&self) -> bool {
        self.steps.is_empty()
    }

    /// Parse an expression string.
    pub fn parse(expr: &str) -> ResolveResult<Self> {
        let expr = expr.trim();
        let fail = |reason: &str| {
            Err(ResolveError::BadSyntax {
                expr: expr.to_string(),
                reason: reason.to_string(),
            })
        };

        if expr.is_empty() {
            return fail("empty expression");
        }

        // The anchor runs up to the first modifier character.
        let split = expr
            .char_indices()
            .find(|&(i, c)| c == '^' || c == '~' || expr[i..].starts_with("@{"))
            .map(|(i, _)| i)
            .unwrap_or(expr.len());
        let (anchor_str, mut rest) = expr.split_at(split);

        if anchor_str.is_empty() {
            return fail("expression must start with a name, hash, or HEAD");
        }
        let anchor = if anchor_str == "HEAD" {
            Anchor::Head
        } else {
            Anchor::Name(anchor_str.to_string())
        };

        let mut steps = Vec::new();
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix('^') {
                steps.push(Step::Parent);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('~') {
                let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
                let n = if digits.is_empty() {
                    1
                } else {
                    match digits.parse() {
                        Ok(n) => n,
                        Err(_) => return fail("ancestor count out of range"),
                    }
                };
                steps.push(Step::Ancestor(n));
                rest = &tail[digits.len()..];
            } else if let Some(tail) = rest.strip_prefix("@{") {
                let Some(close) = tail.find('}') else {
                    return fail("unterminated '@{'");
                };
                let date = Timestamp::parse(&tail[..close]).map_err(|e| {
                    ResolveError::BadSyntax {
                        expr: expr.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                steps.push(Step::AtDate(date));
                rest = &tail[close + 1..];
            } else {
                return fail("unexpected trailing characters");
            }
        }

        Ok(Self { anchor, steps })
    }
}
