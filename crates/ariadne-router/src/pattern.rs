//! Path-pattern grammar.
//!
//! A pattern is split on `/` into segments, each of which is one of:
//!
//! - a literal (`users`), matched by identical input text;
//! - a parameter (`:id`), optionally constrained (`:id{\d+}`), matched by
//!   any single non-empty input segment and bound under its name;
//! - the wildcard (`*`), matched by the rest of the path and bound under
//!   [`WILDCARD_PARAM`].

use regex::Regex;

use crate::error::RouteError;

/// Marker that opens a parameter segment.
pub const PARAM_MARKER: char = ':';

/// A segment consisting of exactly this text is the wildcard.
pub const WILDCARD_MARKER: &str = "*";

/// Name the wildcard's captured remainder is bound under.
pub const WILDCARD_PARAM: &str = "*";

/// A compiled, anchored parameter constraint.
#[derive(Debug, Clone)]
pub struct Constraint {
    source: String,
    regex: Regex,
}

impl Constraint {
    /// Compiles `source` so that it must match the whole segment.
    pub fn new(name: &str, source: &str) -> Result<Self, RouteError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            RouteError::InvalidConstraint {
                name: name.to_string(),
                constraint: source.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The constraint as written in the pattern.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the whole segment satisfies the constraint.
    #[must_use]
    pub fn is_match(&self, segment: &str) -> bool {
        self.regex.is_match(segment)
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Constraint {}

/// One parsed pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text.
    Literal(String),
    /// Named parameter with an optional constraint.
    Param {
        /// Parameter name.
        name: String,
        /// Optional constraint.
        constraint: Option<Constraint>,
    },
    /// Catch-all for the remaining path.
    Wildcard,
}

/// Splits a path or pattern into raw segments.
///
/// The leading separator is dropped; `""` and `"/"` both yield no
/// segments. Interior and trailing empty segments are kept, which is what
/// makes trailing separators significant in strict mode.
pub(crate) fn split(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Parses a full pattern into segments.
pub fn parse(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    let raw = split(pattern);
    let last = raw.len().saturating_sub(1);

    raw.iter()
        .enumerate()
        .map(|(i, s)| {
            let segment = parse_segment(s)?;
            if segment == Segment::Wildcard && i != last {
                return Err(RouteError::WildcardNotLast {
                    pattern: pattern.to_string(),
                });
            }
            Ok(segment)
        })
        .collect()
}

fn parse_segment(raw: &str) -> Result<Segment, RouteError> {
    if raw == WILDCARD_MARKER {
        return Ok(Segment::Wildcard);
    }

    let Some(spec) = raw.strip_prefix(PARAM_MARKER) else {
        return Ok(Segment::Literal(raw.to_string()));
    };

    let (name, constraint) = match spec.find('{') {
        Some(open) => {
            let body = spec[open + 1..]
                .strip_suffix('}')
                .ok_or_else(|| RouteError::UnbalancedBrace {
                    segment: raw.to_string(),
                })?;
            (&spec[..open], Some(body))
        }
        None if spec.contains('}') => {
            return Err(RouteError::UnbalancedBrace {
                segment: raw.to_string(),
            })
        }
        None => (spec, None),
    };

    if name.is_empty() {
        return Err(RouteError::EmptyParamName {
            segment: raw.to_string(),
        });
    }

    let constraint = match constraint {
        Some(body) if !body.is_empty() => Some(Constraint::new(name, body)?),
        _ => None,
    };

    Ok(Segment::Param {
        name: name.to_string(),
        constraint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str) -> Segment {
        Segment::Param {
            name: name.to_string(),
            constraint: None,
        }
    }

    #[test]
    fn test_split() {
        assert!(split("").is_empty());
        assert!(split("/").is_empty());
        assert_eq!(split("/users/42"), vec!["users", "42"]);
        assert_eq!(split("/users/42/"), vec!["users", "42", ""]);
    }

    #[test]
    fn test_parse_literal() {
        let segments = parse("/users/list").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("users".to_string()),
                Segment::Literal("list".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_param() {
        let segments = parse("/users/:id").unwrap();
        assert_eq!(segments[1], param("id"));
    }

    #[test]
    fn test_parse_constrained_param() {
        let segments = parse(r"/users/:id{\d+}").unwrap();
        match &segments[1] {
            Segment::Param {
                name,
                constraint: Some(c),
            } => {
                assert_eq!(name, "id");
                assert_eq!(c.source(), r"\d+");
                assert!(c.is_match("42"));
                assert!(!c.is_match("42a"));
            }
            other => panic!("expected constrained param, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested_braces_in_constraint() {
        let segments = parse(r"/years/:year{\d{4}}").unwrap();
        match &segments[1] {
            Segment::Param {
                constraint: Some(c),
                ..
            } => {
                assert!(c.is_match("2024"));
                assert!(!c.is_match("24"));
            }
            other => panic!("expected constrained param, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_wildcard() {
        let segments = parse("/files/*").unwrap();
        assert_eq!(segments[1], Segment::Wildcard);
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let err = parse("/files/*/raw").unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotLast { .. }));
    }

    #[test]
    fn test_empty_param_name() {
        assert!(matches!(
            parse("/users/:").unwrap_err(),
            RouteError::EmptyParamName { .. }
        ));
        assert!(matches!(
            parse(r"/users/:{\d+}").unwrap_err(),
            RouteError::EmptyParamName { .. }
        ));
    }

    #[test]
    fn test_unbalanced_brace() {
        assert!(matches!(
            parse(r"/users/:id{\d+").unwrap_err(),
            RouteError::UnbalancedBrace { .. }
        ));
        assert!(matches!(
            parse("/users/:id}").unwrap_err(),
            RouteError::UnbalancedBrace { .. }
        ));
    }

    #[test]
    fn test_invalid_constraint() {
        let err = parse("/users/:id{[}").unwrap_err();
        assert!(matches!(err, RouteError::InvalidConstraint { .. }));
    }

    #[test]
    fn test_star_inside_literal_is_literal() {
        let segments = parse("/files/*.png").unwrap();
        assert_eq!(segments[1], Segment::Literal("*.png".to_string()));
    }
}
