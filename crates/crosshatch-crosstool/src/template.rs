//! Scanner for `%{variable}` flag and environment value templates.
//!
//! A template is literal text interspersed with `%{name}` references, where `name` may be a
//! dotted path into a structured variable. `%%` stands for a literal percent sign; any other
//! use of `%` is malformed. Parsing is shared between load-time validation and expansion so
//! the two can never disagree on what a template means.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Literal(&'a str),
    /// An escaped `%%`.
    Percent,
    Variable(&'a str),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError {
    #[error("'%' must be followed by '%' or '{{'")]
    BarePercent,

    #[error("unterminated variable reference")]
    Unterminated,

    #[error("empty variable reference")]
    EmptyVariable,
}

pub fn parse(template: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let mut pieces = Vec::new();
    let mut rest = template;

    while let Some(at) = rest.find('%') {
        if at > 0 {
            pieces.push(Piece::Literal(&rest[..at]));
        }
        rest = &rest[at + 1..];

        match rest.as_bytes().first().copied() {
            Some(b'%') => {
                pieces.push(Piece::Percent);
                rest = &rest[1..];
            }
            Some(b'{') => {
                let Some(end) = rest.find('}') else {
                    return Err(TemplateError::Unterminated);
                };
                let name = &rest[1..end];
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariable);
                }
                pieces.push(Piece::Variable(name));
                rest = &rest[end + 1..];
            }
            _ => return Err(TemplateError::BarePercent),
        }
    }

    if !rest.is_empty() {
        pieces.push(Piece::Literal(rest));
    }

    Ok(pieces)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::template::{Piece, TemplateError, parse};

    #[test]
    fn literal_only() {
        assert_eq!(parse("-Wall").unwrap(), vec![Piece::Literal("-Wall")]);
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn single_variable() {
        assert_eq!(
            parse("-I%{include_path}").unwrap(),
            vec![Piece::Literal("-I"), Piece::Variable("include_path")]
        );
    }

    #[test]
    fn dotted_variable() {
        assert_eq!(
            parse("%{lib.name}").unwrap(),
            vec![Piece::Variable("lib.name")]
        );
    }

    #[test]
    fn multiple_variables() {
        assert_eq!(
            parse("--sysroot=%{sysroot}/usr/%{arch}").unwrap(),
            vec![
                Piece::Literal("--sysroot="),
                Piece::Variable("sysroot"),
                Piece::Literal("/usr/"),
                Piece::Variable("arch"),
            ]
        );
    }

    #[test]
    fn escaped_percent() {
        assert_eq!(
            parse("-fprofile=%%{p}").unwrap(),
            vec![
                Piece::Literal("-fprofile="),
                Piece::Percent,
                Piece::Literal("{p}"),
            ]
        );
    }

    #[test]
    fn malformed() {
        assert_eq!(parse("100%").unwrap_err(), TemplateError::BarePercent);
        assert_eq!(parse("%sysroot").unwrap_err(), TemplateError::BarePercent);
        assert_eq!(parse("%{sysroot").unwrap_err(), TemplateError::Unterminated);
        assert_eq!(parse("%{}").unwrap_err(), TemplateError::EmptyVariable);
    }
}
