//! In-literal string interpolation parsing (§4.2).
//!
//! The parser — not the lexer — re-scans the raw (pre-escape) lexeme of a
//! text token that contains `$` into static parts, embedded expressions, and
//! format specifiers. A `${expr:fmt}` embedded expression is currently
//! simplified to a bare identifier equal to the text before the `:`, per the
//! source grammar.

use crate::ast::{Expression, FormatSpec, Ident, Position, StringInterpolation};

/// Returns `None` (plain text, no interpolation) if `raw` contains no `$`.
pub fn parse(raw: &str, position: Position) -> Option<StringInterpolation> {
    if !raw.contains('$') {
        return None;
    }

    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    let mut current = String::new();
    let mut parts = vec![];
    let mut exprs = vec![];
    let mut formats = vec![];

    while i < chars.len() {
        if chars[i] == '$' && i + 1 < chars.len() {
            parts.push(unescape_segment(&current));
            current.clear();

            if chars[i + 1] == '{' {
                let start = i + 2;
                let mut j = start;
                while j < chars.len() && chars[j] != '}' {
                    j += 1;
                }
                let inner: String = chars[start..j].iter().collect();
                let (name, fmt) = split_format(&inner);
                exprs.push(Expression::Ident(Ident::new(name.trim(), position)));
                formats.push(fmt);
                i = if j < chars.len() { j + 1 } else { j };
            } else {
                let start = i + 1;
                let mut j = start;
                while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                    j += 1;
                }
                let name: String = chars[start..j].iter().collect();
                exprs.push(Expression::Ident(Ident::new(name, position)));
                formats.push(FormatSpec::Empty);
                i = j;
            }
        } else {
            current.push(chars[i]);
            i += 1;
        }
    }
    parts.push(unescape_segment(&current));

    Some(StringInterpolation::new(parts, exprs, formats, position))
}

fn split_format(inner: &str) -> (String, FormatSpec) {
    match inner.rfind(':') {
        Some(idx) => {
            let name = &inner[..idx];
            let spec = match &inner[idx + 1..] {
                "d" => FormatSpec::Decimal,
                "f" => FormatSpec::Float,
                "s" => FormatSpec::Str,
                _ => FormatSpec::Empty,
            };
            (name.to_string(), spec)
        }
        None => (inner.to_string(), FormatSpec::Empty),
    }
}

fn unescape_segment(segment: &str) -> String {
    unescape::unescape(segment).unwrap_or_else(|| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(1, 1)
    }

    #[test]
    fn plain_text_has_no_interpolation() {
        assert!(parse("hello world", pos()).is_none());
    }

    #[test]
    fn parses_bare_ident_interpolation() {
        let interp = parse("hi $name!", pos()).unwrap();
        assert_eq!(interp.parts, vec!["hi ".to_string(), "!".to_string()]);
        assert_eq!(interp.exprs.len(), 1);
        assert_eq!(interp.formats, vec![FormatSpec::Empty]);
        match &interp.exprs[0] {
            Expression::Ident(id) => assert_eq!(id.name, "name"),
            other => panic!("expected ident, got {other:?}"),
        }
    }

    #[test]
    fn parses_braced_interpolation_with_format() {
        let interp = parse("n = ${count:d} items", pos()).unwrap();
        assert_eq!(interp.parts, vec!["n = ".to_string(), " items".to_string()]);
        assert_eq!(interp.formats, vec![FormatSpec::Decimal]);
    }

    #[test]
    fn part_count_is_expr_count_plus_one() {
        let interp = parse("$a-$b-$c", pos()).unwrap();
        assert_eq!(interp.exprs.len(), 3);
        assert_eq!(interp.parts.len(), 4);
        assert_eq!(interp.formats.len(), 3);
    }
}
