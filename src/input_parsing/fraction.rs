//! Inline fraction expansion.  Users type transition probabilities as
//! fractions (`1/3`), so the parser rewrites every rational literal into
//! its decimal value before any structural parsing happens.

use std::borrow::Cow;

/// A rational literal recognized in the input text, `numerator/denominator`,
/// with optional whitespace around the slash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RationalLiteral {
    pub numerator: f64,
    pub denominator: f64,
    /// Byte length of the literal in the source text
    pub len: usize,
}

impl RationalLiteral {
    /// Recognize a rational literal at the very start of `text`.  Both sides
    /// are `DIGITS` or `DIGITS.DIGITS`; signs are left to the surrounding
    /// text.
    pub fn recognize(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let numerator_end = scan_decimal(bytes, 0)?;
        let mut cursor = skip_whitespace(bytes, numerator_end);
        if bytes.get(cursor) != Some(&b'/') {
            return None;
        }
        cursor = skip_whitespace(bytes, cursor + 1);
        let denominator_start = cursor;
        let denominator_end = scan_decimal(bytes, denominator_start)?;
        Some(Self {
            numerator: text[..numerator_end].parse().ok()?,
            denominator: text[denominator_start..denominator_end].parse().ok()?,
            len: denominator_end,
        })
    }

    /// The quotient, or `None` when it does not evaluate to a finite number
    /// (division by zero).
    pub fn value(&self) -> Option<f64> {
        let value = self.numerator / self.denominator;
        if value.is_finite() {
            Some(value)
        } else {
            None
        }
    }
}

/// Scan `DIGITS` or `DIGITS.DIGITS` starting at `start`, returning the end
/// index.  A trailing dot without digits is not part of the number.
fn scan_decimal(bytes: &[u8], start: usize) -> Option<usize> {
    let integer_end = scan_digits(bytes, start);
    if integer_end == start {
        return None;
    }
    if bytes.get(integer_end) == Some(&b'.') {
        let fraction_end = scan_digits(bytes, integer_end + 1);
        if fraction_end > integer_end + 1 {
            return Some(fraction_end);
        }
    }
    Some(integer_end)
}

fn scan_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn skip_whitespace(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    end
}

/// Replace every rational literal in `text` with its decimal value.
/// Literals that do not evaluate (`1/0`) are kept verbatim, so the
/// structural parser can later report them as non-numeric.  Text without
/// any slash is returned borrowed.
pub fn expand_fractions(text: &str) -> Cow<'_, str> {
    if !text.contains('/') {
        return Cow::Borrowed(text);
    }
    let mut expanded = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(ch) = text[cursor..].chars().next() {
        if ch.is_ascii_digit() {
            if let Some(literal) = RationalLiteral::recognize(&text[cursor..]) {
                match literal.value() {
                    Some(value) => expanded.push_str(&value.to_string()),
                    None => expanded.push_str(&text[cursor..cursor + literal.len]),
                }
                cursor += literal.len;
                continue;
            }
        }
        expanded.push(ch);
        cursor += ch.len_utf8();
    }
    Cow::Owned(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_integer_and_decimal_literals() {
        let literal = RationalLiteral::recognize("3/4, 1").unwrap();
        assert_eq![3.0, literal.numerator];
        assert_eq![4.0, literal.denominator];
        assert_eq![3, literal.len];
        let literal = RationalLiteral::recognize("3.5 / 2]").unwrap();
        assert_eq![Some(1.75), literal.value()];
        assert_eq![7, literal.len];
    }

    #[test]
    fn rejects_non_literals() {
        assert_eq![None, RationalLiteral::recognize("0.5")];
        assert_eq![None, RationalLiteral::recognize("/2")];
        assert_eq![None, RationalLiteral::recognize("1/")];
        assert_eq![None, RationalLiteral::recognize("1./2")];
    }

    #[test]
    fn zero_denominator_does_not_evaluate() {
        let literal = RationalLiteral::recognize("1/0").unwrap();
        assert_eq![None, literal.value()];
    }

    #[test]
    fn expands_fractions_in_place() {
        assert_eq!["0.75", expand_fractions("3/4")];
        assert_eq!["1.75", expand_fractions("3.5 / 2")];
        assert_eq!["0.5,0.5;0,1", expand_fractions("1/2,1/2;0,1")];
        assert_eq!["[[0.25, 0.75]]", expand_fractions("[[1/4, 3/4]]")];
        assert_eq!["-0.5", expand_fractions("-1/2")];
        assert_eq!["2", expand_fractions("4/2")];
    }

    #[test]
    fn keeps_unevaluable_fractions() {
        assert_eq!["1/0, 0.5", expand_fractions("1/0, 1/2")];
    }

    #[test]
    fn text_without_slash_is_borrowed() {
        assert![matches!(expand_fractions("0.5, 0.5"), Cow::Borrowed(_))];
    }
}
