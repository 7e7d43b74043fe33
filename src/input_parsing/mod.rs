//! The input parsing module turns free-form text, as typed into a teaching
//! tool, into numeric matrices and vectors.  Two layouts are accepted:
//!
//! * Structured literals, `[[0.75, 0.25], [0.2, 0.8]]` or `[1, 0]`.
//! * Delimited text, with rows separated by line breaks or `;` and columns
//! by `,`, for example `0.75,0.25;0.2,0.8`.
//!
//! Fractions such as `1/3` may appear anywhere in either layout.  They are
//! expanded to decimals by a separate pre-pass (see `fraction`), before the
//! structural parse runs.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod fraction;

pub use self::fraction::{expand_fractions, RationalLiteral};
use crate::utils::errors::ParseError;

/// Step count used when the requested count is absent or unusable.
pub const DEFAULT_STEPS: usize = 10;

/// A rectangular matrix of finite floats, stored row-major.  Construction
/// rejects ragged rows, so every row is guaranteed to have `column_count()`
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// This constructor method creates a matrix from its rows, checking that
    /// there is at least one row and that all rows have equal length.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ParseError> {
        let expected = rows.first().ok_or(ParseError::NoRows)?.len();
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            return Err(ParseError::InconsistentRowLengths {
                row: index + 1,
                found: row.len(),
                expected,
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_square(&self) -> bool {
        self.row_count() == self.column_count()
    }

    /// Row-vector times matrix, `next[j] = Σ_i vector[i] * self[i][j]`.  The
    /// caller guarantees `vector.len() == self.row_count()`.
    pub fn left_multiply(&self, vector: &[f64]) -> Vec<f64> {
        let mut product = vec![0.0; self.column_count()];
        for (weight, row) in vector.iter().zip(&self.rows) {
            for (accumulator, entry) in product.iter_mut().zip(row) {
                *accumulator += weight * entry;
            }
        }
        product
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = ParseError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.rows
    }
}

/// Parse matrix text in either the structured or the delimited layout.
pub fn parse_matrix(text: &str) -> Result<Matrix, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let expanded = expand_fractions(trimmed);
    if expanded.starts_with('[') {
        parse_structured_matrix(&expanded)
    } else {
        parse_delimited_matrix(&expanded)
    }
}

/// Parse vector text in either the structured or the delimited layout.
pub fn parse_vector(text: &str) -> Result<Vec<f64>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let expanded = expand_fractions(trimmed);
    if expanded.starts_with('[') {
        parse_structured_vector(&expanded)
    } else {
        expanded
            .split(',')
            .map(parse_number)
            .collect::<Option<Vec<f64>>>()
            .ok_or(ParseError::NonNumericVector)
    }
}

/// Read a step count the way a numeric text box is read: the leading
/// integer is taken, and anything absent, non-numeric, or negative falls
/// back to `DEFAULT_STEPS`.  Counts too large for `usize` saturate, and are
/// left for the Markov step limit to reject.
pub fn parse_steps(text: &str) -> usize {
    let trimmed = text.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(index, ch)| !(ch.is_ascii_digit() || (*index == 0 && (*ch == '+' || *ch == '-'))))
        .map_or(trimmed.len(), |(index, _)| index);
    match trimmed[..digits_end].parse::<i64>() {
        Ok(steps) if steps >= 0 => usize::try_from(steps).unwrap_or(usize::MAX),
        _ => DEFAULT_STEPS,
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn malformed(reason: String) -> ParseError {
    ParseError::MalformedLiteral { reason }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|number| number.is_finite())
}

fn parse_structured_matrix(text: &str) -> Result<Matrix, ParseError> {
    let parsed: Value = serde_json::from_str(text).map_err(|err| malformed(err.to_string()))?;
    let outer = parsed
        .as_array()
        .ok_or_else(|| malformed(String::from("expected an array of rows")))?;
    if outer.is_empty() {
        return Err(malformed(String::from("expected at least one row")));
    }
    let rows = outer
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let entries = row
                .as_array()
                .ok_or_else(|| malformed(format!("row {} is not an array", row_index + 1)))?;
            entries
                .iter()
                .enumerate()
                .map(|(column_index, entry)| {
                    finite_number(entry).ok_or_else(|| {
                        malformed(format!(
                            "invalid value at row {}, column {}",
                            row_index + 1,
                            column_index + 1
                        ))
                    })
                })
                .collect::<Result<Vec<f64>, ParseError>>()
        })
        .collect::<Result<Vec<Vec<f64>>, ParseError>>()?;
    Matrix::new(rows)
}

fn parse_structured_vector(text: &str) -> Result<Vec<f64>, ParseError> {
    let parsed: Value = serde_json::from_str(text).map_err(|err| malformed(err.to_string()))?;
    let entries = parsed
        .as_array()
        .ok_or_else(|| malformed(String::from("expected an array of numbers")))?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            finite_number(entry)
                .ok_or_else(|| malformed(format!("invalid value at position {}", index + 1)))
        })
        .collect()
}

fn parse_delimited_matrix(text: &str) -> Result<Matrix, ParseError> {
    let rows = text
        .split(|ch: char| ch == '\r' || ch == '\n' || ch == ';')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .enumerate()
        .map(|(index, row)| {
            row.split(',')
                .map(parse_number)
                .collect::<Option<Vec<f64>>>()
                .ok_or(ParseError::NonNumericRow { row: index + 1 })
        })
        .collect::<Result<Vec<Vec<f64>>, ParseError>>()?;
    Matrix::new(rows)
}
