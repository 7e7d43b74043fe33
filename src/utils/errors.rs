use thiserror::Error;

/// `ParseError` enumerates the ways user-typed matrix and vector text can be
/// rejected by the input parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Represents empty or whitespace-only input text
    #[error("empty input")]
    EmptyInput,

    /// Represents a bracketed literal that is not a valid array of numbers
    #[error("malformed structured literal: {reason}")]
    MalformedLiteral { reason: String },

    /// Represents a matrix row holding a token that is not a finite number
    #[error("non-numeric value in row {row}")]
    NonNumericRow { row: usize },

    /// Represents a vector holding a token that is not a finite number
    #[error("non-numeric value in vector")]
    NonNumericVector,

    /// Represents matrix rows with differing column counts
    #[error("inconsistent row lengths: row {row} has {found} columns, expected {expected}")]
    InconsistentRowLengths {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// Represents matrix text that contains no rows at all
    #[error("matrix has no rows")]
    NoRows,
}

/// `ValidationError` enumerates parsed or numeric inputs that are well formed
/// but cannot be analyzed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Represents a transition matrix with differing row and column counts
    #[error("matrix not square: {rows} rows, {columns} columns")]
    NotSquare { rows: usize, columns: usize },

    /// Represents an initial vector that does not match the matrix dimension
    #[error("dimension mismatch: vector has {vector} entries, matrix dimension is {matrix}")]
    DimensionMismatch { vector: usize, matrix: usize },

    /// Represents a non-positive (or non-finite) arrival or service rate
    #[error("arrival and service rates must be positive (lambda = {lambda}, mu = {mu})")]
    NonPositiveRate { lambda: f64, mu: f64 },

    /// Represents a queueing model name outside the supported set
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    /// Represents an infinite-capacity queue whose utilization reaches 1
    #[error("system unstable for {model} (rho = {rho} >= 1)")]
    Unstable { model: String, rho: f64 },

    /// Represents a finite-capacity model requested without a capacity
    #[error("{model} requires a finite capacity")]
    CapacityRequired { model: String },

    /// Represents a step count, server count, or capacity above its
    /// supported maximum
    #[error("{parameter} = {value} exceeds the supported maximum of {max}")]
    LimitExceeded {
        parameter: String,
        value: i64,
        max: usize,
    },
}

/// `AnalysisError` enumerates all possible errors returned by stochastic-lab
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Transparent input parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Transparent input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_messages() {
        assert_eq!(ParseError::EmptyInput.to_string(), "empty input");
        assert_eq!(
            ParseError::NonNumericRow { row: 2 }.to_string(),
            "non-numeric value in row 2"
        );
        assert_eq!(
            ParseError::InconsistentRowLengths {
                row: 2,
                found: 1,
                expected: 2
            }
            .to_string(),
            "inconsistent row lengths: row 2 has 1 columns, expected 2"
        );
    }

    #[test]
    fn validation_errors_pass_through_analysis_error() {
        let err: AnalysisError = ValidationError::NotSquare {
            rows: 2,
            columns: 3,
        }
        .into();
        assert_eq!(err.to_string(), "matrix not square: 2 rows, 3 columns");
        let err: AnalysisError = ValidationError::UnsupportedModel(String::from("G/G/1")).into();
        assert_eq!(err.to_string(), "unsupported model: G/G/1");
    }

    #[test]
    fn analysis_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<AnalysisError>();
    }
}
