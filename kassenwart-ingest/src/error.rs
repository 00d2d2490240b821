use thiserror::Error;

/// Errors that abort a statement load. A date that fails to parse is not
/// one of them: the row is kept with a null parsed date and a warning.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("required column \"{0}\" is missing from the statement header")]
    MissingColumn(&'static str),

    #[error("line {line}: column \"{column}\" holds \"{value}\", expected a decimal number")]
    Numeric {
        column: &'static str,
        value: String,
        line: usize,
    },

    #[error("reading statement: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),
}
