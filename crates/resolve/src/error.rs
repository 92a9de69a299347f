use std::fmt;

#[derive(Debug)]
pub enum ResolveError {
    /// Missing required column in the export header.
    MissingColumn { column: String },
    /// CSV read / parse error.
    Csv(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => {
                write!(f, "export is missing column '{column}'")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for ResolveError {}
