use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No output strategy registered for format: {0}")]
    UnknownFormat(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Failed to resolve directive {directive}: {cause}")]
    Resolution {
        directive: usize,
        #[source]
        cause: Box<Error>,
    },

    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Wrap a failure with the id of the directive it belongs to.
    pub fn for_directive(directive: usize, cause: Error) -> Self {
        Error::Resolution {
            directive,
            cause: Box::new(cause),
        }
    }

    /// True for failures that abort a document run (fail-fast policy).
    /// Structural parse issues never reach this type; they degrade into
    /// literal text inside the scanner.
    pub fn is_fatal_for_document(&self) -> bool {
        matches!(
            self,
            Error::Resolution { .. } | Error::Generation(_) | Error::UnknownFormat(_)
        )
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_carries_directive_id() {
        let err = Error::for_directive(3, Error::Generation("boom".to_string()));
        match &err {
            Error::Resolution { directive, cause } => {
                assert_eq!(*directive, 3);
                assert!(matches!(**cause, Error::Generation(_)));
            }
            _ => panic!("expected Resolution variant"),
        }
        assert!(err.to_string().contains("directive 3"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::Generation("x".into()).is_fatal_for_document());
        assert!(Error::UnknownFormat("cobol".into()).is_fatal_for_document());
        assert!(!Error::Config("x".into()).is_fatal_for_document());
        assert!(!Error::Other("x".into()).is_fatal_for_document());
    }
}
