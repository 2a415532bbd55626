#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parsing flat document")]
    Parse(#[source] serde_json::Error),
    #[error("encoding flat document")]
    Encode(#[source] serde_json::Error),
    #[error("unexpected document shape, expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("converting field '{field}'")]
    Field {
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("converting value")]
    Value(#[source] serde_json::Error),
    #[error("inline field '{field}' must flatten to an object, found {found}")]
    InlineNotObject { field: String, found: &'static str },
    #[error("unsupported shape for {type_name}: {reason}")]
    UnsupportedShape {
        type_name: &'static str,
        reason: &'static str,
    },
}

/// Coarse classification of an [`Error`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input does not parse, or is an object where an array was expected
    /// (or the other way around), or has the wrong length.
    MalformedDocument,
    /// A single value could not be converted to or from its declared type.
    FieldConversion,
    /// A schema and a type descriptor (or a record table) do not line up.
    UnsupportedShape,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) | Error::UnexpectedShape { .. } | Error::LengthMismatch { .. } => {
                ErrorKind::MalformedDocument
            }
            Error::Encode(_) | Error::Field { .. } | Error::Value(_) | Error::InlineNotObject { .. } => {
                ErrorKind::FieldConversion
            }
            Error::UnsupportedShape { .. } => ErrorKind::UnsupportedShape,
        }
    }

    pub(crate) fn unexpected(expected: &'static str, found: &serde_json::Value) -> Self {
        Error::UnexpectedShape {
            expected,
            found: crate::inline::kind_of(found),
        }
    }
}

pub type Result<T> = std::result::Result<T, self::Error>;
