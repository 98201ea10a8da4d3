use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn parse(query: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Parse {
                query: query.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn unknown_document(doc_id: u32) -> Error {
        Error(ErrorKind::UnknownDocument { doc_id }.into())
    }

    pub fn corrupt_index(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::CorruptIndex {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    pub fn other<E>(context: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::Other {
                context: context.into(),
                source: Box::new(source),
            }
            .into(),
        )
    }

    /// Returns true for errors caused by a malformed boolean query.
    pub fn is_parse(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse { .. })
    }

    /// Returns true for errors caused by a malformed persisted index.
    pub fn is_corrupt_index(&self) -> bool {
        matches!(self.kind(), ErrorKind::CorruptIndex { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("failed to parse query '{query}': {message}")]
    Parse { query: String, message: String },

    #[error("unknown document {doc_id}")]
    UnknownDocument { doc_id: u32 },

    #[error("corrupt index data for '{element}': {message}")]
    CorruptIndex { element: String, message: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Other {
        context: String,
        source: StdErrorBoxed,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}
