//! Loading/Success/Error wrapper for streamed operation outcomes.

/// State of an in-flight repository operation.
///
/// Every operation emits `Loading` first and then exactly one of
/// `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// The success value, if this is a `Success`.
    pub fn success(self) -> Option<T> {
        match self {
            Resource::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The error message, if this is an `Error`.
    pub fn error(&self) -> Option<&str> {
        match self {
            Resource::Error(message) => Some(message),
            _ => None,
        }
    }
}
