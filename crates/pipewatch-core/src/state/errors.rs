use crate::errors::{ParseError, PipewatchError};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown navigation target '{href}'")]
    UnknownNavTarget { href: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl PipewatchError for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            DispatchError::UnknownNavTarget { .. } => "UNKNOWN_NAV_TARGET",
            DispatchError::Parse(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            DispatchError::UnknownNavTarget { .. } => true,
            DispatchError::Parse(e) => e.is_user_error(),
        }
    }
}
