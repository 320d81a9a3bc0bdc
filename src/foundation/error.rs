use crate::foundation::core::SwatchRole;

/// Result alias used across the crate.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Every failure a composition can settle to.
#[derive(thiserror::Error, Debug)]
pub enum ComposeError {
    /// One of the two source images could not be loaded or decoded.
    #[error("failed to load {role} image: {reason}")]
    Load {
        /// Which swatch failed.
        role: SwatchRole,
        /// Rendered error chain of the underlying failure.
        reason: String,
    },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ComposeError {
    pub fn load(role: SwatchRole, err: anyhow::Error) -> Self {
        Self::Load {
            role,
            reason: format!("{err:#}"),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Role of the failed source, if this is a load failure.
    pub fn failed_role(&self) -> Option<SwatchRole> {
        match self {
            Self::Load { role, .. } => Some(*role),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
