use thiserror::Error;

pub type NodescopeResult<T> = Result<T, NodescopeError>;

#[derive(Error, Debug)]
pub enum NodescopeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot set permissions on this node - unknown access level: {name}")]
    PermissionNotSettable { name: String },
}

impl NodescopeError {
    /// Shorthand for an [`NodescopeError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Shorthand for a [`NodescopeError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
