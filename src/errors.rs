use thiserror::Error;

/// Why a create-variable command stopped without editing the buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("'{0}' is not a valid name here")]
    InvalidIdentifier(String),

    #[error("{0}")]
    MissingContainer(String),

    #[error("{0}")]
    NameCollision(String),

    #[error("Could not read the existing {0} initializer")]
    MalformedContainer(String),

    #[error("File could not be classified")]
    ParseFailure,

    #[error("Cancelled")]
    UserCancelled,
}

impl CreateError {
    /// Silent errors abort the command without telling the user
    pub fn is_silent(&self) -> bool {
        matches!(self, CreateError::ParseFailure | CreateError::UserCancelled)
    }

    pub fn missing(container: &str) -> Self {
        CreateError::MissingContainer(format!(
            "Define a `{}` block before creating entries in it",
            container
        ))
    }

    pub fn collision(name: &str, container: &str) -> Self {
        CreateError::NameCollision(format!("`{}` already exists in {}", name, container))
    }
}

pub type Result<T> = std::result::Result<T, CreateError>;
