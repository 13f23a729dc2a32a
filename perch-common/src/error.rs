use thiserror::Error;

/// Errors raised by a child-mutation primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("node is not a child of this parent")]
    NotFound,
    #[error("insertion would make a node its own ancestor")]
    HierarchyRequest,
    #[error("node does not hold character data")]
    NotCharacterData,
    #[error("offset {offset} is past the end of data of length {len}")]
    IndexSize { offset: u32, len: u32 },
    #[error("host DOM error: {0}")]
    Host(String),
}

/// Portal lifecycle and forwarding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// The shared container was not provisioned before the portal attached.
    #[error("portal container #{id} does not exist in the document")]
    ContainerMissing { id: String },
    #[error("portal is already attached")]
    AlreadyAttached,
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Custom element registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid custom element name: {0}")]
    InvalidName(String),
    #[error("custom element already defined: {0}")]
    AlreadyDefined(String),
    #[error("registration failed: {0}")]
    Host(String),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Serialization error: {0}")]
    Json(String),
    #[error("Configuration error: {0}")]
    Invalid(String),
}
