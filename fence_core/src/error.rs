#[derive(Debug, thiserror::Error)]
pub enum FenceError {
    #[error("unknown fence style `{0}`")]
    UnknownStyle(String),

    /// A style was chosen but no pylon template was supplied for it
    /// (typically the custom style with an empty asset path).
    #[error("fence style `{style}` has no pylon template assigned")]
    UnresolvedTemplate { style: String },

    #[error("fence style `{0}` is defined more than once")]
    DuplicateStyle(String),

    #[error("failed to parse style catalog: {0}")]
    Catalog(#[from] toml::de::Error),

    #[error("unknown yaw mode `{0}`, expected `atan2` or `legacy`")]
    InvalidYawMode(String),
}

pub type Result<T, E = FenceError> = std::result::Result<T, E>;
