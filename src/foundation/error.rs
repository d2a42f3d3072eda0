/// Result alias used at the crate's loading boundary.
pub type BannerResult<T> = Result<T, BannerError>;

/// Errors raised while loading or validating configuration.
///
/// Resolution and transitions never produce these; a missing or dangling
/// piece of configuration there simply means "this source did not resolve".
#[derive(thiserror::Error, Debug)]
pub enum BannerError {
    /// A structural invariant of the store snapshot or engine config is violated.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON input could not be decoded.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else (I/O while reading a snapshot, etc.).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BannerError {
    /// Build a [`BannerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BannerError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for BannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            BannerError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            BannerError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn json_errors_map_to_serde_variant() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = BannerError::from(err);
        assert!(matches!(err, BannerError::Serde(_)));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = BannerError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
