/// Errors raised while validating an [`crate::EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Similarity threshold outside the closed unit interval.
    #[error("similarity threshold {0} is not within [0.0, 1.0]")]
    InvalidThreshold(f64),

    /// The movement-code table has no entries, so no record could ever
    /// be interpreted.
    #[error("movement-code table is empty")]
    EmptyCodeTable,
}
