#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The submission was rejected before any analyzer ran.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An analyzer task failed unexpectedly. No partial report is produced.
    #[error("internal analysis error in {stage}: {message}")]
    InternalAnalysis {
        stage: &'static str,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("rule set error: {0}")]
    Taxonomy(#[from] taxonomy::TaxonomyError),
}

impl AnalysisError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::Validation(_))
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
