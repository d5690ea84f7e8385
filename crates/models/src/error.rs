/// Pipeline fitting and evaluation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// No rows to fit on.
    #[error("dataset is empty")]
    EmptyDataset,
    /// Not enough rows for a meaningful fit.
    #[error("too few observations: {0}")]
    TooFewObservations(usize),
    /// Contamination is a fraction of rows expected to be anomalous.
    #[error("contamination must be within (0, 0.5], got {0}")]
    InvalidContamination(f64),
    /// The underlying solver gave up.
    #[error("solver failed: {0}")]
    SolverFailed(String),
}
