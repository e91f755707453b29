pub mod measures;
pub mod mutants;

pub use measures::{Measures, Metric, ValueType};
pub use mutants::{MutantList, MutantRecord, MutantStatus, MutantsByLine};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed mutation data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing measure `{0}`")]
    MissingMeasure(&'static str),
}
