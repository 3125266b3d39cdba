pub mod jobs;
pub mod probes;

pub use crate::AppState;
