//! Goal module - objectives, key results, and progress history.

mod history;
mod key_result;
mod metric;
mod objective;

pub use history::ProgressHistoryEntry;
pub use key_result::{KeyResult, KeyResultSpec, KeyResultStatus};
pub use metric::MetricKind;
pub use objective::{
    Objective, ObjectiveStatus, ObjectiveWithKeyResults, Priority, MAX_TITLE_LENGTH,
};
