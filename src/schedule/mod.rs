pub mod evaluator;
pub mod model;

pub use model::{ScheduleError, ScheduleSnapshot};
