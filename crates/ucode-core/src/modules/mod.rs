pub mod model;
pub mod observations;
pub mod parallel;
pub mod pdata;
pub mod serialization;
pub mod table;

mod dispatch;
mod traits;

pub use dispatch::{TaskOptions, execute_task, task_configured};
pub use traits::TaskExecutor;
