pub mod envelope;
pub mod errors;
pub mod input;
pub mod task;
pub mod validate;

pub use envelope::{Envelope, ErrorBody};
pub use errors::{ApiError, ApiResult};
pub use input::{Field, TaskInput};
pub use task::{to_task_collection, to_task_resource, TaskLinks, TaskResource, TaskRow};
