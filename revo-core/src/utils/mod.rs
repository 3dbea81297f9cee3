pub mod attachments;
pub mod mime;
pub mod money;
pub mod retry;

pub use retry::{RetryFailure, RetryPolicy, retry_with_backoff};
