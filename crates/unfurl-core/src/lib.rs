pub mod attachment;
pub mod block;
pub mod error;
pub mod link;
pub mod preview;
pub mod task;

pub use attachment::{Attachment, Unfurl, UnfurlMap};
pub use block::{DisplayBlock, Field, TextObject};
pub use error::UnfurlError;
pub use link::{Link, LinkSharedEvent};
pub use task::{DueDate, ParentTask, TaskRecord};
