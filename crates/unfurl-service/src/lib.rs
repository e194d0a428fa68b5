pub mod mock;
pub mod pipeline;
pub mod resolver;
mod slack;
mod teamwork;
mod traits;

pub use slack::{SlackClient, SLACK_API_BASE};
pub use teamwork::{task_id_from_url, TeamworkSource};
pub use traits::{ChatClient, ServiceError, TaskSource, UnfurlRequest};
