use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnfurlError {
    #[error("invalid due date: {0:?}")]
    InvalidDueDate(String),
}
