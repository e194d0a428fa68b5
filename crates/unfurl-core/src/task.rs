use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnfurlError;

/// A due date as delivered by Teamwork: exactly eight ASCII digits,
/// nominally `YYYYMMDD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DueDate(String);

impl DueDate {
    pub const LEN: usize = 8;

    pub fn parse(s: &str) -> Result<Self, UnfurlError> {
        if s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(DueDate(s.to_string()))
        } else {
            Err(UnfurlError::InvalidDueDate(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DueDate {
    type Error = UnfurlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DueDate::parse(&value)
    }
}

impl From<DueDate> for String {
    fn from(value: DueDate) -> Self {
        value.0
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentTask {
    pub id: String,
    pub title: String,
}

/// Normalized task data fetched from the task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub creator_first_name: String,
    pub creator_last_name: String,
    pub project_id: String,
    pub project_name: String,
    pub status: String,
    pub list_id: String,
    pub list_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task: Option<ParentTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_date_parse_valid() {
        let d = DueDate::parse("20230115").unwrap();
        assert_eq!(d.as_str(), "20230115");
        assert_eq!(d.to_string(), "20230115");
    }

    #[test]
    fn test_due_date_parse_invalid() {
        assert!(DueDate::parse("").is_err());
        assert!(DueDate::parse("2023011").is_err());
        assert!(DueDate::parse("202301155").is_err());
        assert!(DueDate::parse("2023-1-5").is_err());
        assert_eq!(
            DueDate::parse("abcdefgh"),
            Err(UnfurlError::InvalidDueDate("abcdefgh".into()))
        );
    }

    #[test]
    fn test_task_record_rejects_bad_due_date() {
        let raw = serde_json::json!({
            "id": "1",
            "title": "t",
            "creatorFirstName": "a",
            "creatorLastName": "b",
            "projectId": "2",
            "projectName": "p",
            "status": "new",
            "listId": "3",
            "listName": "l",
            "dueDate": "soon"
        });
        assert!(serde_json::from_value::<TaskRecord>(raw).is_err());
    }

    #[test]
    fn test_task_record_optional_fields_default_to_none() {
        let raw = serde_json::json!({
            "id": "1",
            "title": "t",
            "creatorFirstName": "a",
            "creatorLastName": "b",
            "projectId": "2",
            "projectName": "p",
            "status": "new",
            "listId": "3",
            "listName": "l"
        });
        let record: TaskRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.assignee_first_name, None);
        assert_eq!(record.parent_task, None);
        assert_eq!(record.board_column_name, None);
        assert_eq!(record.due_date, None);
        assert_eq!(record.estimated_minutes, None);
    }
}
