//! Builds the Slack preview for a single shared task link.

use crate::attachment::Attachment;
use crate::block::{DisplayBlock, Field, TextObject};
use crate::link::Link;
use crate::task::{DueDate, TaskRecord};

type FieldProvider = fn(&Link, &TaskRecord) -> Option<Field>;

/// Order of the trailing section's fields. Each provider yields at most one field.
const FIELD_PROVIDERS: &[FieldProvider] = &[
    project_field,
    status_field,
    list_field,
    assignee_field,
    parent_field,
    board_field,
    due_field,
    estimate_field,
];

/// Build the attachment for `link`. An unresolved task yields the fallback.
pub fn build(link: &Link, record: Option<&TaskRecord>) -> Attachment {
    let Some(task) = record else {
        return Attachment::fallback(link.url.as_str());
    };

    let fields = FIELD_PROVIDERS
        .iter()
        .filter_map(|provider| provider(link, task))
        .collect();

    Attachment {
        url: link.url.clone(),
        blocks: vec![
            DisplayBlock::section_text(TextObject::mrkdwn(format!(
                "*Task:* <{}|{}>",
                link.url, task.title
            ))),
            DisplayBlock::context(TextObject::plain(format!(
                "Created by: {} {}",
                task.creator_first_name, task.creator_last_name
            ))),
            DisplayBlock::Divider,
            DisplayBlock::section_fields(fields),
        ],
    }
}

fn project_field(link: &Link, task: &TaskRecord) -> Option<Field> {
    Some(Field::link(
        "Project",
        &format!("https://{}/projects/{}", link.domain, task.project_id),
        &task.project_name,
    ))
}

fn status_field(_: &Link, task: &TaskRecord) -> Option<Field> {
    Some(Field::new("Status", task.status.as_str()))
}

fn list_field(link: &Link, task: &TaskRecord) -> Option<Field> {
    Some(Field::link(
        "List",
        &format!("https://{}/tasklists/{}", link.domain, task.list_id),
        &task.list_name,
    ))
}

fn assignee_field(_: &Link, task: &TaskRecord) -> Option<Field> {
    task.assignee_first_name
        .as_deref()
        .map(|name| Field::new("Assignee", name))
}

fn parent_field(link: &Link, task: &TaskRecord) -> Option<Field> {
    task.parent_task.as_ref().map(|parent| {
        Field::link(
            "Parent",
            &format!("https://{}/tasks/{}", link.domain, parent.id),
            &parent.title,
        )
    })
}

fn board_field(_: &Link, task: &TaskRecord) -> Option<Field> {
    task.board_column_name
        .as_deref()
        .map(|column| Field::new("Board", column))
}

fn due_field(_: &Link, task: &TaskRecord) -> Option<Field> {
    task.due_date
        .as_ref()
        .map(|due| Field::new("Due", due_text(due)))
}

fn estimate_field(_: &Link, task: &TaskRecord) -> Option<Field> {
    task.estimated_minutes
        .map(|minutes| Field::new("Estimated", estimate_text(minutes)))
}

/// Characters `[0,3)`, `[4,5)` and `[6,7)` of the due date, joined with `-`.
///
/// Not `YYYY-MM-DD`: `20230115` renders as `202-0-1`.
pub fn due_text(due: &DueDate) -> String {
    let s = due.as_str();
    format!("{}-{}-{}", &s[0..3], &s[4..5], &s[6..7])
}

/// `{hours}:{minutes}`, neither part zero-padded.
pub fn estimate_text(minutes: u32) -> String {
    format!("{}:{}", minutes / 60, minutes % 60)
}
