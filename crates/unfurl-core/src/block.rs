use serde::{Serialize, Serializer};

/// A Slack Block Kit text composition object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Mrkdwn { text: String },
    PlainText { text: String },
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText { text: text.into() }
    }
}

/// One label/value entry of a section's `fields`.
///
/// Serialized as a single mrkdwn text object: `*{label}:*  {value}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A field whose value is a Slack link `<href|text>`.
    pub fn link(label: impl Into<String>, href: &str, text: &str) -> Self {
        Self::new(label, format!("<{href}|{text}>"))
    }

    pub fn text(&self) -> String {
        format!("*{}:*  {}", self.label, self.value)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TextObject::mrkdwn(self.text()).serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayBlock {
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<Field>,
    },
    Context {
        elements: Vec<TextObject>,
    },
    Divider,
}

impl DisplayBlock {
    pub fn section_text(text: TextObject) -> Self {
        DisplayBlock::Section {
            text: Some(text),
            fields: Vec::new(),
        }
    }

    pub fn section_fields(fields: Vec<Field>) -> Self {
        DisplayBlock::Section { text: None, fields }
    }

    pub fn context(element: TextObject) -> Self {
        DisplayBlock::Context {
            elements: vec![element],
        }
    }
}
