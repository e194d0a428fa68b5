use std::collections::BTreeMap;

use serde::Serialize;

use crate::block::{DisplayBlock, TextObject};

pub const FALLBACK_TEXT: &str = "TW API error or Invalid Task.";

/// The preview built for one shared link, still tagged with the URL it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub url: String,
    pub blocks: Vec<DisplayBlock>,
}

/// The wire value sent to Slack for one URL. Carries no `url`; the map key does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unfurl {
    pub blocks: Vec<DisplayBlock>,
}

pub type UnfurlMap = BTreeMap<String, Unfurl>;

/// Blocks shown when a task cannot be resolved. Built fresh on every call.
pub fn fallback_blocks() -> Vec<DisplayBlock> {
    vec![DisplayBlock::context(TextObject::plain(FALLBACK_TEXT))]
}

impl Attachment {
    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            blocks: fallback_blocks(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.blocks == fallback_blocks()
    }

    pub fn into_parts(self) -> (String, Unfurl) {
        (self.url, Unfurl { blocks: self.blocks })
    }
}

/// Key attachments by URL, stripping the URL from each value.
///
/// Later attachments overwrite earlier ones with the same URL.
pub fn key_by_url(attachments: impl IntoIterator<Item = Attachment>) -> UnfurlMap {
    attachments
        .into_iter()
        .map(Attachment::into_parts)
        .collect()
}
