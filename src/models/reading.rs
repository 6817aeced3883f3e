use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Common surface of items kept in a read-later list.
pub(crate) trait ReadingEntry: Clone + Serialize + DeserializeOwned {
    type Draft: Serialize;

    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn set_last_recommended(&mut self, at: DateTime<Utc>);
    fn from_draft(draft: Self::Draft, id: String, added_at: DateTime<Utc>) -> Self;
}

/// A blog post, podcast, movie or book queued for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Blog {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default = "default_blog_kind")]
    pub kind: String,
    #[serde(default)]
    pub author: String,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub last_recommended_at: Option<DateTime<Utc>>,
}

fn default_blog_kind() -> String {
    "blog".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BlogDraft {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default = "default_blog_kind")]
    pub kind: String,
    #[serde(default)]
    pub author: String,
}

impl ReadingEntry for Blog {
    type Draft = BlogDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_last_recommended(&mut self, at: DateTime<Utc>) {
        self.last_recommended_at = Some(at);
    }

    fn from_draft(draft: BlogDraft, id: String, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            url: draft.url,
            kind: draft.kind,
            author: draft.author,
            added_at,
            last_recommended_at: None,
        }
    }
}

/// A freeform thought revisited through random recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default = "default_note_kind")]
    pub kind: String,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub last_recommended_at: Option<DateTime<Utc>>,
}

fn default_note_kind() -> String {
    "thought".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NoteDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default = "default_note_kind")]
    pub kind: String,
}

impl ReadingEntry for Note {
    type Draft = NoteDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_last_recommended(&mut self, at: DateTime<Utc>) {
        self.last_recommended_at = Some(at);
    }

    fn from_draft(draft: NoteDraft, id: String, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            kind: draft.kind,
            added_at,
            last_recommended_at: None,
        }
    }
}

/// Recommendation and reading counters, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ReadingMetadata {
    pub recommendation_counts: BTreeMap<String, u64>,
    pub read_counts: BTreeMap<String, u64>,
    pub reading_times: BTreeMap<String, Vec<DateTime<Utc>>>,
}
