use rand::seq::SliceRandom;
use std::marker::PhantomData;
use uuid::Uuid;

use super::{fallback, Backend};
use crate::error::Result;
use crate::models::{Blog, Note, ReadingEntry, ReadingMetadata};
use crate::remote::Method;

/// Which read-later collection a [`ReadingList`] manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadingListKind {
    Blogs,
    Notes,
}

struct Keys {
    items: &'static str,
    last_recommended: &'static str,
    recommendation_counts: &'static str,
    read_counts: &'static str,
    reading_times: &'static str,
}

impl ReadingListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Notes => "notes",
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            Self::Blogs => "/blogs",
            Self::Notes => "/random-walk",
        }
    }

    fn keys(&self) -> Keys {
        match self {
            Self::Blogs => Keys {
                items: "reviewBlogs",
                last_recommended: "lastRecommendedBlog",
                recommendation_counts: "blogRecommendationCounts",
                read_counts: "blogReadCounts",
                reading_times: "blogReadingTimes",
            },
            Self::Notes => Keys {
                items: "randomWalkRecords",
                last_recommended: "lastRecommendedRandomWalk",
                recommendation_counts: "randomWalkRecommendationCounts",
                read_counts: "randomWalkReadCounts",
                reading_times: "randomWalkReadingTimes",
            },
        }
    }

    /// Only the notes service keeps counters server-side.
    fn remote_metadata(&self) -> bool {
        matches!(self, Self::Notes)
    }
}

/// A read-later list with random recommendation and reading counters.
#[derive(Clone)]
pub(crate) struct ReadingList<T> {
    backend: Backend,
    kind: ReadingListKind,
    entry: PhantomData<T>,
}

impl ReadingList<Blog> {
    pub(crate) fn blogs(backend: Backend) -> Self {
        Self::new(backend, ReadingListKind::Blogs)
    }
}

impl ReadingList<Note> {
    pub(crate) fn notes(backend: Backend) -> Self {
        Self::new(backend, ReadingListKind::Notes)
    }
}

impl<T: ReadingEntry> ReadingList<T> {
    fn new(backend: Backend, kind: ReadingListKind) -> Self {
        Self {
            backend,
            kind,
            entry: PhantomData,
        }
    }

    pub(crate) fn kind(&self) -> ReadingListKind {
        self.kind
    }

    fn mirror(&self, items: Vec<T>) -> Result<Vec<T>> {
        self.backend.save(self.kind.keys().items, &items)?;
        Ok(items)
    }

    fn local(&self) -> Result<Vec<T>> {
        self.backend.load(self.kind.keys().items)
    }

    fn local_metadata(&self) -> Result<ReadingMetadata> {
        let keys = self.kind.keys();
        Ok(ReadingMetadata {
            recommendation_counts: self.backend.load(keys.recommendation_counts)?,
            read_counts: self.backend.load(keys.read_counts)?,
            reading_times: self.backend.load(keys.reading_times)?,
        })
    }

    fn save_metadata(&self, metadata: &ReadingMetadata) -> Result<()> {
        let keys = self.kind.keys();
        self.backend
            .save(keys.recommendation_counts, &metadata.recommendation_counts)?;
        self.backend.save(keys.read_counts, &metadata.read_counts)?;
        self.backend.save(keys.reading_times, &metadata.reading_times)
    }

    pub(crate) fn items(&self) -> Result<Vec<T>> {
        fallback(
            self.kind.as_str(),
            self.backend.fetch(Method::Get, self.kind.endpoint()),
            |items| self.mirror(items),
            || self.local(),
        )
    }

    pub(crate) fn add(&self, draft: T::Draft) -> Result<Vec<T>> {
        let item = T::from_draft(draft, Uuid::new_v4().to_string(), self.backend.now());

        fallback(
            "addReadingItem",
            self.backend.send(Method::Post, self.kind.endpoint(), &item),
            |items| self.mirror(items),
            || {
                let mut items = self.local()?;
                let mut metadata = self.local_metadata()?;
                metadata.recommendation_counts.insert(item.id().to_string(), 0);
                metadata.read_counts.insert(item.id().to_string(), 0);
                items.push(item.clone());
                self.save_metadata(&metadata)?;
                self.mirror(items)
            },
        )
    }

    /// Remove `id` and forget its counters and reading times.
    pub(crate) fn delete(&self, id: &str) -> Result<Vec<T>> {
        let items = fallback(
            "deleteReadingItem",
            self.backend
                .fetch(Method::Delete, &format!("{}/{id}", self.kind.endpoint())),
            |items| self.mirror(items),
            || {
                let mut items = self.local()?;
                items.retain(|item| item.id() != id);
                self.mirror(items)
            },
        )?;

        let mut metadata = self.local_metadata()?;
        metadata.recommendation_counts.remove(id);
        metadata.read_counts.remove(id);
        metadata.reading_times.remove(id);
        self.save_metadata(&metadata)?;
        Ok(items)
    }

    pub(crate) fn clear(&self) -> Result<()> {
        if let Err(e) = self
            .backend
            .fetch::<serde_json::Value>(Method::Delete, self.kind.endpoint())
        {
            tracing::warn!(op = "clearReadingList", error = %e, "remote call failed, using local store");
        }
        let keys = self.kind.keys();
        for key in [
            keys.items,
            keys.last_recommended,
            keys.recommendation_counts,
            keys.read_counts,
            keys.reading_times,
        ] {
            self.backend.remove(key)?;
        }
        Ok(())
    }

    pub(crate) fn last_recommended(&self) -> Result<Option<String>> {
        self.backend.load_raw(self.kind.keys().last_recommended)
    }

    /// Record `item` as the latest recommendation and update the mirrored list.
    fn note_recommended(&self, item: &T, mut items: Vec<T>) -> Result<()> {
        let keys = self.kind.keys();
        self.backend.save_raw(keys.last_recommended, item.id())?;

        let mut metadata = self.local_metadata()?;
        *metadata
            .recommendation_counts
            .entry(item.id().to_string())
            .or_default() += 1;
        self.save_metadata(&metadata)?;

        for slot in items.iter_mut().filter(|i| i.id() == item.id()) {
            *slot = item.clone();
        }
        self.mirror(items)?;
        Ok(())
    }

    /// Pick a random item, never the previous pick while another one exists.
    pub(crate) fn recommend(&self) -> Result<Option<T>> {
        fallback(
            "recommendReadingItem",
            self.backend
                .fetch::<Option<T>>(Method::Get, &format!("{}/recommend", self.kind.endpoint())),
            |picked| {
                if let Some(item) = &picked {
                    self.note_recommended(item, self.local()?)?;
                }
                Ok(picked)
            },
            || {
                let items = self.local()?;
                let last = self.last_recommended()?;
                let candidates: Vec<&T> = items
                    .iter()
                    .filter(|item| last.as_deref() != Some(item.id()))
                    .collect();

                let mut picked = match candidates.choose(&mut rand::thread_rng()) {
                    Some(item) => (*item).clone(),
                    None => match items.first() {
                        Some(item) => item.clone(),
                        None => return Ok(None),
                    },
                };
                picked.set_last_recommended(self.backend.now());
                self.note_recommended(&picked, items)?;
                Ok(Some(picked))
            },
        )
    }

    pub(crate) fn mark_read(&self, id: &str) -> Result<()> {
        fallback(
            "markRead",
            self.backend.fetch::<serde_json::Value>(
                Method::Post,
                &format!("{}/{id}/read", self.kind.endpoint()),
            ),
            |_| Ok(()),
            || {
                let mut metadata = self.local_metadata()?;
                *metadata.read_counts.entry(id.to_string()).or_default() += 1;
                metadata
                    .reading_times
                    .entry(id.to_string())
                    .or_default()
                    .push(self.backend.now());
                self.save_metadata(&metadata)
            },
        )
    }

    pub(crate) fn metadata(&self) -> Result<ReadingMetadata> {
        if !self.kind.remote_metadata() {
            return self.local_metadata();
        }
        fallback(
            "getReadingMetadata",
            self.backend
                .fetch(Method::Get, &format!("{}/metadata", self.kind.endpoint())),
            Ok,
            || self.local_metadata(),
        )
    }
}
