use super::{fallback, parse_backup, Backend};
use crate::error::Result;
use crate::models::{next_id, AssetDraft, AssetRecord};
use crate::remote::Method;

pub(crate) const ASSETS_KEY: &str = "asset_records";
const BACKUP_KEY: &str = "assetRecords_lastBackup";
const REQUIRED_FIELDS: &[&str] = &["liveMoney", "investMoney", "bondMoney"];

#[derive(Clone)]
pub(crate) struct AssetStorage {
    backend: Backend,
}

impl AssetStorage {
    pub(crate) fn new(backend: Backend) -> Self {
        Self { backend }
    }

    fn mirror(&self, records: Vec<AssetRecord>) -> Result<Vec<AssetRecord>> {
        self.backend.save(ASSETS_KEY, &records)?;
        Ok(records)
    }

    fn local(&self) -> Result<Vec<AssetRecord>> {
        self.backend.load(ASSETS_KEY)
    }

    pub(crate) fn records(&self) -> Result<Vec<AssetRecord>> {
        fallback(
            "getAssets",
            self.backend.fetch(Method::Get, "/assets"),
            |records| self.mirror(records),
            || self.local(),
        )
    }

    /// Record a snapshot. The local branch dates it today.
    pub(crate) fn add(&self, draft: &AssetDraft) -> Result<Vec<AssetRecord>> {
        fallback(
            "addAsset",
            self.backend.send(Method::Post, "/assets", draft),
            |records| self.mirror(records),
            || {
                let mut records = self.local()?;
                let id = next_id(self.backend.now(), records.iter().map(|r| r.id));
                records.push(draft.clone().into_record(id, self.backend.today()));
                records.sort_by_key(|r| r.date);
                self.mirror(records)
            },
        )
    }

    pub(crate) fn delete(&self, id: i64) -> Result<Vec<AssetRecord>> {
        fallback(
            "deleteAsset",
            self.backend.fetch(Method::Delete, &format!("/assets/{id}")),
            |records| self.mirror(records),
            || {
                let mut records = self.local()?;
                records.retain(|r| r.id != id);
                self.mirror(records)
            },
        )
    }

    pub(crate) fn clear(&self) -> Result<()> {
        fallback(
            "clearAssets",
            self.backend.fetch::<serde_json::Value>(Method::Delete, "/assets"),
            |_| self.backend.remove(ASSETS_KEY),
            || self.backend.remove(ASSETS_KEY),
        )
    }

    pub(crate) fn latest(&self) -> Result<Option<AssetRecord>> {
        fallback(
            "getLatestAsset",
            self.backend.fetch(Method::Get, "/assets/latest"),
            Ok,
            || Ok(self.local()?.into_iter().max_by_key(|r| r.date)),
        )
    }

    /// Pretty-printed JSON array of every record. Stamps the backup time.
    pub(crate) fn export_json(&self) -> Result<String> {
        let records = self.records()?;
        let text = serde_json::to_string_pretty(&records)?;
        self.backend.stamp_backup(BACKUP_KEY)?;
        tracing::info!(count = records.len(), "exported asset records");
        Ok(text)
    }

    /// Replace every record with the ones in `text`. Ids and dates are
    /// regenerated. A file that fails validation changes nothing.
    pub(crate) fn import_json(&self, text: &str) -> Result<Vec<AssetRecord>> {
        let drafts: Vec<AssetDraft> = parse_backup(text, "asset record", REQUIRED_FIELDS)?;

        self.clear()?;
        for draft in &drafts {
            self.add(draft)?;
        }
        self.backend.stamp_backup(BACKUP_KEY)?;
        tracing::info!(count = drafts.len(), "imported asset records");
        self.records()
    }

    pub(crate) fn backup_due(&self) -> Result<bool> {
        self.backend.backup_due(BACKUP_KEY)
    }
}
