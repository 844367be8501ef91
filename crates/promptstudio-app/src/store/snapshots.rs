use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A saved studio snapshot: prompts, responses, parameters, notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub data: Value,
}

/// Listing row without the payload
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMeta {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub created_at: String,
}

impl From<&Snapshot> for SnapshotMeta {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            title: snapshot.title.clone(),
            kind: snapshot.kind.clone(),
            provider: snapshot.provider.clone(),
            model: snapshot.model.clone(),
            created_at: snapshot.created_at.to_rfc3339(),
        }
    }
}

/// Snapshot persistence: one JSON file per snapshot under the data directory
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join("snapshots");
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create snapshots directory: {}", dir.display()))?;
        }
        Ok(Self { dir })
    }

    fn snapshot_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn create(
        &self,
        title: Option<String>,
        kind: Option<String>,
        provider: Option<String>,
        model: Option<String>,
        data: Value,
    ) -> Result<Snapshot> {
        let snapshot = Snapshot {
            id: Uuid::new_v4().to_string(),
            title,
            kind: kind.unwrap_or_else(|| "state".to_string()),
            provider,
            model,
            created_at: Utc::now(),
            data,
        };

        let json =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        let path = self.snapshot_path(&snapshot.id);
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;

        Ok(snapshot)
    }

    pub fn get(&self, id: &str) -> Result<Option<Snapshot>> {
        // Ids come from clients; only well-formed UUIDs map to files
        if Uuid::parse_str(id).is_err() {
            return Ok(None);
        }
        let path = self.snapshot_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
        let snapshot = serde_json::from_str(&json).context("Failed to deserialize snapshot")?;
        Ok(Some(snapshot))
    }

    /// All snapshots, newest first
    pub fn list(&self) -> Result<Vec<SnapshotMeta>> {
        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
            match serde_json::from_str::<Snapshot>(&json) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable snapshot"),
            }
        }
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(snapshots.iter().map(SnapshotMeta::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_get_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();

        let created = store
            .create(
                Some("My prompt".to_string()),
                Some("system".to_string()),
                Some("openai".to_string()),
                Some("openai/gpt-4o-mini".to_string()),
                json!({"system_prompt": "be nice"}),
            )
            .unwrap();

        let fetched = store.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched.title.as_deref(), Some("My prompt"));
        assert_eq!(fetched.kind, "system");
        assert_eq!(fetched.data["system_prompt"], "be nice");

        let listing = store.list().unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id, created.id);
    }

    #[test]
    fn kind_defaults_to_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        let created = store.create(None, None, None, None, json!({})).unwrap();
        assert_eq!(created.kind, "state");
    }

    #[test]
    fn unknown_and_malformed_ids_yield_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        let missing = Uuid::new_v4().to_string();
        assert!(store.get(&missing).unwrap().is_none());
        assert!(store.get("../../etc/passwd").unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        let first = store.create(Some("a".into()), None, None, None, json!({})).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = store.create(Some("b".into()), None, None, None, json!({})).unwrap();

        let listing = store.list().unwrap();
        assert_eq!(listing[0].id, second.id);
        assert_eq!(listing[1].id, first.id);
    }
}
