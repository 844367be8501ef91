use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

/// Cached metadata for one model, shaped from the OpenRouter catalog payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    pub model_id: String,
    pub model_name: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub top_provider_context_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_moderated: Option<bool>,
    #[serde(default)]
    pub pricing: Value,
    #[serde(default)]
    pub architecture: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model_created: Option<i64>,
    #[serde(default)]
    pub per_request_limits: Value,
    #[serde(default)]
    pub supported_parameters: Value,
    /// Full upstream item, served back to the frontend unchanged
    #[serde(default)]
    pub raw: Value,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RefreshStats {
    pub inserted: usize,
    pub updated: usize,
}

/// Model catalog persisted as one JSON file under the data directory
pub struct CatalogStore {
    path: PathBuf,
    records: RwLock<HashMap<String, ModelRecord>>,
}

impl CatalogStore {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("models.json");
        let mut records = HashMap::new();
        if path.exists() {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read model catalog from {}", path.display()))?;
            let list: Vec<ModelRecord> =
                serde_json::from_str(&json).context("Failed to deserialize model catalog")?;
            for record in list {
                records.insert(record.model_id.clone(), record);
            }
        }
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// All models, ordered by provider then model id, raw payloads preferred
    pub async fn list(&self) -> Vec<Value> {
        let records = self.records.read().await;
        let mut rows: Vec<&ModelRecord> = records.values().collect();
        rows.sort_by(|a, b| {
            (a.provider.as_str(), a.model_id.as_str())
                .cmp(&(b.provider.as_str(), b.model_id.as_str()))
        });
        rows.iter().map(|r| Self::raw_or_summary(r)).collect()
    }

    pub async fn get(&self, model_id: &str) -> Option<Value> {
        let records = self.records.read().await;
        records.get(model_id).map(Self::raw_or_summary)
    }

    fn raw_or_summary(record: &ModelRecord) -> Value {
        if record.raw.is_object() {
            record.raw.clone()
        } else {
            serde_json::json!({"id": record.model_id, "name": record.model_name})
        }
    }

    /// The per-model completion-token limit used when the client omits
    /// `max_tokens`
    pub async fn max_completion_tokens(&self, model_id: &str) -> Option<u32> {
        let records = self.records.read().await;
        records.get(model_id).and_then(|r| r.max_completion_tokens)
    }

    /// Per-provider model counts, provider normalized like the policy crate
    /// ("x-ai" counts as "xai")
    pub async fn provider_model_counts(&self) -> HashMap<String, usize> {
        let records = self.records.read().await;
        let mut counts = HashMap::new();
        for record in records.values() {
            if record.model_id.contains('/') {
                let provider = record.provider.replace('-', "");
                *counts.entry(provider).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Upsert the catalog from a raw `GET /models` payload and persist it
    pub async fn refresh_from(&self, payload: &Value) -> Result<RefreshStats> {
        let items = payload
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut stats = RefreshStats::default();
        let mut records = self.records.write().await;
        for item in items.iter().filter(|i| i.is_object()) {
            let Some(model_id) = item.get("id").and_then(Value::as_str) else {
                continue;
            };
            let record = Self::record_from_item(model_id, item);
            if records.insert(model_id.to_string(), record).is_some() {
                stats.updated += 1;
            } else {
                stats.inserted += 1;
            }
        }

        let list: Vec<&ModelRecord> = records.values().collect();
        let json = serde_json::to_string_pretty(&list).context("Failed to serialize catalog")?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write model catalog to {}", self.path.display()))?;

        Ok(stats)
    }

    fn record_from_item(model_id: &str, item: &Value) -> ModelRecord {
        let top_provider = item.get("top_provider").cloned().unwrap_or(Value::Null);
        ModelRecord {
            model_id: model_id.to_string(),
            model_name: item
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(model_id)
                .to_string(),
            provider: model_id.split('/').next().unwrap_or("unknown").to_string(),
            description: item
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            context_length: item.get("context_length").and_then(Value::as_u64),
            top_provider_context_length: top_provider
                .get("context_length")
                .and_then(Value::as_u64),
            max_completion_tokens: top_provider
                .get("max_completion_tokens")
                .and_then(Value::as_u64)
                .map(|v| v as u32),
            is_moderated: top_provider.get("is_moderated").and_then(Value::as_bool),
            pricing: item.get("pricing").cloned().unwrap_or(Value::Null),
            architecture: item.get("architecture").cloned().unwrap_or(Value::Null),
            model_created: item.get("created").and_then(Value::as_i64),
            per_request_limits: item.get("per_request_limits").cloned().unwrap_or(Value::Null),
            supported_parameters: item
                .get("supported_parameters")
                .cloned()
                .unwrap_or(Value::Null),
            raw: item.clone(),
        }
    }
}
