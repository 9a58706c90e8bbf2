//! Remote store client.
//!
//! The backend keeps at most one row per user in a `user_data` table and
//! exposes PostgREST-style endpoints: upsert-by-key writes (last write
//! wins) and fetch-by-user reads. The core talks to it through the
//! [`RemoteStore`] trait so tests and the session controller can swap in
//! fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::bundle::StateBundle;
use crate::error::SyncError;

/// One full-document row, mirroring the local kv keys.
///
/// Column names are snake_case at the wire boundary; the nested values
/// keep their local JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub user_id: String,
    #[serde(default)]
    pub tasks: serde_json::Value,
    #[serde(default)]
    pub time_logs: serde_json::Value,
    #[serde(default)]
    pub question_goal: serde_json::Value,
    #[serde(default)]
    pub exam_settings: serde_json::Value,
    #[serde(default)]
    pub streak_data: serde_json::Value,
    #[serde(default)]
    pub timer_states: serde_json::Value,
    #[serde(default)]
    pub test_results: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl RemoteRecord {
    /// Build the upload row from the in-memory bundle.
    pub fn from_bundle(
        user_id: &str,
        bundle: &StateBundle,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            user_id: user_id.to_string(),
            tasks: serde_json::to_value(&bundle.tasks)?,
            time_logs: serde_json::to_value(&bundle.time_logs)?,
            question_goal: serde_json::to_value(bundle.question_goal)?,
            exam_settings: serde_json::to_value(&bundle.exam_settings)?,
            streak_data: serde_json::to_value(&bundle.streak_data)?,
            timer_states: serde_json::to_value(&bundle.timer_states)?,
            test_results: serde_json::to_value(&bundle.test_results)?,
            updated_at,
        })
    }

    /// Decode the downloaded row into a bundle. Individual null columns
    /// (never written by an older client, say) decode to defaults; the
    /// legacy time-log upgrade applies here just as it does locally.
    pub fn into_bundle(self) -> StateBundle {
        fn field<T: serde::de::DeserializeOwned + Default>(
            name: &str,
            value: serde_json::Value,
        ) -> T {
            if value.is_null() {
                return T::default();
            }
            match serde_json::from_value(value) {
                Ok(v) => v,
                Err(err) => {
                    log::warn!("discarding malformed remote '{name}' column: {err}");
                    T::default()
                }
            }
        }

        StateBundle {
            tasks: field("tasks", self.tasks),
            time_logs: field("time_logs", self.time_logs),
            question_goal: field("question_goal", self.question_goal),
            exam_settings: field("exam_settings", self.exam_settings),
            streak_data: field("streak_data", self.streak_data),
            timer_states: field("timer_states", self.timer_states),
            test_results: field("test_results", self.test_results),
        }
    }
}

/// Remote persistence backend: one record per user identity.
pub trait RemoteStore {
    /// Fetch the user's record, None when the user has no row yet.
    fn fetch(&self, user_id: &str) -> Result<Option<RemoteRecord>, SyncError>;

    /// Replace the user's record wholesale (upsert by user key).
    fn upsert(&self, user_id: &str, record: &RemoteRecord) -> Result<(), SyncError>;
}

impl<T: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<T> {
    fn fetch(&self, user_id: &str) -> Result<Option<RemoteRecord>, SyncError> {
        (**self).fetch(user_id)
    }

    fn upsert(&self, user_id: &str, record: &RemoteRecord) -> Result<(), SyncError> {
        (**self).upsert(user_id, record)
    }
}

/// HTTP client against the REST endpoint.
pub struct RestRemote {
    base: Url,
    api_key: String,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl RestRemote {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, SyncError> {
        let base = Url::parse(base_url).map_err(|e| SyncError::Remote(e.to_string()))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SyncError::Remote(e.to_string()))?;
        Ok(Self {
            base,
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            runtime,
        })
    }

    fn table_url(&self) -> Result<Url, SyncError> {
        self.base
            .join("rest/v1/user_data")
            .map_err(|e| SyncError::Remote(e.to_string()))
    }
}

impl RemoteStore for RestRemote {
    fn fetch(&self, user_id: &str) -> Result<Option<RemoteRecord>, SyncError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{user_id}"))
            .append_pair("select", "*");

        let rows: Vec<RemoteRecord> = self.runtime.block_on(async {
            let response = self
                .client
                .get(url)
                .header("apikey", &self.api_key)
                .bearer_auth(&self.api_key)
                .send()
                .await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(SyncError::Remote(format!("fetch failed ({status}): {body}")));
            }
            Ok(response.json().await?)
        })?;

        Ok(rows.into_iter().next())
    }

    fn upsert(&self, _user_id: &str, record: &RemoteRecord) -> Result<(), SyncError> {
        let url = self.table_url()?;

        self.runtime.block_on(async {
            let response = self
                .client
                .post(url)
                .header("apikey", &self.api_key)
                .bearer_auth(&self.api_key)
                .header("Prefer", "resolution=merge-duplicates")
                .json(record)
                .send()
                .await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(SyncError::Remote(format!("upsert failed ({status}): {body}")));
            }
            Ok(())
        })
    }
}
