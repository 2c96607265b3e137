//! File-backed store for capability submissions
//!
//! Submissions live in a concurrent map. Every mutation rewrites the whole
//! collection to one JSON file; the file is only read once, when the store
//! is opened.

use chrono::Utc;
use dashmap::DashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::{CompanyProfile, StatusCounts, StoredSubmission, Submission, SubmissionStatus};
use crate::payload::Payload;

/// Submission store
pub struct SubmissionStore {
    submissions: DashMap<String, Submission>,
    config: StoreConfig,
    /// Held while a snapshot is taken and written
    persist_lock: Mutex<()>,
}

impl SubmissionStore {
    /// Open the store, loading whatever the storage file holds.
    ///
    /// A missing file gives an empty store. An unreadable or corrupt file is
    /// logged and also gives an empty store.
    pub fn open(config: StoreConfig) -> Self {
        let store = Self {
            submissions: DashMap::new(),
            config,
            persist_lock: Mutex::new(()),
        };
        store.load_from_disk();
        store
    }

    pub fn storage_file(&self) -> &Path {
        &self.config.storage_file
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    // Submission operations

    /// Create a pending submission from a form payload and persist it
    pub fn create(
        &self,
        payload: &Payload,
        submitted_by: Option<&str>,
        submitted_by_username: Option<&str>,
    ) -> Submission {
        let submission = Submission::new(
            CompanyProfile::from_payload(payload),
            submitted_by.map(str::to_owned),
            submitted_by_username.map(str::to_owned),
        );

        self.submissions
            .insert(submission.id.clone(), submission.clone());
        tracing::debug!(
            "Created submission {} for {}",
            submission.id,
            submitted_by_username.unwrap_or("<anonymous>")
        );

        self.persist_safely();
        submission
    }

    /// All submissions, newest first
    pub fn list_submissions(&self) -> Vec<Submission> {
        self.collect_newest_first(|_| true)
    }

    pub fn get_submission(&self, id: &str) -> Option<Submission> {
        self.submissions.get(id).map(|entry| entry.value().clone())
    }

    /// Submissions owned by `username`, newest first. No username, no results.
    pub fn list_submissions_by_user(&self, username: Option<&str>) -> Vec<Submission> {
        match username {
            Some(username) if !username.is_empty() => self.collect_newest_first(|item| {
                item.submitted_by_username.as_deref() == Some(username)
            }),
            _ => Vec::new(),
        }
    }

    /// Record a reviewer decision.
    ///
    /// Returns `None` without touching the file when `id` is unknown. A
    /// submission that was already decided is overwritten.
    pub fn decide(
        &self,
        id: &str,
        status: SubmissionStatus,
        remark: Option<&str>,
        decision_by: Option<&str>,
        decision_by_name: Option<&str>,
    ) -> Option<Submission> {
        let updated = {
            let mut entry = self.submissions.get_mut(id)?;
            if entry.status.is_decided() {
                tracing::debug!(
                    "Submission {} re-decided: {} -> {}",
                    id,
                    entry.status,
                    status
                );
            }
            entry.apply_decision(
                status,
                remark.map(str::to_owned),
                decision_by.map(str::to_owned),
                decision_by_name.map(str::to_owned),
                Utc::now(),
            );
            entry.value().clone()
        };
        tracing::debug!("Submission {} marked {}", id, status);

        self.persist_safely();
        Some(updated)
    }

    /// Counts of all submissions by status
    pub fn stats(&self) -> StatusCounts {
        self.submissions
            .iter()
            .map(|entry| entry.status)
            .collect()
    }

    fn collect_newest_first<F>(&self, keep: F) -> Vec<Submission>
    where
        F: Fn(&Submission) -> bool,
    {
        let mut items: Vec<Submission> = self
            .submissions
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    // Persistence

    fn load_from_disk(&self) {
        match self.read_stored() {
            Ok(Some(stored)) => {
                let count = stored.len();
                let now = Utc::now();
                for record in stored {
                    let submission = record.into_submission(now);
                    self.submissions.insert(submission.id.clone(), submission);
                }
                tracing::info!(
                    "Loaded {} capability submissions from {}",
                    count,
                    self.config.storage_file.display()
                );
            }
            Ok(None) => {
                tracing::debug!(
                    "No submissions file at {}, starting empty",
                    self.config.storage_file.display()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load submissions from {}: {}",
                    self.config.storage_file.display(),
                    e
                );
            }
        }
    }

    fn read_stored(&self) -> Result<Option<Vec<StoredSubmission>>> {
        self.ensure_storage_dir()?;
        if !self.config.storage_file.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.config.storage_file)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn persist_safely(&self) {
        let _guard = self
            .persist_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.write_snapshot() {
            tracing::warn!(
                "Failed to persist submissions to {}: {}",
                self.config.storage_file.display(),
                e
            );
        }
    }

    /// Write every submission to a sibling temp file, then rename it over
    /// the storage file. Callers hold `persist_lock`.
    fn write_snapshot(&self) -> Result<()> {
        self.ensure_storage_dir()?;

        let mut snapshot: Vec<Submission> = self
            .submissions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        snapshot.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let json = serde_json::to_vec_pretty(&snapshot)?;
        let tmp = self.temp_file();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.config.storage_file)?;
        Ok(())
    }

    fn ensure_storage_dir(&self) -> Result<()> {
        if let Some(dir) = self.config.storage_dir() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn temp_file(&self) -> PathBuf {
        let mut name = self
            .config
            .storage_file
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.config.storage_file.with_file_name(name)
    }
}
