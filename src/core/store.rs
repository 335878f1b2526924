//! File-backed store for the contribution log, profile and active challenges
//!
//! Everything lives in one pretty-printed JSON document. Writes go to a
//! sibling temp file that is then renamed over the original, so a crash never
//! leaves a half-written store behind.

use crate::core::challenges::ChallengeSet;
use crate::core::models::{Contribution, ContributionEdit, ContributionKind, Profile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Current on-disk format version
pub const STORE_VERSION: u32 = 1;

/// Errors raised by [`Store`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The store file is not valid JSON for this format
    #[error("Corrupt store {}: {source}", .path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The store could not be serialized
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store was written by a newer version
    #[error(
        "Store format version {found} is newer than supported version {supported}",
        supported = STORE_VERSION
    )]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
    },

    /// No contribution matches the given id
    #[error("No contribution with id '{0}'")]
    NotFound(String),

    /// More than one contribution matches the given id prefix
    #[error("Id prefix '{prefix}' matches {count} contributions; use more characters")]
    Ambiguous {
        /// Prefix given
        prefix: String,
        /// Number of matches
        count: usize,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

/// Serialized document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct StoreData {
    version: u32,
    profile: Profile,
    contributions: Vec<Contribution>,
    challenges: ChallengeSet,
    quick_log_counts: BTreeMap<String, u32>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            profile: Profile::default(),
            contributions: Vec::new(),
            challenges: ChallengeSet::default(),
            quick_log_counts: BTreeMap::new(),
        }
    }
}

/// The tracker's persistent state
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    data: StoreData,
}

impl Store {
    /// Open the store at `path`, starting empty if the file does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or was written by a newer format version
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            logger::debug!("No store at {}, starting fresh", path.display());
            return Ok(Self {
                path,
                data: StoreData::default(),
            });
        }

        let content = fs::read_to_string(&path).map_err(io_error(&path))?;
        let data: StoreData = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        if data.version > STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: data.version,
            });
        }

        logger::debug!(
            "Loaded store {} ({} contributions)",
            path.display(),
            data.contributions.len()
        );
        Ok(Self { path, data })
    }

    /// Write the store to disk, creating the parent directory if needed
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(io_error(&tmp_path))?;
        fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))?;

        logger::debug!("Saved store {}", self.path.display());
        Ok(())
    }

    /// Location of the store file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The user's profile
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.data.profile
    }

    /// Mutable access to the user's profile
    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.data.profile
    }

    /// Active challenges
    #[must_use]
    pub const fn challenges(&self) -> &ChallengeSet {
        &self.data.challenges
    }

    /// Mutable access to the active challenges
    pub fn challenges_mut(&mut self) -> &mut ChallengeSet {
        &mut self.data.challenges
    }

    /// Every contribution in insertion order
    #[must_use]
    pub fn contributions(&self) -> &[Contribution] {
        &self.data.contributions
    }

    /// Split borrow used when challenge progress is evaluated while updating state
    pub(crate) fn split_mut(&mut self) -> (&mut Profile, &mut ChallengeSet, &[Contribution]) {
        (
            &mut self.data.profile,
            &mut self.data.challenges,
            &self.data.contributions,
        )
    }

    /// Total number of contributions
    #[must_use]
    pub fn contribution_count(&self) -> usize {
        self.data.contributions.len()
    }

    /// Append a contribution to the log
    pub fn add_contribution(&mut self, contribution: Contribution) {
        self.data.contributions.push(contribution);
    }

    /// Resolve a full id or a unique id prefix (hyphens optional)
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] or [`StoreError::Ambiguous`]
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<Uuid, StoreError> {
        let needle: String = id_or_prefix
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_lowercase();
        if needle.is_empty() {
            return Err(StoreError::NotFound(id_or_prefix.to_string()));
        }

        let matches: Vec<Uuid> = self
            .data
            .contributions
            .iter()
            .map(|c| c.id)
            .filter(|id| id.simple().to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(StoreError::NotFound(id_or_prefix.to_string())),
            _ => Err(StoreError::Ambiguous {
                prefix: id_or_prefix.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Look up a contribution by id or unique prefix
    ///
    /// # Errors
    /// Returns an error if no single contribution matches
    pub fn find(&self, id_or_prefix: &str) -> Result<&Contribution, StoreError> {
        let id = self.resolve_id(id_or_prefix)?;
        self.data
            .contributions
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id_or_prefix.to_string()))
    }

    /// Apply an edit to a contribution
    ///
    /// # Errors
    /// Returns an error if no single contribution matches
    pub fn edit(
        &mut self,
        id_or_prefix: &str,
        edit: ContributionEdit,
    ) -> Result<&Contribution, StoreError> {
        let id = self.resolve_id(id_or_prefix)?;
        let contribution = self
            .data
            .contributions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id_or_prefix.to_string()))?;
        edit.apply(contribution);
        Ok(contribution)
    }

    /// Remove a contribution from the log
    ///
    /// # Errors
    /// Returns an error if no single contribution matches
    pub fn delete(&mut self, id_or_prefix: &str) -> Result<Contribution, StoreError> {
        let id = self.resolve_id(id_or_prefix)?;
        let index = self
            .data
            .contributions
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id_or_prefix.to_string()))?;
        Ok(self.data.contributions.remove(index))
    }

    /// Contributions newest first, optionally filtered by category and limited
    #[must_use]
    pub fn recent(
        &self,
        kind: Option<ContributionKind>,
        limit: Option<usize>,
    ) -> Vec<&Contribution> {
        let mut list: Vec<&Contribution> = self
            .data
            .contributions
            .iter()
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .collect();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = limit {
            list.truncate(limit);
        }
        list
    }

    /// Number of contributions per category
    #[must_use]
    pub fn totals_by_kind(&self) -> BTreeMap<ContributionKind, usize> {
        let mut totals = BTreeMap::new();
        for contribution in &self.data.contributions {
            *totals.entry(contribution.kind).or_insert(0) += 1;
        }
        totals
    }

    /// Bump and return the quick-log counter for `title`
    pub fn next_quick_log_number(&mut self, title: &str) -> u32 {
        let count = self
            .data
            .quick_log_counts
            .entry(title.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ContributionDraft;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn entry(kind: ContributionKind, d: u32, title: &str) -> Contribution {
        Contribution::from_draft(ContributionDraft::new(kind, day(d)).with_title(title), 5)
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.contribution_count(), 0);
        assert_eq!(store.profile().level, 1);
        assert!(store.challenges().daily.is_none());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = Store::open(&path).unwrap();
        store.add_contribution(entry(ContributionKind::Kindness, 3, "Helped a neighbour"));
        store.profile_mut().streak = 4;
        store.save().unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.contribution_count(), 1);
        assert_eq!(reopened.contributions()[0].title, "Helped a neighbour");
        assert_eq!(reopened.profile().streak, 4);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Store::open(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"version": 99}"#).unwrap();
        assert!(matches!(
            Store::open(&path),
            Err(StoreError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();
        let first = entry(ContributionKind::Donation, 1, "Coat drive");
        let id = first.id;
        store.add_contribution(first);

        let short = id.simple().to_string()[..6].to_string();
        assert_eq!(store.resolve_id(&short).unwrap(), id);
        assert_eq!(store.resolve_id(&id.to_string().to_uppercase()).unwrap(), id);
        assert!(matches!(store.resolve_id("zzzz"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.resolve_id(""), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_ambiguous_prefix() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();
        let mut a = entry(ContributionKind::Donation, 1, "a");
        let mut b = entry(ContributionKind::Donation, 2, "b");
        a.id = Uuid::parse_str("abcd0000-0000-4000-8000-000000000001").unwrap();
        b.id = Uuid::parse_str("abcd0000-0000-4000-8000-000000000002").unwrap();
        store.add_contribution(a);
        store.add_contribution(b);

        assert!(matches!(
            store.resolve_id("abcd"),
            Err(StoreError::Ambiguous { count: 2, .. })
        ));
        assert!(store.find("abcd0000000040008000000000000002").is_ok());
    }

    #[test]
    fn test_edit_and_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();
        let c = entry(ContributionKind::Cleanliness, 5, "Beach clean");
        let id = c.id.to_string();
        store.add_contribution(c);

        let edited = store
            .edit(
                &id,
                ContributionEdit {
                    title: Some("River clean".to_string()),
                    ..ContributionEdit::default()
                },
            )
            .unwrap();
        assert_eq!(edited.title, "River clean");

        let removed = store.delete(&id).unwrap();
        assert_eq!(removed.title, "River clean");
        assert_eq!(store.contribution_count(), 0);
        assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_recent_sorted_filtered_limited() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();
        store.add_contribution(entry(ContributionKind::Kindness, 2, "k2"));
        store.add_contribution(entry(ContributionKind::Donation, 9, "d9"));
        store.add_contribution(entry(ContributionKind::Kindness, 7, "k7"));

        let titles: Vec<_> = store.recent(None, None).iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["d9", "k7", "k2"]);

        let kindness: Vec<_> = store
            .recent(Some(ContributionKind::Kindness), Some(1))
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(kindness, vec!["k7"]);

        let totals = store.totals_by_kind();
        assert_eq!(totals.get(&ContributionKind::Kindness), Some(&2));
        assert_eq!(totals.get(&ContributionKind::Donation), Some(&1));
        assert_eq!(totals.get(&ContributionKind::Other), None);
    }

    #[test]
    fn test_quick_log_counters() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.next_quick_log_number("Litter Pick"), 1);
        assert_eq!(store.next_quick_log_number("Litter Pick"), 2);
        assert_eq!(store.next_quick_log_number("Watering"), 1);
    }
}
