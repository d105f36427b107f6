//! Durable favorites store.
//!
//! A JSON document file keyed by card id. Writes land on disk before the
//! in-memory map or any subscriber sees them: the file is written to a temp
//! path and renamed into place, the map is updated, and a change
//! notification is broadcast, in that order. A failed write leaves both the
//! file and the map untouched.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::models::{Card, FavoriteRecord};

const CHANNEL_CAPACITY: usize = 64;

/// Local persistence of favorite status, with change notifications.
///
/// All writes are serialized behind one lock; reads clone out under the
/// same lock, so a toggle can never race a list refresh into a lost update.
pub struct FavoritesStore {
    path: PathBuf,
    records: Mutex<HashMap<String, FavoriteRecord>>,
    changes: broadcast::Sender<String>,
}

impl FavoritesStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store. Records written by older
    /// versions of the store load with defaulted fields. An unparseable
    /// file is moved aside to `<path>.corrupt` and the store starts empty;
    /// user data is never deleted outright.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let records = Self::load(&path)?;
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Ok(Self {
            path,
            records: Mutex::new(records),
            changes,
        })
    }

    fn load(path: &Path) -> Result<HashMap<String, FavoriteRecord>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(path)?;
        match serde_json::from_str::<Vec<FavoriteRecord>>(&contents) {
            Ok(list) => Ok(list
                .into_iter()
                .map(|r| (r.card_id.clone(), r))
                .collect()),
            Err(e) => {
                let sidelined = path.with_extension("json.corrupt");
                eprintln!(
                    "Corrupt favorites file {}: {} -- moving to {}",
                    path.display(),
                    e,
                    sidelined.display()
                );
                fs::rename(path, &sidelined)?;
                Ok(HashMap::new())
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, FavoriteRecord>>> {
        self.records
            .lock()
            .map_err(|_| Error::Persistence("favorites store lock poisoned".into()))
    }

    /// Look up a record. Absent means the card was never toggled.
    pub fn get(&self, card_id: &str) -> Option<FavoriteRecord> {
        self.records.lock().ok()?.get(card_id).cloned()
    }

    /// Set the favorite flag for a card, creating the record if absent.
    ///
    /// A provided snapshot refreshes the denormalized display fields to the
    /// latest known values. The change notification fires only after the
    /// record is durably on disk; on a failed write neither the map nor any
    /// subscriber observes the toggle.
    pub fn set_favorite(
        &self,
        card_id: &str,
        is_favorite: bool,
        snapshot: Option<&Card>,
    ) -> Result<()> {
        let mut records = self.lock()?;

        let mut updated = records
            .get(card_id)
            .cloned()
            .unwrap_or_else(|| FavoriteRecord::new(card_id, is_favorite));
        updated.is_favorite = is_favorite;
        if let Some(card) = snapshot {
            updated.apply_snapshot(card);
        }

        let mut next = records.clone();
        next.insert(card_id.to_string(), updated);
        self.persist(&next)?;
        *records = next;
        drop(records);

        // Receivers may come and go; a send with no subscribers is fine.
        let _ = self.changes.send(card_id.to_string());
        Ok(())
    }

    /// All records currently flagged favorite, in stable id order.
    pub fn list_favorites(&self) -> Vec<FavoriteRecord> {
        let records = match self.records.lock() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let mut list: Vec<FavoriteRecord> = records
            .values()
            .filter(|r| r.is_favorite)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.card_id.cmp(&b.card_id));
        list
    }

    /// Subscribe to change notifications: one card id per successful
    /// [`set_favorite`](Self::set_favorite), delivered after the durable
    /// update.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full record set to a temp file and rename into place, so
    /// an interrupted write never leaves a corrupt file behind.
    fn persist(&self, records: &HashMap<String, FavoriteRecord>) -> Result<()> {
        let mut list: Vec<&FavoriteRecord> = records.values().collect();
        list.sort_by(|a, b| a.card_id.cmp(&b.card_id));
        let json = serde_json::to_string_pretty(&list)?;

        let tmp = self.path.with_extension("json.tmp");
        let result = (|| -> Result<()> {
            fs::write(&tmp, json.as_bytes())?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }

        result
    }
}
