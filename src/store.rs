//! Joke store
//!
//! Authoritative in-memory list of jokes plus the persisted snapshot.
//! The seen-set is derived from the list and rebuilt on every load; only the
//! list itself is written to storage.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{SnapshotError, StoreError};
use crate::models::{Joke, SHORT_ID_LEN};
use crate::storage::KeyValueStorage;

/// Persisted, votable list of jokes
pub struct JokeStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    jokes: Vec<Joke>,
    seen: HashSet<String>,
}

impl<S: KeyValueStorage> JokeStore<S> {
    /// Open the store and load whatever snapshot is stored under `key`
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            jokes: Vec::new(),
            seen: HashSet::new(),
        };
        store.reload();
        store
    }

    /// Read the persisted snapshot, treating absent or malformed data as empty
    pub fn load(&self) -> Vec<Joke> {
        match self.read_snapshot() {
            Ok(Some(jokes)) => jokes,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring unreadable joke snapshot");
                Vec::new()
            }
        }
    }

    /// Read the persisted snapshot, reporting why it could not be used
    pub fn read_snapshot(&self) -> Result<Option<Vec<Joke>>, SnapshotError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        let jokes: Vec<Joke> = serde_json::from_str(&raw)?;
        Ok(Some(jokes))
    }

    /// Replace in-memory state with the persisted snapshot
    pub fn reload(&mut self) {
        let loaded = self.load();
        self.jokes.clear();
        self.seen.clear();

        for joke in loaded {
            if self.seen.insert(joke.text.clone()) {
                self.jokes.push(joke);
            } else {
                warn!(id = %joke.id, "Dropping stored joke with duplicate text");
            }
        }

        debug!(key = %self.key, count = self.jokes.len(), "Joke store loaded");
    }

    /// Add jokes in order and persist.
    ///
    /// Callers are expected to pass only unseen texts; anything already seen
    /// is skipped.
    pub fn append(&mut self, new_jokes: Vec<Joke>) {
        let mut added = 0;
        for joke in new_jokes {
            if !self.seen.insert(joke.text.clone()) {
                warn!(text = %joke.text, "Skipping joke already on the board");
                continue;
            }
            self.jokes.push(joke);
            added += 1;
        }

        if added > 0 {
            info!(added, total = self.jokes.len(), "Jokes added");
            self.persist_or_log();
        }
    }

    /// Apply `delta` to the joke with `id`. Returns false if there is no such joke.
    pub fn vote(&mut self, id: Uuid, delta: i64) -> bool {
        let Some(joke) = self.jokes.iter_mut().find(|j| j.id == id) else {
            debug!(%id, "Vote for unknown joke ignored");
            return false;
        };
        joke.votes = joke.votes.saturating_add(delta);
        debug!(%id, delta, votes = joke.votes, "Vote recorded");

        self.persist_or_log();
        true
    }

    /// Jokes ordered by votes, highest first. Ties keep insertion order.
    pub fn sorted_view(&self) -> Vec<Joke> {
        let mut view = self.jokes.clone();
        view.sort_by(|a, b| b.votes.cmp(&a.votes));
        view
    }

    pub fn has_seen(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    /// Jokes in insertion order
    pub fn jokes(&self) -> &[Joke] {
        &self.jokes
    }

    pub fn get(&self, id: Uuid) -> Option<&Joke> {
        self.jokes.iter().find(|j| j.id == id)
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }

    /// Find a joke by 1-based rank in the sorted view, or by full id / unique id prefix.
    ///
    /// A number is a rank only when it is shorter than a short id and within
    /// the board; anything else is matched against ids, so an all-digit short
    /// id still resolves.
    pub fn resolve(&self, reference: &str) -> Option<Uuid> {
        let reference = reference.trim();
        if reference.len() < SHORT_ID_LEN {
            if let Ok(rank @ 1..) = reference.parse::<usize>() {
                if let Some(joke) = self.sorted_view().get(rank - 1) {
                    return Some(joke.id);
                }
            }
        }
        if let Ok(id) = Uuid::parse_str(reference) {
            return self.get(id).map(|j| j.id);
        }

        let prefix = reference.to_ascii_lowercase().replace('-', "");
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .jokes
            .iter()
            .filter(|j| j.id.simple().to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(joke), None) => Some(joke.id),
            _ => None,
        }
    }

    /// Write the full list under the store key
    pub fn persist(&self) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&self.jokes)?;
        self.storage.set(&self.key, &encoded)?;
        Ok(())
    }

    fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            error!(key = %self.key, error = %e, "Failed to persist jokes; keeping in-memory state");
        }
    }
}
