//! Joke board session
//!
//! What a presentation shell drives: a store, a fetcher, and the "loading"
//! signal raised while a refresh is in flight.

use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::FetchError;
use crate::fetcher::{CancellationFlag, JokeFetcher};
use crate::models::{Joke, Vote};
use crate::source::JokeSource;
use crate::storage::KeyValueStorage;
use crate::store::JokeStore;

pub struct JokeBoard<S: KeyValueStorage, J: JokeSource> {
    store: JokeStore<S>,
    fetcher: JokeFetcher<J>,
    jokes_per_refresh: usize,
    loading: watch::Sender<bool>,
}

impl<S: KeyValueStorage, J: JokeSource> JokeBoard<S, J> {
    pub fn new(store: JokeStore<S>, fetcher: JokeFetcher<J>, jokes_per_refresh: usize) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            store,
            fetcher,
            jokes_per_refresh,
            loading,
        }
    }

    /// Receiver that flips to `true` for the duration of each refresh
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn jokes_per_refresh(&self) -> usize {
        self.jokes_per_refresh
    }

    pub fn set_jokes_per_refresh(&mut self, count: usize) {
        self.jokes_per_refresh = count;
    }

    /// Fetch a batch of new jokes, add them, and return the sorted board.
    ///
    /// On error nothing is added and the stored jokes are left as they were.
    pub async fn refresh(&mut self, cancel: &CancellationFlag) -> Result<Vec<Joke>, FetchError> {
        self.loading.send_replace(true);

        let store = &self.store;
        let result = self
            .fetcher
            .fetch_unique(self.jokes_per_refresh, |text| store.has_seen(text), cancel)
            .await;

        self.loading.send_replace(false);

        match result {
            Ok(jokes) => {
                info!(fetched = jokes.len(), "Refresh complete");
                self.store.append(jokes);
                Ok(self.store.sorted_view())
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, board unchanged");
                Err(e)
            }
        }
    }

    /// Refresh only when the board has nothing on it yet
    pub async fn ensure_populated(
        &mut self,
        cancel: &CancellationFlag,
    ) -> Result<Vec<Joke>, FetchError> {
        if self.store.is_empty() {
            info!("No saved jokes, fetching a first batch");
            return self.refresh(cancel).await;
        }
        Ok(self.store.sorted_view())
    }

    /// Record a vote. Returns false if the joke is not on the board.
    pub fn vote(&mut self, id: Uuid, vote: Vote) -> bool {
        self.store.vote(id, vote.delta())
    }

    pub fn sorted_view(&self) -> Vec<Joke> {
        self.store.sorted_view()
    }

    pub fn store(&self) -> &JokeStore<S> {
        &self.store
    }

    pub fn fetcher(&self) -> &JokeFetcher<J> {
        &self.fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use crate::storage::MemoryStorage;

    fn board(source: ScriptedSource, per_refresh: usize) -> JokeBoard<MemoryStorage, ScriptedSource> {
        JokeBoard::new(
            JokeStore::open(MemoryStorage::new(), "jokes"),
            JokeFetcher::new(source),
            per_refresh,
        )
    }

    fn texts(jokes: &[Joke]) -> Vec<&str> {
        jokes.iter().map(|j| j.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_then_vote_reorders() {
        let mut board = board(ScriptedSource::new(["A", "B", "C"]), 3);
        let jokes = board.refresh(&CancellationFlag::new()).await.unwrap();
        assert_eq!(texts(&jokes), vec!["A", "B", "C"]);
        assert!(jokes.iter().all(|j| j.votes == 0));

        let b = jokes[1].id;
        assert!(board.vote(b, Vote::Up));
        assert_eq!(texts(&board.sorted_view()), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_second_refresh_skips_stored_texts() {
        let source = ScriptedSource::new(["A", "B", "A", "C", "B", "D"]);
        let mut board = board(source, 2);

        board.refresh(&CancellationFlag::new()).await.unwrap();
        let jokes = board.refresh(&CancellationFlag::new()).await.unwrap();

        assert_eq!(texts(board.store().jokes()), vec!["A", "B", "C", "D"]);
        assert_eq!(jokes.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_board_intact() {
        let mut board = board(ScriptedSource::new(["A", "B"]).then_fail(500), 2);
        board.refresh(&CancellationFlag::new()).await.unwrap();

        let result = board.refresh(&CancellationFlag::new()).await;
        assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
        assert_eq!(texts(board.store().jokes()), vec!["A", "B"]);
        assert!(!board.is_loading());
    }

    #[tokio::test]
    async fn test_ensure_populated_only_fetches_when_empty() {
        let mut board = board(ScriptedSource::new(["A", "B", "C", "D"]), 2);

        board.ensure_populated(&CancellationFlag::new()).await.unwrap();
        board.ensure_populated(&CancellationFlag::new()).await.unwrap();

        assert_eq!(board.store().len(), 2);
        assert_eq!(board.fetcher().source().call_count(), 2);
    }

    #[tokio::test]
    async fn test_loading_signal_toggles() {
        let mut board = board(ScriptedSource::new(["A"]), 1);
        let mut loading = board.subscribe_loading();
        assert!(!*loading.borrow());

        board.refresh(&CancellationFlag::new()).await.unwrap();

        // Raised then cleared during the refresh
        assert!(loading.has_changed().unwrap());
        assert!(!*loading.borrow_and_update());
        assert!(!board.is_loading());
    }

    #[tokio::test]
    async fn test_downvote_unknown_joke() {
        let mut board = board(ScriptedSource::new(["A"]), 1);
        board.refresh(&CancellationFlag::new()).await.unwrap();

        assert!(!board.vote(Uuid::new_v4(), Vote::Down));
        assert_eq!(board.sorted_view()[0].votes, 0);
    }
}
