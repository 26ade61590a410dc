//! dad-jokes: a persisted, votable list of dad jokes
//!
//! Jokes are pulled one at a time from a remote joke API, deduplicated against
//! everything already kept, and stored as a JSON snapshot that survives restarts.
//!
//! # Example
//!
//! ```rust,no_run
//! use dad_jokes::{
//!     CancellationFlag, FileStorage, HttpJokeSource, JokeBoard, JokeFetcher, JokeStore,
//! };
//! use dad_jokes::config::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let storage = FileStorage::new(&config.storage.data_dir);
//! let store = JokeStore::open(storage, &config.storage.key);
//! let fetcher = JokeFetcher::new(HttpJokeSource::new(&config.api)?)
//!     .with_limits(config.fetch.limits());
//!
//! let mut board = JokeBoard::new(store, fetcher, config.fetch.num_jokes_to_get);
//! let jokes = board.refresh(&CancellationFlag::new()).await?;
//! for joke in jokes {
//!     println!("{:>3}  {}", joke.votes, joke.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod source;
pub mod storage;
pub mod store;

pub use board::JokeBoard;
pub use error::{FetchError, SnapshotError, StorageError, StoreError};
pub use fetcher::{CancellationFlag, FetchLimits, JokeFetcher};
pub use models::{Joke, Vote};
pub use source::{HttpJokeSource, JokeSource, ScriptedSource};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::JokeStore;
