//! Joke sources
//!
//! Trait seam over the remote joke API:
//! - HTTP (icanhazdadjoke.com or anything answering the same JSON)
//! - Scripted source for tests

pub mod http;
pub mod mock;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::{HttpJokeSource, JokeResponse};
pub use mock::ScriptedSource;

/// Something that hands out one random joke per call
#[async_trait]
pub trait JokeSource: Send + Sync {
    /// Fetch a single joke's text
    async fn next_joke(&self) -> Result<String, FetchError>;
}
