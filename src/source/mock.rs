//! Scripted joke source for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::JokeSource;
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum Reply {
    Joke(String),
    Status(u16),
}

/// Replies from a fixed script, one entry per call.
///
/// When the script runs out the fallback joke is repeated if set, otherwise
/// calls fail with HTTP 503.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Reply>>,
    fallback: Option<String>,
    call_count: AtomicU32,
}

impl ScriptedSource {
    /// Source answering with `jokes` in order
    pub fn new<I, T>(jokes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            script: Mutex::new(jokes.into_iter().map(|j| Reply::Joke(j.into())).collect()),
            fallback: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Source that answers with the same joke forever
    pub fn repeating(joke: impl Into<String>) -> Self {
        Self::new(Vec::<String>::new()).with_fallback(joke)
    }

    /// Append a failing reply with the given HTTP status
    pub fn then_fail(self, status: u16) -> Self {
        self.push(Reply::Status(status));
        self
    }

    /// Append more jokes to the script
    pub fn then_jokes<I, T>(self, jokes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for joke in jokes {
            self.push(Reply::Joke(joke.into()));
        }
        self
    }

    /// Joke to repeat once the script is used up
    pub fn with_fallback(mut self, joke: impl Into<String>) -> Self {
        self.fallback = Some(joke.into());
        self
    }

    /// Number of times `next_joke` was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn push(&self, reply: Reply) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
    }
}

#[async_trait]
impl JokeSource for ScriptedSource {
    async fn next_joke(&self) -> Result<String, FetchError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let next = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match (next, &self.fallback) {
            (Some(Reply::Joke(text)), _) => Ok(text),
            (Some(Reply::Status(status)), _) => Err(FetchError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(FetchError::Status {
                status: 503,
                body: "script exhausted".to_string(),
            }),
        }
    }
}
