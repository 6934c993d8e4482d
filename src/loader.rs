//! Background loader for the show collection
//!
//! One worker thread per request. Results come back over a channel and are
//! applied on the UI thread by [`MovieLoader::poll`], only when the request
//! is still current and has not been cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

use crate::api::{FetchError, MovieSource};
use crate::models::Movie;

#[derive(Debug, Error, PartialEq)]
pub enum LoaderError {
    #[error("source URL must not be empty")]
    EmptySource,
}

/// Tri-state outcome of a read
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Error(String),
    Data(T),
}

impl<T: Default> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Data(T::default())
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T> FetchState<Vec<T>> {
    /// Loaded items, empty while loading or after an error
    pub fn data(&self) -> &[T] {
        match self {
            FetchState::Data(data) => data,
            _ => &[],
        }
    }
}

/// Shared cancellation flag handed to a worker
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct LoadMessage {
    generation: u64,
    result: Result<Vec<Movie>, FetchError>,
}

/// What a call to [`MovieLoader::poll`] applied
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Loaded(usize),
    Failed(String),
}

pub struct MovieLoader {
    source: Arc<dyn MovieSource>,
    url: String,
    state: FetchState<Vec<Movie>>,
    generation: u64,
    cancel: Option<CancelToken>,
    sender: Sender<LoadMessage>,
    receiver: Receiver<LoadMessage>,
}

impl MovieLoader {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        let (sender, receiver) = channel();
        Self {
            source,
            url: String::new(),
            state: FetchState::default(),
            generation: 0,
            cancel: None,
            sender,
            receiver,
        }
    }

    pub fn state(&self) -> &FetchState<Vec<Movie>> {
        &self.state
    }

    /// Loaded shows, empty unless the last request succeeded
    pub fn movies(&self) -> &[Movie] {
        self.state.data()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start loading `url` unless it is already the current source
    pub fn load(&mut self, url: &str) -> Result<(), LoaderError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LoaderError::EmptySource);
        }
        // A request cancelled before resolving leaves nothing to reuse
        let abandoned = self.cancel.is_none() && self.state.is_loading();
        if url == self.url && self.generation > 0 && !abandoned {
            return Ok(());
        }
        self.start(url.to_string());
        Ok(())
    }

    /// Re-issue the request for the current source
    pub fn reload(&mut self) -> Result<(), LoaderError> {
        if self.url.is_empty() {
            return Err(LoaderError::EmptySource);
        }
        self.start(self.url.clone());
        Ok(())
    }

    fn start(&mut self, url: String) {
        self.cancel();

        self.generation += 1;
        self.url = url.clone();
        self.state = FetchState::Loading;

        let token = CancelToken::new();
        self.cancel = Some(token.clone());

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        tracing::info!(generation, url = %url, "fetching shows");
        thread::spawn(move || {
            if token.is_cancelled() {
                return;
            }
            let result = source.fetch_movies(&url);
            if token.is_cancelled() {
                tracing::debug!(generation, "fetch aborted");
                return;
            }
            let _ = sender.send(LoadMessage { generation, result });
        });
    }

    /// Signal the in-flight request, if any, to be discarded.
    ///
    /// State is left as is. Safe to call repeatedly; only the first call
    /// per request signals.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }

    /// Apply finished results. Call once per frame.
    pub fn poll(&mut self) -> Option<LoadEvent> {
        let mut event = None;
        while let Ok(msg) = self.receiver.try_recv() {
            let current = msg.generation == self.generation
                && self.cancel.as_ref().is_some_and(|t| !t.is_cancelled());
            if !current {
                tracing::debug!(generation = msg.generation, "discarding stale result");
                continue;
            }

            // Request resolved; nothing left to cancel
            self.cancel = None;
            event = Some(match msg.result {
                Ok(movies) => {
                    tracing::info!(count = movies.len(), "shows loaded");
                    let count = movies.len();
                    self.state = FetchState::Data(movies);
                    LoadEvent::Loaded(count)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "show fetch failed");
                    let message = e.to_string();
                    self.state = FetchState::Error(message.clone());
                    LoadEvent::Failed(message)
                }
            });
        }
        event
    }
}

impl Drop for MovieLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
