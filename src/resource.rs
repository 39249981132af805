//! Loading/Success/Error envelope for asynchronous operations.
//!
//! A [`ResourceFlow`] is the state sequence of one invocation: exactly one
//! `Loading`, then exactly one terminal `Success` or `Error`, then the end of
//! the sequence. Each emission replaces the previous one for the consumer.

use std::future::Future;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    /// Work in flight, optionally with stale data to show meanwhile.
    Loading(Option<T>),
    Success(T),
    Error { message: String, data: Option<T> },
}

impl<T> Resource<T> {
    #[must_use]
    pub const fn loading() -> Self {
        Self::Loading(None)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Loading(data) | Self::Error { data, .. } => data.as_ref(),
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Loading(data) | Self::Error { data, .. } => data,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn map<R, F: FnOnce(T) -> R>(self, transform: F) -> Resource<R> {
        match self {
            Self::Success(data) => Resource::Success(transform(data)),
            Self::Error { message, data } => Resource::Error {
                message,
                data: data.map(transform),
            },
            Self::Loading(data) => Resource::Loading(data.map(transform)),
        }
    }
}

impl<T> From<Result<T, String>> for Resource<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(message) => Self::error(message),
        }
    }
}

/// State sequence of a single operation.
///
/// The operation runs on the tokio runtime, off the caller's task. Dropping
/// the flow or calling [`ResourceFlow::cancel`] abandons the result; the
/// operation stops at its next suspension point.
#[derive(Debug)]
pub struct ResourceFlow<T> {
    rx: mpsc::Receiver<Resource<T>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> ResourceFlow<T> {
    /// Start `operation` and emit `Loading`, then its outcome.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T, String>> + Send + 'static,
    {
        // Loading + terminal: the sender never waits.
        let (tx, rx) = mpsc::channel(2);

        let task = tokio::spawn(async move {
            if tx.send(Resource::loading()).await.is_err() {
                return;
            }

            let terminal = Resource::from(operation.await);

            if tx.send(terminal).await.is_err() {
                debug!("resource flow dropped before the terminal state");
            }
        });

        Self { rx, task }
    }

    /// Next state, or `None` once the sequence has ended or was cancelled.
    pub async fn next(&mut self) -> Option<Resource<T>> {
        self.rx.recv().await
    }

    /// Drain the sequence and return its terminal state.
    pub async fn terminal(mut self) -> Resource<T> {
        let mut last = None;
        while let Some(state) = self.next().await {
            last = Some(state);
        }

        match last {
            Some(state) if state.is_terminal() => state,
            _ => Resource::error("operation cancelled"),
        }
    }

    /// Drain the sequence into a vector, mostly useful in tests and scripts.
    pub async fn collect(mut self) -> Vec<Resource<T>> {
        let mut states = Vec::with_capacity(2);
        while let Some(state) = self.next().await {
            states.push(state);
        }
        states
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl<T> Drop for ResourceFlow<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
