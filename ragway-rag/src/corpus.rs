//! Exactly-once lazy construction of the dataset index.
//!
//! [`LazyCorpus`] moves through `Unbuilt → Building → Ready | Failed`. The
//! first caller to find it `Unbuilt` claims the build; every other caller
//! waits for the terminal state and receives the same outcome. A failure is
//! sticky: later callers get the same error back until [`LazyCorpus::reset`]
//! is called.

use std::sync::Arc;

use ragway_core::Credentials;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::DatasetIndex;
use crate::source::CorpusSource;

#[derive(Debug, Clone)]
enum CorpusState {
    Unbuilt,
    Building,
    Ready(Arc<DatasetIndex>),
    Failed(RagError),
}

/// A point-in-time view of a [`LazyCorpus`].
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusStatus {
    Unbuilt,
    Building,
    Ready { documents: usize },
    Failed(RagError),
}

/// A corpus that is embedded on first use and then shared read-only.
pub struct LazyCorpus {
    source: Arc<dyn CorpusSource>,
    embedder: Arc<dyn EmbeddingProvider>,
    state: watch::Sender<CorpusState>,
}

impl LazyCorpus {
    pub fn new(source: Arc<dyn CorpusSource>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let (state, _) = watch::channel(CorpusState::Unbuilt);
        Self { source, embedder, state }
    }

    /// Return the built index, building it first if nobody has yet.
    ///
    /// `credentials` are only used when this call performs the build.
    ///
    /// # Errors
    ///
    /// Returns the construction error, whether this call built the corpus or
    /// waited on another caller that did.
    pub async fn get_or_build(&self, credentials: &Credentials) -> Result<Arc<DatasetIndex>> {
        loop {
            let claimed = self.state.send_if_modified(|state| {
                if matches!(state, CorpusState::Unbuilt) {
                    *state = CorpusState::Building;
                    true
                } else {
                    false
                }
            });
            if claimed {
                return self.build(credentials).await;
            }

            let mut rx = self.state.subscribe();
            let settled = match rx.wait_for(|state| !matches!(state, CorpusState::Building)).await
            {
                Ok(state) => state.clone(),
                Err(_) => return Err(RagError::CorpusError("corpus state closed".to_string())),
            };

            match settled {
                CorpusState::Ready(index) => return Ok(index),
                CorpusState::Failed(err) => return Err(err),
                // The builder was cancelled; race to claim the build again.
                CorpusState::Unbuilt | CorpusState::Building => continue,
            }
        }
    }

    async fn build(&self, credentials: &Credentials) -> Result<Arc<DatasetIndex>> {
        let guard = BuildGuard { state: &self.state, finished: false };

        let outcome =
            DatasetIndex::build(self.source.as_ref(), self.embedder.as_ref(), credentials)
                .await
                .map(Arc::new);

        match &outcome {
            Ok(index) => {
                info!(document_count = index.len(), "corpus ready");
                guard.finish(CorpusState::Ready(Arc::clone(index)));
            }
            Err(e) => {
                error!(error = %e, "corpus construction failed");
                guard.finish(CorpusState::Failed(e.clone()));
            }
        }
        outcome
    }

    pub fn status(&self) -> CorpusStatus {
        match &*self.state.borrow() {
            CorpusState::Unbuilt => CorpusStatus::Unbuilt,
            CorpusState::Building => CorpusStatus::Building,
            CorpusState::Ready(index) => CorpusStatus::Ready { documents: index.len() },
            CorpusState::Failed(err) => CorpusStatus::Failed(err.clone()),
        }
    }

    /// Return a terminal corpus to `Unbuilt` so the next caller rebuilds it.
    ///
    /// Has no effect while a build is in progress or before the first one.
    /// Returns whether the state changed.
    pub fn reset(&self) -> bool {
        let reset = self.state.send_if_modified(|state| {
            if matches!(state, CorpusState::Ready(_) | CorpusState::Failed(_)) {
                *state = CorpusState::Unbuilt;
                true
            } else {
                false
            }
        });
        if reset {
            info!("corpus reset");
        }
        reset
    }
}

/// Returns the corpus to `Unbuilt` if the building future is dropped before
/// it reaches a terminal state.
struct BuildGuard<'a> {
    state: &'a watch::Sender<CorpusState>,
    finished: bool,
}

impl BuildGuard<'_> {
    fn finish(mut self, state: CorpusState) {
        self.finished = true;
        self.state.send_replace(state);
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("corpus build abandoned before completion");
            self.state.send_replace(CorpusState::Unbuilt);
        }
    }
}
