// ABOUTME: Serializes recommendation refreshes with a request-generation counter
// ABOUTME: A newer refresh, an explicit cancel, or dropping the refresher supersedes in-flight requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Refresh serialization
//!
//! Each call to [`RecommendationRefresher::refresh`] bumps the generation held
//! in a `watch` channel. In-flight requests watch that channel and abort as
//! soon as the generation moves past theirs (cancel-and-replace), so a slow
//! response can never overwrite a newer one.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::service::{RecommendationOutcome, RecommendationService};
use crate::models::UserProfile;

/// Result of one refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The refresh was still current when it finished
    Completed(RecommendationOutcome),
    /// A newer refresh or a cancel replaced this one; its result was discarded
    Superseded {
        /// Generation of the discarded request
        generation: u64,
    },
}

impl RefreshOutcome {
    /// Whether the result was discarded
    #[must_use]
    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// The outcome, if the refresh completed
    #[must_use]
    pub fn into_completed(self) -> Option<RecommendationOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Superseded { .. } => None,
        }
    }
}

/// Owner of the recommendation requests for one view
pub struct RecommendationRefresher {
    service: Arc<RecommendationService>,
    generation: watch::Sender<u64>,
}

impl RecommendationRefresher {
    /// Refresher over a shared service
    #[must_use]
    pub fn new(service: Arc<RecommendationService>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            service,
            generation,
        }
    }

    /// Generation of the most recent refresh or cancel
    #[must_use]
    pub fn current_generation(&self) -> u64 {
        *self.generation.borrow()
    }

    fn begin(&self) -> (u64, watch::Receiver<u64>) {
        let mut started = 0;
        self.generation.send_modify(|generation| {
            *generation += 1;
            started = *generation;
        });
        (started, self.generation.subscribe())
    }

    /// Fetch recommendations, superseding any request still in flight
    pub async fn refresh(&self, profile: &UserProfile) -> RefreshOutcome {
        let (generation, watcher) = self.begin();
        run_generation(&self.service, profile, generation, watcher).await
    }

    /// Like [`refresh`](Self::refresh), on a background task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_refresh(&self, profile: UserProfile) -> JoinHandle<RefreshOutcome> {
        let (generation, watcher) = self.begin();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move { run_generation(&service, &profile, generation, watcher).await })
    }

    /// Supersede whatever is in flight without starting a new request
    pub fn cancel(&self) {
        self.generation.send_modify(|generation| *generation += 1);
        debug!(generation = self.current_generation(), "Recommendation refresh cancelled");
    }
}

impl Drop for RecommendationRefresher {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_generation(
    service: &RecommendationService,
    profile: &UserProfile,
    generation: u64,
    watcher: watch::Receiver<u64>,
) -> RefreshOutcome {
    let mut superseded_watch = watcher.clone();
    tokio::select! {
        outcome = service.get_recommendations(profile) => {
            if *watcher.borrow() == generation {
                RefreshOutcome::Completed(outcome)
            } else {
                debug!(generation, "Discarding recommendations from a superseded refresh");
                RefreshOutcome::Superseded { generation }
            }
        }
        () = wait_until_superseded(&mut superseded_watch, generation) => {
            debug!(generation, "Recommendation refresh superseded while in flight");
            RefreshOutcome::Superseded { generation }
        }
    }
}

/// Resolves once the generation moves past `generation` or the refresher is gone
async fn wait_until_superseded(watcher: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if *watcher.borrow_and_update() != generation {
            return;
        }
        if watcher.changed().await.is_err() {
            return;
        }
    }
}
