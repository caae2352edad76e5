// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Probe supersession.
//!
//! A client clicking quickly on the map issues probes faster than they
//! settle. Each probe takes a new generation number and cancels the one
//! before it; a report is only handed back if its generation is still
//! the latest, so an older popup can never overwrite a newer one.

use crate::models::{LayerDescriptor, ProbePoint, ProbeReport};
use crate::services::prober::{OverlapProber, ProbeError};
use crate::services::sources::SpatialSource;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Upper bound on the session table.
pub const MAX_SESSIONS: usize = 10_000;

/// Sessions unused for this long are dropped when pruning.
const SESSION_IDLE: Duration = Duration::from_secs(10 * 60);

/// Minimum time between two pruning scans.
const PRUNE_INTERVAL: Duration = Duration::from_secs(30);

/// Probe state for one client.
#[derive(Debug)]
pub struct ProbeSession {
    generation: AtomicU64,
    current: Mutex<CancellationToken>,
    last_used: Mutex<Instant>,
}

impl Default for ProbeSession {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: Mutex::new(CancellationToken::new()),
            last_used: Mutex::new(Instant::now()),
        }
    }
}

impl ProbeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the most recently started probe.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Start a new generation and cancel whatever was in flight.
    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let previous = {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *current, token.clone())
        };
        previous.cancel();

        if let Ok(mut last_used) = self.last_used.lock() {
            *last_used = Instant::now();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (generation, token)
    }

    fn idle_for(&self) -> Duration {
        self.last_used
            .lock()
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Run a probe that supersedes any earlier one of this session.
    ///
    /// Returns `Ok(None)` if a newer probe started before this one
    /// settled. Invalid points are rejected without cancelling the
    /// probe already in flight.
    pub async fn run<S: SpatialSource>(
        &self,
        prober: &OverlapProber<S>,
        point: &ProbePoint,
        layers: &[LayerDescriptor],
    ) -> Result<Option<ProbeReport>, ProbeError> {
        point.validate().map_err(ProbeError::InvalidPoint)?;

        let (generation, token) = self.begin();

        let report = tokio::select! {
            result = prober.probe(point, layers) => result?,
            _ = token.cancelled() => {
                tracing::debug!(generation, "Probe cancelled by a newer request");
                return Ok(None);
            }
        };

        if !self.is_current(generation) {
            tracing::debug!(generation, "Discarding superseded probe report");
            return Ok(None);
        }
        Ok(Some(report))
    }
}

/// Per-client probe sessions.
#[derive(Debug)]
pub struct ProbeSessions {
    sessions: DashMap<String, Arc<ProbeSession>>,
    max_sessions: usize,
    last_prune: Mutex<Option<Instant>>,
}

impl Default for ProbeSessions {
    fn default() -> Self {
        Self::with_limit(MAX_SESSIONS)
    }
}

impl ProbeSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session table holding at most `max_sessions` clients.
    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions,
            last_prune: Mutex::new(None),
        }
    }

    /// Get the session for `client`, creating it if needed.
    ///
    /// A new client arriving at a full table triggers a prune of idle
    /// sessions; if that frees nothing the client is refused.
    pub fn session(&self, client: &str) -> Result<Arc<ProbeSession>, SessionError> {
        if let Some(session) = self.sessions.get(client) {
            return Ok(session.clone());
        }

        if self.sessions.len() >= self.max_sessions {
            self.prune_idle();
            if self.sessions.len() >= self.max_sessions {
                tracing::warn!(max = self.max_sessions, "Probe session table full");
                return Err(SessionError::Full);
            }
        }

        Ok(self
            .sessions
            .entry(client.to_string())
            .or_default()
            .clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn prune_idle(&self) {
        {
            let mut last_prune = self.last_prune.lock().unwrap_or_else(|e| e.into_inner());
            if matches!(*last_prune, Some(t) if t.elapsed() < PRUNE_INTERVAL) {
                return;
            }
            *last_prune = Some(Instant::now());
        }

        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.idle_for() < SESSION_IDLE);
        tracing::debug!(
            before,
            after = self.sessions.len(),
            "Pruned idle probe sessions"
        );
    }
}

/// Errors from the session table.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Too many active probe sessions")]
    Full,
}
