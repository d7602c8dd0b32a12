//! Session use case implementation.
//!
//! This module provides the `SessionUseCase` which drives the honeypot engine
//! for concurrent conversations: it owns the session registry, serializes
//! turns per session, and delivers completed reports in the background.

use crate::dispatch::RetryingDispatcher;
use crate::request::{TurnRequest, TurnResponse};
use crate::session::{SessionHandle, SessionRegistry};
use honeypot_core::error::{HoneypotError, Result};
use honeypot_core::report::{DeliveryOutcome, ReportDispatcher, ReportPayload};
use honeypot_core::session::{CompletionClaim, HoneypotEngine, SessionSnapshot};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tokio_util::task::TaskTracker;

/// Use case for turn ingestion, snapshots and forced completion.
///
/// # Concurrency
///
/// Turns for the same session are serialized by the session's mutex; turns
/// for different sessions run independently. Report delivery triggered by a
/// turn runs on a tracked background task so the reply is never delayed by
/// the downstream evaluator.
pub struct SessionUseCase {
    engine: Arc<HoneypotEngine>,
    registry: Arc<SessionRegistry>,
    dispatcher: Arc<RetryingDispatcher>,
    /// Source of tie-breaks and phrasing variants.
    rng: Arc<Mutex<StdRng>>,
    dispatches: TaskTracker,
}

impl SessionUseCase {
    /// Creates a use case with an entropy-seeded RNG.
    ///
    /// `dispatcher` makes single delivery attempts; retries and timeouts
    /// follow the engine's report configuration.
    pub fn new(engine: Arc<HoneypotEngine>, dispatcher: Arc<dyn ReportDispatcher>) -> Self {
        Self::with_rng(engine, dispatcher, StdRng::from_entropy())
    }

    /// Creates a use case whose replies are reproducible for a given seed.
    pub fn with_seed(
        engine: Arc<HoneypotEngine>,
        dispatcher: Arc<dyn ReportDispatcher>,
        seed: u64,
    ) -> Self {
        Self::with_rng(engine, dispatcher, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        engine: Arc<HoneypotEngine>,
        dispatcher: Arc<dyn ReportDispatcher>,
        rng: StdRng,
    ) -> Self {
        let policy = engine.config().report.clone();
        Self {
            engine,
            registry: Arc::new(SessionRegistry::new()),
            dispatcher: Arc::new(RetryingDispatcher::new(dispatcher, policy)),
            rng: Arc::new(Mutex::new(rng)),
            dispatches: TaskTracker::new(),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Ingests one counterpart message and returns the reply.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without touching any session, if the
    /// session ID or text is blank or the sender is not the counterpart.
    /// Delivery failures are never surfaced here.
    pub async fn ingest(&self, request: TurnRequest) -> Result<TurnResponse> {
        request.validate()?;
        let TurnRequest {
            session_id,
            message,
            conversation_history,
            metadata,
        } = request;

        let (handle, created) = self
            .registry
            .get_or_create(&session_id, || {
                self.engine
                    .open_session(session_id.clone(), metadata, &conversation_history)
            })
            .await;
        if created {
            tracing::info!("[SessionUseCase] Session {} created", session_id);
        }

        let outcome = {
            let mut session = handle.lock().await;
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| HoneypotError::internal("reply RNG lock poisoned"))?;
            self.engine.process_turn(&mut session, message, &mut *rng)
        };

        tracing::debug!(
            "[SessionUseCase] Session {} turn processed (state={})",
            session_id,
            outcome.state
        );

        if let Some(report) = outcome.report {
            self.spawn_dispatch(handle, report);
        }

        Ok(TurnResponse::success(outcome.reply))
    }

    /// Returns a read-only view of a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session ID.
    pub async fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot> {
        let handle = self.handle(session_id).await?;
        let session = handle.lock().await;
        Ok(session.snapshot())
    }

    /// Completes a session out of band and delivers its report.
    ///
    /// Repeated or concurrent calls deliver at most one report per session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session ID. Delivery failures are
    /// reported as [`DeliveryOutcome::DeliveryFailed`], not as errors.
    pub async fn force_complete(&self, session_id: &str) -> Result<DeliveryOutcome> {
        let handle = self.handle(session_id).await?;
        let claim = {
            let mut session = handle.lock().await;
            self.engine.force_complete(&mut session)
        };

        match claim {
            CompletionClaim::AlreadyReported => Ok(DeliveryOutcome::AlreadyReported),
            CompletionClaim::InFlight => Ok(DeliveryOutcome::InFlight),
            CompletionClaim::Dispatch(report) => {
                let delivered = deliver(&self.dispatcher, &report).await;
                let mut session = handle.lock().await;
                self.engine.settle_dispatch(&mut session, delivered);
                Ok(if delivered {
                    DeliveryOutcome::Delivered
                } else {
                    DeliveryOutcome::DeliveryFailed
                })
            }
        }
    }

    /// Waits until every background delivery started so far has finished.
    pub async fn wait_for_dispatches(&self) {
        self.dispatches.close();
        self.dispatches.wait().await;
        self.dispatches.reopen();
    }

    async fn handle(&self, session_id: &str) -> Result<SessionHandle> {
        self.registry
            .get(session_id)
            .await
            .ok_or_else(|| HoneypotError::not_found("Session", session_id))
    }

    fn spawn_dispatch(&self, handle: SessionHandle, report: ReportPayload) {
        let engine = self.engine.clone();
        let dispatcher = self.dispatcher.clone();
        tracing::info!(
            "[SessionUseCase] Dispatching report for session {} in background",
            report.session_id
        );
        self.dispatches.spawn(async move {
            let delivered = deliver(&dispatcher, &report).await;
            let mut session = handle.lock().await;
            engine.settle_dispatch(&mut session, delivered);
        });
    }
}

async fn deliver(dispatcher: &RetryingDispatcher, report: &ReportPayload) -> bool {
    match dispatcher.deliver(report).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                "[SessionUseCase] Report for session {} failed: {}",
                report.session_id,
                e
            );
            false
        }
    }
}
