//! The client session state machine — check-in, the elapsed-time tick,
//! periodic heartbeats, and authoritative server pushes.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{info, warn};

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::events::{ChangePayload, SessionChanged, SessionSummary};
use telehub_entity::session::{SessionStatus, TeleworkSession};

use crate::feed::ChangeFeed;
use crate::pending::{PendingHeartbeat, PendingHeartbeatStore};
use crate::transport::{HeartbeatReport, SessionTransport};

/// Client-side timing configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How often a heartbeat report is sent while a session is active.
    pub heartbeat_interval: Duration,
    /// How often the local elapsed-time counter advances.
    pub tick_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(60),
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Where the client currently stands in the session lifecycle.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No session has been opened or loaded.
    NoSession,
    /// A session is open; timers may be running.
    Active {
        /// The cached server session record.
        session: TeleworkSession,
    },
    /// The session was closed, locally or by the server.
    Terminated {
        /// The final session record.
        session: TeleworkSession,
    },
}

struct ClientInner {
    transport: Arc<dyn SessionTransport>,
    pending: PendingHeartbeatStore,
    config: ClientConfig,
    state: Mutex<SessionState>,
    /// Locally displayed elapsed seconds, corrected by server pushes.
    elapsed_seconds: AtomicI64,
    /// Reference point for heartbeat deltas. Advances on every report,
    /// delivered or not, so failed deltas are never double-counted.
    last_beat: Mutex<Instant>,
    timers: Mutex<Vec<JoinHandle<()>>>,
}

/// Drives one user's telework session from the client side.
///
/// All server communication goes through the injected
/// [`SessionTransport`]; pushed state from the change feed is treated as
/// authoritative and overwrites whatever the client believes locally.
pub struct SessionClient {
    inner: Arc<ClientInner>,
    feed_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

impl SessionClient {
    /// Creates a client over the given transport and heartbeat buffer.
    pub fn new(
        transport: Arc<dyn SessionTransport>,
        pending: PendingHeartbeatStore,
        config: ClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                pending,
                config,
                state: Mutex::new(SessionState::NoSession),
                elapsed_seconds: AtomicI64::new(0),
                last_beat: Mutex::new(Instant::now()),
                timers: Mutex::new(Vec::new()),
            }),
            feed_task: Mutex::new(None),
        }
    }

    /// Returns a snapshot of the current lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.inner.state.lock().await.clone()
    }

    /// Returns the locally tracked elapsed seconds.
    pub fn elapsed_seconds(&self) -> i64 {
        self.inner.elapsed_seconds.load(Ordering::SeqCst)
    }

    /// Loads today's open session from the server, if one exists.
    ///
    /// Only populates local state; timers stay stopped until the caller
    /// decides to [`resume`](Self::resume) the loaded session.
    pub async fn load_active_session(&self) -> Result<Option<TeleworkSession>, AppError> {
        let session = self.inner.transport.load_today().await?;
        let mut state = self.inner.state.lock().await;
        match session {
            Some(session) => {
                self.inner
                    .elapsed_seconds
                    .store(session.active_seconds, Ordering::SeqCst);
                *state = SessionState::Active {
                    session: session.clone(),
                };
                Ok(Some(session))
            }
            None => {
                *state = SessionState::NoSession;
                Ok(None)
            }
        }
    }

    /// Starts timers for a session previously loaded with
    /// [`load_active_session`](Self::load_active_session).
    pub async fn resume(&self) -> Result<(), AppError> {
        {
            let state = self.inner.state.lock().await;
            let SessionState::Active { session } = &*state else {
                return Err(AppError::new(ErrorKind::Session, "No open session to resume"));
            };
            self.inner
                .elapsed_seconds
                .store(session.active_seconds, Ordering::SeqCst);
        }
        self.inner.finish_activation().await;
        Ok(())
    }

    /// Opens a session for today and starts the timers.
    ///
    /// A conflict from the server (a session is already open) is
    /// surfaced to the caller unchanged.
    pub async fn check_in(&self, note: Option<String>) -> Result<TeleworkSession, AppError> {
        let session = self.inner.transport.check_in(note).await?;
        info!(session_id = %session.id, "Checked in");
        self.inner.activate(session.clone()).await;
        Ok(session)
    }

    /// Closes the open session and stops the timers.
    pub async fn check_out(&self, note: Option<String>) -> Result<TeleworkSession, AppError> {
        let session_id = {
            let state = self.inner.state.lock().await;
            let SessionState::Active { session } = &*state else {
                return Err(AppError::new(ErrorKind::Session, "No open session to check out"));
            };
            session.id
        };

        let session = self.inner.transport.check_out(session_id, note).await?;
        info!(
            session_id = %session.id,
            active_seconds = session.active_seconds,
            "Checked out"
        );

        self.inner.stop_timers().await;
        self.inner.elapsed_seconds.store(0, Ordering::SeqCst);
        *self.inner.state.lock().await = SessionState::Terminated {
            session: session.clone(),
        };
        Ok(session)
    }

    /// Changes the presence status.
    ///
    /// The local status flips immediately; the change rides the
    /// heartbeat channel and the server's pushed state wins if they
    /// disagree.
    pub async fn update_status(&self, status: SessionStatus) -> Result<(), AppError> {
        if status == SessionStatus::Offline {
            return Err(AppError::validation(
                "Offline status is set by the server, not by the client",
            ));
        }
        {
            let mut state = self.inner.state.lock().await;
            let SessionState::Active { session } = &mut *state else {
                return Err(AppError::new(ErrorKind::Session, "No open session"));
            };
            session.status = status;
        }
        self.inner.send_heartbeat(Some(status), None).await
    }

    /// Records a free-form activity note on the open session.
    ///
    /// Blank notes and calls without an open session are quietly
    /// ignored.
    pub async fn add_activity(&self, note: &str) -> Result<(), AppError> {
        let trimmed = note.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        {
            let state = self.inner.state.lock().await;
            if !matches!(&*state, SessionState::Active { .. }) {
                return Ok(());
            }
        }
        self.inner.send_heartbeat(None, Some(trimmed.to_string())).await
    }

    /// Attaches a live change feed and applies pushed session events.
    pub async fn attach_feed<F>(&self, mut feed: F)
    where
        F: ChangeFeed + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            while let Some(event) = feed.next().await {
                if let ChangePayload::Session(change) = event.payload {
                    inner.handle_session_event(change).await;
                }
            }
        });
        if let Some(previous) = self.feed_task.lock().await.replace(task) {
            previous.abort();
        }
    }

    /// Stops every background task. The buffer file is left intact.
    pub async fn shutdown(&self) {
        self.inner.stop_timers().await;
        if let Some(task) = self.feed_task.lock().await.take() {
            task.abort();
        }
    }
}

impl ClientInner {
    async fn activate(self: &Arc<Self>, session: TeleworkSession) {
        self.elapsed_seconds
            .store(session.active_seconds, Ordering::SeqCst);
        *self.state.lock().await = SessionState::Active { session };
        self.finish_activation().await;
    }

    /// Flushes the offline buffer, resets the reference clock, and
    /// starts the timers. Runs once per activation.
    async fn finish_activation(self: &Arc<Self>) {
        if let Err(e) = self.sync_pending().await {
            warn!(error = %e, "Buffered heartbeat sync failed; entries kept for the next attempt");
        }
        *self.last_beat.lock().await = Instant::now();
        self.start_timers().await;
    }

    async fn start_timers(self: &Arc<Self>) {
        self.stop_timers().await;
        let mut timers = self.timers.lock().await;

        let inner = Arc::clone(self);
        timers.push(tokio::spawn(async move {
            let mut interval = time::interval(inner.config.tick_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                if matches!(&*inner.state.lock().await, SessionState::Active { .. }) {
                    inner.elapsed_seconds.fetch_add(1, Ordering::SeqCst);
                }
            }
        }));

        let inner = Arc::clone(self);
        timers.push(tokio::spawn(async move {
            let mut interval = time::interval(inner.config.heartbeat_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = inner.send_heartbeat(None, None).await {
                    warn!(error = %e, "Periodic heartbeat failed");
                }
            }
        }));
    }

    async fn stop_timers(&self) {
        let mut timers = self.timers.lock().await;
        for handle in timers.drain(..) {
            handle.abort();
        }
    }

    /// Sends one heartbeat carrying the time elapsed since the previous
    /// report.
    ///
    /// The reference clock advances whether or not delivery succeeds; a
    /// delta that fails transiently goes to the offline buffer instead
    /// of being re-measured next time.
    async fn send_heartbeat(
        &self,
        status: Option<SessionStatus>,
        activity_note: Option<String>,
    ) -> Result<(), AppError> {
        let (session_id, current_status) = {
            let state = self.state.lock().await;
            match &*state {
                SessionState::Active { session } => (session.id, session.status),
                _ => return Ok(()),
            }
        };

        let delta_seconds = {
            let mut last = self.last_beat.lock().await;
            let now = Instant::now();
            let delta = now.duration_since(*last).as_secs() as i64;
            *last = now;
            delta
        };

        // Offline is server-assigned; reporting resumes without it.
        let status = status.or(match current_status {
            SessionStatus::Offline => None,
            current => Some(current),
        });

        let report = HeartbeatReport {
            session_id,
            delta_seconds,
            status,
            activity_note,
        };

        match self.transport.heartbeat(report).await {
            Ok(session) => {
                self.replace_session(session).await;
                Ok(())
            }
            Err(e) if e.is_transient() => {
                warn!(
                    session_id = %session_id,
                    delta_seconds,
                    error = %e,
                    "Heartbeat undeliverable, buffering delta"
                );
                self.pending
                    .append(PendingHeartbeat {
                        session_id,
                        seconds: delta_seconds,
                        timestamp: Utc::now(),
                    })
                    .await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Delivers buffered deltas, one aggregated report per session.
    ///
    /// A transient failure aborts the flush and keeps the buffer; a
    /// permanent rejection (the session is gone or closed) drops that
    /// session's deltas, since they can never be delivered.
    async fn sync_pending(&self) -> Result<(), AppError> {
        let guard = self.pending.begin_flush().await;
        if guard.is_empty() {
            return Ok(());
        }

        let mut flushed = 0usize;
        for (session_id, seconds) in guard.aggregated() {
            let report = HeartbeatReport {
                session_id,
                delta_seconds: seconds,
                status: None,
                activity_note: None,
            };
            match self.transport.heartbeat(report).await {
                Ok(_) => flushed += 1,
                Err(e) if e.is_transient() => return Err(e),
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        seconds,
                        error = %e,
                        "Dropping undeliverable buffered heartbeats"
                    );
                }
            }
        }

        guard.commit().await?;
        info!(sessions = flushed, "Flushed buffered heartbeats");
        Ok(())
    }

    /// Replaces the cached session with a heartbeat response.
    async fn replace_session(&self, session: TeleworkSession) {
        let closed = session.is_closed();
        {
            let mut state = self.state.lock().await;
            let SessionState::Active { session: current } = &mut *state else {
                return;
            };
            if current.id != session.id {
                return;
            }
            self.elapsed_seconds
                .store(session.active_seconds, Ordering::SeqCst);
            if closed {
                *state = SessionState::Terminated { session };
            } else {
                *current = session;
            }
        }
        if closed {
            self.elapsed_seconds.store(0, Ordering::SeqCst);
            self.stop_timers().await;
        }
    }

    async fn handle_session_event(&self, change: SessionChanged) {
        let summary = match change {
            SessionChanged::CheckedIn { session } => session,
            SessionChanged::Updated { session } => session,
            SessionChanged::CheckedOut { session, .. } => session,
        };
        self.apply_summary(summary).await;
    }

    /// Applies an authoritative pushed snapshot onto the cached session.
    async fn apply_summary(&self, summary: SessionSummary) {
        let closed = {
            let mut state = self.state.lock().await;
            let SessionState::Active { session } = &mut *state else {
                return;
            };
            if session.id != summary.session_id {
                return;
            }
            if let Ok(status) = summary.status.parse::<SessionStatus>() {
                session.status = status;
            }
            session.active_seconds = summary.active_seconds;
            session.check_out = summary.check_out;
            self.elapsed_seconds
                .store(summary.active_seconds, Ordering::SeqCst);

            if summary.check_out.is_some() {
                let session = session.clone();
                *state = SessionState::Terminated { session };
                true
            } else {
                false
            }
        };

        if closed {
            self.elapsed_seconds.store(0, Ordering::SeqCst);
            self.stop_timers().await;
            info!("Session closed by the server");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sqlx::types::Json;
    use std::sync::atomic::AtomicBool;
    use uuid::Uuid;

    use telehub_entity::session::activity::{ActivityKind, SessionActivity};

    struct MockTransport {
        current: Mutex<Option<TeleworkSession>>,
        heartbeats: Mutex<Vec<HeartbeatReport>>,
        fail_heartbeats: AtomicBool,
    }

    impl MockTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                current: Mutex::new(None),
                heartbeats: Mutex::new(Vec::new()),
                fail_heartbeats: AtomicBool::new(false),
            })
        }

        fn fail(&self, on: bool) {
            self.fail_heartbeats.store(on, Ordering::SeqCst);
        }
    }

    fn open_session() -> TeleworkSession {
        let now = Utc::now();
        TeleworkSession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            work_date: now.date_naive(),
            check_in: now,
            check_out: None,
            status: SessionStatus::Connected,
            active_seconds: 0,
            last_heartbeat_at: None,
            forced_checkout: false,
            activities: Json(vec![SessionActivity::now(ActivityKind::CheckIn, None)]),
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl SessionTransport for MockTransport {
        async fn load_today(&self) -> Result<Option<TeleworkSession>, AppError> {
            Ok(self.current.lock().await.clone())
        }

        async fn check_in(&self, _note: Option<String>) -> Result<TeleworkSession, AppError> {
            let session = open_session();
            *self.current.lock().await = Some(session.clone());
            Ok(session)
        }

        async fn check_out(
            &self,
            session_id: Uuid,
            _note: Option<String>,
        ) -> Result<TeleworkSession, AppError> {
            let mut current = self.current.lock().await;
            let Some(session) = current.as_mut().filter(|s| s.id == session_id) else {
                return Err(AppError::not_found("Session not found"));
            };
            session.check_out = Some(Utc::now());
            Ok(session.clone())
        }

        async fn heartbeat(&self, report: HeartbeatReport) -> Result<TeleworkSession, AppError> {
            if self.fail_heartbeats.load(Ordering::SeqCst) {
                return Err(AppError::network("connection refused"));
            }
            self.heartbeats.lock().await.push(report.clone());

            let mut current = self.current.lock().await;
            match current.as_mut().filter(|s| s.id == report.session_id) {
                Some(session) => {
                    session.active_seconds += report.delta_seconds;
                    if let Some(status) = report.status {
                        session.status = status;
                    }
                    Ok(session.clone())
                }
                // An old buffered session; accept the delta without state.
                None => {
                    let mut session = open_session();
                    session.id = report.session_id;
                    Ok(session)
                }
            }
        }
    }

    fn store() -> PendingHeartbeatStore {
        PendingHeartbeatStore::open(
            std::env::temp_dir().join(format!("telehub-client-{}.json", Uuid::new_v4())),
        )
    }

    fn quiet_config() -> ClientConfig {
        ClientConfig {
            heartbeat_interval: Duration::from_secs(3600),
            tick_interval: Duration::from_secs(3600),
        }
    }

    fn client(transport: Arc<MockTransport>) -> SessionClient {
        SessionClient::new(transport, store(), quiet_config())
    }

    #[tokio::test]
    async fn check_in_flushes_buffered_heartbeats_aggregated() {
        let transport = MockTransport::new();
        let yesterday = Uuid::new_v4();

        let pending = store();
        for seconds in [60, 45] {
            pending
                .append(PendingHeartbeat {
                    session_id: yesterday,
                    seconds,
                    timestamp: Utc::now(),
                })
                .await
                .unwrap();
        }

        let client = SessionClient::new(transport.clone(), pending, quiet_config());
        client.check_in(None).await.unwrap();

        let reports = transport.heartbeats.lock().await;
        let flushed: Vec<_> = reports
            .iter()
            .filter(|r| r.session_id == yesterday)
            .collect();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].delta_seconds, 105);
        assert!(flushed[0].status.is_none());
        drop(reports);

        assert!(client.inner.pending.is_empty().await);
        assert!(matches!(
            client.state().await,
            SessionState::Active { .. }
        ));
    }

    #[tokio::test]
    async fn failed_heartbeat_is_buffered_and_reported_ok() {
        let transport = MockTransport::new();
        let client = client(transport.clone());
        client.check_in(None).await.unwrap();

        transport.fail(true);
        client.inner.send_heartbeat(None, None).await.unwrap();
        client.inner.send_heartbeat(None, None).await.unwrap();

        assert_eq!(client.inner.pending.len().await, 2);
    }

    #[tokio::test]
    async fn transient_flush_failure_keeps_the_buffer() {
        let transport = MockTransport::new();
        let pending = store();
        pending
            .append(PendingHeartbeat {
                session_id: Uuid::new_v4(),
                seconds: 30,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        let client = SessionClient::new(transport.clone(), pending, quiet_config());
        transport.fail(true);

        assert!(client.inner.sync_pending().await.is_err());
        assert_eq!(client.inner.pending.len().await, 1);
    }

    #[tokio::test]
    async fn forced_checkout_push_terminates_the_session() {
        let transport = MockTransport::new();
        let client = client(transport.clone());
        let session = client.check_in(None).await.unwrap();

        let summary = SessionSummary {
            session_id: session.id,
            user_id: session.user_id,
            work_date: session.work_date,
            status: "connected".to_string(),
            active_seconds: 1800,
            check_in: session.check_in,
            check_out: Some(Utc::now()),
        };
        client
            .inner
            .handle_session_event(SessionChanged::CheckedOut {
                session: summary,
                forced: true,
                checked_out_by: Some(Uuid::new_v4()),
            })
            .await;

        assert!(matches!(
            client.state().await,
            SessionState::Terminated { .. }
        ));
        assert_eq!(client.elapsed_seconds(), 0);
        assert!(client.inner.timers.lock().await.is_empty());
    }

    #[tokio::test]
    async fn server_push_overwrites_local_state() {
        let transport = MockTransport::new();
        let client = client(transport.clone());
        let session = client.check_in(None).await.unwrap();

        let summary = SessionSummary {
            session_id: session.id,
            user_id: session.user_id,
            work_date: session.work_date,
            status: "in_meeting".to_string(),
            active_seconds: 500,
            check_in: session.check_in,
            check_out: None,
        };
        client
            .inner
            .handle_session_event(SessionChanged::Updated { session: summary })
            .await;

        let SessionState::Active { session } = client.state().await else {
            panic!("expected an active session");
        };
        assert_eq!(session.status, SessionStatus::InMeeting);
        assert_eq!(session.active_seconds, 500);
        assert_eq!(client.elapsed_seconds(), 500);
    }

    #[tokio::test]
    async fn update_status_is_optimistic_when_transport_is_down() {
        let transport = MockTransport::new();
        let client = client(transport.clone());
        client.check_in(None).await.unwrap();

        transport.fail(true);
        client.update_status(SessionStatus::Paused).await.unwrap();

        let SessionState::Active { session } = client.state().await else {
            panic!("expected an active session");
        };
        assert_eq!(session.status, SessionStatus::Paused);
        assert_eq!(client.inner.pending.len().await, 1);
    }

    #[tokio::test]
    async fn offline_status_cannot_be_set_by_the_client() {
        let transport = MockTransport::new();
        let client = client(transport.clone());
        client.check_in(None).await.unwrap();

        let err = client.update_status(SessionStatus::Offline).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn blank_activity_notes_are_ignored() {
        let transport = MockTransport::new();
        let client = client(transport.clone());
        client.check_in(None).await.unwrap();
        let before = transport.heartbeats.lock().await.len();

        client.add_activity("   ").await.unwrap();

        assert_eq!(transport.heartbeats.lock().await.len(), before);
    }

    #[tokio::test]
    async fn check_out_requires_an_open_session() {
        let transport = MockTransport::new();
        let client = client(transport);

        let err = client.check_out(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Session);
    }

    #[tokio::test]
    async fn loading_does_not_start_timers() {
        let transport = MockTransport::new();
        {
            let mut session = open_session();
            session.active_seconds = 240;
            *transport.current.lock().await = Some(session);
        }
        let client = client(transport.clone());

        let loaded = client.load_active_session().await.unwrap().unwrap();
        assert_eq!(loaded.active_seconds, 240);
        assert_eq!(client.elapsed_seconds(), 240);
        assert!(client.inner.timers.lock().await.is_empty());

        client.resume().await.unwrap();
        assert_eq!(client.inner.timers.lock().await.len(), 2);
        client.shutdown().await;
    }
}
