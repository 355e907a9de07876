//! Session lifecycle orchestration.
//!
//! The controller is the only component that calls the backend's token
//! endpoints. It owns the proactive-refresh timer as an explicit start/stop
//! pair, invoked when the session transitions between empty and present
//! rather than being tied to any view's lifetime.

use explanner_model::api_routes::token as routes;
use explanner_model::{CredentialPair, LoginRequest, RefreshRequest};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api_client::ApiClient;
use crate::routes::{Navigator, Route};

use super::errors::{SessionError, SessionResult};
use super::store::SessionStore;
use super::token::{EXPIRY_BUFFER_SECONDS, is_within_expiry_buffer, seconds_until_expiry};

/// Lower bound on the delay between refresh attempts, so a token already at
/// or past its expiry does not spin the timer.
const REFRESH_FLOOR_SECONDS: u64 = 30;

/// Drives login, refresh, and logout against the session store.
#[derive(Debug, Clone)]
pub struct SessionController {
    api: ApiClient,
    store: SessionStore,
    navigator: Navigator,
    refresh_interval: Duration,
    login_error: Arc<watch::Sender<Option<String>>>,
    login_error_rx: watch::Receiver<Option<String>>,
    refresh_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionController {
    pub fn new(
        api: ApiClient,
        store: SessionStore,
        navigator: Navigator,
        refresh_interval: Duration,
    ) -> Self {
        let (login_error, login_error_rx) = watch::channel(None);
        Self {
            api,
            store,
            navigator,
            refresh_interval,
            login_error: Arc::new(login_error),
            login_error_rx,
            refresh_task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Startup path: rehydrate the persisted session, refresh it immediately
    /// if the access token is already inside the expiry buffer, and start
    /// the timer. Without a persisted session this is a no-op.
    pub async fn bootstrap(&self) {
        self.store.initialize().await;

        let session = self.store.current();
        let identity = match session.identity() {
            Some(identity) => identity.clone(),
            None => return,
        };

        if let Some(pair) = session.pair() {
            self.api.set_access_token(Some(pair.access.clone())).await;
        }

        if is_within_expiry_buffer(&identity) {
            info!("Restored access token is expiring, refreshing now");
            if self.refresh().await.is_err() {
                // refresh() already tore the session down.
                return;
            }
        }

        self.start_auto_refresh();
    }

    /// Authenticates with the backend and enters the protected area.
    ///
    /// On failure the previous session (including "still empty") is left
    /// untouched and the rejection reason lands in the observable error
    /// slot. Concurrent calls are not serialized; the last response to
    /// resolve wins.
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<()> {
        let request = LoginRequest {
            username: username.to_lowercase(),
            password: password.to_string(),
        };

        let pair: CredentialPair = match self.api.post_public(routes::ISSUE, &request).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Login failed for {}: {}", request.username, e);
                let _ = self.login_error.send(Some(e.user_message()));
                return Err(SessionError::Api(e));
            }
        };

        if let Err(e) = self.store.set(pair.clone()).await {
            // The in-memory session is live either way; the next successful
            // refresh rewrites the record.
            warn!("Failed to persist session: {}", e);
        }
        self.api.set_access_token(Some(pair.access)).await;
        let _ = self.login_error.send(None);

        info!("Logged in as {}", request.username);
        self.start_auto_refresh();
        self.navigator.go(Route::Plan);
        Ok(())
    }

    /// Exchanges the refresh token for a new credential pair.
    ///
    /// Any failure is fatal for the session: an invalid refresh token cannot
    /// self-heal, so the session is torn down instead of retrying. A
    /// response that resolves after the session it was issued for is gone is
    /// discarded in both directions.
    pub async fn refresh(&self) -> SessionResult<()> {
        let issued_epoch = self.store.epoch();
        let refresh_token = self
            .store
            .with_state(|session| session.refresh_token().map(str::to_string))
            .ok_or(SessionError::NotAuthenticated)?;

        let request = RefreshRequest {
            refresh: refresh_token,
        };
        match self
            .api
            .post_public::<_, CredentialPair>(routes::REFRESH, &request)
            .await
        {
            Ok(pair) => {
                let access = pair.access.clone();
                match self.store.set_if_current(issued_epoch, pair).await {
                    Ok(true) => {
                        self.api.set_access_token(Some(access)).await;
                        debug!("Access token refreshed");
                    }
                    Ok(false) => {
                        debug!("Refresh resolved for a stale session, discarded");
                    }
                    Err(e) => {
                        self.api.set_access_token(Some(access)).await;
                        warn!("Failed to persist refreshed session: {}", e);
                    }
                }
                Ok(())
            }
            Err(e) => {
                if self.store.epoch() == issued_epoch {
                    warn!("Token refresh failed, ending session: {}", e);
                    self.logout().await;
                } else {
                    debug!("Refresh failed for a stale session, discarded");
                }
                Err(SessionError::Api(e))
            }
        }
    }

    /// Ends the session and returns to the login view. Idempotent.
    pub async fn logout(&self) {
        self.api.set_access_token(None).await;
        if let Err(e) = self.store.clear().await {
            warn!("Failed to remove persisted session: {}", e);
        }
        self.navigator.go(Route::Login);
        // Cancelled last: when the timer task itself drove this logout (via
        // a failed refresh), aborting earlier would cancel the awaits above.
        self.stop_auto_refresh();
        info!("Logged out");
    }

    /// Starts the proactive-refresh timer, replacing any predecessor so at
    /// most one timer is ever live.
    pub fn start_auto_refresh(&self) {
        let controller = self.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(controller.next_refresh_delay()).await;
                if !controller.store.is_authenticated() {
                    // Session vanished without this task being cancelled;
                    // firing a refresh now would have no pair to send.
                    break;
                }
                if controller.refresh().await.is_err() {
                    break;
                }
            }
        });

        let mut slot = self.refresh_task.lock().expect("refresh task lock poisoned");
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
    }

    /// Cancels the refresh timer if one is running.
    pub fn stop_auto_refresh(&self) {
        let task = self
            .refresh_task
            .lock()
            .expect("refresh task lock poisoned")
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }

    /// Whether a refresh timer is currently live.
    pub fn has_active_refresh_timer(&self) -> bool {
        self.refresh_task
            .lock()
            .expect("refresh task lock poisoned")
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Delay before the next refresh: the configured interval, capped by the
    /// access token's own expiry minus the buffer so a short-lived token is
    /// refreshed before it lapses rather than on the next interval.
    fn next_refresh_delay(&self) -> Duration {
        let configured = self.refresh_interval;
        self.store.with_state(|session| match session.identity() {
            Some(claims) => {
                let until_deadline = seconds_until_expiry(claims) - EXPIRY_BUFFER_SECONDS;
                let derived = Duration::from_secs(
                    (until_deadline.max(0) as u64).max(REFRESH_FLOOR_SECONDS),
                );
                configured.min(derived)
            }
            None => configured,
        })
    }

    /// Latest user-facing login failure, if any.
    pub fn login_error(&self) -> Option<String> {
        self.login_error_rx.borrow().clone()
    }

    /// Observable handle on the error slot, for views that render it.
    pub fn subscribe_login_error(&self) -> watch::Receiver<Option<String>> {
        self.login_error_rx.clone()
    }

    /// Dismisses the current login error (e.g. once the view has shown it).
    pub fn clear_login_error(&self) {
        let _ = self.login_error.send(None);
    }
}
