use std::sync::Arc;

use desk_logging::{desk_debug, desk_info, desk_warn};
use newsdesk_core::{
    update_auth, AuthEffect, AuthMsg, AuthState, AuthStatus, GateView, UserProfile, Verdict,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::inbox::Reply;
use crate::{AuthClient, Credential, CredentialStore, PersistError};

/// Decides render-or-redirect for protected routes.
///
/// Owned by the application shell; the cached profile is handed to child
/// views through [`AuthGate::user`], so re-entering a protected route never
/// verifies twice within one lifecycle.
pub struct AuthGate {
    state: AuthState,
    /// Bumped on login; results from an older lifecycle are dropped.
    lifecycle: u64,
    client: Arc<dyn AuthClient>,
    store: Arc<dyn CredentialStore>,
    inbox_tx: mpsc::UnboundedSender<(u64, AuthMsg)>,
    inbox_rx: mpsc::UnboundedReceiver<(u64, AuthMsg)>,
    notifications: Vec<JoinHandle<()>>,
}

impl AuthGate {
    pub fn new(client: Arc<dyn AuthClient>, store: Arc<dyn CredentialStore>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: AuthState::new(),
            lifecycle: 0,
            client,
            store,
            inbox_tx,
            inbox_rx,
            notifications: Vec::new(),
        }
    }

    /// Enter a protected route. Starts verification at most once; never blocks.
    pub fn activate(&mut self) -> GateView {
        let has_credential = self.store.is_logged_in();
        self.handle(AuthMsg::GateActivated { has_credential });
        self.state.gate_view()
    }

    /// Activate and wait until the status leaves `Unknown`.
    pub async fn resolve(&mut self) -> GateView {
        self.activate();
        while !self.state.status().is_resolved() && self.state.is_verifying() {
            self.next_event().await;
        }
        self.state.gate_view()
    }

    /// Waits for the outstanding verification, if any, and applies it.
    pub async fn next_event(&mut self) {
        let Some((lifecycle, msg)) = self.inbox_rx.recv().await else {
            return;
        };
        if lifecycle != self.lifecycle {
            desk_debug!("auth: dropping result from lifecycle {}", lifecycle);
            return;
        }
        self.handle(msg);
    }

    /// Store a fresh credential and start a new gate lifecycle.
    pub fn login(&mut self, credential: Credential) -> Result<(), PersistError> {
        self.store.store(&credential)?;
        self.lifecycle += 1;
        self.state = AuthState::new();
        desk_info!("auth: logged in fp={}", credential.fingerprint());
        Ok(())
    }

    /// Clear the credential locally and notify the backend best-effort.
    pub async fn logout(&mut self) {
        self.handle(AuthMsg::LogoutRequested);
        self.flush_notifications().await;
    }

    /// Await pending remote logout notifications.
    pub async fn flush_notifications(&mut self) {
        for handle in self.notifications.drain(..) {
            if let Err(err) = handle.await {
                desk_warn!("auth: logout notification task failed: {}", err);
            }
        }
    }

    pub fn status(&self) -> &AuthStatus {
        self.state.status()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user()
    }

    pub fn view(&self) -> GateView {
        self.state.gate_view()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    fn handle(&mut self, msg: AuthMsg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update_auth(state, msg);
        self.state = state;
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: AuthEffect) {
        match effect {
            AuthEffect::VerifyCredential => self.spawn_verification(),
            AuthEffect::InvalidateCredential => self.invalidate_credential(),
        }
    }

    fn spawn_verification(&mut self) {
        let lifecycle = self.lifecycle;
        let tx = self.inbox_tx.clone();
        let Some(credential) = self.store.load() else {
            let verdict = Verdict::Failed("credential disappeared before verification".to_string());
            let _ = tx.send((lifecycle, AuthMsg::VerificationFinished(verdict)));
            return;
        };

        desk_debug!("auth: verifying fp={}", credential.fingerprint());
        let client = Arc::clone(&self.client);
        let reply = Reply::new(
            tx,
            (
                lifecycle,
                AuthMsg::VerificationFinished(Verdict::Failed(
                    "verification ended without a verdict".to_string(),
                )),
            ),
        );
        tokio::spawn(async move {
            let verdict = match client.verify(&credential).await {
                Ok(verdict) => verdict,
                Err(err) => Verdict::Failed(err.to_string()),
            };
            reply.send((lifecycle, AuthMsg::VerificationFinished(verdict)));
        });
    }

    fn invalidate_credential(&mut self) {
        let credential = self.store.load();
        if let Err(err) = self.store.clear() {
            desk_warn!("auth: could not clear stored credential: {}", err);
        }
        let Some(credential) = credential else {
            return;
        };

        desk_info!("auth: invalidated credential fp={}", credential.fingerprint());
        let client = Arc::clone(&self.client);
        self.notifications.push(tokio::spawn(async move {
            if let Err(err) = client.logout(&credential).await {
                desk_warn!("auth: remote logout failed: {}", err);
            }
        }));
    }
}
