use crate::models::AuthUser;
use crate::platform::{AuthService, AuthState};
use tokio::sync::watch;

/// Snapshot of the auth session for view code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    pub logged_in: bool,
    /// True until the first auth event has been observed
    pub loading: bool,
}

/// Explicit session context handed to components that need identity.
/// Wraps the typed auth subscription; dropping the session tears the
/// subscription down, so no state can be written after teardown.
pub struct Session {
    rx: watch::Receiver<AuthState>,
}

impl Session {
    pub fn observe(auth: &dyn AuthService) -> Self {
        Self {
            rx: auth.subscribe(),
        }
    }

    /// Current snapshot without waiting
    pub fn status(&self) -> AuthStatus {
        match &*self.rx.borrow() {
            AuthState::Unknown => AuthStatus {
                logged_in: false,
                loading: true,
            },
            AuthState::SignedOut => AuthStatus {
                logged_in: false,
                loading: false,
            },
            AuthState::SignedIn(_) => AuthStatus {
                logged_in: true,
                loading: false,
            },
        }
    }

    /// Identity of the signed-in user, if any
    pub fn user(&self) -> Option<AuthUser> {
        match &*self.rx.borrow() {
            AuthState::SignedIn(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Wait for the next auth-state change and return the new snapshot.
    /// Returns `None` once the auth service has gone away.
    pub async fn changed(&mut self) -> Option<AuthStatus> {
        self.rx.changed().await.ok()?;
        Some(self.status())
    }
}
