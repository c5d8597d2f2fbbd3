use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use log::{info, warn};

pub const PASSWORD_PROMPT: &str = "🔑 Introduce la contraseña del equipo:";
pub const WRONG_PASSWORD: &str = "😕 Contraseña incorrecta";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    /// No password entered yet.
    #[default]
    Prompt,
    /// Last attempt was wrong; the prompt is shown again with an error.
    Denied,
    Granted,
}

/// Per-visitor state carried through every render.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: AccessState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn is_granted(&self) -> bool {
        self.state == AccessState::Granted
    }

    pub fn require_access(&self) -> Result<()> {
        if self.is_granted() {
            Ok(())
        } else {
            Err(DashboardError::AccessDenied)
        }
    }

    /// Message the shell shows under the password prompt, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.state {
            AccessState::Denied => Some(WRONG_PASSWORD),
            _ => None,
        }
    }
}

/// Shared-secret gate in front of the dashboard.
pub struct AccessGate {
    secret: String,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.access_secret.clone())
    }

    /// Checks a password attempt. A granted session stays granted.
    pub fn submit(&self, session: &mut Session, attempt: &str) -> AccessState {
        if session.is_granted() {
            return session.state;
        }

        session.state = if attempt == self.secret {
            info!("Dashboard access granted");
            AccessState::Granted
        } else {
            warn!("Rejected dashboard password attempt");
            AccessState::Denied
        };
        session.state
    }
}
