use serde::{Deserialize, Serialize};

/// Time a toast stays visible before the auto-hide fires
pub const NOTIFICATION_TTL_MS: u64 = 4000;

/// Notification severity, each with its own icon and style class
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "fas fa-info-circle",
            Self::Success => "fas fa-check-circle",
            Self::Warning => "fas fa-exclamation-triangle",
            Self::Error => "fas fa-exclamation-circle",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Single-slot toast (UI state)
///
/// There is no queue: `show` replaces whatever is displayed. Hides are not
/// tied to a particular notification, so the hide scheduled by an earlier
/// `show` also hides a newer toast when it fires.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationState {
    current: Option<Notification>,
    visible: bool,
    shown: u64,
}

impl NotificationState {
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.current = Some(Notification {
            message: message.into(),
            severity,
        });
        self.visible = true;
        self.shown += 1;
    }

    /// Hide the toast, keeping its content
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Number of notifications shown so far.
    ///
    /// Shells restart the toast animation whenever this changes.
    pub fn shown(&self) -> u64 {
        self.shown
    }
}
