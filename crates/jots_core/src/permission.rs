//! Notification permission request issued once at startup.
//!
//! The host environment owns the actual permission prompt. Core only models
//! the outcome and logs it; nothing else in core depends on the answer.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    /// The user has not decided yet.
    #[default]
    Default,
    Granted,
    Denied,
}

/// Host string value for an undecided permission.
pub const PERMISSION_DEFAULT: &str = "default";
/// Host string value for a granted permission.
pub const PERMISSION_GRANTED: &str = "granted";
/// Host string value for a denied permission.
pub const PERMISSION_DENIED: &str = "denied";

impl NotificationPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => PERMISSION_DEFAULT,
            Self::Granted => PERMISSION_GRANTED,
            Self::Denied => PERMISSION_DENIED,
        }
    }

    /// Parses the permission string reported by the host.
    pub fn parse(value: &str) -> Result<Self, PermissionError> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(PermissionError::EmptyPermission);
        }

        match normalized {
            PERMISSION_DEFAULT => Ok(Self::Default),
            PERMISSION_GRANTED => Ok(Self::Granted),
            PERMISSION_DENIED => Ok(Self::Denied),
            other => Err(PermissionError::UnsupportedPermission(other.to_string())),
        }
    }
}

/// Permission request errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    EmptyPermission,
    UnsupportedPermission(String),
    /// Host has no notification capability at all.
    Unavailable(String),
}

impl Display for PermissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPermission => write!(f, "notification permission value must not be empty"),
            Self::UnsupportedPermission(value) => {
                write!(f, "notification permission is unsupported: {value}")
            }
            Self::Unavailable(reason) => write!(f, "notifications unavailable: {reason}"),
        }
    }
}

impl Error for PermissionError {}

/// Host capability that can prompt for notification permission.
pub trait PermissionRequester {
    fn request_permission(&mut self) -> Result<NotificationPermission, PermissionError>;
}

/// Requester that answers with a fixed outcome.
///
/// Used by native hosts without a notification prompt, and by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPermissionRequester {
    outcome: Result<NotificationPermission, PermissionError>,
    requests: u32,
}

impl StaticPermissionRequester {
    pub fn new(outcome: Result<NotificationPermission, PermissionError>) -> Self {
        Self {
            outcome,
            requests: 0,
        }
    }

    pub fn granted() -> Self {
        Self::new(Ok(NotificationPermission::Granted))
    }

    pub fn denied() -> Self {
        Self::new(Ok(NotificationPermission::Denied))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(Err(PermissionError::Unavailable(reason.into())))
    }

    /// Number of times the permission was requested.
    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl PermissionRequester for StaticPermissionRequester {
    fn request_permission(&mut self) -> Result<NotificationPermission, PermissionError> {
        self.requests += 1;
        self.outcome.clone()
    }
}

/// Requests notification permission once and logs the outcome.
///
/// A failed request is logged and reported as `Default`; it never aborts
/// startup.
pub fn request_notification_permission(
    requester: &mut dyn PermissionRequester,
) -> NotificationPermission {
    match requester.request_permission() {
        Ok(permission) => {
            info!(
                "event=notification_permission module=permission status=ok permission={}",
                permission.as_str()
            );
            permission
        }
        Err(err) => {
            warn!("event=notification_permission module=permission status=error error={err}");
            NotificationPermission::Default
        }
    }
}
