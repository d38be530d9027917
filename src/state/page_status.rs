/// Page status definitions for tracking crawl progress
///
/// This module defines the status a page carries in the frontier.
use std::fmt;

/// Represents the current status of a claimed page
///
/// Ordering puts `Pending` first, then HTTP codes ascending, then `Failed`, which
/// is the order the status breakdown is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageStatus {
    /// Claimed but not fetched yet
    Pending,

    /// A response was received with this HTTP status code
    Http(u16),

    /// The fetch failed (network error, timeout, unreadable body)
    Failed,
}

impl PageStatus {
    /// Returns true once the fetch has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Http(code) if (200..300).contains(code))
    }

    /// Returns true for failures and non-2xx responses
    pub fn is_flagged(&self) -> bool {
        self.is_terminal() && !self.is_success()
    }

    /// Integer code for this status; 0 for pending and failed pages
    pub fn code(&self) -> u16 {
        match self {
            Self::Http(code) => *code,
            Self::Pending | Self::Failed => 0,
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Http(code) => write!(f, "{}", code),
            Self::Failed => write!(f, "failed"),
        }
    }
}
