//! Application state snapshot

use std::fmt;

use crate::dashboard::DashboardTotals;
use crate::forms::SelectContext;
use crate::models::{Customer, Loan, Partner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Message shown above the active tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Everything the views render from
///
/// Collections are replaced wholesale by a successful refresh; list order is
/// whatever the backend returned.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub customers: Vec<Customer>,
    pub partners: Vec<Partner>,
    pub loans: Vec<Loan>,
    pub message: Option<Banner>,
    /// Store operations currently in flight
    pub(crate) pending: usize,
    /// Sequence number of the refresh whose results are on display
    pub(crate) applied_refresh: u64,
    /// Bumped every time `message` is replaced
    pub(crate) message_seq: u64,
}

impl AppState {
    pub fn loading(&self) -> bool {
        self.pending > 0
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().map(|b| b.text.as_str())
    }

    pub fn totals(&self) -> DashboardTotals {
        DashboardTotals::from_loans(&self.loans)
    }

    pub fn select_context(&self) -> SelectContext<'_> {
        SelectContext::new(&self.customers, &self.partners)
    }
}
