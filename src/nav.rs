//! Navigation
//!
//! The four fixed tabs and which one is current. Switching tabs is purely
//! local and never touches the network.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Customers,
    Partners,
    Loans,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Customers, Tab::Partners, Tab::Loans];

    pub fn key(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Customers => "customers",
            Tab::Partners => "partners",
            Tab::Loans => "loans",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Customers => "Customers",
            Tab::Partners => "Partners",
            Tab::Loans => "Loans",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Customers => 1,
            Tab::Partners => 2,
            Tab::Loans => 3,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Customers,
            Tab::Customers => Tab::Partners,
            Tab::Partners => Tab::Loans,
            Tab::Loans => Tab::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Loans,
            Tab::Customers => Tab::Dashboard,
            Tab::Partners => Tab::Customers,
            Tab::Loans => Tab::Partners,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tab: {}", s))
    }
}

/// Current tab selection
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    current: Tab,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Tab {
        self.current
    }

    /// Returns true if the selection actually changed
    pub fn select(&mut self, tab: Tab) -> bool {
        let changed = self.current != tab;
        self.current = tab;
        changed
    }

    pub fn next(&mut self) {
        self.current = self.current.next();
    }

    pub fn previous(&mut self) {
        self.current = self.current.previous();
    }
}
