use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;
use crate::filters::FilterModel;

/// Name of a broadcast signal, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Outgoing: filters were explicitly applied by the user.
    ApplyFilters,
    /// Outgoing: filters were explicitly cleared by the user.
    ClearFilters,
    /// Incoming: an external owner requests the filter panel reset.
    MainAppClearFilters,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [
        SignalKind::ApplyFilters,
        SignalKind::ClearFilters,
        SignalKind::MainAppClearFilters,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::ApplyFilters => "ActionableComponent:ApplyFilters",
            SignalKind::ClearFilters => "ActionableComponent:ClearFilters",
            SignalKind::MainAppClearFilters => "MainApp:ClearFilters",
        }
    }

    /// Whether the filter panel listens for this signal rather than
    /// publishing it.
    pub fn is_incoming(&self) -> bool {
        matches!(self, SignalKind::MainAppClearFilters)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignalKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ParseError::UnknownSignal {
                value: s.to_string(),
            })
    }
}

/// A named, fire-and-forget event with its payload.
///
/// Payloads are owned values; a published `ApplyFilters` carries its own
/// copy of the model and never observes later edits to the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "detail")]
pub enum Signal {
    #[serde(rename = "ActionableComponent:ApplyFilters")]
    ApplyFilters(FilterModel),
    #[serde(rename = "ActionableComponent:ClearFilters")]
    ClearFilters,
    #[serde(rename = "MainApp:ClearFilters")]
    MainAppClearFilters,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::ApplyFilters(_) => SignalKind::ApplyFilters,
            Signal::ClearFilters => SignalKind::ClearFilters,
            Signal::MainAppClearFilters => SignalKind::MainAppClearFilters,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}
