//! Presentation-only settings. Pure pass-through fields: last write wins,
//! nothing here touches tree shape.

use crate::error::RetraceError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PaneDisplay
// ---------------------------------------------------------------------------

/// Where the inspection pane is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneDisplay {
    Fullscreen,
    Right,
    Bottom,
}

impl PaneDisplay {
    pub fn as_str(self) -> &'static str {
        match self {
            PaneDisplay::Fullscreen => "fullscreen",
            PaneDisplay::Right => "right",
            PaneDisplay::Bottom => "bottom",
        }
    }
}

impl fmt::Display for PaneDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaneDisplay {
    type Err = RetraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullscreen" => Ok(PaneDisplay::Fullscreen),
            "right" => Ok(PaneDisplay::Right),
            "bottom" => Ok(PaneDisplay::Bottom),
            _ => Err(RetraceError::InvalidPaneDisplay(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ValueDisplay
// ---------------------------------------------------------------------------

/// How opaque payload/state values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDisplay {
    Tree,
    Raw,
}

impl ValueDisplay {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueDisplay::Tree => "tree",
            ValueDisplay::Raw => "raw",
        }
    }
}

impl fmt::Display for ValueDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValueDisplay {
    type Err = RetraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(ValueDisplay::Tree),
            "raw" => Ok(ValueDisplay::Raw),
            _ => Err(RetraceError::InvalidValueDisplay(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub pane_shown: bool,
    pub pane_display: PaneDisplay,
    pub value_display: ValueDisplay,
    pub collapse_repeating_actions: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            pane_shown: false,
            pane_display: PaneDisplay::Right,
            value_display: ValueDisplay::Tree,
            collapse_repeating_actions: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
