//! Consistency inspections between render calls and their templates.
//!
//! Two judgments are made per call site:
//!
//! - **missing required**: the template reads a parameter the call does not pass
//! - **unused supplied**: the call passes a parameter the template never reads
//!
//! [`ConsistencyChecker`] evaluates both and produces [`Finding`]s carrying
//! abstract [`FixAction`]s; [`fix`] turns those into text edits. The
//! judgments run in one of two modes. [`InspectionMode::Batch`] reports one
//! finding per name, [`InspectionMode::Interactive`] groups names and adds
//! informational summaries for an editor.

pub mod checker;
pub mod fix;
mod missing;
pub mod supplied;
mod unused;

pub use checker::ConsistencyChecker;
pub use fix::{TextEdit, apply_edits};
pub use supplied::{SuppliedParameter, SuppliedParameters};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::syntax::Span;

/// Which judgment produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// The template reads parameters the call does not pass
    MissingRequired,
    /// The call passes parameters the template does not read
    UnusedSupplied,
}

/// How a finding is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A probable bug
    Warning,
    /// Dead code, typically rendered greyed out
    Unused,
    /// Informational only, used for interactive summaries
    Information,
}

/// How results are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionMode {
    /// One finding per parameter name
    #[default]
    Batch,
    /// Grouped findings plus summaries and "fix all" actions
    Interactive,
}

/// Which inspections run and how they report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionOptions {
    /// Reporting mode
    #[serde(default)]
    pub mode: InspectionMode,
    /// Report parameters the template needs but the call omits
    #[serde(default = "enabled")]
    pub missing_required: bool,
    /// Report parameters the call passes but the template ignores
    #[serde(default = "enabled")]
    pub unused_supplied: bool,
}

fn enabled() -> bool {
    true
}

impl Default for InspectionOptions {
    fn default() -> Self {
        Self {
            mode: InspectionMode::Batch,
            missing_required: true,
            unused_supplied: true,
        }
    }
}

impl InspectionOptions {
    /// Both inspections in interactive mode.
    pub fn interactive() -> Self {
        Self {
            mode: InspectionMode::Interactive,
            ..Self::default()
        }
    }

    /// Whether interactive reporting is on.
    pub fn is_interactive(&self) -> bool {
        self.mode == InspectionMode::Interactive
    }
}

/// A correction offered with a finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixAction {
    /// Pass one missing parameter
    InsertKey(String),
    /// Pass every listed missing parameter
    InsertKeys(Vec<String>),
    /// Stop passing one unused parameter
    RemoveKey(String),
    /// Stop passing every listed unused parameter
    RemoveKeys(Vec<String>),
    /// Drop the parameter argument
    RemoveArgument,
}

impl FixAction {
    /// Short description suitable for a quick-fix menu.
    pub fn label(&self) -> String {
        match self {
            FixAction::InsertKey(name) => format!("Add \"{name}\" parameter"),
            FixAction::InsertKeys(_) => "Add all missing parameters".to_string(),
            FixAction::RemoveKey(name) => format!("Remove \"{name}\" parameter"),
            FixAction::RemoveKeys(_) => "Remove unused parameters".to_string(),
            FixAction::RemoveArgument => "Remove parameters argument".to_string(),
        }
    }
}

/// One reported inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Judgment that produced the finding
    pub kind: FindingKind,
    /// Presentation
    pub severity: Severity,
    /// File containing the call
    pub file: PathBuf,
    /// Source range the finding is attached to
    pub anchor: Span,
    /// Human-readable description
    pub message: String,
    /// Parameter names involved, sorted
    pub parameters: Vec<String>,
    /// Offered corrections
    pub fixes: Vec<FixAction>,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}: {}",
            self.file.display(),
            self.anchor.start,
            self.anchor.end,
            self.message
        )
    }
}
