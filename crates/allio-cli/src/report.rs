//! Diagnostic rendering and exit status

use std::io::{self, Write};
use std::process::ExitCode;

use allio_ir::Diagnostic;
use allio_pipeline::{Outcome, WarningPolicy};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The document passed under the active warning policy
    Passed,
    /// The document has failing diagnostics
    Failed,
    /// The input, config, or validator could not be processed
    Fault,
}

impl Status {
    /// Status of a completed validation run
    #[must_use]
    pub fn of(outcome: &Outcome, warnings: WarningPolicy) -> Self {
        if outcome.passes(warnings) {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
            Self::Fault => 2,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.code())
    }
}

/// Render one diagnostic as `<path>:<line>:<column>: <severity>: <message>`.
///
/// Unresolved positions print as `0`.
#[must_use]
pub fn render(source_path: &str, diagnostic: &Diagnostic) -> String {
    format!(
        "{source_path}:{}:{}: {}: {}",
        diagnostic.line.unwrap_or(0),
        diagnostic.column.unwrap_or(0),
        diagnostic.severity,
        diagnostic.message
    )
}

/// Write every diagnostic, one per line
pub fn write_report<W: Write>(
    out: &mut W,
    source_path: &str,
    diagnostics: &[Diagnostic],
) -> io::Result<()> {
    for diagnostic in diagnostics {
        writeln!(out, "{}", render(source_path, diagnostic))?;
    }
    Ok(())
}
