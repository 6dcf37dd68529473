//! Acceptance and warning policies

/// Policy for documents whose semantic checks produced errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptancePolicy {
    /// Return the document together with every diagnostic
    #[default]
    AcceptWithDiagnostics,

    /// Reject the document if any semantic diagnostic is an error
    FailFast,
}

/// Whether warning-severity diagnostics count as a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningPolicy {
    /// Only errors fail a run
    #[default]
    Allow,

    /// Any diagnostic fails a run
    Deny,
}

impl WarningPolicy {
    /// Policy selected by a deny-warnings flag
    #[must_use]
    pub fn from_deny_warnings(deny: bool) -> Self {
        if deny { Self::Deny } else { Self::Allow }
    }
}
