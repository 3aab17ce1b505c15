// ABOUTME: Diagnostics accumulator for non-fatal warnings during resolution.
// ABOUTME: Collects fallbacks the user should know about without failing the connection.

/// Collects non-fatal warnings while a session is being resolved.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning. The caller prints collected warnings through
    /// `Output`; here it is only traced.
    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during resolution.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// No configured IdentityFile existed; the override is being consulted.
    pub fn identity_fallback(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::IdentityFallback,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// No configured IdentityFile existed; the override was consulted.
    IdentityFallback,
}
