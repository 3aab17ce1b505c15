// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet, and JSON output modes.

use crate::diagnostics::{Warning, WarningKind};
use crate::ssh::{ResolvedSession, display_command};
use serde::Serialize;
use std::ffi::OsString;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Only errors and requested data
    Quiet,
    /// JSON for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Echo the command about to run.
    pub fn command(&self, argv: &[OsString]) {
        self.progress(&format!(">>> {}", display_command(argv)));
    }

    /// Print the resolved session and the command line it would run.
    pub fn session(&self, session: &ResolvedSession, argv: &[OsString]) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                let target = session.target();
                println!("Identity file: {}", session.key_path().display());
                println!("Destination:   {}:{}", target.destination(), target.port);
                for forward in &target.forwards {
                    println!("Forward:       {forward}");
                }
                match session.proxy_wrapper() {
                    Some(proxy) => println!("Proxy wrapper: {}", proxy.display()),
                    None => println!("Proxy wrapper: none"),
                }
                println!("Command:       {}", display_command(argv));
            }
            OutputMode::Json => {
                let report = SessionReport {
                    session,
                    command: argv.iter().map(|a| a.to_string_lossy()).collect(),
                };
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::warn!("failed to serialize session: {e}"),
                }
            }
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                    duration_secs: self.start_time.map(|_| self.elapsed_secs()),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print a non-fatal warning (suppressed in quiet mode).
    pub fn warning(&self, warning: &Warning) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {}", warning.message),
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let event = WarningEvent {
                    event: "warning",
                    kind: warning.kind,
                    message: &warning.message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    duration_secs: self.start_time.map(|_| self.elapsed_secs()),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct WarningEvent<'a> {
    event: &'a str,
    kind: WarningKind,
    message: &'a str,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    #[serde(flatten)]
    session: &'a ResolvedSession,
    command: Vec<std::borrow::Cow<'a, str>>,
}
