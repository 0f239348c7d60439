//! Subcommand handlers.
//!
//! Each handler loads the export, asks the core one question and renders the
//! answer. None of them print directly; they write to the supplied writer.

pub mod check;
pub mod probe;
pub mod stats;

/// What a command found, mapped to the process exit status by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report.
    Clean,
    /// The graph has loops, or the probed edge would close one.
    Findings,
}

impl Outcome {
    pub const fn from_clean(clean: bool) -> Self {
        if clean { Self::Clean } else { Self::Findings }
    }
}
