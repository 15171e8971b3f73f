//! Terminal width discovery.
//!
//! The width of the rendered line is resolved once, when a [`Tracker`](crate::Tracker)
//! is built. The default [`SttyProbe`] asks `stty size` about the terminal attached to
//! this process's stdin; tests and embedders can inject any other [`WidthProbe`].
//!
//! Probing never fails from the caller's point of view: any problem is logged as a
//! warning and [`FALLBACK_WIDTH`] is used instead.

use std::{
    io,
    process::{Command, Stdio},
};

/// Column count used whenever the terminal width cannot be determined.
pub const FALLBACK_WIDTH: usize = 79;

/// A capability that reports how many columns the output terminal has.
pub trait WidthProbe {
    /// Returns the column count. Implementations should degrade to
    /// [`FALLBACK_WIDTH`] rather than report an error.
    fn columns(&self) -> usize;
}

impl<F: Fn() -> usize> WidthProbe for F {
    fn columns(&self) -> usize {
        self()
    }
}

/// A probe that always reports the same width.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedWidth(pub usize);

impl WidthProbe for FixedWidth {
    fn columns(&self) -> usize {
        self.0
    }
}

/// Probes the controlling terminal by running `stty size`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SttyProbe;

impl WidthProbe for SttyProbe {
    fn columns(&self) -> usize {
        match stty_columns() {
            Ok(columns) => {
                tracing::debug!(columns, "probed terminal width");
                columns
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    fallback = FALLBACK_WIDTH,
                    "error finding terminal width"
                );
                FALLBACK_WIDTH
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("failed to run stty: {0}")]
    Spawn(#[from] io::Error),

    #[error("stty exited with {0}")]
    Status(std::process::ExitStatus),

    #[error("unexpected stty output {0:?}")]
    Parse(String),
}

fn stty_columns() -> Result<usize, ProbeError> {
    let output = Command::new("stty")
        .arg("size")
        .stdin(Stdio::inherit())
        .stderr(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(ProbeError::Status(output.status));
    }

    parse_stty_size(&String::from_utf8_lossy(&output.stdout))
}

/// Parses the `"<rows> <columns>"` line printed by `stty size`.
fn parse_stty_size(out: &str) -> Result<usize, ProbeError> {
    let mut fields = out.split_whitespace();
    let columns = match (fields.next(), fields.next(), fields.next()) {
        (Some(_rows), Some(columns), None) => columns.parse::<usize>().ok(),
        _ => None,
    };

    // Detached pseudo-terminals commonly report "0 0".
    match columns {
        Some(columns) if columns > 0 => Ok(columns),
        _ => Err(ProbeError::Parse(out.trim().to_owned())),
    }
}
