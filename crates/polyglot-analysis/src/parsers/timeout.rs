//! Run a primary parser under a hard wall-clock budget.
//!
//! The parser runs on a dedicated worker thread and reports back through a
//! bounded(1) crossbeam channel. A parser that overruns is abandoned: its
//! thread finishes in the background and its result is dropped.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use polyglot_core::errors::ParseError;

use super::traits::LanguageParser;
use super::types::ParsedSource;

/// Parse `content` with `parser`, failing with `ParseError::Timeout` after
/// `timeout` and with `ParseError::Panicked` if the parser panics.
pub fn parse_with_timeout(
    parser: Arc<dyn LanguageParser>,
    content: Arc<[u8]>,
    path: PathBuf,
    timeout: Duration,
) -> Result<ParsedSource, ParseError> {
    let (tx, rx) = bounded(1);
    let worker_path = path.clone();

    let spawned = std::thread::Builder::new()
        .name("polyglot-parse".to_string())
        .spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| parser.parse(&content, &worker_path)))
                .unwrap_or_else(|_| Err(ParseError::Panicked { path: worker_path.clone() }));
            // The receiver is gone when the caller already timed out.
            let _ = tx.send(outcome);
        });

    if let Err(e) = spawned {
        return Err(ParseError::Resource {
            path,
            message: format!("could not spawn parser thread: {e}"),
        });
    }

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => Err(ParseError::Timeout {
            path,
            timeout_ms: timeout.as_millis() as u64,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(ParseError::Panicked { path }),
    }
}
