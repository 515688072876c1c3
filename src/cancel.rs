//! Cooperative cancellation for long-running queries.
//!
//! `count`, `list`, `unrank`, and `sample` can be exponential in the label
//! list's size on adversarial grammars. None of them spawn threads or yield
//! to a scheduler, so the only way to stop one early is for the caller to
//! flip a flag the recursion checks between calls — this token is that flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A flag a caller can set from another thread (or a signal handler) to ask
/// a long-running query to stop at its next recursive step.
///
/// Cloning a token shares the same underlying flag; cancelling any clone
/// cancels all of them.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`CancellationToken::cancel`] has been called on this token
    /// or any of its clones.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
