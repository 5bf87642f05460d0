//! Cooperative cancellation for one import batch.

use std::cell::Cell;
use std::rc::Rc;

/// Shared abort flag checked at request dispatch and chunk boundaries.
///
/// Cancellation is cooperative: it takes effect at the next suspension
/// point, never preemptively. Clones observe the same flag.
#[derive(Clone, Default)]
pub struct CancelHandle {
    flag: Rc<Cell<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.get()
    }
}
