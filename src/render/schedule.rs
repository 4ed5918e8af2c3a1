/// RenderScheduler: the debounced link between grid mutation and
/// terminal painting.
///
/// Any number of grid writes within one frame tick coalesce into a
/// single pending paint, drained by the frame loop with `take()`. The
/// immediate path paints synchronously and calls `cancel()` so the
/// already-satisfied pending paint does not produce a duplicate.

use std::cell::Cell;
use std::rc::Rc;

pub struct RenderScheduler {
    pending: Rc<Cell<bool>>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        RenderScheduler {
            pending: Rc::new(Cell::new(false)),
        }
    }

    /// A hook suitable for `GridBuffer::set_observer`: every grid write
    /// marks a paint pending.
    pub fn hook(&self) -> impl FnMut() + 'static {
        let pending = Rc::clone(&self.pending);
        move || pending.set(true)
    }

    #[allow(dead_code)]
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Drain: returns whether a paint was pending, clearing the flag.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }

    /// Discard a pending paint (the immediate path already painted).
    pub fn cancel(&self) {
        self.pending.set(false);
    }
}
