// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
A shared clean/dirty bit.

The texture that consumes the bit owns one [`DirtyFlag`]; anything that can invalidate the
texture (the camera, typically) holds a clone and calls [`DirtyFlag::mark_dirty`].  Any number of
marks between two checks collapse into one dirty state, which the consumer clears with
[`DirtyFlag::take`] when it refreshes.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct DirtyFlag {
    shared: Arc<AtomicBool>,
}

impl DirtyFlag {
    pub fn new(dirty: bool) -> Self {
        DirtyFlag {
            shared: Arc::new(AtomicBool::new(dirty)),
        }
    }

    pub fn mark_dirty(&self) {
        self.shared.store(true, Ordering::Relaxed);
    }

    pub fn is_dirty(&self) -> bool {
        self.shared.load(Ordering::Relaxed)
    }

    /// Clears the bit, returning whether it was set.
    pub fn take(&self) -> bool {
        self.shared.swap(false, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let flag = DirtyFlag::new(false);
        let notifier = flag.clone();
        assert!(!flag.is_dirty());
        notifier.mark_dirty();
        notifier.mark_dirty();
        assert!(flag.is_dirty());
        assert!(flag.take());
        assert!(!flag.take());
        assert!(!notifier.is_dirty());
    }
}
