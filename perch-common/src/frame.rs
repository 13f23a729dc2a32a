//! Frame-boundary scheduling
//!
//! A frame callback runs at the next paint boundary, never inline.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type FrameCallback = Box<dyn FnOnce()>;

pub trait FrameScheduler: Clone + 'static {
    fn request_frame(&self, callback: FrameCallback);
}

/// Manually driven frame queue.
///
/// Nothing runs until `run_frame` is called. Callbacks queued while a frame is
/// running wait for the following frame, as `requestAnimationFrame` does.
#[derive(Clone, Default)]
pub struct FrameQueue {
    pending: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run one frame: every callback queued before this call, in order.
    ///
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let count = batch.len();
        for callback in batch {
            callback();
        }
        count
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }
}
