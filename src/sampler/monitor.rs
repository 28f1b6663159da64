//! Cooperative cancellation and progress reporting for the sampling loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, polled between radii (and between bin samples in
/// 2D). Cancellation is not an error: the sampler returns the profile
/// populated so far.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Observation hooks threaded through a sampling run. Both hooks are
/// optional; [`Monitor::default`] is a no-op.
#[derive(Default)]
pub struct Monitor<'a> {
    pub cancel: Option<&'a CancelToken>,
    pub progress: Option<&'a mut dyn FnMut(usize, usize)>,
}

impl<'a> Monitor<'a> {
    pub fn with_cancel(cancel: &'a CancelToken) -> Self {
        Self {
            cancel: Some(cancel),
            progress: None,
        }
    }

    pub fn with_progress(progress: &'a mut dyn FnMut(usize, usize)) -> Self {
        Self {
            cancel: None,
            progress: Some(progress),
        }
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cancel.map(CancelToken::is_cancelled).unwrap_or(false)
    }

    pub(crate) fn report(&mut self, current: usize, total: usize) {
        if let Some(progress) = self.progress.as_mut() {
            progress(current, total);
        }
    }
}
