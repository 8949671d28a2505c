use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy_ecs::prelude::Resource;

/// Set when the player asks to quit; checked at the top of every loop iteration.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ExitFlag {
    requested: bool,
}

impl ExitFlag {
    pub fn request(&mut self) {
        self.requested = true;
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

/// Interrupt (Ctrl-C / SIGINT) latch shared with the signal handler thread.
///
/// The handler only stores `true`; the input system turns it into an
/// [`ExitFlag`] request so teardown still runs.
#[derive(Resource, Debug, Default, Clone)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    /// Register the process-wide interrupt handler. Only one can be installed.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let raised = Arc::clone(&self.raised);
        ctrlc::set_handler(move || raised.store(true, Ordering::SeqCst))
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
