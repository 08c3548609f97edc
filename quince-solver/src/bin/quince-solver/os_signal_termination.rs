use std::ffi::c_int;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use log::warn;
use quince_core::termination::TerminationCondition;
use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;

/// No signal has been received yet.
const NO_SIGNAL: usize = 0;

/// Stops the search once SIGINT or SIGTERM is received, so that the solutions found so far are
/// still reported.
#[derive(Clone, Debug)]
pub(crate) struct OsSignal {
    received: Arc<AtomicUsize>,
    has_reported: bool,
}

impl OsSignal {
    /// Installs the signal listeners.
    pub(crate) fn install() -> std::io::Result<OsSignal> {
        let received = Arc::new(AtomicUsize::new(NO_SIGNAL));

        for signal in [SIGINT, SIGTERM] {
            let _ = signal_hook::flag::register_usize(
                signal,
                Arc::clone(&received),
                signal as usize,
            )?;
        }

        Ok(OsSignal {
            received,
            has_reported: false,
        })
    }

    fn received_signal(&self) -> Option<c_int> {
        match self.received.load(Ordering::Relaxed) {
            NO_SIGNAL => None,
            signal => c_int::try_from(signal).ok(),
        }
    }
}

impl TerminationCondition for OsSignal {
    fn should_stop(&mut self) -> bool {
        let Some(signal) = self.received_signal() else {
            return false;
        };

        if !self.has_reported {
            warn!("Received signal {signal}, stopping the search");
            self.has_reported = true;
        }
        true
    }
}
