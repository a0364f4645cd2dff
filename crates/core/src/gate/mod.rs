//! Download gate.
//!
//! A gate is an externally owned boolean telling the orchestrator whether it
//! is currently permissible to talk to the device for this purpose (e.g. the
//! device is connected and not flying). The owning device controller holds
//! the [`Gate`] half and flips it; the orchestrator holds the
//! [`GateMonitor`] half and reacts to edges.

use tokio::sync::watch;

/// Creates a connected gate pair with the given initial allowance.
pub fn gate(initially_allowed: bool) -> (Gate, GateMonitor) {
    let (tx, rx) = watch::channel(initially_allowed);
    (Gate { tx }, GateMonitor { rx })
}

/// Controller half of a gate, owned by the embedding device controller.
#[derive(Debug)]
pub struct Gate {
    tx: watch::Sender<bool>,
}

impl Gate {
    /// Current allowance.
    pub fn is_allowed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Sets the allowance.
    ///
    /// Setting the value it already has is a no-op: monitors are only woken
    /// on an actual edge.
    pub fn set_allowed(&self, allowed: bool) {
        self.tx.send_if_modified(|current| {
            if *current == allowed {
                false
            } else {
                *current = allowed;
                true
            }
        });
    }
}

/// Observer half of a gate, owned by the orchestrator.
#[derive(Debug, Clone)]
pub struct GateMonitor {
    rx: watch::Receiver<bool>,
}

impl GateMonitor {
    /// Current allowance.
    pub fn is_allowed(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits for the next allowance edge and returns the new value.
    ///
    /// Returns `None` once the [`Gate`] has been dropped.
    pub async fn changed(&mut self) -> Option<bool> {
        match self.rx.changed().await {
            Ok(()) => Some(*self.rx.borrow_and_update()),
            Err(_) => None,
        }
    }
}
