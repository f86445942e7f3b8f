/*!
 * FIFO admission gate.
 *
 * Admits at most `capacity` holders at once. Callers beyond that wait in
 * arrival order; a released slot is handed straight to the longest waiter,
 * so a newcomer never overtakes the queue.
 */

use std::collections::VecDeque;

use log::trace;
use parking_lot::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct GateState {
    occupancy: usize,
    peak: usize,
    waiters: VecDeque<oneshot::Sender<()>>,
}

/// Counting gate with strict FIFO hand-off
#[derive(Debug)]
pub struct AdmissionGate {
    name: String,
    capacity: usize,
    state: Mutex<GateState>,
}

/// Slot held in an [`AdmissionGate`]; released on drop
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct GatePermit<'a> {
    gate: &'a AdmissionGate,
}

/// Queued acquirer. If dropped after being granted a slot but before
/// observing it, the slot is passed on.
struct Waiter<'a> {
    gate: &'a AdmissionGate,
    rx: oneshot::Receiver<()>,
}

impl AdmissionGate {
    /// Create a gate; a capacity of zero is raised to one
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity: capacity.max(1),
            state: Mutex::new(GateState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of holders
    pub fn occupancy(&self) -> usize {
        self.state.lock().occupancy
    }

    /// Number of queued acquirers, including abandoned ones not yet purged
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Highest occupancy observed since creation
    pub fn peak_occupancy(&self) -> usize {
        self.state.lock().peak
    }

    /// Wait for a slot. Never fails.
    pub async fn acquire(&self) -> GatePermit<'_> {
        loop {
            let rx = match self.try_enter() {
                Ok(permit) => return permit,
                Err(rx) => rx,
            };

            let mut waiter = Waiter { gate: self, rx };
            if (&mut waiter.rx).await.is_ok() {
                trace!("[{}] slot handed to waiter", self.name);
                return GatePermit { gate: self };
            }
            // Sender dropped without a grant; queue again
        }
    }

    /// Take a free slot when no one is queued, otherwise enqueue
    fn try_enter(&self) -> Result<GatePermit<'_>, oneshot::Receiver<()>> {
        let mut state = self.state.lock();
        state.waiters.retain(|tx| !tx.is_closed());

        if state.occupancy < self.capacity && state.waiters.is_empty() {
            state.occupancy += 1;
            state.peak = state.peak.max(state.occupancy);
            return Ok(GatePermit { gate: self });
        }

        let (tx, rx) = oneshot::channel();
        state.waiters.push_back(tx);
        trace!(
            "[{}] full ({}/{}), {} waiting",
            self.name,
            state.occupancy,
            self.capacity,
            state.waiters.len()
        );
        Err(rx)
    }

    /// Hand the slot to the first live waiter, or free it
    fn release(&self) {
        let mut state = self.state.lock();
        while let Some(tx) = state.waiters.pop_front() {
            if tx.send(()).is_ok() {
                return;
            }
        }
        state.occupancy = state.occupancy.saturating_sub(1);
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        self.rx.close();
        if self.rx.try_recv().is_ok() {
            self.gate.release();
        }
    }
}
