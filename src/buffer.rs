use std::collections::VecDeque;
use std::sync::Mutex;

use crate::capsule::Capsule;
use crate::error::PortError;

/// Thread-safe holding area decoupling the receive thread from consumption.
///
/// Two independent FIFO queues: decoded capsules and receive-path errors. Each
/// queue has its own lock, so draining one never contends with the other. A
/// drain takes everything queued in one atomic snapshot; items arriving after
/// the snapshot are seen by the next drain.
pub struct ReceiveBuffer {
    received: Mutex<VecDeque<Capsule>>,
    errors: Mutex<VecDeque<PortError>>,
}

impl ReceiveBuffer {
    pub fn new() -> Self {
        ReceiveBuffer {
            received: Mutex::new(VecDeque::new()),
            errors: Mutex::new(VecDeque::new()),
        }
    }

    /// Enqueue a capsule, unless the queue already holds `limit` items.
    ///
    /// A limit of zero or below means unlimited. When the queue is full the
    /// new capsule is discarded (drop-newest; queued items are never evicted).
    /// Returns false when the capsule was dropped.
    pub fn push_capsule(&self, capsule: Capsule, limit: i32) -> bool {
        let mut received = self.received.lock().unwrap();
        if limit > 0 && received.len() >= limit as usize {
            return false;
        }
        received.push_back(capsule);
        true
    }

    /// Enqueue a receive-path error. Errors are never subject to the limit.
    pub fn push_error(&self, err: PortError) {
        self.errors.lock().unwrap().push_back(err);
    }

    /// Take every queued capsule, in arrival order.
    pub fn drain_received(&self) -> Vec<Capsule> {
        std::mem::take(&mut *self.received.lock().unwrap()).into()
    }

    /// Take every queued error, in arrival order.
    pub fn drain_errors(&self) -> Vec<PortError> {
        std::mem::take(&mut *self.errors.lock().unwrap()).into()
    }

    pub fn received_len(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn errors_len(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        ReceiveBuffer::new()
    }
}
