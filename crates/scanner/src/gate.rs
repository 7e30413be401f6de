use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Re-entrancy guard around check-in requests.
///
/// At most one [`GatePermit`] exists at a time; the gate reopens when the permit is dropped.
/// Callers that fail to acquire drop their payload, nothing is queued.
#[derive(Debug, Clone, Default)]
pub struct CheckInGate {
    busy: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct GatePermit {
    busy: Arc<AtomicBool>,
}

impl CheckInGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<GatePermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GatePermit {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
