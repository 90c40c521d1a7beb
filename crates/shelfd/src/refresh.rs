use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

// Durable-until-consumed single-slot signal. Any part of the process may
// raise it after a mutation that invalidates the shelf; the one reader
// clears it on its next activation, so a raise can never be consumed twice.
static SHELF_STALE: AtomicBool = AtomicBool::new(false);

pub fn raise() {
    debug!("shelf refresh signal raised");
    SHELF_STALE.store(true, Ordering::SeqCst);
}

/// Returns true at most once per raise, clearing the slot in the same step.
pub fn consume() -> bool {
    SHELF_STALE.swap(false, Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_drains_the_slot_exactly_once() {
        assert!(!consume());
        raise();
        raise();
        assert!(consume());
        assert!(!consume());
    }
}
