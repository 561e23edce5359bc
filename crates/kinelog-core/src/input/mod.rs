//! Debounced button edges and the analog navigation axis.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub mod mock;

/// Full-scale reading of the 12-bit navigation axis.
pub const AXIS_MAX: u16 = 4095;
/// Resting (deadzone-center) axis reading.
pub const AXIS_CENTER: u16 = 2047;

/// Logical buttons wired to edge interrupts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ButtonId {
    /// Act on the current menu mode.
    Confirm,
    /// Cancel the current modal sub-flow.
    Back,
    /// Reserved, currently unbound.
    Auxiliary,
}

impl ButtonId {
    const COUNT: usize = 3;

    const fn index(self) -> usize {
        match self {
            Self::Confirm => 0,
            Self::Back => 1,
            Self::Auxiliary => 2,
        }
    }
}

struct EdgeSlot {
    pending: AtomicBool,
    last_accepted_ms: AtomicU32,
}

/// One latched edge per button, written from interrupt context and drained
/// by the main loop.
///
/// All state is atomic, so `on_edge` may be called from an interrupt handler
/// without a critical section. There is no queue: a second edge accepted
/// before the pending flag is polled is absorbed into the already-set flag,
/// so at most one outstanding event per button is representable.
pub struct InputController {
    slots: [EdgeSlot; ButtonId::COUNT],
    debounce_ms: u32,
}

impl InputController {
    pub const fn new(debounce_ms: u32) -> Self {
        // Prime the last-accepted timestamps so the first edge after reset
        // always lands outside the debounce window.
        let primed = 0u32.wrapping_sub(debounce_ms).wrapping_sub(1);
        const fn slot(primed: u32) -> EdgeSlot {
            EdgeSlot {
                pending: AtomicBool::new(false),
                last_accepted_ms: AtomicU32::new(primed),
            }
        }
        Self {
            slots: [slot(primed), slot(primed), slot(primed)],
            debounce_ms,
        }
    }

    /// Record a hardware edge. Interrupt-context safe.
    ///
    /// Edges closer than the debounce window to the last accepted edge of
    /// the same button are dropped.
    pub fn on_edge(&self, id: ButtonId, now_ms: u32) {
        let slot = &self.slots[id.index()];
        let last = slot.last_accepted_ms.load(Ordering::Relaxed);
        if now_ms.wrapping_sub(last) <= self.debounce_ms {
            return;
        }
        slot.last_accepted_ms.store(now_ms, Ordering::Relaxed);
        slot.pending.store(true, Ordering::Release);
    }

    /// Return and clear the pending flag for `id`. Main-loop side.
    pub fn poll_and_clear(&self, id: ButtonId) -> bool {
        self.slots[id.index()].pending.swap(false, Ordering::Acquire)
    }
}

/// Direction decoded from the navigation axis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AxisDirection {
    Previous,
    Next,
}

/// Polled analog axis in `[0, AXIS_MAX]`. No state of its own; the reading
/// is classified fresh on every poll.
pub trait AxisSource {
    type Error;

    fn read(&mut self) -> Result<u16, Self::Error>;
}

/// Threshold decode: below `low` navigates back, above `high` navigates
/// forward, anything between is the deadzone.
pub fn classify_axis(raw: u16, low: u16, high: u16) -> Option<AxisDirection> {
    if raw < low {
        Some(AxisDirection::Previous)
    } else if raw > high {
        Some(AxisDirection::Next)
    } else {
        None
    }
}
