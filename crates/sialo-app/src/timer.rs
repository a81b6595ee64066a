//! DQ5 observation countdown.
//!
//! Pure state machine advanced by one-second ticks. The caller owns the
//! clock; this only counts.

use sialo_core::models::evaluation::{INTERVAL_COUNT, SLOT_SECONDS, SessionKind};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Timer is stopped; nothing changed.
    Idle,
    /// One second elapsed inside the current slot.
    Second { slot: usize, seconds: u32 },
    /// The previous slot ran out and `slot` began.
    SlotStarted(usize),
    /// The last slot ran out. The timer stopped and rewound to slot 0.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationTimer {
    session: SessionKind,
    running: bool,
    slot: usize,
    seconds: u32,
}

impl Default for ObservationTimer {
    fn default() -> Self {
        Self {
            session: SessionKind::Activity,
            running: false,
            slot: 0,
            seconds: 0,
        }
    }
}

impl ObservationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or resume on `session`. Switching session rewinds first.
    pub fn start(&mut self, session: SessionKind) {
        if session != self.session {
            self.rewind();
            self.session = session;
        }
        self.running = true;
    }

    /// Pause, keeping the position.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and rewind to the first slot.
    pub fn reset(&mut self) {
        self.running = false;
        self.rewind();
    }

    pub fn tick(&mut self) -> TimerEvent {
        if !self.running {
            return TimerEvent::Idle;
        }
        self.seconds += 1;
        if self.seconds < SLOT_SECONDS {
            return TimerEvent::Second {
                slot: self.slot,
                seconds: self.seconds,
            };
        }
        self.seconds = 0;
        if self.slot + 1 < INTERVAL_COUNT {
            self.slot += 1;
            TimerEvent::SlotStarted(self.slot)
        } else {
            self.reset();
            tracing::info!(session = self.session.label(), "observation finished");
            TimerEvent::Finished
        }
    }

    pub fn session(&self) -> SessionKind {
        self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Zero-based index of the slot being observed.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn remaining_in_slot(&self) -> u32 {
        SLOT_SECONDS - self.seconds
    }

    fn rewind(&mut self) {
        self.slot = 0;
        self.seconds = 0;
    }
}
