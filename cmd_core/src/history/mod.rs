//! Bounded diagnostic event ring.
//!
//! Every engine failure appends a compact `{source, line}` record to a
//! fixed-size circular buffer, overwriting the oldest entry once full.
//! This survives in production images where the textual diagnostics are
//! compiled out, so the most recent failure locations stay inspectable
//! within a fixed memory budget.

use std::sync::Mutex;

use heapless::Vec;

/// Size of the circular buffer storing recent events.
const RING_CAPACITY: usize = 10;

/// Engine module that recorded an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Dispatch,
    Parser,
}

/// A single recorded event: where, and which source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub line: u16,
}

struct Ring {
    events: [Option<Event>; RING_CAPACITY],
    head: usize,
}

// The single-caller precondition makes contention impossible; the lock
// only keeps a violated precondition from becoming a data race.
static EVENTS: Mutex<Ring> = Mutex::new(Ring { events: [None; RING_CAPACITY], head: 0 });

/// Append an event, overwriting the oldest once the ring is full.
pub fn record(source: Source, line: u16) {
    if let Ok(mut ring) = EVENTS.lock() {
        let head = ring.head;
        ring.events[head] = Some(Event { source, line });
        ring.head = (head + 1) % RING_CAPACITY;
    }
}

/// Snapshot of the retained events, oldest first.
pub fn recent() -> Vec<Event, RING_CAPACITY> {
    let mut out = Vec::new();
    if let Ok(ring) = EVENTS.lock() {
        for i in 0..RING_CAPACITY {
            let idx = (ring.head + i) % RING_CAPACITY;
            if let Some(event) = ring.events[idx] {
                let _ = out.push(event);
            }
        }
    }
    out
}

/// Record a failure and emit its formatted diagnostic through the `log`
/// facade. The ring write always happens; the text is subject to the
/// host's logger configuration and `log`'s compile-time level features.
#[macro_export]
macro_rules! log_err {
    ($source:expr, $($arg:tt)*) => {{
        $crate::history::record($source, line!() as u16);
        ::log::error!($($arg)*);
    }};
}

// ==================== TESTS =======================
