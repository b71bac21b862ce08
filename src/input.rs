//! Rotary encoder capture.
//!
//! The encoder's interrupt handler writes the latest position and a click
//! latch into atomic cells; the main cycle polls them. Nothing else is shared
//! between interrupt and cycle context.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Lock-free last-value cells written from the capture ISR.
pub struct EncoderCell {
    position: AtomicI32,
    clicked: AtomicBool,
}

impl EncoderCell {
    pub const fn new() -> Self {
        Self {
            position: AtomicI32::new(0),
            clicked: AtomicBool::new(false),
        }
    }

    /// ISR side: store the decoded position.
    pub fn record_position(&self, position: i32) {
        self.position.store(position, Ordering::Release);
    }

    /// ISR side: latch a button press.
    pub fn record_click(&self) {
        self.clicked.store(true, Ordering::Release);
    }

    pub fn position(&self) -> i32 {
        self.position.load(Ordering::Acquire)
    }

    /// Read and clear the click latch.
    pub fn take_click(&self) -> bool {
        self.clicked.swap(false, Ordering::AcqRel)
    }
}

impl Default for EncoderCell {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderEvent {
    Rotated(i32),
    Clicked,
}

/// Cycle-side change detector over an [`EncoderCell`].
#[derive(Debug, Default)]
pub struct EncoderReader {
    last_position: i32,
}

impl EncoderReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, cell: &EncoderCell) -> heapless::Vec<EncoderEvent, 2> {
        let mut events = heapless::Vec::new();
        let pos = cell.position();
        if pos != self.last_position {
            self.last_position = pos;
            let _ = events.push(EncoderEvent::Rotated(pos));
        }
        if cell.take_click() {
            let _ = events.push(EncoderEvent::Clicked);
        }
        events
    }
}
