//! Output drivers for the relay board.

pub mod relay;
