//! Hydroponic reservoir controller library.
//!
//! Sensor conditioning, the heater, circulation pump and dosing controllers,
//! and the orchestrating [`AppService`](app::service::AppService). Hardware
//! is reached only through the port traits in [`app::ports`]; the board
//! binding lives in [`adapters::hardware`], the host simulator in
//! [`adapters::sim`].

#![deny(unused_must_use)]

pub mod app;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod safety;
pub mod state;

pub mod adapters;
pub mod control;
pub mod drivers;
pub mod sensors;
