//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements              | Connects to               |
//! |----------------|-------------------------|---------------------------|
//! | `hardware`     | SensorPort, ActuatorPort| relay pins, probes, ADC   |
//! | `log_sink`     | EventSink               | `log` facade              |
//! | `config_store` | ConfigPort              | postcard blob in memory   |
//! | `sim`          | SensorPort, ActuatorPort| simulated reservoir       |
//! |                | ClockPort, DelayNs      | simulated clock           |

pub mod config_store;
pub mod hardware;
pub mod log_sink;
pub mod sim;
