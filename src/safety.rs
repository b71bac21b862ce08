//! Sensor fault monitor.
//!
//! Runs every cycle right after conversion and folds the per-reading fault
//! flags into one bitmask stored in `SystemState.fault_flags`. Several faults
//! can be active at once; each bit clears on its own as soon as its reading
//! recovers. Nothing here touches actuators: the controllers apply their own
//! fail-safe on the flag in their reading (heater off, pH dose withheld).

use crate::error::SensorFault;
use crate::state::SensorSnapshot;
use log::{error, info};

#[derive(Debug, Default)]
pub struct FaultMonitor {
    faults: u8,
}

impl FaultMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate every fault against a fresh snapshot and return the
    /// updated mask.
    pub fn evaluate(&mut self, snapshot: &SensorSnapshot) -> u8 {
        self.eval_fault(SensorFault::TemperatureUnavailable, snapshot.temperature.is_fault());
        self.eval_fault(SensorFault::TdsOutOfRange, snapshot.tds.fault);
        self.eval_fault(SensorFault::PhOutOfRange, snapshot.ph.fault);
        self.faults
    }

    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// Active faults in [`SensorFault::ALL`] order.
    pub fn active(&self) -> impl Iterator<Item = SensorFault> + '_ {
        SensorFault::ALL.into_iter().filter(|f| self.faults & f.mask() != 0)
    }

    fn eval_fault(&mut self, fault: SensorFault, condition: bool) {
        if condition {
            if self.faults & fault.mask() == 0 {
                error!("SENSOR FAULT SET: {fault}");
            }
            self.faults |= fault.mask();
        } else {
            if self.faults & fault.mask() != 0 {
                info!("SENSOR FAULT CLEARED: {fault}");
            }
            self.faults &= !fault.mask();
        }
    }
}
