use crate::core::bus::Bus;
use crate::core::component::BusMasterComponent;

/// Trait for CPU types that can provide state snapshots (debugger,
/// save-state).
pub trait CpuStateTrait {
    type Snapshot;
    fn snapshot(&self) -> Self::Snapshot;
}

/// Generic CPU interface.
pub trait Cpu: BusMasterComponent<BusKind = dyn Bus> + CpuStateTrait {
    /// Reset vector fetch: PC <- [0], initial SP <- [4].
    fn reset(&mut self, bus: &mut dyn Bus);

    /// Query if CPU is halted internally (SLEEP instruction).
    fn is_sleeping(&self) -> bool;
}

pub mod sh2;
pub use sh2::{Sh2, Sh2State};
