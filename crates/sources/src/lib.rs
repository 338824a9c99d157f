//! sens-gadget-sources: hardware trees that feed the gadget.
//!
//! Only a simulated machine ships today; it is built on the in-memory
//! hardware tree from `sens-gadget-core` so the registry sees the same
//! add/remove events a real backend would publish.

pub mod nic;
mod simulated;

pub use nic::{network_utilization, NicCounters, NicSensors};
pub use simulated::SimulatedComputer;
