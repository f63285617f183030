//! In-memory device model filled in by connectors.

mod descriptor;
mod ethernet;
mod events;
mod interface;
mod neighbor;
mod poe;
mod portlist;
mod snapshot;
mod vlan;

pub use descriptor::*;
pub use ethernet::*;
pub use events::*;
pub use interface::*;
pub use neighbor::*;
pub use poe::*;
pub use portlist::PortList;
pub use snapshot::*;
pub use vlan::*;
