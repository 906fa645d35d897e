//! Load families and the tagged `Load` type the model stores.

mod distributed;
mod node_load;
mod point_load;
mod settlement;
mod thermal;

use serde::{Deserialize, Serialize};

pub use distributed::BarDistributedLoad;
pub use node_load::NodalLoad;
pub use point_load::BarPointLoad;
pub use settlement::PrescribedMovement;
pub use thermal::ThermalLoad;

/// Any load the model can carry, as a tagged variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Load {
    Nodal(NodalLoad),
    BarPoint(BarPointLoad),
    BarDistributed(BarDistributedLoad),
    Thermal(ThermalLoad),
    Movement(PrescribedMovement),
}

impl Load {
    /// The bar this load targets, for bar-attached families.
    pub fn bar_id(&self) -> Option<u32> {
        match self {
            Load::BarPoint(l) => Some(l.bar),
            Load::BarDistributed(l) => Some(l.bar),
            Load::Thermal(l) => Some(l.bar),
            _ => None,
        }
    }

    /// The node this load targets, for node-attached families.
    pub fn node_id(&self) -> Option<u32> {
        match self {
            Load::Nodal(l) => Some(l.node),
            Load::Movement(l) => Some(l.node),
            _ => None,
        }
    }

    /// True for loads that carry a mechanical resultant (everything except
    /// thermal actions and prescribed movements).
    pub fn is_mechanical(&self) -> bool {
        matches!(self, Load::Nodal(_) | Load::BarPoint(_) | Load::BarDistributed(_))
    }
}

impl From<NodalLoad> for Load {
    fn from(l: NodalLoad) -> Self {
        Load::Nodal(l)
    }
}

impl From<BarPointLoad> for Load {
    fn from(l: BarPointLoad) -> Self {
        Load::BarPoint(l)
    }
}

impl From<BarDistributedLoad> for Load {
    fn from(l: BarDistributedLoad) -> Self {
        Load::BarDistributed(l)
    }
}

impl From<ThermalLoad> for Load {
    fn from(l: ThermalLoad) -> Self {
        Load::Thermal(l)
    }
}

impl From<PrescribedMovement> for Load {
    fn from(l: PrescribedMovement) -> Self {
        Load::Movement(l)
    }
}
