//! flex-solver - a native Rust planar-frame analyzer based on the force
//! (flexibility) method.
//!
//! Given a 2D frame of prismatic bars with rigid or elastic supports,
//! internal hinges, mechanical loads, thermal actions and prescribed
//! support movements, the library computes the degree of static
//! indeterminacy, selects redundant unknowns, assembles the compatibility
//! equations by virtual work and returns the final internal-force
//! diagrams N(x), V(x), M(x) per bar plus the support reactions.
//!
//! Sign convention: X grows to the right, Y downward, rotations and
//! moments are positive clockwise, axial force is positive in tension and
//! bending is positive when the bottom fibre is in tension.
//!
//! ## Example
//! ```rust
//! use flex_solver::prelude::*;
//!
//! let mut model = Model::new("propped cantilever");
//! model.add_material(Material::steel()).unwrap();
//! model.add_section(Section::ipe_220()).unwrap();
//!
//! model.add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed())).unwrap();
//! model.add_node(Node::new(2, 6.0, 0.0).with_support(Support::roller_y())).unwrap();
//! model.add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220")).unwrap();
//!
//! // 10 kN downward at mid-span (+90° is the clockwise perpendicular)
//! model.add_load(BarPointLoad::perpendicular(1, 10.0, 3.0)).unwrap();
//!
//! let result = analyze(&model, &AnalysisOptions::default());
//! assert!(result.success);
//! assert_eq!(result.degree, 1);
//!
//! let m_fixed = result.m(1, 0.0);
//! assert!((m_fixed + 11.25).abs() < 1e-6); // 3PL/16, hogging
//! ```

pub mod analysis;
pub mod consts;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod mechanics;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{
        analyze, AnalysisOptions, Redundant, RedundantKind, SolverKind, Substructure,
    };
    pub use crate::elements::{Bar, BarEnd, Dof, Material, Node, Section, Support};
    pub use crate::error::{AnalysisError, FlexResult};
    pub use crate::loads::{
        BarDistributedLoad, BarPointLoad, Load, NodalLoad, PrescribedMovement, ThermalLoad,
    };
    pub use crate::mechanics::Diagram;
    pub use crate::model::Model;
    pub use crate::results::AnalysisResult;
}

pub use analysis::{analyze, AnalysisOptions};
pub use error::{AnalysisError, FlexResult};
pub use model::Model;
pub use results::AnalysisResult;
