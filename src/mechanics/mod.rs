//! Geometry-level mechanics: equilibrium primitives and internal-force
//! diagrams via the section method.

pub mod diagrams;
pub mod equilibrium;

pub use diagrams::{build_section_diagram, Diagram, DiagramSet, SectionSeed, Segment};
pub use equilibrium::{
    equilibrium_residuals, moment_about, restraints_are_stable, solve_isostatic_reactions,
    MomentCondition, PointAction, Reactions, Restraint,
};
