//! Structural entities: nodes, bars, materials, sections and supports.

mod bar;
pub mod catalog;
mod material;
mod node;
mod section;
mod support;

pub use bar::{Bar, BarEnd, BarProps};
pub use material::Material;
pub use node::{Dof, Node};
pub use section::Section;
pub use support::Support;
