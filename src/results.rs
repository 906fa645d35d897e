//! Analysis results.

use std::collections::HashMap;

use crate::analysis::Redundant;
use crate::error::AnalysisError;
use crate::math::{Mat, Vec as FVec};
use crate::mechanics::Diagram;

/// Complete outcome of one analysis run.
///
/// On failure, `errors` carries the tagged causes and every field already
/// computed (degree, chosen redundants, partial coefficients) remains
/// available for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// True when the pipeline ran to completion
    pub success: bool,
    /// Degree of static indeterminacy GH
    pub degree: i32,
    /// Selected redundants, in system order
    pub redundants: Vec<Redundant>,
    /// Solved redundant values, length GH
    pub x: Option<FVec>,
    /// Final reactions per supported node as (Rx, Ry, Mz)
    pub reactions: HashMap<u32, [f64; 3]>,
    /// Final internal-force diagrams per bar, callable on [0, L]
    pub diagrams: HashMap<u32, Diagram>,
    /// Assembled flexibility matrix
    pub f_matrix: Option<Mat>,
    /// Assembled independent terms
    pub e0: Option<FVec>,
    /// Condition number of F
    pub condition_number: f64,
    /// Residual of the compatibility solve
    pub sece_residual: f64,
    /// Displacements of nodes on released elastic springs as (Ux, Uy, θz)
    pub spring_displacements: HashMap<u32, [f64; 3]>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
    /// Fatal errors (empty on success)
    pub errors: Vec<AnalysisError>,
}

impl AnalysisResult {
    /// A failed result carrying whatever was computed before the error.
    pub(crate) fn failed(degree: i32, errors: Vec<AnalysisError>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            degree,
            errors,
            warnings,
            condition_number: 1.0,
            ..Default::default()
        }
    }

    /// Redundant value Xᵢ, 1-indexed.
    pub fn x_value(&self, i: usize) -> Option<f64> {
        self.x.as_ref().and_then(|x| {
            (i >= 1 && i <= x.len()).then(|| x[i - 1])
        })
    }

    /// Final reactions at a node, `(Rx, Ry, Mz)`; zeros when unsupported.
    pub fn reaction(&self, node_id: u32) -> [f64; 3] {
        self.reactions.get(&node_id).copied().unwrap_or([0.0; 3])
    }

    /// Final diagram of a bar.
    pub fn diagram(&self, bar_id: u32) -> Option<&Diagram> {
        self.diagrams.get(&bar_id)
    }

    /// Final bending moment in bar `bar_id` at `x`.
    pub fn m(&self, bar_id: u32, x: f64) -> f64 {
        self.diagrams.get(&bar_id).map_or(0.0, |d| d.m(x))
    }

    /// Final shear force in bar `bar_id` at `x`.
    pub fn v(&self, bar_id: u32, x: f64) -> f64 {
        self.diagrams.get(&bar_id).map_or(0.0, |d| d.v(x))
    }

    /// Final axial force in bar `bar_id` at `x`.
    pub fn n(&self, bar_id: u32, x: f64) -> f64 {
        self.diagrams.get(&bar_id).map_or(0.0, |d| d.n(x))
    }
}
