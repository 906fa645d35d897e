//! Process-wide numeric policy.
//!
//! These constants are fixed at build time; nothing in the crate mutates
//! them. Every tolerance used by the pipeline lives here so the validation
//! gates, the assembler and the solver agree on what "zero" means.

/// Geometric length tolerance in metres. Two nodes closer than this are
/// considered coincident; bars shorter than this are rejected.
pub const LENGTH_TOLERANCE: f64 = 1e-9;

/// Tolerance for the global equilibrium residuals (kN, kNm).
pub const EQUILIBRIUM_TOLERANCE: f64 = 1e-6;

/// Tolerance on the SECE residual ‖F·X − (e_h − e₀)‖.
pub const COMPATIBILITY_TOLERANCE: f64 = 1e-8;

/// Tolerance on the Maxwell-Betti symmetry check ‖F − Fᵀ‖.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Condition number of F above which a warning recommends reselecting
/// redundants.
pub const CONDITION_NUMBER_WARNING: f64 = 1e12;

/// Default odd sample count for composite Simpson integration.
pub const DEFAULT_INTEGRATION_POINTS: usize = 21;
