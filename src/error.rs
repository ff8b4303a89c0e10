//! Structured error taxonomy for the solver (§7).
//!
//! Each stage of a solve raises its own variant rather than a bare string, so callers can
//! match on failure class (a `PreInfeasible` result is actionable differently from an
//! `Internal` one). [`SolveError`] is the single type the solver's public entry point returns.

use thiserror::Error;

use crate::diagnostics::DiagnosticReport;

/// Input shape or invariant violation, raised by `FixedPathInputs::validate` before a solve
/// begins.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("validation error: {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A leg's ground speed is non-positive; raised by `crate::energy::leg_energy_and_time`.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error(
        "ground speed is non-positive: vessel_speed={vessel_speed_kmh} current={current_kmh}"
    )]
    NonPositiveGroundSpeed {
        vessel_speed_kmh: f64,
        current_kmh: f64,
    },
}

/// The energy-balance pre-check of §4.8 fails before the DP pass begins.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "pre-run infeasibility: total leg energy {total_leg_energy_kwh:.1} kWh + final SoC \
     requirement {final_soc_min_kwh:.1} kWh exceeds initial SoC {initial_soc_kwh:.1} kWh plus \
     {total_station_energy_kwh:.1} kWh of reachable station energy (deficit \
     {deficit_kwh:.1} kWh); {note}"
)]
pub struct PreInfeasibilityError {
    pub total_leg_energy_kwh: f64,
    pub final_soc_min_kwh: f64,
    pub initial_soc_kwh: f64,
    pub total_station_energy_kwh: f64,
    pub deficit_kwh: f64,
    pub note: String,
}

/// The DP pass completes but no terminal state meets the final-SoC requirement.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("no feasible solution found for final SoC requirement\n\n{report}")]
pub struct InfeasibilityError {
    pub report: DiagnosticReport,
}

/// A back-pointer is missing during reconstruction, or inventory decoding fails. Indicates a
/// bug in this crate, not a user error.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("internal error: {0}")]
pub struct InternalError(pub String);

/// Top-level error returned by the solver's public entry point (§6, §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    PreInfeasible(#[from] PreInfeasibilityError),
    #[error(transparent)]
    Infeasible(#[from] InfeasibilityError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}
