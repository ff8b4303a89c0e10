//! Per-leg energy and travel-time model (§4.1).
//!
//! A pure function, deliberately free of any DP/optimizer state, so that the optimizer
//! and the feasibility diagnostics of `crate::diagnostics` can call it and get bit-for-bit
//! identical numbers.

use crate::error::DomainError;
use crate::types::LoadMode;

/// Computes (energy-kWh, travel-time-hr) for one leg.
///
/// Travel time is `distance / (vessel_speed + current)`; the flow multiplier is `1.2` for a
/// head current (`current < 0`), `0.8` for a tail current (`current > 0`), and `1.0` when the
/// current is slack. `mode` selects which speed/consumption pair applies.
///
/// # Errors
///
/// Returns [`DomainError::NonPositiveGroundSpeed`] when `vessel_speed + current <= 0`.
pub fn leg_energy_and_time(
    distance_nm: f64,
    current_kmh: f64,
    mode: LoadMode,
    laden_speed_kmh: f64,
    unladen_speed_kmh: f64,
    laden_consumption_per_nm: f64,
    unladen_consumption_per_nm: f64,
) -> Result<(f64, f64), DomainError> {
    let (vessel_speed_kmh, base_consumption_per_nm) = match mode {
        LoadMode::Laden => (laden_speed_kmh, laden_consumption_per_nm),
        LoadMode::Unladen => (unladen_speed_kmh, unladen_consumption_per_nm),
    };

    let ground_speed = vessel_speed_kmh + current_kmh;
    if ground_speed <= 0.0 {
        return Err(DomainError::NonPositiveGroundSpeed {
            vessel_speed_kmh,
            current_kmh,
        });
    }

    let travel_time_hr = distance_nm / ground_speed;

    let multiplier = if current_kmh < 0.0 {
        1.2
    } else if current_kmh > 0.0 {
        0.8
    } else {
        1.0
    };
    let energy_kwh = distance_nm * base_consumption_per_nm * multiplier;

    Ok((energy_kwh, travel_time_hr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_single_leg_matches_spec_scenario() {
        let (energy, time) =
            leg_energy_and_time(40.0, 0.0, LoadMode::Laden, 5.0, 5.0, 245.0, 245.0).unwrap();
        assert_eq!(energy, 9800.0);
        assert_eq!(time, 8.0);
    }

    #[test]
    fn head_current_increases_energy() {
        let (energy, _) =
            leg_energy_and_time(40.0, -1.0, LoadMode::Laden, 5.0, 5.0, 245.0, 245.0).unwrap();
        assert_eq!(energy, 40.0 * 245.0 * 1.2);
    }

    #[test]
    fn tail_current_decreases_energy() {
        let (energy, _) =
            leg_energy_and_time(40.0, 1.0, LoadMode::Laden, 5.0, 5.0, 245.0, 245.0).unwrap();
        assert_eq!(energy, 40.0 * 245.0 * 0.8);
    }

    #[test]
    fn zero_distance_with_positive_ground_speed_is_instant() {
        let (energy, time) =
            leg_energy_and_time(0.0, 1.0, LoadMode::Laden, 5.0, 5.0, 245.0, 245.0).unwrap();
        assert_eq!(energy, 0.0);
        assert_eq!(time, 0.0);
    }

    #[test]
    fn non_positive_ground_speed_is_a_domain_error() {
        let err =
            leg_energy_and_time(40.0, -10.0, LoadMode::Laden, 5.0, 5.0, 245.0, 245.0).unwrap_err();
        assert!(matches!(err, DomainError::NonPositiveGroundSpeed { .. }));
    }

    #[test]
    fn unladen_mode_selects_unladen_constants() {
        let (energy, time) =
            leg_energy_and_time(10.0, 0.0, LoadMode::Unladen, 5.0, 8.0, 245.0, 100.0).unwrap();
        assert_eq!(energy, 1000.0);
        assert_eq!(time, 10.0 / 8.0);
    }
}
