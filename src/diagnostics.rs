//! Feasibility diagnostics (§4.8): a cheap pre-run energy-balance check, and a detailed report
//! produced when the DP pass completes but no terminal state meets the final-SoC requirement.
//!
//! Mirrors the structure of the original per-leg/per-station breakdown, with ASCII status tags
//! in place of any Unicode symbols (no emoji in diagnostic output, by design of this crate).

use std::fmt;

use crate::dp::{level_to_soc, DpResult};
use crate::error::PreInfeasibilityError;
use crate::types::Port;

/// Quick energy-balance check run before the DP pass starts: can the route possibly be
/// completed even under the most generous assumptions? A pass here is necessary, not
/// sufficient — the DP pass can still fail the full feasibility test.
pub fn pre_check(
    total_leg_energy_kwh: f64,
    final_soc_min_kwh: f64,
    initial_soc_kwh: f64,
    total_station_energy_kwh: f64,
) -> Result<(), PreInfeasibilityError> {
    let available = initial_soc_kwh + total_station_energy_kwh;
    let required = total_leg_energy_kwh + final_soc_min_kwh;
    if available + 1e-6 >= required {
        return Ok(());
    }
    Err(PreInfeasibilityError {
        total_leg_energy_kwh,
        final_soc_min_kwh,
        initial_soc_kwh,
        total_station_energy_kwh,
        deficit_kwh: required - available,
        note: "no combination of swaps and charging sessions can supply this much energy \
               along the route as configured"
            .to_string(),
    })
}

/// One port's reachability summary for the diagnostic report.
#[derive(Debug, Clone, PartialEq)]
pub struct LegBottleneck {
    pub port_name: String,
    pub reachable_states: usize,
}

/// Full post-DP infeasibility report (§4.8).
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    pub reachable_terminal_states: usize,
    pub best_achievable_soc_kwh: Option<f64>,
    pub required_final_soc_kwh: f64,
    pub per_port_reachability: Vec<LegBottleneck>,
    pub suggested_actions: Vec<String>,
}

impl DiagnosticReport {
    pub fn build(
        dp: &DpResult,
        ports: &[Port],
        soc_step_kwh: f64,
        final_soc_min_kwh: f64,
    ) -> Self {
        let reachable_terminal_states = dp.terminal.len();
        let best_achievable_soc_kwh = dp
            .terminal
            .keys()
            .map(|(level, _inv)| level_to_soc(*level, soc_step_kwh))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        let per_port_reachability: Vec<LegBottleneck> = ports
            .iter()
            .zip(dp.dp.iter())
            .map(|(port, states)| LegBottleneck {
                port_name: port.name.clone(),
                reachable_states: states.len(),
            })
            .collect();

        let mut suggested_actions = Vec::new();
        if reachable_terminal_states == 0 {
            suggested_actions.push(
                "no state survived to the final port at all; check that every mandatory stop \
                 is reachable with a non-negative SoC"
                    .to_string(),
            );
        }
        if let Some(best) = best_achievable_soc_kwh {
            if best < final_soc_min_kwh {
                suggested_actions.push(format!(
                    "best achievable final SoC is {best:.1} kWh, short of the required \
                     {final_soc_min_kwh:.1} kWh; consider enabling more swap/charge capability \
                     at ports near the end of the route"
                ));
            }
        }
        if let Some(empty_port) = per_port_reachability.iter().find(|p| p.reachable_states == 0) {
            suggested_actions.push(format!(
                "port {} has zero reachable states; a prior leg or operation is eliminating \
                 every path through it",
                empty_port.port_name
            ));
        }

        Self {
            reachable_terminal_states,
            best_achievable_soc_kwh,
            required_final_soc_kwh: final_soc_min_kwh,
            per_port_reachability,
            suggested_actions,
        }
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Feasibility diagnostic report")?;
        writeln!(f, "-----------------------------")?;
        let terminal_tag = if self.reachable_terminal_states > 0 { "[OK]" } else { "[FAIL]" };
        writeln!(f, "{terminal_tag} reachable terminal states: {}", self.reachable_terminal_states)?;

        match self.best_achievable_soc_kwh {
            Some(best) if best >= self.required_final_soc_kwh => {
                writeln!(
                    f,
                    "[OK] best achievable final SoC {:.1} kWh meets requirement {:.1} kWh",
                    best, self.required_final_soc_kwh
                )?;
            }
            Some(best) => {
                writeln!(
                    f,
                    "[FAIL] best achievable final SoC {:.1} kWh is below requirement {:.1} kWh",
                    best, self.required_final_soc_kwh
                )?;
            }
            None => {
                writeln!(f, "[FAIL] no terminal SoC was achievable at all")?;
            }
        }

        writeln!(f, "\nPer-port reachable-state counts:")?;
        for entry in &self.per_port_reachability {
            let tag = if entry.reachable_states > 0 { "[OK]" } else { "[FAIL]" };
            writeln!(f, "  {tag} {} -> {} states", entry.port_name, entry.reachable_states)?;
        }

        if !self.suggested_actions.is_empty() {
            writeln!(f, "\nSuggested actions:")?;
            for (i, action) in self.suggested_actions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, action)?;
            }
        }

        Ok(())
    }
}
