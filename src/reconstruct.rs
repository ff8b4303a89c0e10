//! Terminal-state selection and back-pointer trajectory reconstruction (§4.6).
//!
//! Given a completed DP pass, picks the best terminal state meeting the final-SoC requirement
//! and walks the back-pointer chain from there to the start, producing one [`StepResult`] per
//! visited port. Container-inventory fields on the returned steps are placeholders; the forward
//! re-simulation pass in `crate::simulate` fills them in.

use tracing::info;

use crate::dp::{improves, BackPointer, DpResult, StateKey, TERMINAL_STAGE};
use crate::error::InternalError;
use crate::types::{Port, StepResult};

/// A selected terminal state together with its cost and time.
#[derive(Debug, Clone)]
pub struct TerminalChoice {
    pub level: i32,
    pub cost: f64,
    pub time_hr: f64,
}

/// Scans `dp.terminal` for the lowest-cost (then lowest-time) state whose SoC is at least
/// `final_soc_min_kwh`. Returns `None` if no terminal state meets the requirement.
pub fn select_terminal_state(
    dp: &DpResult,
    soc_step_kwh: f64,
    final_soc_min_kwh: f64,
) -> Option<TerminalChoice> {
    let min_level = (final_soc_min_kwh / soc_step_kwh).ceil() as i32;
    let mut best: Option<(StateKey, f64, f64)> = None;

    for (key, (cost, time_hr)) in dp.terminal.iter() {
        if key.0 < min_level {
            continue;
        }
        let accept = match &best {
            None => true,
            Some((_, best_cost, best_time)) => improves(*cost, *time_hr, *best_cost, *best_time),
        };
        if accept {
            best = Some((key.clone(), *cost, *time_hr));
        }
    }

    best.map(|(key, cost, time_hr)| TerminalChoice { level: key.0, cost, time_hr })
}

/// Walks back-pointers from the chosen terminal state to the route's start, producing one
/// [`StepResult`] per port in travel order.
pub fn reconstruct_path(
    dp: &DpResult,
    terminal: &TerminalChoice,
    ports: &[Port],
    soc_step_kwh: f64,
) -> Result<Vec<StepResult>, InternalError> {
    let n_ports = ports.len();

    // Recover the terminal state's inventory key: the unique entry in `dp.terminal` with this
    // (level, cost, time) triple.
    let terminal_key = dp
        .terminal
        .iter()
        .find(|(key, (cost, time_hr))| {
            key.0 == terminal.level
                && (*cost - terminal.cost).abs() <= 1e-9
                && (*time_hr - terminal.time_hr).abs() <= 1e-9
        })
        .map(|(key, _)| key.clone())
        .ok_or_else(|| InternalError("terminal state vanished from dp.terminal".to_string()))?;

    let mut stage = TERMINAL_STAGE;
    let mut key = terminal_key;
    let mut chain: Vec<(usize, StateKey, BackPointer)> = Vec::with_capacity(n_ports);

    loop {
        let bp = dp
            .back_pointers
            .get(&(stage, key.clone()))
            .ok_or_else(|| InternalError(format!("missing back pointer at stage {stage}")))?
            .clone();
        let next_stage = if stage == TERMINAL_STAGE { n_ports - 1 } else { stage - 1 };
        let next_key = (bp.prev_level, bp.prev_inventory.clone());
        chain.push((stage, key, bp));
        if next_stage == 0 {
            break;
        }
        stage = next_stage;
        key = next_key;
    }

    chain.reverse();

    let mut steps = Vec::with_capacity(chain.len());
    let mut cumulative_cost = 0.0;
    let mut cumulative_time = 0.0;
    for (stage, _key, bp) in &chain {
        let port_idx = if *stage == TERMINAL_STAGE { n_ports - 1 } else { stage - 1 };
        let port = &ports[port_idx];
        let candidate = &bp.transition.candidate;

        cumulative_cost += bp.transition.incremental_cost;
        cumulative_time += bp.transition.incremental_time_hr;

        let soc_before = super::dp::level_to_soc(bp.prev_level, soc_step_kwh);
        let soc_after_operation = candidate.post_operation_soc_kwh;
        let soc_after_segment = soc_after_operation - bp.transition.leg_energy_kwh;

        let segment_label = if port_idx + 1 < n_ports {
            format!("{}->{}", port.name, ports[port_idx + 1].name)
        } else {
            format!("{} (terminus)", port.name)
        };

        steps.push(StepResult {
            port_name: port.name.clone(),
            operation_kind: candidate.kind,
            containers_swapped: candidate.containers_swapped,
            energy_charged_kwh: candidate.energy_charged_kwh,
            segment_label,
            arrival_time_hr: cumulative_time - bp.transition.incremental_time_hr,
            departure_time_hr: cumulative_time - bp.transition.leg_travel_time_hr,
            berth_hr: candidate.berth_hr,
            soc_before_kwh: soc_before,
            soc_after_operation_kwh: soc_after_operation,
            soc_after_segment_kwh: soc_after_segment,
            energy_used_kwh: bp.transition.leg_energy_kwh,
            travel_time_hr: bp.transition.leg_travel_time_hr,
            incremental_cost: bp.transition.incremental_cost,
            cumulative_cost,
            incremental_time_hr: bp.transition.incremental_time_hr,
            cumulative_time_hr: cumulative_time,
            hotelling_energy_kwh: candidate.hotelling_energy_kwh,
            hotelling_power_kw: if candidate.berth_hr > 0.0 {
                candidate.hotelling_energy_kwh / candidate.berth_hr
            } else {
                0.0
            },
            precharge_energy_kwh: candidate.precharge_energy_kwh,
            station_charged_before: None,
            station_charged_after: None,
            station_total_before: None,
            station_total_after: None,
            containers_precharged: 0,
            station_events: Vec::new(),
        });
    }

    info!(steps = steps.len(), cost = cumulative_cost, time_hr = cumulative_time, "reconstructed trajectory");
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dp::{run_dp, DpConfig, DpInputs};
    use crate::types::{Leg, LegOption, VesselSpecs, VesselType};

    fn simple_route() -> (Vec<Port>, Vec<Leg>) {
        let a = Port::pass_through("A");
        let mut b = Port::pass_through("B");
        b.mandatory_stop = true;
        b.allow_swap = true;
        b.total_containers = Some(4);
        b.base_service_fee = 15.0;
        b.energy_cost_per_kwh = 0.25;

        let leg = Leg {
            start: "A".into(),
            end: "B".into(),
            options: vec![LegOption {
                label: "direct".into(),
                travel_time_hr: 8.0,
                energy_kwh: 9800.0,
                extra_cost: 0.0,
            }],
        };
        (vec![a, b], vec![leg])
    }

    #[test]
    fn selects_and_reconstructs_a_two_port_route() {
        let (ports, legs) = simple_route();
        let config = DpConfig {
            soc_step_kwh: 100.0,
            time_quant_hr: 0.25,
            start_time_hr: 0.0,
            capacity_kwh: 12000.0,
            per_container_kwh: 3000.0,
            min_operating_soc_kwh: 0.0,
            vessel_charge_accept_kw: 1000.0,
            vessel: VesselSpecs { vessel_type: VesselType::Container, gross_tonnage: 20000.0 },
            hotelling_override: None,
        };
        let inputs = DpInputs {
            ports: &ports,
            legs: &legs,
            initial_soc_kwh: 12000.0,
            initial_inventories: &[(0, None), (4, Some(4))],
            config: &config,
        };
        let dp_result = run_dp(&inputs).unwrap();
        let terminal = select_terminal_state(&dp_result, 100.0, 2000.0).expect("feasible terminal");
        let steps = reconstruct_path(&dp_result, &terminal, &ports, 100.0).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].port_name, "A");
        assert_eq!(steps[1].port_name, "B");
    }
}
