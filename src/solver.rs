//! Solver entry point (§6): validates inputs, runs the pre-run feasibility check, executes the
//! DP pass, selects the terminal state, and reconstructs + re-simulates the winning trajectory.
//!
//! One struct owns construction of every stage; `solve()` wires them together and returns a
//! single result, in the spirit of the teacher's scenario-runner: build everything, then run it
//! as one pipeline.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::diagnostics::{pre_check, DiagnosticReport};
use crate::dp::{run_dp, DpConfig, DpInputs};
use crate::error::{InfeasibilityError, SolveError, ValidationError};
use crate::hotelling::GtRange;
use crate::reconstruct::{reconstruct_path, select_terminal_state};
use crate::simulate::simulate_inventories;
use crate::types::{Leg, Port, StationEvent, StepResult, VesselSpecs};

/// Everything a fixed-path solve needs: the route, the vessel, and the discretization and
/// feasibility parameters for the DP pass (§3, §5).
pub struct FixedPathInputs {
    pub ports: Vec<Port>,
    /// `legs.len()` must equal `ports.len() - 1`.
    pub legs: Vec<Leg>,
    pub vessel: VesselSpecs,
    pub capacity_kwh: f64,
    pub per_container_kwh: f64,
    pub vessel_charge_accept_kw: f64,
    pub initial_soc_kwh: f64,
    /// `(ready_containers, total_containers)` per port, same order as `ports`.
    pub initial_inventories: Vec<(u32, Option<u32>)>,
    pub min_operating_soc_kwh: f64,
    pub final_soc_min_kwh: f64,
    pub soc_step_kwh: f64,
    pub time_quant_hr: f64,
    pub start_time_hr: f64,
    pub hotelling_override: Option<Vec<GtRange>>,
}

impl FixedPathInputs {
    /// Checks structural invariants before a solve begins (§7). Returns the first violation
    /// found; callers that want every violation should inspect the route/config layer's own
    /// `validate()` instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ports.len() < 2 {
            return Err(ValidationError::new("ports", "route must have at least an origin and a terminus"));
        }
        if self.legs.len() != self.ports.len() - 1 {
            return Err(ValidationError::new(
                "legs",
                format!("expected {} legs for {} ports, got {}", self.ports.len() - 1, self.ports.len(), self.legs.len()),
            ));
        }
        if self.initial_inventories.len() != self.ports.len() {
            return Err(ValidationError::new(
                "initial_inventories",
                "must have one entry per port",
            ));
        }
        if self.capacity_kwh <= 0.0 {
            return Err(ValidationError::new("capacity_kwh", "must be > 0"));
        }
        if self.per_container_kwh <= 0.0 {
            return Err(ValidationError::new("per_container_kwh", "must be > 0"));
        }
        if self.soc_step_kwh <= 0.0 {
            return Err(ValidationError::new("soc_step_kwh", "must be > 0"));
        }
        if self.time_quant_hr <= 0.0 {
            return Err(ValidationError::new("time_quant_hr", "must be > 0"));
        }
        if !(0.0..=self.capacity_kwh).contains(&self.initial_soc_kwh) {
            return Err(ValidationError::new(
                "initial_soc_kwh",
                format!("must be within [0, capacity_kwh={}]", self.capacity_kwh),
            ));
        }
        if self.final_soc_min_kwh > self.capacity_kwh {
            return Err(ValidationError::new(
                "final_soc_min_kwh",
                "cannot exceed battery capacity",
            ));
        }
        if self.min_operating_soc_kwh < 0.0 {
            return Err(ValidationError::new("min_operating_soc_kwh", "must be non-negative"));
        }
        if self.min_operating_soc_kwh > self.capacity_kwh {
            return Err(ValidationError::new("min_operating_soc_kwh", "cannot exceed battery capacity"));
        }
        if self.final_soc_min_kwh < self.min_operating_soc_kwh {
            return Err(ValidationError::new(
                "final_soc_min_kwh",
                "cannot be below min_operating_soc_kwh",
            ));
        }
        if self.initial_soc_kwh < self.min_operating_soc_kwh {
            return Err(ValidationError::new(
                "initial_soc_kwh",
                "cannot be below min_operating_soc_kwh",
            ));
        }
        if self.vessel_charge_accept_kw < 0.0 {
            return Err(ValidationError::new("vessel_charge_accept_kw", "must be non-negative"));
        }
        for leg in &self.legs {
            if leg.options.is_empty() {
                return Err(ValidationError::new("legs", format!("leg {}->{} has no travel options", leg.start, leg.end)));
            }
        }
        for (i, port) in self.ports.iter().enumerate() {
            if !(0.0..=1.0).contains(&port.charging_efficiency) {
                return Err(ValidationError::new(
                    format!("ports[{i}].charging_efficiency"),
                    "must be between 0 and 1",
                ));
            }
            let non_negative_fields: [(&str, f64); 10] = [
                ("docking_time_hr", port.docking_time_hr),
                ("swap_time_hr", port.swap_time_hr),
                ("charging_power_kw", port.charging_power_kw),
                ("background_charging_power_kw", port.background_charging_power_kw),
                ("energy_cost_per_kwh", port.energy_cost_per_kwh),
                ("base_service_fee", port.base_service_fee),
                ("per_container_swap_surcharge", port.per_container_swap_surcharge),
                ("degradation_fee_per_kwh", port.degradation_fee_per_kwh),
                ("base_charging_fee", port.base_charging_fee),
                ("min_swap_soc", port.min_swap_soc),
            ];
            for (field, value) in non_negative_fields {
                if value < 0.0 {
                    return Err(ValidationError::new(format!("ports[{i}].{field}"), "must be non-negative"));
                }
            }
            if let Some(total) = port.total_containers {
                if port.initial_ready_containers > total {
                    return Err(ValidationError::new(
                        format!("ports[{i}].initial_ready_containers"),
                        "cannot exceed total_containers",
                    ));
                }
            }
        }
        Ok(())
    }

    fn total_leg_energy_kwh(&self) -> f64 {
        self.legs
            .iter()
            .map(|leg| {
                leg.options
                    .iter()
                    .map(|o| o.energy_kwh)
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    /// Upper bound on the energy every port can plausibly contribute, used only by the
    /// cheap pre-run check (§4.8): `min(total_stock, ready + per-dwell precharge) *
    /// per_container`, summed over swap-capable ports. Unlimited ports contribute no bound
    /// (treated as unlimited).
    fn total_station_energy_kwh(&self) -> f64 {
        self.ports
            .iter()
            .zip(self.initial_inventories.iter())
            .map(|(port, &(ready, _))| {
                if !port.allow_swap {
                    return 0.0;
                }
                let Some(total_stock) = port.total_containers else {
                    return f64::INFINITY;
                };
                let precharge_containers = if port.allow_charge && port.charging_power_kw > 0.0 && port.docking_time_hr > 0.0 {
                    let energy_can_charge = port.docking_time_hr * port.charging_power_kw * port.charging_efficiency;
                    (energy_can_charge / self.per_container_kwh).floor() as u32
                } else {
                    0
                };
                let effective = total_stock.min(ready.saturating_add(precharge_containers));
                effective as f64 * self.per_container_kwh
            })
            .sum()
    }
}

/// Result of a successful fixed-path solve.
pub struct OptimizationResult {
    pub steps: Vec<StepResult>,
    pub total_cost: f64,
    /// Elapsed time from route start to the terminal state, in hours.
    pub total_time_hr: f64,
    /// Absolute clock time the vessel reaches the terminal state (`start_time_hr +
    /// total_time_hr`).
    pub finish_time_hr: f64,
    /// Per-port inventory event timeline (§4.7), keyed by port name. A port visited more than
    /// once accumulates all of its visits' events in chronological order.
    pub station_timelines: BTreeMap<String, Vec<StationEvent>>,
}

/// Owns a validated set of inputs and runs the full solve pipeline.
pub struct FixedPathOptimizer {
    inputs: FixedPathInputs,
}

impl FixedPathOptimizer {
    pub fn new(inputs: FixedPathInputs) -> Self {
        Self { inputs }
    }

    /// Runs the complete pipeline: validate, pre-check, DP pass, terminal selection,
    /// reconstruction, forward re-simulation (§4.5-§4.8).
    pub fn solve(&self) -> Result<OptimizationResult, SolveError> {
        self.inputs.validate()?;

        pre_check(
            self.inputs.total_leg_energy_kwh(),
            self.inputs.final_soc_min_kwh,
            self.inputs.initial_soc_kwh,
            self.inputs.total_station_energy_kwh(),
        )?;

        let config = DpConfig {
            soc_step_kwh: self.inputs.soc_step_kwh,
            time_quant_hr: self.inputs.time_quant_hr,
            start_time_hr: self.inputs.start_time_hr,
            capacity_kwh: self.inputs.capacity_kwh,
            per_container_kwh: self.inputs.per_container_kwh,
            min_operating_soc_kwh: self.inputs.min_operating_soc_kwh,
            vessel_charge_accept_kw: self.inputs.vessel_charge_accept_kw,
            vessel: self.inputs.vessel,
            hotelling_override: self.inputs.hotelling_override.clone(),
        };
        let dp_inputs = DpInputs {
            ports: &self.inputs.ports,
            legs: &self.inputs.legs,
            initial_soc_kwh: self.inputs.initial_soc_kwh,
            initial_inventories: &self.inputs.initial_inventories,
            config: &config,
        };

        info!(ports = self.inputs.ports.len(), "starting DP pass");
        let dp_result = run_dp(&dp_inputs)?;

        let terminal = match select_terminal_state(&dp_result, self.inputs.soc_step_kwh, self.inputs.final_soc_min_kwh) {
            Some(t) => t,
            None => {
                warn!("no terminal state meets the final SoC requirement");
                let report = DiagnosticReport::build(
                    &dp_result,
                    &self.inputs.ports,
                    self.inputs.soc_step_kwh,
                    self.inputs.final_soc_min_kwh,
                );
                return Err(InfeasibilityError { report }.into());
            }
        };

        info!(cost = terminal.cost, time_hr = terminal.time_hr, "terminal state selected");

        let mut steps = reconstruct_path(&dp_result, &terminal, &self.inputs.ports, self.inputs.soc_step_kwh)?;
        simulate_inventories(&mut steps, &self.inputs.ports, self.inputs.per_container_kwh, &self.inputs.initial_inventories);

        let mut station_timelines: BTreeMap<String, Vec<StationEvent>> = BTreeMap::new();
        for step in &steps {
            if step.station_events.is_empty() {
                continue;
            }
            station_timelines
                .entry(step.port_name.clone())
                .or_default()
                .extend(step.station_events.iter().cloned());
        }

        let finish_time_hr = terminal.time_hr;
        let total_time_hr = finish_time_hr - self.inputs.start_time_hr;

        Ok(OptimizationResult {
            steps,
            total_cost: terminal.cost,
            total_time_hr,
            finish_time_hr,
            station_timelines,
        })
    }
}
