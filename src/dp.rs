//! Forward dynamic-programming pass (§4.5).
//!
//! Walks the route leg by leg, keeping one hash map of reachable `(SoC level, inventory
//! encoding)` states per port together with their best-known `(cost, time)` and a back-pointer
//! table for reconstruction. States are sparse: only combinations actually reached by some
//! candidate operation ever appear as map keys.

use std::collections::HashMap;

use tracing::debug;

use crate::candidates::{candidate_operations, CandidateContext};
use crate::error::{InternalError, SolveError};
use crate::hotelling::{hotelling_power_kw_with_override, GtRange};
use crate::inventory::PortInventory;
use crate::types::{Leg, Port, Transition, UNLIMITED, VesselSpecs};

/// DP state-space and candidate-generation parameters that do not vary per port.
pub struct DpConfig {
    pub soc_step_kwh: f64,
    pub time_quant_hr: f64,
    pub start_time_hr: f64,
    pub capacity_kwh: f64,
    pub per_container_kwh: f64,
    pub min_operating_soc_kwh: f64,
    pub vessel_charge_accept_kw: f64,
    pub vessel: VesselSpecs,
    pub hotelling_override: Option<Vec<GtRange>>,
}

/// The full fixed-path route and its per-leg travel options.
pub struct DpInputs<'a> {
    pub ports: &'a [Port],
    /// `legs.len() == ports.len() - 1`.
    pub legs: &'a [Leg],
    pub initial_soc_kwh: f64,
    /// `(ready_containers, total_containers)` at the start of the run, one per port.
    pub initial_inventories: &'a [(u32, Option<u32>)],
    pub config: &'a DpConfig,
}

/// Inventory encoding: `[charged_0, lastq_0, charged_1, lastq_1, ...]`. A port whose
/// `total_containers` is `None` stores [`UNLIMITED`] in its `charged` slot and is never
/// simulated for ready-container promotion.
pub type InventoryKey = Vec<i32>;

/// `(SoC level, inventory encoding)` — the DP state key at one port.
pub type StateKey = (i32, InventoryKey);

/// `(cumulative cost, cumulative time in hours)`.
pub type StateValue = (f64, f64);

#[derive(Debug, Clone)]
pub struct BackPointer {
    pub prev_level: i32,
    pub prev_inventory: InventoryKey,
    pub transition: Transition,
}

/// Marks a back-pointer for a post-operation terminal state (no leg follows the last port).
pub const TERMINAL_STAGE: usize = usize::MAX;

pub struct DpResult {
    /// One reachable-state map per port, indexed by arrival order (`dp[0]` is the start state).
    pub dp: Vec<HashMap<StateKey, StateValue>>,
    /// Post-operation states at the final port, which have no leg ahead of them.
    pub terminal: HashMap<StateKey, StateValue>,
    /// Keyed by `(stage, level, inventory)` where `stage` is the port index the state was
    /// produced *at* (i.e. the destination of a leg, or [`TERMINAL_STAGE`] for `terminal`).
    pub back_pointers: HashMap<(usize, StateKey), BackPointer>,
}

pub fn soc_to_level(soc_kwh: f64, step_kwh: f64) -> i32 {
    (soc_kwh / step_kwh).round() as i32
}

pub fn level_to_soc(level: i32, step_kwh: f64) -> f64 {
    level as f64 * step_kwh
}

fn quantize_time(time_hr: f64, quant_hr: f64) -> i32 {
    (time_hr / quant_hr).round() as i32
}

fn dequantize_time(q: i32, quant_hr: f64) -> f64 {
    q as f64 * quant_hr
}

/// Dominance predicate: does `(new_cost, new_time)` strictly improve on `(old_cost, old_time)`?
/// Lexicographic on cost then time, with a `1e-9` tolerance for floating-point noise.
pub fn improves(new_cost: f64, new_time: f64, old_cost: f64, old_time: f64) -> bool {
    if !old_cost.is_finite() {
        return true;
    }
    if new_cost < old_cost - 1e-9 {
        return true;
    }
    if (new_cost - old_cost).abs() <= 1e-9 && new_time < old_time - 1e-9 {
        return true;
    }
    false
}

fn decode_slot(inv: &[i32], port_idx: usize) -> (Option<u32>, Option<i32>) {
    let charged_raw = inv[2 * port_idx];
    let lastq_raw = inv[2 * port_idx + 1];
    let charged = if charged_raw == UNLIMITED {
        None
    } else {
        Some(charged_raw as u32)
    };
    let lastq = if lastq_raw == UNLIMITED {
        None
    } else {
        Some(lastq_raw)
    };
    (charged, lastq)
}

fn encode_slot(inv: &mut [i32], port_idx: usize, charged: Option<u32>, lastq_q: i32) {
    inv[2 * port_idx] = charged.map(|c| c as i32).unwrap_or(UNLIMITED);
    inv[2 * port_idx + 1] = lastq_q;
}

/// Runs the forward DP pass over the whole route, returning every reachable state and the
/// back-pointer table needed to reconstruct the optimal trajectory (§4.5).
///
/// Route positions and distinct ports are not the same thing: a route may revisit a port
/// name (§3), in which case every occurrence shares one inventory slot in the state
/// encoding, keyed by `port.name` rather than by position in `inputs.ports`. `distinct_idx`
/// below maps each route position to that shared slot, in first-occurrence order.
pub fn run_dp(inputs: &DpInputs) -> Result<DpResult, SolveError> {
    let n_ports = inputs.ports.len();
    if n_ports == 0 {
        return Err(InternalError("route has no ports".to_string()).into());
    }
    if inputs.legs.len() != n_ports - 1 {
        return Err(InternalError(format!(
            "expected {} legs for {} ports, got {}",
            n_ports - 1,
            n_ports,
            inputs.legs.len()
        ))
        .into());
    }
    if inputs.initial_inventories.len() != n_ports {
        return Err(InternalError("initial_inventories length must match ports".to_string()).into());
    }

    let cfg = inputs.config;
    let hotelling_kw = hotelling_power_kw_with_override(
        cfg.vessel.vessel_type,
        cfg.vessel.gross_tonnage,
        cfg.hotelling_override.as_deref(),
    );

    let mut name_to_distinct: HashMap<&str, usize> = HashMap::new();
    let mut distinct_idx = Vec::with_capacity(n_ports);
    for port in inputs.ports {
        let next_idx = name_to_distinct.len();
        let idx = *name_to_distinct.entry(port.name.as_str()).or_insert(next_idx);
        distinct_idx.push(idx);
    }
    let n_distinct = name_to_distinct.len();

    let mut dp: Vec<HashMap<StateKey, StateValue>> = (0..n_ports).map(|_| HashMap::new()).collect();
    let mut back_pointers: HashMap<(usize, StateKey), BackPointer> = HashMap::new();
    let mut terminal: HashMap<StateKey, StateValue> = HashMap::new();

    let mut start_inventory = vec![0i32; 2 * n_distinct];
    let mut seen = vec![false; n_distinct];
    for (port_idx, (charged, total)) in inputs.initial_inventories.iter().enumerate() {
        let slot = distinct_idx[port_idx];
        if seen[slot] {
            continue;
        }
        seen[slot] = true;
        let charged_opt = if total.is_none() { None } else { Some(*charged) };
        encode_slot(&mut start_inventory, slot, charged_opt, UNLIMITED);
    }
    let start_level = soc_to_level(inputs.initial_soc_kwh, cfg.soc_step_kwh);
    dp[0].insert((start_level, start_inventory), (0.0, cfg.start_time_hr));

    for port_idx in 0..n_ports {
        let port = &inputs.ports[port_idx];
        let slot = distinct_idx[port_idx];
        let has_leg_ahead = port_idx + 1 < n_ports;
        let states: Vec<(StateKey, StateValue)> = dp[port_idx].iter().map(|(k, v)| (k.clone(), *v)).collect();
        debug!(port = %port.name, reachable_states = states.len(), "processing port");

        for ((level, inventory), (cost, time_hr)) in states {
            let arrival_soc = level_to_soc(level, cfg.soc_step_kwh);
            let (charged_opt, lastq_opt) = decode_slot(&inventory, slot);

            let (ready_available, port_state) = match (charged_opt, port.total_containers) {
                (None, _) | (_, None) => (u32::MAX, None),
                (Some(charged), Some(total)) => {
                    let mut state = PortInventory::new(cfg.per_container_kwh, charged, Some(total));
                    // A sentinel lastq (never visited) means no elapsed dwell to charge over,
                    // not an implicit visit at start_time (§4.5 step 2).
                    if let Some(lastq) = lastq_opt {
                        let last_time = dequantize_time(lastq, cfg.time_quant_hr);
                        let elapsed_hr = (time_hr - last_time).max(0.0);
                        if port.background_charging_allowed && elapsed_hr > 0.0 {
                            state.add_energy(
                                port.background_charging_power_kw * elapsed_hr,
                                port.charging_efficiency,
                                port.min_swap_soc,
                            );
                        }
                    }
                    (state.ready_count(), Some(state))
                }
            };

            let ctx = CandidateContext {
                port,
                arrival_soc_kwh: arrival_soc,
                capacity_kwh: cfg.capacity_kwh,
                per_container_kwh: cfg.per_container_kwh,
                vessel_charge_accept_kw: cfg.vessel_charge_accept_kw,
                hotelling_power_kw: hotelling_kw,
                ready_containers_available: ready_available,
            };
            let candidates = candidate_operations(&ctx);

            for candidate in candidates {
                if candidate.post_operation_soc_kwh < -1e-6 {
                    continue;
                }
                let post_soc = candidate.post_operation_soc_kwh.clamp(0.0, cfg.capacity_kwh);
                let op_time_hr = time_hr + candidate.berth_hr;
                let op_cost = cost + candidate.cost;

                let mut next_port_state = port_state.clone();
                if let Some(state) = next_port_state.as_mut() {
                    if candidate.containers_swapped > 0 {
                        state.remove_n_highest(candidate.containers_swapped);
                    }
                    if candidate.precharge_energy_kwh > 0.0 {
                        state.add_energy(candidate.precharge_energy_kwh, 1.0, port.min_swap_soc);
                    }
                }
                let new_charged = next_port_state.as_ref().map(|s| s.ready_count());
                let new_lastq_q = quantize_time(op_time_hr, cfg.time_quant_hr);

                let mut op_inventory = inventory.clone();
                encode_slot(&mut op_inventory, slot, new_charged, new_lastq_q);

                if !has_leg_ahead {
                    let key = (soc_to_level(post_soc, cfg.soc_step_kwh), op_inventory.clone());
                    let existing = terminal.get(&key).copied();
                    let should_insert = match existing {
                        None => true,
                        Some((old_cost, old_time)) => improves(op_cost, op_time_hr, old_cost, old_time),
                    };
                    if should_insert {
                        terminal.insert(key.clone(), (op_cost, op_time_hr));
                        back_pointers.insert(
                            (TERMINAL_STAGE, key),
                            BackPointer {
                                prev_level: level,
                                prev_inventory: inventory.clone(),
                                transition: Transition {
                                    prev_level: level,
                                    prev_inventory: inventory.clone(),
                                    candidate: candidate.clone(),
                                    leg_option_index: 0,
                                    leg_energy_kwh: 0.0,
                                    leg_travel_time_hr: 0.0,
                                    leg_extra_cost: 0.0,
                                    incremental_cost: candidate.cost,
                                    incremental_time_hr: candidate.berth_hr,
                                },
                            },
                        );
                    }
                    continue;
                }

                let leg = &inputs.legs[port_idx];
                for (opt_idx, option) in leg.options.iter().enumerate() {
                    let arrival_next_soc = post_soc - option.energy_kwh;
                    if arrival_next_soc < cfg.min_operating_soc_kwh - 1e-9 {
                        continue;
                    }
                    let arrival_next_soc = arrival_next_soc.clamp(0.0, cfg.capacity_kwh);
                    let next_level = soc_to_level(arrival_next_soc, cfg.soc_step_kwh);
                    let next_time = op_time_hr + option.travel_time_hr;
                    let next_cost = op_cost + option.extra_cost;

                    let key = (next_level, op_inventory.clone());
                    let existing = dp[port_idx + 1].get(&key).copied();
                    let should_insert = match existing {
                        None => true,
                        Some((old_cost, old_time)) => improves(next_cost, next_time, old_cost, old_time),
                    };
                    if should_insert {
                        dp[port_idx + 1].insert(key.clone(), (next_cost, next_time));
                        back_pointers.insert(
                            (port_idx + 1, key),
                            BackPointer {
                                prev_level: level,
                                prev_inventory: inventory.clone(),
                                transition: Transition {
                                    prev_level: level,
                                    prev_inventory: inventory.clone(),
                                    candidate: candidate.clone(),
                                    leg_option_index: opt_idx,
                                    leg_energy_kwh: option.energy_kwh,
                                    leg_travel_time_hr: option.travel_time_hr,
                                    leg_extra_cost: option.extra_cost,
                                    incremental_cost: candidate.cost + option.extra_cost,
                                    incremental_time_hr: candidate.berth_hr + option.travel_time_hr,
                                },
                            },
                        );
                    }
                }
            }
        }
    }

    Ok(DpResult { dp, terminal, back_pointers })
}

#[allow(dead_code)]
fn roundtrip_time(time_hr: f64, quant_hr: f64) -> f64 {
    dequantize_time(quantize_time(time_hr, quant_hr), quant_hr)
}
