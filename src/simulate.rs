//! Forward inventory re-simulation pass (§4.7).
//!
//! The DP pass only tracks *ready-container counts* as part of the state key; it does not
//! produce a narratable event timeline. This pass replays the reconstructed trajectory through
//! fresh [`PortInventory`] state, one per *distinct port name*, and fills in the `station_*`
//! and `station_events` fields the DP step left blank.
//!
//! A route may revisit a port (§3): the second visit must see whatever the first visit left
//! behind, plus any background charging that accrued while the vessel was away. So inventory
//! state here is keyed by `port.name`, not by position in `steps`, and each port's "last
//! departure" time is tracked across visits to compute that elapsed background-charging
//! window.

use std::collections::HashMap;

use crate::inventory::{PortInventory, DEFAULT_DEPLETED_ARRIVAL_SOC};
use crate::types::{Port, StationEvent, StationEventKind, StepResult};

/// Replays container-inventory bookkeeping across the already-reconstructed `steps`, mutating
/// each step's `station_*` fields and `station_events` list in place.
///
/// `initial_inventories[i]` is `(ready_containers, total_containers)` for `ports[i]`, matching
/// what was fed into `crate::dp::run_dp`. `ports[i]`/`initial_inventories[i]` correspond
/// positionally to `steps[i]` (one step per route position, origin included); a name repeated
/// across positions shares one simulated inventory, seeded from its first occurrence.
pub fn simulate_inventories(
    steps: &mut [StepResult],
    ports: &[Port],
    per_container_kwh: f64,
    initial_inventories: &[(u32, Option<u32>)],
) {
    let mut stations: HashMap<&str, (PortInventory, f64)> = HashMap::new();

    for (idx, step) in steps.iter_mut().enumerate() {
        let port = &ports[idx];
        let (init_charged, total) = initial_inventories[idx];

        let Some(total_count) = total else {
            step.station_charged_before = None;
            step.station_charged_after = None;
            step.station_total_before = None;
            step.station_total_after = None;
            step.containers_precharged = 0;
            step.station_events = vec![StationEvent {
                time_hr: step.arrival_time_hr,
                kind: StationEventKind::Arrival { charged_before: None, total_before: None },
            }];
            continue;
        };

        let is_first_visit = !stations.contains_key(port.name.as_str());
        let (inv, last_departure_hr) = stations
            .entry(port.name.as_str())
            .or_insert_with(|| (PortInventory::new(per_container_kwh, init_charged, Some(total_count)), 0.0));

        let charged_before = inv.ready_count();
        let mut events = vec![StationEvent {
            time_hr: step.arrival_time_hr,
            kind: StationEventKind::Arrival {
                charged_before: Some(charged_before),
                total_before: Some(total_count),
            },
        }];

        // A first visit has no last-departure time to measure a dwell from (the sentinel), so
        // it accrues no background precharge; a revisit measures elapsed time from this
        // station's own last departure.
        let elapsed_hr = if is_first_visit {
            0.0
        } else {
            (step.arrival_time_hr - *last_departure_hr).max(0.0)
        };
        if port.background_charging_allowed && elapsed_hr > 0.0 {
            let before = inv.ready_count();
            inv.add_energy(
                port.background_charging_power_kw * elapsed_hr,
                port.charging_efficiency,
                port.min_swap_soc,
            );
            let added = inv.ready_count() - before;
            if added > 0 {
                events.push(StationEvent {
                    time_hr: step.arrival_time_hr,
                    kind: StationEventKind::BackgroundPrecharge { added },
                });
            }
        }

        if step.precharge_energy_kwh > 0.0 {
            let before = inv.ready_count();
            inv.add_energy(step.precharge_energy_kwh, 1.0, port.min_swap_soc);
            let added = inv.ready_count() - before;
            step.containers_precharged = added;
            if added > 0 {
                events.push(StationEvent {
                    time_hr: step.departure_time_hr,
                    kind: StationEventKind::PrechargeDuringStop { added },
                });
            }
        }

        if step.containers_swapped > 0 {
            inv.remove_n_highest(step.containers_swapped);
            events.push(StationEvent {
                time_hr: step.departure_time_hr,
                kind: StationEventKind::Swap { containers: step.containers_swapped },
            });
            inv.add_depleted(step.containers_swapped, DEFAULT_DEPLETED_ARRIVAL_SOC);
        }

        step.station_charged_before = Some(charged_before);
        step.station_charged_after = Some(inv.ready_count());
        step.station_total_before = Some(total_count);
        step.station_total_after = Some(total_count);
        step.station_events = events;
        *last_departure_hr = step.departure_time_hr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationKind;

    fn blank_step(port_name: &str, arrival: f64, departure: f64) -> StepResult {
        StepResult {
            port_name: port_name.into(),
            operation_kind: OperationKind::Swap,
            containers_swapped: 2,
            energy_charged_kwh: 0.0,
            segment_label: format!("{port_name}->next"),
            arrival_time_hr: arrival,
            departure_time_hr: departure,
            berth_hr: departure - arrival,
            soc_before_kwh: 2200.0,
            soc_after_operation_kwh: 8200.0,
            soc_after_segment_kwh: 8200.0,
            energy_used_kwh: 0.0,
            travel_time_hr: 0.0,
            incremental_cost: 0.0,
            cumulative_cost: 0.0,
            incremental_time_hr: 0.0,
            cumulative_time_hr: 0.0,
            hotelling_energy_kwh: 0.0,
            hotelling_power_kw: 0.0,
            precharge_energy_kwh: 0.0,
            station_charged_before: None,
            station_charged_after: None,
            station_total_before: None,
            station_total_after: None,
            containers_precharged: 0,
            station_events: Vec::new(),
        }
    }

    #[test]
    fn swap_decrements_ready_count_and_returns_depleted_containers() {
        let mut port = Port::pass_through("B");
        port.allow_swap = true;
        port.min_swap_soc = 1.0;
        let mut steps = vec![blank_step("B", 8.0, 10.0)];
        simulate_inventories(&mut steps, &[port], 3000.0, &[(4, Some(4))]);
        assert_eq!(steps[0].station_charged_before, Some(4));
        assert_eq!(steps[0].station_charged_after, Some(2));
        assert!(steps[0]
            .station_events
            .iter()
            .any(|e| matches!(e.kind, StationEventKind::Swap { containers: 2 })));
    }

    #[test]
    fn unlimited_port_reports_no_counts() {
        let port = Port::pass_through("A");
        let mut steps = vec![blank_step("A", 0.0, 0.0)];
        steps[0].containers_swapped = 0;
        simulate_inventories(&mut steps, &[port], 3000.0, &[(0, None)]);
        assert_eq!(steps[0].station_charged_before, None);
        assert_eq!(steps[0].station_total_after, None);
    }

    #[test]
    fn first_visit_accrues_no_background_precharge() {
        // A first visit has no last-departure time to measure a dwell from (the sentinel),
        // even though it arrives well after t=0.
        let mut port = Port::pass_through("C");
        port.background_charging_allowed = true;
        port.background_charging_power_kw = 2000.0;
        port.charging_efficiency = 1.0;
        port.min_swap_soc = 1.0;
        let mut step = blank_step("C", 32.0, 32.0);
        step.containers_swapped = 0;
        let mut steps = vec![step];
        simulate_inventories(&mut steps, &[port], 3000.0, &[(0, Some(4))]);
        assert_eq!(steps[0].station_charged_after, Some(0));
        assert!(!steps[0]
            .station_events
            .iter()
            .any(|e| matches!(e.kind, StationEventKind::BackgroundPrecharge { .. })));
    }

    #[test]
    fn revisit_background_precharge_since_last_departure_is_recorded() {
        let mut port = Port::pass_through("C");
        port.background_charging_allowed = true;
        port.background_charging_power_kw = 2000.0;
        port.charging_efficiency = 1.0;
        port.min_swap_soc = 1.0;

        let mut first = blank_step("C", 0.0, 0.0);
        first.containers_swapped = 0;
        let mut second = blank_step("C", 32.0, 32.0);
        second.containers_swapped = 0;
        let mut steps = vec![first, second];
        let ports = vec![port.clone(), port];
        simulate_inventories(&mut steps, &ports, 3000.0, &[(0, Some(4)), (0, Some(4))]);

        assert_eq!(steps[0].station_charged_after, Some(0));
        assert_eq!(steps[1].station_charged_after, Some(4));
        assert!(steps[1]
            .station_events
            .iter()
            .any(|e| matches!(e.kind, StationEventKind::BackgroundPrecharge { .. })));
    }
}
