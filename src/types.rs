//! Core data model: ports, legs, vessel specs, DP state encoding, and step records.

use std::fmt;

/// Sentinel used for "never visited" in a port's quantized last-visit slot, and for
/// "unlimited stock" in a port's total container count.
pub const UNLIMITED: i32 = -1;

/// Vessel type tag driving the hotelling-power lookup (`crate::hotelling`).
///
/// `BulkCarrier`, `RoRo`, and `GeneralCargo` are accepted as configuration aliases for
/// `CargoGeneral`, matching the reference cold-ironing table's treatment of those classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VesselType {
    Container,
    AutoCarrier,
    Cruise,
    ChemicalTanker,
    CargoGeneral,
    CrudeOilTanker,
    Ferry,
    OffshoreSupply,
    Service,
    Other,
}

/// Static vessel characteristics that drive the hotelling model.
#[derive(Debug, Clone, Copy)]
pub struct VesselSpecs {
    pub vessel_type: VesselType,
    pub gross_tonnage: f64,
}

/// Travel mode for a leg; selects the speed and base-consumption constants used by
/// `crate::energy::leg_energy_and_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Laden,
    Unladen,
}

/// One alternative way of traversing a leg (§9 Open Question: the slot for future
/// speed/route variants; current configurations populate exactly one).
#[derive(Debug, Clone)]
pub struct LegOption {
    pub label: String,
    pub travel_time_hr: f64,
    pub energy_kwh: f64,
    pub extra_cost: f64,
}

/// A directed connection between two consecutive ports in the route.
#[derive(Debug, Clone)]
pub struct Leg {
    pub start: String,
    pub end: String,
    pub options: Vec<LegOption>,
}

/// Static per-port configuration (§3 Port).
#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    /// Hours the vessel is required to berth, applied whenever the stop is mandatory.
    pub docking_time_hr: f64,
    /// Hours a swap-only stop takes when the port is not a mandatory stop.
    pub swap_time_hr: f64,
    /// Whether the vessel must stop here regardless of whether it needs an operation.
    pub mandatory_stop: bool,
    pub allow_swap: bool,
    pub allow_charge: bool,
    pub partial_swap_allowed: bool,
    /// Ready (swap-eligible) containers available at the start of the run.
    pub initial_ready_containers: u32,
    /// Total container stock, or `None` for an unbounded ("unlimited") port.
    pub total_containers: Option<u32>,
    pub charging_power_kw: f64,
    pub charging_efficiency: f64,
    pub background_charging_allowed: bool,
    pub background_charging_power_kw: f64,
    pub energy_cost_per_kwh: f64,
    pub base_service_fee: f64,
    pub per_container_swap_surcharge: f64,
    pub degradation_fee_per_kwh: f64,
    pub base_charging_fee: f64,
    /// Fraction of per-container capacity above which a container counts as "ready".
    pub min_swap_soc: f64,
    pub max_docking_time_hr: Option<f64>,
    pub operating_hours: Option<(f64, f64)>,
}

impl Port {
    /// A port with no special capability: not a mandatory stop, no swap, no charge.
    /// Used for origin/terminus placeholders in tests and presets.
    pub fn pass_through(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docking_time_hr: 0.0,
            swap_time_hr: 0.0,
            mandatory_stop: false,
            allow_swap: false,
            allow_charge: false,
            partial_swap_allowed: false,
            initial_ready_containers: 0,
            total_containers: Some(0),
            charging_power_kw: 0.0,
            charging_efficiency: 1.0,
            background_charging_allowed: false,
            background_charging_power_kw: 0.0,
            energy_cost_per_kwh: 0.0,
            base_service_fee: 0.0,
            per_container_swap_surcharge: 0.0,
            degradation_fee_per_kwh: 0.0,
            base_charging_fee: 0.0,
            min_swap_soc: 1.0,
            max_docking_time_hr: None,
            operating_hours: None,
        }
    }
}

/// Operation kind taken at a port, as recorded on a transition or reported step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    None,
    Swap,
    Charge,
    Hybrid,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::None => "none",
            OperationKind::Swap => "swap",
            OperationKind::Charge => "charge",
            OperationKind::Hybrid => "hybrid",
        };
        write!(f, "{s}")
    }
}

/// A candidate operation emitted by `crate::candidates::candidate_operations` (§4.4).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub kind: OperationKind,
    pub post_operation_soc_kwh: f64,
    pub cost: f64,
    pub berth_hr: f64,
    pub containers_swapped: u32,
    pub energy_charged_kwh: f64,
    pub hotelling_energy_kwh: f64,
    pub precharge_energy_kwh: f64,
}

/// Back-pointer contents recorded for a DP-state transition (§3 Transition).
#[derive(Debug, Clone)]
pub struct Transition {
    pub prev_level: i32,
    pub prev_inventory: Vec<i32>,
    pub candidate: Candidate,
    pub leg_option_index: usize,
    pub leg_energy_kwh: f64,
    pub leg_travel_time_hr: f64,
    pub leg_extra_cost: f64,
    pub incremental_cost: f64,
    pub incremental_time_hr: f64,
}

/// One event in a port's inventory timeline (§4.7).
#[derive(Debug, Clone)]
pub struct StationEvent {
    pub time_hr: f64,
    pub kind: StationEventKind,
}

#[derive(Debug, Clone)]
pub enum StationEventKind {
    Arrival { charged_before: Option<u32>, total_before: Option<u32> },
    BackgroundPrecharge { added: u32 },
    PrechargeDuringStop { added: u32 },
    Swap { containers: u32 },
}

impl fmt::Display for StationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StationEventKind::Arrival { charged_before, total_before } => write!(
                f,
                "t={:.2}h arrival charged_before={:?} total_before={:?}",
                self.time_hr, charged_before, total_before
            ),
            StationEventKind::BackgroundPrecharge { added } => {
                write!(f, "t={:.2}h background_precharge added={added}", self.time_hr)
            }
            StationEventKind::PrechargeDuringStop { added } => {
                write!(f, "t={:.2}h precharge_during_stop added={added}", self.time_hr)
            }
            StationEventKind::Swap { containers } => {
                write!(f, "t={:.2}h swap containers={containers}", self.time_hr)
            }
        }
    }
}

/// Complete record of one visited port along the chosen trajectory (§4.6, enriched by §4.7).
#[derive(Debug, Clone)]
pub struct StepResult {
    pub port_name: String,
    pub operation_kind: OperationKind,
    pub containers_swapped: u32,
    pub energy_charged_kwh: f64,
    pub segment_label: String,
    pub arrival_time_hr: f64,
    pub departure_time_hr: f64,
    pub berth_hr: f64,
    pub soc_before_kwh: f64,
    pub soc_after_operation_kwh: f64,
    pub soc_after_segment_kwh: f64,
    pub energy_used_kwh: f64,
    pub travel_time_hr: f64,
    pub incremental_cost: f64,
    pub cumulative_cost: f64,
    pub incremental_time_hr: f64,
    pub cumulative_time_hr: f64,
    pub hotelling_energy_kwh: f64,
    pub hotelling_power_kw: f64,
    pub precharge_energy_kwh: f64,
    pub station_charged_before: Option<u32>,
    pub station_charged_after: Option<u32>,
    pub station_total_before: Option<u32>,
    pub station_total_after: Option<u32>,
    pub containers_precharged: u32,
    pub station_events: Vec<StationEvent>,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {:.2}h->{:.2}h [{}] swap={} charge={:.1}kWh | SoC {:.1}->{:.1}->{:.1} kWh | \
             cost={:.2} (cum {:.2}) time+={:.2}h (cum {:.2}h)",
            self.port_name,
            self.arrival_time_hr,
            self.departure_time_hr,
            self.operation_kind,
            self.containers_swapped,
            self.energy_charged_kwh,
            self.soc_before_kwh,
            self.soc_after_operation_kwh,
            self.soc_after_segment_kwh,
            self.incremental_cost,
            self.cumulative_cost,
            self.incremental_time_hr,
            self.cumulative_time_hr,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_port_has_no_capability() {
        let p = Port::pass_through("A");
        assert!(!p.mandatory_stop);
        assert!(!p.allow_swap);
        assert!(!p.allow_charge);
    }

    #[test]
    fn operation_kind_display() {
        assert_eq!(OperationKind::Swap.to_string(), "swap");
        assert_eq!(OperationKind::Hybrid.to_string(), "hybrid");
    }

    #[test]
    fn step_result_display_does_not_panic() {
        let step = StepResult {
            port_name: "B".into(),
            operation_kind: OperationKind::Swap,
            containers_swapped: 4,
            energy_charged_kwh: 0.0,
            segment_label: "A->B".into(),
            arrival_time_hr: 8.0,
            departure_time_hr: 10.0,
            berth_hr: 2.0,
            soc_before_kwh: 2200.0,
            soc_after_operation_kwh: 12000.0,
            soc_after_segment_kwh: 2200.0,
            energy_used_kwh: 9800.0,
            travel_time_hr: 8.0,
            incremental_cost: 3060.0,
            cumulative_cost: 3060.0,
            incremental_time_hr: 10.0,
            cumulative_time_hr: 10.0,
            hotelling_energy_kwh: 0.0,
            hotelling_power_kw: 0.0,
            precharge_energy_kwh: 0.0,
            station_charged_before: Some(4),
            station_charged_after: Some(0),
            station_total_before: Some(4),
            station_total_after: Some(4),
            containers_precharged: 0,
            station_events: vec![],
        };
        let s = format!("{step}");
        assert!(!s.is_empty());
    }
}
