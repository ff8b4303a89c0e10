//! TOML-based route/vessel/solver configuration and named presets (§10.1).
//!
//! A [`RouteConfig`] is the on-disk shape; [`RouteConfig::to_fixed_path_inputs`] lowers it into
//! the `crate::solver::FixedPathInputs` the optimizer actually consumes, computing each leg's
//! energy and travel time via `crate::energy::leg_energy_and_time` along the way.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::energy::leg_energy_and_time;
use crate::hotelling::GtRange;
use crate::solver::FixedPathInputs;
use crate::types::{Leg, LegOption, LoadMode, Port, VesselSpecs, VesselType};

/// Top-level route configuration parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub vessel: VesselConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    pub ports: Vec<PortConfig>,
    pub legs: Vec<LegConfig>,
}

/// Static vessel characteristics and per-leg speed/consumption constants (§3 Vessel).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VesselConfig {
    /// One of: container, auto_carrier, bulk_carrier, ro_ro, general_cargo, cruise,
    /// chemical_tanker, tanker, cargo, crude_oil_tanker, ferry, offshore_supply, service,
    /// other. Aliases resolve the way the cold-ironing reference table does.
    pub vessel_type: String,
    pub gross_tonnage: f64,
    pub capacity_kwh: f64,
    pub per_container_kwh: f64,
    pub charge_accept_kw: f64,
    pub laden_speed_kmh: f64,
    pub unladen_speed_kmh: f64,
    pub laden_consumption_per_nm: f64,
    pub unladen_consumption_per_nm: f64,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            vessel_type: "container".to_string(),
            gross_tonnage: 20_000.0,
            capacity_kwh: 12_000.0,
            per_container_kwh: 3_000.0,
            charge_accept_kw: 1_000.0,
            laden_speed_kmh: 5.0,
            unladen_speed_kmh: 5.0,
            laden_consumption_per_nm: 245.0,
            unladen_consumption_per_nm: 245.0,
        }
    }
}

impl VesselConfig {
    fn resolve_vessel_type(&self) -> Result<VesselType, ConfigError> {
        parse_vessel_type(&self.vessel_type)
    }
}

fn parse_vessel_type(s: &str) -> Result<VesselType, ConfigError> {
    match s.to_lowercase().replace([' ', '-'], "_").as_str() {
        "container" | "container_vessels" => Ok(VesselType::Container),
        "auto_carrier" => Ok(VesselType::AutoCarrier),
        "cruise" | "cruise_ships" => Ok(VesselType::Cruise),
        "chemical_tanker" | "chemical_tankers" => Ok(VesselType::ChemicalTanker),
        "cargo" | "cargo_vessels" | "bulk_carrier" | "ro_ro" | "general_cargo" => {
            Ok(VesselType::CargoGeneral)
        }
        "tanker" => Ok(VesselType::ChemicalTanker),
        "crude_oil_tanker" => Ok(VesselType::CrudeOilTanker),
        "ferry" => Ok(VesselType::Ferry),
        "offshore_supply" => Ok(VesselType::OffshoreSupply),
        "service" | "service_vessels" => Ok(VesselType::Service),
        "other" | "not_identified" => Ok(VesselType::Other),
        other => Err(ConfigError {
            field: "vessel.vessel_type".to_string(),
            message: format!("unrecognized vessel type \"{other}\""),
        }),
    }
}

/// Solver discretization and feasibility parameters (§5).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub soc_step_kwh: f64,
    pub time_quant_hr: f64,
    pub start_time_hr: f64,
    pub initial_soc_kwh: f64,
    pub min_operating_soc_kwh: f64,
    pub final_soc_min_kwh: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            soc_step_kwh: 100.0,
            time_quant_hr: 0.25,
            start_time_hr: 0.0,
            initial_soc_kwh: 12_000.0,
            min_operating_soc_kwh: 0.0,
            final_soc_min_kwh: 0.0,
        }
    }
}

/// One port along the route (§3 Port).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortConfig {
    pub name: String,
    pub docking_time_hr: f64,
    pub swap_time_hr: f64,
    pub mandatory_stop: bool,
    pub allow_swap: bool,
    pub allow_charge: bool,
    pub partial_swap_allowed: bool,
    pub initial_ready_containers: u32,
    /// `None` (the TOML default, omit the key) means an unlimited container stock.
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
    pub min_swap_soc: f64,
    pub max_docking_time_hr: Option<f64>,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            docking_time_hr: 0.0,
            swap_time_hr: 0.0,
            mandatory_stop: false,
            allow_swap: false,
            allow_charge: false,
            partial_swap_allowed: false,
            initial_ready_containers: 0,
            total_containers: None,
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
        }
    }
}

/// One leg between two consecutive ports (§3 Leg).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LegConfig {
    pub start: String,
    pub end: String,
    pub distance_nm: f64,
    pub current_kmh: f64,
    /// `"laden"` or `"unladen"`.
    pub mode: String,
    pub extra_cost: f64,
}

impl Default for LegConfig {
    fn default() -> Self {
        Self {
            start: String::new(),
            end: String::new(),
            distance_nm: 0.0,
            current_kmh: 0.0,
            mode: "laden".to_string(),
            extra_cost: 0.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl RouteConfig {
    /// Validates cross-field invariants this type's `#[serde(deny_unknown_fields)]` parsing
    /// alone cannot: a coherent port chain, non-negative timings, and a usable state space.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.ports.len() < 2 {
            errors.push(ConfigError {
                field: "ports".into(),
                message: "route must have at least an origin and a terminus".into(),
            });
        }
        if self.legs.len() + 1 != self.ports.len() {
            errors.push(ConfigError {
                field: "legs".into(),
                message: format!("expected {} legs for {} ports", self.ports.len().saturating_sub(1), self.ports.len()),
            });
        }
        for (i, window) in self.ports.windows(2).enumerate() {
            let expect_start = &window[0].name;
            let expect_end = &window[1].name;
            if let Some(leg) = self.legs.get(i) {
                if &leg.start != expect_start || &leg.end != expect_end {
                    errors.push(ConfigError {
                        field: format!("legs[{i}]"),
                        message: format!(
                            "expected leg {expect_start}->{expect_end}, got {}->{}",
                            leg.start, leg.end
                        ),
                    });
                }
            }
        }
        for (i, leg) in self.legs.iter().enumerate() {
            if leg.mode != "laden" && leg.mode != "unladen" {
                errors.push(ConfigError {
                    field: format!("legs[{i}].mode"),
                    message: format!("must be \"laden\" or \"unladen\", got \"{}\"", leg.mode),
                });
            }
        }

        if let Err(e) = self.vessel.resolve_vessel_type() {
            errors.push(e);
        }
        if self.vessel.capacity_kwh <= 0.0 {
            errors.push(ConfigError { field: "vessel.capacity_kwh".into(), message: "must be > 0".into() });
        }
        if self.vessel.per_container_kwh <= 0.0 {
            errors.push(ConfigError { field: "vessel.per_container_kwh".into(), message: "must be > 0".into() });
        }

        let s = &self.solver;
        if s.soc_step_kwh <= 0.0 {
            errors.push(ConfigError { field: "solver.soc_step_kwh".into(), message: "must be > 0".into() });
        }
        if s.time_quant_hr <= 0.0 {
            errors.push(ConfigError { field: "solver.time_quant_hr".into(), message: "must be > 0".into() });
        }
        if !(0.0..=self.vessel.capacity_kwh).contains(&s.initial_soc_kwh) {
            errors.push(ConfigError {
                field: "solver.initial_soc_kwh".into(),
                message: "must be within [0, vessel.capacity_kwh]".into(),
            });
        }
        if s.final_soc_min_kwh > self.vessel.capacity_kwh {
            errors.push(ConfigError {
                field: "solver.final_soc_min_kwh".into(),
                message: "cannot exceed vessel.capacity_kwh".into(),
            });
        }
        if s.min_operating_soc_kwh < 0.0 {
            errors.push(ConfigError {
                field: "solver.min_operating_soc_kwh".into(),
                message: "must be non-negative".into(),
            });
        }
        if s.min_operating_soc_kwh > self.vessel.capacity_kwh {
            errors.push(ConfigError {
                field: "solver.min_operating_soc_kwh".into(),
                message: "cannot exceed vessel.capacity_kwh".into(),
            });
        }
        if s.final_soc_min_kwh < s.min_operating_soc_kwh {
            errors.push(ConfigError {
                field: "solver.final_soc_min_kwh".into(),
                message: "cannot be below solver.min_operating_soc_kwh".into(),
            });
        }
        if s.initial_soc_kwh < s.min_operating_soc_kwh {
            errors.push(ConfigError {
                field: "solver.initial_soc_kwh".into(),
                message: "cannot be below solver.min_operating_soc_kwh".into(),
            });
        }
        if self.vessel.charge_accept_kw < 0.0 {
            errors.push(ConfigError {
                field: "vessel.charge_accept_kw".into(),
                message: "must be non-negative".into(),
            });
        }

        for (i, port) in self.ports.iter().enumerate() {
            if let (Some(charged), Some(total)) = (Some(port.initial_ready_containers), port.total_containers) {
                if charged > total {
                    errors.push(ConfigError {
                        field: format!("ports[{i}].initial_ready_containers"),
                        message: "cannot exceed total_containers".into(),
                    });
                }
            }
            if !(0.0..=1.0).contains(&port.charging_efficiency) {
                errors.push(ConfigError {
                    field: format!("ports[{i}].charging_efficiency"),
                    message: "must be between 0 and 1".into(),
                });
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
                    errors.push(ConfigError {
                        field: format!("ports[{i}].{field}"),
                        message: "must be non-negative".into(),
                    });
                }
            }
            if let Some(max_docking) = port.max_docking_time_hr {
                if max_docking < 0.0 {
                    errors.push(ConfigError {
                        field: format!("ports[{i}].max_docking_time_hr"),
                        message: "must be non-negative".into(),
                    });
                }
            }
        }

        errors
    }

    /// Lowers this configuration into solver inputs, computing each leg's energy and travel
    /// time from its distance/current/mode via `crate::energy::leg_energy_and_time`.
    pub fn to_fixed_path_inputs(&self) -> Result<FixedPathInputs, ConfigError> {
        let errors = self.validate();
        if let Some(first) = errors.into_iter().next() {
            return Err(first);
        }

        let vessel_type = self.vessel.resolve_vessel_type()?;
        let ports: Vec<Port> = self.ports.iter().map(port_config_to_port).collect();

        let mut legs = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            let mode = if leg.mode == "unladen" { LoadMode::Unladen } else { LoadMode::Laden };
            let (energy_kwh, travel_time_hr) = leg_energy_and_time(
                leg.distance_nm,
                leg.current_kmh,
                mode,
                self.vessel.laden_speed_kmh,
                self.vessel.unladen_speed_kmh,
                self.vessel.laden_consumption_per_nm,
                self.vessel.unladen_consumption_per_nm,
            )
            .map_err(|e| ConfigError {
                field: format!("legs[{}->{}]", leg.start, leg.end),
                message: e.to_string(),
            })?;
            legs.push(Leg {
                start: leg.start.clone(),
                end: leg.end.clone(),
                options: vec![LegOption {
                    label: "direct".to_string(),
                    travel_time_hr,
                    energy_kwh,
                    extra_cost: leg.extra_cost,
                }],
            });
        }

        let initial_inventories = self
            .ports
            .iter()
            .map(|p| (p.initial_ready_containers, p.total_containers))
            .collect();

        Ok(FixedPathInputs {
            ports,
            legs,
            vessel: VesselSpecs { vessel_type, gross_tonnage: self.vessel.gross_tonnage },
            capacity_kwh: self.vessel.capacity_kwh,
            per_container_kwh: self.vessel.per_container_kwh,
            vessel_charge_accept_kw: self.vessel.charge_accept_kw,
            initial_soc_kwh: self.solver.initial_soc_kwh,
            initial_inventories,
            min_operating_soc_kwh: self.solver.min_operating_soc_kwh,
            final_soc_min_kwh: self.solver.final_soc_min_kwh,
            soc_step_kwh: self.solver.soc_step_kwh,
            time_quant_hr: self.solver.time_quant_hr,
            start_time_hr: self.solver.start_time_hr,
            hotelling_override: None,
        })
    }

    /// Named built-in presets (§10.1).
    pub const PRESETS: &[&str] = &["demo_route"];

    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo_route" => Ok(Self::demo_route()),
            _ => Err(ConfigError {
                field: "preset".into(),
                message: format!("unknown preset \"{name}\", available: {}", Self::PRESETS.join(", ")),
            }),
        }
    }

    /// The five-port A-E demonstration route: a single battery-electric container feeder
    /// calling at four ports between origin and terminus, with varying swap/charge
    /// capability per stop.
    pub fn demo_route() -> Self {
        let ports = vec![
            PortConfig { name: "A".into(), ..PortConfig::default() },
            PortConfig {
                name: "B".into(),
                mandatory_stop: true,
                allow_swap: true,
                partial_swap_allowed: true,
                total_containers: Some(4),
                initial_ready_containers: 4,
                docking_time_hr: 2.0,
                energy_cost_per_kwh: 0.25,
                base_service_fee: 15.0,
                per_container_swap_surcharge: 5.0,
                degradation_fee_per_kwh: 0.02,
                min_swap_soc: 0.95,
                background_charging_allowed: true,
                background_charging_power_kw: 2000.0,
                ..PortConfig::default()
            },
            PortConfig {
                name: "C".into(),
                allow_swap: true,
                allow_charge: true,
                partial_swap_allowed: true,
                total_containers: Some(4),
                initial_ready_containers: 2,
                swap_time_hr: 1.5,
                charging_power_kw: 500.0,
                energy_cost_per_kwh: 0.18,
                base_service_fee: 10.0,
                per_container_swap_surcharge: 4.0,
                base_charging_fee: 10.0,
                min_swap_soc: 0.95,
                ..PortConfig::default()
            },
            PortConfig {
                name: "D".into(),
                mandatory_stop: true,
                allow_charge: true,
                docking_time_hr: 3.0,
                charging_power_kw: 800.0,
                energy_cost_per_kwh: 0.15,
                base_charging_fee: 12.0,
                ..PortConfig::default()
            },
            PortConfig { name: "E".into(), ..PortConfig::default() },
        ];

        let legs = vec![
            LegConfig { start: "A".into(), end: "B".into(), distance_nm: 40.0, current_kmh: -2.5, ..LegConfig::default() },
            LegConfig { start: "B".into(), end: "C".into(), distance_nm: 35.0, current_kmh: -1.8, ..LegConfig::default() },
            LegConfig { start: "C".into(), end: "D".into(), distance_nm: 45.0, current_kmh: 3.2, ..LegConfig::default() },
            LegConfig { start: "D".into(), end: "E".into(), distance_nm: 30.0, current_kmh: 2.0, ..LegConfig::default() },
        ];

        Self {
            // Scaled to a small feeder, not the teacher-default 12000 kWh/245-per-NM class:
            // a 300 kWh / 75 kWh-per-container battery paired with a ~18 km/h, ~3 kWh/NM
            // vessel (and a sub-150 GT, which zeroes hotelling draw in the cold-ironing
            // table) so the preset's legs and docks are actually payable out of its own
            // battery, the way the original demo's matched scale was.
            vessel: VesselConfig {
                gross_tonnage: 100.0,
                capacity_kwh: 300.0,
                per_container_kwh: 75.0,
                laden_speed_kmh: 18.0,
                unladen_speed_kmh: 18.0,
                laden_consumption_per_nm: 3.0,
                unladen_consumption_per_nm: 3.0,
                ..VesselConfig::default()
            },
            solver: SolverConfig { initial_soc_kwh: 300.0, final_soc_min_kwh: 50.0, ..SolverConfig::default() },
            ports,
            legs,
        }
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "route".into(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError { field: "toml".into(), message: e.to_string() })
    }
}

fn port_config_to_port(c: &PortConfig) -> Port {
    Port {
        name: c.name.clone(),
        docking_time_hr: c.docking_time_hr,
        swap_time_hr: c.swap_time_hr,
        mandatory_stop: c.mandatory_stop,
        allow_swap: c.allow_swap,
        allow_charge: c.allow_charge,
        partial_swap_allowed: c.partial_swap_allowed,
        initial_ready_containers: c.initial_ready_containers,
        total_containers: c.total_containers,
        charging_power_kw: c.charging_power_kw,
        charging_efficiency: c.charging_efficiency,
        background_charging_allowed: c.background_charging_allowed,
        background_charging_power_kw: c.background_charging_power_kw,
        energy_cost_per_kwh: c.energy_cost_per_kwh,
        base_service_fee: c.base_service_fee,
        per_container_swap_surcharge: c.per_container_swap_surcharge,
        degradation_fee_per_kwh: c.degradation_fee_per_kwh,
        base_charging_fee: c.base_charging_fee,
        min_swap_soc: c.min_swap_soc,
        max_docking_time_hr: c.max_docking_time_hr,
        operating_hours: None,
    }
}
