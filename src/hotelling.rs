//! Hotelling power model (§4.2): kW consumed by onboard services while berthed, as a
//! function of vessel type and gross tonnage.
//!
//! The GT-range tables below are the built-in cold-ironing reference data; they serve as the
//! default "cold-ironing reference table" of §4.2, so the model is usable without an
//! externally-supplied override. A caller-supplied override table, when present and when it
//! yields a positive value for the vessel's GT, takes priority over this default.

use crate::types::VesselType;

/// A gross-tonnage range with a fixed hotelling power, `[min_gt, max_gt)`.
#[derive(Debug, Clone, Copy)]
pub struct GtRange {
    pub min_gt: f64,
    pub max_gt: f64,
    pub power_kw: f64,
}

impl GtRange {
    const fn new(min_gt: f64, max_gt: f64, power_kw: f64) -> Self {
        Self { min_gt, max_gt, power_kw }
    }

    fn contains(&self, gt: f64) -> bool {
        self.min_gt <= gt && gt < self.max_gt
    }
}

const CONTAINER_VESSELS: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, 5000.0, 257.0),
    GtRange::new(5000.0, 10000.0, 556.0),
    GtRange::new(10000.0, 20000.0, 1295.0),
    GtRange::new(20000.0, 25000.0, 1665.0),
    GtRange::new(25000.0, 50000.0, 2703.0),
    GtRange::new(50000.0, 100000.0, 4291.0),
    GtRange::new(100000.0, f64::INFINITY, 5717.0),
];

const AUTO_CARRIER: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, 5000.0, 500.0),
    GtRange::new(5000.0, 10000.0, 1000.0),
    GtRange::new(10000.0, 20000.0, 2000.0),
    GtRange::new(20000.0, 25000.0, 2000.0),
    GtRange::new(25000.0, 50000.0, 5000.0),
    GtRange::new(50000.0, 100000.0, 5000.0),
    GtRange::new(100000.0, f64::INFINITY, 5000.0),
];

const CRUISE_SHIPS: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 77.0),
    GtRange::new(150.0, 5000.0, 189.0),
    GtRange::new(5000.0, 10000.0, 986.0),
    GtRange::new(10000.0, 20000.0, 1997.0),
    GtRange::new(20000.0, 25000.0, 2467.0),
    GtRange::new(25000.0, 50000.0, 3472.0),
    GtRange::new(50000.0, 100000.0, 4492.0),
    GtRange::new(100000.0, f64::INFINITY, 6500.0),
];

const CHEMICAL_TANKERS: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, 5000.0, 0.0),
    GtRange::new(5000.0, 10000.0, 1422.0),
    GtRange::new(10000.0, 20000.0, 1641.0),
    GtRange::new(20000.0, 25000.0, 1754.0),
    GtRange::new(25000.0, 50000.0, 1577.0),
    GtRange::new(50000.0, 100000.0, 2815.0),
    GtRange::new(100000.0, f64::INFINITY, 3000.0),
];

const CARGO_VESSELS: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, 5000.0, 1091.0),
    GtRange::new(5000.0, 10000.0, 809.0),
    GtRange::new(10000.0, 20000.0, 1537.0),
    GtRange::new(20000.0, 25000.0, 1222.0),
    GtRange::new(25000.0, 50000.0, 1405.0),
    GtRange::new(50000.0, 100000.0, 1637.0),
    GtRange::new(100000.0, f64::INFINITY, 2000.0),
];

const CRUDE_OIL_TANKER: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, 5000.0, 0.0),
    GtRange::new(5000.0, 10000.0, 1204.0),
    GtRange::new(10000.0, 20000.0, 2624.0),
    GtRange::new(20000.0, 25000.0, 1355.0),
    GtRange::new(25000.0, 50000.0, 1594.0),
    GtRange::new(50000.0, 100000.0, 1328.0),
    GtRange::new(100000.0, f64::INFINITY, 2694.0),
];

const FERRY: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, 5000.0, 355.0),
    GtRange::new(5000.0, 10000.0, 670.0),
    GtRange::new(10000.0, 20000.0, 996.0),
    GtRange::new(20000.0, 25000.0, 1350.0),
    GtRange::new(25000.0, 50000.0, 2431.0),
    GtRange::new(50000.0, 100000.0, 2888.0),
    GtRange::new(100000.0, f64::INFINITY, 2900.0),
];

const OFFSHORE_SUPPLY: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, 5000.0, 1000.0),
    GtRange::new(5000.0, 10000.0, 2000.0),
    GtRange::new(10000.0, 20000.0, 2000.0),
    GtRange::new(20000.0, 25000.0, 2000.0),
    GtRange::new(25000.0, 50000.0, 2000.0),
    GtRange::new(50000.0, 100000.0, 2000.0),
    GtRange::new(100000.0, f64::INFINITY, 2000.0),
];

const SERVICE_VESSELS: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 75.0),
    GtRange::new(150.0, 5000.0, 382.0),
    GtRange::new(5000.0, 10000.0, 990.0),
    GtRange::new(10000.0, 20000.0, 2383.0),
    GtRange::new(20000.0, 25000.0, 2000.0),
    GtRange::new(25000.0, 50000.0, 2000.0),
    GtRange::new(50000.0, 100000.0, 2000.0),
    GtRange::new(100000.0, f64::INFINITY, 2000.0),
];

const NOT_IDENTIFIED: &[GtRange] = &[
    GtRange::new(0.0, 150.0, 0.0),
    GtRange::new(150.0, f64::INFINITY, 200.0),
];

fn table_for(vessel_type: VesselType) -> &'static [GtRange] {
    match vessel_type {
        VesselType::Container => CONTAINER_VESSELS,
        VesselType::AutoCarrier => AUTO_CARRIER,
        VesselType::Cruise => CRUISE_SHIPS,
        VesselType::ChemicalTanker => CHEMICAL_TANKERS,
        VesselType::CargoGeneral => CARGO_VESSELS,
        VesselType::CrudeOilTanker => CRUDE_OIL_TANKER,
        VesselType::Ferry => FERRY,
        VesselType::OffshoreSupply => OFFSHORE_SUPPLY,
        VesselType::Service => SERVICE_VESSELS,
        VesselType::Other => NOT_IDENTIFIED,
    }
}

/// Looks up hotelling power (kW) for a vessel type and gross tonnage, using the built-in
/// cold-ironing reference table. Falls back to the table's last range if `gross_tonnage`
/// exceeds every configured range.
pub fn hotelling_power_kw(vessel_type: VesselType, gross_tonnage: f64) -> f64 {
    let table = table_for(vessel_type);
    table
        .iter()
        .find(|r| r.contains(gross_tonnage))
        .unwrap_or_else(|| table.last().expect("tables are non-empty"))
        .power_kw
}

/// Looks up hotelling power using an externally supplied override table first; if that table
/// has no entry (or the entry evaluates to zero), falls back to the built-in table above.
pub fn hotelling_power_kw_with_override(
    vessel_type: VesselType,
    gross_tonnage: f64,
    override_table: Option<&[GtRange]>,
) -> f64 {
    if let Some(table) = override_table {
        if let Some(range) = table.iter().find(|r| r.contains(gross_tonnage)) {
            if range.power_kw > 0.0 {
                return range.power_kw;
            }
        }
    }
    hotelling_power_kw(vessel_type, gross_tonnage)
}
