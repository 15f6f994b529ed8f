//! Fuel and salt inventory transformation.

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::config::{AlertThresholds, TransformDefaults};
use crate::core::{DepotStatus, ResourceInventory, StatusColor};
use crate::parsing::lenient::{clamp_finite, number, number_by_keys, round1};
use crate::parsing::{lookup, Payload, Matcher, ShapeTable};

/// Known layouts of a single stock payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockShape {
    /// Percentage already computed upstream.
    Level,
    /// Two raw quantities, e.g. diesel and gasoline.
    RawQuantities,
    /// Inventory collaborator report with `data.inventory.current_level`.
    StockReport,
}

/// Key names for one kind of stock.
struct StockKind {
    name: &'static str,
    level_key: &'static str,
    quantity_keys: &'static [&'static str; 2],
    shapes: ShapeTable<StockShape>,
}

const STOCK_REPORT_PATH: &[&str] = &["data", "inventory"];

const FUEL: StockKind = StockKind {
    name: "fuel",
    level_key: "fuel_level",
    quantity_keys: &["diesel", "gasoline"],
    shapes: ShapeTable::new(&[
        (Matcher::AnyKey(&["fuel_level"]), StockShape::Level),
        (Matcher::AnyKey(&["diesel", "gasoline"]), StockShape::RawQuantities),
        (Matcher::ObjectAt(STOCK_REPORT_PATH), StockShape::StockReport),
    ]),
};

const SALT: StockKind = StockKind {
    name: "salt",
    level_key: "salt_level",
    quantity_keys: &["rockSalt", "treatedSalt"],
    shapes: ShapeTable::new(&[
        (Matcher::AnyKey(&["salt_level"]), StockShape::Level),
        (Matcher::AnyKey(&["rockSalt", "treatedSalt"]), StockShape::RawQuantities),
        (Matcher::ObjectAt(STOCK_REPORT_PATH), StockShape::StockReport),
    ]),
};

/// Transform normalized fuel and salt payloads into inventory levels.
///
/// An empty payload on either side means the collaborator sent nothing
/// usable; both levels then fall back to the configured default and the depot
/// status is reported as unknown.
pub fn transform_inventory(
    fuel: &Payload,
    salt: &Payload,
    defaults: &TransformDefaults,
    thresholds: &AlertThresholds,
) -> ResourceInventory {
    if fuel.is_empty() || salt.is_empty() {
        log::debug!("Inventory payload missing, using unknown depot status");
        return unknown_inventory(defaults);
    }

    let levels = read_level(&FUEL, fuel, defaults)
        .and_then(|fuel_level| Ok((fuel_level, read_level(&SALT, salt, defaults)?)));

    match levels {
        Ok((fuel_level, salt_level)) => {
            let operational =
                salt_level > thresholds.low_inventory && fuel_level > thresholds.low_inventory;
            let depot = if operational {
                depot(defaults, "Operational", StatusColor::Success)
            } else {
                depot(defaults, "Low Stock", StatusColor::Warning)
            };

            ResourceInventory {
                salt_level,
                fuel_level,
                depots: vec![depot],
            }
        }
        Err(e) => {
            log::warn!("Failed to transform inventory data: {:#}", e);
            unknown_inventory(defaults)
        }
    }
}

/// Read one stock level as a clamped, rounded percentage.
fn read_level(kind: &StockKind, payload: &Payload, defaults: &TransformDefaults) -> Result<f64> {
    let level = match kind.shapes.detect(payload) {
        Some(StockShape::Level) => payload
            .get(kind.level_key)
            .map(|v| number(v, kind.level_key))
            .transpose()?
            .flatten()
            .unwrap_or(defaults.inventory_level),
        Some(StockShape::RawQuantities) => {
            let [first, second] = *kind.quantity_keys;
            let sum = number_by_keys(payload, &[first])?.unwrap_or(0.0)
                + number_by_keys(payload, &[second])?.unwrap_or(0.0);
            if sum == 0.0 || !sum.is_finite() {
                bail!("{}: quantities {} and {} sum to {}", kind.name, first, second, sum);
            }
            sum / (sum * 2.0) * 100.0
        }
        Some(StockShape::StockReport) => {
            let inventory = lookup(payload, STOCK_REPORT_PATH)
                .and_then(Value::as_object)
                .with_context(|| format!("{}: data.inventory must be an object", kind.name))?;
            let current = number_by_keys(inventory, &["current_level"])?.unwrap_or(0.0);
            let threshold = number_by_keys(inventory, &["threshold"])?.unwrap_or(1.0);
            let capacity = threshold * 5.0;
            if capacity == 0.0 {
                bail!("{}: inventory threshold is zero", kind.name);
            }
            current / capacity * 100.0
        }
        None => {
            log::debug!("{} payload not recognized, using default level", kind.name);
            defaults.inventory_level
        }
    };

    Ok(round1(clamp_finite(level, 0.0, 100.0)))
}

fn depot(defaults: &TransformDefaults, status: &str, color: StatusColor) -> DepotStatus {
    DepotStatus {
        name: defaults.depot_name.clone(),
        status: status.to_string(),
        status_color: color,
    }
}

/// Inventory reported when the inputs cannot be read.
pub fn unknown_inventory(defaults: &TransformDefaults) -> ResourceInventory {
    let level = round1(clamp_finite(defaults.inventory_level, 0.0, 100.0));
    ResourceInventory {
        salt_level: level,
        fuel_level: level,
        depots: vec![depot(defaults, "Unknown", StatusColor::Warning)],
    }
}
