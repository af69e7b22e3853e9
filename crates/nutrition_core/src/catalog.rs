//! Feed ingredient catalog
//!
//! Nutrient values are per pound of dry matter. Order matters: role fallbacks
//! pick the first qualifying entry, so roughages are listed before grains and
//! grains before protein meals.

use serde::Serialize;
use std::fmt;

/// Broad feed class, used to pick silage and mineral substitutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeedClass {
    Roughage,
    Silage,
    Grain,
    ProteinMeal,
    Mineral,
}

impl fmt::Display for FeedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedClass::Roughage => "roughage",
            FeedClass::Silage => "silage",
            FeedClass::Grain => "grain",
            FeedClass::ProteinMeal => "protein meal",
            FeedClass::Mineral => "mineral",
        };
        f.write_str(name)
    }
}

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeedIngredient {
    pub name: &'static str,
    pub class: FeedClass,
    /// Total digestible nutrients (% of DM)
    pub tdn_pct: f64,
    /// Net energy for maintenance (Mcal/lb DM)
    pub nem_per_lb: f64,
    /// Net energy for gain (Mcal/lb DM)
    pub neg_per_lb: f64,
    /// Crude protein (% of DM)
    pub cp_pct: f64,
    /// Calcium (% of DM)
    pub ca_pct: f64,
    /// Phosphorus (% of DM)
    pub p_pct: f64,
}

#[allow(clippy::too_many_arguments)]
const fn ingredient(
    name: &'static str,
    class: FeedClass,
    tdn_pct: f64,
    nem_per_lb: f64,
    neg_per_lb: f64,
    cp_pct: f64,
    ca_pct: f64,
    p_pct: f64,
) -> FeedIngredient {
    FeedIngredient {
        name,
        class,
        tdn_pct,
        nem_per_lb,
        neg_per_lb,
        cp_pct,
        ca_pct,
        p_pct,
    }
}

/// Process-wide ingredient catalog
pub const FEED_CATALOG: [FeedIngredient; 12] = [
    ingredient("Alfalfa Hay", FeedClass::Roughage, 58.0, 0.50, 0.30, 17.0, 1.20, 0.22),
    ingredient("Grass Hay", FeedClass::Roughage, 55.0, 0.47, 0.24, 10.0, 0.50, 0.20),
    ingredient("Corn Silage", FeedClass::Silage, 65.0, 0.60, 0.35, 8.0, 0.30, 0.22),
    ingredient("Sorghum Silage", FeedClass::Silage, 60.0, 0.55, 0.30, 8.5, 0.35, 0.21),
    ingredient("Ground Corn", FeedClass::Grain, 88.0, 0.90, 0.65, 9.0, 0.02, 0.28),
    ingredient("Barley Grain", FeedClass::Grain, 84.0, 0.88, 0.59, 13.0, 0.05, 0.38),
    ingredient("Soybean Meal (48%)", FeedClass::ProteinMeal, 82.0, 0.70, 0.40, 48.0, 0.30, 0.65),
    ingredient("Cottonseed Meal", FeedClass::ProteinMeal, 75.0, 0.78, 0.50, 44.0, 0.20, 1.15),
    ingredient("Dicalcium Phosphate", FeedClass::Mineral, 0.0, 0.0, 0.0, 0.0, 23.00, 18.00),
    ingredient("Limestone", FeedClass::Mineral, 0.0, 0.0, 0.0, 0.0, 38.00, 0.02),
    ingredient("Trace Mineral Mix", FeedClass::Mineral, 0.0, 0.0, 0.0, 0.0, 12.00, 8.00),
    ingredient("Salt", FeedClass::Mineral, 0.0, 0.0, 0.0, 0.0, 0.00, 0.00),
];

/// Look up an ingredient by name (trimmed, case-insensitive)
pub fn find_ingredient(name: &str) -> Option<&'static FeedIngredient> {
    let name = name.trim();
    FEED_CATALOG.iter().find(|i| i.name.eq_ignore_ascii_case(name))
}
