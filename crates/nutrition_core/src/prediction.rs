//! The thirteen predicted nutrient requirements

use serde::{Deserialize, Serialize};
use std::fmt;

/// One predicted requirement, keyed by its training column name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NutrientTarget {
    DmIntake,
    TdnPercent,
    NemPerLb,
    NegPerLb,
    CpPercent,
    CaPercent,
    PPercent,
    TdnLbs,
    NemMcal,
    NegMcal,
    CpLbs,
    CaGrams,
    PGrams,
}

impl NutrientTarget {
    /// All targets in model file order
    pub const ALL: [NutrientTarget; 13] = [
        NutrientTarget::DmIntake,
        NutrientTarget::TdnPercent,
        NutrientTarget::NemPerLb,
        NutrientTarget::NegPerLb,
        NutrientTarget::CpPercent,
        NutrientTarget::CaPercent,
        NutrientTarget::PPercent,
        NutrientTarget::TdnLbs,
        NutrientTarget::NemMcal,
        NutrientTarget::NegMcal,
        NutrientTarget::CpLbs,
        NutrientTarget::CaGrams,
        NutrientTarget::PGrams,
    ];

    /// Column name in the exported model file
    pub fn column_name(self) -> &'static str {
        match self {
            NutrientTarget::DmIntake => "DM Intake (lbs/day)",
            NutrientTarget::TdnPercent => "TDN (% DM)",
            NutrientTarget::NemPerLb => "NEm (Mcal/lb)",
            NutrientTarget::NegPerLb => "NEg (Mcal/lb)",
            NutrientTarget::CpPercent => "CP (% DM)",
            NutrientTarget::CaPercent => "Ca (%DM)",
            NutrientTarget::PPercent => "P (% DM)",
            NutrientTarget::TdnLbs => "TDN (lbs)",
            NutrientTarget::NemMcal => "NEm (Mcal)",
            NutrientTarget::NegMcal => "NEg (Mcal)",
            NutrientTarget::CpLbs => "CP (lbs)",
            NutrientTarget::CaGrams => "Ca (grams)",
            NutrientTarget::PGrams => "P (grams)",
        }
    }

    pub fn from_column_name(name: &str) -> Option<NutrientTarget> {
        Self::ALL.into_iter().find(|t| t.column_name() == name)
    }
}

impl fmt::Display for NutrientTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Daily requirements predicted for one animal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionPrediction {
    /// Dry matter intake (lbs/day)
    pub dm_intake_lbs: f64,
    /// Total digestible nutrients (% of DM)
    pub tdn_pct: f64,
    /// Net energy for maintenance (Mcal/lb DM)
    pub nem_mcal_per_lb: f64,
    /// Net energy for gain (Mcal/lb DM)
    pub neg_mcal_per_lb: f64,
    /// Crude protein (% of DM)
    pub cp_pct: f64,
    /// Calcium (% of DM)
    pub ca_pct: f64,
    /// Phosphorus (% of DM)
    pub p_pct: f64,
    pub tdn_lbs: f64,
    pub nem_mcal: f64,
    pub neg_mcal: f64,
    pub cp_lbs: f64,
    pub ca_grams: f64,
    pub p_grams: f64,
}

impl NutritionPrediction {
    /// Build a prediction by evaluating `value` for every target
    pub fn from_fn<F>(mut value: F) -> Self
    where
        F: FnMut(NutrientTarget) -> f64,
    {
        let mut prediction = Self::default();
        for target in NutrientTarget::ALL {
            *prediction.get_mut(target) = value(target);
        }
        prediction
    }

    pub fn get(&self, target: NutrientTarget) -> f64 {
        match target {
            NutrientTarget::DmIntake => self.dm_intake_lbs,
            NutrientTarget::TdnPercent => self.tdn_pct,
            NutrientTarget::NemPerLb => self.nem_mcal_per_lb,
            NutrientTarget::NegPerLb => self.neg_mcal_per_lb,
            NutrientTarget::CpPercent => self.cp_pct,
            NutrientTarget::CaPercent => self.ca_pct,
            NutrientTarget::PPercent => self.p_pct,
            NutrientTarget::TdnLbs => self.tdn_lbs,
            NutrientTarget::NemMcal => self.nem_mcal,
            NutrientTarget::NegMcal => self.neg_mcal,
            NutrientTarget::CpLbs => self.cp_lbs,
            NutrientTarget::CaGrams => self.ca_grams,
            NutrientTarget::PGrams => self.p_grams,
        }
    }

    fn get_mut(&mut self, target: NutrientTarget) -> &mut f64 {
        match target {
            NutrientTarget::DmIntake => &mut self.dm_intake_lbs,
            NutrientTarget::TdnPercent => &mut self.tdn_pct,
            NutrientTarget::NemPerLb => &mut self.nem_mcal_per_lb,
            NutrientTarget::NegPerLb => &mut self.neg_mcal_per_lb,
            NutrientTarget::CpPercent => &mut self.cp_pct,
            NutrientTarget::CaPercent => &mut self.ca_pct,
            NutrientTarget::PPercent => &mut self.p_pct,
            NutrientTarget::TdnLbs => &mut self.tdn_lbs,
            NutrientTarget::NemMcal => &mut self.nem_mcal,
            NutrientTarget::NegMcal => &mut self.neg_mcal,
            NutrientTarget::CpLbs => &mut self.cp_lbs,
            NutrientTarget::CaGrams => &mut self.ca_grams,
            NutrientTarget::PGrams => &mut self.p_grams,
        }
    }

    /// `(target, value)` pairs in model file order
    pub fn iter(&self) -> impl Iterator<Item = (NutrientTarget, f64)> + '_ {
        NutrientTarget::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}
