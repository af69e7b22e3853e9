//! Cattle categories and per-animal request data

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Growth category the models were trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CattleCategory {
    GrowingSteerHeifer,
    GrowingYearlings,
    GrowingMatureBulls,
}

impl CattleCategory {
    pub const ALL: [CattleCategory; 3] = [
        CattleCategory::GrowingSteerHeifer,
        CattleCategory::GrowingYearlings,
        CattleCategory::GrowingMatureBulls,
    ];

    /// Numeric `type` feature used during training
    pub fn code(self) -> f64 {
        match self {
            CattleCategory::GrowingSteerHeifer => 0.0,
            CattleCategory::GrowingYearlings => 1.0,
            CattleCategory::GrowingMatureBulls => 2.0,
        }
    }

    /// Largest target weight (lbs) the models are trusted for
    pub fn max_target_weight(self) -> f64 {
        match self {
            CattleCategory::GrowingSteerHeifer => 1400.0,
            CattleCategory::GrowingYearlings => 1400.0,
            CattleCategory::GrowingMatureBulls => 2300.0,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CattleCategory::GrowingSteerHeifer => "Growing Steer/Heifer",
            CattleCategory::GrowingYearlings => "Growing Yearlings",
            CattleCategory::GrowingMatureBulls => "Growing Mature Bulls",
        }
    }

    /// Identifier used by the training pipeline (including its spelling)
    pub fn identifier(self) -> &'static str {
        match self {
            CattleCategory::GrowingSteerHeifer => "growing_steer_heiver",
            CattleCategory::GrowingYearlings => "growing_yearlings",
            CattleCategory::GrowingMatureBulls => "growing_mature_bulls",
        }
    }

    /// Lenient lookup used by the predictor: unknown names fall back to
    /// Growing Yearlings.
    ///
    /// Request validation rejects unknown categories before this is reached;
    /// the fallback only applies to callers that skip validation.
    pub fn from_name_or_default(name: &str) -> CattleCategory {
        name.parse().unwrap_or_else(|_| {
            warn!(
                "Unrecognized cattle category '{}', defaulting to {}",
                name,
                CattleCategory::GrowingYearlings
            );
            CattleCategory::GrowingYearlings
        })
    }
}

impl fmt::Display for CattleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error for a category name that matches none of the known categories
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown cattle category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for CattleCategory {
    type Err = UnknownCategory;

    /// Accepts display names ("Growing Steer/Heifer") and snake_case
    /// identifiers ("growing_steer_heiver"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();

        match normalized.as_str() {
            "growing_steer_heifer" | "growing_steer_heiver" => Ok(CattleCategory::GrowingSteerHeifer),
            "growing_yearlings" | "growing_yearling" => Ok(CattleCategory::GrowingYearlings),
            "growing_mature_bulls" | "growing_mature_bull" => Ok(CattleCategory::GrowingMatureBulls),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A validated description of the animal being fed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CattleInfo {
    pub category: CattleCategory,
    /// Target weight (lbs)
    pub target_weight: f64,
    /// Current body weight (lbs)
    pub body_weight: f64,
    /// Average daily gain (lbs/day)
    pub average_daily_gain: f64,
}

impl CattleInfo {
    /// Raw model input `[type, target_weight, body_weight, adg]`
    pub fn feature_vector(&self) -> [f64; 4] {
        [
            self.category.code(),
            self.target_weight,
            self.body_weight,
            self.average_daily_gain,
        ]
    }
}
