//! Request validation
//!
//! Every check runs before inference; a rejected request never reaches the
//! models. Messages are written for the person filling in the request.

use crate::cattle::{CattleCategory, CattleInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a prediction request is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid cattle type '{given}'. Must be one of: {expected}")]
    UnknownCategory { given: String, expected: String },

    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("Body weight ({body_weight} lbs) must be less than target weight ({target_weight} lbs)")]
    BodyWeightNotBelowTarget { body_weight: f64, target_weight: f64 },

    #[error(
        "Target weight for {category} should not exceed {limit} lbs (got {target_weight}). \
         Please consult an expert for higher weights."
    )]
    TargetWeightExceedsLimit {
        category: CattleCategory,
        limit: f64,
        target_weight: f64,
    },
}

/// Raw, unvalidated prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub category: String,
    pub target_weight: f64,
    pub body_weight: f64,
    pub average_daily_gain: f64,
}

impl PredictionRequest {
    pub fn new(
        category: impl Into<String>,
        target_weight: f64,
        body_weight: f64,
        average_daily_gain: f64,
    ) -> Self {
        Self {
            category: category.into(),
            target_weight,
            body_weight,
            average_daily_gain,
        }
    }

    /// Validate and convert into a typed [`CattleInfo`]
    pub fn validate(&self) -> Result<CattleInfo, ValidationError> {
        let category: CattleCategory =
            self.category
                .parse()
                .map_err(|_| ValidationError::UnknownCategory {
                    given: self.category.clone(),
                    expected: CattleCategory::ALL
                        .iter()
                        .map(|c| c.identifier())
                        .collect::<Vec<_>>()
                        .join(", "),
                })?;

        let info = CattleInfo {
            category,
            target_weight: self.target_weight,
            body_weight: self.body_weight,
            average_daily_gain: self.average_daily_gain,
        };
        validate_cattle_info(&info)?;
        Ok(info)
    }
}

/// Numeric checks shared by every entry point
pub fn validate_cattle_info(info: &CattleInfo) -> Result<(), ValidationError> {
    positive("Body weight", info.body_weight)?;
    positive("Target weight", info.target_weight)?;
    positive("Average daily gain", info.average_daily_gain)?;

    if info.body_weight >= info.target_weight {
        return Err(ValidationError::BodyWeightNotBelowTarget {
            body_weight: info.body_weight,
            target_weight: info.target_weight,
        });
    }

    let limit = info.category.max_target_weight();
    if info.target_weight > limit {
        return Err(ValidationError::TargetWeightExceedsLimit {
            category: info.category,
            limit,
            target_weight: info.target_weight,
        });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    // NaN fails the comparison and is rejected here too
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_typical_request() {
        let info = PredictionRequest::new("growing_steer_heiver", 1200.0, 600.0, 2.5)
            .validate()
            .unwrap();
        assert_eq!(info.category, CattleCategory::GrowingSteerHeifer);
    }

    #[test]
    fn rejects_unknown_category() {
        let err = PredictionRequest::new("dairy", 1200.0, 600.0, 2.5)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("growing_mature_bulls"));
    }

    #[test]
    fn rejects_non_positive_values() {
        for (target, body, adg) in [(1200.0, 0.0, 2.0), (0.0, -1.0, 2.0), (1200.0, 600.0, 0.0)] {
            let err = PredictionRequest::new("Growing Yearlings", target, body, adg)
                .validate()
                .unwrap_err();
            assert!(matches!(err, ValidationError::NotPositive { .. }), "{err}");
        }
        let err = PredictionRequest::new("Growing Yearlings", 1200.0, f64::NAN, 2.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotPositive { field: "Body weight", .. }));
    }

    #[test]
    fn rejects_body_weight_at_or_above_target() {
        let err = PredictionRequest::new("Growing Yearlings", 900.0, 900.0, 2.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::BodyWeightNotBelowTarget { .. }));
    }

    #[test]
    fn limit_boundary_per_category() {
        for category in CattleCategory::ALL {
            let limit = category.max_target_weight();
            let at_limit = PredictionRequest::new(category.identifier(), limit, 500.0, 2.0);
            assert!(at_limit.validate().is_ok(), "{category} at limit");

            let over = PredictionRequest::new(category.identifier(), limit + 1.0, 500.0, 2.0);
            assert_eq!(
                over.validate().unwrap_err(),
                ValidationError::TargetWeightExceedsLimit {
                    category,
                    limit,
                    target_weight: limit + 1.0,
                }
            );
        }
    }

    #[test]
    fn limit_message_names_the_category() {
        let err = PredictionRequest::new("growing_mature_bulls", 2400.0, 1000.0, 2.0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Target weight for Growing Mature Bulls should not exceed 2300 lbs (got 2400). \
             Please consult an expert for higher weights."
        );
    }
}
