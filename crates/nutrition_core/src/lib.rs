//! Cattle Nutrition Core
//!
//! Predicts the daily nutrient requirements of growing beef cattle from a
//! pre-trained random-forest bundle and turns them into a feed menu.
//!
//! Modules:
//! - `scaler`: Standard-score feature and target scaling
//! - `tree`, `forest`: Regression tree evaluation and forest averaging
//! - `bundle`: JSON model bundle loading and validation
//! - `cattle`, `validation`: Animal categories and request checks
//! - `prediction`, `predictor`: The thirteen-target prediction
//! - `catalog`, `blend`: Feed ingredients and greedy ration composition
//! - `report`, `prompt`: Markdown report and external advisor prompt
//! - `config`, `service`: Configuration and the caller-owned service

pub mod blend;
pub mod bundle;
pub mod catalog;
pub mod cattle;
pub mod config;
pub mod errors;
pub mod forest;
pub mod prediction;
pub mod predictor;
pub mod prompt;
pub mod report;
pub mod scaler;
pub mod service;
pub mod tree;
pub mod validation;

pub use blend::{
    BlendConfig, FeedBlendComposer, FeedMenu, FeedRecommendation, FeedRole, NutrientContribution,
    RequirementCheck,
};
pub use bundle::{BundleSummary, ModelBundle, TargetModel};
pub use catalog::{find_ingredient, FeedClass, FeedIngredient, FEED_CATALOG};
pub use cattle::{CattleCategory, CattleInfo};
pub use config::AdvisorConfig;
pub use errors::{NutritionError, Result};
pub use forest::RandomForest;
pub use prediction::{NutrientTarget, NutritionPrediction};
pub use predictor::NutritionPredictor;
pub use prompt::AdvisorPrompt;
pub use report::{format_report, FeedReport};
pub use scaler::StandardScaler;
pub use service::{Advice, AdvisorResponse, AdvisorService};
pub use tree::RegressionTree;
pub use validation::{PredictionRequest, ValidationError};

/// Crate version, recorded in every [`BundleSummary`]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
