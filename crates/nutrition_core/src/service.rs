//! Caller-owned advisor service
//!
//! Holds one shared model bundle and a blend composer. Requests are
//! validated before any inference; the service keeps no per-request state,
//! so a single instance can serve concurrent callers.

use crate::blend::{BlendConfig, FeedBlendComposer, FeedMenu};
use crate::bundle::ModelBundle;
use crate::cattle::CattleInfo;
use crate::config::AdvisorConfig;
use crate::errors::Result;
use crate::prediction::NutritionPrediction;
use crate::predictor::NutritionPredictor;
use crate::prompt::AdvisorPrompt;
use crate::report::format_report;
use crate::validation::PredictionRequest;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything produced for one request
#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub info: CattleInfo,
    pub prediction: NutritionPrediction,
    pub menu: FeedMenu,
    pub report: String,
}

/// Tagged outcome for JSON consumers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvisorResponse<T> {
    Success { data: T },
    Error { message: String },
}

impl<T> From<Result<T>> for AdvisorResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => AdvisorResponse::Success { data },
            Err(err) => AdvisorResponse::Error {
                message: err.to_string(),
            },
        }
    }
}

impl<T> AdvisorResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, AdvisorResponse::Success { .. })
    }
}

#[derive(Debug, Clone)]
pub struct AdvisorService {
    predictor: NutritionPredictor,
    composer: FeedBlendComposer,
}

impl AdvisorService {
    pub fn new(bundle: Arc<ModelBundle>, blend: BlendConfig) -> Result<Self> {
        Ok(Self {
            predictor: NutritionPredictor::new(bundle)?,
            composer: FeedBlendComposer::new(blend)?,
        })
    }

    /// Validate the configuration and load the bundle it points at
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        config.validate()?;
        let bundle = ModelBundle::from_json_file(&config.model_path)?;
        info!(
            "Advisor ready: {} targets, {} trees",
            bundle.target_columns().len(),
            bundle.total_trees()
        );
        Self::new(Arc::new(bundle), config.blend)
    }

    pub fn predictor(&self) -> &NutritionPredictor {
        &self.predictor
    }

    pub fn composer(&self) -> &FeedBlendComposer {
        &self.composer
    }

    /// Validate a request and predict its requirements
    #[instrument(skip(self), fields(category = %request.category))]
    pub fn predict(&self, request: &PredictionRequest) -> Result<(CattleInfo, NutritionPrediction)> {
        let info = request.validate()?;
        let prediction = self.predictor.predict(&info);
        Ok((info, prediction))
    }

    /// Compose a feed menu for an existing prediction
    pub fn recommend<S: AsRef<str>>(
        &self,
        prediction: &NutritionPrediction,
        unavailable: &[S],
    ) -> Result<FeedMenu> {
        self.composer.compose(prediction, unavailable)
    }

    /// Predict, compose and render the report in one step
    #[instrument(skip(self, unavailable), fields(category = %request.category))]
    pub fn advise<S: AsRef<str>>(
        &self,
        request: &PredictionRequest,
        unavailable: &[S],
    ) -> Result<Advice> {
        let (info, prediction) = self.predict(request)?;
        let menu = self.recommend(&prediction, unavailable)?;
        let report = format_report(&info, &prediction, &menu);
        Ok(Advice {
            info,
            prediction,
            menu,
            report,
        })
    }

    /// Predict and render the prompt for an external advisor model
    pub fn prompt<S: AsRef<str>>(
        &self,
        request: &PredictionRequest,
        unavailable: &[S],
    ) -> Result<String> {
        let (_, prediction) = self.predict(request)?;
        Ok(AdvisorPrompt::new(&prediction, unavailable).to_string())
    }
}
