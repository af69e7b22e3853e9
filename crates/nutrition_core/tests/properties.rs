use cattle_nutrition_core::{
    CattleCategory, FeedBlendComposer, NutritionPrediction, PredictionRequest, RandomForest,
    RegressionTree, StandardScaler, ValidationError, FEED_CATALOG,
};
use proptest::prelude::*;

// Property-based tests for scaling, inference, validation and blending

fn catalog_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(FEED_CATALOG.iter().map(|i| i.name).collect::<Vec<_>>())
}

fn category() -> impl Strategy<Value = CattleCategory> {
    prop::sample::select(CattleCategory::ALL.to_vec())
}

fn scaler_params() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    (1usize..=6).prop_flat_map(|n| {
        (
            prop::collection::vec(-1e4f64..1e4, n),
            prop::collection::vec(prop_oneof![0.01f64..1e3, -1e3f64..-0.01], n),
            prop::collection::vec(-1e4f64..1e4, n),
        )
    })
}

/// Requirement profile scaled from a positive dry matter intake
fn prediction() -> impl Strategy<Value = NutritionPrediction> {
    (5.0f64..40.0, 55.0f64..80.0, 9.0f64..16.0).prop_map(|(dmi, tdn_pct, cp_pct)| {
        NutritionPrediction {
            dm_intake_lbs: dmi,
            tdn_pct,
            nem_mcal_per_lb: 0.65,
            neg_mcal_per_lb: 0.40,
            cp_pct,
            ca_pct: 0.5,
            p_pct: 0.25,
            tdn_lbs: dmi * tdn_pct / 100.0,
            nem_mcal: dmi * 0.65,
            neg_mcal: dmi * 0.40,
            cp_lbs: dmi * cp_pct / 100.0,
            ca_grams: dmi * 0.005 * 453.592,
            p_grams: dmi * 0.0025 * 453.592,
        }
    })
}

proptest! {
    #[test]
    fn scaler_round_trip_recovers_input((mean, scale, x) in scaler_params()) {
        let scaler = StandardScaler::new(mean, scale);
        let back = scaler.inverse_transform(&scaler.transform(&x));
        for (orig, got) in x.iter().zip(&back) {
            prop_assert!((orig - got).abs() <= 1e-9 * orig.abs().max(1.0));
        }
    }

    #[test]
    fn tree_prediction_is_pure(
        threshold in -10.0f64..10.0,
        left in -100.0f64..100.0,
        right in -100.0f64..100.0,
        features in prop::collection::vec(-20.0f64..20.0, 4),
    ) {
        let tree = RegressionTree::stump(2, threshold, left, right);
        let first = tree.predict(&features).unwrap();
        let second = tree.predict(&features).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
        prop_assert!(first == left || first == right);
    }

    #[test]
    fn constant_forest_returns_the_constant(
        value in -1e6f64..1e6,
        trees in 1usize..64,
        features in prop::collection::vec(-1e3f64..1e3, 4),
    ) {
        let forest = RandomForest::new(vec![RegressionTree::leaf(value); trees], 4);
        prop_assert_eq!(forest.predict(&features).unwrap(), value);
    }

    #[test]
    fn target_weight_limit_is_inclusive(category in category(), adg in 0.1f64..5.0) {
        let limit = category.max_target_weight();
        let name = category.identifier();

        let at_limit = PredictionRequest::new(name, limit, limit / 2.0, adg);
        prop_assert!(at_limit.validate().is_ok());

        let over = PredictionRequest::new(name, limit + 1.0, limit / 2.0, adg);
        let is_limit_error = matches!(
            over.validate(),
            Err(ValidationError::TargetWeightExceedsLimit { .. })
        );
        prop_assert!(is_limit_error);
    }

    #[test]
    fn body_weight_must_stay_below_target(target in 500.0f64..1400.0, extra in 0.0f64..300.0) {
        let request = PredictionRequest::new("growing_yearlings", target, target + extra, 2.0);
        let is_order_error = matches!(
            request.validate(),
            Err(ValidationError::BodyWeightNotBelowTarget { .. })
        );
        prop_assert!(is_order_error);
    }

    #[test]
    fn unavailable_ingredients_never_appear(
        prediction in prediction(),
        unavailable in prop::collection::vec(catalog_name(), 0..5),
    ) {
        match FeedBlendComposer::default().compose(&prediction, &unavailable) {
            Ok(menu) => {
                for name in &unavailable {
                    prop_assert!(!menu.contains(name), "{} should be excluded", name);
                }
            }
            // Only possible when every candidate for a mandatory role is gone
            Err(err) => prop_assert!(err.to_string().starts_with("Cannot satisfy")),
        }
    }

    #[test]
    fn menu_totals_equal_sum_of_rows(
        prediction in prediction(),
        unavailable in prop::collection::vec(catalog_name(), 0..3),
    ) {
        if let Ok(menu) = FeedBlendComposer::default().compose(&prediction, &unavailable) {
            let rows = menu.recommendations();
            let totals = menu.totals();
            let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * b.abs().max(1.0);

            prop_assert!(close(rows.iter().map(|r| r.contribution.dm_lbs).sum(), totals.dm_lbs));
            prop_assert!(close(rows.iter().map(|r| r.contribution.tdn_lbs).sum(), totals.tdn_lbs));
            prop_assert!(close(rows.iter().map(|r| r.contribution.nem_mcal).sum(), totals.nem_mcal));
            prop_assert!(close(rows.iter().map(|r| r.contribution.neg_mcal).sum(), totals.neg_mcal));
            prop_assert!(close(rows.iter().map(|r| r.contribution.cp_lbs).sum(), totals.cp_lbs));
            prop_assert!(close(rows.iter().map(|r| r.contribution.ca_g).sum(), totals.ca_g));
            prop_assert!(close(rows.iter().map(|r| r.contribution.p_g).sum(), totals.p_g));
        }
    }

    #[test]
    fn unknown_category_names_default_to_yearlings(name in "[a-z ]{1,24}") {
        prop_assume!(name.parse::<CattleCategory>().is_err());
        prop_assert_eq!(CattleCategory::from_name_or_default(&name).code(), 1.0);
    }
}
