use cattle_nutrition_core::{
    BlendConfig, CattleCategory, CattleInfo, FeedBlendComposer, ModelBundle, NutrientTarget,
    NutritionPredictor, RandomForest, RegressionTree, StandardScaler, TargetModel,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

const TREES_PER_TARGET: usize = 100;
const TREE_DEPTH: u32 = 8;
const BATCH_SIZE: usize = 256;

/// Complete binary tree in breadth-first order, splitting on every feature in turn
fn complete_tree(seed: usize) -> RegressionTree {
    let internal = (1usize << TREE_DEPTH) - 1;
    let n = (1usize << (TREE_DEPTH + 1)) - 1;
    let mut left = vec![-1i64; n];
    let mut right = vec![-1i64; n];
    let mut feature = vec![-2i64; n];
    let mut threshold = vec![0.0; n];
    let mut value = vec![0.0; n];

    for i in 0..n {
        if i < internal {
            left[i] = (2 * i + 1) as i64;
            right[i] = (2 * i + 2) as i64;
            feature[i] = ((i + seed) % 4) as i64;
            threshold[i] = ((i * 7 + seed) % 11) as f64 / 5.0 - 1.0;
        } else {
            value[i] = ((i + seed) % 97) as f64 / 10.0;
        }
    }
    RegressionTree::new(left, right, feature, threshold, value).expect("valid benchmark tree")
}

fn sample_bundle() -> Arc<ModelBundle> {
    let features = ["type", "target_weight", "Body weight (lbs)", "ADG (lbs)"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let parts = NutrientTarget::ALL
        .iter()
        .enumerate()
        .map(|(t, target)| {
            let trees = (0..TREES_PER_TARGET).map(|k| complete_tree(t * 31 + k)).collect();
            (
                target.column_name().to_string(),
                TargetModel::new(
                    RandomForest::new(trees, 4),
                    StandardScaler::new(vec![10.0], vec![2.5]),
                ),
            )
        })
        .collect();
    let scaler = StandardScaler::new(vec![1.0, 1000.0, 500.0, 2.0], vec![0.5, 300.0, 200.0, 0.8]);
    Arc::new(ModelBundle::from_parts(features, scaler, parts).expect("valid benchmark bundle"))
}

fn sample_info(i: usize) -> CattleInfo {
    CattleInfo {
        category: CattleCategory::ALL[i % 3],
        target_weight: 1200.0 + (i % 5) as f64 * 40.0,
        body_weight: 500.0 + (i % 13) as f64 * 30.0,
        average_daily_gain: 1.5 + (i % 7) as f64 * 0.25,
    }
}

fn bench_single_prediction(c: &mut Criterion) {
    let predictor = NutritionPredictor::new(sample_bundle()).expect("four features");
    let info = sample_info(1);

    c.bench_function("predict_thirteen_targets", |b| {
        b.iter(|| black_box(predictor.predict(black_box(&info))));
    });
}

fn bench_batch_prediction(c: &mut Criterion) {
    let predictor = NutritionPredictor::new(sample_bundle()).expect("four features");
    let infos: Vec<CattleInfo> = (0..BATCH_SIZE).map(sample_info).collect();

    let mut group = c.benchmark_group("predict_batch");
    group.throughput(Throughput::Elements(BATCH_SIZE as u64));
    group.bench_function("rayon", |b| {
        b.iter(|| black_box(predictor.predict_batch(black_box(&infos))));
    });
    group.finish();
}

fn bench_blend(c: &mut Criterion) {
    let predictor = NutritionPredictor::new(sample_bundle()).expect("four features");
    let prediction = predictor.predict(&sample_info(2));
    let composer = FeedBlendComposer::new(BlendConfig::default()).expect("default config");

    c.bench_function("compose_feed_menu", |b| {
        b.iter(|| black_box(composer.compose(black_box(&prediction), &["Corn Silage"])));
    });
}

criterion_group!(
    nutrition_benches,
    bench_single_prediction,
    bench_batch_prediction,
    bench_blend
);
criterion_main!(nutrition_benches);
