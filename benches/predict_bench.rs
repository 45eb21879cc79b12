//! Benchmarks for feature shaping and model evaluation.

use std::collections::HashMap;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use engine_rul::inference::features::FeatureVector;
use engine_rul::inference::model::{Model, Node, Regressor, TreeEnsembleSpec, TreeSpec};
use engine_rul::inference::model_loader::load_model;

fn sensors() -> HashMap<String, Value> {
    serde_json::from_value(json!({
        "s2": 642.58, "s3": 1581.22, "s4": 1398.91, "s7": 554.42,
        "s8": 2388.08, "s9": 9056.40, "s11": 47.23, "s12": 521.79,
        "s13": 2388.06, "s15": 8.4024, "s17": 393.0, "s20": 38.81, "s21": 23.3552
    }))
    .unwrap()
}

/// A complete binary tree of the given depth cycling through all features.
fn full_tree(depth: usize) -> TreeSpec {
    let internal = (1 << depth) - 1;
    let mut nodes = Vec::with_capacity(2 * internal + 1);
    for i in 0..internal {
        nodes.push(Node::Split {
            feature: i % 13,
            threshold: 500.0 + i as f64,
            yes: 2 * i + 1,
            no: 2 * i + 2,
            missing: None,
        });
    }
    for i in 0..=internal {
        nodes.push(Node::Leaf {
            leaf: (i as f64) * 0.01,
        });
    }
    TreeSpec { nodes }
}

fn bench_feature_shaping(c: &mut Criterion) {
    let map = sensors();

    c.bench_function("shape_13_sensors", |b| {
        b.iter(|| black_box(FeatureVector::from_sensor_map(black_box(&map))))
    });
}

fn bench_sample_model(c: &mut Criterion) {
    let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/sample_model.json"));
    let model = load_model(path).unwrap();
    let row = FeatureVector::from_sensor_map(&sensors()).unwrap();

    c.bench_function("predict_sample_model", |b| {
        b.iter(|| black_box(model.predict(black_box(&row))))
    });
}

fn bench_large_ensemble(c: &mut Criterion) {
    // 300 trees of depth 6, roughly an exported XGBoost regressor.
    let spec = TreeEnsembleSpec {
        base_score: 100.0,
        trees: (0..300).map(|_| full_tree(6)).collect(),
    };
    let model = Model::TreeEnsemble(spec.try_into().unwrap());
    let row = FeatureVector::from_sensor_map(&sensors()).unwrap();

    c.bench_function("predict_300_trees_depth_6", |b| {
        b.iter(|| black_box(model.predict(black_box(&row))))
    });
}

criterion_group!(
    benches,
    bench_feature_shaping,
    bench_sample_model,
    bench_large_ensemble,
);
criterion_main!(benches);
