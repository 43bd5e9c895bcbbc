//! Classification regression test
//!
//! Trains on synthetic green and brown leaf collections, then checks the
//! dataset layout, held-out evaluation, prediction of unseen leaves,
//! persistence and the registry-backed model context.

use leafscan_classify::{
    DatasetBuilder, Label, ModelContext, ModelRegistry, TrainOptions, TrainedModel, run_training,
};
use leafscan_features::extract;
use leafscan_test::{
    HEALTHY_GREEN, NECROTIC_BROWN, RegParams, noisy_leaf, write_corrupt_file,
    write_leaf_collection, write_png_fixture,
};

#[test]
fn classify_reg() {
    let mut rp = RegParams::new("classify");
    let root = tempfile::tempdir().unwrap();
    let healthy_dir = root.path().join("healthy");
    let unhealthy_dir = root.path().join("unhealthy");
    write_leaf_collection(&healthy_dir, "green", HEALTHY_GREEN, 10, 1000).unwrap();
    write_leaf_collection(&unhealthy_dir, "brown", NECROTIC_BROWN, 10, 2000).unwrap();
    write_corrupt_file(&unhealthy_dir, "brown_999.jpg").unwrap();

    // --- Test 1: dataset layout, corrupt file skipped ---
    let builder = DatasetBuilder::new(&healthy_dir, &unhealthy_dir);
    let dataset = builder.build().unwrap();
    rp.compare_values(20.0, dataset.len() as f64, 0.0);
    rp.compare_values(1.0, dataset.skipped().len() as f64, 0.0);
    let labels = dataset.labels();
    rp.check(labels.iter().take(10).all(|&l| l == 1), "healthy first");
    rp.check(labels.iter().skip(10).all(|&l| l == 0), "unhealthy last");

    // --- Test 2: training run and held-out evaluation ---
    let (model, report) = run_training(&builder, &TrainOptions::default()).unwrap();
    eprintln!("{}", report);
    rp.compare_values(20.0, report.total() as f64, 0.0);
    rp.compare_values(4.0, report.n_test as f64, 0.0);
    rp.compare_values(16.0, report.n_train as f64, 0.0);
    rp.compare_values(1.0, report.evaluation.accuracy(), 0.0);
    rp.compare_values(4.0, report.spot_checks.len() as f64, 0.0);
    rp.check(
        report
            .spot_checks
            .iter()
            .all(|c| c.prediction.is_some_and(|p| p.label == c.truth)),
        "spot checks agree with truth",
    );

    // --- Test 3: unseen leaves ---
    let green = noisy_leaf(120, 90, HEALTHY_GREEN, 12, 77).unwrap();
    let brown = noisy_leaf(120, 90, NECROTIC_BROWN, 12, 78).unwrap();
    let green_path = write_png_fixture(root.path(), "probe_green.png", &green).unwrap();
    let result = model.classify_image(&green_path).unwrap();
    rp.check(
        result.prediction.label == Label::Healthy,
        "green is healthy",
    );
    rp.check(
        (0.5..=1.0).contains(&result.prediction.confidence),
        "confidence range",
    );
    let brown_pred = model.predict(&extract(&brown).unwrap()).unwrap();
    rp.check(brown_pred.label == Label::Unhealthy, "brown is unhealthy");
    rp.compare_values(
        brown_pred.probabilities.unhealthy,
        brown_pred.confidence,
        0.0,
    );

    // --- Test 4: persisted model predicts identically ---
    let model_path = root.path().join("leaf.lsm");
    model.save(&model_path).unwrap();
    let restored = TrainedModel::load(&model_path).unwrap();
    for sample in dataset.samples() {
        let a = model.predict(&sample.features).unwrap();
        let b = restored.predict(&sample.features).unwrap();
        rp.check(
            a.label == b.label
                && a.probabilities.healthy.to_bits() == b.probabilities.healthy.to_bits(),
            "restored prediction identical",
        );
    }

    // --- Test 5: dimension mismatch is rejected ---
    rp.check(
        model.predict_values(&[1.0, 2.0, 3.0]).is_err(),
        "short vector",
    );

    // --- Test 6: registry and active-model swap ---
    let registry_path = root.path().join("models.toml");
    std::fs::write(
        &registry_path,
        "default = \"leaf\"\n\n[models]\nleaf = \"leaf.lsm\"\nbroken = \"broken.lsm\"\n",
    )
    .unwrap();
    write_corrupt_file(root.path(), "broken.lsm").unwrap();
    let registry = ModelRegistry::load(&registry_path).unwrap();
    let context = ModelContext::with_default(registry).unwrap();
    rp.check(
        context.active_name().as_deref() == Some("leaf"),
        "default active",
    );
    rp.check(context.select("broken").is_err(), "corrupt model rejected");
    rp.check(
        context.active_name().as_deref() == Some("leaf"),
        "previous model kept after failed select",
    );
    let via_context = context.classify_image(&green_path).unwrap();
    rp.compare_values(
        result.prediction.confidence,
        via_context.prediction.confidence,
        0.0,
    );

    assert!(rp.cleanup(), "classify regression test failed");
}
