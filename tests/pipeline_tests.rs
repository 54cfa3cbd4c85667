mod common;

use common::fixtures::{pdf_with_destinations, pdf_with_pages};
use common::{FakeTypesetter, Scenario, TestResult, fixture_document, placeholder_text};
use folio::{DocumentPipeline, PipelineBuilder, PipelineError, Stage};
use std::sync::Arc;
use std::time::Duration;

fn pipeline(typesetter: &FakeTypesetter) -> DocumentPipeline {
    PipelineBuilder::new()
        .with_typesetter(Arc::new(typesetter.clone()))
        .with_settle_delays(Duration::ZERO, Duration::ZERO)
        .with_debug(true)
        .build()
        .unwrap()
}

fn final_html(typesetter: &FakeTypesetter) -> String {
    typesetter.loaded().last().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_two_pass_run_injects_estimates() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let typesetter = FakeTypesetter::new(Scenario::default());

    let output = pipeline(&typesetter)
        .generate_with_report(&fixture_document())
        .await?;

    let loaded = typesetter.loaded();
    assert_eq!(loaded.len(), 2);
    assert_eq!(placeholder_text(&loaded[0], "theory").as_deref(), Some("…"));

    let html = final_html(&typesetter);
    assert_eq!(placeholder_text(&html, "theory").as_deref(), Some("3"));
    assert_eq!(placeholder_text(&html, "premise").as_deref(), Some("3"));
    assert_eq!(placeholder_text(&html, "practice").as_deref(), Some("6"));
    assert_eq!(placeholder_text(&html, "late").as_deref(), Some("9"));

    let report = output.report;
    assert_eq!(report.pass1_pages, Some(8));
    assert_eq!(report.final_pages, Some(8));
    assert_eq!(report.anchors_sampled, 4);
    assert_eq!(report.anchors_estimated, 4);
    assert_eq!(report.placeholders_filled, 4);
    assert!(report.unresolved.is_empty());
    // The fixture artifact has no destination table.
    assert_eq!(report.degraded, vec![Stage::Pass1Extract]);
    assert!(!output.pdf.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_one_context_for_both_passes_and_it_is_released() -> TestResult {
    let typesetter = FakeTypesetter::new(Scenario::default());
    pipeline(&typesetter).generate(&fixture_document()).await?;

    assert_eq!(typesetter.opened(), 1);
    assert_eq!(typesetter.closed(), 1);
    Ok(())
}

#[tokio::test]
async fn test_exact_destinations_override_estimates() -> TestResult {
    let first = pdf_with_destinations(12, &[("late", 11), ("theory", 3), ("unrelated", 1)]);
    let typesetter = FakeTypesetter::new(Scenario {
        artifacts: vec![first, pdf_with_pages(12)],
        ..Scenario::default()
    });

    let output = pipeline(&typesetter)
        .generate_with_report(&fixture_document())
        .await?;

    let html = final_html(&typesetter);
    assert_eq!(placeholder_text(&html, "late").as_deref(), Some("11"));
    assert_eq!(placeholder_text(&html, "theory").as_deref(), Some("3"));
    assert_eq!(output.report.anchors_exact, 2);
    assert_eq!(output.report.final_pages, Some(12));
    assert!(!output.report.degraded.contains(&Stage::Pass1Extract));
    Ok(())
}

#[tokio::test]
async fn test_sampling_failure_falls_back_to_exact_only() -> TestResult {
    let first = pdf_with_destinations(8, &[("practice", 7)]);
    let typesetter = FakeTypesetter::new(Scenario {
        artifacts: vec![first],
        geometry: None,
        ..Scenario::default()
    });

    let output = pipeline(&typesetter)
        .generate_with_report(&fixture_document())
        .await?;

    let html = final_html(&typesetter);
    assert_eq!(placeholder_text(&html, "practice").as_deref(), Some("7"));
    assert_eq!(placeholder_text(&html, "theory").as_deref(), Some("…"));
    assert!(output.report.degraded.contains(&Stage::Pass1Sample));
    let unresolved: Vec<&str> = output.report.unresolved.iter().map(|id| id.as_str()).collect();
    assert_eq!(unresolved, vec!["late", "premise", "theory"]);
    Ok(())
}

#[tokio::test]
async fn test_unreadable_first_artifact_still_renders() -> TestResult {
    let typesetter = FakeTypesetter::new(Scenario {
        artifacts: vec![b"%PDF-garbage".to_vec(), pdf_with_pages(3)],
        ..Scenario::default()
    });

    let output = pipeline(&typesetter)
        .generate_with_report(&fixture_document())
        .await?;

    assert_eq!(output.report.pass1_pages, None);
    assert!(output.report.degraded.contains(&Stage::Estimate));
    assert!(output.report.degraded.contains(&Stage::Pass1Extract));
    assert_eq!(output.report.placeholders_filled, 0);
    assert_eq!(output.report.final_pages, Some(3));
    Ok(())
}

#[tokio::test]
async fn test_too_few_pages_gives_no_estimate() -> TestResult {
    let typesetter = FakeTypesetter::new(Scenario {
        artifacts: vec![pdf_with_pages(2)],
        ..Scenario::default()
    });

    let output = pipeline(&typesetter)
        .generate_with_report(&fixture_document())
        .await?;

    assert_eq!(output.report.anchors_estimated, 0);
    assert_eq!(output.report.unresolved.len(), 4);
    assert!(output.report.degraded.contains(&Stage::Estimate));
    Ok(())
}

#[tokio::test]
async fn test_prepare_script_failures_are_tolerated() -> TestResult {
    let typesetter = FakeTypesetter::new(Scenario {
        fail_prepare_scripts: true,
        ..Scenario::default()
    });

    let output = pipeline(&typesetter)
        .generate_with_report(&fixture_document())
        .await?;

    assert_eq!(output.report.placeholders_filled, 4);
    let scripts = typesetter.scripts();
    assert_eq!(
        scripts,
        vec![
            "await-fonts",
            "typeset-math",
            "sample-geometry",
            "await-fonts",
            "typeset-math"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_pass_one_load_failure_is_fatal_and_releases_context() {
    let typesetter = FakeTypesetter::new(Scenario {
        fail_load_on_pass: Some(1),
        ..Scenario::default()
    });

    let err = pipeline(&typesetter)
        .generate(&fixture_document())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Render {
            stage: Stage::Pass1Render,
            ..
        }
    ));
    assert_eq!(typesetter.closed(), 1);
}

#[tokio::test]
async fn test_pass_two_print_failure_is_fatal() {
    let typesetter = FakeTypesetter::new(Scenario {
        fail_print_on_pass: Some(2),
        ..Scenario::default()
    });

    let err = pipeline(&typesetter)
        .generate(&fixture_document())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Pass2Render));
    assert_eq!(typesetter.closed(), 1);
}

#[tokio::test]
async fn test_unavailable_service_is_fatal() {
    let typesetter = FakeTypesetter::new(Scenario {
        fail_open: true,
        ..Scenario::default()
    });

    let err = pipeline(&typesetter)
        .generate(&fixture_document())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ServiceUnavailable(_)));
    assert_eq!(typesetter.opened(), 0);
}

#[tokio::test]
async fn test_timeout_aborts_and_releases_context() {
    let typesetter = FakeTypesetter::new(Scenario {
        hang_print_on_pass: Some(2),
        ..Scenario::default()
    });
    let pipeline = PipelineBuilder::new()
        .with_typesetter(Arc::new(typesetter.clone()))
        .with_settle_delays(Duration::ZERO, Duration::ZERO)
        .with_timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = pipeline.generate(&fixture_document()).await.unwrap_err();

    assert!(matches!(err, PipelineError::Timeout(_)));
    assert_eq!(typesetter.opened(), 1);
    assert_eq!(typesetter.closed(), 1);
}

#[tokio::test]
async fn test_wedged_context_does_not_outlive_release_timeout() {
    let typesetter = FakeTypesetter::new(Scenario {
        hang_print_on_pass: Some(1),
        hang_close: true,
        ..Scenario::default()
    });
    let pipeline = PipelineBuilder::new()
        .with_typesetter(Arc::new(typesetter.clone()))
        .with_settle_delays(Duration::ZERO, Duration::ZERO)
        .with_timeout(Duration::from_millis(200))
        .with_release_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let document = fixture_document();
    let result = tokio::time::timeout(Duration::from_secs(3), pipeline.generate(&document)).await;

    let outcome = result.expect("generation must return once the release timeout expires");
    assert!(matches!(outcome, Err(PipelineError::Timeout(_))));
    assert_eq!(typesetter.opened(), 1);
    assert_eq!(typesetter.closed(), 0);
}

#[tokio::test]
async fn test_generate_to_file_replaces_previous_artifact() -> TestResult {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("public").join("document.pdf");
    std::fs::create_dir_all(target.parent().unwrap())?;
    std::fs::write(&target, b"stale")?;

    let typesetter = FakeTypesetter::new(Scenario::default());
    let report = pipeline(&typesetter)
        .generate_to_file(&fixture_document(), &target)
        .await?;

    let written = std::fs::read(&target)?;
    assert!(written.starts_with(b"%PDF"));
    assert_eq!(report.final_pages, Some(8));
    Ok(())
}

#[test]
fn test_builder_rejects_bad_adjustment() {
    let typesetter = FakeTypesetter::new(Scenario::default());
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = PipelineBuilder::new()
            .with_typesetter(Arc::new(typesetter.clone()))
            .with_anchor_adjustment(bad)
            .build();
        assert!(matches!(result, Err(PipelineError::Config(_))), "{}", bad);
    }
}

#[test]
fn test_builder_requires_typesetter() {
    assert!(matches!(
        PipelineBuilder::new().build(),
        Err(PipelineError::Config(_))
    ));
}
