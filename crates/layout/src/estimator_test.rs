#![cfg(test)]

use crate::config::EstimatorConfig;
use crate::estimator::PageEstimator;
use folio_types::{AnchorGeometry, GeometrySample};

fn estimator() -> PageEstimator {
    PageEstimator::new(EstimatorConfig::default())
}

#[test]
fn test_worked_example() {
    // Title and contents measure nothing; content is 1000px + 2000px over 6 pages.
    let sample = GeometrySample::from_heights(&[0.0, 0.0, 1000.0, 2000.0])
        .with_anchor(AnchorGeometry::new("premise", 2, 250.0));

    let estimation = estimator().estimate(&sample, 8);

    assert_eq!(estimation.pixels_per_page, Some(500.0));
    assert_eq!(estimation.start_page(2), Some(3));
    assert_eq!(estimation.section_starts[2].extra_pages, 2);
    assert_eq!(estimation.start_page(3), Some(6));
    assert_eq!(estimation.pages.get("premise"), Some(3));
}

#[test]
fn test_first_content_section_starts_on_page_three() {
    for total_pages in 3..20 {
        let sample = GeometrySample::from_heights(&[300.0, 800.0, 450.0, 1200.0, 90.0]);
        let estimation = estimator().estimate(&sample, total_pages);
        assert_eq!(
            estimation.start_page(2),
            Some(3),
            "total_pages = {}",
            total_pages
        );
    }
}

#[test]
fn test_section_starts_are_monotonic() {
    let heights = [0.0, 0.0, 5000.0, 0.0, 120.0, 3300.0, 0.0, 10.0, 7777.0];
    let sample = GeometrySample::from_heights(&heights);
    let estimation = estimator().estimate(&sample, 17);

    let content: Vec<u32> = estimation
        .section_starts
        .iter()
        .skip(2)
        .map(|s| s.start_page)
        .collect();
    assert_eq!(content.len(), heights.len() - 2);
    assert!(content.windows(2).all(|w| w[0] < w[1]), "{:?}", content);
}

#[test]
fn test_no_content_pages_means_no_estimate() {
    let sample = GeometrySample::from_heights(&[100.0, 100.0, 1000.0])
        .with_anchor(AnchorGeometry::new("theory", 2, 0.0));

    for total_pages in 0..=2 {
        let estimation = estimator().estimate(&sample, total_pages);
        assert!(estimation.pages.is_empty());
        assert_eq!(estimation.pixels_per_page, None);
    }
}

#[test]
fn test_zero_height_content_means_no_estimate() {
    let sample = GeometrySample::from_heights(&[100.0, 100.0, 0.0, 0.0])
        .with_anchor(AnchorGeometry::new("theory", 2, 0.0));

    let estimation = estimator().estimate(&sample, 5);
    assert!(estimation.pages.is_empty());
}

#[test]
fn test_empty_sample_is_harmless() {
    let estimation = estimator().estimate(&GeometrySample::default(), 10);
    assert!(estimation.pages.is_empty());
    assert!(estimation.section_starts.is_empty());
}

#[test]
fn test_every_known_anchor_gets_one_estimate() {
    let sample = GeometrySample::from_heights(&[0.0, 0.0, 1000.0, 1000.0])
        .with_anchor(AnchorGeometry::new("a", 2, 0.0))
        .with_anchor(AnchorGeometry::new("b", 2, 999.0))
        .with_anchor(AnchorGeometry::new("c", 3, 400.0))
        .with_anchor(AnchorGeometry::new("orphan", 9, 0.0));

    let estimation = estimator().estimate(&sample, 6);

    assert_eq!(estimation.pages.len(), 3);
    assert!(!estimation.pages.contains("orphan"));
    for (_, page) in &estimation.pages {
        assert!(*page >= 3);
    }
}

#[test]
fn test_adjustment_pulls_anchors_back() {
    // 500px per page; an anchor at 520px is past one page unadjusted,
    // but within the stretched 550px page.
    let sample = GeometrySample::from_heights(&[0.0, 0.0, 1000.0, 2000.0])
        .with_anchor(AnchorGeometry::new("deep", 2, 520.0));

    let adjusted = estimator().estimate(&sample, 8);
    assert_eq!(adjusted.pages.get("deep"), Some(3));

    let raw = PageEstimator::new(EstimatorConfig::default().with_anchor_adjustment(1.0))
        .estimate(&sample, 8);
    assert_eq!(raw.pages.get("deep"), Some(4));
}

#[test]
fn test_anchor_deep_in_long_section() {
    let sample = GeometrySample::from_heights(&[0.0, 0.0, 1000.0, 2000.0])
        .with_anchor(AnchorGeometry::new("late", 3, 1700.0));

    // Section 3 starts on page 6; 1700 / 550 = 3.09 → three pages later.
    let estimation = estimator().estimate(&sample, 8);
    assert_eq!(estimation.pages.get("late"), Some(9));
}

#[test]
fn test_reserved_section_anchor_gets_its_own_page() {
    let sample = GeometrySample::from_heights(&[100.0, 100.0, 1000.0])
        .with_anchor(AnchorGeometry::new("contents", 1, 20.0));

    let estimation = estimator().estimate(&sample, 4);
    assert_eq!(estimation.pages.get("contents"), Some(2));
}

#[test]
fn test_reserved_heights_do_not_affect_rate() {
    let light = GeometrySample::from_heights(&[0.0, 0.0, 1200.0]);
    let heavy = GeometrySample::from_heights(&[900.0, 4000.0, 1200.0]);

    let e = estimator();
    assert_eq!(e.pixels_per_page(&light, 5), Some(400.0));
    assert_eq!(e.pixels_per_page(&heavy, 5), Some(400.0));
}
