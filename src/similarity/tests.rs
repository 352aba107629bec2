use super::*;
use crate::spectrum::Point;
use crate::tolerance::MzTolerance;

fn tol(abs: f64) -> MzTolerance {
    MzTolerance::absolute(abs).unwrap()
}

fn points(values: &[(f64, f64)]) -> Vec<Point> {
    values.iter().map(|&p| Point::from(p)).collect()
}

fn cosine(weights: WeightsPreset, unmatched: UnmatchedSignals) -> SimilarityFunction {
    SimilarityFunction::WeightedCosine {
        weights,
        min_score: 0.0,
        unmatched,
    }
}

#[test]
fn test_alignment_pairs_closest_free_signal() {
    let library = points(&[(100.0, 5.0), (100.008, 50.0), (300.0, 1.0)]);
    let query = points(&[(100.006, 10.0), (100.001, 3.0), (500.0, 2.0)]);

    let aligned = align_signals(&library, &query, &tol(0.01));

    assert_eq!(aligned.len(), 4);
    assert_eq!(aligned.iter().filter(|p| p.is_matched()).count(), 2);
    // most intense query signal takes the closest library signal
    assert!(aligned.contains(&AlignedPair {
        library: Some(Point::new(100.008, 50.0)),
        query: Some(Point::new(100.006, 10.0)),
    }));
    assert!(aligned.contains(&AlignedPair {
        library: Some(Point::new(100.0, 5.0)),
        query: Some(Point::new(100.001, 3.0)),
    }));
    assert!(aligned.windows(2).all(|w| w[0].mz() <= w[1].mz()));
}

#[test]
fn test_identical_spectra_score_one() {
    let spectrum = points(&[(100.0, 10.0), (150.0, 40.0), (200.0, 25.0)]);
    for function in [
        SimilarityFunction::default(),
        SimilarityFunction::DotProduct { min_score: 0.0 },
        SimilarityFunction::ModifiedCosine {
            weights: WeightsPreset::Nist11,
            min_score: 0.0,
        },
    ] {
        let result = function
            .score(SpectrumView::new(&spectrum), SpectrumView::new(&spectrum), &tol(0.01), 3)
            .unwrap();
        assert!((result.score - 1.0).abs() < 1e-9, "{:?}", function);
        assert_eq!(result.overlap, 3);
        assert_eq!(result.function, function.kind());
    }
}

#[test]
fn test_min_match_and_min_score_reject() {
    let library = points(&[(100.0, 10.0), (200.0, 10.0)]);
    let query = points(&[(100.0, 10.0), (250.0, 10.0)]);
    let function = cosine(WeightsPreset::None, UnmatchedSignals::KeepAll);

    assert!(function
        .score(SpectrumView::new(&library), SpectrumView::new(&query), &tol(0.01), 2)
        .is_none());
    let result = function
        .score(SpectrumView::new(&library), SpectrumView::new(&query), &tol(0.01), 1)
        .unwrap();
    assert!((result.score - 0.5).abs() < 1e-9);

    let strict = SimilarityFunction::WeightedCosine {
        weights: WeightsPreset::None,
        min_score: 0.9,
        unmatched: UnmatchedSignals::KeepAll,
    };
    assert!(strict
        .score(SpectrumView::new(&library), SpectrumView::new(&query), &tol(0.01), 1)
        .is_none());
}

#[test]
fn test_unmatched_policies() {
    let library = points(&[(100.0, 10.0), (200.0, 10.0)]);
    let query = points(&[(100.0, 10.0), (250.0, 10.0), (260.0, 10.0)]);
    let score = |unmatched| {
        cosine(WeightsPreset::None, unmatched)
            .score(SpectrumView::new(&library), SpectrumView::new(&query), &tol(0.01), 1)
            .unwrap()
            .score
    };

    assert!((score(UnmatchedSignals::RemoveAll) - 1.0).abs() < 1e-9);
    assert!((score(UnmatchedSignals::KeepLibrary) - 1.0 / 2f64.sqrt()).abs() < 1e-9);
    assert!((score(UnmatchedSignals::KeepQuery) - 1.0 / 3f64.sqrt()).abs() < 1e-9);
    assert!((score(UnmatchedSignals::KeepAll) - 1.0 / 6f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_dot_product_is_squared_sqrt_cosine() {
    let library = points(&[(100.0, 4.0), (200.0, 16.0)]);
    let query = points(&[(100.0, 16.0), (200.0, 4.0)]);
    let result = SimilarityFunction::DotProduct { min_score: 0.0 }
        .score(SpectrumView::new(&library), SpectrumView::new(&query), &tol(0.01), 1)
        .unwrap();
    // sqrt weights: (2, 4) . (4, 2) = 16, norms 20 and 20
    assert!((result.score - 0.64).abs() < 1e-9);
}

#[test]
fn test_modified_cosine_uses_precursor_shift() {
    let library = points(&[(100.0, 10.0), (250.0, 20.0)]);
    let query = points(&[(100.0, 10.0), (264.0, 20.0)]);
    let function = SimilarityFunction::ModifiedCosine {
        weights: WeightsPreset::Sqrt,
        min_score: 0.0,
    };

    let shifted = function
        .score(
            SpectrumView::new(&library).with_precursor(Some(300.0)),
            SpectrumView::new(&query).with_precursor(Some(314.0)),
            &tol(0.01),
            2,
        )
        .unwrap();
    assert_eq!(shifted.overlap, 2);
    assert!((shifted.score - 1.0).abs() < 1e-9);

    // without precursors only the direct match remains
    let direct = function
        .score(SpectrumView::new(&library), SpectrumView::new(&query), &tol(0.01), 1)
        .unwrap();
    assert_eq!(direct.overlap, 1);
}

#[test]
fn test_crop_to_overlap() {
    let library = points(&[(50.0, 1.0), (100.0, 1.0), (200.0, 1.0)]);
    let query = points(&[(99.995, 1.0), (150.0, 1.0), (400.0, 1.0)]);
    let (lib, q) = crop_to_overlap(&tol(0.01), &library, &query);
    assert_eq!(lib, points(&[(100.0, 1.0), (200.0, 1.0)]));
    assert_eq!(q, points(&[(99.995, 1.0), (150.0, 1.0)]));

    let (lib, q) = crop_to_overlap(&tol(0.01), &library, &[]);
    assert!(lib.is_empty() && q.is_empty());

    let (lib, q) = crop_to_overlap(&tol(0.01), &points(&[(10.0, 1.0)]), &points(&[(20.0, 1.0)]));
    assert!(lib.is_empty() && q.is_empty());
}

#[test]
fn test_remove_precursor() {
    let spectrum = points(&[(150.0, 1.0), (299.995, 5.0), (300.0, 9.0), (300.02, 2.0)]);
    assert_eq!(
        remove_precursor(&spectrum, 300.0, &tol(0.01)),
        points(&[(150.0, 1.0), (300.02, 2.0)])
    );
}

#[test]
fn test_similarity_config_from_toml() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        similarity: SimilarityFunction,
    }

    let wrapper: Wrapper = toml::from_str(
        r#"
            [similarity]
            type = "weighted_cosine"
            weights = "nist11"
            unmatched = "keep_library"
        "#,
    )
    .unwrap();
    assert_eq!(
        wrapper.similarity,
        SimilarityFunction::WeightedCosine {
            weights: WeightsPreset::Nist11,
            min_score: 0.65,
            unmatched: UnmatchedSignals::KeepLibrary,
        }
    );

    let wrapper: Wrapper = toml::from_str("similarity = { type = \"dot_product\", min_score = 0.5 }").unwrap();
    assert_eq!(wrapper.similarity, SimilarityFunction::DotProduct { min_score: 0.5 });
}
