use super::range_map::ClusterMap;
use super::*;
use crate::spectrum::{IndexedPoint, Point, Spectrum, SpectrumBuilder};
use crate::tolerance::{MzRange, MzTolerance};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tol(abs: f64) -> MzTolerance {
    MzTolerance::absolute(abs).unwrap()
}

fn spectrum(points: &[(f64, f64)]) -> Spectrum {
    Spectrum::new(points.iter().map(|&p| Point::from(p)).collect())
}

fn linear_avg() -> CenterFunction {
    CenterFunction::new(CenterMeasure::Avg, Weighting::Linear)
}

#[test]
fn test_empty_input_yields_empty_result() {
    let merged =
        calculate_merged_mzs_and_intensities::<Vec<Point>>(&[], 0.0, &tol(0.01), MergingType::Summed, &linear_avg())
            .unwrap();
    assert!(merged.is_empty());

    let merged = merge_spectra(&[Spectrum::new(vec![])], 0.0, &tol(0.01), MergingType::Summed, &linear_avg())
        .unwrap();
    assert!(merged.is_empty());
}

#[test]
fn test_three_source_consensus() {
    init_logging();
    let sources = vec![
        spectrum(&[(100.000, 50.0)]),
        spectrum(&[(100.005, 70.0)]),
        spectrum(&[(150.000, 30.0)]),
    ];

    let merged = merge_spectra(&sources, 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();

    assert_eq!(merged.len(), 2);
    let first = merged.points[0];
    let expected_mz = (100.000 * 50.0 + 100.005 * 70.0) / 120.0;
    assert!((first.mz - expected_mz).abs() < 1e-9);
    assert!((first.mz - 100.002).abs() < 0.001);
    assert_eq!(first.intensity, 120.0);
    assert_eq!(merged.points[1], Point::new(150.0, 30.0));
}

#[test]
fn test_merging_types() {
    let sources = vec![spectrum(&[(200.0, 10.0)]), spectrum(&[(200.001, 30.0)])];
    let run = |merging_type| {
        merge_spectra(&sources, 0.0, &tol(0.01), merging_type, &linear_avg())
            .unwrap()
            .points[0]
            .intensity
    };
    assert_eq!(run(MergingType::Summed), 40.0);
    assert_eq!(run(MergingType::Maximum), 30.0);
    assert_eq!(run(MergingType::Average), 20.0);
}

#[test]
fn test_same_source_signals_stay_apart() {
    let sources = vec![spectrum(&[(100.0, 50.0), (100.004, 40.0), (100.006, 30.0)])];
    let merged = merge_spectra(&sources, 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();

    assert_eq!(
        merged.points,
        vec![
            Point::new(100.0, 50.0),
            Point::new(100.004, 40.0),
            Point::new(100.006, 30.0),
        ]
    );
}

#[test]
fn test_different_sources_within_tolerance_join() {
    let sources = vec![
        spectrum(&[(300.0, 10.0)]),
        spectrum(&[(300.004, 20.0)]),
        spectrum(&[(299.996, 5.0)]),
    ];
    let merged = merge_spectra(&sources, 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.points[0].intensity, 35.0);
}

#[test]
fn test_noise_floor_is_exclusive() {
    let sources = vec![spectrum(&[(100.0, 5.0), (200.0, 6.0)])];
    let merged = merge_spectra(&sources, 5.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();
    assert_eq!(merged.points, vec![Point::new(200.0, 6.0)]);
}

#[test]
fn test_merging_consensus_again_is_stable() {
    let source = spectrum(&[(250.0, 7.0), (100.005, 20.0), (100.2, 5.0), (100.0, 10.0)]);
    let once = merge_spectra(&[source], 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();
    assert_eq!(
        once.points,
        vec![
            Point::new(100.0, 10.0),
            Point::new(100.005, 20.0),
            Point::new(100.2, 5.0),
            Point::new(250.0, 7.0),
        ]
    );

    let twice =
        merge_spectra(&[once.clone()], 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn test_split_moves_members_with_the_carved_range() {
    let sources = vec![
        spectrum(&[(100.000, 100.0), (100.006, 80.0)]),
        spectrum(&[(100.008, 90.0), (100.001, 70.0)]),
    ];
    let merged = merge_spectra(&sources, 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();

    assert_eq!(merged.len(), 2);
    let low = (100.000 * 100.0 + 100.001 * 70.0) / 170.0;
    let high = (100.006 * 80.0 + 100.008 * 90.0) / 170.0;
    assert!((merged.points[0].mz - low).abs() < 1e-9);
    assert!((merged.points[1].mz - high).abs() < 1e-9);
    assert_eq!(merged.intensities(), vec![170.0, 170.0]);

    let again = merge_spectra(&[merged.clone()], 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();
    assert_eq!(again, merged);
}

#[test]
fn test_split_reroutes_member_of_the_colliding_source() {
    let tolerance = tol(0.01);
    let mut map = ClusterMap::new();
    map.insert(IndexedPoint::new(Point::new(100.000, 100.0), 0), &tolerance);
    map.insert(IndexedPoint::new(Point::new(100.008, 90.0), 1), &tolerance);
    map.insert(IndexedPoint::new(Point::new(100.002, 80.0), 1), &tolerance);

    assert_eq!(map.ranges().len(), 3);
    assert_eq!(map.detached_count(), 0);
    for cluster in map.into_clusters() {
        assert_eq!(cluster.members.len(), 1);
        assert!(cluster.members.values().all(|m| cluster.range.contains(m.mz)));
    }

    let sources = vec![
        spectrum(&[(100.000, 100.0)]),
        spectrum(&[(100.008, 90.0), (100.002, 80.0)]),
    ];
    let merged = merge_spectra(&sources, 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap();
    assert_eq!(
        merged.points,
        vec![
            Point::new(100.000, 100.0),
            Point::new(100.002, 80.0),
            Point::new(100.008, 90.0),
        ]
    );
}

#[test]
fn test_new_window_is_clipped_against_neighbor() {
    let tolerance = tol(0.01);
    let mut map = ClusterMap::new();
    map.insert(IndexedPoint::new(Point::new(100.0, 10.0), 0), &tolerance);
    map.insert(IndexedPoint::new(Point::new(100.015, 5.0), 1), &tolerance);

    let ranges = map.ranges();
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0], MzRange::closed(100.0 - 0.01, 100.0 + 0.01));
    assert_eq!(ranges[1], MzRange::open_closed(100.0 + 0.01, 100.015 + 0.01));
    assert!(!ranges[0].overlaps(&ranges[1]));
}

#[test]
fn test_window_between_two_neighbors_is_open() {
    let tolerance = tol(0.01);
    let mut map = ClusterMap::new();
    map.insert(IndexedPoint::new(Point::new(100.0, 10.0), 0), &tolerance);
    map.insert(IndexedPoint::new(Point::new(100.03, 9.0), 0), &tolerance);
    map.insert(IndexedPoint::new(Point::new(100.015, 1.0), 1), &tolerance);

    let ranges = map.ranges();
    assert_eq!(ranges.len(), 3);
    assert_eq!(ranges[1], MzRange::open(100.0 + 0.01, 100.03 - 0.01));
    assert!(ranges[1].contains(100.015));
}

#[test]
fn test_ranges_stay_disjoint() {
    let tolerance = tol(0.02);
    let mut map = ClusterMap::new();
    let mut inputs = Vec::new();
    for i in 0..60 {
        let mz = 100.0 + (i as f64 * 0.0137) % 0.5;
        inputs.push(IndexedPoint::new(Point::new(mz, 1000.0 - i as f64), i % 4));
    }
    for p in &inputs {
        map.insert(*p, &tolerance);
    }

    let ranges = map.ranges();
    for (i, a) in ranges.iter().enumerate() {
        assert!(!a.is_empty());
        for b in ranges.iter().skip(i + 1) {
            assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
        }
    }

    let clusters = map.into_clusters();
    let members: usize = clusters.iter().map(|c| c.members.len()).sum();
    assert_eq!(members, inputs.len());
    for cluster in &clusters {
        assert!(cluster.members.values().all(|m| cluster.range.contains(m.mz)));
    }
}

#[test]
fn test_identical_duplicate_becomes_detached_cluster() {
    let sources = vec![spectrum(&[(100.0, 10.0), (100.0, 5.0)])];
    let merger = SpectraMerger::new(MergeConfig {
        tolerance: tol(0.01),
        ..Default::default()
    })
    .unwrap();
    let (merged, stats) = merger.merge_with_stats(&sources).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(stats.detached_clusters, 1);
    assert_eq!(merged.total_ion_current(), 15.0);
}

#[test]
fn test_invalid_input_rejected() {
    let sources = vec![spectrum(&[(100.0, 1.0)]), spectrum(&[(f64::NAN, 1.0)])];
    let err = merge_spectra(&sources, 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).unwrap_err();
    assert!(matches!(err, MergeError::InvalidInput { source_index: 1, .. }));

    let sources = vec![spectrum(&[(100.0, -1.0)])];
    assert!(merge_spectra(&sources, 0.0, &tol(0.01), MergingType::Summed, &linear_avg()).is_err());

    let bad_tolerance = MzTolerance {
        absolute: -0.01,
        ppm: 0.0,
    };
    assert!(matches!(
        merge_spectra(&[], 0.0, &bad_tolerance, MergingType::Summed, &linear_avg()),
        Err(MergeError::InvalidTolerance(_))
    ));
    assert!(matches!(
        merge_spectra(&[], f64::NAN, &tol(0.01), MergingType::Summed, &linear_avg()),
        Err(MergeError::InvalidNoiseLevel(_))
    ));
}

#[test]
fn test_center_functions() {
    let mzs = [100.0, 101.0, 102.0];
    let intensities = [1.0, 1.0, 10.0];

    let avg = CenterFunction::new(CenterMeasure::Avg, Weighting::None).calc_center(&mzs, &intensities);
    assert!((avg - 101.0).abs() < 1e-12);

    let linear = linear_avg().calc_center(&mzs, &intensities);
    assert!((linear - (100.0 + 101.0 + 1020.0) / 12.0).abs() < 1e-9);

    let median = CenterFunction::new(CenterMeasure::Median, Weighting::Linear).calc_center(&mzs, &intensities);
    assert_eq!(median, 102.0);

    // zero weights fall back to equal weighting
    let zero = linear_avg().calc_center(&[10.0, 20.0], &[0.0, 0.0]);
    assert!((zero - 15.0).abs() < 1e-12);
}

#[test]
fn test_merge_config_from_toml() {
    let config = MergeConfig::from_toml_str(
        r#"
            noise_level = 100.0
            merging_type = "maximum"

            [tolerance]
            absolute = 0.005
            ppm = 10.0

            [center_function]
            measure = "median"
            weighting = "sqrt"
        "#,
    )
    .unwrap();

    assert_eq!(config.noise_level, 100.0);
    assert_eq!(config.merging_type, MergingType::Maximum);
    assert_eq!(config.tolerance.ppm, 10.0);
    assert_eq!(config.center_function.measure, CenterMeasure::Median);
    assert_eq!(config.center_function.weighting, Weighting::Sqrt);

    assert!(matches!(
        MergeConfig::from_toml_str("noise_level = -1.0"),
        Err(MergeError::InvalidNoiseLevel(_))
    ));
    assert!(matches!(
        MergeConfig::from_toml_str("merging_type = \"median\""),
        Err(MergeError::ConfigParse(_))
    ));
}

#[test]
fn test_pasef_merge_selects_scan_range() {
    let frame = MobilityFrame {
        frame_number: 42,
        ms_level: 2,
        retention_time: Some(12.5),
        mobility_scans: vec![
            MobilityScan {
                mobility_scan_number: 1,
                mobility: 1.30,
                points: vec![Point::new(700.0, 100.0)],
            },
            MobilityScan {
                mobility_scan_number: 2,
                mobility: 1.25,
                points: vec![Point::new(500.0, 100.0), Point::new(600.0, 10.0)],
            },
            MobilityScan {
                mobility_scan_number: 3,
                mobility: 1.20,
                points: vec![Point::new(500.002, 50.0)],
            },
        ],
    };
    let info = PasefMsMsInfo {
        spectrum_number_range: 2..=3,
        collision_energy: Some(35.0),
        largest_peak_mz: 650.3,
        precursor_charge: Some(2),
    };

    let merged = merge_pasef_msms(&info, &frame, 0.0, &tol(0.01), MergingType::Summed)
        .unwrap()
        .unwrap();

    assert_eq!(merged.source_scan_numbers, vec![2, 3]);
    assert_eq!(merged.frame_number, 42);
    assert_eq!(merged.collision_energy, Some(35.0));
    assert_eq!(merged.spectrum.ms_level, 2);
    assert_eq!(merged.spectrum.precursor_mz, Some(650.3));
    assert_eq!(merged.spectrum.mobility, Some(1.25));
    assert_eq!(merged.spectrum.len(), 2);
    assert_eq!(merged.spectrum.points[0].intensity, 150.0);
    assert_eq!(merged.spectrum.points[1], Point::new(600.0, 10.0));

    let outside = PasefMsMsInfo {
        spectrum_number_range: 10..=20,
        ..info
    };
    assert!(merge_pasef_msms(&outside, &frame, 0.0, &tol(0.01), MergingType::Summed)
        .unwrap()
        .is_none());
}

#[test]
fn test_builder_spectra_merge() {
    let a = SpectrumBuilder::new().add_point(400.0, 1.0).add_point(500.0, 2.0).build();
    let b = SpectrumBuilder::new().add_point(400.001, 3.0).build();
    let merged = merge_spectra(&[a, b], 0.0, &tol(0.005), MergingType::Summed, &linear_avg()).unwrap();
    assert_eq!(merged.intensities(), vec![4.0, 2.0]);
}
