#![no_main]

use libfuzzer_sys::fuzz_target;
use mzmatch::merging::{calculate_merged_mzs_and_intensities, CenterFunction, MergingType};
use mzmatch::spectrum::Point;
use mzmatch::tolerance::MzTolerance;

fuzz_target!(|data: &[u8]| {
    // First byte: number of sources, second byte: tolerance in mDa
    if data.len() < 2 {
        return;
    }
    let num_sources = (data[0] % 8) as usize + 1;
    let tolerance = match MzTolerance::absolute(data[1] as f64 * 0.001) {
        Ok(t) => t,
        Err(_) => return,
    };

    // Remaining bytes: (m/z, intensity) pairs of f32, dealt round-robin to the sources.
    // NaN and negative values must be rejected, never panic.
    let mut sources: Vec<Vec<Point>> = vec![Vec::new(); num_sources];
    for (i, chunk) in data[2..].chunks_exact(8).enumerate() {
        let mz = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f64;
        let intensity = f32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]) as f64;
        sources[i % num_sources].push(Point::new(mz, intensity));
    }

    if let Ok(merged) = calculate_merged_mzs_and_intensities(
        &sources,
        0.0,
        &tolerance,
        MergingType::Summed,
        &CenterFunction::default(),
    ) {
        assert!(merged.len() <= sources.iter().map(Vec::len).sum());
        assert!(merged.mzs.windows(2).all(|w| w[0] <= w[1]));
    }
});
