//! Band filter properties across depths and bands.

use scan_core::filter::{filter_capped, scan_band};
use scan_core::{Band, FilterRequest, IntensityBuffer, StackInfo, project_offsets};

fn stack(width: u32, height: u32, bits: u16) -> StackInfo {
    StackInfo {
        name: "prop".into(),
        width,
        height,
        bits_per_sample: bits,
        resolution_unit: 2,
        x_resolution: None,
        y_resolution: None,
    }
}

fn checker_u16(width: u32, height: u32) -> IntensityBuffer {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x * 977 + y * 131) % 65536) as u16))
        .collect();
    IntensityBuffer::from_u16(width, height, data).unwrap()
}

#[test]
fn predicate_holds_for_many_bands() {
    let buf = checker_u16(61, 47);
    for (center, distance) in [(0.0, 0.0), (30000.0, 5000.0), (65535.0, 1.0), (100.0, -5.0), (-10.0, 20.0)] {
        let band = Band::around(center, distance);
        let scan = scan_band(&buf, band, usize::MAX);
        assert!(scan.offsets.windows(2).all(|w| w[0] < w[1]));
        let expected: Vec<u64> = (0..buf.len())
            .filter(|&i| band.contains(buf.get(i).unwrap() as f64))
            .map(|i| i as u64)
            .collect();
        assert_eq!(scan.offsets, expected, "band {center}±{distance}");
    }
}

#[test]
fn truncation_flag_matches_count() {
    let buf = checker_u16(40, 40);
    let info = stack(40, 40, 16);
    let band = Band::around(32768.0, 32768.0);
    let all = scan_band(&buf, band, usize::MAX).offsets.len();

    let exact = filter_capped(&info, &buf, band, all);
    assert!(!exact.truncated);
    assert_eq!(exact.offsets.len(), all);

    let under = filter_capped(&info, &buf, band, all - 1);
    assert!(under.truncated);
    assert_eq!(under.offsets.len(), all - 1);
}

#[test]
fn request_to_points() {
    let buf = IntensityBuffer::from_u8(3, 3, vec![0, 9, 0, 0, 0, 9, 9, 0, 0]).unwrap();
    let info = stack(3, 3, 8);
    let req: FilterRequest =
        serde_json::from_str(r#"{"distance":"0","imageName":"prop","pixelWeight":"9"}"#).unwrap();
    let query = req.into_query().unwrap();
    let result = filter_capped(&info, &buf, query.band(), 10);
    let points: Vec<(u32, u32)> = project_offsets(&result.offsets, result.width)
        .into_iter()
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(points, vec![(1, 0), (2, 1), (0, 2)]);
}
