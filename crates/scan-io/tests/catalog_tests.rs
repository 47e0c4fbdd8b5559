//! Catalog integration tests: sample generation through filtering.

use std::sync::Arc;

use scan_core::{Band, filter::filter};
use scan_io::sample::{SampleOptions, generate};
use scan_io::stack::{write_gray8, write_gray16};
use scan_io::{Catalog, DecodeCache, IoError};

fn options() -> SampleOptions {
    SampleOptions {
        count: 3,
        width: 50,
        height: 75,
        radius: 20.0,
        small_radius: 5.0,
        seed: Some(1),
        dpi: 72,
    }
}

#[test]
fn summary_describes_first_stack() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path());
    generate(&catalog, &options()).unwrap();

    let summary = catalog.summary().unwrap();
    assert_eq!(summary.files, vec!["0", "1", "2"]);
    assert_eq!((summary.width, summary.height), (50, 75));
    assert_eq!(summary.bits_per_sample, 8);
    assert_eq!(summary.pixel_weight_max(), 255);
}

#[test]
fn listing_ignores_other_files() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path());
    write_gray8(dir.path().join("b.tif"), 2, 2, &[0; 4], 72).unwrap();
    write_gray8(dir.path().join("a.tif"), 2, 2, &[0; 4], 72).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
    std::fs::write(dir.path().join("c.tiff"), "x").unwrap();
    std::fs::create_dir(dir.path().join("d.tif")).unwrap();

    assert_eq!(catalog.list().unwrap(), vec!["a", "b"]);
}

#[test]
fn unaddressable_names_are_not_listed() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path());
    // stem "."
    write_gray8(dir.path().join("..tif"), 2, 2, &[0; 4], 72).unwrap();
    let err = catalog.summary().unwrap_err();
    assert!(matches!(err, IoError::NotFound(_)));

    write_gray8(dir.path().join("a.tif"), 3, 2, &[0; 6], 72).unwrap();
    assert_eq!(catalog.list().unwrap(), vec!["a"]);
    let summary = catalog.summary().unwrap();
    assert_eq!(summary.files, vec!["a"]);
    assert_eq!((summary.width, summary.height), (3, 2));
}

#[test]
fn empty_directory_has_no_summary() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::new(dir.path()).summary().unwrap_err();
    assert!(matches!(err, IoError::NotFound(_)));
    assert!(!err.is_client_error());
}

#[test]
fn traversal_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path());
    for name in ["../etc/passwd", "..", "a/b", ""] {
        let err = catalog.path_of(name).unwrap_err();
        assert!(err.is_client_error(), "{name:?} accepted");
    }
}

#[test]
fn cached_filter_matches_direct_filter() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path());
    let data: Vec<u16> = (0..64 * 64).map(|i| (i * 16) as u16).collect();
    write_gray16(dir.path().join("deep.tif"), 64, 64, &data, 300).unwrap();

    let cache = DecodeCache::new(1 << 20);
    let path = catalog.path_of("deep").unwrap();
    let cached = cache.get_or_decode(&path, "deep").unwrap();
    let again = cache.get_or_decode(&path, "deep").unwrap();
    assert!(Arc::ptr_eq(&cached, &again));

    let direct = catalog.decode("deep").unwrap();
    let band = Band::around(32768.0, 100.0);
    let a = filter(&cached.info, &cached.buffer, band);
    let b = filter(&direct.info, &direct.buffer, band);
    assert_eq!(a, b);
    assert_eq!(a.bits_per_sample, 16);
    assert_eq!(a.x_resolution, Some(300.0));
    // Samples step by 16, so a band 200 wide holds 13 of them.
    assert_eq!(a.offsets.len(), 13);
}
