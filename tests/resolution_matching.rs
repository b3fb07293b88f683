use hic_browser_wasm::domain::dataset::Resolution;
use hic_browser_wasm::domain::view::find_matching_zoom_index;
use quickcheck_macros::quickcheck;

const LADDER: [u64; 4] = [2_500_000, 1_000_000, 500_000, 100_000];

#[test]
fn picks_finest_bin_at_least_target() {
    assert_eq!(find_matching_zoom_index(1_666.7, &LADDER[..]), 3);
    assert_eq!(find_matching_zoom_index(100_000.0, &LADDER[..]), 3);
    assert_eq!(find_matching_zoom_index(100_001.0, &LADDER[..]), 2);
    assert_eq!(find_matching_zoom_index(750_000.0, &LADDER[..]), 1);
}

#[test]
fn targets_coarser_than_ladder_fall_back_to_first_entry() {
    assert_eq!(find_matching_zoom_index(9_000_000.0, &LADDER[..]), 0);
}

#[test]
fn filtered_ladders_report_stored_zoom_index() {
    let filtered = [Resolution::new(0, 2_500_000), Resolution::new(2, 500_000), Resolution::new(3, 100_000)];
    assert_eq!(find_matching_zoom_index(400_000.0, &filtered[..]), 2);
    assert_eq!(find_matching_zoom_index(50_000.0, &filtered[..]), 3);
    assert_eq!(find_matching_zoom_index(3_000_000.0, &filtered[..]), 0);
}

#[quickcheck]
fn matched_bin_is_never_finer_than_target_unless_coarsest(target: u32) -> bool {
    let target = target as f64;
    let zoom = find_matching_zoom_index(target, &LADDER[..]);
    zoom == 0 || LADDER[zoom] as f64 >= target
}

#[quickcheck]
fn next_finer_bin_is_below_target(target: u32) -> bool {
    let target = target as f64;
    let zoom = find_matching_zoom_index(target, &LADDER[..]);
    zoom + 1 >= LADDER.len() || (LADDER[zoom + 1] as f64) < target
}
