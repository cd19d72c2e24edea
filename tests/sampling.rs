//! Timestamp sampling tests.

use vidsheet::{format_timecode, sample_timestamp, sample_timestamps};

#[test]
fn evenly_spaced_excluding_endpoints() {
    let timestamps = sample_timestamps(10.0, 9);
    let expected: Vec<f64> = (1..=9).map(f64::from).collect();
    assert_eq!(timestamps, expected);
}

#[test]
fn single_sample_is_midpoint() {
    assert_eq!(sample_timestamps(7.0, 1), vec![3.5]);
}

#[test]
fn zero_count_is_empty() {
    assert!(sample_timestamps(10.0, 0).is_empty());
}

#[test]
fn samples_stay_strictly_inside_duration() {
    let duration = 123.456;
    for count in [2, 3, 12, 100] {
        let timestamps = sample_timestamps(duration, count);
        assert_eq!(timestamps.len(), count as usize);
        assert!(timestamps.iter().all(|&t| t > 0.0 && t < duration));
        assert!(timestamps.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[test]
fn spacing_is_uniform() {
    let timestamps = sample_timestamps(60.0, 4);
    let interval = 60.0 / 5.0;
    for (i, t) in timestamps.iter().enumerate() {
        assert!((t - interval * (i as f64 + 1.0)).abs() < 1e-9);
    }
}

#[test]
fn timecode_formatting() {
    assert_eq!(format_timecode(0.0), "00:00:00.000");
    assert_eq!(format_timecode(1.5), "00:00:01.500");
    assert_eq!(format_timecode(3661.25), "01:01:01.250");
}

#[test]
fn timecode_clamps_invalid_input() {
    assert_eq!(format_timecode(-4.0), "00:00:00.000");
    assert_eq!(format_timecode(f64::NAN), "00:00:00.000");
}

#[test]
fn single_position_matches_full_list() {
    let all = sample_timestamps(37.5, 6);
    for (i, &t) in all.iter().enumerate() {
        assert_eq!(sample_timestamp(37.5, 6, i as u32 + 1), Some(t));
    }
    assert_eq!(sample_timestamp(37.5, 6, 0), None);
    assert_eq!(sample_timestamp(37.5, 6, 7), None);
}

#[test]
fn largest_count_does_not_overflow() {
    let last = sample_timestamp(10.0, u32::MAX, u32::MAX).unwrap();
    assert!(last > 9.999 && last < 10.0);

    let first = sample_timestamp(10.0, u32::MAX, 1).unwrap();
    assert!(first > 0.0);
}
