/*!
# Sliding Window Tests

Tests for the two-level windowed histogram: fill and rollover behaviour,
top-k ranking with deterministic tie-breaking, frequency normalisation,
and construction-time parameter validation.
*/

use flowstream::flowstream::window::SlidingWindow;

fn window_over_chars(capacity: usize, sub_size: usize, top_k: usize) -> SlidingWindow<char> {
    SlidingWindow::new(capacity, sub_size, top_k).expect("valid window parameters")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_basic_fill_ranks_by_count() {
    // Given: a window of 6 slots split into sub-windows of 2, reporting top 3
    let mut window = window_over_chars(6, 2, 3);

    // When: six values arrive without rolling the ring
    for value in ['A', 'B', 'A', 'C', 'A', 'B'] {
        window.add(value);
    }

    // Then: keys are ranked by descending count and frequencies align
    assert_eq!(window.top_keys(), vec!['A', 'B', 'C']);
    let frequencies = window.frequencies();
    assert_eq!(frequencies.len(), 3);
    assert_close(frequencies[0], 3.0 / 6.0);
    assert_close(frequencies[1], 2.0 / 6.0);
    assert_close(frequencies[2], 1.0 / 6.0);
}

#[test]
fn test_rollover_evicts_oldest_sub_window() {
    // Given: a full ring holding {A:2}, {B:2}, {C:2}
    let mut window = window_over_chars(6, 2, 3);
    for value in ['A', 'A', 'B', 'B', 'C', 'C'] {
        window.add(value);
    }
    assert_eq!(window.len(), 6);

    // When: two more values roll the ring onto the oldest sub-window
    window.add('D');
    window.add('D');

    // Then: the A sub-window is gone and ties break alphabetically
    assert_eq!(window.top_keys(), vec!['B', 'C', 'D']);
    for frequency in window.frequencies() {
        assert_close(frequency, 2.0 / 6.0);
    }
    assert_eq!(window.len(), 6);
}

#[test]
fn test_empty_window_reports_nothing() {
    let window = window_over_chars(6, 2, 3);
    assert!(window.is_empty());
    assert!(window.top_keys().is_empty());
    assert!(window.frequencies().is_empty());
}

#[test]
fn test_top_k_truncates_reported_keys() {
    // Five distinct values but only the top 2 are reported
    let mut window = window_over_chars(10, 5, 2);
    for value in ['A', 'B', 'C', 'D', 'E', 'A', 'B', 'A'] {
        window.add(value);
    }

    let keys = window.top_keys();
    let frequencies = window.frequencies();
    assert_eq!(keys, vec!['A', 'B']);
    assert_eq!(keys.len(), frequencies.len());
    assert_close(frequencies[0], 3.0 / 8.0);
    assert_close(frequencies[1], 2.0 / 8.0);
}

#[test]
fn test_aggregate_count_tracks_prefix_length_up_to_capacity() {
    let mut window = window_over_chars(6, 2, 3);

    // Until the ring fills, every observation is retained
    for added in 1..=6usize {
        window.add('X');
        assert_eq!(window.len(), added);
    }

    // Past capacity the window holds between N - b + 1 and N observations:
    // rollover forgets a whole sub-window at a time
    for _ in 0..25 {
        window.add('Y');
        assert!(window.len() > 6 - 2 && window.len() <= 6, "len {}", window.len());
    }
}

#[test]
fn test_frequencies_are_normalised() {
    let mut window = window_over_chars(8, 2, 8);
    for value in ['A', 'B', 'C', 'A', 'B', 'A', 'D', 'D', 'C', 'B'] {
        window.add(value);
    }

    let frequencies = window.frequencies();
    assert!(frequencies.iter().all(|f| (0.0..=1.0).contains(f)));
    assert_close(frequencies.iter().sum::<f64>(), 1.0);

    // Ranking is weakly decreasing
    for pair in frequencies.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[test]
fn test_single_sub_window_ring_drops_everything_on_rollover() {
    // b == N: the ring has one slot, so rolling over forgets the window
    let mut window = window_over_chars(3, 3, 3);
    for value in ['A', 'A', 'B'] {
        window.add(value);
    }
    assert_eq!(window.top_keys(), vec!['A', 'B']);

    window.add('C');
    assert_eq!(window.top_keys(), vec!['C']);
    assert_eq!(window.len(), 1);
}

#[test]
fn test_construction_rejects_bad_parameters() {
    // b must divide N
    assert!(SlidingWindow::<char>::new(6, 4, 3).is_err());
    // zero sizes are configuration faults
    assert!(SlidingWindow::<char>::new(0, 1, 3).is_err());
    assert!(SlidingWindow::<char>::new(6, 0, 3).is_err());
    assert!(SlidingWindow::<char>::new(6, 2, 0).is_err());
    // b must not exceed N
    assert!(SlidingWindow::<char>::new(2, 4, 3).is_err());

    assert!(SlidingWindow::<char>::new(6, 2, 3).is_ok());
    assert!(SlidingWindow::<char>::new(6, 6, 1).is_ok());
}
