use gazelens_conditioning::{Conditioned, ConditioningConfig, GazeConditioner};
use gazelens_model::sample::RawSample;

fn feed(conditioner: &mut GazeConditioner, points: &[(f64, f64)]) -> Vec<Conditioned> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| conditioner.ingest(&RawSample::new(x, y, true, i as u64 * 20_000_000)))
        .collect()
}

fn default_session() -> GazeConditioner {
    let mut conditioner = GazeConditioner::new(ConditioningConfig {
        window_size: 5,
        smoothing_factor: 0.3,
        gate_threshold: 2.0,
    })
    .expect("default tunables are valid");
    conditioner.start();
    conditioner
}

#[test]
fn smoothing_lags_a_ramp_and_damps_a_jump() {
    let mut conditioner = default_session();
    let raw = [(100.0, 100.0), (102.0, 100.0), (104.0, 100.0), (200.0, 100.0)];

    let mut smoothed_x = Vec::new();
    for (i, &(x, y)) in raw.iter().enumerate() {
        conditioner.ingest(&RawSample::new(x, y, true, i as u64));
        smoothed_x.push(conditioner.smoothed().expect("sample accepted").x);
    }

    // The first sample seeds the filter, so only later samples can lag.
    assert_eq!(smoothed_x[0], raw[0].0);
    for i in 1..3 {
        assert!(smoothed_x[i] > smoothed_x[i - 1], "ramp must rise: {smoothed_x:?}");
        assert!(smoothed_x[i] < raw[i].0, "ramp must lag: {smoothed_x:?}");
    }

    assert!(smoothed_x[3] > smoothed_x[2]);
    assert!(smoothed_x[3] < 200.0, "jump must not land in one tick");
    assert!((smoothed_x[3] - 113.236).abs() < 1e-3);
}

#[test]
fn steady_gaze_converges_and_emits_once() {
    let mut conditioner = default_session();
    let outcomes = feed(&mut conditioner, &[(50.0, 50.0); 10]);

    let emitted: Vec<_> = outcomes.iter().filter_map(Conditioned::update).collect();
    assert_eq!(emitted.len(), 1);
    assert!(outcomes[1..]
        .iter()
        .all(|o| matches!(o, Conditioned::Suppressed)));

    let smoothed = conditioner.smoothed().unwrap();
    assert!((smoothed.x - 50.0).abs() < 1e-9);
    assert!((smoothed.y - 50.0).abs() < 1e-9);
}

#[test]
fn jitter_below_gate_is_held_still() {
    let mut conditioner = default_session();
    let jittery: Vec<(f64, f64)> = (0..50)
        .map(|i| {
            let d = if i % 2 == 0 { 1.0 } else { -1.0 };
            (500.0 + d, 300.0 - d)
        })
        .collect();

    let outcomes = feed(&mut conditioner, &jittery);
    let emitted = outcomes.iter().filter_map(Conditioned::update).count();
    assert_eq!(emitted, 1);
    assert_eq!(conditioner.stats().accepted, 50);
    assert_eq!(conditioner.stats().suppressed, 49);
}

#[test]
fn restart_forgets_previous_session() {
    let mut conditioner = default_session();
    feed(&mut conditioner, &[(900.0, 900.0), (910.0, 905.0), (920.0, 910.0)]);
    conditioner.stop();
    conditioner.start();

    let first = conditioner
        .ingest(&RawSample::new(10.0, 20.0, true, 0))
        .update()
        .expect("first sample of a session always emits");
    assert_eq!((first.x, first.y), (10.0, 20.0));
    assert_eq!(conditioner.history_len(), 1);
}

#[test]
fn independent_conditioners_share_nothing() {
    let mut a = default_session();
    let mut b = default_session();
    feed(&mut a, &[(100.0, 100.0), (300.0, 300.0)]);
    feed(&mut b, &[(5.0, 5.0)]);

    assert_eq!(b.smoothed().unwrap().x, 5.0);
    assert_eq!(a.history_len(), 2);
    assert_eq!(b.history_len(), 1);
}

#[test]
fn degenerate_samples_interleaved_with_valid_ones_are_invisible() {
    let mut clean = default_session();
    let mut noisy = default_session();
    let path = [(120.0, 80.0), (125.0, 82.0), (160.0, 90.0), (170.0, 95.0)];

    feed(&mut clean, &path);
    for (i, &(x, y)) in path.iter().enumerate() {
        noisy.ingest(&RawSample::new(0.0, 0.0, true, i as u64));
        noisy.ingest(&RawSample::new(x, y, true, i as u64));
        noisy.ingest(&RawSample::new(x * 3.0, y * 3.0, false, i as u64));
    }

    assert_eq!(clean.smoothed(), noisy.smoothed());
    assert_eq!(clean.last_emitted(), noisy.last_emitted());
}
