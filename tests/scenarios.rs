use rand::rngs::StdRng;
use rand::SeedableRng;
use rangeshuf::{derive, Error, Seq, SeqConfig, Shuffle};

fn drain<S: Shuffle>(mut seq: S) -> Vec<u64> {
    let mut out = Vec::new();

    loop {
        let (value, more) = seq.advance();
        if !more {
            return out;
        }
        out.push(value);
    }
}

#[test]
fn fixed_progression_from_inner_start() {
    let seq = SeqConfig::new(4, 7).mult(3).modulus(5).start(6).build().unwrap();

    assert_eq!(drain(seq), vec![6, 7, 5, 4]);
}

#[test]
fn consistent_iterator() {
    assert_eq!(drain(Seq::new(3, 5, 4, 7, 5).unwrap()), vec![5, 4, 6, 7]);
}

#[test]
fn skip_filter() {
    let seq = SeqConfig::new(1, 3).mult(3).modulus(5).start(3).build().unwrap();

    assert_eq!(drain(seq), vec![3, 2, 1]);
}

#[test]
fn single_value_range() {
    assert_eq!(drain(Seq::from_params(derive(42, 42, 0)).unwrap()), vec![42]);
}

#[test]
fn validation() {
    assert!(matches!(
        Seq::new(0, 0, 6, 5, 0),
        Err(Error::InvalidBounds { min: 6, max: 5 })
    ));
    assert!(matches!(
        Seq::new(0, 5, 0, 9, 0),
        Err(Error::InvalidModulus { modulus: 5, .. })
    ));
    assert!(matches!(
        Seq::new(99, 0, 0, 9, 0),
        Err(Error::InvalidMultiplier { mult: 99, .. })
    ));
    assert!(matches!(
        Seq::new(0, 0, 5, 6, 4),
        Err(Error::InvalidStart { start: 4, .. })
    ));
}

#[test]
fn error_messages() {
    let err = Seq::new(0, 0, 6, 5, 0).unwrap_err();
    assert_eq!(err.to_string(), "range 6..=5 is empty: min must not exceed max");
}

#[test]
fn derive_then_build_permutes() {
    let mut rng = StdRng::seed_from_u64(2024);

    for (min, max) in [(0, 0), (1, 2), (7, 19), (1000, 5000), (1 << 40, (1 << 40) + 777)] {
        let params = derive(max, min, 0);
        let seq = SeqConfig::from(params).build_with(&mut rng).unwrap();

        let mut seen = drain(seq);
        seen.sort_unstable();
        assert_eq!(seen, (min..=max).collect::<Vec<_>>());
    }
}

#[test]
fn reproducible_from_reported_params() {
    let first = SeqConfig::new(500, 2500)
        .build_with(&mut StdRng::seed_from_u64(1))
        .unwrap();
    let params = first.params();
    let order = drain(first);

    let again = Seq::new(
        params.mult,
        params.modulus,
        params.min,
        params.max,
        params.start,
    )
    .unwrap();

    assert_eq!(drain(again), order);
}

#[test]
fn reported_params_replay_ranges_from_zero() {
    for seed in 0..64 {
        let seq = SeqConfig::new(0, 20)
            .build_with(&mut StdRng::seed_from_u64(seed))
            .unwrap();
        let params = seq.params();
        let order = drain(seq);

        assert_eq!(drain(Seq::from_params(params).unwrap()), order);
    }
}

#[test]
fn order_is_not_sorted() {
    let order = drain(Seq::from_params(derive(1, 1000, 1)).unwrap());
    let sorted: Vec<u64> = (1..=1000).collect();
    assert_ne!(order, sorted);
}

#[test]
fn drains_through_shared_reference() {
    let sync = Seq::new(3, 5, 4, 7, 5).unwrap().into_sync();
    assert_eq!(drain(&sync), vec![5, 4, 6, 7]);
    assert_eq!(drain(&sync), Vec::<u64>::new());
}
