use krinsky::{
    run_monte_carlo, Aggregate, KrinskyError, MonteCarlo, MonteCarloConfig, NoiseConfig,
    ProbabilityModel, StochasticEnvironment, TrialConfig, ACTIONS,
};
use proptest::prelude::*;

fn small(seed: u64, trials: u64) -> MonteCarloConfig {
    MonteCarloConfig {
        trials,
        trial: TrialConfig::new(2_000, 200).unwrap(),
        seed,
    }
}

#[test]
fn same_seed_same_summary() {
    let env = StochasticEnvironment::reference().unwrap();
    let a = run_monte_carlo(&env, small(17, 12)).unwrap();
    let b = run_monte_carlo(&env, small(17, 12)).unwrap();
    assert_eq!(a.aggregate, b.aggregate);
}

#[test]
fn trial_results_do_not_depend_on_execution_order() {
    let env = StochasticEnvironment::reference().unwrap();
    let mc = MonteCarlo::new(&env, small(3, 10)).unwrap();

    let forward = mc.aggregate_range(0..10);

    // Fold the same trials in reverse, as disjoint partial aggregates.
    let mut reversed = Aggregate::default();
    for t in (0..10).rev() {
        reversed.merge(&mc.aggregate_range(t..t + 1));
    }
    assert_eq!(forward.trials, reversed.trials);
    assert_eq!(forward.learned, reversed.learned);
    assert_eq!(forward.accuracy_positive, reversed.accuracy_positive);
    assert!((forward.accuracy_sum - reversed.accuracy_sum).abs() < 1e-9);
    assert!((forward.delay_sum - reversed.delay_sum).abs() < 1e-9);

    assert_eq!(mc.trial(4), mc.trial(4));
}

#[test]
fn reference_run_finds_short_delays() {
    let env = StochasticEnvironment::reference().unwrap();
    let summary = run_monte_carlo(&env, small(99, 8)).unwrap();
    let agg = &summary.aggregate;

    assert_eq!(agg.trials, 8);
    assert_eq!(agg.learned.iter().sum::<u64>(), 8);
    assert_eq!(agg.delay_positive, 8);

    // Best delays come from outcome 1 (1.2) plus noise around 2.0, and a trial
    // sees thousands of draws, so the minimum lies well under the mean delay.
    let delay = agg.average_delay().unwrap();
    assert!(delay > 0.0 && delay < 3.2, "delay={delay}");

    if let Some(acc) = agg.average_accuracy() {
        assert!(acc > 0.0 && acc <= 100.0, "acc={acc}");
    }
}

#[test]
fn invalid_configurations_are_rejected_before_running() {
    let env = StochasticEnvironment::reference().unwrap();

    let zero = MonteCarloConfig {
        trials: 0,
        ..MonteCarloConfig::default()
    };
    assert!(matches!(
        run_monte_carlo(&env, zero),
        Err(KrinskyError::InvalidConfiguration(_))
    ));

    let bad_cutoff = MonteCarloConfig {
        trials: 1,
        trial: TrialConfig {
            batch_size: 100,
            cutoff: 100,
        },
        seed: 0,
    };
    assert!(matches!(
        run_monte_carlo(&env, bad_cutoff),
        Err(KrinskyError::InvalidConfiguration(_))
    ));

    let mut rows = [[0.0; 6]; ACTIONS];
    rows[0][0] = 1.0;
    assert!(matches!(
        ProbabilityModel::new(rows),
        Err(KrinskyError::InvalidModel { action: 2, .. })
    ));
    assert!(StochasticEnvironment::new(
        ProbabilityModel::reference(),
        NoiseConfig {
            mean: 2.0,
            std_dev: -0.5
        }
    )
    .is_err());
}

#[cfg(feature = "serde")]
#[test]
fn summary_round_trips_through_json() {
    let env = StochasticEnvironment::reference().unwrap();
    let summary = run_monte_carlo(&env, small(1, 3)).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    let back: krinsky::Summary = serde_json::from_str(&json).unwrap();
    assert_eq!(back.aggregate.learned, summary.aggregate.learned);
    assert_eq!(back.config, summary.config);

    // Actions serialize as their 1-based ids and reject out-of-range values.
    let a: krinsky::Action = serde_json::from_str("4").unwrap();
    assert_eq!(a.get(), 4);
    assert!(serde_json::from_str::<krinsky::Action>("9").is_err());
}

#[cfg(feature = "serde")]
#[test]
fn deserialization_validates_configs_and_models() {
    let cfg: TrialConfig = serde_json::from_str(r#"{"batch_size":100,"cutoff":10}"#).unwrap();
    assert_eq!(cfg, TrialConfig::new(100, 10).unwrap());
    assert!(serde_json::from_str::<TrialConfig>(r#"{"batch_size":100,"cutoff":100}"#).is_err());
    assert!(serde_json::from_str::<TrialConfig>(r#"{"batch_size":100,"cutoff":0}"#).is_err());

    let mc = r#"{"trials":0,"trial":{"batch_size":100,"cutoff":10},"seed":1}"#;
    assert!(serde_json::from_str::<MonteCarloConfig>(mc).is_err());
    let mc = r#"{"trials":3,"trial":{"batch_size":10,"cutoff":10},"seed":1}"#;
    assert!(serde_json::from_str::<MonteCarloConfig>(mc).is_err());
    let mc = r#"{"trials":3,"trial":{"batch_size":100,"cutoff":10},"seed":1}"#;
    assert_eq!(serde_json::from_str::<MonteCarloConfig>(mc).unwrap().trials, 3);

    let reference = ProbabilityModel::reference();
    let json = serde_json::to_string(&reference).unwrap();
    assert!(json.starts_with("[["), "model serializes as bare rows: {json}");
    let back: ProbabilityModel = serde_json::from_str(&json).unwrap();
    assert_eq!(back, reference);

    let mut rows: krinsky::model::Rows = reference.into();
    rows[3][2] = 0.9;
    let bad = serde_json::to_string(&rows).unwrap();
    assert!(serde_json::from_str::<ProbabilityModel>(&bad).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn aggregate_counts_every_trial(seed in any::<u64>(), trials in 1u64..6) {
        let env = StochasticEnvironment::reference().unwrap();
        let cfg = MonteCarloConfig {
            trials,
            trial: TrialConfig::new(300, 50).unwrap(),
            seed,
        };
        let s = run_monte_carlo(&env, cfg).unwrap();
        prop_assert_eq!(s.aggregate.trials, trials);
        prop_assert_eq!(s.aggregate.learned.iter().sum::<u64>(), trials);
        prop_assert!(s.aggregate.accuracy_positive <= trials);
        if let Some(acc) = s.average_accuracy() {
            prop_assert!((0.0..=100.0).contains(&acc));
        }
    }
}
