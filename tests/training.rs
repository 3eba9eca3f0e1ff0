use rand::{rngs::StdRng, Rng, SeedableRng};
use sgd_net::{
    data::{Batch, DataKind, Sample},
    neural::{optimizer::Optimizer, Network},
};

/// Two classes split by the line x + y = 1 with a margin around it.
fn separable_batch(n: usize, seed: u64, kind: DataKind) -> Batch {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(n);
    while samples.len() < n {
        let (x, y): (f64, f64) = (rng.gen(), rng.gen());
        let side = x + y - 1.0;
        if side.abs() < 0.2 {
            continue;
        }
        samples.push(Sample::new(vec![x, y], (side > 0.0) as usize));
    }
    Batch::new(samples, kind).unwrap()
}

#[test]
fn full_batch_training_strictly_decreases_cost() {
    let training = separable_batch(40, 1, DataKind::Train);
    let mut net = Network::seeded(&[2, 4, 2], 2024).unwrap();
    let start = net.cost(&training).unwrap();

    let optim = Optimizer::new(25, training.len(), 0.1);
    let reports = optim.train(&mut net, &training, None).unwrap();

    assert_eq!(reports.len(), 25);
    assert!(reports[0].cost < start);
    for pair in reports.windows(2) {
        assert!(
            pair[1].cost < pair[0].cost,
            "cost went from {} to {} at epoch {}",
            pair[0].cost,
            pair[1].cost,
            pair[1].epoch
        );
    }
}

#[test]
fn mini_batch_training_separates_classes() {
    let training = separable_batch(200, 7, DataKind::Train);
    let test = separable_batch(50, 8, DataKind::Test);
    let mut net = Network::seeded(&[2, 6, 2], 99).unwrap();

    let optim = Optimizer::new(60, 10, 2.0)
        .with_shuffle(Some(5))
        .with_log(Some(10));
    let reports = optim.train(&mut net, &training, Some(&test)).unwrap();

    let first = &reports[0];
    let last = reports.last().unwrap();
    assert!(last.cost < first.cost);

    let eval = last.evaluation.unwrap();
    assert_eq!(eval.total, 50);
    assert!(eval.passed(0.9), "only {} / {} correct", eval.correct, eval.total);
}

#[test]
fn parallel_training_converges_too() {
    let training = separable_batch(100, 3, DataKind::Train);
    let mut net = Network::seeded(&[2, 5, 2], 1).unwrap();

    let optim = Optimizer::new(40, 20, 2.0).with_parallel(true);
    let reports = optim.train(&mut net, &training, Some(&training)).unwrap();

    assert!(reports.last().unwrap().cost < reports[0].cost);
}
