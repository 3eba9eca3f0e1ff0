use log::{debug, error, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use crate::{
    config::TrainConfig,
    data::{Batch, DataKind, Sample, Suite},
    neural::{params::Params, Evaluation, Network},
    prelude::*,
};

#[cfg(feature = "gui")]
use crate::viz::{EpochState, Visualizer};
#[cfg(feature = "gui")]
use std::sync::mpsc;

/// Mini-batch stochastic gradient descent.
pub struct Optimizer {
    epochs: usize,
    mini_batch_size: usize,
    rate: f64,
    epochs_per_log: Option<usize>,
    shuffle_seed: Option<u64>,
    parallel: bool,
}

/// What one epoch of training achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    /// Mean quadratic cost over the training batch after the epoch's updates.
    pub cost: f64,
    /// Outcome on the test batch, if one was given.
    pub evaluation: Option<Evaluation>,
}

impl Optimizer {
    pub fn new(epochs: usize, mini_batch_size: usize, rate: f64) -> Self {
        Self {
            epochs,
            mini_batch_size,
            rate,
            epochs_per_log: None,
            shuffle_seed: None,
            parallel: false,
        }
    }

    pub fn from_config(config: &TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.epochs, config.mini_batch_size, config.learning_rate)
            .with_log(config.epochs_per_log)
            .with_shuffle(config.shuffle.then_some(config.seed))
            .with_parallel(config.parallel))
    }

    pub fn with_log(mut self, epochs_per_log: Option<usize>) -> Self {
        self.epochs_per_log = epochs_per_log;
        self
    }

    /// Reshuffle the training samples every epoch with a generator seeded from `seed`.
    pub fn with_shuffle(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    pub fn set_epochs(&mut self, epochs: usize) {
        self.epochs = epochs;
    }

    /// Trains `net` on `training` and reports every epoch, evaluating on `test` when given.
    ///
    /// Any error aborts the remaining training. The mini-batch in flight when it happens
    /// is discarded, so `net` holds the parameters of the last completed update.
    pub fn train(
        &self,
        net: &mut Network,
        training: &Batch,
        test: Option<&Batch>,
    ) -> Result<Vec<EpochReport>> {
        self.train_observed(net, training, test, |_, _| Ok(()))
    }

    fn train_observed<F>(
        &self,
        net: &mut Network,
        training: &Batch,
        test: Option<&Batch>,
        mut observe: F,
    ) -> Result<Vec<EpochReport>>
    where
        F: FnMut(&EpochReport, &Network) -> Result<()>,
    {
        self.check_settings(net, training, test)?;

        let mut rng = self.shuffle_seed.map(StdRng::seed_from_u64);
        let ordered = training.divide(self.mini_batch_size)?;
        let mut reports = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            let shuffled;
            let suite = match rng.as_mut() {
                Some(rng) => {
                    shuffled = training.divide_shuffled(self.mini_batch_size, rng)?;
                    &shuffled
                }
                None => &ordered,
            };

            if let Err(e) = self.run_epoch(net, suite) {
                error!("epoch {epoch} aborted: {e}");
                return Err(e);
            }

            let report = EpochReport {
                epoch,
                cost: net.cost(training)?,
                evaluation: test.map(|t| net.evaluate(t)).transpose()?,
            };
            if self.epochs_per_log.is_some_and(|epl| epoch % epl == 0) {
                match report.evaluation {
                    Some(eval) => info!(
                        "Epoch {epoch} cost: {:.6}, test: {} / {}",
                        report.cost, eval.correct, eval.total
                    ),
                    None => info!("Epoch {epoch} cost: {:.6}", report.cost),
                }
            }

            observe(&report, net)?;
            reports.push(report);
        }

        Ok(reports)
    }

    /// Rejects settings and batches that cannot drive a run on `net`.
    fn check_settings(&self, net: &Network, training: &Batch, test: Option<&Batch>) -> Result<()> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "learning rate must be positive and finite, got {}",
                self.rate
            )));
        }
        if self.epochs_per_log == Some(0) {
            return Err(Error::InvalidArgument(
                "epochs_per_log must be non-zero when set".into(),
            ));
        }

        for batch in std::iter::once(training).chain(test) {
            if batch.pixel_len() != net.input_amount() {
                return Err(Error::DimensionMismatch {
                    left: (net.input_amount(), 1),
                    right: (batch.pixel_len(), 1),
                });
            }
        }
        if training.kind() == DataKind::Test {
            warn!("training on a batch marked as test data");
        }
        Ok(())
    }

    #[cfg(feature = "gui")]
    pub fn train_gui<Gui: Visualizer>(
        &self,
        net: &mut Network,
        training: &Batch,
        test: Option<&Batch>,
    ) -> Result<Vec<EpochReport>> {
        std::thread::scope(|scope| -> Result<Vec<EpochReport>> {
            let (tx, rx) = mpsc::channel::<EpochState>();
            let handle = scope.spawn(move || -> Result<Vec<EpochReport>> {
                self.train_observed(net, training, test, |report, _| {
                    let accuracy = report.evaluation.map(|e| e.accuracy());
                    tx.send((report.epoch, report.cost, accuracy))
                        .map_err(|_| Error::Thread)
                })
            });

            let _ = eframe::run_native(
                "sgd_net",
                eframe::NativeOptions::default(),
                Box::new(|cc| Box::new(Gui::new(cc, rx))),
            );

            handle.join().map_err(|_| Error::Thread)?
        })
    }

    fn run_epoch(&self, net: &mut Network, suite: &Suite<'_>) -> Result<()> {
        for (i, mini_batch) in suite.iter().enumerate() {
            self.update_mini_batch(net, mini_batch)?;
            debug!("mini-batch {i} of {} applied", suite.len());
        }
        Ok(())
    }

    /// Sums the gradients of every sample against one snapshot of `net`, then applies
    /// `params -= rate / len * sum` and writes the result back.
    fn update_mini_batch(&self, net: &mut Network, mini_batch: &[&Sample]) -> Result<()> {
        let mut params = net.parameters()?;
        let zero = Params::zeroed(net)?;

        let mut sum = if self.parallel {
            mini_batch
                .par_iter()
                .map(|sample| params.sample_gradient(sample))
                .try_reduce(
                    || zero.clone(),
                    |mut acc, grad| {
                        acc.add_in_place(&grad)?;
                        Ok(acc)
                    },
                )?
        } else {
            let mut acc = zero;
            for sample in mini_batch {
                acc.add_in_place(&params.sample_gradient(sample)?)?;
            }
            acc
        };

        sum.scale(self.rate / mini_batch.len() as f64);
        params.sub_in_place(&sum)?;
        net.load_parameters(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor_batch() -> Batch {
        let samples = [([0.0, 0.0], 0), ([0.0, 1.0], 1), ([1.0, 0.0], 1), ([1.0, 1.0], 0)]
            .into_iter()
            .map(|(px, label)| Sample::new(px.to_vec(), label))
            .collect();
        Batch::new(samples, DataKind::Train).unwrap()
    }

    #[test]
    fn single_update_matches_manual_step() {
        let batch = xor_batch();
        let mut net = Network::seeded(&[2, 3, 2], 1).unwrap();
        let start = net.parameters().unwrap();

        let mut expected = start.clone();
        let mut sum = Params::zeroed(&net).unwrap();
        for s in batch.samples() {
            sum.add_in_place(&start.sample_gradient(s).unwrap()).unwrap();
        }
        sum.scale(0.5 / 4.0);
        expected.sub_in_place(&sum).unwrap();

        let optim = Optimizer::new(1, 4, 0.5);
        let reports = optim.train(&mut net, &batch, None).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(net.parameters().unwrap(), expected);
    }

    #[test]
    fn parallel_matches_sequential() {
        let batch = xor_batch();
        let mut seq = Network::seeded(&[2, 3, 2], 2).unwrap();
        let mut par = seq.clone();

        Optimizer::new(5, 2, 1.0)
            .train(&mut seq, &batch, None)
            .unwrap();
        Optimizer::new(5, 2, 1.0)
            .with_parallel(true)
            .train(&mut par, &batch, None)
            .unwrap();

        let (a, b) = (seq.parameters().unwrap(), par.parameters().unwrap());
        for (x, y) in a.weights.iter().chain(&a.biases).zip(b.weights.iter().chain(&b.biases)) {
            for (p, q) in x.iter().zip(y.iter()) {
                approx::assert_abs_diff_eq!(p, q, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn learns_xor() {
        let batch = xor_batch();
        let mut net = Network::seeded(&[2, 8, 2], 3).unwrap();

        let optim = Optimizer::new(4_000, 4, 3.0);
        let reports = optim.train(&mut net, &batch, Some(&batch)).unwrap();

        let last = reports.last().unwrap();
        assert!(last.cost < reports[0].cost);
        assert!(last.evaluation.unwrap().passed(1.0));
    }

    #[test]
    fn shuffling_is_reproducible() {
        let batch = xor_batch();
        let mut a = Network::seeded(&[2, 3, 2], 4).unwrap();
        let mut b = a.clone();

        let optim = Optimizer::new(3, 1, 0.5).with_shuffle(Some(8));
        optim.train(&mut a, &batch, None).unwrap();
        optim.train(&mut b, &batch, None).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn bad_sample_aborts_without_partial_update() {
        let samples = vec![
            Sample::new(vec![0.0, 1.0], 1),
            Sample::new(vec![1.0, 0.0], 5),
        ];
        let batch = Batch::new(samples, DataKind::Train).unwrap();

        for parallel in [false, true] {
            let mut net = Network::seeded(&[2, 2, 2], 5).unwrap();
            let before = net.clone();

            let res = Optimizer::new(2, 2, 1.0)
                .with_parallel(parallel)
                .train(&mut net, &batch, None);

            assert!(
                matches!(res, Err(Error::IndexOutOfBounds { .. })),
                "parallel: {parallel}"
            );
            assert_eq!(net, before, "parallel: {parallel}");
        }
    }

    #[test]
    fn failure_keeps_last_completed_update() {
        // first mini-batch is fine, the second one carries a label past the outputs
        let samples = vec![
            Sample::new(vec![0.0, 1.0], 1),
            Sample::new(vec![1.0, 0.0], 1),
            Sample::new(vec![1.0, 1.0], 0),
            Sample::new(vec![0.5, 0.5], 7),
        ];
        let batch = Batch::new(samples, DataKind::Train).unwrap();

        for parallel in [false, true] {
            let mut net = Network::seeded(&[2, 3, 2], 8).unwrap();
            let mut expected = net.clone();
            let first = Batch::new(batch.samples()[..2].to_vec(), DataKind::Train).unwrap();
            Optimizer::new(1, 2, 1.0)
                .train(&mut expected, &first, None)
                .unwrap();

            let res = Optimizer::new(1, 2, 1.0)
                .with_parallel(parallel)
                .train(&mut net, &batch, None);

            assert!(res.is_err());
            assert_eq!(net, expected, "parallel: {parallel}");
        }
    }

    #[test]
    fn rejects_bad_settings() {
        let batch = xor_batch();
        let mut net = Network::seeded(&[2, 2, 2], 6).unwrap();

        assert!(matches!(
            Optimizer::new(1, 0, 1.0).train(&mut net, &batch, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Optimizer::new(1, 5, 1.0).train(&mut net, &batch, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Optimizer::new(1, 2, f64::NAN).train(&mut net, &batch, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Optimizer::new(1, 2, 1.0)
                .with_log(Some(0))
                .train(&mut net, &batch, None),
            Err(Error::InvalidArgument(_))
        ));

        let mut wide = Network::seeded(&[3, 2, 2], 6).unwrap();
        assert!(matches!(
            Optimizer::new(1, 2, 1.0).train(&mut wide, &batch, None),
            Err(Error::DimensionMismatch { .. })
        ));
        let narrow = Batch::new(vec![Sample::new(vec![0.5], 0)], DataKind::Test).unwrap();
        assert!(matches!(
            Optimizer::new(1, 2, 1.0).train(&mut net, &batch, Some(&narrow)),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(net, Network::seeded(&[2, 2, 2], 6).unwrap());
    }

    #[test]
    fn settings_can_change_between_runs() {
        let batch = xor_batch();
        let mut resumed = Network::seeded(&[2, 3, 2], 9).unwrap();
        let mut fresh = resumed.clone();

        let mut optim = Optimizer::new(2, 2, 3.0);
        optim.train(&mut resumed, &batch, None).unwrap();
        optim.set_rate(0.5);
        optim.set_epochs(3);
        let reports = optim.train(&mut resumed, &batch, None).unwrap();
        assert_eq!(reports.len(), 3);

        Optimizer::new(2, 2, 3.0)
            .train(&mut fresh, &batch, None)
            .unwrap();
        Optimizer::new(3, 2, 0.5)
            .train(&mut fresh, &batch, None)
            .unwrap();
        assert_eq!(resumed, fresh);
    }

    #[test]
    fn trains_on_batch_of_any_kind() {
        let test_kind = Batch::new(xor_batch().samples().to_vec(), DataKind::Test).unwrap();
        let mut net = Network::seeded(&[2, 3, 2], 10).unwrap();
        let mut same = net.clone();

        Optimizer::new(2, 4, 1.0)
            .train(&mut net, &test_kind, None)
            .unwrap();
        Optimizer::new(2, 4, 1.0)
            .train(&mut same, &xor_batch(), None)
            .unwrap();
        assert_eq!(net, same);
    }

    #[test]
    fn built_from_config() {
        let config = TrainConfig {
            epochs: 2,
            mini_batch_size: 2,
            learning_rate: 1.0,
            shuffle: true,
            seed: 3,
            parallel: true,
            epochs_per_log: Some(1),
        };
        let optim = Optimizer::from_config(&config).unwrap();
        let mut net = Network::seeded(&[2, 2, 2], 7).unwrap();

        let reports = optim.train(&mut net, &xor_batch(), None).unwrap();
        assert_eq!(reports.iter().map(|r| r.epoch).collect::<Vec<_>>(), [0, 1]);
        assert!(reports.iter().all(|r| r.evaluation.is_none()));

        let bad = TrainConfig {
            epochs: 0,
            ..config
        };
        assert!(Optimizer::from_config(&bad).is_err());
    }
}
