//! Samples and their partitioning into mini-batches.

use rand::{seq::SliceRandom, Rng};

use crate::{matrix::Matrix, prelude::*};

pub const IMAGE_WIDTH: usize = 28;
pub const IMAGE_HEIGHT: usize = 28;
pub const IMAGE_PIXELS: usize = IMAGE_WIDTH * IMAGE_HEIGHT;

/// A fixed-length pixel vector with its integer label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub pixels: Vec<f64>,
    pub label: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataKind {
    #[default]
    Train,
    Test,
}

/// A flat ordered sequence of samples sharing one pixel length.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    samples: Vec<Sample>,
    kind: DataKind,
}

/// A batch split into equally sized mini-batches. Borrows the samples of its batch.
#[derive(Debug, Clone)]
pub struct Suite<'a> {
    mini_batches: Vec<Vec<&'a Sample>>,
}

impl Sample {
    pub fn new(pixels: Vec<f64>, label: usize) -> Self {
        Self { pixels, label }
    }

    /// The pixels as a column vector.
    pub fn input_matrix(&self) -> Result<Matrix<f64>> {
        Matrix::column(&self.pixels)
    }

    /// One-hot column vector of length `n_outputs` with a 1 at `label`.
    pub fn target_matrix(&self, n_outputs: usize) -> Result<Matrix<f64>> {
        let mut target = Matrix::new(n_outputs, 1)?;
        target.set(self.label, 0, 1.0)?;
        Ok(target)
    }
}

impl Batch {
    /// Fails on an empty sample list or when pixel lengths differ.
    pub fn new(samples: Vec<Sample>, kind: DataKind) -> Result<Self> {
        let Some(first) = samples.first() else {
            return Err(Error::InvalidArgument("a batch needs at least one sample".into()));
        };

        let len = first.pixels.len();
        if len == 0 {
            return Err(Error::InvalidArgument("samples have no pixels".into()));
        }
        if let Some(bad) = samples.iter().find(|s| s.pixels.len() != len) {
            return Err(Error::DimensionMismatch {
                left: (len, 1),
                right: (bad.pixels.len(), 1),
            });
        }

        Ok(Self { samples, kind })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn pixel_len(&self) -> usize {
        self.samples[0].pixels.len()
    }

    /// Splits the batch in order into mini-batches of `size` samples.
    /// Remainder samples are left out.
    pub fn divide(&self, size: usize) -> Result<Suite<'_>> {
        self.check_mini_batch_size(size)?;
        let mini_batches = self
            .samples
            .chunks_exact(size)
            .map(|chunk| chunk.iter().collect())
            .collect();
        Ok(Suite { mini_batches })
    }

    /// Like [`Batch::divide`], but shuffles the sample order first.
    pub fn divide_shuffled<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Result<Suite<'_>> {
        self.check_mini_batch_size(size)?;
        let mut order: Vec<&Sample> = self.samples.iter().collect();
        order.shuffle(rng);
        let mini_batches = order.chunks_exact(size).map(<[_]>::to_vec).collect();
        Ok(Suite { mini_batches })
    }

    fn check_mini_batch_size(&self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(Error::InvalidArgument("mini-batch size must be non-zero".into()));
        }
        if size > self.len() {
            return Err(Error::InvalidArgument(format!(
                "mini-batch size {size} exceeds the {} samples in the batch",
                self.len()
            )));
        }
        Ok(())
    }
}

impl<'a> Suite<'a> {
    pub fn len(&self) -> usize {
        self.mini_batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mini_batches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<&'a Sample>> {
        self.mini_batches.iter()
    }
}
