//! Mini-batch index plans
//!
//! The training split is reshuffled every epoch; the evaluation split is
//! always visited in index order. Batches are consecutive chunks of the
//! (possibly permuted) index list, so only the last one can be short.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// How a split is ordered before chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingOrder {
    Shuffled,
    Sequential,
}

/// Number of batches needed to cover `len` samples
pub fn num_batches(len: usize, batch_size: usize) -> usize {
    assert!(batch_size > 0, "batch size must be positive");
    len.div_ceil(batch_size)
}

/// An ordered set of sample indices, split into batches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    indices: Vec<usize>,
    batch_size: usize,
}

impl BatchPlan {
    /// Indices `0..len` in order
    pub fn sequential(len: usize, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        Self {
            indices: (0..len).collect(),
            batch_size,
        }
    }

    /// A random permutation of `0..len`
    pub fn shuffled<R: Rng + ?Sized>(len: usize, batch_size: usize, rng: &mut R) -> Self {
        let mut plan = Self::sequential(len, batch_size);
        plan.indices.shuffle(rng);
        plan
    }

    pub fn num_batches(&self) -> usize {
        num_batches(self.indices.len(), self.batch_size)
    }

    /// Total number of samples covered
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over the batches in order
    pub fn batches(&self) -> std::slice::Chunks<'_, usize> {
        self.indices.chunks(self.batch_size)
    }
}

/// Produces one batch plan per split per epoch
#[derive(Debug, Clone)]
pub struct EpochSampler {
    batch_size: usize,
    rng: ChaCha8Rng,
}

impl EpochSampler {
    pub fn new(batch_size: usize, seed: u64) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        Self {
            batch_size,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Plan the next pass over a split of `len` samples
    pub fn plan(&mut self, order: SamplingOrder, len: usize) -> BatchPlan {
        match order {
            SamplingOrder::Shuffled => BatchPlan::shuffled(len, self.batch_size, &mut self.rng),
            SamplingOrder::Sequential => BatchPlan::sequential(len, self.batch_size),
        }
    }
}
