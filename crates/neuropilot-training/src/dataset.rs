//! Synthetic training data.
//!
//! Features are uniform in [0, 1); a sample is labeled hesitant when its
//! first feature (inactivity) exceeds the label threshold.

use candle_core::{Device, Tensor};
use neuropilot_core::constants::FEATURE_COUNT;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{tensor_error, TrainingResult};

#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    features: Vec<[f32; FEATURE_COUNT]>,
    labels: Vec<f32>,
}

impl SyntheticDataset {
    pub fn generate<R: Rng + ?Sized>(num_samples: usize, label_threshold: f32, rng: &mut R) -> Self {
        let mut features = Vec::with_capacity(num_samples);
        let mut labels = Vec::with_capacity(num_samples);
        for _ in 0..num_samples {
            let sample: [f32; FEATURE_COUNT] = std::array::from_fn(|_| rng.gen::<f32>());
            labels.push(if sample[0] > label_threshold { 1.0 } else { 0.0 });
            features.push(sample);
        }
        Self { features, labels }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[[f32; FEATURE_COUNT]] {
        &self.features
    }

    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    /// Fraction of samples labeled hesitant.
    pub fn positive_fraction(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.labels.iter().sum::<f32>() / self.len() as f32
    }

    /// Shuffled sample indices split into batches of at most `batch_size`.
    pub fn shuffled_batches<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        order
            .chunks(batch_size.max(1))
            .map(<[usize]>::to_vec)
            .collect()
    }

    /// `([batch, FEATURE_COUNT], [batch, 1])` tensors for the given samples.
    pub fn batch_tensors(&self, indices: &[usize], device: &Device) -> TrainingResult<(Tensor, Tensor)> {
        let xs: Vec<f32> = indices
            .iter()
            .flat_map(|&i| self.features[i])
            .collect();
        let ys: Vec<f32> = indices.iter().map(|&i| self.labels[i]).collect();
        let xs = Tensor::from_vec(xs, (indices.len(), FEATURE_COUNT), device).map_err(tensor_error)?;
        let ys = Tensor::from_vec(ys, (indices.len(), 1), device).map_err(tensor_error)?;
        Ok((xs, ys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn labels_follow_first_feature() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = SyntheticDataset::generate(500, 0.7, &mut rng);
        assert_eq!(data.len(), 500);
        for (x, y) in data.features().iter().zip(data.labels()) {
            assert!(x.iter().all(|v| (0.0..1.0).contains(v)));
            assert_eq!(*y, if x[0] > 0.7 { 1.0 } else { 0.0 });
        }
        let positive = data.positive_fraction();
        assert!((0.15..0.45).contains(&positive), "{positive}");
    }

    #[test]
    fn same_seed_same_data() {
        let a = SyntheticDataset::generate(20, 0.7, &mut StdRng::seed_from_u64(1));
        let b = SyntheticDataset::generate(20, 0.7, &mut StdRng::seed_from_u64(1));
        assert_eq!(a.features(), b.features());
    }

    #[test]
    fn batches_cover_every_sample_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = SyntheticDataset::generate(100, 0.7, &mut rng);
        let batches = data.shuffled_batches(32, &mut rng);
        assert_eq!(batches.len(), 4);
        assert_eq!(batches.last().unwrap().len(), 4);

        let mut seen: Vec<usize> = batches.into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn batch_tensor_shapes() {
        let data = SyntheticDataset::generate(10, 0.7, &mut StdRng::seed_from_u64(0));
        let (xs, ys) = data.batch_tensors(&[0, 3, 5], &Device::Cpu).unwrap();
        assert_eq!(xs.dims(), &[3, FEATURE_COUNT]);
        assert_eq!(ys.dims(), &[3, 1]);
    }
}
