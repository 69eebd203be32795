//! Mixed discrete/continuous reconstruction loss

use super::cross_entropy::{argmax, class_cross_entropy};
use super::kernel::{assert_same_len, ItemLosses};
use super::{LossFn, Reduction};
use crate::data::FeatureGroupSlices;
use crate::error::Result;
use crate::Tensor;
use ndarray::Array1;
use std::ops::Range;

/// Cross-entropy on each one-hot discrete group plus MSE on the continuous tail
///
/// Inputs are `(N, D)`. For every discrete group `g` the prediction columns
/// are logits and the target class is the argmax of the target columns. The
/// continuous region starts where the last discrete group ends.
///
/// With [`Reduction::Mean`] each group's cross-entropy is averaged over the
/// batch and the squared error over all continuous entries. With
/// [`Reduction::None`] the result is one value per sample.
#[derive(Debug, Clone)]
pub struct MixedLoss {
    disc_groups: Vec<Range<usize>>,
    cont_start: usize,
    disc_loss_factor: f32,
    pub reduction: Reduction,
}

impl MixedLoss {
    pub fn new(
        slices: &FeatureGroupSlices,
        disc_loss_factor: f32,
        reduction: Reduction,
    ) -> Result<Self> {
        let cont_start = slices.validate_discrete()?;
        let disc_groups = slices.discrete().map(<[_]>::to_vec).unwrap_or_default();
        Ok(Self { disc_groups, cont_start, disc_loss_factor, reduction })
    }

    pub fn cont_start(&self) -> usize {
        self.cont_start
    }

    pub fn disc_groups(&self) -> &[Range<usize>] {
        &self.disc_groups
    }
}

impl LossFn for MixedLoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_same_len(predictions, targets);
        let rows = predictions.batch_size();
        let width = predictions.sample_len();
        assert!(
            self.cont_start <= width,
            "Discrete groups end at column {} but inputs have {width} columns",
            self.cont_start
        );
        let cont_width = width - self.cont_start;

        // Mean reduces each term over its own element count; fold that into
        // per-sample values and sum them.
        let (ce_scale, se_scale, reduction) = match self.reduction {
            Reduction::Mean => (
                1.0 / rows.max(1) as f32,
                1.0 / (rows * cont_width).max(1) as f32,
                Reduction::Sum,
            ),
            other => (1.0, 1.0, other),
        };
        let ce_scale = ce_scale * self.disc_loss_factor;

        let pred = predictions.as_slice();
        let target = targets.as_slice();
        let mut values = vec![0.0; rows];
        let mut local_grad = Array1::zeros(pred.len());
        let mut owner = vec![0; pred.len()];

        for group in &self.disc_groups {
            let k = group.len();
            let mut logits = Vec::with_capacity(rows * k);
            let mut classes = Vec::with_capacity(rows);
            for n in 0..rows {
                let cols = n * width + group.start..n * width + group.end;
                logits.extend_from_slice(&pred[cols.clone()]);
                classes.push(argmax(&target[cols]));
            }

            let ce = class_cross_entropy(&logits, &classes, k, vec![rows]);
            for n in 0..rows {
                values[n] += ce_scale * ce.values[n];
                for c in 0..k {
                    let j = n * width + group.start + c;
                    local_grad[j] += ce_scale * ce.local_grad[n * k + c];
                    owner[j] = n;
                }
            }
        }

        for n in 0..rows {
            for c in self.cont_start..width {
                let j = n * width + c;
                let diff = pred[j] - target[j];
                values[n] += se_scale * diff * diff;
                local_grad[j] = se_scale * 2.0 * diff;
                owner[j] = n;
            }
        }

        ItemLosses { values, item_shape: vec![rows], local_grad, owner: Some(owner) }
            .reduce(predictions, reduction)
    }

    fn name(&self) -> &'static str {
        "Mixed"
    }
}
