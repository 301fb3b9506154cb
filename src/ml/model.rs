use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::relu,
};

use crate::domain::grid::GridConfig;
use crate::domain::vocabulary::{PAD_ID, VOCAB_SIZE};

// Two 2x2 pooling stages need at least 4 cells along each axis.
const MIN_SPATIAL: usize = 4;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct TextualCnnConfig {
    /// Grid dimensions the model is trained on; inference must encode with the same
    pub grid:          GridConfig,
    #[config(default = "VOCAB_SIZE")]
    pub vocab_size:    usize,
    #[config(default = 32)]
    pub emb_dim:       usize,
    #[config(default = "[64, 128, 256]")]
    pub conv_channels: [usize; 3],
    #[config(default = 128)]
    pub hidden:        usize,
    #[config(default = 0.5)]
    pub dropout:       f64,
}

impl TextualCnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TextualCnn<B> {
        let [c1, c2, c3] = self.conv_channels;

        let conv = |c_in: usize, c_out: usize| {
            Conv2dConfig::new([c_in, c_out], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device)
        };

        TextualCnn {
            embedding: EmbeddingConfig::new(self.vocab_size, self.emb_dim).init(device),
            conv1:     conv(self.emb_dim, c1),
            bn1:       BatchNormConfig::new(c1).init(device),
            conv2:     conv(c1, c2),
            bn2:       BatchNormConfig::new(c2).init(device),
            conv3:     conv(c2, c3),
            bn3:       BatchNormConfig::new(c3).init(device),
            pool:      MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            dropout:   DropoutConfig::new(self.dropout).init(),
            fc1:       LinearConfig::new(c3, self.hidden).init(device),
            fc_out:    LinearConfig::new(self.hidden, 1).init(device),
        }
    }
}

/// CNN over a grid of character IDs.
///
/// PAD embeds to the zero vector, so the PAD rows added by collation
/// and by `pad_to_min_extent` carry no signal.
///
/// grid [B, H, W] → embed [B, E, H, W]
///   → conv/bn/relu/pool → conv/bn/relu/pool → conv/bn/relu
///   → global average pool [B, c3] → fc1/relu/dropout → fc_out [B]
#[derive(Module, Debug)]
pub struct TextualCnn<B: Backend> {
    pub embedding: Embedding<B>,
    pub conv1:     Conv2d<B>,
    pub bn1:       BatchNorm<B, 2>,
    pub conv2:     Conv2d<B>,
    pub bn2:       BatchNorm<B, 2>,
    pub conv3:     Conv2d<B>,
    pub bn3:       BatchNorm<B, 2>,
    pub pool:      MaxPool2d,
    pub dropout:   Dropout,
    pub fc1:       Linear<B>,
    pub fc_out:    Linear<B>,
}

impl<B: Backend> TextualCnn<B> {
    /// grid_ids: [batch, rows, width] → logits: [batch]
    /// sigmoid(logit) is the probability that the text is generated.
    pub fn forward(&self, grid_ids: Tensor<B, 3, Int>) -> Tensor<B, 1> {
        let grid_ids = pad_to_min_extent(grid_ids);
        let batch_size = grid_ids.dims()[0];
        let x = self.embed(grid_ids);

        let x = self.pool.forward(relu(self.bn1.forward(self.conv1.forward(x))));
        let x = self.pool.forward(relu(self.bn2.forward(self.conv2.forward(x))));
        let x = relu(self.bn3.forward(self.conv3.forward(x)));

        // Global average pool over rows and columns
        let [_, channels, _, _] = x.dims();
        let x = x.mean_dim(3).mean_dim(2).reshape([batch_size, channels]);

        let x = self.dropout.forward(relu(self.fc1.forward(x)));
        self.fc_out.forward(x).reshape([batch_size])
    }

    /// grid_ids: [batch, rows, width] → embeddings: [batch, emb_dim, rows, width]
    ///
    /// PAD cells are zeroed after the lookup, which also keeps the PAD
    /// row of the embedding table out of the gradient.
    pub fn embed(&self, grid_ids: Tensor<B, 3, Int>) -> Tensor<B, 4> {
        let [batch_size, rows, width] = grid_ids.dims();

        // Embedding works on [batch, seq]; flatten the grid then restore it
        let ids = grid_ids.reshape([batch_size, rows * width]);
        let not_pad = ids
            .clone()
            .not_equal_elem(PAD_ID as i64)
            .float()
            .unsqueeze_dim::<3>(2);
        let x = self.embedding.forward(ids) * not_pad;

        let emb_dim = x.dims()[2];
        x.reshape([batch_size, rows, width, emb_dim]).permute([0, 3, 1, 2])
    }

    /// Binary cross-entropy on raw logits against float targets in [0, 1].
    pub fn forward_loss(
        &self,
        grid_ids: Tensor<B, 3, Int>,
        targets:  Tensor<B, 1>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let logits = self.forward(grid_ids);
        let loss = bce_with_logits(logits.clone(), targets);
        (loss, logits)
    }
}

/// mean( max(x, 0) - x·y + ln(1 + e^-|x|) ), stable for large |x|.
pub fn bce_with_logits<B: Backend>(logits: Tensor<B, 1>, targets: Tensor<B, 1>) -> Tensor<B, 1> {
    let softplus = logits.clone().abs().neg().exp().add_scalar(1.0).log();
    (logits.clone().clamp_min(0.0) - logits * targets + softplus).mean()
}

/// Extend tiny grids with PAD so pooling never yields an empty map.
fn pad_to_min_extent<B: Backend>(grid_ids: Tensor<B, 3, Int>) -> Tensor<B, 3, Int> {
    let [batch_size, rows, width] = grid_ids.dims();
    let device = grid_ids.device();

    let grid_ids = if rows < MIN_SPATIAL {
        let pad = Tensor::<B, 3, Int>::zeros([batch_size, MIN_SPATIAL - rows, width], &device);
        Tensor::cat(vec![grid_ids, pad], 1)
    } else {
        grid_ids
    };

    let rows = rows.max(MIN_SPATIAL);
    if width < MIN_SPATIAL {
        let pad = Tensor::<B, 3, Int>::zeros([batch_size, rows, MIN_SPATIAL - width], &device);
        Tensor::cat(vec![grid_ids, pad], 2)
    } else {
        grid_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::TensorData;

    type TestBackend = NdArray;

    fn small_config(width: usize) -> TextualCnnConfig {
        TextualCnnConfig::new(GridConfig::new(width, 8).unwrap())
            .with_emb_dim(4)
            .with_conv_channels([4, 4, 4])
            .with_hidden(8)
    }

    #[test]
    fn test_forward_single_row_grids() {
        let device = Default::default();
        let model: TextualCnn<TestBackend> = small_config(5).init(&device);

        let grids = Tensor::<TestBackend, 3, Int>::zeros([2, 1, 5], &device);
        assert_eq!(model.forward(grids).dims(), [2]);
    }

    #[test]
    fn test_forward_variable_heights() {
        let device = Default::default();
        let model: TextualCnn<TestBackend> = small_config(16).init(&device);

        for rows in [1, 4, 7] {
            let grids = Tensor::<TestBackend, 3, Int>::ones([3, rows, 16], &device);
            assert_eq!(model.forward(grids).dims(), [3]);
        }
    }

    #[test]
    fn test_pad_embeds_to_zero() {
        let device = Default::default();
        let model: TextualCnn<TestBackend> =
            TextualCnnConfig::new(GridConfig::default()).init(&device);

        // [[PAD, 'H'], [PAD, 'i']]
        let ids = Tensor::<TestBackend, 3, Int>::from_data(
            TensorData::new(vec![0i64, 41, 0, 74], [1, 2, 2]),
            &device,
        );
        let emb = model.embed(ids);
        assert_eq!(emb.dims(), [1, 32, 2, 2]);

        // One row per cell, row-major over the grid
        let per_cell = emb.permute([0, 2, 3, 1]).reshape([4, 32]).abs().sum_dim(1);
        let norms = per_cell.into_data().convert::<f32>().to_vec::<f32>().unwrap();
        assert_eq!(norms[0], 0.0);
        assert_eq!(norms[2], 0.0);
        assert!(norms[1] > 0.0 && norms[3] > 0.0);
    }

    #[test]
    fn test_pad_row_gets_no_gradient() {
        type TrainBackend = Autodiff<TestBackend>;
        let device = Default::default();
        let model: TextualCnn<TrainBackend> = small_config(4).init(&device);

        // [[PAD, 'a', PAD, 'a']]
        let ids = Tensor::<TrainBackend, 3, Int>::from_data(
            TensorData::new(vec![0i64, 66, 0, 66], [1, 1, 4]),
            &device,
        );
        let grads = model.embed(ids).sum().backward();
        let weight_grad = model.embedding.weight.val().grad(&grads).unwrap();

        let emb_dim = weight_grad.dims()[1];
        let pad_grad: f32 = weight_grad.clone().slice([0..1, 0..emb_dim]).abs().sum().into_scalar().elem();
        let a_grad: f32 = weight_grad.slice([66..67, 0..emb_dim]).abs().sum().into_scalar().elem();
        assert_eq!(pad_grad, 0.0);
        assert!(a_grad > 0.0);
    }

    #[test]
    fn test_pad_to_min_extent() {
        let device = Default::default();
        let grids = Tensor::<TestBackend, 3, Int>::ones([1, 2, 3], &device);
        let padded = pad_to_min_extent(grids);
        assert_eq!(padded.dims(), [1, 4, 4]);

        let ids = padded.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(ids.iter().sum::<i64>(), 6);
    }

    #[test]
    fn test_bce_matches_closed_form() {
        let device = Default::default();
        let logits  = Tensor::<TestBackend, 1>::from_floats([0.0, 2.0, -3.0], &device);
        let targets = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 0.0], &device);

        let loss: f64 = bce_with_logits(logits, targets).into_scalar().elem::<f64>();

        let expected = ((2.0f64).ln()
            + (1.0 + (2.0f64).exp()).ln()
            + (1.0 + (-3.0f64).exp()).ln()) / 3.0;
        assert!((loss - expected).abs() < 1e-5, "loss {loss}, expected {expected}");
    }

    #[test]
    fn test_config_defaults() {
        let cfg = TextualCnnConfig::new(GridConfig::default());
        assert_eq!(cfg.vocab_size, VOCAB_SIZE);
        assert_eq!(cfg.emb_dim, 32);
        assert_eq!(cfg.conv_channels, [64, 128, 256]);
        assert_eq!(cfg.hidden, 128);
    }
}
