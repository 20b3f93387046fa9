//! 가중치 파일에서 복원하는 네이티브 LSTM 네트워크.
//!
//! 학습 시 사용한 구조(LSTM 50 → Dropout 0.2 → LSTM 50 → Dense 1)를 재구성하고
//! 가중치만 불러옵니다. Dropout은 추론 시 항등 연산이므로 생략합니다.
//!
//! # 가중치 파일 형식
//!
//! ```json
//! {
//!   "lstm": [
//!     { "kernel": [[...]], "recurrent_kernel": [[...]], "bias": [...] },
//!     { "kernel": [[...]], "recurrent_kernel": [[...]], "bias": [...] }
//!   ],
//!   "dense": { "kernel": [[...]], "bias": [...] }
//! }
//! ```
//!
//! 게이트 순서는 Keras와 같은 i, f, c, o 입니다.
//! - `kernel`: `[input_dim][4 × units]`
//! - `recurrent_kernel`: `[units][4 × units]`
//! - `bias`: `[4 × units]`

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use forecast_core::{ForecastError, ForecastResult};

use super::artifact::InferenceArtifact;
use super::window::InputWindow;

/// 복원할 네트워크 구조.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LstmArchitecture {
    /// 쌓인 LSTM 층 수
    pub layers: usize,
    /// 층별 유닛 수
    pub units: usize,
    /// 입력 feature 수
    pub input_dim: usize,
    /// 층 사이 dropout 비율 (학습 전용)
    pub dropout: f32,
}

impl Default for LstmArchitecture {
    fn default() -> Self {
        Self {
            layers: 2,
            units: 50,
            input_dim: 1,
            dropout: 0.2,
        }
    }
}

/// 가중치 형태 검증 에러.
#[derive(Debug, Error, PartialEq)]
pub enum WeightShapeError {
    #[error("expected {expected} LSTM layers, found {actual}")]
    LayerCount { expected: usize, actual: usize },

    #[error("{tensor}: expected shape {expected}, found {actual}")]
    Shape {
        tensor: String,
        expected: String,
        actual: String,
    },
}

impl From<WeightShapeError> for ForecastError {
    fn from(err: WeightShapeError) -> Self {
        ForecastError::ModelLoad(err.to_string())
    }
}

/// LSTM 한 층의 가중치.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmLayerWeights {
    pub kernel: Vec<Vec<f32>>,
    pub recurrent_kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

/// 출력 Dense 층의 가중치.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseWeights {
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

/// 가중치 파일 전체.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmWeights {
    pub lstm: Vec<LstmLayerWeights>,
    pub dense: DenseWeights,
}

impl LstmWeights {
    /// 모든 값이 `value`인 가중치를 만듭니다.
    pub fn constant(arch: LstmArchitecture, value: f32) -> Self {
        let gates = 4 * arch.units;
        let lstm = (0..arch.layers)
            .map(|layer| {
                let input_dim = if layer == 0 { arch.input_dim } else { arch.units };
                LstmLayerWeights {
                    kernel: vec![vec![value; gates]; input_dim],
                    recurrent_kernel: vec![vec![value; gates]; arch.units],
                    bias: vec![value; gates],
                }
            })
            .collect();

        Self {
            lstm,
            dense: DenseWeights {
                kernel: vec![vec![value]; arch.units],
                bias: vec![value],
            },
        }
    }

    /// 0 가중치. 출력은 항상 정확히 0입니다.
    pub fn zeros(arch: LstmArchitecture) -> Self {
        Self::constant(arch, 0.0)
    }

    /// JSON 파일에서 읽습니다.
    pub fn from_json_file(path: &Path) -> ForecastResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::ModelLoad(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ForecastError::ModelLoad(format!("invalid weights file {}: {}", path.display(), e))
        })
    }

    /// JSON 파일로 씁니다.
    pub fn save_json_file(&self, path: &Path) -> ForecastResult<()> {
        let raw = serde_json::to_string(self)?;
        std::fs::write(path, raw).map_err(|e| {
            ForecastError::ModelLoad(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// 구조와 가중치 형태가 일치하는지 검증합니다.
    pub fn validate(&self, arch: &LstmArchitecture) -> Result<(), WeightShapeError> {
        if self.lstm.len() != arch.layers {
            return Err(WeightShapeError::LayerCount {
                expected: arch.layers,
                actual: self.lstm.len(),
            });
        }

        let gates = 4 * arch.units;
        for (idx, layer) in self.lstm.iter().enumerate() {
            let input_dim = if idx == 0 { arch.input_dim } else { arch.units };
            check_matrix(&format!("lstm[{}].kernel", idx), &layer.kernel, input_dim, gates)?;
            check_matrix(
                &format!("lstm[{}].recurrent_kernel", idx),
                &layer.recurrent_kernel,
                arch.units,
                gates,
            )?;
            check_vector(&format!("lstm[{}].bias", idx), &layer.bias, gates)?;
        }

        check_matrix("dense.kernel", &self.dense.kernel, arch.units, 1)?;
        check_vector("dense.bias", &self.dense.bias, 1)?;
        Ok(())
    }
}

fn check_matrix(
    tensor: &str,
    matrix: &[Vec<f32>],
    rows: usize,
    cols: usize,
) -> Result<(), WeightShapeError> {
    let bad_row = matrix.iter().find(|row| row.len() != cols);
    if matrix.len() != rows || bad_row.is_some() {
        let actual_cols = bad_row.or(matrix.first()).map_or(0, Vec::len);
        return Err(WeightShapeError::Shape {
            tensor: tensor.to_string(),
            expected: format!("[{}, {}]", rows, cols),
            actual: format!("[{}, {}]", matrix.len(), actual_cols),
        });
    }
    Ok(())
}

fn check_vector(tensor: &str, vector: &[f32], len: usize) -> Result<(), WeightShapeError> {
    if vector.len() != len {
        return Err(WeightShapeError::Shape {
            tensor: tensor.to_string(),
            expected: format!("[{}]", len),
            actual: format!("[{}]", vector.len()),
        });
    }
    Ok(())
}

/// 행 우선으로 평탄화한 LSTM 층.
#[derive(Debug)]
struct LstmLayer {
    units: usize,
    input_dim: usize,
    /// `input_dim × 4u`
    kernel: Vec<f32>,
    /// `u × 4u`
    recurrent: Vec<f32>,
    bias: Vec<f32>,
}

impl LstmLayer {
    fn from_weights(weights: &LstmLayerWeights, input_dim: usize, units: usize) -> Self {
        Self {
            units,
            input_dim,
            kernel: weights.kernel.concat(),
            recurrent: weights.recurrent_kernel.concat(),
            bias: weights.bias.clone(),
        }
    }

    /// 입력 시퀀스 전체에 대한 은닉 상태 시퀀스를 반환합니다.
    ///
    /// `inputs`는 `steps × input_dim`으로 평탄화되어 있습니다.
    fn forward(&self, inputs: &[f32], steps: usize) -> Vec<f32> {
        let u = self.units;
        let gates = 4 * u;
        let mut h = vec![0.0f32; u];
        let mut c = vec![0.0f32; u];
        let mut z = vec![0.0f32; gates];
        let mut outputs = Vec::with_capacity(steps * u);

        for step in 0..steps {
            let x = &inputs[step * self.input_dim..(step + 1) * self.input_dim];
            z.copy_from_slice(&self.bias);

            for (j, &xj) in x.iter().enumerate() {
                if xj != 0.0 {
                    let row = &self.kernel[j * gates..(j + 1) * gates];
                    z.iter_mut().zip(row).for_each(|(zi, w)| *zi += xj * w);
                }
            }
            for (k, &hk) in h.iter().enumerate() {
                if hk != 0.0 {
                    let row = &self.recurrent[k * gates..(k + 1) * gates];
                    z.iter_mut().zip(row).for_each(|(zi, w)| *zi += hk * w);
                }
            }

            for n in 0..u {
                let i = sigmoid(z[n]);
                let f = sigmoid(z[u + n]);
                let g = z[2 * u + n].tanh();
                let o = sigmoid(z[3 * u + n]);
                c[n] = f * c[n] + i * g;
                h[n] = o * c[n].tanh();
            }
            outputs.extend_from_slice(&h);
        }

        outputs
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// 가중치로 복원한 LSTM 회귀 네트워크.
///
/// 불변 구조이므로 잠금 없이 여러 스레드에서 동시에 추론할 수 있습니다.
#[derive(Debug)]
pub struct LstmNetwork {
    time_steps: usize,
    input_dim: usize,
    layers: Vec<LstmLayer>,
    dense_kernel: Vec<f32>,
    dense_bias: f32,
}

impl LstmNetwork {
    /// 가중치를 검증하고 네트워크를 구성합니다.
    pub fn from_weights(
        weights: &LstmWeights,
        arch: LstmArchitecture,
        time_steps: usize,
    ) -> ForecastResult<Self> {
        weights.validate(&arch)?;

        let layers = weights
            .lstm
            .iter()
            .enumerate()
            .map(|(idx, layer)| {
                let input_dim = if idx == 0 { arch.input_dim } else { arch.units };
                LstmLayer::from_weights(layer, input_dim, arch.units)
            })
            .collect();

        debug!(
            time_steps,
            layers = arch.layers,
            units = arch.units,
            "LSTM network reconstructed from weights"
        );

        Ok(Self {
            time_steps,
            input_dim: arch.input_dim,
            layers,
            dense_kernel: weights.dense.kernel.concat(),
            dense_bias: weights.dense.bias[0],
        })
    }
}

impl InferenceArtifact for LstmNetwork {
    fn predict(&self, window: &InputWindow) -> ForecastResult<f32> {
        if self.input_dim != 1 {
            return Err(ForecastError::Inference(format!(
                "network expects {} input features, window has 1",
                self.input_dim
            )));
        }

        let steps = window.time_steps();
        let mut sequence = window.values().to_vec();
        for layer in &self.layers {
            sequence = layer.forward(&sequence, steps);
        }

        let units = self.dense_kernel.len();
        let last_hidden = sequence
            .get(sequence.len().saturating_sub(units)..)
            .filter(|h| h.len() == units)
            .ok_or_else(|| ForecastError::Inference("empty LSTM output".to_string()))?;

        let output = last_hidden
            .iter()
            .zip(&self.dense_kernel)
            .map(|(h, w)| h * w)
            .sum::<f32>()
            + self.dense_bias;

        Ok(output)
    }

    fn time_steps(&self) -> usize {
        self.time_steps
    }

    fn kind(&self) -> &'static str {
        "weights"
    }
}
