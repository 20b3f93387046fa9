//! ONNX Runtime 아티팩트.
//!
//! 학습된 그래프 전체(`lstm_{T}.onnx`)를 직접 로드합니다.
//! 모델 입력: `[1, time_steps, 1]` float32, 출력: `[1, 1]` float32.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ort::session::{builder::GraphOptimizationLevel, Session};
use tracing::{debug, info};

use forecast_core::{ForecastError, ForecastResult};

use super::artifact::{InferenceArtifact, ModelHandle};
use super::registry::{onnx_artifact_path, LoadStrategy};
use super::window::InputWindow;

/// ONNX 세션 기반 아티팩트.
///
/// `Session::run`은 `&mut`가 필요하므로 세션을 mutex로 보호합니다.
/// 같은 핸들에 대한 추론은 직렬화됩니다.
pub struct OnnxArtifact {
    session: Mutex<Session>,
    time_steps: usize,
    path: PathBuf,
}

impl OnnxArtifact {
    /// 파일에서 ONNX 모델을 로드합니다.
    pub fn load(path: &Path, time_steps: usize, intra_threads: usize) -> ForecastResult<Self> {
        if !path.exists() {
            return Err(ForecastError::ModelLoad(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        info!(path = %path.display(), time_steps, "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| ForecastError::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ForecastError::ModelLoad(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(intra_threads)
            .map_err(|e| ForecastError::ModelLoad(format!("Failed to set intra threads: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ForecastError::ModelLoad(format!("Failed to load model: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            time_steps,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InferenceArtifact for OnnxArtifact {
    fn predict(&self, window: &InputWindow) -> ForecastResult<f32> {
        let [batch, steps, features] = window.shape();
        let shape = [batch as i64, steps as i64, features as i64];
        let input = ort::value::Tensor::from_array((shape, window.values().to_vec().into_boxed_slice()))
            .map_err(|e| ForecastError::Inference(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ForecastError::Inference("ONNX session lock poisoned".to_string()))?;

        // 모델 입력은 하나뿐이므로 위치 기반으로 전달
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| ForecastError::Inference(format!("Inference failed: {}", e)))?;

        // 첫 번째 출력 사용
        let output_name = outputs
            .iter()
            .next()
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| ForecastError::Inference("No output tensor found".to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| ForecastError::Inference("Failed to get output by name".to_string()))?;

        let (_, values) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ForecastError::Inference(format!("Failed to extract output tensor: {}", e)))?;

        let value = values
            .first()
            .copied()
            .ok_or_else(|| ForecastError::Inference("Empty output tensor".to_string()))?;

        debug!(output = value, "ONNX step");
        Ok(value)
    }

    fn time_steps(&self) -> usize {
        self.time_steps
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

/// `lstm_{T}.onnx`를 직접 로드하는 전략.
#[derive(Debug, Clone)]
pub struct OnnxLoadStrategy {
    intra_threads: usize,
}

impl OnnxLoadStrategy {
    pub fn new(intra_threads: usize) -> Self {
        Self {
            intra_threads: intra_threads.max(1),
        }
    }
}

impl Default for OnnxLoadStrategy {
    fn default() -> Self {
        Self::new(1)
    }
}

impl LoadStrategy for OnnxLoadStrategy {
    fn name(&self) -> &'static str {
        "onnx"
    }

    fn artifact_path(&self, dir: &Path, time_steps: usize) -> PathBuf {
        onnx_artifact_path(dir, time_steps)
    }

    fn load(&self, path: &Path, time_steps: usize) -> ForecastResult<ModelHandle> {
        let artifact = OnnxArtifact::load(path, time_steps, self.intra_threads)?;
        Ok(Arc::new(artifact))
    }
}
