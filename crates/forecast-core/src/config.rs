//! 설정 관리.
//!
//! 선택적 TOML 파일 위에 `FORECAST__` 접두사 환경 변수를 덮어씁니다.
//! 예: `FORECAST__SERVER__PORT=8080`, `FORECAST__MODELS__DIR=/srv/models`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ForecastError;

/// 환경 변수 접두사.
const ENV_PREFIX: &str = "FORECAST";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 모델 아티팩트 설정
    pub models: ModelConfig,
    /// 예측 기본값 및 한도
    pub forecast: ForecastConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 모델 아티팩트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 아티팩트 디렉토리 (`lstm_{T}.onnx`, `lstm_{T}.weights.json`)
    pub dir: PathBuf,
    /// 시작 시 미리 로드할 time_steps 목록
    pub preload: Vec<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            preload: Vec::new(),
        }
    }
}

/// 예측 요청 기본값 및 한도.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// 입력 윈도우 길이 기본값
    pub default_time_steps: usize,
    /// 예측 일수 기본값
    pub default_predict_days: usize,
    /// 요청당 최대 예측 일수
    pub max_predict_days: usize,
    /// 표시 기간 기본값
    pub default_period: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_time_steps: 60,
            default_predict_days: 30,
            max_predict_days: 365,
            default_period: "1y".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ForecastError> {
        Self::build(
            config::Config::builder()
                .add_source(config::File::from(path.as_ref()).required(false))
                .add_source(env_source()),
        )
    }

    /// 설정 파일 없이 기본값과 `FORECAST__*` 환경 변수만으로 설정을 만듭니다.
    pub fn from_env_only() -> Result<Self, ForecastError> {
        Self::build(config::Config::builder().add_source(env_source()))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ForecastError> {
        let app: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ForecastError::Config(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    /// 서버 바인딩 주소 (`host:port`).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate(&self) -> Result<(), ForecastError> {
        let f = &self.forecast;
        if f.default_time_steps == 0 {
            return Err(ForecastError::Config(
                "forecast.default_time_steps must be positive".to_string(),
            ));
        }
        if f.max_predict_days == 0 || f.default_predict_days > f.max_predict_days {
            return Err(ForecastError::Config(format!(
                "forecast.default_predict_days ({}) must be within 1..={}",
                f.default_predict_days, f.max_predict_days
            )));
        }
        if self.models.preload.contains(&0) {
            return Err(ForecastError::Config(
                "models.preload must not contain 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("models.preload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.forecast.default_time_steps, 60);
        assert_eq!(config.forecast.default_predict_days, 30);
        assert_eq!(config.forecast.max_predict_days, 365);
        assert_eq!(config.forecast.default_period, "1y");
        assert_eq!(config.models.dir, PathBuf::from("models"));
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = std::env::temp_dir().join(format!("forecast-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[models]\ndir = \"/srv/models\"\npreload = [60, 120]"
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.models.dir, PathBuf::from("/srv/models"));
        assert_eq!(config.models.preload, vec![60, 120]);
        assert_eq!(config.forecast.default_time_steps, 60);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.forecast.max_predict_days, 365);
    }

    #[test]
    fn test_from_env_only_matches_defaults() {
        // 테스트 환경에는 FORECAST__* 변수가 없음
        let config = AppConfig::from_env_only().unwrap();
        assert_eq!(config.forecast.max_predict_days, 365);
        assert_eq!(config.models.dir, PathBuf::from("models"));
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let mut config = AppConfig::default();
        config.forecast.default_predict_days = 400;
        assert!(matches!(config.validate(), Err(ForecastError::Config(_))));
    }
}
