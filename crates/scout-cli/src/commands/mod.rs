//! CLI 명령어 구현 모듈.

pub mod patterns;
pub mod scan;

use std::path::Path;

use tracing::debug;

use scout_core::config::DEFAULT_CONFIG_PATH;
use scout_core::{AppConfig, CoreResult};

/// 설정을 로드합니다.
///
/// 명시적 경로가 없으면 기본 경로를 시도하고, 파일이 없으면
/// 내장 기본값으로 동작합니다.
pub fn load_app_config(path: Option<&str>) -> CoreResult<AppConfig> {
    match path {
        Some(p) => {
            debug!(path = %p, "설정 파일 로드");
            AppConfig::load(p)
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            debug!(path = %DEFAULT_CONFIG_PATH, "기본 설정 파일 로드");
            AppConfig::load_default()
        }
        None => {
            debug!("내장 기본 설정 사용");
            Ok(AppConfig::default())
        }
    }
}
