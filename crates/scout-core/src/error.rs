//! 멘션 스카우트의 에러 타입.
//!
//! 탐지 호출 자체는 에러를 반환하지 않습니다 (빈 결과가 정상 출력).
//! 에러는 생성/설정 경계에서만 발생합니다.

use thiserror::Error;

/// 핵심 스카우트 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 심볼 형식
    #[error("잘못된 심볼: {0}")]
    InvalidSymbol(String),

    /// 패턴 컴파일 에러
    #[error("패턴 컴파일 실패: {0}")]
    Pattern(String),
}

/// 스카우트 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 설정 단계에서 발생한 에러인지 확인합니다.
    pub fn is_config(&self) -> bool {
        matches!(self, CoreError::Config(_) | CoreError::Pattern(_))
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
