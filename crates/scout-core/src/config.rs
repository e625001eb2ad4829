//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 탐지 점수 테이블은 코드에 하드코딩하지 않고 모두 여기서 주입됩니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 심볼 탐지 설정
    #[serde(default)]
    pub detection: DetectionConfig,
    /// 허용 목록 설정
    #[serde(default)]
    pub allowlist: AllowlistConfig,
    /// 분석 연결 설정
    #[serde(default)]
    pub linker: LinkerConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 심볼 탐지 설정.
///
/// 신뢰도 계산은 `base_confidence`에서 시작해 부스트를 더하고 페널티를
/// 뺀 뒤 `accept_threshold`와 비교합니다. 내부 합산은 1.0을 초과할 수
/// 있으며 출력 시에만 [0, 1]로 클램프됩니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// 후보 토큰 패턴 (단어 경계의 영문자 1~5자)
    pub symbol_pattern: String,
    /// 후보 기본 신뢰도
    pub base_confidence: f64,
    /// 결과 채택 임계값
    pub accept_threshold: f64,
    /// `$` 접두사 부스트
    pub prefix_boost: f64,
    /// 허용 목록 등재 부스트
    pub allowlist_boost: f64,
    /// 히브리어 주식 키워드 부스트 (강)
    pub hebrew_strong_boost: f64,
    /// 히브리어 주식 키워드 부스트 (중)
    pub hebrew_medium_boost: f64,
    /// 히브리어 주식 키워드 부스트 (약)
    pub hebrew_weak_boost: f64,
    /// 나열 문맥 부스트 (슬래시로 구분된 심볼 목록)
    pub list_context_boost: f64,
    /// 문맥 신뢰로 복구된 단일 문자 부스트
    pub single_letter_boost: f64,
    /// 모호한 토큰 페널티
    pub ambiguous_penalty: f64,
    /// 기술적 문맥 페널티 (거부권)
    pub technical_context_penalty: f64,
    /// 메시지당 최대 결과 수
    pub max_results: usize,
    /// 문맥 신뢰 발동에 필요한 최소 확정 심볼 수
    pub context_trust_min_symbols: usize,
    /// 문맥 신뢰 판정에 필요한 확정 심볼의 최소 신뢰도
    pub context_trust_min_confidence: f64,
    /// 기술적 문맥 검사 윈도우 (토큰 양쪽 문자 수)
    pub technical_window_chars: usize,
    /// 지리 토큰 검사 윈도우 (토큰 양쪽 문자 수)
    pub geo_window_chars: usize,
    /// 히브리어 키워드 검사 윈도우 (토큰 양쪽 문자 수)
    pub keyword_window_chars: usize,
    /// 강한 심볼 지표 검사 윈도우 (토큰 양쪽 문자 수)
    pub indicator_window_chars: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            symbol_pattern: r"\b[A-Za-z]{1,5}\b".to_string(),
            base_confidence: 0.5,
            accept_threshold: 0.5,
            prefix_boost: 0.4,
            allowlist_boost: 0.35,
            hebrew_strong_boost: 0.25,
            hebrew_medium_boost: 0.15,
            hebrew_weak_boost: 0.08,
            list_context_boost: 0.15,
            single_letter_boost: 0.15,
            ambiguous_penalty: 0.2,
            technical_context_penalty: 1.5,
            max_results: 25,
            context_trust_min_symbols: 1,
            context_trust_min_confidence: 0.7,
            technical_window_chars: 30,
            geo_window_chars: 50,
            keyword_window_chars: 60,
            indicator_window_chars: 100,
        }
    }
}

impl DetectionConfig {
    /// 점수 테이블의 일관성을 검증합니다.
    ///
    /// 핵심 불변식: 기술적 문맥 페널티는 가능한 모든 부스트의 합을
    /// 상쇄해야 합니다. 그렇지 않으면 부스트가 거부권을 무력화합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.accept_threshold) {
            return Err(CoreError::Config(format!(
                "accept_threshold는 [0, 1] 범위여야 합니다: {}",
                self.accept_threshold
            )));
        }
        if self.base_confidence < self.accept_threshold {
            return Err(CoreError::Config(format!(
                "base_confidence({})가 accept_threshold({})보다 작으면 \
                 무접두 심볼이 탐지되지 않습니다",
                self.base_confidence, self.accept_threshold
            )));
        }
        if self.allowlist_boost >= self.technical_context_penalty {
            return Err(CoreError::Config(format!(
                "allowlist_boost({})는 technical_context_penalty({})보다 \
                 작아야 합니다",
                self.allowlist_boost, self.technical_context_penalty
            )));
        }

        // 최대 부스트 스택에서도 기술적 문맥 거부권이 유지되어야 함
        let max_stack = self.base_confidence
            + self.prefix_boost
            + self.allowlist_boost
            + self.hebrew_strong_boost
            + self.list_context_boost
            + self.single_letter_boost;
        if max_stack - self.technical_context_penalty >= self.accept_threshold {
            return Err(CoreError::Config(format!(
                "technical_context_penalty({})가 최대 부스트 스택({})을 \
                 상쇄하지 못합니다",
                self.technical_context_penalty, max_stack
            )));
        }

        if self.symbol_pattern.is_empty() {
            return Err(CoreError::Config(
                "symbol_pattern이 비어 있습니다".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(CoreError::Config(
                "max_results는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.context_trust_min_symbols == 0 {
            return Err(CoreError::Config(
                "context_trust_min_symbols는 1 이상이어야 합니다".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.context_trust_min_confidence) {
            return Err(CoreError::Config(format!(
                "context_trust_min_confidence는 [0, 1] 범위여야 합니다: {}",
                self.context_trust_min_confidence
            )));
        }

        Ok(())
    }
}

/// 허용 목록 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllowlistConfig {
    /// 항목 유효 기간 (일)
    pub validity_days: i64,
    /// 백그라운드 정리 주기 (초)
    pub sweep_interval_secs: u64,
    /// 항목당 저장할 문맥 최대 문자 수
    pub context_max_chars: usize,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            validity_days: 14,
            sweep_interval_secs: 3600,
            context_max_chars: 200,
        }
    }
}

impl AllowlistConfig {
    /// 항목 유효 기간을 반환합니다.
    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::days(self.validity_days)
    }

    /// 백그라운드 정리 주기를 반환합니다.
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.validity_days <= 0 {
            return Err(CoreError::Config(format!(
                "validity_days는 양수여야 합니다: {}",
                self.validity_days
            )));
        }
        if self.sweep_interval_secs == 0 {
            return Err(CoreError::Config(
                "sweep_interval_secs는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 분석 연결 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkerConfig {
    /// 관리자(신뢰 작성자) ID 목록
    pub trusted_authors: Vec<String>,
    /// 분석 기록 요약 최대 문자 수
    pub summary_max_chars: usize,
    /// 분석 기록 보존 기간 (일)
    pub retention_days: i64,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            trusted_authors: Vec::new(),
            summary_max_chars: 300,
            retention_days: 30,
        }
    }
}

impl LinkerConfig {
    /// 분석 기록 보존 기간을 반환합니다.
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days)
    }

    /// 작성자가 신뢰 목록에 있는지 확인합니다.
    pub fn is_trusted(&self, author_id: &str) -> bool {
        self.trusted_authors.iter().any(|a| a == author_id)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SCOUT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 전체 설정의 일관성을 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        self.detection.validate()?;
        self.allowlist.validate()?;
        Ok(())
    }
}
