//! 심볼 및 우선순위 태그 정의.
//!
//! 이 모듈은 탐지 결과 관련 타입을 정의합니다:
//! - `SymbolPriority` - 메시지 구조 분류에 따른 우선순위 태그
//! - `StockSymbol` - 탐지된 티커 심볼 (신뢰도 포함)
//! - 심볼 형식 검증 헬퍼

use serde::{Deserialize, Serialize};
use std::fmt;

/// 티커 심볼 최대 길이 (영문자 기준).
pub const MAX_SYMBOL_LEN: usize = 5;

/// 메시지 구조 분류에 따른 심볼 우선순위.
///
/// 탐지 신뢰도와는 직교하는 태그입니다. "톱 픽" 섹션 등 메시지 구조를
/// 별도로 분류하여 부여됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPriority {
    /// 톱 롱 픽 섹션
    TopLong,
    /// 톱 숏 픽 섹션
    TopShort,
    /// 일반 멘션
    #[default]
    Regular,
}

impl fmt::Display for SymbolPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolPriority::TopLong => write!(f, "top_long"),
            SymbolPriority::TopShort => write!(f, "top_short"),
            SymbolPriority::Regular => write!(f, "regular"),
        }
    }
}

/// 탐지된 티커 심볼.
///
/// 탐지 호출마다 새로 생성되며 생성 후 변경되지 않습니다.
/// 호출자가 즉시 소비하는 값으로, 이 형태 그대로 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSymbol {
    /// 정규화된 대문자 티커 (영문자 1~5자)
    pub symbol: String,
    /// 신뢰도 [0, 1] (내부 계산은 1을 초과할 수 있으며 출력 시 클램프)
    pub confidence: f64,
    /// 정렬된 결과 집합 내 위치 (원문 오프셋이 아님)
    pub position: usize,
    /// 우선순위 태그
    pub priority: SymbolPriority,
}

impl StockSymbol {
    /// 새 탐지 결과를 생성합니다.
    ///
    /// 심볼은 대문자로 정규화되고 신뢰도는 [0, 1]로 클램프됩니다.
    pub fn new(symbol: impl Into<String>, confidence: f64, position: usize) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            confidence: confidence.clamp(0.0, 1.0),
            position,
            priority: SymbolPriority::Regular,
        }
    }

    /// 우선순위 태그를 설정합니다.
    pub fn with_priority(mut self, priority: SymbolPriority) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Display for StockSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.symbol, self.confidence)
    }
}

/// 심볼 형식이 유효한지 확인합니다 (영문자 1~5자).
pub fn is_valid_symbol(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_SYMBOL_LEN && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// 심볼을 표준 형식으로 정규화합니다 (공백 제거 + 대문자).
pub fn normalize_symbol(s: &str) -> String {
    s.trim().to_uppercase()
}
