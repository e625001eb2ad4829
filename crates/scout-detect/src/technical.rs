//! 기술적 분석 문맥 분류기.
//!
//! 후보 토큰이 티커가 아니라 기술적 지표 표기(`52WH`, `EMA20`, `RSI14`)
//! 또는 지리/시장 언급(`US market`)의 일부인지 판정합니다. 판정은
//! 토큰 주변의 문자 윈도우 안에서만 이루어지며, 패턴 매치가 토큰
//! 자체를 포함할 때만 유효합니다.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use scout_core::{CoreError, CoreResult, DetectionConfig};

use crate::lexicon::Lexicon;

/// 지리 토큰 폴백에서 시장 키워드를 찾는 근접 범위 (문자 수).
const GEO_KEYWORD_PROXIMITY_CHARS: usize = 20;

/// 등록된 기술적/지리 패턴.
#[derive(Debug, Clone)]
pub struct TechnicalPattern {
    /// 컴파일된 정규식
    pub pattern: Regex,
    /// 사람이 읽는 설명
    pub description: String,
    /// 매칭 예시
    pub examples: Vec<&'static str>,
}

impl TechnicalPattern {
    fn compile(
        pattern: &str,
        description: impl Into<String>,
        examples: Vec<&'static str>,
    ) -> CoreResult<Self> {
        let compiled = Regex::new(pattern)
            .map_err(|e| CoreError::Pattern(format!("{pattern}: {e}")))?;
        Ok(Self {
            pattern: compiled,
            description: description.into(),
            examples,
        })
    }
}

/// 기술적 분석 문맥 분류기.
///
/// 기본 패턴 세트로 생성되며 런타임에 패턴을 추가할 수 있습니다.
/// 모든 판정 연산은 실패하지 않습니다 (신호 없음 = false/0).
#[derive(Debug)]
pub struct TechnicalContextClassifier {
    technical_patterns: Vec<TechnicalPattern>,
    geographic_patterns: Vec<TechnicalPattern>,
    lexicon: Arc<Lexicon>,
    technical_window_chars: usize,
    geo_window_chars: usize,
    indicator_window_chars: usize,
    technical_context_penalty: f64,
    ambiguous_penalty: f64,
}

impl TechnicalContextClassifier {
    /// 기본 렉시콘과 패턴 세트로 분류기를 생성합니다.
    pub fn new(config: &DetectionConfig) -> CoreResult<Self> {
        Self::with_lexicon(config, Lexicon::global())
    }

    /// 지정된 렉시콘으로 분류기를 생성합니다.
    pub fn with_lexicon(config: &DetectionConfig, lexicon: Arc<Lexicon>) -> CoreResult<Self> {
        Ok(Self {
            technical_patterns: default_technical_patterns()?,
            geographic_patterns: default_geographic_patterns()?,
            lexicon,
            technical_window_chars: config.technical_window_chars,
            geo_window_chars: config.geo_window_chars,
            indicator_window_chars: config.indicator_window_chars,
            technical_context_penalty: config.technical_context_penalty,
            ambiguous_penalty: config.ambiguous_penalty,
        })
    }

    /// 기술적 패턴을 런타임에 등록합니다.
    pub fn register_technical_pattern(
        &mut self,
        pattern: &str,
        description: impl Into<String>,
        examples: Vec<&'static str>,
    ) -> CoreResult<()> {
        self.technical_patterns
            .push(TechnicalPattern::compile(pattern, description, examples)?);
        Ok(())
    }

    /// 지리 패턴을 런타임에 등록합니다.
    pub fn register_geographic_pattern(
        &mut self,
        pattern: &str,
        description: impl Into<String>,
        examples: Vec<&'static str>,
    ) -> CoreResult<()> {
        self.geographic_patterns
            .push(TechnicalPattern::compile(pattern, description, examples)?);
        Ok(())
    }

    /// 등록된 기술적 패턴 목록.
    pub fn technical_patterns(&self) -> &[TechnicalPattern] {
        &self.technical_patterns
    }

    /// 등록된 지리 패턴 목록.
    pub fn geographic_patterns(&self) -> &[TechnicalPattern] {
        &self.geographic_patterns
    }

    /// 토큰이 기술적/지리 문맥 안에 있는지 판정합니다.
    ///
    /// 패턴 매치는 매치된 텍스트가 토큰을 부분 문자열로 포함할 때만
    /// 유효합니다. 이웃한 지표 표기(`EMA20` 옆의 `AAPL`)는 토큰을
    /// 오염시키지 않습니다.
    pub fn is_in_technical_context(
        &self,
        token: &str,
        text: &str,
        start: usize,
        end: usize,
    ) -> bool {
        let token_upper = token.to_uppercase();

        // 1. 기술적 패턴: 좁은 윈도우에서 토큰을 포함하는 매치 탐색
        let window = char_window(text, start, end, self.technical_window_chars);
        if match_contains_token(&self.technical_patterns, window, &token_upper) {
            return true;
        }

        // 2. 지리 패턴: 넓은 윈도우
        let geo_window = char_window(text, start, end, self.geo_window_chars);
        if match_contains_token(&self.geographic_patterns, geo_window, &token_upper) {
            return true;
        }

        // 3. 지리 토큰 폴백: 근접 범위에 시장/경제 키워드가 있으면 문맥으로 간주
        if self.lexicon.is_geo_token(token) {
            let near = char_window(text, start, end, GEO_KEYWORD_PROXIMITY_CHARS);
            if self.lexicon.has_market_keyword(near) {
                return true;
            }
        }

        false
    }

    /// 메시지 전체가 기술적 분석 위주인지 판정합니다.
    ///
    /// 히브리어 불용어를 제외한 단어 수 대비 기술적 패턴 매치 비율이
    /// 0.3을 넘으면 true. 5단어 미만 텍스트는 항상 false.
    pub fn is_primarily_technical_content(&self, text: &str) -> bool {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() < 5 {
            return false;
        }

        let relevant = words
            .iter()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty() && !self.lexicon.is_hebrew_stopword(w))
            .count()
            .max(1);

        let matches: usize = self
            .technical_patterns
            .iter()
            .map(|p| p.pattern.find_iter(text).count())
            .sum();

        matches as f64 / relevant as f64 > 0.3
    }

    /// 토큰이 기술적 지표 약어와 혼동될 수 있는지 확인합니다.
    pub fn could_be_confused_with_technical(&self, token: &str) -> bool {
        self.lexicon.is_ambiguous_technical(token)
    }

    /// 토큰에 강한 심볼 지표가 있는지 확인합니다.
    ///
    /// `$`/`#`가 바로 앞에 붙었거나, 양방향 윈도우 안에 영어 주식
    /// 키워드가 있으면 참.
    pub fn has_strong_symbol_indicators(&self, text: &str, start: usize, end: usize) -> bool {
        if matches!(text[..start].chars().next_back(), Some('$') | Some('#')) {
            return true;
        }

        let window = char_window(text, start, end, self.indicator_window_chars);
        self.lexicon.has_stock_keyword(window)
    }

    /// 혼동 페널티를 계산합니다.
    ///
    /// 판정 순서:
    /// 1. 기술적/지리 문맥 안 -> 거부권 페널티 (모든 부스트 상쇄)
    /// 2. 혼동 가능성 없는 토큰 -> 0
    /// 3. 강한 심볼 지표 존재 -> 0
    /// 4. 그 외 모호한 토큰 -> 소폭 페널티
    pub fn confusion_penalty(&self, token: &str, text: &str, start: usize, end: usize) -> f64 {
        if self.is_in_technical_context(token, text, start, end) {
            debug!(token = %token, "기술적 문맥 거부권 적용");
            return self.technical_context_penalty;
        }
        if !self.could_be_confused_with_technical(token) {
            return 0.0;
        }
        if self.has_strong_symbol_indicators(text, start, end) {
            return 0.0;
        }
        self.ambiguous_penalty
    }
}

/// 패턴 매치 중 토큰을 포함하는 것이 있는지 확인합니다.
fn match_contains_token(patterns: &[TechnicalPattern], window: &str, token_upper: &str) -> bool {
    patterns.iter().any(|p| {
        p.pattern
            .find_iter(window)
            .any(|m| m.as_str().to_uppercase().contains(token_upper))
    })
}

/// 토큰 바이트 구간 주변의 문자 윈도우를 잘라 반환합니다.
///
/// 앞뒤로 각각 `radius` 문자까지 확장하며, 히브리어/이모지 등
/// 멀티바이트 문자 경계를 깨지 않습니다.
pub(crate) fn char_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    if radius == 0 {
        return &text[start..end];
    }

    let mut begin = start;
    let mut taken = 0;
    for (idx, _) in text[..start].char_indices().rev() {
        begin = idx;
        taken += 1;
        if taken == radius {
            break;
        }
    }

    let mut stop = end;
    let mut taken = 0;
    for (idx, c) in text[end..].char_indices() {
        stop = end + idx + c.len_utf8();
        taken += 1;
        if taken == radius {
            break;
        }
    }

    &text[begin..stop]
}

/// 기본 기술적 패턴 세트.
fn default_technical_patterns() -> CoreResult<Vec<TechnicalPattern>> {
    Ok(vec![
        TechnicalPattern::compile(
            r"(?i)\b\d{1,3}\s*(?:week|wk|w)\s*(?:high|low|h|l)\b",
            "주간 고점/저점 표기",
            vec!["52WH", "52 WH", "52 week high"],
        )?,
        TechnicalPattern::compile(
            r"(?i)\b(?:ema|sma|dma|wma|ma)\s*-?\s*\d{1,3}\b",
            "이동평균 (접두 표기)",
            vec!["EMA20", "SMA50", "MA 200"],
        )?,
        TechnicalPattern::compile(
            r"(?i)\b\d{1,3}\s*(?:ema|sma|dma|wma|ma)\b",
            "이동평균 (접미 표기)",
            vec!["20EMA", "200MA", "10 DMA"],
        )?,
        TechnicalPattern::compile(
            r"(?i)\b(?:rsi|macd|stoch|atr|adx|cci|mfi|bb)\s*\d{1,3}\b",
            "오실레이터/밴드 지표",
            vec!["RSI14", "BB20", "ATR 14"],
        )?,
        TechnicalPattern::compile(
            r"(?i)\b(?:ath|atl|a?vwap)\b",
            "사상 고점/저점, 거래량 가중 평균",
            vec!["ATH", "ATL", "VWAP"],
        )?,
        TechnicalPattern::compile(
            r"(?i)\b(?:golden|death)\s+cross\b",
            "이동평균 교차",
            vec!["golden cross", "death cross"],
        )?,
    ])
}

/// 기본 지리 패턴 세트.
fn default_geographic_patterns() -> CoreResult<Vec<TechnicalPattern>> {
    Ok(vec![TechnicalPattern::compile(
        r"(?i)\b(?:us|eu|uk|il|de|fr|jp|cn|usa)\s+(?:market|markets|stocks|indices|index|economy|session|futures)\b",
        "국가 코드 + 시장 언급",
        vec!["US market", "EU indices", "IL economy"],
    )?])
}
