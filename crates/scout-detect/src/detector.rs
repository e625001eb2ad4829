//! 심볼 탐지 파이프라인.
//!
//! 제공 기능:
//! - 자유 텍스트에서 티커 후보 토큰화 및 신뢰도 점수 계산
//! - `$`/`#` 접두사, 허용 목록, 히브리어 키워드, 나열 문맥 부스트
//! - 기술적 지표 혼동 페널티 (거부권 포함)
//! - 문맥 신뢰 기반 단일 문자 심볼 복구
//! - 관리자 거래 라인 전용 탐지 (`detect_deals_line`)
//!
//! 탐지 연산은 실패하지 않습니다. 잘못된 입력은 빈 결과로 이어지고,
//! 오류는 생성 시점(설정 검증, 패턴 컴파일)에만 발생합니다.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use scout_allowlist::SymbolAllowlist;
use scout_core::{is_valid_symbol, normalize_symbol, CoreResult, DetectionConfig, StockSymbol};

use crate::lexicon::{HebrewTier, Lexicon};
use crate::sections::SectionMap;
use crate::technical::{char_window, TechnicalContextClassifier};

/// 슬래시로 구분된 심볼 나열 (3개 이상).
static LIST_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\$?[A-Za-z]{1,5}\s*/\s*){2,}\$?[A-Za-z]{1,5}")
        .expect("valid list run pattern")
});

/// 점수 계산 전의 후보 토큰.
#[derive(Debug)]
struct Candidate {
    symbol: String,
    start: usize,
    confidence: f64,
}

/// 심볼 탐지기.
///
/// 설정에서 점수 테이블을 주입받아 생성됩니다. 허용 목록은
/// 선택적으로 연결되며, 없으면 허용 목록 부스트만 빠집니다.
pub struct SymbolDetector {
    config: DetectionConfig,
    token_pattern: Regex,
    classifier: TechnicalContextClassifier,
    lexicon: Arc<Lexicon>,
    allowlist: Option<Arc<SymbolAllowlist>>,
}

impl std::fmt::Debug for SymbolDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolDetector")
            .field("token_pattern", &self.token_pattern.as_str())
            .field("has_allowlist", &self.allowlist.is_some())
            .finish()
    }
}

impl SymbolDetector {
    /// 탐지기를 생성합니다. 설정 검증과 패턴 컴파일에 실패하면 에러.
    pub fn new(config: &DetectionConfig) -> CoreResult<Self> {
        config.validate()?;

        let token_pattern = Regex::new(&config.symbol_pattern).map_err(|e| {
            scout_core::CoreError::Pattern(format!("{}: {e}", config.symbol_pattern))
        })?;
        let lexicon = Lexicon::global();
        let classifier = TechnicalContextClassifier::with_lexicon(config, Arc::clone(&lexicon))?;

        Ok(Self {
            config: config.clone(),
            token_pattern,
            classifier,
            lexicon,
            allowlist: None,
        })
    }

    /// 허용 목록을 연결합니다.
    pub fn with_allowlist(mut self, allowlist: Arc<SymbolAllowlist>) -> Self {
        self.allowlist = Some(allowlist);
        self
    }

    /// 문맥 분류기 참조.
    pub fn classifier(&self) -> &TechnicalContextClassifier {
        &self.classifier
    }

    /// 문맥 분류기 가변 참조 (런타임 패턴 등록용).
    pub fn classifier_mut(&mut self) -> &mut TechnicalContextClassifier {
        &mut self.classifier
    }

    /// 텍스트에서 심볼을 탐지합니다.
    ///
    /// 결과는 신뢰도 내림차순이며 (동률은 등장 순서), `position`은
    /// 최종 결과 내 인덱스입니다. 신뢰도는 [0, 1]로 클램프됩니다.
    pub fn detect(&self, text: &str) -> Vec<StockSymbol> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // 1. 기술적 분석 위주 메시지는 통째로 건너뜀
        if self.classifier.is_primarily_technical_content(text) {
            debug!("기술적 분석 위주 메시지, 심볼 탐지 생략");
            return Vec::new();
        }

        let sections = SectionMap::parse(text);
        if sections.has_sections() {
            debug!("섹션 헤더 감지, 우선순위 태그 부여");
        }
        let list_runs: Vec<(usize, usize)> = LIST_RUN
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();
        let hebrew_context = self.lexicon.contains_hebrew(text);

        // 2. 토큰화 및 1차 점수 계산
        let mut candidates = Vec::new();
        let mut pending_singles = Vec::new();
        for m in self.token_pattern.find_iter(text) {
            let raw = m.as_str();
            let (start, end) = (m.start(), m.end());
            let symbol = raw.to_uppercase();
            if !is_valid_symbol(&symbol) {
                continue;
            }

            let prefixed = is_prefixed(text, start);
            // 일반 영어 단어는 항상, 음차 불용어는 히브리어가 섞인
            // 메시지에서만 접두사 없는 후보에서 제외된다
            if !prefixed
                && (self.lexicon.is_common_word(raw)
                    || (hebrew_context && self.lexicon.is_translit_stopword(raw)))
            {
                continue;
            }

            let in_list = in_any_span(&list_runs, start, end);
            if raw.len() == 1 && !prefixed {
                // 단일 문자는 원문이 대문자일 때만 문맥 신뢰 복구 대상
                if raw.chars().all(|c| c.is_ascii_uppercase()) {
                    pending_singles.push((symbol, start, end, in_list));
                }
                continue;
            }

            let confidence = self.score_candidate(&symbol, text, start, end, prefixed, in_list, false);
            if confidence >= self.config.accept_threshold {
                candidates.push(Candidate {
                    symbol,
                    start,
                    confidence,
                });
            } else {
                debug!(symbol = %symbol, confidence, "임계값 미달로 후보 제외");
            }
        }

        // 3. 문맥 신뢰: 확정 심볼이 충분하면 단일 문자 복구
        let confirmed = candidates
            .iter()
            .filter(|c| c.confidence >= self.config.context_trust_min_confidence)
            .count();
        if confirmed >= self.config.context_trust_min_symbols {
            for (symbol, start, end, in_list) in pending_singles {
                let confidence = self.score_candidate(&symbol, text, start, end, false, in_list, true);
                if confidence >= self.config.accept_threshold {
                    debug!(symbol = %symbol, "문맥 신뢰로 단일 문자 심볼 복구");
                    candidates.push(Candidate {
                        symbol,
                        start,
                        confidence,
                    });
                }
            }
        }

        self.finalize(candidates, &sections)
    }

    /// 관리자 거래 라인에서 심볼을 탐지합니다.
    ///
    /// 점수 계산 없이 살아남은 모든 토큰이 신뢰도 1.0을 받으며,
    /// 결과는 원문 등장 순서를 따릅니다. 단일 문자는 다중 문자
    /// 심볼이 같은 라인에 있을 때만 유지됩니다.
    pub fn detect_deals_line(&self, text: &str) -> Vec<StockSymbol> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let sections = SectionMap::parse(text);
        let hebrew_context = self.lexicon.contains_hebrew(text);
        let mut candidates = Vec::new();
        let mut singles = Vec::new();
        for m in self.token_pattern.find_iter(text) {
            let raw = m.as_str();
            let symbol = raw.to_uppercase();
            if !is_valid_symbol(&symbol) {
                continue;
            }

            let prefixed = is_prefixed(text, m.start());
            if !prefixed
                && (self.lexicon.is_common_word(raw)
                    || (hebrew_context && self.lexicon.is_translit_stopword(raw)))
            {
                continue;
            }

            let candidate = Candidate {
                symbol,
                start: m.start(),
                confidence: 1.0,
            };
            if raw.len() == 1 && !prefixed {
                if raw.chars().all(|c| c.is_ascii_uppercase()) {
                    singles.push(candidate);
                }
            } else {
                candidates.push(candidate);
            }
        }

        // 거래 라인의 단일 문자는 다중 문자 심볼이 함께 있을 때만 유지.
        // 접두사 붙은 단일 문자는 그 자체로 채택되지만 신뢰 근거는 아니다.
        let anchors = candidates.iter().filter(|c| c.symbol.len() > 1).count();
        if anchors >= self.config.context_trust_min_symbols {
            candidates.extend(singles);
        }

        self.finalize(candidates, &sections)
    }

    /// 닫힌 후보 집합 안에서 토큰이 심볼로 채택되는지 확인합니다.
    ///
    /// 자유 텍스트를 다시 스캔하지 않습니다. 다중 문자 토큰은 형식만
    /// 검증하고, 단일 문자 토큰은 집합 안에 형식이 유효한 다중 문자
    /// 후보가 충분히 있을 때만 유효합니다.
    pub fn is_valid_symbol_with_context(&self, token: &str, candidates: &[&str]) -> bool {
        let symbol = normalize_symbol(token);
        if !is_valid_symbol(&symbol) {
            return false;
        }
        if symbol.len() > 1 {
            return true;
        }

        let anchors = candidates
            .iter()
            .map(|c| normalize_symbol(c))
            .filter(|c| c.len() > 1 && is_valid_symbol(c))
            .count();
        anchors >= self.config.context_trust_min_symbols
    }

    /// 후보 하나의 신뢰도를 계산합니다.
    fn score_candidate(
        &self,
        symbol: &str,
        text: &str,
        start: usize,
        end: usize,
        prefixed: bool,
        in_list: bool,
        recovered_single: bool,
    ) -> f64 {
        let cfg = &self.config;
        let mut confidence = cfg.base_confidence;

        if prefixed {
            confidence += cfg.prefix_boost;
        }
        if self.is_allowlisted(symbol) {
            confidence += cfg.allowlist_boost;
        }

        let window = char_window(text, start, end, cfg.keyword_window_chars);
        confidence += match self.lexicon.strongest_hebrew_tier(window) {
            Some(HebrewTier::Strong) => cfg.hebrew_strong_boost,
            Some(HebrewTier::Medium) => cfg.hebrew_medium_boost,
            Some(HebrewTier::Weak) => cfg.hebrew_weak_boost,
            None => 0.0,
        };

        if in_list {
            confidence += cfg.list_context_boost;
        }
        if recovered_single {
            confidence += cfg.single_letter_boost;
        }

        confidence - self.classifier.confusion_penalty(symbol, text, start, end)
    }

    fn is_allowlisted(&self, symbol: &str) -> bool {
        self.allowlist
            .as_ref()
            .is_some_and(|a| a.is_symbol_allowed(symbol))
    }

    /// 중복 제거, 정렬, 상한 적용 후 최종 결과를 만듭니다.
    fn finalize(&self, mut candidates: Vec<Candidate>, sections: &SectionMap) -> Vec<StockSymbol> {
        // 원문 등장 순서로 정렬 (복구된 단일 문자는 뒤에 덧붙었을 수 있음)
        candidates.sort_by_key(|c| c.start);

        // 심볼별 중복 제거: 최고 신뢰도 유지, 위치는 최초 등장 지점
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut kept: Vec<Candidate> = Vec::new();
        for cand in candidates {
            match index.entry(cand.symbol.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(cand);
                }
                Entry::Occupied(slot) => {
                    let existing = &mut kept[*slot.get()];
                    if cand.confidence > existing.confidence {
                        existing.confidence = cand.confidence;
                    }
                }
            }
        }

        // 신뢰도 내림차순 안정 정렬 (동률은 등장 순서 유지) 후 상한 적용
        kept.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        kept.truncate(self.config.max_results);

        let results: Vec<StockSymbol> = kept
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                StockSymbol::new(c.symbol, c.confidence, i)
                    .with_priority(sections.priority_at(c.start))
            })
            .collect();

        if !results.is_empty() {
            debug!(count = results.len(), "심볼 탐지 완료");
        }
        results
    }
}

/// 토큰 바로 앞에 `$` 또는 `#` 접두사가 있는지 확인합니다.
fn is_prefixed(text: &str, start: usize) -> bool {
    matches!(text[..start].chars().next_back(), Some('$') | Some('#'))
}

/// 토큰 구간이 나열 구간 안에 완전히 포함되는지 확인합니다.
fn in_any_span(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|&(s, e)| start >= s && end <= e)
}

#[cfg(test)]
mod tests {
    use super::*;

    use scout_core::{AllowlistConfig, SymbolPriority};

    fn detector() -> SymbolDetector {
        SymbolDetector::new(&DetectionConfig::default()).unwrap()
    }

    fn detector_with_allowed(symbols: &[&str]) -> SymbolDetector {
        let allowlist = SymbolAllowlist::new(&AllowlistConfig::default());
        for s in symbols {
            allowlist.add_symbol(s, "admin-1", "msg-1", "initial seed");
        }
        detector().with_allowlist(Arc::new(allowlist))
    }

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn test_pangram_yields_nothing() {
        let d = detector();
        assert!(d.detect("The quick brown fox jumps over the lazy dog").is_empty());
    }

    #[test]
    fn test_empty_and_whitespace() {
        let d = detector();
        assert!(d.detect("").is_empty());
        assert!(d.detect("   \n\t  ").is_empty());
        assert!(d.detect("🚀🚀🚀 !!! 123").is_empty());
    }

    #[test]
    fn test_prefixed_outranks_bare() {
        let d = detector();
        let results = d.detect("$AAPL is stronger than MSFT");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "AAPL");
        assert!(approx(results[0].confidence, 0.9));
        assert_eq!(results[0].position, 0);
        assert_eq!(results[1].symbol, "MSFT");
        assert!(approx(results[1].confidence, 0.5));
        assert_eq!(results[1].position, 1);
    }

    #[test]
    fn test_sorted_desc_independent_of_text_order() {
        let d = detector();
        // MSFT가 먼저 등장해도 접두사 붙은 AAPL이 앞에 온다
        let results = d.detect("MSFT then $AAPL");

        assert_eq!(results[0].symbol, "AAPL");
        assert_eq!(results[1].symbol, "MSFT");
        assert!(results[0].confidence > results[1].confidence);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let d = detector();
        let text = "קניתי AAPL היום 🚀 וגם $MSFT";

        assert_eq!(d.detect(text), d.detect(text));
    }

    #[test]
    fn test_mixed_hebrew_scenario() {
        let d = detector();
        let results = d.detect("קניתי AAPL היום 🚀 וגם $MSFT");

        assert_eq!(results.len(), 2);
        // $MSFT: 0.5 + 0.4(접두사) + 0.15(קניתי) = 1.05 -> 1.0 클램프
        assert_eq!(results[0].symbol, "MSFT");
        assert!(approx(results[0].confidence, 1.0));
        // AAPL: 0.5 + 0.15(קניתי) = 0.65
        assert_eq!(results[1].symbol, "AAPL");
        assert!(approx(results[1].confidence, 0.65));
    }

    #[test]
    fn test_hebrew_strong_keyword_boost() {
        let d = detector();
        let results = d.detect("מניה מעניינת PLTR");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "PLTR");
        assert!(approx(results[0].confidence, 0.75));
    }

    #[test]
    fn test_allowlist_boost_applies() {
        let d = detector_with_allowed(&["BKV"]);
        let results = d.detect("BKV looking good");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "BKV");
        assert!(approx(results[0].confidence, 0.85));
    }

    #[test]
    fn test_allowlisted_ambiguous_survives_bare() {
        let d = detector_with_allowed(&["WH"]);
        // 0.5 + 0.35(허용 목록) - 0.2(모호) = 0.65
        let results = d.detect("WH on my radar today");

        assert!(results.iter().any(|s| s.symbol == "WH"));
    }

    #[test]
    fn test_week_high_veto_beats_allowlist() {
        let d = detector_with_allowed(&["WH"]);
        // 기술적 문맥 거부권: 0.5 + 0.35 - 1.5 < 0
        assert!(d.detect("מתקרב 52 WH חזק").is_empty());
    }

    #[test]
    fn test_geo_veto_beats_allowlist() {
        let d = detector_with_allowed(&["IL"]);

        // 시장 문맥의 지리 토큰은 거부권
        assert!(d.detect("IL economy is crashing").is_empty());
        // 시장 문맥이 없으면 허용 목록이 모호 페널티를 이긴다
        let results = d.detect("IL בוקר טוב לכולם");
        assert!(results.iter().any(|s| s.symbol == "IL"));
    }

    #[test]
    fn test_common_words_need_prefix() {
        let d = detector();

        assert!(d.detect("check this entry now").is_empty());

        let results = d.detect("$CHECK that");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "CHECK");
        assert!(approx(results[0].confidence, 0.9));
    }

    #[test]
    fn test_translit_stopword_needs_hebrew_context() {
        let d = detector();

        // 히브리어가 섞인 메시지에서는 음차 불용어가 걸러진다
        let results = d.detect("קניתי TSLA היום ani עוד מחכה");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "TSLA");

        // 순수 영어 메시지에서는 음차 목록이 동철 티커를 가리지 않는다
        let results = d.detect("EL breakout above resistance");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "EL");
        assert!(approx(results[0].confidence, 0.5));
    }

    #[test]
    fn test_single_letter_needs_context_trust() {
        let d = detector();

        // 확정 심볼이 없으면 단일 문자는 버려진다
        assert!(d.detect("F now").is_empty());

        // $AAPL(0.9)이 신뢰를 확보하면 F가 0.65로 복구된다
        let results = d.detect("buy $AAPL and F now");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "AAPL");
        assert_eq!(results[1].symbol, "F");
        assert!(approx(results[1].confidence, 0.65));

        // 소문자 단일 문자는 복구되지 않는다
        let results = d.detect("buy $AAPL and f now");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAPL");
    }

    #[test]
    fn test_ambiguous_needs_indicator() {
        let d = detector();

        // SP: 0.5 - 0.2 = 0.3 < 0.5
        assert!(d.detect("SP to watch now").is_empty());

        // 접두사가 강한 지표로 작동해 페널티가 사라진다
        let results = d.detect("$SP now");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "SP");
        assert!(approx(results[0].confidence, 0.9));
    }

    #[test]
    fn test_list_context_boost() {
        let d = detector();
        let results = d.detect("AAPL / MSFT / GOOG");

        assert_eq!(results.len(), 3);
        for s in &results {
            assert!(approx(s.confidence, 0.65), "{}: {}", s.symbol, s.confidence);
        }
    }

    #[test]
    fn test_duplicate_mentions_keep_highest() {
        let d = detector();
        let results = d.detect("AAPL dipping, adding $AAPL");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAPL");
        assert!(approx(results[0].confidence, 0.9));
    }

    #[test]
    fn test_results_capped_at_max() {
        let d = detector();
        let mut text = String::new();
        for i in 0..30u8 {
            let second = (b'A' + i / 26) as char;
            let third = (b'A' + i % 26) as char;
            text.push_str(&format!("$Z{second}{third} "));
        }

        let results = d.detect(&text);
        assert_eq!(results.len(), 25);
        // 동률이므로 등장 순서가 유지된다
        assert_eq!(results[0].symbol, "ZAA");
        assert_eq!(results[24].symbol, "ZAY");
        for (i, s) in results.iter().enumerate() {
            assert_eq!(s.position, i);
        }
    }

    #[test]
    fn test_section_priorities() {
        let d = detector();
        let results = d.detect("טופ לונג:\nAAPL TSLA\nטופ שורט:\nNVDA");

        assert_eq!(results.len(), 3);
        let by_symbol: HashMap<&str, SymbolPriority> = results
            .iter()
            .map(|s| (s.symbol.as_str(), s.priority))
            .collect();
        assert_eq!(by_symbol["AAPL"], SymbolPriority::TopLong);
        assert_eq!(by_symbol["TSLA"], SymbolPriority::TopLong);
        assert_eq!(by_symbol["NVDA"], SymbolPriority::TopShort);
    }

    #[test]
    fn test_primarily_technical_message_skipped() {
        let d = detector();
        // 지표 표기가 대부분인 메시지는 AAPL이 있어도 건너뛴다
        assert!(d.detect("AAPL EMA20 SMA50 RSI14 BB20 golden cross").is_empty());
    }

    #[test]
    fn test_deals_line_all_full_confidence() {
        let d = detector();
        let results = d.detect_deals_line("QUBT / BKV / MSFT / VEEV 👀");

        assert_eq!(results.len(), 4);
        let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["QUBT", "BKV", "MSFT", "VEEV"]);
        for (i, s) in results.iter().enumerate() {
            assert!(approx(s.confidence, 1.0));
            assert_eq!(s.position, i);
        }
    }

    #[test]
    fn test_deals_line_single_needs_companion() {
        let d = detector();

        let results = d.detect_deals_line("F / AAPL");
        let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["F", "AAPL"]);

        // 단일 문자만으로는 거래 라인이 성립하지 않는다
        assert!(d.detect_deals_line("F / G").is_empty());

        // 접두사 단일 문자는 유지되지만 다른 단일 문자의 근거는 아니다
        let results = d.detect_deals_line("$F / G");
        let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["F"]);
    }

    #[test]
    fn test_deals_line_skips_common_words() {
        let d = detector();
        let results = d.detect_deals_line("buy QUBT / VEEV today");

        let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["QUBT", "VEEV"]);
    }

    #[test]
    fn test_is_valid_symbol_with_context() {
        let d = detector();

        // 다중 문자 토큰은 형식만 검증한다
        assert!(d.is_valid_symbol_with_context("msft", &["MSFT", "QUBT"]));
        assert!(!d.is_valid_symbol_with_context("TOOLONG", &["TOOLONG", "AAPL"]));
        assert!(!d.is_valid_symbol_with_context("AB1", &["AB1", "AAPL"]));

        // 단일 문자는 집합 안의 유효한 다중 문자 후보가 근거가 된다
        assert!(d.is_valid_symbol_with_context("F", &["F", "AAPL"]));
        assert!(!d.is_valid_symbol_with_context("F", &["F"]));
        assert!(!d.is_valid_symbol_with_context("F", &["F", "G", "TOOLONG"]));
    }

    #[test]
    fn test_invalid_token_pattern_fails_construction() {
        let config = DetectionConfig {
            symbol_pattern: "(unclosed".to_string(),
            ..DetectionConfig::default()
        };
        assert!(SymbolDetector::new(&config).is_err());
    }

    #[test]
    fn test_invalid_scoring_config_fails_construction() {
        let config = DetectionConfig {
            technical_context_penalty: 0.1,
            ..DetectionConfig::default()
        };
        assert!(SymbolDetector::new(&config).is_err());
    }
}
