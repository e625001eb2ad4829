//! 심볼 탐지와 관리자 분석 기록의 연결.
//!
//! 제공 기능:
//! - 메시지 처리: 탐지 + 신뢰 작성자 확정 반영 + 기록 갱신 + 발행
//! - 심볼별 최신 분석 기록 조회
//! - 보존 기간이 지난 기록 정리 (외부 스케줄러에서 호출)

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Duration;
use tracing::{debug, warn};

use scout_allowlist::SymbolAllowlist;
use scout_core::{detection_span, normalize_symbol, Clock, LinkerConfig, SystemClock};
use scout_detect::SymbolDetector;

use crate::types::{
    AnalysisRecord, IncomingMessage, LinkOutcome, LinkSink, MentionLinks, SymbolLink, TracingSink,
};

/// 심볼 탐지 결과를 관리자 분석 기록과 연결하는 컴포넌트.
///
/// 신뢰 작성자의 메시지는 두 가지 방식으로 반영됩니다:
/// `$심볼` 표기는 허용 목록 확정으로, 탐지된 심볼은 심볼별 최신
/// 분석 기록으로 저장됩니다. 조립된 링크는 설정된 싱크로 발행되며
/// 발행 실패는 처리 결과에 영향을 주지 않습니다.
pub struct AnalysisLinker {
    detector: Arc<SymbolDetector>,
    allowlist: Arc<SymbolAllowlist>,
    config: LinkerConfig,
    records: RwLock<HashMap<String, AnalysisRecord>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn LinkSink>,
}

impl std::fmt::Debug for AnalysisLinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisLinker")
            .field("trusted_authors", &self.config.trusted_authors.len())
            .field("sink", &self.sink.name())
            .finish()
    }
}

impl AnalysisLinker {
    /// 새 링커를 생성합니다. 기본 싱크는 [`TracingSink`]입니다.
    pub fn new(
        detector: Arc<SymbolDetector>,
        allowlist: Arc<SymbolAllowlist>,
        config: LinkerConfig,
    ) -> Self {
        Self {
            detector,
            allowlist,
            config,
            records: RwLock::new(HashMap::new()),
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
        }
    }

    /// 발행 싱크를 교체합니다.
    pub fn with_sink(mut self, sink: Arc<dyn LinkSink>) -> Self {
        self.sink = sink;
        self
    }

    /// 시계를 교체합니다 (테스트용 주입 지점).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 메시지 하나를 처리합니다.
    ///
    /// 1. 신뢰 작성자의 `$심볼` 확정을 허용 목록에 반영
    /// 2. 심볼 탐지
    /// 3. 신뢰 작성자 메시지를 심볼별 최신 분석 기록으로 저장
    /// 4. 링크 조립 후 싱크로 발행 (실패는 로그만 남김)
    pub async fn process_message(&self, msg: &IncomingMessage) -> LinkOutcome {
        let span = detection_span!("메시지 처리", msg.channel_id);
        let trusted = self.config.is_trusted(&msg.author_id);

        // 1. 허용 목록 확정은 같은 메시지의 탐지에도 바로 반영된다
        let allowlist_added = if trusted {
            self.allowlist.extract_symbols_from_admin_message(
                &msg.content,
                &msg.author_id,
                &msg.message_id,
            )
        } else {
            Vec::new()
        };

        // 2. 탐지
        let symbols = span.in_scope(|| self.detector.detect(&msg.content));

        // 3. 기록 갱신
        let mut records_updated = 0;
        if trusted && !symbols.is_empty() {
            let summary = summarize(&msg.content, self.config.summary_max_chars);
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            for s in &symbols {
                let record =
                    AnalysisRecord::new(&s.symbol, &summary, &msg.author_id, &msg.message_id, msg.sent_at)
                        .with_priority(s.priority);
                records.insert(s.symbol.clone(), record);
                records_updated += 1;
            }
            debug!(count = records_updated, author_id = %msg.author_id, "분석 기록 갱신");
        }

        // 4. 링크 조립 및 발행
        let links = {
            let records = self.records.read().unwrap_or_else(|e| e.into_inner());
            MentionLinks {
                channel_id: msg.channel_id.clone(),
                message_id: msg.message_id.clone(),
                links: symbols
                    .into_iter()
                    .map(|detection| {
                        let analysis = records.get(&detection.symbol).cloned();
                        SymbolLink {
                            detection,
                            analysis,
                        }
                    })
                    .collect(),
            }
        };

        let mut published = false;
        if !links.is_empty() && self.sink.is_enabled() {
            match self.sink.publish(&links).await {
                Ok(()) => published = true,
                Err(e) => {
                    warn!(sink = self.sink.name(), error = %e, "링크 발행 실패");
                }
            }
        }

        LinkOutcome {
            links,
            allowlist_added,
            records_updated,
            published,
        }
    }

    /// 심볼의 최신 분석 기록을 조회합니다.
    pub fn latest_for(&self, symbol: &str) -> Option<AnalysisRecord> {
        let symbol = normalize_symbol(symbol);
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&symbol)
            .cloned()
    }

    /// 분석 기록이 있는 심볼 목록 (정렬됨).
    pub fn linked_symbols(&self) -> Vec<String> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let mut symbols: Vec<String> = records.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// 보존 기간이 지난 분석 기록을 제거하고 제거된 수를 반환합니다.
    pub fn prune_stale(&self, max_age: Duration) -> usize {
        let now = self.clock.now();
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let before = records.len();
        records.retain(|_, r| !r.is_stale(now, max_age));

        let removed = before - records.len();
        if removed > 0 {
            debug!(removed, "오래된 분석 기록 정리");
        }
        removed
    }
}

/// 요약문을 문자 단위로 안전하게 자릅니다.
fn summarize(content: &str, max_chars: usize) -> String {
    let trimmed = content.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}
