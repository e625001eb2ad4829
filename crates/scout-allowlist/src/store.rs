//! 시간 윈도우 허용 목록 저장소.
//!
//! 제공 기능:
//! - 관리자 `$SYMBOL` 멘션 추출 및 등재
//! - 유효 기간 기반 만료 (조회 시 지연 제거 + 주기적 정리)
//! - 과거 메시지 이력에서 초기 상태 구축

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use scout_core::{is_valid_symbol, normalize_symbol, AllowlistConfig, Clock, SystemClock};

use crate::entry::AllowlistEntry;

/// 관리자 메시지의 `$SYMBOL` 멘션 패턴.
///
/// 탐욕적 매칭이므로 매치 직후에는 영문자가 올 수 없습니다. 길이와
/// 후행 숫자/밑줄 검사는 매치 후 별도로 수행합니다.
static DOLLAR_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z]+)").expect("valid dollar mention pattern"));

/// 초기화에 사용되는 과거 관리자 메시지.
#[derive(Debug, Clone)]
pub struct HistoricalMessage {
    /// 메시지 본문
    pub content: String,
    /// 작성자 ID
    pub author_id: String,
    /// 메시지 ID
    pub message_id: String,
    /// 전송 시각
    pub sent_at: DateTime<Utc>,
}

impl HistoricalMessage {
    /// 새 과거 메시지를 생성합니다.
    pub fn new(
        content: impl Into<String>,
        author_id: impl Into<String>,
        message_id: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            author_id: author_id.into(),
            message_id: message_id.into(),
            sent_at,
        }
    }
}

/// 관리자가 최근에 언급한 심볼의 허용 목록.
///
/// 이 저장소의 기능:
/// - 관리자 멘션 시 심볼 등재 (재멘션 시 윈도우 갱신)
/// - 유효 기간이 지난 항목의 지연 제거 (조회 경로)
/// - 백그라운드 정리를 위한 일괄 만료 처리
///
/// 시각은 주입된 `Clock`에서만 조회하므로 테스트에서 만료를
/// 결정적으로 재현할 수 있습니다.
pub struct SymbolAllowlist {
    /// 심볼 -> 항목
    entries: RwLock<HashMap<String, AllowlistEntry>>,
    /// 항목 유효 기간
    validity: chrono::Duration,
    /// 항목당 저장할 문맥 최대 문자 수
    context_max_chars: usize,
    /// 시간 소스
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SymbolAllowlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolAllowlist")
            .field("len", &self.len())
            .field("validity", &self.validity)
            .finish()
    }
}

impl SymbolAllowlist {
    /// 시스템 시계로 새 허용 목록을 생성합니다.
    pub fn new(config: &AllowlistConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// 지정된 시계로 새 허용 목록을 생성합니다.
    pub fn with_clock(config: &AllowlistConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            validity: config.validity(),
            context_max_chars: config.context_max_chars,
            clock,
        }
    }

    /// 심볼을 등재합니다.
    ///
    /// 형식이 유효하지 않으면 거부하고 `false`를 반환합니다. 이미 등재된
    /// 심볼은 등재 시각이 현재로 갱신됩니다.
    pub fn add_symbol(
        &self,
        symbol: &str,
        admin_id: &str,
        message_id: &str,
        context: &str,
    ) -> bool {
        let normalized = normalize_symbol(symbol);
        if !is_valid_symbol(&normalized) {
            debug!(symbol = %symbol, "형식이 유효하지 않아 등재 거부");
            return false;
        }

        let entry = AllowlistEntry::new(&normalized, self.clock.now(), admin_id, message_id)
            .with_context(truncate_chars(context, self.context_max_chars));

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let refreshed = entries.insert(normalized.clone(), entry).is_some();

        info!(
            symbol = %normalized,
            admin_id = %admin_id,
            refreshed = refreshed,
            "허용 목록 등재"
        );
        true
    }

    /// 지정된 시각으로 심볼을 등재합니다 (과거 이력 재생용).
    ///
    /// 현재 시각 기준 이미 만료된 멘션이거나 더 최신 항목이 있으면
    /// 건너뜁니다.
    fn add_symbol_at(&self, entry: AllowlistEntry) -> bool {
        if !is_valid_symbol(&entry.symbol) {
            return false;
        }
        if entry.is_expired(self.clock.now(), self.validity) {
            debug!(symbol = %entry.symbol, "만료된 과거 멘션 건너뜀");
            return false;
        }

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = entries.get(&entry.symbol) {
            if existing.timestamp >= entry.timestamp {
                return false;
            }
        }
        entries.insert(entry.symbol.clone(), entry);
        true
    }

    /// 심볼이 현재 허용 목록에 있는지 확인합니다.
    ///
    /// 만료된 항목을 발견하면 그 자리에서 제거합니다.
    pub fn is_symbol_allowed(&self, symbol: &str) -> bool {
        self.get_symbol_entry(symbol).is_some()
    }

    /// 심볼의 현재 항목을 조회합니다.
    ///
    /// 만료된 항목을 발견하면 그 자리에서 제거하고 `None`을 반환합니다.
    pub fn get_symbol_entry(&self, symbol: &str) -> Option<AllowlistEntry> {
        let normalized = normalize_symbol(symbol);
        let now = self.clock.now();

        // 1. 읽기 잠금으로 빠른 경로 확인
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(&normalized) {
                Some(entry) if !entry.is_expired(now, self.validity) => {
                    return Some(entry.clone());
                }
                Some(_) => {} // 만료됨, 아래에서 제거
                None => return None,
            }
        }

        // 2. 쓰기 잠금으로 만료 항목 제거 (잠금 사이에 갱신되었을 수 있음)
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get(&normalized) {
            if !entry.is_expired(now, self.validity) {
                return Some(entry.clone());
            }
            entries.remove(&normalized);
            debug!(symbol = %normalized, "만료된 항목 지연 제거");
        }
        None
    }

    /// 현재 유효한 모든 심볼을 정렬해 반환합니다.
    ///
    /// 호출 전에 만료 항목을 일괄 정리합니다.
    pub fn get_allowed_symbols(&self) -> Vec<String> {
        self.sweep_expired();

        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut symbols: Vec<String> = entries.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// 심볼을 목록에서 제거합니다.
    pub fn remove_symbol(&self, symbol: &str) -> bool {
        let normalized = normalize_symbol(symbol);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&normalized).is_some()
    }

    /// 목록을 비웁니다.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    /// 저장된 항목 수를 반환합니다.
    ///
    /// 아직 정리되지 않은 만료 항목이 포함될 수 있습니다.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    /// 목록이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 관리자 메시지에서 `$SYMBOL` 멘션을 추출해 등재합니다.
    ///
    /// `$AAPL123`처럼 영문자 뒤에 숫자/밑줄이 붙은 형태와 6자 이상의
    /// 멘션은 무시합니다. 등재된 심볼 목록을 최초 등장 순서로 반환합니다
    /// (메시지 내 중복은 한 번만).
    pub fn extract_symbols_from_admin_message(
        &self,
        content: &str,
        admin_id: &str,
        message_id: &str,
    ) -> Vec<String> {
        let mut added = Vec::new();

        for mention in scan_dollar_mentions(content) {
            let normalized = normalize_symbol(mention);
            if added.contains(&normalized) {
                continue;
            }
            if self.add_symbol(&normalized, admin_id, message_id, content) {
                added.push(normalized);
            }
        }

        added
    }

    /// 과거 관리자 메시지 이력에서 허용 목록을 구축합니다.
    ///
    /// 각 멘션은 메시지 전송 시각으로 등재되며, 이미 만료된 멘션은
    /// 조용히 건너뜁니다. 등재된 항목 수를 반환합니다.
    pub fn initialize_from_historical(&self, messages: &[HistoricalMessage]) -> usize {
        let mut added = 0;

        for message in messages {
            for mention in scan_dollar_mentions(&message.content) {
                let entry = AllowlistEntry::new(
                    normalize_symbol(mention),
                    message.sent_at,
                    &message.author_id,
                    &message.message_id,
                )
                .with_context(truncate_chars(&message.content, self.context_max_chars));

                if self.add_symbol_at(entry) {
                    added += 1;
                }
            }
        }

        info!(added = added, scanned = messages.len(), "과거 이력 초기화 완료");
        added
    }

    /// 만료된 항목을 일괄 제거합니다.
    ///
    /// 제거된 항목 수를 반환합니다.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, self.validity));
        let removed = before - entries.len();

        if removed > 0 {
            debug!(removed = removed, remaining = entries.len(), "만료 항목 정리");
        }
        removed
    }
}

/// 본문에서 형식이 유효한 `$SYMBOL` 멘션을 찾아 반환합니다.
fn scan_dollar_mentions(content: &str) -> Vec<&str> {
    let mut mentions = Vec::new();

    for caps in DOLLAR_MENTION.captures_iter(content) {
        let full = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let letters = match caps.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        if !is_valid_symbol(letters) {
            debug!(mention = %letters, "길이 초과 멘션 무시");
            continue;
        }
        // 티커 뒤에 단어 문자가 이어지면 멘션이 아님 (예: $AAPL123)
        if let Some(c) = content[full.end()..].chars().next() {
            if c.is_ascii_alphanumeric() || c == '_' {
                continue;
            }
        }

        mentions.push(letters);
    }

    mentions
}

/// 문자 경계를 존중하며 최대 문자 수로 자릅니다.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
