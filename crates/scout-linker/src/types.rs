//! 링크 타입 및 trait 정의.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use scout_core::{StockSymbol, SymbolPriority};

/// 수신 채팅 메시지.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// 메시지 본문
    pub content: String,
    /// 작성자 ID
    pub author_id: String,
    /// 채널 ID
    pub channel_id: String,
    /// 메시지 ID
    pub message_id: String,
    /// 전송 시각
    pub sent_at: DateTime<Utc>,
}

impl IncomingMessage {
    /// 새 수신 메시지를 생성합니다.
    pub fn new(
        content: impl Into<String>,
        author_id: impl Into<String>,
        channel_id: impl Into<String>,
        message_id: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            author_id: author_id.into(),
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            sent_at,
        }
    }
}

/// 심볼별 최신 분석 기록.
///
/// 심볼당 하나만 유지되며 새 기록이 이전 기록을 덮어씁니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// 고유 기록 ID
    pub id: String,
    /// 심볼 (대문자)
    pub symbol: String,
    /// 분석 요약 (원문 앞부분)
    pub summary: String,
    /// 작성자 ID
    pub author_id: String,
    /// 원본 메시지 ID
    pub message_id: String,
    /// 분석 시각
    pub timestamp: DateTime<Utc>,
    /// 섹션 우선순위
    pub priority: SymbolPriority,
}

impl AnalysisRecord {
    /// 새 분석 기록을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        summary: impl Into<String>,
        author_id: impl Into<String>,
        message_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            summary: summary.into(),
            author_id: author_id.into(),
            message_id: message_id.into(),
            timestamp,
            priority: SymbolPriority::default(),
        }
    }

    /// 섹션 우선순위를 설정합니다.
    pub fn with_priority(mut self, priority: SymbolPriority) -> Self {
        self.priority = priority;
        self
    }

    /// 기록이 보존 기간을 넘겼는지 확인합니다.
    /// 경과 시간이 보존 기간을 초과한 경우에만 정리 대상입니다.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.timestamp > max_age
    }
}

/// 탐지된 심볼 하나와 최신 분석 기록의 연결.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolLink {
    /// 탐지 결과
    pub detection: StockSymbol,
    /// 최신 분석 기록 (있는 경우)
    pub analysis: Option<AnalysisRecord>,
}

/// 메시지 하나에서 조립된 링크 묶음.
#[derive(Debug, Clone, Serialize)]
pub struct MentionLinks {
    /// 원본 채널 ID
    pub channel_id: String,
    /// 원본 메시지 ID
    pub message_id: String,
    /// 심볼별 링크 (신뢰도 내림차순)
    pub links: Vec<SymbolLink>,
}

impl MentionLinks {
    /// 링크가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// 링크된 심볼 목록을 반환합니다.
    pub fn symbols(&self) -> Vec<&str> {
        self.links
            .iter()
            .map(|l| l.detection.symbol.as_str())
            .collect()
    }
}

/// 메시지 처리 결과.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    /// 조립된 링크 묶음
    pub links: MentionLinks,
    /// 이번 메시지로 허용 목록에 추가된 심볼
    pub allowlist_added: Vec<String>,
    /// 갱신된 분석 기록 수
    pub records_updated: usize,
    /// 싱크 발행 성공 여부
    pub published: bool,
}

/// 링크 작업용 Result 타입.
pub type LinkerResult<T> = Result<T, LinkerError>;

/// 링크 에러.
#[derive(Debug, thiserror::Error)]
pub enum LinkerError {
    #[error("링크 발행 실패: {0}")]
    PublishFailed(String),

    #[error("싱크 비활성화: {0}")]
    SinkDisabled(String),
}

/// 링크 발행 싱크 trait.
#[async_trait]
pub trait LinkSink: Send + Sync {
    /// 링크 묶음을 발행합니다.
    async fn publish(&self, links: &MentionLinks) -> LinkerResult<()>;

    /// 싱크가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 싱크 이름을 반환합니다.
    fn name(&self) -> &str;
}

/// 로그로만 발행하는 기본 싱크.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl LinkSink for TracingSink {
    async fn publish(&self, links: &MentionLinks) -> LinkerResult<()> {
        info!(
            channel_id = %links.channel_id,
            message_id = %links.message_id,
            symbols = ?links.symbols(),
            "심볼 링크 발행"
        );
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
