//! 허용 목록 항목 정의.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 관리자 멘션으로 등재된 심볼 항목.
///
/// 항목은 등재 시각부터 유효 기간 동안만 살아 있으며, 같은 심볼이
/// 다시 멘션되면 등재 시각이 갱신됩니다. 과거 이력 백필을 위해
/// serde 직렬화를 지원합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowlistEntry {
    /// 정규화된 대문자 심볼
    pub symbol: String,
    /// 등재 또는 갱신 시각
    pub timestamp: DateTime<Utc>,
    /// 등재한 관리자 ID
    pub admin_id: String,
    /// 등재 근거 메시지 ID
    pub message_id: String,
    /// 등재 당시 메시지 문맥 (잘린 형태)
    pub context: String,
}

impl AllowlistEntry {
    /// 새 항목을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        admin_id: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            admin_id: admin_id.into(),
            message_id: message_id.into(),
            context: String::new(),
        }
    }

    /// 항목에 메시지 문맥을 추가합니다.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// 주어진 시각 기준으로 만료되었는지 확인합니다.
    /// 경과 시간이 유효 기간을 초과한 경우에만 만료로 칩니다.
    pub fn is_expired(&self, now: DateTime<Utc>, validity: Duration) -> bool {
        now - self.timestamp > validity
    }

    /// 항목이 유효한 마지막 시각을 반환합니다.
    pub fn expires_at(&self, validity: Duration) -> DateTime<Utc> {
        self.timestamp + validity
    }
}
