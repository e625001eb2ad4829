//! 주입 가능한 시계 추상화.
//!
//! 허용 목록의 만료 로직은 벽시계에 직접 의존하지 않고 `Clock` trait을
//! 통해 현재 시각을 조회합니다. 테스트에서는 `ManualClock`으로 시간을
//! 결정적으로 전진시킬 수 있습니다.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// 현재 시각을 제공하는 시계 trait.
pub trait Clock: Send + Sync {
    /// 현재 UTC 시각을 반환합니다.
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 벽시계.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 수동 전진 시계 (테스트용).
///
/// 시각은 `set` 또는 `advance` 호출 전까지 고정됩니다.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// 지정된 시각으로 시작하는 시계를 생성합니다.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// 현재 시스템 시각으로 시작하는 시계를 생성합니다.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// 시각을 지정된 값으로 설정합니다.
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    /// 시각을 지정된 기간만큼 전진시킵니다.
    pub fn advance(&self, duration: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}
