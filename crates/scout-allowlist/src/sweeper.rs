//! 허용 목록 백그라운드 정리 태스크.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::store::SymbolAllowlist;

/// 주기적으로 만료 항목을 정리하는 백그라운드 태스크를 시작합니다.
///
/// 조회 경로의 지연 제거를 보완하는 안전망입니다. 한동안 조회되지 않은
/// 심볼도 이 태스크가 결국 제거합니다. 반환된 핸들을 `abort`하면
/// 태스크가 종료됩니다.
pub fn spawn_sweeper(allowlist: Arc<SymbolAllowlist>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // 첫 틱은 즉시 발화하므로 건너뜀
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = allowlist.sweep_expired();
            debug!(removed = removed, "주기 정리 실행");
        }
    })
}
