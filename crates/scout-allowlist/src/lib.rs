//! # Scout Allowlist
//!
//! 관리자 멘션 기반 시간 윈도우 허용 목록.
//!
//! 관리자가 `$SYMBOL` 형태로 언급한 심볼을 일정 기간 동안 기억하고,
//! 탐지기가 모호한 후보를 판정할 때 신뢰 신호로 사용합니다. 항목은
//! 유효 기간이 지나면 조회 시 지연 제거되거나 백그라운드 태스크가
//! 일괄 정리합니다.

pub mod entry;
pub mod store;
pub mod sweeper;

pub use entry::AllowlistEntry;
pub use store::{HistoricalMessage, SymbolAllowlist};
pub use sweeper::spawn_sweeper;
