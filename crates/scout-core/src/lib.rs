//! # Scout Core
//!
//! 심볼 탐지 시스템의 핵심 타입과 공통 인프라.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 탐지 결과 타입 (`StockSymbol`, `SymbolPriority`)
//! - 점수 테이블을 포함한 애플리케이션 설정
//! - 에러 타입
//! - 로깅 인프라
//! - 테스트 가능한 시간 소스 (`Clock`)

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AllowlistConfig, AppConfig, DetectionConfig, LinkerConfig, LoggingConfig};
pub use error::{CoreError, CoreResult};
pub use types::{is_valid_symbol, normalize_symbol, StockSymbol, SymbolPriority, MAX_SYMBOL_LEN};
