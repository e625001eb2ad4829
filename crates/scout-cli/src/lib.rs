//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 메시지/거래 라인 심볼 스캔
//! - 탐지 패턴 조회
//! - 설정 파일 로드

pub mod commands;

pub use commands::*;
