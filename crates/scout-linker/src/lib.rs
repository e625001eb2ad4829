//! 심볼 탐지와 관리자 분석의 연결 레이어.
//!
//! 채팅 메시지를 처리해 탐지된 심볼을 신뢰 작성자(관리자)의 최신
//! 분석 기록과 연결하고, 조립된 링크를 싱크로 발행합니다.
//!
//! 제공 기능:
//! - 메시지 처리 파이프라인 ([`AnalysisLinker`])
//! - 심볼별 최신 분석 기록 저장/조회
//! - 발행 싱크 trait과 기본 구현 ([`LinkSink`], [`TracingSink`])

pub mod linker;
pub mod types;

pub use linker::AnalysisLinker;
pub use types::{
    AnalysisRecord, IncomingMessage, LinkOutcome, LinkSink, LinkerError, LinkerResult,
    MentionLinks, SymbolLink, TracingSink,
};
