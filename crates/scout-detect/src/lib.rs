//! 주식 심볼 탐지 엔진.
//!
//! 히브리어/영어가 섞인 트레이딩 채팅 메시지에서 티커 심볼을 찾아
//! 신뢰도 점수와 함께 반환합니다.
//!
//! 제공 기능:
//! - 신뢰도 기반 심볼 탐지 파이프라인 ([`SymbolDetector`])
//! - 기술적 지표/지리 언급 혼동 분류 ([`TechnicalContextClassifier`])
//! - 섹션 헤더 파싱 (TOP LONG / TOP SHORT) ([`SectionMap`])
//! - 일반 단어/불용어/키워드 렉시콘 ([`Lexicon`])
//!
//! ```no_run
//! use scout_core::DetectionConfig;
//! use scout_detect::SymbolDetector;
//!
//! # fn main() -> scout_core::CoreResult<()> {
//! let detector = SymbolDetector::new(&DetectionConfig::default())?;
//! let symbols = detector.detect("קניתי $AAPL היום 🚀");
//! assert_eq!(symbols[0].symbol, "AAPL");
//! # Ok(())
//! # }
//! ```

pub mod detector;
pub mod lexicon;
pub mod sections;
pub mod technical;

pub use detector::SymbolDetector;
pub use lexicon::{HebrewTier, Lexicon};
pub use sections::SectionMap;
pub use technical::{TechnicalContextClassifier, TechnicalPattern};
