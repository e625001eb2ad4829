//! 심볼 스캔 명령.

use anyhow::Context;

use scout_core::{StockSymbol, SymbolPriority};
use scout_detect::SymbolDetector;

use super::load_app_config;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// 문자열에서 출력 형식을 파싱합니다.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 스캔 명령 설정.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// 스캔할 텍스트
    pub text: String,
    /// 거래 라인 모드
    pub deals: bool,
    /// 출력 형식
    pub format: OutputFormat,
    /// 설정 파일 경로
    pub config_path: Option<String>,
}

/// 스캔을 실행하고 결과를 출력합니다.
pub fn run_scan(config: ScanConfig) -> anyhow::Result<()> {
    let app = load_app_config(config.config_path.as_deref()).context("설정 로드 실패")?;
    let detector = SymbolDetector::new(&app.detection).context("탐지기 초기화 실패")?;

    let symbols = if config.deals {
        detector.detect_deals_line(&config.text)
    } else {
        detector.detect(&config.text)
    };

    match config.format {
        OutputFormat::Table => println!("{}", render_table(&symbols)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&symbols)?),
    }

    Ok(())
}

/// 결과를 표 형태의 문자열로 만듭니다.
fn render_table(symbols: &[StockSymbol]) -> String {
    if symbols.is_empty() {
        return "탐지된 심볼이 없습니다.".to_string();
    }

    let mut out = format!("📈 탐지된 심볼: {}개\n", symbols.len());
    for s in symbols {
        out.push_str(&format!(
            "  {:>2}. {:<5} 신뢰도 {:.2}{}\n",
            s.position + 1,
            s.symbol,
            s.confidence,
            priority_tag(s.priority),
        ));
    }
    out.pop();
    out
}

fn priority_tag(priority: SymbolPriority) -> &'static str {
    match priority {
        SymbolPriority::TopLong => "  🟢 롱 추천",
        SymbolPriority::TopShort => "  🔴 숏 추천",
        SymbolPriority::Regular => "",
    }
}
