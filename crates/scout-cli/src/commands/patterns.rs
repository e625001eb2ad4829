//! 탐지 패턴 조회 명령.

use anyhow::Context;

use scout_detect::{SymbolDetector, TechnicalPattern};

use super::load_app_config;

/// 등록된 기술적/지리 패턴 목록을 출력합니다.
pub fn run_patterns(config_path: Option<&str>) -> anyhow::Result<()> {
    let app = load_app_config(config_path).context("설정 로드 실패")?;
    let detector = SymbolDetector::new(&app.detection).context("탐지기 초기화 실패")?;

    println!(
        "{}",
        render_patterns(
            detector.classifier().technical_patterns(),
            detector.classifier().geographic_patterns(),
        )
    );

    Ok(())
}

/// 패턴 목록을 문자열로 만듭니다.
fn render_patterns(technical: &[TechnicalPattern], geographic: &[TechnicalPattern]) -> String {
    let mut out = format!("📐 기술적 패턴: {}개\n", technical.len());
    for p in technical {
        out.push_str(&render_one(p));
    }

    out.push_str(&format!("\n🌍 지리 패턴: {}개\n", geographic.len()));
    for p in geographic {
        out.push_str(&render_one(p));
    }
    out.pop();
    out
}

fn render_one(p: &TechnicalPattern) -> String {
    format!(
        "  - {} (예: {})\n    {}\n",
        p.description,
        p.examples.join(", "),
        p.pattern.as_str(),
    )
}
