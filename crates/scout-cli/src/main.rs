//! 심볼 스카우트 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 메시지 스캔
//! scout scan "קניתי $AAPL היום 🚀 וגם MSFT"
//!
//! # 관리자 거래 라인 스캔 (전 토큰 신뢰도 1.0)
//! scout scan --deals "QUBT / BKV / MSFT / VEEV 👀"
//!
//! # JSON 출력
//! scout scan -f json "$AAPL breakout"
//!
//! # 등록된 기술적/지리 패턴 목록
//! scout patterns
//! ```

use clap::{Parser, Subcommand};

mod commands;

use commands::patterns::run_patterns;
use commands::scan::{run_scan, OutputFormat, ScanConfig};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Symbol scout CLI - 트레이딩 채팅 심볼 탐지 도구", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (기본: config/default.toml, 없으면 내장 기본값)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 메시지에서 심볼 탐지
    Scan {
        /// 스캔할 메시지 텍스트
        text: String,

        /// 관리자 거래 라인으로 처리 (점수 계산 없이 전부 채택)
        #[arg(long, default_value = "false")]
        deals: bool,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 등록된 기술적/지리 패턴 목록 보기
    Patterns,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 트레이싱 초기화
    scout_core::logging::init_logging_from_env()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            text,
            deals,
            format,
        } => {
            let format = OutputFormat::from_str(&format).ok_or_else(|| {
                format!("잘못된 출력 형식: {}. 지원: table, json", format)
            })?;

            run_scan(ScanConfig {
                text,
                deals,
                format,
                config_path: cli.config,
            })?;
        }
        Commands::Patterns => {
            run_patterns(cli.config.as_deref())?;
        }
    }

    Ok(())
}
