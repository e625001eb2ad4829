//! 전체 파이프라인 통합 테스트.
//!
//! 관리자 확정 -> 허용 목록 -> 탐지 부스트 -> 분석 기록 연결 -> 정리의
//! 흐름을 실제 구성 그대로 검증합니다.

use std::sync::Arc;

use chrono::{Duration, Utc};

use scout_allowlist::SymbolAllowlist;
use scout_core::{AllowlistConfig, Clock, DetectionConfig, LinkerConfig, ManualClock};
use scout_detect::SymbolDetector;
use scout_linker::{AnalysisLinker, IncomingMessage};

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[tokio::test]
async fn test_admin_confirmation_boosts_community_mentions() {
    let allowlist = Arc::new(SymbolAllowlist::new(&AllowlistConfig::default()));
    let detector = Arc::new(
        SymbolDetector::new(&DetectionConfig::default())
            .unwrap()
            .with_allowlist(Arc::clone(&allowlist)),
    );
    let config = LinkerConfig {
        trusted_authors: vec!["admin-1".to_string()],
        ..LinkerConfig::default()
    };
    let linker = AnalysisLinker::new(Arc::clone(&detector), allowlist, config);

    // 확정 전: 커뮤니티 멘션은 기본 점수만 받는다
    let before = detector.detect("BKV בכיוון טוב");
    assert!(approx(before[0].confidence, 0.5));

    // 관리자 거래 라인이 허용 목록과 분석 기록을 채운다
    let outcome = linker
        .process_message(&IncomingMessage::new(
            "עסקאות פתוחות: $BKV / $QUBT / $VEEV",
            "admin-1",
            "deals",
            "m-100",
            Utc::now(),
        ))
        .await;
    assert_eq!(outcome.allowlist_added, ["BKV", "QUBT", "VEEV"]);
    assert_eq!(outcome.records_updated, 3);

    // 확정 후: 같은 멘션이 허용 목록 부스트를 받는다
    let after = detector.detect("BKV בכיוון טוב");
    assert!(approx(after[0].confidence, 0.85));

    // 커뮤니티 멘션이 관리자 분석 기록과 연결된다
    let community = linker
        .process_message(&IncomingMessage::new(
            "מה דעתכם על BKV?",
            "user-7",
            "trading-room",
            "m-101",
            Utc::now(),
        ))
        .await;
    let link = &community.links.links[0];
    assert_eq!(link.detection.symbol, "BKV");
    let analysis = link.analysis.as_ref().expect("linked to admin analysis");
    assert_eq!(analysis.author_id, "admin-1");
    assert_eq!(analysis.message_id, "m-100");
}

#[tokio::test]
async fn test_allowlist_expiry_and_record_retention_diverge() {
    let clock = Arc::new(ManualClock::starting_now());
    let allowlist = Arc::new(SymbolAllowlist::with_clock(
        &AllowlistConfig::default(),
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let detector = Arc::new(
        SymbolDetector::new(&DetectionConfig::default())
            .unwrap()
            .with_allowlist(Arc::clone(&allowlist)),
    );
    let config = LinkerConfig {
        trusted_authors: vec!["admin-1".to_string()],
        ..LinkerConfig::default()
    };
    let linker = AnalysisLinker::new(detector, Arc::clone(&allowlist), config)
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>);

    linker
        .process_message(&IncomingMessage::new(
            "$NVTS מוסיף עוד",
            "admin-1",
            "deals",
            "m-1",
            clock.now(),
        ))
        .await;
    assert!(allowlist.is_symbol_allowed("NVTS"));
    assert!(linker.latest_for("NVTS").is_some());

    // 허용 목록은 14일 만에 만료되지만 분석 기록은 남는다
    clock.advance(Duration::days(15));
    assert!(!allowlist.is_symbol_allowed("NVTS"));
    assert!(linker.latest_for("NVTS").is_some());

    // 보존 기간(30일)이 지나면 기록도 정리된다
    clock.advance(Duration::days(16));
    assert_eq!(linker.prune_stale(Duration::days(30)), 1);
    assert!(linker.latest_for("NVTS").is_none());
}
