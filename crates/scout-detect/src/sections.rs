//! 메시지 섹션 헤더 파싱.
//!
//! "TOP LONG" / "טופ שורט" 같은 섹션 헤더를 찾아, 각 심볼 위치가
//! 어느 섹션에 속하는지 (롱 추천 / 숏 추천 / 일반) 판정합니다.
//! 헤더 줄 이후의 심볼은 다음 헤더가 나올 때까지 해당 섹션에
//! 속하며, 헤더 줄 자체에 있는 심볼도 포함됩니다.

use scout_core::SymbolPriority;

/// 롱 섹션 헤더 마커 (소문자, 포함 매칭).
const LONG_MARKERS: &[&str] = &["top long", "longs:", "טופ לונג", "לונגים"];

/// 숏 섹션 헤더 마커 (소문자, 포함 매칭).
const SHORT_MARKERS: &[&str] = &["top short", "shorts:", "טופ שורט", "שורטים"];

/// 바이트 위치 -> 섹션 우선순위 매핑.
///
/// 헤더 줄의 시작 오프셋마다 섹션 전환점을 기록합니다.
#[derive(Debug, Clone)]
pub struct SectionMap {
    // (줄 시작 오프셋, 그 지점부터의 우선순위), 오프셋 오름차순
    switches: Vec<(usize, SymbolPriority)>,
}

impl SectionMap {
    /// 텍스트를 줄 단위로 스캔해 섹션 맵을 만듭니다.
    pub fn parse(text: &str) -> Self {
        let mut switches = vec![(0, SymbolPriority::Regular)];

        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            if let Some(priority) = header_priority(line) {
                switches.push((offset, priority));
            }
            offset += line.len();
        }

        Self { switches }
    }

    /// 주어진 바이트 위치의 섹션 우선순위를 반환합니다.
    pub fn priority_at(&self, pos: usize) -> SymbolPriority {
        self.switches
            .iter()
            .rev()
            .find(|(start, _)| *start <= pos)
            .map(|(_, priority)| *priority)
            .unwrap_or_default()
    }

    /// 헤더가 하나라도 있었는지 여부.
    pub fn has_sections(&self) -> bool {
        self.switches.len() > 1
    }
}

/// 줄이 섹션 헤더인지 판정합니다.
fn header_priority(line: &str) -> Option<SymbolPriority> {
    let lower = line.trim().to_lowercase();
    if LONG_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(SymbolPriority::TopLong);
    }
    if SHORT_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(SymbolPriority::TopShort);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_headers_means_regular() {
        let map = SectionMap::parse("AAPL looking strong today");
        assert!(!map.has_sections());
        assert_eq!(map.priority_at(0), SymbolPriority::Regular);
        assert_eq!(map.priority_at(10), SymbolPriority::Regular);
    }

    #[test]
    fn test_long_then_short_sections() {
        let text = "טופ לונג:\nAAPL TSLA\nטופ שורט:\nNVDA";
        let map = SectionMap::parse(text);

        let aapl = text.find("AAPL").unwrap();
        let nvda = text.find("NVDA").unwrap();
        assert_eq!(map.priority_at(aapl), SymbolPriority::TopLong);
        assert_eq!(map.priority_at(nvda), SymbolPriority::TopShort);
    }

    #[test]
    fn test_symbols_on_header_line_included() {
        let text = "🔥 TOP LONGS: AAPL MSFT";
        let map = SectionMap::parse(text);

        let aapl = text.find("AAPL").unwrap();
        assert_eq!(map.priority_at(aapl), SymbolPriority::TopLong);
    }

    #[test]
    fn test_text_before_first_header_is_regular() {
        let text = "בוקר טוב VEEV\nshorts:\nQQQ SPY";
        let map = SectionMap::parse(text);

        let veev = text.find("VEEV").unwrap();
        let qqq = text.find("QQQ").unwrap();
        assert_eq!(map.priority_at(veev), SymbolPriority::Regular);
        assert_eq!(map.priority_at(qqq), SymbolPriority::TopShort);
    }

    #[test]
    fn test_hebrew_short_header() {
        let text = "שורטים להיום\nBYND PLUG";
        let map = SectionMap::parse(text);

        let bynd = text.find("BYND").unwrap();
        assert_eq!(map.priority_at(bynd), SymbolPriority::TopShort);
    }
}
