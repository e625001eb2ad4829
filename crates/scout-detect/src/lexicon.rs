//! 데이터 기반 판정 규칙 테이블.
//!
//! 탐지 휴리스틱이 참조하는 모든 단어 목록을 한곳에 모아 둡니다.
//! 규칙은 코드가 아니라 테이블을 수정해 조정합니다:
//! - 일반 영어 단어 (티커로 오인되는 짧은 단어)
//! - 히브리어 불용어 (원문 및 라틴 음차 형태)
//! - 히브리어 주식 키워드 (강/중/약 3단계)
//! - 영어 주식 문맥 키워드
//! - 기술적 지표와 혼동되는 토큰, 지리 코드

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;

/// 티커 형식과 겹치는 일반 영어 단어 (소문자, 1~5자).
const COMMON_ENGLISH_WORDS: &[&str] = &[
    // 관사/대명사/전치사/접속사
    "a", "i", "an", "the", "this", "that", "these", "those", "it", "its", "he", "she", "we",
    "you", "they", "them", "his", "her", "hers", "our", "ours", "your", "their", "me", "him",
    "us", "my", "mine", "who", "whom", "which", "what", "and", "or", "but", "nor", "so", "yet",
    "if", "then", "else", "when", "while", "as", "at", "by", "for", "from", "in", "into", "of",
    "off", "on", "onto", "out", "over", "to", "under", "up", "upon", "with", "about", "above",
    "after", "below", "down", "near", "past", "since", "than", "till", "until",
    // 동사/조동사
    "is", "am", "are", "was", "were", "be", "been", "being", "do", "does", "did", "done", "have",
    "has", "had", "can", "could", "will", "would", "shall", "may", "might", "must", "go", "goes",
    "went", "gone", "get", "gets", "got", "make", "makes", "made", "say", "says", "said", "see",
    "sees", "saw", "seen", "know", "knew", "take", "takes", "took", "come", "comes", "came",
    "give", "gives", "gave", "look", "looks", "find", "found", "think", "want", "wants", "use",
    "uses", "used", "try", "tries", "tried", "keep", "keeps", "kept", "let", "lets", "put",
    "puts", "call", "calls", "work", "works", "seem", "seems", "feel", "feels", "felt", "left",
    "move", "moves", "moved", "turn", "turns", "show", "shows", "play", "plays", "run", "runs",
    "ran", "hold", "holds", "held", "wait", "waits", "stay", "stays", "like", "likes", "liked",
    "need", "needs", "mean", "means", "meant", "ask", "asks", "asked", "talk", "talks", "read",
    "reads", "add", "adds", "added", "check", "wins", "lose", "loses", "lost", "buy", "buys",
    "sell", "sells", "sold", "drop", "drops", "fell", "rise", "rises", "rose", "open", "opens",
    "close", "jump", "jumps", "fall", "falls",
    // 명사/형용사/부사
    "time", "year", "years", "day", "days", "week", "weeks", "month", "hour", "hours", "today",
    "now", "soon", "late", "later", "early", "ever", "never", "often", "again", "once", "twice",
    "here", "there", "where", "why", "how", "all", "any", "both", "each", "few", "more", "most",
    "other", "some", "such", "no", "not", "only", "own", "same", "too", "very", "just", "also",
    "even", "still", "well", "back", "much", "many", "man", "men", "way", "ways", "new", "news",
    "old", "good", "great", "nice", "best", "bad", "worse", "worst", "big", "small", "high",
    "low", "long", "short", "first", "last", "next", "right", "wrong", "true", "false", "real",
    "sure", "easy", "hard", "fast", "slow", "huge", "full", "half", "part", "kind", "sort",
    "type", "thing", "stuff", "one", "two", "three", "four", "five", "six", "seven", "eight",
    "nine", "ten", "red", "green", "blue", "black", "white", "guys", "team", "link", "join",
    "room", "chat", "word", "words", "line", "lines", "list", "lists", "side", "end", "top",
    "base", "level", "price", "value", "money", "cash", "gain", "gains", "loss", "win", "risk",
    "area", "zone", "zones", "entry", "exit", "chart", "trend", "break", "stop", "plan", "plans",
    "idea", "ideas", "point", "move", "moves", "setup", "watch", "eyes", "eye", "yes", "okay",
    "ok", "lol", "haha", "bro", "dude", "wow", "omg", "thx", "pls", "btw", "imo", "fyi",
    // 기타 자주 나오는 단어
    "quick", "brown", "fox", "lazy", "dog",
];

/// 히브리어 불용어 (원문 스크립트).
///
/// `is_primarily_technical_content`의 단어 수 계산에서 제외됩니다.
const HEBREW_STOPWORDS: &[&str] = &[
    "של", "את", "על", "זה", "זאת", "עם", "הוא", "היא", "אני", "אתה", "אתם", "אנחנו", "הם",
    "הן", "לא", "כן", "יש", "אין", "גם", "רק", "אבל", "או", "אם", "כי", "מה", "מי", "איך",
    "למה", "מתי", "איפה", "כל", "עוד", "כבר", "פה", "כאן", "שם", "עכשיו", "אז", "אחרי",
    "לפני", "בין", "עד", "מן", "אל", "יותר", "פחות", "מאוד", "הרבה", "קצת", "טוב", "רע",
    "היום", "מחר", "אתמול", "שלי", "שלך", "שלו", "שלה", "שלנו", "שלהם", "להיות", "היה",
    "הייתה", "יהיה", "תהיה", "אנשים", "דבר", "פעם", "ממש", "בסדר", "אולי", "בטח", "תודה",
    "בבקשה", "סליחה", "שלום",
];

/// 히브리어 불용어의 라틴 음차 형태 (소문자).
///
/// 히브리어가 섞인 메시지에서 티커 후보로 오인되는 음차 단어를
/// 걸러냅니다.
const HEBREW_TRANSLIT_STOPWORDS: &[&str] = &[
    "shel", "et", "al", "ze", "zot", "im", "hu", "hi", "ani", "ata", "atem", "hem", "hen",
    "lo", "ken", "yesh", "ein", "gam", "rak", "aval", "o", "ma", "mi", "eich", "lama", "matai",
    "eifo", "kol", "od", "kvar", "po", "kan", "sham", "az", "ad", "el", "yoter", "tov", "ra",
    "meod", "ktzat", "sheli", "shelo", "shela", "haya", "yihye", "ulai", "toda", "achla",
    "yalla", "nu", "davka", "stam", "kacha", "harbe",
];

/// 히브리어 주식 키워드 (강): 종목/거래를 직접 가리키는 명사.
const HEBREW_STOCK_KEYWORDS_STRONG: &[&str] = &[
    "מניה", "מניות", "סטוק", "טרייד", "עסקה", "עסקאות", "פוזיציה", "לונג", "שורט", "סקוויז",
    "פריצה",
];

/// 히브리어 주식 키워드 (중): 매매 행위 동사.
const HEBREW_STOCK_KEYWORDS_MEDIUM: &[&str] = &[
    "קנה", "קניתי", "קונה", "מכר", "מכרתי", "מוכר", "מחזיק", "מחזיקים", "נכנס", "נכנסתי",
    "כניסה", "יצא", "יצאתי", "יציאה", "סטופ", "יעד", "מטרה", "הוספתי", "מוסיף", "ממתין",
];

/// 히브리어 주식 키워드 (약): 일반 시장 대화.
const HEBREW_STOCK_KEYWORDS_WEAK: &[&str] = &[
    "שוק", "גרף", "ניתוח", "טכני", "נר", "נרות", "תמיכה", "התנגדות", "מגמה", "ווליום",
    "תנודתיות", "עולה", "יורד", "ירוק", "אדום",
];

/// 영어 주식 문맥 키워드 (소문자, 포함 매칭).
const STOCK_KEYWORDS: &[&str] = &[
    "stock", "stocks", "share", "shares", "ticker", "tickers", "buy", "buying", "bought",
    "sell", "selling", "sold", "long", "short", "calls", "puts", "entry", "exit", "position",
    "positions", "holding", "breakout", "earnings", "premarket", "dip", "squeeze", "swing",
    "scalp", "chart", "setup", "watchlist", "target", "bullish", "bearish",
];

/// 기술적 지표 약어와 혼동되는 토큰 (대문자).
const AMBIGUOUS_TECHNICAL_TOKENS: &[&str] = &[
    "WH", "WL", "EMA", "SMA", "DMA", "MA", "RSI", "MACD", "BB", "ATR", "ADX", "CCI", "MFI",
    "ATH", "ATL", "SP", "DOW", "VIX", "VWAP", "US", "EU", "UK", "IL", "DE", "FR", "JP", "CN",
];

/// 지리/국가 코드 토큰 (대문자).
const GEO_TOKENS: &[&str] = &["US", "EU", "UK", "IL", "DE", "FR", "JP", "CN", "USA"];

/// 지리 토큰 주변에서 시장 언급을 나타내는 키워드 (소문자).
const MARKET_ECONOMY_KEYWORDS: &[&str] = &[
    "market", "markets", "economy", "econ", "index", "indices", "futures", "session",
    "inflation", "rates", "fed", "gdp", "stocks",
];

/// 히브리어 주식 키워드 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HebrewTier {
    /// 종목/거래 직접 언급
    Strong,
    /// 매매 행위
    Medium,
    /// 일반 시장 대화
    Weak,
}

/// 판정 규칙 테이블 조회 인터페이스.
///
/// 기본 테이블로 생성하며, 전역 공유 인스턴스는 [`Lexicon::global`]로
/// 얻습니다.
#[derive(Debug)]
pub struct Lexicon {
    common_words: HashSet<&'static str>,
    hebrew_stopwords: HashSet<&'static str>,
    translit_stopwords: HashSet<&'static str>,
    ambiguous_technical: HashSet<&'static str>,
    geo_tokens: HashSet<&'static str>,
}

static GLOBAL_LEXICON: Lazy<Arc<Lexicon>> = Lazy::new(|| Arc::new(Lexicon::new()));

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// 기본 테이블로 새 렉시콘을 생성합니다.
    pub fn new() -> Self {
        Self {
            common_words: COMMON_ENGLISH_WORDS.iter().copied().collect(),
            hebrew_stopwords: HEBREW_STOPWORDS.iter().copied().collect(),
            translit_stopwords: HEBREW_TRANSLIT_STOPWORDS.iter().copied().collect(),
            ambiguous_technical: AMBIGUOUS_TECHNICAL_TOKENS.iter().copied().collect(),
            geo_tokens: GEO_TOKENS.iter().copied().collect(),
        }
    }

    /// 전역 공유 인스턴스를 반환합니다.
    pub fn global() -> Arc<Lexicon> {
        Arc::clone(&GLOBAL_LEXICON)
    }

    /// 일반 영어 단어인지 확인합니다 (소문자 기준).
    pub fn is_common_word(&self, word: &str) -> bool {
        self.common_words.contains(word.to_lowercase().as_str())
    }

    /// 히브리어 불용어인지 확인합니다 (원문 스크립트).
    pub fn is_hebrew_stopword(&self, word: &str) -> bool {
        self.hebrew_stopwords.contains(word)
    }

    /// 히브리어 불용어의 라틴 음차인지 확인합니다.
    pub fn is_translit_stopword(&self, word: &str) -> bool {
        self.translit_stopwords
            .contains(word.to_lowercase().as_str())
    }

    /// 기술적 지표 약어와 혼동되는 토큰인지 확인합니다.
    pub fn is_ambiguous_technical(&self, token: &str) -> bool {
        self.ambiguous_technical
            .contains(token.to_uppercase().as_str())
    }

    /// 지리/국가 코드 토큰인지 확인합니다.
    pub fn is_geo_token(&self, token: &str) -> bool {
        self.geo_tokens.contains(token.to_uppercase().as_str())
    }

    /// 윈도우 텍스트에서 가장 강한 히브리어 키워드 등급을 찾습니다.
    pub fn strongest_hebrew_tier(&self, window: &str) -> Option<HebrewTier> {
        if HEBREW_STOCK_KEYWORDS_STRONG.iter().any(|kw| window.contains(kw)) {
            return Some(HebrewTier::Strong);
        }
        if HEBREW_STOCK_KEYWORDS_MEDIUM.iter().any(|kw| window.contains(kw)) {
            return Some(HebrewTier::Medium);
        }
        if HEBREW_STOCK_KEYWORDS_WEAK.iter().any(|kw| window.contains(kw)) {
            return Some(HebrewTier::Weak);
        }
        None
    }

    /// 윈도우 텍스트에 영어 주식 키워드가 있는지 확인합니다.
    pub fn has_stock_keyword(&self, window: &str) -> bool {
        let lower = window.to_lowercase();
        STOCK_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }

    /// 윈도우 텍스트에 시장/경제 키워드가 있는지 확인합니다.
    pub fn has_market_keyword(&self, window: &str) -> bool {
        let lower = window.to_lowercase();
        MARKET_ECONOMY_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }

    /// 텍스트에 히브리어 문자가 포함되어 있는지 확인합니다.
    pub fn contains_hebrew(&self, text: &str) -> bool {
        text.chars().any(|c| ('\u{0590}'..='\u{05FF}').contains(&c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pangram_words_are_common() {
        let lexicon = Lexicon::new();
        for word in ["The", "quick", "brown", "fox", "jumps", "over", "lazy", "dog"] {
            assert!(lexicon.is_common_word(word), "{word} should be common");
        }
    }

    #[test]
    fn test_tickers_are_not_common() {
        let lexicon = Lexicon::new();
        assert!(!lexicon.is_common_word("AAPL"));
        assert!(!lexicon.is_common_word("NVDA"));
        assert!(!lexicon.is_common_word("QUBT"));
    }

    #[test]
    fn test_hebrew_tier_precedence() {
        let lexicon = Lexicon::new();

        // 강한 키워드가 약한 키워드와 함께 있으면 강을 선택
        assert_eq!(
            lexicon.strongest_hebrew_tier("מניה עולה בגרף"),
            Some(HebrewTier::Strong)
        );
        assert_eq!(
            lexicon.strongest_hebrew_tier("קניתי היום"),
            Some(HebrewTier::Medium)
        );
        assert_eq!(
            lexicon.strongest_hebrew_tier("הגרף נראה טוב"),
            Some(HebrewTier::Weak)
        );
        assert_eq!(lexicon.strongest_hebrew_tier("מה קורה"), None);
    }

    #[test]
    fn test_translit_stopwords() {
        let lexicon = Lexicon::new();
        assert!(lexicon.is_translit_stopword("ani"));
        assert!(lexicon.is_translit_stopword("SHEL"));
        assert!(!lexicon.is_translit_stopword("aapl"));
    }

    #[test]
    fn test_ambiguous_and_geo_lookup() {
        let lexicon = Lexicon::new();
        assert!(lexicon.is_ambiguous_technical("wh"));
        assert!(lexicon.is_ambiguous_technical("RSI"));
        assert!(!lexicon.is_ambiguous_technical("AAPL"));

        assert!(lexicon.is_geo_token("us"));
        assert!(lexicon.is_geo_token("IL"));
        assert!(!lexicon.is_geo_token("MSFT"));
    }

    #[test]
    fn test_global_instance_is_shared() {
        assert!(Arc::ptr_eq(&Lexicon::global(), &Lexicon::global()));
    }

    #[test]
    fn test_contains_hebrew() {
        let lexicon = Lexicon::new();
        assert!(lexicon.contains_hebrew("מחזיק AAPL"));
        assert!(!lexicon.contains_hebrew("holding AAPL 🚀"));
    }

    #[test]
    fn test_stock_and_market_keywords() {
        let lexicon = Lexicon::new();
        assert!(lexicon.has_stock_keyword("nice breakout incoming"));
        assert!(lexicon.has_stock_keyword("looking bullish here"));
        assert!(lexicon.has_stock_keyword("bearish divergence forming"));
        assert!(!lexicon.has_stock_keyword("see you tomorrow"));

        assert!(lexicon.has_market_keyword("the US market is open"));
        assert!(!lexicon.has_market_keyword("we visited the US"));
    }
}
