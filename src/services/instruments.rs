use dashmap::DashMap;

/// Length of a canonical instrument UID (hyphenated UUID form).
pub const INSTRUMENT_UID_LEN: usize = 36;

/// Whether an identifier looks like an instrument UID rather than a ticker.
pub fn is_instrument_uid(id: &str) -> bool {
    let id = id.trim();
    id.len() == INSTRUMENT_UID_LEN && id.chars().filter(|&c| c == '-').count() == 4
}

/// Resolved display metadata for an instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentInfo {
    pub name: String,
    pub ticker: Option<String>,
}

/// Read/write lookup of instrument names and tickers.
pub trait InstrumentDirectory: Send + Sync {
    fn name(&self, uid: &str) -> Option<String>;

    fn ticker(&self, uid: &str) -> Option<String>;

    fn remember(&self, uid: &str, name: &str, ticker: Option<&str>);

    /// UID registered for a ticker, matched case-insensitively.
    fn find_by_ticker(&self, ticker: &str) -> Option<String>;

    /// Best display label: name, then ticker, then the identifier itself.
    fn label(&self, id: &str) -> String {
        let uid = if is_instrument_uid(id) {
            Some(id.to_string())
        } else {
            self.find_by_ticker(id)
        };
        uid.and_then(|uid| self.name(&uid).or_else(|| self.ticker(&uid)))
            .unwrap_or_else(|| id.to_string())
    }
}

/// Thread-safe in-memory instrument directory.
#[derive(Debug, Default)]
pub struct InstrumentCache {
    entries: DashMap<String, InstrumentInfo>,
}

impl InstrumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uid: &str) -> Option<InstrumentInfo> {
        self.entries.get(uid).map(|e| e.value().clone())
    }

    pub fn remove(&self, uid: &str) -> Option<InstrumentInfo> {
        self.entries.remove(uid).map(|(_, info)| info)
    }

    /// All known tickers.
    pub fn tickers(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| e.value().ticker.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl InstrumentDirectory for InstrumentCache {
    fn name(&self, uid: &str) -> Option<String> {
        self.entries.get(uid).map(|e| e.name.clone())
    }

    fn ticker(&self, uid: &str) -> Option<String> {
        self.entries.get(uid).and_then(|e| e.ticker.clone())
    }

    fn remember(&self, uid: &str, name: &str, ticker: Option<&str>) {
        self.entries.insert(
            uid.to_string(),
            InstrumentInfo {
                name: name.to_string(),
                ticker: ticker.map(str::to_string),
            },
        );
    }

    fn find_by_ticker(&self, ticker: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|e| {
                e.ticker
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case(ticker.trim()))
            })
            .map(|e| e.key().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SBER: &str = "e6123145-9665-43e0-8413-cd61b8aa9b13";

    #[test]
    fn test_remember_and_lookup() {
        let cache = InstrumentCache::new();
        cache.remember(SBER, "Sberbank", Some("SBER"));
        assert_eq!(cache.name(SBER), Some("Sberbank".to_string()));
        assert_eq!(cache.ticker(SBER), Some("SBER".to_string()));
        assert_eq!(cache.name("missing"), None);
    }

    #[test]
    fn test_remember_overwrites() {
        let cache = InstrumentCache::new();
        cache.remember(SBER, "Old", None);
        cache.remember(SBER, "New", Some("SBER"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.name(SBER), Some("New".to_string()));
    }

    #[test]
    fn test_find_by_ticker_ignores_case() {
        let cache = InstrumentCache::new();
        cache.remember(SBER, "Sberbank", Some("SBER"));
        assert_eq!(cache.find_by_ticker("sber"), Some(SBER.to_string()));
        assert_eq!(cache.find_by_ticker("GAZP"), None);
    }

    #[test]
    fn test_label_resolution() {
        let cache = InstrumentCache::new();
        assert_eq!(cache.label("GAZP"), "GAZP");
        cache.remember(SBER, "Sberbank", Some("SBER"));
        assert_eq!(cache.label(SBER), "Sberbank");
        assert_eq!(cache.label("SBER"), "Sberbank");
    }

    #[test]
    fn test_uid_detection() {
        assert!(is_instrument_uid(SBER));
        assert!(!is_instrument_uid("SBER"));
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = InstrumentCache::new();
        cache.remember(SBER, "Sberbank", Some("SBER"));
        assert_eq!(cache.tickers(), vec!["SBER".to_string()]);
        assert!(cache.remove(SBER).is_some());
        assert!(cache.is_empty());
        cache.remember(SBER, "Sberbank", None);
        cache.clear();
        assert!(cache.is_empty());
    }
}
