//! Session-scoped flags that survive a page navigation

use std::collections::HashMap;

/// Key/value store scoped to the browsing session
pub trait SessionStore {
    fn set(&mut self, key: &str, value: &str);

    fn get(&self, key: &str) -> Option<String>;

    /// Read and clear a flag
    fn take(&mut self, key: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn take(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears_flag() {
        let mut session = MemorySession::new();
        session.set("aq-play-intro", "1");
        assert_eq!(session.get("aq-play-intro").as_deref(), Some("1"));
        assert_eq!(session.take("aq-play-intro").as_deref(), Some("1"));
        assert_eq!(session.get("aq-play-intro"), None);
    }
}
