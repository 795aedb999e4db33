use std::collections::HashMap;

/// Answers to the engine's version queries; keys are case-insensitive
#[derive(Debug, Clone)]
pub struct VersionInfo {
    values: HashMap<String, String>,
}

impl VersionInfo {
    /// Player version and platform
    pub fn new() -> Self {
        Self::empty()
            .with("player", env!("CARGO_PKG_VERSION"))
            .with("platform", std::env::consts::OS)
    }

    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn with(mut self, param: &str, value: impl Into<String>) -> Self {
        self.values.insert(param.trim().to_lowercase(), value.into());
        self
    }

    pub fn get(&self, param: &str) -> Option<&str> {
        self.values
            .get(&param.trim().to_lowercase())
            .map(String::as_str)
    }
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_entries() {
        let info = VersionInfo::new();
        assert_eq!(info.get("player"), Some(env!("CARGO_PKG_VERSION")));
        assert_eq!(info.get("platform"), Some(std::env::consts::OS));
    }

    #[test]
    fn lookup_ignores_case() {
        let info = VersionInfo::empty().with("Engine", "5.8.0");
        assert_eq!(info.get("ENGINE"), Some("5.8.0"));
        assert_eq!(info.get("engine"), Some("5.8.0"));
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(VersionInfo::new().get("unknownkey"), None);
    }
}
