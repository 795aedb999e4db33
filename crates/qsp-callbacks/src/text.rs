use std::fmt;

/// Text handed back to the engine, cut to the engine's buffer length.
///
/// Lengths count characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedText {
    text: String,
    truncated: bool,
}

impl BoundedText {
    pub fn new(text: &str, max_len: usize) -> Self {
        match text.char_indices().nth(max_len) {
            Some((end, _)) => Self {
                text: text[..end].to_string(),
                truncated: true,
            },
            None => Self {
                text: text.to_string(),
                truncated: false,
            },
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True if characters were dropped to fit
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for BoundedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_kept() {
        let text = BoundedText::new("north", 10);
        assert_eq!(text.as_str(), "north");
        assert!(!text.is_truncated());
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let text = BoundedText::new("north", 5);
        assert_eq!(text.as_str(), "north");
        assert!(!text.is_truncated());
    }

    #[test]
    fn long_text_is_cut_and_flagged() {
        let text = BoundedText::new("northwest", 5);
        assert_eq!(text.as_str(), "north");
        assert!(text.is_truncated());
    }

    #[test]
    fn cut_respects_character_boundaries() {
        let text = BoundedText::new("Привет", 3);
        assert_eq!(text.as_str(), "При");
        assert!(text.is_truncated());
    }

    #[test]
    fn zero_length_buffer() {
        let text = BoundedText::new("x", 0);
        assert!(text.is_empty());
        assert!(text.is_truncated());
    }
}
