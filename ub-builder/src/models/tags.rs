//! Ordered tag tokens for one species

/// Tag tokens in insertion order
///
/// Tokens never contain whitespace; the space-separated tag string is produced
/// only by [`TagSet::to_tag_string`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tokens: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a space-separated tag string (as written by `to_tag_string`)
    pub fn parse(tags: &str) -> Self {
        Self {
            tokens: tags.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Append a token, allowing repeats
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Append a token unless it is already present
    ///
    /// Returns `true` if the token was added.
    pub fn push_once(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.contains(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Append several tokens in order
    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn to_tag_string(&self) -> String {
        self.tokens.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order_and_repeats() {
        let mut tags = TagSet::new();
        tags.push("UB::Canada::Common");
        tags.push("UB::Peru::Rare");
        tags.push("UB::Canada::Common");

        assert_eq!(tags.len(), 3);
        assert_eq!(
            tags.to_tag_string(),
            "UB::Canada::Common UB::Peru::Rare UB::Canada::Common"
        );
    }

    #[test]
    fn test_push_once() {
        let mut tags = TagSet::new();
        assert!(tags.push_once("UB::version-2025-03-08"));
        assert!(!tags.push_once("UB::version-2025-03-08"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_parse_tolerates_trailing_whitespace() {
        let tags = TagSet::parse("UB::Canada::Common UB::Peru::Rare ");
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["UB::Canada::Common", "UB::Peru::Rare"]);
        assert!(TagSet::parse("").is_empty());
    }
}
