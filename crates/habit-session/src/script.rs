//! Canned assistant replies.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::error::{SessionError, SessionResult};

/// Replies used when none are configured
pub const DEFAULT_REPLIES: [&str; 4] = [
    "Great choice! Exercising regularly has amazing benefits. How many days per week would you like to commit to?",
    "That's an excellent goal! What type of exercise are you interested in? (e.g., running, yoga, strength training)",
    "Consistency is key! Would you like to start with 3 days a week and build from there?",
    "Wonderful! Let's make this achievable. What's your current fitness level?",
];

/// Non-empty table of assistant replies, chosen uniformly at random
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyScript {
    replies: Vec<String>,
}

impl ReplyScript {
    /// Build a table, rejecting an empty list or blank entries
    pub fn new<I, S>(replies: I) -> SessionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            return Err(SessionError::EmptyReplyScript);
        }
        if let Some(index) = replies.iter().position(|r| r.trim().is_empty()) {
            return Err(SessionError::BlankReply { index });
        }
        Ok(Self { replies })
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.replies.iter().any(|r| r == text)
    }

    /// Pick one entry uniformly at random
    pub fn choose(&self, rng: &mut dyn RngCore) -> &str {
        // never empty, enforced by `new`
        self.replies
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Default for ReplyScript {
    fn default() -> Self {
        Self {
            replies: DEFAULT_REPLIES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_empty_table() {
        let result = ReplyScript::new(Vec::<String>::new());
        assert_eq!(result, Err(SessionError::EmptyReplyScript));
    }

    #[test]
    fn test_rejects_blank_entry() {
        let result = ReplyScript::new(["Nice!", "   "]);
        assert_eq!(result, Err(SessionError::BlankReply { index: 1 }));
    }

    #[test]
    fn test_choice_always_from_table() {
        let script = ReplyScript::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let reply = script.choose(&mut rng);
            assert!(!reply.is_empty());
            assert!(script.contains(reply));
        }
    }

    #[test]
    fn test_choice_covers_table() {
        let script = ReplyScript::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(script.choose(&mut rng).to_string());
        }
        assert_eq!(seen.len(), script.len());
    }

    #[test]
    fn test_seeded_choice_is_deterministic() {
        let script = ReplyScript::default();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(script.choose(&mut a), script.choose(&mut b));
        }
    }

    #[test]
    fn test_single_entry_table() {
        let script = ReplyScript::new(["Only one"]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(script.choose(&mut rng), "Only one");
    }
}
