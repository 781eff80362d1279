//! Bot reply generation.
//!
//! The service only knows the [`ResponseGenerator`] trait. The shipped
//! [`CannedResponseGenerator`] picks a template at random and ignores its
//! input; anything smarter can replace it without touching the service.

use rand::seq::SliceRandom;

/// Replies used when no override is configured.
pub const DEFAULT_RESPONSES: [&str; 4] = [
    "Thanks for your message! I'm here to help with any questions about Artisan.",
    "I understand you're interested in learning more about Artisan. What specific aspects would you like to know about?",
    "That's a great question about Artisan. Let me help you with that.",
    "I'm processing your request about Artisan. Could you provide more details?",
];

/// Produces the bot reply for a piece of user content.
pub trait ResponseGenerator: Send + Sync {
    fn generate(&self, input: &str) -> String;
}

impl<F> ResponseGenerator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn generate(&self, input: &str) -> String {
        self(input)
    }
}

/// Uniform random pick from a fixed list of replies.
#[derive(Debug, Clone)]
pub struct CannedResponseGenerator {
    responses: Vec<String>,
}

impl CannedResponseGenerator {
    /// Use `responses`, or the built-in list when it is empty.
    pub fn new(responses: Vec<String>) -> Self {
        let responses: Vec<String> = responses
            .into_iter()
            .filter(|r| !r.trim().is_empty())
            .collect();

        if responses.is_empty() {
            Self::default()
        } else {
            Self { responses }
        }
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

impl Default for CannedResponseGenerator {
    fn default() -> Self {
        Self {
            responses: DEFAULT_RESPONSES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl ResponseGenerator for CannedResponseGenerator {
    fn generate(&self, _input: &str) -> String {
        // `new` guarantees a non-empty list
        self.responses
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}
