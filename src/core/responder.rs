use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;

pub const CANNED_REPLIES: &[&str] = &[
    "Interesting, tell me more.",
    "I hear you.",
    "That makes sense.",
    "Could you elaborate on that?",
    "Why do you think that is?",
    "Fair point.",
    "Hmm, I had not thought of it that way.",
    "Go on.",
];

/// Offline chat partner that answers with a random canned line.
pub struct Responder<R = ThreadRng> {
    rng: R,
}

impl Responder<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for Responder<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Responder<R> {
    #[allow(dead_code)]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Returns `None` when there is nothing to reply to.
    pub fn reply(&mut self, input: &str) -> Option<&'static str> {
        if input.trim().is_empty() {
            return None;
        }
        CANNED_REPLIES.choose(&mut self.rng).copied()
    }
}
