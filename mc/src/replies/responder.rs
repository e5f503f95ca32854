//! Responder trait and canned implementation
//!
//! A responder decides what the simulated side of a session says next.

use rand::seq::IndexedRandom;

use crate::domain::Sender;

/// Produces the text of a simulated reply
pub trait Responder: Send + Sync {
    /// Reply spoken as `speaker` to the message `prompt`; `None` to stay silent
    fn reply(&self, speaker: Sender, prompt: &str) -> Option<String>;
}

/// Picks a random line from a fixed list per side
pub struct CannedResponder {
    student_lines: Vec<String>,
    counselor_lines: Vec<String>,
}

impl CannedResponder {
    pub fn new(student_lines: Vec<String>, counselor_lines: Vec<String>) -> Self {
        Self {
            student_lines,
            counselor_lines,
        }
    }

    fn lines_for(&self, speaker: Sender) -> &[String] {
        match speaker {
            Sender::Student => &self.student_lines,
            Sender::Counselor => &self.counselor_lines,
        }
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        let student_lines = [
            "I've been feeling quite stressed about my exams lately.",
            "It's been hard to focus on my studies.",
            "I appreciate you taking the time to talk with me.",
            "That's really helpful advice, thank you.",
        ];
        let counselor_lines = [
            "Thank you for sharing that. Can you tell me more?",
            "That sounds really difficult. How long have you felt this way?",
            "Let's try a short breathing exercise together.",
            "You're doing the right thing by reaching out.",
        ];
        Self::new(
            student_lines.iter().map(|s| s.to_string()).collect(),
            counselor_lines.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl Responder for CannedResponder {
    fn reply(&self, speaker: Sender, _prompt: &str) -> Option<String> {
        self.lines_for(speaker).choose(&mut rand::rng()).cloned()
    }
}
