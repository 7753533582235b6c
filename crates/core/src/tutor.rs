//! AI tutor prompt construction and offline canned replies.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a learner message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Number of prior turns forwarded to the model.
pub const MAX_HISTORY_TURNS: usize = 10;

/// How many weak skills are mentioned in the system prompt.
const PROMPT_WEAK_SKILLS: usize = 3;

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single prior message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Validate and trim a learner message.
pub fn validate_message(message: &str) -> Result<&str, CoreError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("message must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(CoreError::Validation(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

/// Keep only the most recent [`MAX_HISTORY_TURNS`] turns, dropping blanks.
pub fn trim_history(history: Vec<ChatTurn>) -> Vec<ChatTurn> {
    let mut turns: Vec<ChatTurn> = history
        .into_iter()
        .filter(|t| !t.content.trim().is_empty())
        .collect();
    let excess = turns.len().saturating_sub(MAX_HISTORY_TURNS);
    turns.drain(..excess);
    turns
}

/// Build the tutor persona prompt.
///
/// `skills` are `(name, progress)` pairs; the weakest few are named so the
/// model can steer explanations toward them.
pub fn build_system_prompt(skills: &[(String, f64)]) -> String {
    let mut prompt = String::from(
        "You are Nova, the AI tutor of NovaAI University. Explain concepts step by step, \
         use short examples, and finish with a question that checks understanding. \
         Keep answers under 250 words unless the learner asks for more detail.",
    );

    let mut weakest: Vec<&(String, f64)> = skills.iter().collect();
    weakest.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    let named: Vec<String> = weakest
        .iter()
        .take(PROMPT_WEAK_SKILLS)
        .map(|(name, p)| format!("{name} ({p:.0}%)"))
        .collect();

    if !named.is_empty() {
        prompt.push_str("\nThe learner's weakest skills are: ");
        prompt.push_str(&named.join(", "));
        prompt.push_str(". Relate answers to these when it helps.");
    }
    prompt
}

/// Keywords up to this many characters must match a whole word; longer ones
/// also match words they prefix ("ethic" matches "ethical").
const WHOLE_WORD_MAX_CHARS: usize = 4;

/// Keyword table for offline replies. First match wins.
const CANNED: &[(&[&str], &str)] = &[
    (
        &["neural", "network", "deep learning"],
        "A neural network is layers of simple units that each weigh their inputs and pass the \
         result on. Training nudges those weights to reduce error on examples. Which part would \
         you like to explore: layers, activation functions, or training?",
    ),
    (
        &["prompt"],
        "Good prompts state the role, the task, the constraints and the expected output format. \
         Try rewriting your last prompt with an explicit output format. What changes?",
    ),
    (
        &["ethic", "bias", "biased", "fair", "fairness"],
        "AI ethics asks who benefits, who could be harmed, and who is accountable. Bias often \
         enters through training data. Can you think of a dataset that under-represents a group?",
    ),
    (
        &["machine learning", "ml", "model"],
        "Machine learning fits a model to data so it can make predictions on new inputs. The key \
         loop is: collect data, train, evaluate on held-out data, iterate. Where are you in that loop?",
    ),
    (
        &["python", "code", "coding", "program"],
        "For code questions, share the smallest snippet that shows the problem and the error you \
         see. Meanwhile: have you checked the types of the values involved?",
    ),
    (
        &["hello", "hi", "привет"],
        "Hi! I'm Nova, your AI tutor. What topic are you studying today?",
    ),
];

const FALLBACK_REPLY: &str = "That's a great question. Let's break it down: what do you already \
     know about it, and which part feels unclear? I'll build the explanation from there.";

/// Offline reply used when no language model is reachable.
pub fn canned_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CANNED
        .iter()
        .find(|(keywords, _)| {
            keywords.iter().any(|k| {
                if k.contains(' ') {
                    lower.contains(k)
                } else if k.chars().count() <= WHOLE_WORD_MAX_CHARS {
                    words.contains(k)
                } else {
                    words.iter().any(|w| w.starts_with(k))
                }
            })
        })
        .map(|(_, reply)| *reply)
        .unwrap_or(FALLBACK_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: ChatRole, content: &str) -> ChatTurn {
        ChatTurn {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn blank_message_is_rejected() {
        assert!(validate_message("   ").is_err());
        assert_eq!(validate_message("  hi  ").unwrap(), "hi");
    }

    #[test]
    fn overlong_message_is_rejected() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(validate_message(&long).is_err());
    }

    #[test]
    fn history_keeps_latest_turns() {
        let history: Vec<ChatTurn> = (0..15)
            .map(|i| turn(ChatRole::User, &format!("msg {i}")))
            .collect();
        let trimmed = trim_history(history);
        assert_eq!(trimmed.len(), MAX_HISTORY_TURNS);
        assert_eq!(trimmed[0].content, "msg 5");
        assert_eq!(trimmed.last().unwrap().content, "msg 14");
    }

    #[test]
    fn history_drops_blank_turns() {
        let trimmed = trim_history(vec![turn(ChatRole::User, " "), turn(ChatRole::Assistant, "ok")]);
        assert_eq!(trimmed.len(), 1);
    }

    #[test]
    fn canned_reply_matches_keywords() {
        assert!(canned_reply("How do Neural Networks learn?").contains("neural network"));
        assert!(canned_reply("is my model biased?").contains("ethics"));
        assert!(canned_reply("привет").contains("Nova"));
    }

    #[test]
    fn canned_reply_does_not_match_inside_words() {
        // "this" must not trigger the "hi" greeting.
        assert_eq!(canned_reply("explain this to me"), FALLBACK_REPLY);
        assert_eq!(canned_reply("tell me about history"), FALLBACK_REPLY);
        assert_eq!(canned_reply("a fairy tale"), FALLBACK_REPLY);
    }

    #[test]
    fn long_keywords_match_word_stems() {
        assert!(canned_reply("is this ethical?").contains("ethics"));
        assert!(canned_reply("I love programming").contains("snippet"));
        assert!(canned_reply("hi there").contains("Nova"));
    }

    #[test]
    fn system_prompt_names_weakest_skills() {
        let prompt = build_system_prompt(&[
            ("python".into(), 80.0),
            ("ethics".into(), 10.0),
            ("ml".into(), 30.0),
            ("statistics".into(), 50.0),
        ]);
        assert!(prompt.contains("ethics (10%), ml (30%), statistics (50%)"));
        assert!(!prompt.contains("python"));
    }

    #[test]
    fn system_prompt_without_skills() {
        let prompt = build_system_prompt(&[]);
        assert!(!prompt.contains("weakest"));
    }
}
