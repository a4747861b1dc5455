use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Stage of a user's poll-creation dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Default,
    QuestionCollected,
    AnswersCollected,
    Ended,
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::QuestionCollected => "question_collected",
            Self::AnswersCollected => "answers_collected",
            Self::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// A poll ready to be sent to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
}

/// Question and answers gathered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollDraft {
    pub question: Option<String>,
    pub answers: Vec<String>,
}

impl PollDraft {
    /// The poll to send, if both a question and at least one answer are set.
    pub fn to_poll(&self) -> Option<Poll> {
        let question = self.question.as_ref()?;
        if self.answers.is_empty() {
            return None;
        }
        Some(Poll {
            question: question.clone(),
            options: self.answers.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub state: ConversationState,
    pub draft: PollDraft,
}

/// One [`Session`] per user, created on first contact and kept for the
/// process lifetime.
///
/// Each session sits behind its own async mutex. Holding it for the whole of
/// a message's processing serialises commands from the same user while
/// leaving other users independent.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<i64, Arc<Mutex<Session>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session(&self, user_id: i64) -> Arc<Mutex<Session>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| {
                tracing::debug!("New session for user {}", user_id);
                Arc::new(Mutex::new(Session::default()))
            })
            .clone()
    }

    #[cfg(test)]
    pub async fn state_of(&self, user_id: i64) -> ConversationState {
        let session = self.session(user_id).await;
        let state = session.lock().await.state;
        state
    }
}
