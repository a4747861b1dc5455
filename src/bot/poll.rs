//! Poll-creation dialogue.
//!
//! `p q <question>` stores the question, `p a <answer> <answer> ...` stores
//! the answers and a bare `p` sends the poll. Transitions are a pure function
//! of `(state, event)`; [`apply`] runs the resulting effect against a session.

use super::messages;
use super::session::{ConversationState, Poll, Session};

/// Telegram accepts 2 to 10 poll options.
pub const MIN_ANSWERS: usize = 2;
pub const MAX_ANSWERS: usize = 10;
/// Telegram's limits in characters.
pub const MAX_QUESTION_CHARS: usize = 300;
pub const MAX_ANSWER_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Question(String),
    Answers(Vec<String>),
    Dispatch,
    Unrecognized,
}

impl PollEvent {
    /// Interpret the text after the poll command token.
    pub fn parse(args: Option<&str>) -> Self {
        let args = match args.map(str::trim) {
            None | Some("") => return Self::Dispatch,
            Some(a) => a,
        };
        let (marker, rest) = match args.split_once(char::is_whitespace) {
            Some((marker, rest)) => (marker, rest.trim()),
            None => (args, ""),
        };
        match marker.to_lowercase().as_str() {
            "q" => Self::Question(rest.to_string()),
            "a" => Self::Answers(rest.split_whitespace().map(str::to_string).collect()),
            _ => Self::Unrecognized,
        }
    }
}

/// Prompt sent back when input doesn't advance the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    AskQuestion,
    AskAnswers,
    AskDispatch,
    EmptyQuestion,
    AnswerCount,
    QuestionTooLong,
    AnswerTooLong,
    Usage,
}

impl Hint {
    pub fn text(self) -> &'static str {
        match self {
            Self::AskQuestion => messages::POLL_ASK_QUESTION,
            Self::AskAnswers => messages::POLL_ASK_ANSWERS,
            Self::AskDispatch => messages::POLL_ASK_DISPATCH,
            Self::EmptyQuestion => messages::POLL_EMPTY_QUESTION,
            Self::AnswerCount => messages::POLL_ANSWER_COUNT,
            Self::QuestionTooLong => messages::POLL_QUESTION_TOO_LONG,
            Self::AnswerTooLong => messages::POLL_ANSWER_TOO_LONG,
            Self::Usage => messages::POLL_USAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the question and drop answers collected for an earlier one.
    StoreQuestion(String),
    StoreAnswers(Vec<String>),
    SendPoll,
    Hint(Hint),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ConversationState,
    pub effect: Effect,
}

impl Transition {
    fn to(next: ConversationState, effect: Effect) -> Self {
        Self { next, effect }
    }

    fn stay(state: ConversationState, hint: Hint) -> Self {
        Self {
            next: state,
            effect: Effect::Hint(hint),
        }
    }
}

/// The transition table.
pub fn transition(state: ConversationState, event: PollEvent) -> Transition {
    use ConversationState::{AnswersCollected, Default, Ended, QuestionCollected};

    match (state, event) {
        (_, PollEvent::Question(q)) if q.is_empty() => Transition::stay(state, Hint::EmptyQuestion),
        (_, PollEvent::Question(q)) if q.chars().count() > MAX_QUESTION_CHARS => {
            Transition::stay(state, Hint::QuestionTooLong)
        }
        (_, PollEvent::Question(q)) => Transition::to(QuestionCollected, Effect::StoreQuestion(q)),

        (QuestionCollected | AnswersCollected, PollEvent::Answers(answers))
            if answers.iter().any(|a| a.chars().count() > MAX_ANSWER_CHARS) =>
        {
            Transition::stay(state, Hint::AnswerTooLong)
        }
        (QuestionCollected | AnswersCollected, PollEvent::Answers(answers))
            if (MIN_ANSWERS..=MAX_ANSWERS).contains(&answers.len()) =>
        {
            Transition::to(AnswersCollected, Effect::StoreAnswers(answers))
        }
        (QuestionCollected | AnswersCollected, PollEvent::Answers(_)) => {
            Transition::stay(state, Hint::AnswerCount)
        }
        (Default | Ended, PollEvent::Answers(_)) => Transition::stay(state, Hint::AskQuestion),

        (AnswersCollected, PollEvent::Dispatch) => Transition::to(Ended, Effect::SendPoll),
        (Ended, PollEvent::Dispatch) => Transition::to(Default, Effect::SendPoll),
        (QuestionCollected, PollEvent::Dispatch) => Transition::stay(state, Hint::AskAnswers),
        (Default, PollEvent::Dispatch) => Transition::stay(state, Hint::AskQuestion),

        (_, PollEvent::Unrecognized) => Transition::stay(state, Hint::Usage),
    }
}

/// What the poll handler asks the transport to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollReply {
    Text(&'static str),
    Send(Poll),
}

/// Run one event against a session, committing the new state.
///
/// Sending requires a complete draft; otherwise nothing is sent and the
/// state is left as it was.
pub fn apply(session: &mut Session, event: PollEvent) -> PollReply {
    let Transition { next, effect } = transition(session.state, event);

    let reply = match effect {
        Effect::StoreQuestion(question) => {
            session.draft.question = Some(question);
            session.draft.answers.clear();
            PollReply::Text(messages::POLL_QUESTION_SAVED)
        }
        Effect::StoreAnswers(answers) => {
            session.draft.answers = answers;
            PollReply::Text(Hint::AskDispatch.text())
        }
        Effect::SendPoll => match session.draft.to_poll() {
            Some(poll) => PollReply::Send(poll),
            None => return PollReply::Text(Hint::AskQuestion.text()),
        },
        Effect::Hint(hint) => PollReply::Text(hint.text()),
    };

    if next != session.state {
        tracing::debug!("Poll state {} -> {}", session.state, next);
    }
    session.state = next;
    reply
}
