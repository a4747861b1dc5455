use super::session::ConversationState;

/// A message split into its command token and the text after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lower-cased, without prefix or `@botname` suffix.
    pub token: String,
    pub args: Option<String>,
}

/// Splits raw message text into a [`Command`].
#[derive(Debug, Clone)]
pub struct CommandParser {
    prefixes: Vec<char>,
}

impl CommandParser {
    pub fn new(prefixes: &[char]) -> Self {
        Self {
            prefixes: prefixes.to_vec(),
        }
    }

    /// `None` for blank text. The prefix is optional.
    pub fn parse(&self, text: &str) -> Option<Command> {
        let text = text.trim();
        let text = text.strip_prefix(self.prefixes.as_slice()).unwrap_or(text);

        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest.trim())),
            None => (text, None),
        };
        let token = head.split('@').next().unwrap_or(head).to_lowercase();
        if token.is_empty() {
            return None;
        }

        Some(Command {
            token,
            args: rest.filter(|r| !r.is_empty()).map(str::to_string),
        })
    }
}

/// Which conversation states a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatePredicate {
    Any,
    /// Not used by [`Router::standard`].
    #[cfg_attr(not(test), allow(dead_code))]
    Exactly(ConversationState),
}

impl StatePredicate {
    fn accepts(self, state: ConversationState) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(expected) => expected == state,
        }
    }
}

/// Handlers the bot can run for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Weather,
    Currency,
    Image,
    Poll,
    /// Nothing matched: reset the dialogue and explain.
    Fallback,
}

struct Route<H> {
    tokens: Vec<String>,
    predicate: StatePredicate,
    handler: H,
}

/// Ordered `(tokens, state predicate) -> handler` table.
///
/// Routes are tried in registration order and the first match wins, so two
/// routes may share a token as long as the more specific state predicate is
/// registered first.
pub struct Router<H> {
    routes: Vec<Route<H>>,
    fallback: H,
}

impl<H: Copy> Router<H> {
    pub fn new(fallback: H) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    pub fn route(mut self, tokens: &[&str], predicate: StatePredicate, handler: H) -> Self {
        self.routes.push(Route {
            tokens: tokens.iter().map(|t| t.to_lowercase()).collect(),
            predicate,
            handler,
        });
        self
    }

    pub fn resolve(&self, command: Option<&Command>, state: ConversationState) -> H {
        let Some(command) = command else {
            return self.fallback;
        };
        self.routes
            .iter()
            .find(|r| r.predicate.accepts(state) && r.tokens.iter().any(|t| *t == command.token))
            .map(|r| r.handler)
            .unwrap_or(self.fallback)
    }
}

impl Router<Action> {
    /// The bot's command table.
    ///
    /// Every route accepts any state. Poll commands all land on
    /// [`Action::Poll`] and the poll state is resolved by
    /// [`crate::bot::poll::transition`].
    pub fn standard() -> Self {
        Router::new(Action::Fallback)
            .route(&["start", "help", "помощь"], StatePredicate::Any, Action::Start)
            .route(&["п", "погода"], StatePredicate::Any, Action::Weather)
            .route(&["к", "курс"], StatePredicate::Any, Action::Currency)
            .route(&["картинка"], StatePredicate::Any, Action::Image)
            .route(&["p", "опрос"], StatePredicate::Any, Action::Poll)
    }
}
