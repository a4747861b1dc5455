use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InputFile, UserId};

use crate::api::{ApiError, Apis};
use crate::bot::commands::Action;
use crate::bot::messages;
use crate::bot::poll::{self, PollEvent, PollReply};
use crate::bot::session::{ConversationState, Poll};
use crate::bot::AppState;

const DEFAULT_CITY: &str = "Moscow";
const DEFAULT_FROM: &str = "RUB";
const DEFAULT_TO: &str = "USD";
const DEFAULT_AMOUNT: &str = "100";
const IMAGE_QUERY: &str = "cats";

/// What to send back for one incoming message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Photo(String),
    Poll(Poll),
    /// Nothing worth saying, e.g. an unexpected upstream payload.
    Silent,
}

impl Reply {
    fn failure(err: &ApiError) -> Self {
        tracing::warn!("Upstream call failed: {}", err);
        match err.reply_text() {
            "" => Self::Silent,
            text => Self::Text(text.to_string()),
        }
    }
}

/// Teloxide endpoint for every text message.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(text) = msg.text() else {
        // Stickers, photos and the like carry no command.
        return Ok(());
    };
    let user_id = session_key(msg.from.as_ref().map(|u| u.id), msg.chat.id);

    let reply = respond(&state, user_id, text).await;

    if let Err(e) = send_reply(&bot, msg.chat.id, reply).await {
        tracing::error!("Failed to reply to user {}: {}", user_id, e);
    }
    Ok(())
}

/// Sessions follow the sender. Messages without one (anonymous group admins)
/// share their chat's session; chat ids of groups are negative, so they never
/// collide with a user id.
fn session_key(sender: Option<UserId>, chat_id: ChatId) -> i64 {
    sender.map(|id| id.0 as i64).unwrap_or(chat_id.0)
}

/// Route one message and run its handler.
///
/// The user's session stays locked until the reply is built, so a second
/// command from the same user waits for the first to finish.
pub async fn respond(state: &AppState, user_id: i64, text: &str) -> Reply {
    let session = state.sessions.session(user_id).await;
    let mut session = session.lock().await;

    let command = state.parser.parse(text);
    let action = state.router.resolve(command.as_ref(), session.state);
    tracing::info!(
        "User {} sent {:?} in state {}, handler {:?}",
        user_id,
        command.as_ref().map(|c| c.token.as_str()),
        session.state,
        action
    );

    let args = command.as_ref().and_then(|c| c.args.as_deref());
    match action {
        Action::Start => Reply::Text(messages::HELP.to_string()),
        Action::Weather => weather(&state.apis, args).await,
        Action::Currency => currency(&state.apis, args).await,
        Action::Image => image(&state.apis).await,
        Action::Poll => match poll::apply(&mut session, PollEvent::parse(args)) {
            PollReply::Text(text) => Reply::Text(text.to_string()),
            PollReply::Send(poll) => Reply::Poll(poll),
        },
        Action::Fallback => {
            session.state = ConversationState::Default;
            Reply::Text(messages::UNKNOWN_COMMAND.to_string())
        }
    }
}

async fn weather(apis: &Apis, args: Option<&str>) -> Reply {
    let city = args.unwrap_or(DEFAULT_CITY);
    match apis.weather.current(city).await {
        Ok(report) => Reply::Text(messages::weather(&report)),
        Err(e) => Reply::failure(&e),
    }
}

async fn currency(apis: &Apis, args: Option<&str>) -> Reply {
    let mut parts = args.unwrap_or_default().split_whitespace();
    let from = parts.next().unwrap_or(DEFAULT_FROM);
    let to = parts.next().unwrap_or(DEFAULT_TO);
    let amount = parts.next().unwrap_or(DEFAULT_AMOUNT);

    match apis.currency.convert(from, to, amount).await {
        Ok(result) => Reply::Text(messages::conversion(amount, from, result, to)),
        Err(e) => Reply::failure(&e),
    }
}

async fn image(apis: &Apis) -> Reply {
    match apis.images.first_photo(IMAGE_QUERY).await {
        Ok(url) => Reply::Photo(url),
        Err(e) => Reply::failure(&e),
    }
}

async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: Reply,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match reply {
        Reply::Text(text) => {
            bot.send_message(chat_id, text)
                .reply_markup(messages::menu())
                .await?;
        }
        Reply::Photo(url) => {
            let url = reqwest::Url::parse(&url)?;
            bot.send_photo(chat_id, InputFile::url(url))
                .reply_markup(messages::menu())
                .await?;
        }
        Reply::Poll(poll) => {
            bot.send_poll(chat_id, poll.question, poll.options)
                .is_anonymous(false)
                .reply_markup(messages::menu())
                .await?;
        }
        Reply::Silent => {
            tracing::debug!("Nothing to send to chat {}", chat_id);
        }
    }
    Ok(())
}
