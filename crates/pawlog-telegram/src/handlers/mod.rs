//! Telegram update handlers.
//!
//! Both entry points grab the per-chat lock before touching dialog state, so
//! a chat's updates are applied strictly in order even when Telegram delivers
//! them concurrently.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

mod callback;
mod commands;
mod flows;
mod media;
mod text;

use crate::router::AppState;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let Some(chat_id) = q.message.as_ref().map(|m| m.chat.id.0) else {
        let _ = bot.answer_callback_query(q.id.clone()).await;
        return Ok(());
    };

    let _guard = state.chat_locks.lock_chat(chat_id).await;
    callback::handle_callback(bot, q, &state).await
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    // Only private chats keep a diary; group noise is ignored.
    if !msg.chat.is_private() {
        return Ok(());
    }

    let chat_id = msg.chat.id.0;
    let _guard = state.chat_locks.lock_chat(chat_id).await;

    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(bot, msg, &state).await;
        }
        return text::handle_text(bot, msg, &state).await;
    }

    if msg.photo().is_some() || msg.document().is_some() {
        return media::handle_media(bot, msg, &state).await;
    }

    bot.send_message(
        msg.chat.id,
        "I can work with text, photos and documents. See /help.",
    )
    .await?;
    Ok(())
}
