use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
};

use pawlog_core::dialog::{Dialog, EntryInput, PetInput};
use pawlog_core::domain::{
    AttachmentId, AttachmentKind, ChatId as OwnerId, EntryId, PetId,
};
use pawlog_core::formatting::escape_html;
use pawlog_core::summary::SummaryRequest;

use super::flows;
use crate::keyboards;
use crate::router::AppState;

pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: &AppState) -> ResponseResult<()> {
    // Acknowledge immediately so the button stops spinning whatever happens.
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(chat) = q.message.as_ref().map(|m| m.chat.id) else {
        return Ok(());
    };
    let data = q.data.unwrap_or_default();
    let parts: Vec<&str> = data.split(':').collect();

    match parts.as_slice() {
        ["pets", "list"] => flows::show_pets(&bot, chat, state).await,
        ["pets", "add"] => flows::start_add_pet(&bot, chat, state).await,

        ["pet", "show", id] => match id.parse::<i64>() {
            Ok(id) => flows::show_pet_card(&bot, chat, state, PetId(id)).await,
            Err(_) => Ok(()),
        },
        ["pet", "activate", id] => activate_pet(&bot, chat, state, id).await,
        ["pet", "delete", id] => confirm_delete(&bot, chat, state, id).await,
        ["pet", "delete_yes", id] => delete_pet(&bot, chat, state, id).await,

        ["dialog", "cancel"] => cancel_dialog(&bot, chat, state).await,

        ["species", slug] => drive_pet(&bot, chat, state, PetInput::Species(slug)).await,
        ["breed", "skip"] => drive_pet(&bot, chat, state, PetInput::SkipBreed).await,

        ["entry", "cat", slug] => drive_entry(&bot, chat, state, EntryInput::Category(slug)).await,
        ["entry", "date", "today"] => drive_entry(&bot, chat, state, EntryInput::DateToday).await,
        ["entry", "date", "yesterday"] => {
            drive_entry(&bot, chat, state, EntryInput::DateYesterday).await
        }
        ["entry", "done"] => drive_entry(&bot, chat, state, EntryInput::Done).await,
        ["entry", "show", id] => match id.parse::<i64>() {
            Ok(id) => show_entry(&bot, chat, state, EntryId(id)).await,
            Err(_) => Ok(()),
        },

        ["file", id] => match id.parse::<i64>() {
            Ok(id) => resend_attachment(&bot, chat, state, AttachmentId(id)).await,
            Err(_) => Ok(()),
        },

        ["summary", days] => match days.parse::<i64>() {
            Ok(days) if days > 0 => summary_for_period(&bot, chat, state, days).await,
            _ => Ok(()),
        },

        _ => {
            tracing::debug!(data, "unrecognized callback payload");
            Ok(())
        }
    }
}

async fn drive_pet(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    input: PetInput<'_>,
) -> ResponseResult<()> {
    match state.sessions.take(OwnerId(chat.0)).await {
        Some(Dialog::AddPet(dialog)) => {
            flows::drive_pet_dialog(bot, chat, state, dialog, input).await
        }
        Some(other) => {
            state.sessions.resume(OwnerId(chat.0), other).await;
            Ok(())
        }
        None => expired(bot, chat).await,
    }
}

async fn drive_entry(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    input: EntryInput<'_>,
) -> ResponseResult<()> {
    match state.sessions.take(OwnerId(chat.0)).await {
        Some(Dialog::NewEntry(dialog)) => {
            flows::drive_entry_dialog(bot, chat, state, dialog, input).await
        }
        Some(other) => {
            state.sessions.resume(OwnerId(chat.0), other).await;
            Ok(())
        }
        None => expired(bot, chat).await,
    }
}

async fn cancel_dialog(bot: &Bot, chat: ChatId, state: &AppState) -> ResponseResult<()> {
    let had_dialog = state.sessions.clear(OwnerId(chat.0)).await;
    let text = if had_dialog {
        "Cancelled. Nothing was saved."
    } else {
        "Nothing to cancel."
    };
    bot.send_message(chat, text)
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}

async fn expired(bot: &Bot, chat: ChatId) -> ResponseResult<()> {
    bot.send_message(chat, "That dialog has expired. Start again from the menu.")
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}

async fn activate_pet(bot: &Bot, chat: ChatId, state: &AppState, id: &str) -> ResponseResult<()> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(());
    };
    let owner = OwnerId(chat.0);

    if let Err(e) = state.store.set_active_pet(owner, PetId(id)).await {
        return flows::report_error(bot, chat, e).await;
    }

    match state.store.get_pet(owner, PetId(id)).await {
        Ok(pet) => {
            bot.send_message(
                chat,
                format!(
                    "{} <b>{}</b> is now your active pet.",
                    pet.species.icon(),
                    escape_html(&pet.name)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
            Ok(())
        }
        Err(e) => flows::report_error(bot, chat, e).await,
    }
}

async fn confirm_delete(bot: &Bot, chat: ChatId, state: &AppState, id: &str) -> ResponseResult<()> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(());
    };

    let pet = match state.store.get_pet(OwnerId(chat.0), PetId(id)).await {
        Ok(pet) => pet,
        Err(e) => return flows::report_error(bot, chat, e).await,
    };

    bot.send_message(
        chat,
        format!(
            "Delete {} <b>{}</b>? All diary entries and attachments go with it.",
            pet.species.icon(),
            escape_html(&pet.name)
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboards::confirm_delete(&pet))
    .await?;
    Ok(())
}

async fn delete_pet(bot: &Bot, chat: ChatId, state: &AppState, id: &str) -> ResponseResult<()> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(());
    };

    match state.store.delete_pet(OwnerId(chat.0), PetId(id)).await {
        Ok(true) => {
            bot.send_message(chat, "Deleted.").await?;
            flows::show_pets(bot, chat, state).await
        }
        Ok(false) => {
            bot.send_message(chat, "That pet is already gone.").await?;
            Ok(())
        }
        Err(e) => flows::report_error(bot, chat, e).await,
    }
}

async fn show_entry(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    entry_id: EntryId,
) -> ResponseResult<()> {
    let entry = match state.store.get_entry(OwnerId(chat.0), entry_id).await {
        Ok(entry) => entry,
        Err(e) => return flows::report_error(bot, chat, e).await,
    };
    let attachments = match state.store.attachments_for(entry.id).await {
        Ok(atts) => atts,
        Err(e) => return flows::report_error(bot, chat, e).await,
    };

    let text = format!(
        "{}\n<b>{}</b>\n\n{}",
        entry.category.label(),
        entry.occurred_on,
        escape_html(&entry.body)
    );

    let mut req = bot.send_message(chat, text).parse_mode(ParseMode::Html);
    if !attachments.is_empty() {
        req = req.reply_markup(keyboards::entry_attachments(&attachments));
    }
    req.await?;
    Ok(())
}

async fn resend_attachment(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    attachment_id: AttachmentId,
) -> ResponseResult<()> {
    let att = match state.store.get_attachment(OwnerId(chat.0), attachment_id).await {
        Ok(att) => att,
        Err(e) => return flows::report_error(bot, chat, e).await,
    };

    // The file never left Telegram; re-send it by its stored file id.
    match att.kind {
        AttachmentKind::Photo => {
            bot.send_photo(chat, InputFile::file_id(att.file_id)).await?;
        }
        AttachmentKind::Document => {
            bot.send_document(chat, InputFile::file_id(att.file_id))
                .await?;
        }
    }
    Ok(())
}

async fn summary_for_period(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    days: i64,
) -> ResponseResult<()> {
    let Some(pet) = flows::require_active_pet(bot, chat, state).await? else {
        return Ok(());
    };

    let req = SummaryRequest::last_days(pet.id, days, flows::today());
    flows::send_summary(bot, chat, state, req).await
}
