use teloxide::prelude::*;

use pawlog_core::dialog::{Dialog, EntryInput, EntryStep};
use pawlog_core::domain::{AttachmentKind, ChatId as OwnerId, NewAttachment};

use super::flows;
use crate::router::AppState;

/// Photos and documents only matter inside the attachments step of an entry
/// dialog; outside of it they get a hint.
pub async fn handle_media(bot: Bot, msg: Message, state: &AppState) -> ResponseResult<()> {
    let chat = msg.chat.id;

    let attachment = if let Some(photos) = msg.photo() {
        // Telegram sends several resolutions; the last one is the largest.
        photos.last().map(|p| NewAttachment {
            kind: AttachmentKind::Photo,
            file_id: p.file.id.clone(),
            file_unique_id: Some(p.file.unique_id.clone()),
        })
    } else {
        msg.document().map(|d| NewAttachment {
            kind: AttachmentKind::Document,
            file_id: d.file.id.clone(),
            file_unique_id: Some(d.file.unique_id.clone()),
        })
    };

    let Some(attachment) = attachment else {
        return Ok(());
    };

    match state.sessions.take(OwnerId(chat.0)).await {
        Some(Dialog::NewEntry(dialog)) if dialog.step() == EntryStep::AwaitingAttachments => {
            flows::drive_entry_dialog(&bot, chat, state, dialog, EntryInput::Attachment(attachment))
                .await
        }
        Some(dialog) => {
            // Wrong step or a different dialog: keep the session, explain.
            state.sessions.resume(OwnerId(chat.0), dialog).await;
            bot.send_message(
                chat,
                "I can only take files in the attachments step of a new entry.",
            )
            .await?;
            Ok(())
        }
        None => {
            bot.send_message(
                chat,
                "To store a file, start a new entry first and attach it there.",
            )
            .await?;
            Ok(())
        }
    }
}
