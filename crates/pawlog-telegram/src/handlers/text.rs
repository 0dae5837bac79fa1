use teloxide::prelude::*;

use pawlog_core::dialog::{Dialog, EntryInput, PetInput};
use pawlog_core::domain::ChatId as OwnerId;

use super::flows;
use crate::keyboards;
use crate::router::AppState;

pub async fn handle_text(bot: Bot, msg: Message, state: &AppState) -> ResponseResult<()> {
    let chat = msg.chat.id;
    let text = msg.text().unwrap_or("").trim();

    // Menu buttons look like plain text; they win over any open dialog.
    match text {
        keyboards::MENU_PETS => return flows::show_pets(&bot, chat, state).await,
        keyboards::MENU_NEW_ENTRY => return flows::start_new_entry(&bot, chat, state).await,
        keyboards::MENU_HISTORY => return flows::show_history(&bot, chat, state).await,
        keyboards::MENU_SUMMARY => return flows::prompt_summary_period(&bot, chat, state).await,
        _ => {}
    }

    match state.sessions.take(OwnerId(chat.0)).await {
        Some(Dialog::AddPet(dialog)) => {
            flows::drive_pet_dialog(&bot, chat, state, dialog, PetInput::Text(text)).await
        }
        Some(Dialog::NewEntry(dialog)) => {
            flows::drive_entry_dialog(&bot, chat, state, dialog, EntryInput::Text(text)).await
        }
        None => {
            bot.send_message(chat, "I didn't get that. Use the menu below or see /help.")
                .reply_markup(keyboards::main_menu())
                .await?;
            Ok(())
        }
    }
}
