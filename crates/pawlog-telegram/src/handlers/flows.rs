//! Shared handler flows: the pieces reached from commands, menu buttons and
//! callbacks alike. Commands and callbacks converge here so both entry points
//! behave identically.

use chrono::NaiveDate;
use teloxide::{prelude::*, types::ParseMode};

use pawlog_core::dialog::{
    Dialog, EntryDialog, EntryInput, EntryOutcome, EntryStep, PetDialog, PetInput, PetOutcome,
};
use pawlog_core::domain::{ChatId as OwnerId, NewPet, Pet, PetId};
use pawlog_core::formatting::{escape_html, pet_card};
use pawlog_core::summary::{render_summary, SummaryRequest};
use pawlog_core::Error;

use crate::keyboards;
use crate::router::AppState;

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Map a store failure to a user-facing reply. Validation and range errors
/// carry their own message; everything else gets a generic one plus a log
/// line with the details.
pub async fn report_error(bot: &Bot, chat: ChatId, err: Error) -> ResponseResult<()> {
    let text = match &err {
        Error::Validation(m) => m.clone(),
        Error::InvalidRange { .. } => {
            "The start date must not be after the end date.".to_string()
        }
        Error::NotFound(_) => "That item no longer exists.".to_string(),
        _ => {
            tracing::error!(error = %err, chat_id = chat.0, "handler failed");
            "Something went wrong, please try again.".to_string()
        }
    };
    bot.send_message(chat, text).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

pub async fn show_pets(bot: &Bot, chat: ChatId, state: &AppState) -> ResponseResult<()> {
    let owner = OwnerId(chat.0);
    let pets = match state.store.list_pets(owner).await {
        Ok(pets) => pets,
        Err(e) => return report_error(bot, chat, e).await,
    };
    let active = match state.store.active_pet(owner).await {
        Ok(active) => active.map(|p| p.id),
        Err(e) => return report_error(bot, chat, e).await,
    };

    let text = if pets.is_empty() {
        "You don't have any pets yet. Add one to get started."
    } else {
        "Your pets:"
    };

    bot.send_message(chat, text)
        .reply_markup(keyboards::pets_list(&pets, active))
        .await?;
    Ok(())
}

pub async fn show_pet_card(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    pet_id: PetId,
) -> ResponseResult<()> {
    let owner = OwnerId(chat.0);
    let pet = match state.store.get_pet(owner, pet_id).await {
        Ok(pet) => pet,
        Err(e) => return report_error(bot, chat, e).await,
    };
    let is_active = match state.store.active_pet(owner).await {
        Ok(active) => active.map(|p| p.id == pet.id).unwrap_or(false),
        Err(e) => return report_error(bot, chat, e).await,
    };

    bot.send_message(chat, pet_card(&pet, today()))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::pet_card(&pet, is_active))
        .await?;
    Ok(())
}

pub async fn start_add_pet(bot: &Bot, chat: ChatId, state: &AppState) -> ResponseResult<()> {
    state
        .sessions
        .begin(OwnerId(chat.0), Dialog::AddPet(PetDialog::AwaitingName))
        .await;
    bot.send_message(chat, "What's your pet's name?").await?;
    Ok(())
}

/// Advance the add-pet dialog by one input and send the next prompt.
pub async fn drive_pet_dialog(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    dialog: PetDialog,
    input: PetInput<'_>,
) -> ResponseResult<()> {
    let owner = OwnerId(chat.0);

    match dialog.apply(input) {
        PetOutcome::Continue(next) => {
            let (text, kb) = match &next {
                PetDialog::AwaitingSpecies { .. } => ("Pick a species:", keyboards::species()),
                PetDialog::AwaitingBreed { .. } => {
                    ("What breed? You can skip this.", keyboards::skip_breed())
                }
                // Continue never lands back on the name step.
                PetDialog::AwaitingName => {
                    ("What's your pet's name?", keyboards::skip_breed())
                }
            };
            state.sessions.resume(owner, Dialog::AddPet(next)).await;
            bot.send_message(chat, text).reply_markup(kb).await?;
        }
        PetOutcome::Invalid(same, msg) => {
            state.sessions.resume(owner, Dialog::AddPet(same)).await;
            bot.send_message(chat, msg).await?;
        }
        PetOutcome::Create {
            name,
            species,
            breed,
        } => {
            let created = state
                .store
                .create_pet(NewPet {
                    owner_chat_id: owner,
                    name,
                    species,
                    breed,
                    birth_date: None,
                })
                .await;
            let pet = match created {
                Ok(pet) => pet,
                Err(e) => return report_error(bot, chat, e).await,
            };

            bot.send_message(
                chat,
                format!(
                    "Added {} <b>{}</b>! Open it under {} to make it active.",
                    pet.species.icon(),
                    escape_html(&pet.name),
                    keyboards::MENU_PETS
                ),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboards::main_menu())
            .await?;
        }
    }
    Ok(())
}

/// The chat's active pet, or a prompt telling the user to pick/add one.
pub(super) async fn require_active_pet(bot: &Bot, chat: ChatId, state: &AppState) -> ResponseResult<Option<Pet>> {
    match state.store.active_pet(OwnerId(chat.0)).await {
        Ok(Some(pet)) => Ok(Some(pet)),
        Ok(None) => {
            let pets = state
                .store
                .list_pets(OwnerId(chat.0))
                .await
                .unwrap_or_default();
            let text = if pets.is_empty() {
                "You don't have any pets yet. Add one first."
            } else {
                "Pick a pet to work with first:"
            };
            bot.send_message(chat, text)
                .reply_markup(keyboards::pets_list(&pets, None))
                .await?;
            Ok(None)
        }
        Err(e) => {
            report_error(bot, chat, e).await?;
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Entry dialog
// ---------------------------------------------------------------------------

pub async fn start_new_entry(bot: &Bot, chat: ChatId, state: &AppState) -> ResponseResult<()> {
    let Some(pet) = require_active_pet(bot, chat, state).await? else {
        return Ok(());
    };

    state
        .sessions
        .begin(OwnerId(chat.0), Dialog::NewEntry(EntryDialog::new(pet.id)))
        .await;
    bot.send_message(
        chat,
        format!(
            "New entry for {} <b>{}</b>. What kind of record is it?",
            pet.species.icon(),
            escape_html(&pet.name)
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboards::categories())
    .await?;
    Ok(())
}

/// Advance the entry dialog by one input: re-prompt on bad input, prompt for
/// the next step, or write the finished entry in one store call.
pub async fn drive_entry_dialog(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    dialog: EntryDialog,
    input: EntryInput<'_>,
) -> ResponseResult<()> {
    let owner = OwnerId(chat.0);

    match dialog.apply(input, today()) {
        EntryOutcome::Continue(next) => {
            let step = next.step();
            let attachment_count = next.attachment_count();
            state.sessions.resume(owner, Dialog::NewEntry(next)).await;

            match step {
                EntryStep::AwaitingBody => {
                    bot.send_message(chat, "Describe what happened.").await?;
                }
                EntryStep::AwaitingTimestamp => {
                    bot.send_message(
                        chat,
                        "When did this happen? Pick a date, type one as YYYY-MM-DD, \
                         or send \"skip\" for today.",
                    )
                    .reply_markup(keyboards::entry_date())
                    .await?;
                }
                EntryStep::AwaitingAttachments => {
                    let text = if attachment_count == 0 {
                        "Attach photos or documents if you like, then press Done.".to_string()
                    } else {
                        format!("Attached ({attachment_count}). Send more or press Done.")
                    };
                    bot.send_message(chat, text)
                        .reply_markup(keyboards::attachments_done())
                        .await?;
                }
                EntryStep::AwaitingCategory => {
                    bot.send_message(chat, "What kind of record is it?")
                        .reply_markup(keyboards::categories())
                        .await?;
                }
            }
        }
        EntryOutcome::Invalid(same, msg) => {
            state.sessions.resume(owner, Dialog::NewEntry(same)).await;
            bot.send_message(chat, msg).await?;
        }
        EntryOutcome::Commit(entry, attachments) => {
            let attachment_count = attachments.len();
            let saved = match state.store.create_entry(entry, attachments).await {
                Ok(saved) => saved,
                // Session is already gone (take removed it), so a failed
                // commit simply ends the dialog.
                Err(e) => return report_error(bot, chat, e).await,
            };

            let pet_name = state
                .store
                .get_pet(owner, saved.pet_id)
                .await
                .map(|p| p.name)
                .unwrap_or_else(|_| "your pet".to_string());

            let mut text = format!(
                "Saved: {} for <b>{}</b> on {}.",
                saved.category.label(),
                escape_html(&pet_name),
                saved.occurred_on
            );
            if attachment_count > 0 {
                text.push_str(&format!(" ({attachment_count} attachment(s))"));
            }
            bot.send_message(chat, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::main_menu())
                .await?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// History and summary
// ---------------------------------------------------------------------------

pub async fn show_history(bot: &Bot, chat: ChatId, state: &AppState) -> ResponseResult<()> {
    let Some(pet) = require_active_pet(bot, chat, state).await? else {
        return Ok(());
    };

    let entries = match state
        .store
        .recent_entries(pet.id, state.cfg.history_page_size)
        .await
    {
        Ok(entries) => entries,
        Err(e) => return report_error(bot, chat, e).await,
    };

    if entries.is_empty() {
        bot.send_message(
            chat,
            format!("No entries yet for <b>{}</b>.", escape_html(&pet.name)),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    bot.send_message(
        chat,
        format!(
            "Recent entries for {} <b>{}</b>:",
            pet.species.icon(),
            escape_html(&pet.name)
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboards::history(&entries))
    .await?;
    Ok(())
}

pub async fn send_summary(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    req: SummaryRequest,
) -> ResponseResult<()> {
    if let Err(e) = req.validate() {
        return report_error(bot, chat, e).await;
    }

    let pet = match state.store.get_pet(OwnerId(chat.0), req.pet_id).await {
        Ok(pet) => pet,
        Err(e) => return report_error(bot, chat, e).await,
    };

    let entries = match state
        .store
        .entries_in_range(req.pet_id, req.start, req.end, req.category)
        .await
    {
        Ok(entries) => entries,
        Err(e) => return report_error(bot, chat, e).await,
    };

    bot.send_message(chat, render_summary(&pet.name, &req, &entries))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub async fn prompt_summary_period(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
) -> ResponseResult<()> {
    let Some(pet) = require_active_pet(bot, chat, state).await? else {
        return Ok(());
    };

    bot.send_message(
        chat,
        format!(
            "Summary for {} <b>{}</b>. Which period?",
            pet.species.icon(),
            escape_html(&pet.name)
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboards::summary_periods())
    .await?;
    Ok(())
}
