//! Inline and reply keyboards. Callback data is `{scope}:{action}[:{id}]`,
//! parsed back in the callback handler.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use pawlog_core::domain::{Attachment, DiaryEntry, EntryCategory, Pet, PetId, Species};
use pawlog_core::formatting::preview;
use pawlog_core::summary::SUMMARY_PERIODS;

pub const MENU_PETS: &str = "🐾 Pets";
pub const MENU_NEW_ENTRY: &str = "✏️ New entry";
pub const MENU_HISTORY: &str = "🕓 History";
pub const MENU_SUMMARY: &str = "📊 Summary";

/// Persistent reply keyboard shown after /start.
pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(MENU_PETS),
            KeyboardButton::new(MENU_NEW_ENTRY),
        ],
        vec![
            KeyboardButton::new(MENU_HISTORY),
            KeyboardButton::new(MENU_SUMMARY),
        ],
    ])
    .resize_keyboard(true)
}

/// One button per pet (the active one starred), plus an add button.
pub fn pets_list(pets: &[Pet], active: Option<PetId>) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = pets
        .iter()
        .map(|p| {
            let star = if active == Some(p.id) { " ⭐" } else { "" };
            vec![InlineKeyboardButton::callback(
                format!("{} {}{star}", p.species.icon(), p.name),
                format!("pet:show:{}", p.id.0),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "➕ Add pet",
        "pets:add",
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn pet_card(pet: &Pet, is_active: bool) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    if !is_active {
        rows.push(vec![InlineKeyboardButton::callback(
            "✅ Make active",
            format!("pet:activate:{}", pet.id.0),
        )]);
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "🗑 Delete",
        format!("pet:delete:{}", pet.id.0),
    )]);
    rows.push(vec![InlineKeyboardButton::callback(
        "« Back to pets",
        "pets:list",
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn confirm_delete(pet: &Pet) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Yes, delete", format!("pet:delete_yes:{}", pet.id.0)),
        InlineKeyboardButton::callback("Cancel", format!("pet:show:{}", pet.id.0)),
    ]])
}

/// Every dialog keyboard carries this row so an open dialog can always be
/// abandoned by button as well as by /cancel.
fn cancel_row() -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::callback("✖️ Cancel", "dialog:cancel")]
}

pub fn species() -> InlineKeyboardMarkup {
    let row = [Species::Cat, Species::Dog, Species::Other]
        .iter()
        .map(|s| InlineKeyboardButton::callback(s.label(), format!("species:{}", s.as_str())))
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(vec![row, cancel_row()])
}

pub fn skip_breed() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("Skip", "breed:skip")],
        cancel_row(),
    ])
}

/// Category picker for the entry dialog, one category per row.
pub fn categories() -> InlineKeyboardMarkup {
    let mut rows = EntryCategory::ALL
        .iter()
        .map(|c| {
            vec![InlineKeyboardButton::callback(
                c.label(),
                format!("entry:cat:{}", c.as_str()),
            )]
        })
        .collect::<Vec<_>>();
    rows.push(cancel_row());
    InlineKeyboardMarkup::new(rows)
}

pub fn entry_date() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("Today", "entry:date:today"),
            InlineKeyboardButton::callback("Yesterday", "entry:date:yesterday"),
        ],
        cancel_row(),
    ])
}

pub fn attachments_done() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("✔️ Done", "entry:done")],
        cancel_row(),
    ])
}

/// History list: one button per entry, newest first.
pub fn history(entries: &[DiaryEntry]) -> InlineKeyboardMarkup {
    let rows = entries
        .iter()
        .map(|e| {
            vec![InlineKeyboardButton::callback(
                format!(
                    "{} {} {}",
                    e.occurred_on,
                    e.category.icon(),
                    preview(&e.body, 24)
                ),
                format!("entry:show:{}", e.id.0),
            )]
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

pub fn entry_attachments(attachments: &[Attachment]) -> InlineKeyboardMarkup {
    let rows = attachments
        .iter()
        .enumerate()
        .map(|(i, a)| {
            vec![InlineKeyboardButton::callback(
                format!("📎 Attachment {}", i + 1),
                format!("file:{}", a.id.0),
            )]
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

pub fn summary_periods() -> InlineKeyboardMarkup {
    let row = SUMMARY_PERIODS
        .iter()
        .map(|d| InlineKeyboardButton::callback(format!("{d} days"), format!("summary:{d}")))
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(vec![row])
}
