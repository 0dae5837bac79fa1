//! Text helpers for Telegram HTML parse mode.

use chrono::NaiveDate;

use crate::domain::Pet;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Single-line preview of an entry body for list buttons.
pub fn preview(body: &str, max_len: usize) -> String {
    let one_line = body.trim().replace('\n', " ");
    if one_line.chars().count() <= max_len {
        return one_line;
    }
    let cut: String = one_line.chars().take(max_len.saturating_sub(3)).collect();
    format!("{cut}...")
}

/// Pet card text: name, species, rough age in whole years.
pub fn pet_card(pet: &Pet, today: NaiveDate) -> String {
    let age_line = match pet.birth_date {
        Some(birth) => {
            let years = today.years_since(birth).unwrap_or(0);
            format!("Age: ~{years} y.")
        }
        None => "Age not set.".to_string(),
    };
    let breed_line = match &pet.breed {
        Some(b) => format!("Breed: {}\n", escape_html(b)),
        None => String::new(),
    };

    format!(
        "{} <b>{}</b>\nSpecies: {}\n{breed_line}{age_line}",
        pet.species.icon(),
        escape_html(&pet.name),
        pet.species.label(),
    )
}
