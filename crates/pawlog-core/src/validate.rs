//! Input validation for dialog fields.

use chrono::{Duration, NaiveDate};

use crate::{Error, Result};

pub const MAX_PET_NAME_LEN: usize = 64;
pub const MAX_BREED_LEN: usize = 64;
pub const MAX_ENTRY_BODY_LEN: usize = 2000;

/// Earliest accepted backdate for an entry.
const MIN_ENTRY_DATE: (i32, u32, u32) = (1900, 1, 1);

pub fn validate_pet_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("The name cannot be empty.".to_string()));
    }
    if name.chars().count() > MAX_PET_NAME_LEN {
        return Err(Error::Validation(format!(
            "The name is too long (max {MAX_PET_NAME_LEN} characters)."
        )));
    }
    if name.contains('<') || name.contains('>') {
        return Err(Error::Validation(
            "The name contains characters that are not allowed.".to_string(),
        ));
    }
    Ok(name.to_string())
}

pub fn validate_breed(breed: Option<&str>) -> Result<Option<String>> {
    let Some(breed) = breed.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if breed.chars().count() > MAX_BREED_LEN {
        return Err(Error::Validation(format!(
            "The breed is too long (max {MAX_BREED_LEN} characters)."
        )));
    }
    if breed.contains('<') || breed.contains('>') {
        return Err(Error::Validation(
            "The breed contains characters that are not allowed.".to_string(),
        ));
    }
    Ok(Some(breed.to_string()))
}

pub fn validate_entry_body(body: &str) -> Result<String> {
    let body = body.trim();
    if body.is_empty() {
        return Err(Error::Validation(
            "The entry text cannot be empty.".to_string(),
        ));
    }
    if body.chars().count() > MAX_ENTRY_BODY_LEN {
        return Err(Error::Validation(format!(
            "The entry text is too long (max {MAX_ENTRY_BODY_LEN} characters)."
        )));
    }
    Ok(body.to_string())
}

/// Parse a user-typed `YYYY-MM-DD` date.
///
/// Backdating is allowed down to 1900; dates more than one day past `today`
/// are rejected (one day of slack covers time-zone skew).
pub fn parse_entry_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        Error::Validation(
            "Could not read that date. Use YYYY-MM-DD, for example 2025-12-01.".to_string(),
        )
    })?;

    if date > today + Duration::days(1) {
        return Err(Error::Validation(
            "The date cannot be in the future.".to_string(),
        ));
    }

    let (y, m, d) = MIN_ENTRY_DATE;
    let min = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    if date < min {
        return Err(Error::Validation(
            "The date is too far in the past (1900 at the earliest).".to_string(),
        ));
    }

    Ok(date)
}
