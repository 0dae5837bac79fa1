use chrono::NaiveDate;
use teloxide::{prelude::*, types::ParseMode};

use pawlog_core::domain::{ChatId as OwnerId, EntryCategory};
use pawlog_core::summary::SummaryRequest;

use super::flows;
use crate::keyboards;
use crate::router::AppState;

const HELP_TEXT: &str = "\
<b>Pet health diary</b>\n\
\n\
/pets — your pets (add, activate, delete)\n\
/addpet — register a new pet\n\
/newentry — add a diary entry for the active pet\n\
/history — recent entries\n\
/summary — summary over a period\n\
   <code>/summary 30</code>, <code>/summary 30 visit</code>\n\
   or <code>/summary 2026-01-01 2026-03-31</code>\n\
/cancel — abort the current dialog";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Summary range bounds only need to be well-formed dates; any range with
/// start on or before end is queryable, including future windows.
fn parse_summary_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub async fn handle_command(bot: Bot, msg: Message, state: &AppState) -> ResponseResult<()> {
    let chat = msg.chat.id;
    let text = msg.text().unwrap_or("");
    let (cmd, args) = parse_command(text);

    match cmd.as_str() {
        "start" => {
            if let Err(e) = state.store.ensure_chat(OwnerId(chat.0)).await {
                return flows::report_error(&bot, chat, e).await;
            }
            bot.send_message(
                chat,
                "Hi! I keep a health diary for your pets: symptoms, vet visits, \
                 vaccinations and medication. Start by adding a pet.",
            )
            .reply_markup(keyboards::main_menu())
            .await?;
        }

        "help" => {
            bot.send_message(chat, HELP_TEXT)
                .parse_mode(ParseMode::Html)
                .await?;
        }

        "cancel" => {
            let had_dialog = state.sessions.clear(OwnerId(chat.0)).await;
            let reply = if had_dialog {
                "Cancelled. Nothing was saved."
            } else {
                "Nothing to cancel."
            };
            bot.send_message(chat, reply)
                .reply_markup(keyboards::main_menu())
                .await?;
        }

        "pets" => flows::show_pets(&bot, chat, state).await?,
        "addpet" => flows::start_add_pet(&bot, chat, state).await?,
        "newentry" => flows::start_new_entry(&bot, chat, state).await?,
        "history" => flows::show_history(&bot, chat, state).await?,
        "summary" => handle_summary_command(&bot, chat, state, &args).await?,

        _ => {
            bot.send_message(chat, "Unknown command. See /help.").await?;
        }
    }

    Ok(())
}

/// `/summary` arguments: nothing (show the period keyboard), `<days>`,
/// `<days> <category>`, `<start> <end>` or `<start> <end> <category>`.
async fn handle_summary_command(
    bot: &Bot,
    chat: ChatId,
    state: &AppState,
    args: &str,
) -> ResponseResult<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.is_empty() {
        return flows::prompt_summary_period(bot, chat, state).await;
    }

    let Some(pet) = flows::require_active_pet(bot, chat, state).await? else {
        return Ok(());
    };
    let today = flows::today();

    // `<days> [category]`
    if let Ok(days) = parts[0].parse::<i64>() {
        if days <= 0 {
            bot.send_message(chat, "The number of days must be positive.")
                .await?;
            return Ok(());
        }
        let mut req = SummaryRequest::last_days(pet.id, days, today);
        if let Some(cat) = parts.get(1) {
            match EntryCategory::parse(cat) {
                Some(c) => req.category = Some(c),
                None => {
                    bot.send_message(chat, format!("Unknown category: {cat}. See /help."))
                        .await?;
                    return Ok(());
                }
            }
        }
        return flows::send_summary(bot, chat, state, req).await;
    }

    // `<start> <end> [category]`
    if parts.len() < 2 {
        bot.send_message(
            chat,
            "Usage: /summary <days> or /summary <start> <end>, dates as YYYY-MM-DD.",
        )
        .await?;
        return Ok(());
    }

    let (Some(start), Some(end)) = (parse_summary_date(parts[0]), parse_summary_date(parts[1]))
    else {
        bot.send_message(
            chat,
            "Could not read those dates. Use YYYY-MM-DD, for example 2026-08-01.",
        )
        .await?;
        return Ok(());
    };

    let mut req = SummaryRequest {
        pet_id: pet.id,
        start,
        end,
        category: None,
    };
    if let Some(cat) = parts.get(2) {
        match EntryCategory::parse(cat) {
            Some(c) => req.category = Some(c),
            None => {
                bot.send_message(chat, format!("Unknown category: {cat}. See /help."))
                    .await?;
                return Ok(());
            }
        }
    }

    flows::send_summary(bot, chat, state, req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parsing_strips_bot_mention_and_splits_args() {
        assert_eq!(
            parse_command("/summary@pawlog_bot 30 visit"),
            ("summary".to_string(), "30 visit".to_string())
        );
        assert_eq!(parse_command("/start"), ("start".to_string(), String::new()));
        assert_eq!(
            parse_command("  /HELP  "),
            ("help".to_string(), String::new())
        );
    }

    #[test]
    fn summary_dates_accept_future_windows() {
        // The backdate window for diary entries must not apply here; a
        // future end date is a legal summary bound.
        assert_eq!(
            parse_summary_date("2026-12-31"),
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
        assert_eq!(
            parse_summary_date(" 1899-01-01 "),
            NaiveDate::from_ymd_opt(1899, 1, 1)
        );
        assert_eq!(parse_summary_date("31.12.2026"), None);
        assert_eq!(parse_summary_date("soon"), None);
    }
}
