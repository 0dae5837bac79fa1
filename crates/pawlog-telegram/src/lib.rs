//! Telegram adapter: long-polling dispatcher, keyboards and update handlers.
//!
//! All domain logic lives in `pawlog-core`; this crate only translates
//! Telegram updates into dialog inputs and store calls, and renders the
//! results back as HTML messages.

mod handlers;
pub mod keyboards;
pub mod router;

pub use router::{run_polling, AppState, ChatLocks};
