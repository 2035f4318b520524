//! Slash commands. Each `#[poise::command]` wrapper defers to a `handle_*`
//! function that only needs [`crate::AppVars`].

pub mod matches;
pub mod meta;
