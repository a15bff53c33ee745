//! Commuter-train schedule assistant.
//!
//! A chat dialogue that answers "when is the next suburban train from A to
//! B?", falls back to tomorrow when today is over, and remembers each user's
//! favorite routes across restarts.

pub mod cache;
pub mod config;
pub mod dialogue;
pub mod domain;
pub mod schedule;
pub mod stations;
pub mod store;
pub mod web;
pub mod yandex;
