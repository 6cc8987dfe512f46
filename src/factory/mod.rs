//! Factory floor metrics back-end.
//!
//! ## Overview
//!
//! A CSV export of per-machine, per-batch production records is loaded once
//! at startup. Every request recomputes its view from that table: global
//! means, a per-day time series, line status for the latest date, and a few
//! column summaries. With no dataset the same endpoints serve placeholder
//! values, tagged as synthetic.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────────┐
//! │  Client  │ ───────> │  server.rs  (axum Router, ServerConfig)          │
//! │  (React) │ <─────── │    └─ api.rs  (route handlers, AppState)         │
//! └──────────┘          │         │                                        │
//!                       │         ├── store.rs  (DataStore, Sourced<T>)    │
//!                       │         │      ├─ aggregate.rs  (means, series)  │
//!                       │         │      ├─ status.rs     (line health)    │
//!                       │         │      └─ fallback.rs   (placeholders)   │
//!                       │         │                                        │
//!                       │         └── bot.rs  (keyword intents, Bot)       │
//!                       │                └─ HttpAnswerProvider (optional)  │
//!                       └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Supporting Modules
//!
//! | Module   | Responsibility                                          |
//! |----------|---------------------------------------------------------|
//! | `models` | `Row`, `Table`, `Sourced<T>`, wire types                |
//! | `loader` | CSV → `Table`; any failure yields an empty table         |

pub mod aggregate;
pub mod api;
pub mod bot;
pub mod fallback;
pub mod loader;
pub mod models;
pub mod server;
pub mod status;
pub mod store;

#[cfg(test)]
mod fixtures;
