//! fintrack records expenses and debts in a Google spreadsheet and derives dashboard views from
//! them. The `ledger` is the core; `server` exposes it over HTTP and `commands` from the CLI.

pub mod aggregate;
pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod server;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use config::{Config, Credentials};
pub use error::{Error, Result};
