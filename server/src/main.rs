#![warn(clippy::pedantic)]
// Gives warnings for every diesel::prelude::* import
#![allow(clippy::wildcard_imports)]
// Buggy
#![allow(clippy::iter_not_returning_iterator)]
// Too subjective
#![allow(clippy::similar_names, clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::match_bool)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::single_match_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::doc_markdown)]

mod api;
mod app;
mod config;
mod db;
mod error;
mod model;
mod query;
mod resource;
mod schema;
mod string;
#[cfg(test)]
mod test;
mod time;
mod update;

use crate::config::Config;
use crate::error::ErrorKind;

#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    let config = match Config::new() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Could not load configuration. Details:\n{err}");
            std::process::exit(1);
        }
    };
    app::enable_tracing(&config);

    let state = match app::initialize(config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(kind = err.kind(), "An error occurred during initialization. Details:\n{err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = app::run(state).await {
        tracing::error!("Server stopped unexpectedly. Details:\n{err}");
        std::process::exit(1);
    }
}
