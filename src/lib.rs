//! Gestão agent client
//!
//! Talks to the `agentAPI` cloud function of the gestão management backend:
//! every call posts a `{userId, action, data, token}` envelope and returns
//! the JSON envelope the function answers with.
//!
//! # Features
//!
//! - **Dispatcher**: one POST per action, errors surfaced as [`Error`]
//! - **Actions**: `get_sales`, `create_sale`, `get_clients`, `get_dashboard`,
//!   plus pass-through for any other action name
//! - **Sales analysis**: revenue, average ticket, top products and a
//!   performance reading over `get_sales`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod transport;

pub use client::AgentClient;
pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging. Logs are written to stderr.
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
