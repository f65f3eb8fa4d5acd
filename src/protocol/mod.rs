//! Wire types for the `agentAPI` cloud function

mod messages;
mod types;

pub use messages::*;
pub use types::*;

/// Product name used when a sale line item carries none
pub const UNNAMED_PRODUCT: &str = "Produto sem nome";
