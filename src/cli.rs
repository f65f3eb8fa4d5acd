//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::protocol::{PaymentMethod, Product};

/// Agent client for the gestão cloud function API
#[derive(Parser, Debug)]
#[command(name = "gestao-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "GESTAO_AGENT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// User the agent acts for
    #[arg(short, long, env = "GESTAO_AGENT_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Token forwarded with every request (literal or `env:VAR_NAME`)
    #[arg(long, env = "GESTAO_AGENT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the cloud functions host
    #[arg(long, env = "GESTAO_AGENT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "warn",
        env = "GESTAO_AGENT_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "GESTAO_AGENT_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to the demo flow)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List sales (`get_sales`)
    Sales,

    /// List clients (`get_clients`)
    Clients,

    /// Show the dashboard summary (`get_dashboard`)
    Dashboard,

    /// Register a sale (`create_sale`)
    CreateSale {
        /// Client name
        #[arg(long, required = true)]
        client_name: String,

        /// Line item as NAME:PRICE:QUANTITY (repeatable)
        #[arg(short, long = "product", required = true, value_parser = parse_product)]
        products: Vec<Product>,

        /// Payment method (dinheiro, pix, fiado)
        #[arg(long, default_value = "dinheiro")]
        payment_method: PaymentMethod,

        /// Sale total (defaults to the sum of the line items)
        #[arg(long)]
        total: Option<f64>,
    },

    /// Fetch sales and print the performance analysis
    Analyze,

    /// Send an arbitrary action
    Call {
        /// Action name, e.g. `get_sales`
        #[arg(required = true)]
        action: String,

        /// JSON payload
        #[arg(short, long, value_parser = parse_json)]
        data: Option<Value>,
    },

    /// Fetch sales, create a sample sale, then analyze
    Demo,

    /// Print the effective configuration (YAML, token masked)
    Config,
}

/// Parse `NAME:PRICE:QUANTITY`. The name may itself contain `:`.
pub fn parse_product(raw: &str) -> Result<Product, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(quantity), Some(price), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected NAME:PRICE:QUANTITY, got '{raw}'"));
    };

    let name = name.trim();
    if name.is_empty() {
        return Err("product name must not be empty".to_string());
    }
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|e| format!("invalid price '{price}': {e}"))?;
    let quantity: i64 = quantity
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;

    Ok(Product::new(name, price, quantity))
}

/// Parse a JSON command-line argument
pub fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_product() {
        let product = parse_product("Café:8.5:3").unwrap();
        assert_eq!(product, Product::new("Café", 8.5, 3));

        let product = parse_product("Cabo USB:C:12.90:1").unwrap();
        assert_eq!(product.name.as_deref(), Some("Cabo USB:C"));
    }

    #[test]
    fn test_parse_product_rejects_malformed() {
        assert!(parse_product("Café:8.5").is_err());
        assert!(parse_product(":8.5:1").is_err());
        assert!(parse_product("Café:abc:1").is_err());
        assert!(parse_product("Café:8.5:1.5").is_err());
    }

    #[test]
    fn test_parse_create_sale() {
        let cli = Cli::try_parse_from([
            "gestao-agent",
            "--user-id",
            "u1",
            "create-sale",
            "--client-name",
            "Ana",
            "-p",
            "Pão:1.5:4",
            "--product",
            "Leite:5:1",
            "--payment-method",
            "pix",
        ])
        .unwrap();

        assert_eq!(cli.user_id.as_deref(), Some("u1"));
        match cli.command {
            Some(Command::CreateSale {
                client_name,
                products,
                payment_method,
                total,
            }) => {
                assert_eq!(client_name, "Ana");
                assert_eq!(products.len(), 2);
                assert_eq!(payment_method, PaymentMethod::Pix);
                assert!(total.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_call_with_data() {
        let cli =
            Cli::try_parse_from(["gestao-agent", "call", "get_stock", "--data", r#"{"limit":2}"#])
                .unwrap();
        match cli.command {
            Some(Command::Call { action, data }) => {
                assert_eq!(action, "get_stock");
                assert_eq!(data, Some(serde_json::json!({"limit": 2})));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_call_rejects_invalid_json() {
        let result = Cli::try_parse_from(["gestao-agent", "call", "x", "--data", "{nope"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["gestao-agent"]).unwrap();
        assert!(cli.command.is_none());
    }
}
