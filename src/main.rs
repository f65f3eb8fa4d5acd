//! Gestão agent - command-line client for the `agentAPI` cloud function

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error};

use gestao_agent::{
    AgentClient, Error, Result,
    analysis::SalesAnalysis,
    cli::{Cli, Command},
    config::Config,
    protocol::{Action, NewSale, PaymentMethod, Product},
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            eprintln!("❌ {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let command = cli.command.unwrap_or(Command::Demo);
    match run(command, &config, &mut io::stdout()).await {
        Ok(code) => code,
        Err(e) => fail(&e),
    }
}

/// Execute one subcommand, writing its output to `out`
async fn run<W: Write>(command: Command, config: &Config, out: &mut W) -> Result<ExitCode> {
    match command {
        // Printing the configuration must work before a user id is set
        Command::Config => write_yaml(out, &config.redacted())?,
        Command::Sales => write_json(out, &connect(config)?.get_sales().await?)?,
        Command::Clients => write_json(out, &connect(config)?.get_clients().await?)?,
        Command::Dashboard => write_json(out, &connect(config)?.get_dashboard().await?)?,
        Command::CreateSale {
            client_name,
            products,
            payment_method,
            total,
        } => {
            let mut sale = NewSale::from_products(client_name, products, payment_method);
            if let Some(total) = total {
                sale.total = total;
            }
            write_json(out, &connect(config)?.create_sale(&sale).await?)?;
        }
        Command::Call { action, data } => {
            let envelope = connect(config)?
                .dispatch(&Action::from(action.as_str()), data.as_ref())
                .await?;
            write_json(out, &envelope)?;
        }
        Command::Analyze => {
            let analysis = connect(config)?.analyze_sales_performance().await?;
            write_json(out, &analysis)?;
            // An unavailable analysis is printed but still fails the command
            if let SalesAnalysis::Unavailable { .. } = analysis {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Demo => run_demo(&connect(config)?, out).await?,
    }
    Ok(ExitCode::SUCCESS)
}

fn connect(config: &Config) -> Result<AgentClient> {
    let client = AgentClient::from_config(config)?;
    debug!(user_id = client.user_id(), "Client ready");
    Ok(client)
}

/// Load the configuration and apply CLI overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ref user_id) = cli.user_id {
        config.agent.user_id.clone_from(user_id);
    }
    if let Some(ref token) = cli.token {
        config.agent.token = Some(token.clone());
    }
    if let Some(ref base_url) = cli.base_url {
        config.endpoint.base_url.clone_from(base_url);
    }
    Ok(config)
}

/// Walk through the typical agent session: list, create, analyze
async fn run_demo<W: Write>(client: &AgentClient, out: &mut W) -> Result<()> {
    writeln!(out, "=== VENDAS ===")?;
    write_json(out, &client.get_sales().await?)?;

    writeln!(out, "\n=== CRIAR VENDA ===")?;
    let sale = NewSale::from_products(
        "Cliente Agente",
        vec![Product::new("Produto Agente", 25.99, 1)],
        PaymentMethod::Pix,
    );
    write_json(out, &client.create_sale(&sale).await?)?;

    writeln!(out, "\n=== ANÁLISE DE PERFORMANCE ===")?;
    write_json(out, &client.analyze_sales_performance().await?)?;
    Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn write_yaml<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value).map_err(|e| Error::Config(e.to_string()))?;
    out.write_all(yaml.as_bytes())?;
    Ok(())
}

fn fail(e: &Error) -> ExitCode {
    error!("{e}");
    eprintln!("❌ Erro: {e}");
    ExitCode::from(e.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestao_agent::config::DEFAULT_BASE_URL;
    use serde_json::json;

    /// Writer whose every write fails, like a closed stdout pipe
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_json_is_pretty_with_trailing_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &json!({"success": true})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"success\": true\n}\n");
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let err = write_json(&mut ClosedPipe, &json!({"success": true})).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.exit_code(), 74);

        let err = write_yaml(&mut ClosedPipe, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_config_command_needs_no_user_id() {
        let mut config = Config::default();
        config.agent.token = Some("secret".to_string());

        let mut out = Vec::new();
        let code = run(Command::Config, &config, &mut out).await.unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains(DEFAULT_BASE_URL));
        assert!(printed.contains("***"));
        assert!(!printed.contains("secret"));
    }

    #[tokio::test]
    async fn test_client_commands_require_user_id() {
        let mut out = Vec::new();
        let err = run(Command::Sales, &Config::default(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_config_command_reports_closed_output() {
        let err = run(Command::Config, &Config::default(), &mut ClosedPipe)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
