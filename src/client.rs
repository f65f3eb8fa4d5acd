//! Agent client: one envelope per call to the `agentAPI` endpoint

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analysis::{SalesAnalysis, analyze_sales};
use crate::config::{Config, EndpointConfig};
use crate::protocol::{Action, NewSale, RequestEnvelope, ResponseEnvelope};
use crate::transport::{HttpTransport, Transport};
use crate::Result;

/// Client acting on behalf of one user
pub struct AgentClient {
    transport: Arc<dyn Transport>,
    user_id: String,
    token: Option<String>,
}

impl AgentClient {
    /// Client for the production endpoint
    pub fn new(user_id: impl Into<String>, token: Option<String>) -> Result<Self> {
        let transport = HttpTransport::new(EndpointConfig::default().url()?)?;
        Ok(Self::with_transport(Arc::new(transport), user_id, token))
    }

    /// Client built from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.endpoint.url()?)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.agent.user_id.clone(),
            config.agent.resolve_token(),
        ))
    }

    /// Client over an arbitrary transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        user_id: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            transport,
            user_id: user_id.into(),
            token,
        }
    }

    /// User the client acts for
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Send `action` with an optional payload and return the envelope as
    /// received. Exactly one request is made.
    pub async fn dispatch(
        &self,
        action: &Action,
        data: Option<&Value>,
    ) -> Result<ResponseEnvelope> {
        let envelope = RequestEnvelope {
            user_id: &self.user_id,
            action: action.as_str(),
            data,
            token: self.token.as_deref(),
        };

        debug!(
            %action,
            endpoint = self.transport.endpoint(),
            has_data = data.is_some(),
            has_token = self.token.is_some(),
            "Dispatching action"
        );

        match self.transport.send(&envelope).await {
            Ok(response) => {
                if !response.is_success() {
                    info!(
                        %action,
                        error = response.error_message().as_deref(),
                        "Endpoint reported failure"
                    );
                }
                Ok(response)
            }
            Err(e) => {
                warn!(%action, error = %e, "Dispatch failed");
                Err(e)
            }
        }
    }

    /// All sales of the user
    pub async fn get_sales(&self) -> Result<ResponseEnvelope> {
        self.dispatch(&Action::GetSales, None).await
    }

    /// Register a sale
    pub async fn create_sale(&self, sale: &NewSale) -> Result<ResponseEnvelope> {
        let data = serde_json::to_value(sale)?;
        self.dispatch(&Action::CreateSale, Some(&data)).await
    }

    /// Clients of the user
    pub async fn get_clients(&self) -> Result<ResponseEnvelope> {
        self.dispatch(&Action::GetClients, None).await
    }

    /// Dashboard summary
    pub async fn get_dashboard(&self) -> Result<ResponseEnvelope> {
        self.dispatch(&Action::GetDashboard, None).await
    }

    /// Fetch the sales and analyze them.
    ///
    /// A transport failure propagates and no analysis is attempted.
    pub async fn analyze_sales_performance(&self) -> Result<SalesAnalysis> {
        let envelope = self.get_sales().await?;
        analyze_sales(&envelope)
    }
}
