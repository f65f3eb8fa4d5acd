//! Sales performance analysis over a `get_sales` envelope
//!
//! Counts sales, sums revenue, ranks products by units sold and attaches a
//! performance tier plus a recommendation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::protocol::{ResponseEnvelope, Sale};

/// Average sale value above which performance is rated "boa"
pub const GOOD_AVERAGE_THRESHOLD: f64 = 50.0;

/// Maximum number of entries in [`SalesReport::top_products`]
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Message of [`SalesAnalysis::Unavailable`]
pub const UNAVAILABLE_MESSAGE: &str = "Não foi possível buscar dados de vendas";

/// Outcome of [`analyze_sales`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SalesAnalysis {
    /// Aggregates computed from the sales list
    Report(SalesReport),
    /// The service did not report success; nothing was computed
    Unavailable {
        /// Human-readable reason
        error: String,
    },
}

impl SalesAnalysis {
    /// The report, if one was computed
    #[must_use]
    pub fn report(&self) -> Option<&SalesReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Aggregated sales figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Number of sales
    pub total_sales: usize,
    /// Sum of sale totals
    pub total_revenue: f64,
    /// `total_revenue / total_sales`, 0 without sales
    pub average_sale_value: f64,
    /// Up to five `(name, units)` pairs, most units first
    pub top_products: Vec<(String, i64)>,
    /// Qualitative labels
    pub analysis: Assessment,
}

/// Qualitative reading of a [`SalesReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Performance tier
    pub performance: Performance,
    /// Suggested next step
    pub recommendation: Recommendation,
}

/// Performance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Performance {
    /// Average sale value above [`GOOD_AVERAGE_THRESHOLD`]
    Boa,
    /// Everything else
    Regular,
}

impl Performance {
    /// Tier for an average sale value. The threshold itself is "regular".
    #[must_use]
    pub fn from_average(average: f64) -> Self {
        if average > GOOD_AVERAGE_THRESHOLD {
            Self::Boa
        } else {
            Self::Regular
        }
    }
}

/// Recommendation attached to the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// At least one product sold
    #[serde(rename = "Foque nos produtos mais vendidos")]
    FocusOnBestSellers,
    /// No product ranking available
    #[serde(rename = "Diversifique o catálogo")]
    DiversifyCatalog,
}

/// Analyze a `get_sales` response envelope.
///
/// An envelope without `success: true` yields [`SalesAnalysis::Unavailable`].
/// A successful envelope whose `data` is not a list of sales is a protocol
/// error.
pub fn analyze_sales(envelope: &ResponseEnvelope) -> Result<SalesAnalysis> {
    if !envelope.is_success() {
        return Ok(SalesAnalysis::Unavailable {
            error: UNAVAILABLE_MESSAGE.to_string(),
        });
    }

    let sales: Vec<Sale> = envelope.data_as()?.unwrap_or_default();
    Ok(SalesAnalysis::Report(SalesReport::from_sales(&sales)))
}

impl SalesReport {
    /// Aggregate a list of sales
    #[must_use]
    pub fn from_sales(sales: &[Sale]) -> Self {
        let total_sales = sales.len();
        let total_revenue: f64 = sales.iter().map(Sale::total_or_zero).sum();

        #[allow(clippy::cast_precision_loss)]
        let average_sale_value = if total_sales > 0 {
            total_revenue / total_sales as f64
        } else {
            0.0
        };

        let mut top_products = units_by_product(sales);
        // Stable: equal quantities keep first-seen order
        top_products.sort_by(|a, b| b.1.cmp(&a.1));
        top_products.truncate(TOP_PRODUCTS_LIMIT);

        let recommendation = if top_products.is_empty() {
            Recommendation::DiversifyCatalog
        } else {
            Recommendation::FocusOnBestSellers
        };

        Self {
            total_sales,
            total_revenue,
            average_sale_value,
            top_products,
            analysis: Assessment {
                performance: Performance::from_average(average_sale_value),
                recommendation,
            },
        }
    }
}

/// Units sold per product name, in order of first appearance
fn units_by_product(sales: &[Sale]) -> Vec<(String, i64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, i64)> = Vec::new();

    for product in sales.iter().flat_map(Sale::products) {
        let name = product.name_or_default();
        let quantity = product.quantity_or_zero();
        match index.get(name) {
            Some(&slot) => totals[slot].1 = totals[slot].1.saturating_add(quantity),
            None => {
                index.insert(name, totals.len());
                totals.push((name.to_string(), quantity));
            }
        }
    }

    totals
}
