//! Sales domain records

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::UNNAMED_PRODUCT;

/// Sale line item.
///
/// Every field is optional on decode; the accessors apply the defaults the
/// analysis relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Units sold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl Product {
    /// Fully populated line item
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            quantity: Some(quantity),
        }
    }

    /// Name, or [`UNNAMED_PRODUCT`] when absent
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_PRODUCT)
    }

    /// Quantity, 0 when absent
    #[must_use]
    pub fn quantity_or_zero(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }

    /// `price * quantity`, absent values counting as 0
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn line_total(&self) -> f64 {
        self.price.unwrap_or(0.0) * self.quantity_or_zero() as f64
    }
}

/// Sale record as returned by `get_sales`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Client the sale was made to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Line items, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    /// Sale total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    /// Payment method wire name (`dinheiro`, `pix`, `fiado`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Sale {
    /// Total, 0 when absent
    #[must_use]
    pub fn total_or_zero(&self) -> f64 {
        self.total.unwrap_or(0.0)
    }

    /// Line items, empty when absent
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or_default()
    }
}

/// Payment methods known to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash
    Dinheiro,
    /// Instant bank transfer
    Pix,
    /// Store credit, paid later
    Fiado,
}

impl PaymentMethod {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dinheiro => "dinheiro",
            Self::Pix => "pix",
            Self::Fiado => "fiado",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dinheiro" => Ok(Self::Dinheiro),
            "pix" => Ok(Self::Pix),
            "fiado" => Ok(Self::Fiado),
            other => Err(format!(
                "unknown payment method '{other}' (expected dinheiro, pix or fiado)"
            )),
        }
    }
}

/// Payload of the `create_sale` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    /// Client the sale is made to
    pub client_name: String,
    /// Line items
    pub products: Vec<Product>,
    /// Sale total
    pub total: f64,
    /// How the client pays
    pub payment_method: PaymentMethod,
}

impl NewSale {
    /// Build a sale whose total is the sum of its line totals, rounded to cents
    pub fn from_products(
        client_name: impl Into<String>,
        products: Vec<Product>,
        payment_method: PaymentMethod,
    ) -> Self {
        let total = products.iter().map(Product::line_total).sum::<f64>();
        Self {
            client_name: client_name.into(),
            products,
            total: (total * 100.0).round() / 100.0,
            payment_method,
        }
    }
}
