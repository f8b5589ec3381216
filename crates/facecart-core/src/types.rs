use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Identity used when neither the user nor the backend supplies a name.
pub const DEFAULT_IDENTITY: &str = "demo";

/// Display name that keys a user's face registration and order record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolve an optional name, falling back to `placeholder` when the
    /// name is missing or blank.
    pub fn resolve(name: Option<&str>, placeholder: &str) -> Self {
        match name.map(str::trim) {
            Some(n) if !n.is_empty() => Self(n.to_string()),
            _ => Self(placeholder.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local storage key for this identity's order: `order_<name>`.
    pub fn order_key(&self) -> String {
        format!("order_{}", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog entry. Prices are plain numbers, as the backend and the
/// persisted JSON carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
}

/// Whole prices are written as integers (`1200`, not `1200.0`).
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if price.is_finite() && price.fract() == 0.0 && price.abs() <= MAX_EXACT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

impl Product {
    pub fn new(id: &str, name: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
        }
    }

    /// Price rendered with a dollar sign, e.g. `$1200` or `$12.5`.
    pub fn price_label(&self) -> String {
        format!("${}", self.price)
    }
}

/// A finalized cart snapshot tied to one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Creation time as Unix epoch milliseconds, in decimal text.
    pub id: String,
    pub products: Vec<Product>,
}

impl Order {
    pub fn new(products: Vec<Product>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: created_at.timestamp_millis().to_string(),
            products,
        }
    }

    pub fn total(&self) -> f64 {
        self.products.iter().map(|p| p.price).sum()
    }
}

/// Response body shared by the three face endpoints. Every field defaults
/// when the backend omits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A checkout whose face registration did not reach the backend yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsyncedRegistration {
    pub name: Identity,
    /// Base64 face image to replay against the registration endpoint.
    pub face_img: String,
    pub order_id: String,
    pub queued_at: DateTime<Utc>,
}
