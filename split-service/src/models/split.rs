use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A single payer -> payee entry resolving part of a split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// One persisted bill-splitting session, stored in the `splits` collection.
///
/// `amounts` is positionally parallel to `people` and `selected_indices`
/// points into both, but neither relationship is enforced; the settlement
/// is computed by the client and trusted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub group_name: String,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub amounts: Vec<f64>,
    #[serde(default)]
    pub selected_indices: Vec<u32>,
    #[serde(default)]
    pub transactions: Vec<Settlement>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}
