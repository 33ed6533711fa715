use crate::models::{Settlement, Split};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Wire form of a settlement entry, shared by requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementDto {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl From<SettlementDto> for Settlement {
    fn from(dto: SettlementDto) -> Self {
        Self {
            from: dto.from,
            to: dto.to,
            amount: dto.amount,
        }
    }
}

impl From<Settlement> for SettlementDto {
    fn from(settlement: Settlement) -> Self {
        Self {
            from: settlement.from,
            to: settlement.to,
            amount: settlement.amount,
        }
    }
}

/// Body of `POST /api/splits/create`.
///
/// Only `groupName` is required. Array fields default to empty and
/// `createdAt` defaults to the time the request is handled.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSplitRequest {
    #[validate(length(min = 1, message = "groupName must not be empty"))]
    pub group_name: String,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub amounts: Vec<f64>,
    #[serde(default)]
    pub selected_indices: Vec<u32>,
    #[serde(default)]
    pub transactions: Vec<SettlementDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateSplitRequest {
    pub fn into_split(self, received_at: DateTime<Utc>) -> Split {
        Split {
            id: None,
            group_name: self.group_name,
            people: self.people,
            amounts: self.amounts,
            selected_indices: self.selected_indices,
            transactions: self.transactions.into_iter().map(Settlement::from).collect(),
            created_at: self.created_at.unwrap_or(received_at),
        }
    }
}

/// Element of the `GET /api/splits/all` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitResponse {
    pub group_name: String,
    pub people: Vec<String>,
    pub amounts: Vec<f64>,
    pub selected_indices: Vec<u32>,
    pub transactions: Vec<SettlementDto>,
    pub created_at: DateTime<Utc>,
}

impl From<Split> for SplitResponse {
    fn from(split: Split) -> Self {
        Self {
            group_name: split.group_name,
            people: split.people,
            amounts: split.amounts,
            selected_indices: split.selected_indices,
            transactions: split.transactions.into_iter().map(SettlementDto::from).collect(),
            created_at: split.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
