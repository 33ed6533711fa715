pub mod splits;

pub use splits::{CreateSplitRequest, MessageResponse, SettlementDto, SplitResponse};
