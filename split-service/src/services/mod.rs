pub mod memory;
pub mod metrics;
pub mod store;

pub use memory::InMemorySplitStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use store::{MongoSplitStore, SplitStore};
