pub mod split;

pub use split::{Settlement, Split};
