//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
pub(crate) mod transaction;

pub use amount::Amount;
pub use category::{Category, IconMap};
pub use transaction::Transaction;
