pub mod db;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use db::SqliteCardStore;
pub use store::{CardStore, ReviewCommit, StoreError, StoreResult};
