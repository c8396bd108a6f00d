pub mod errors;
pub mod item;
pub mod store;

pub use errors::StoreError;
pub use item::{Item, ItemId};
pub use store::{IdScheme, ItemStore};
