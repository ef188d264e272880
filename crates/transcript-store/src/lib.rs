pub mod connection;
pub mod queries;
pub mod schema;
pub mod writer;

pub use connection::{IndexStore, IndexWriter, StoreError};
pub use schema::SCHEMA_VERSION;
