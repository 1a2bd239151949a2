pub mod collections;
pub mod keys;

pub use uuid::Uuid;
