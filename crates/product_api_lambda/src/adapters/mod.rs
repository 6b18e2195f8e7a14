pub mod dynamodb;
pub mod store;
