// Saved intake form per user. Photos go to S3; only the key is kept in Postgres.

pub mod handlers;
pub mod photos;
pub mod store;
pub mod validation;
