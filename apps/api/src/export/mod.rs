pub mod handlers;
pub mod text;
