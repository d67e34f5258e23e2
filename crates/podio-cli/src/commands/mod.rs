pub mod lifecycle;
pub mod schema;
