//! Managed resource types.

pub mod app;
pub mod app_field;
pub mod space;

pub use app::AppResource;
pub use app_field::AppFieldResource;
pub use space::SpaceResource;
