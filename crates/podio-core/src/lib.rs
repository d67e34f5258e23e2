pub mod error;
pub mod record;
pub mod value;

pub use error::{ErrorCategory, ProviderError, Result, Violation};
pub use record::Record;
pub use value::{AttrType, AttrValue};
