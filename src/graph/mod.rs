pub mod bindings;
pub mod conversion;
pub mod definition;

pub use bindings::*;
pub use conversion::*;
pub use definition::*;
