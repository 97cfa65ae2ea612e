pub mod comment;
pub mod document;

pub use comment::*;
pub use document::*;
