pub mod dom;
pub mod error;
pub mod parser;
pub mod press;
pub mod rewrite;
pub mod style;

pub use error::PressError;
pub use press::PressOutput;
pub use rewrite::tokens::TokenMap;
