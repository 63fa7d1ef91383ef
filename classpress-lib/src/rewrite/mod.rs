pub mod css;
pub mod html;
pub mod tokens;
