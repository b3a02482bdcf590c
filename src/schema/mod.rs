pub mod character;
pub mod chunk;
pub mod rule;
