pub mod alias;
pub mod builder;
pub mod config;
pub mod cortex;
pub mod error;
pub mod instance;
pub mod locator;
pub mod scoring;
pub mod selector;
pub mod tokenize;
pub mod truncate;
pub mod window;

pub use alias::*;
pub use builder::*;
pub use config::*;
pub use cortex::*;
pub use error::*;
pub use instance::*;
pub use locator::*;
pub use scoring::*;
pub use selector::*;
pub use tokenize::*;
pub use truncate::*;
pub use window::*;

#[cfg(test)]
mod tests;
