mod arbitrary;
mod engine;
pub mod utils;
