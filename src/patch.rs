pub mod asset;
pub mod engine;
pub mod rule;
