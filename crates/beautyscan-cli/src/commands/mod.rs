pub mod codes;
pub mod config;
pub mod score;
