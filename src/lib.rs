pub mod cli;
pub mod filter;
pub mod graph;
pub mod provider;
pub mod render;
