pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod git;
pub mod llm;
pub mod models;
pub mod promote;
pub mod registry;
pub mod utils;
pub mod validation;
