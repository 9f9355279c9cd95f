pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod scanner;
pub mod upload;
