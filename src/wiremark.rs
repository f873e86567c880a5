//! Main module for wiremark library functionality

pub mod ast;
pub mod building;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formats;
pub mod identity;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod processor;
pub mod testing;
