//! # I/O Module
//!
//! The command-line front end. Arguments are parsed into shared DTOs, the
//! mappers turn those into domain commands, and results are rendered as
//! text or JSON by [`output::Output`].

pub mod cli;
pub mod mappers;
pub mod output;
