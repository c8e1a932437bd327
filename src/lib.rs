pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod payload;
pub mod serving;

pub use client::ServingClient;
pub use error::{Error, ErrorKind, Result};
