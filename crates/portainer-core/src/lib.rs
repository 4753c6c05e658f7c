pub mod client;
pub mod error;
pub mod models;
pub mod service;

pub use client::{ClientOptions, PortainerClient};
pub use error::{Error, Result, ResultExt};
pub use models::{EdgeStack, RegularStack, Stack};
pub use service::StackService;
