pub mod client;
pub mod types;

pub use client::HttpApi;
pub use types::CallTaskApi;
