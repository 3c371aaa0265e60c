//! VK API access: the token-bound client and the wire schemas

pub mod client;
pub mod types;

pub use client::VkClient;
