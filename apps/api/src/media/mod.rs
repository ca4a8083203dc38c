//! Media generation — thumbnail images via the primary provider.

pub mod handlers;
pub mod thumbnail;
