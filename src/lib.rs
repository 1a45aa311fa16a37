#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

//! Configuration-driven HTTP Basic/Digest authentication adapters and the
//! listener that wires them, or an OAuth2 server, into request authentication.

pub mod adapter;
pub mod auth;
pub mod configuration;
pub mod error;
pub mod identity;
pub mod listener;
pub mod request_ext;
pub mod resolver;
