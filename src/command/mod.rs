pub mod check;
mod error;

pub use error::Error;
