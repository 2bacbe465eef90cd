//! Error conversions for the client crate

mod conversions;

pub use conversions::ClientError;
