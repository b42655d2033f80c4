//! Extension contracts that connect the signing delegate to concrete HTTP clients.
//!
//! The contract stays generic over the request type so other clients can plug in. With the
//! `reqwest` feature every [`SigningDelegate`](crate::sign::SigningDelegate) signs
//! [`reqwest::Request`] values in place.

pub mod request_signer;

pub use request_signer::*;
