#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Sweep Core
//!
//! Error types, the encryption primitive and the secret codec shared by the
//! deletion-job configuration crates. Nothing here touches storage or the
//! network.

/// Tracing target for secret codec operations.
pub const TRACING_TARGET_CODEC: &str = "sweep_core::codec";

mod error;

pub mod codec;
pub mod crypto;

#[doc(hidden)]
pub mod prelude;

pub use error::{BoxedError, Error, ErrorKind, Result};
