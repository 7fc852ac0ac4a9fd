//! Reference-asset (logo) storage abstraction.
//!
//! This module provides an `AssetStore` trait for uploading client images
//! to a publicly reachable URL, with a KIE HTTP implementation and a stub
//! backend for running without credentials.

mod kie;
mod stub;
mod types;

pub use kie::KieAssetStore;
pub use stub::StubAssetStore;
pub use types::*;
