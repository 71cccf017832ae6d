//! Types shared across `twoway` crates: the on-disk bundle an encryption
//! result is stored in, and its errors.

pub mod bundle;
pub mod error;

pub use bundle::{Bundle, Manifest, MANIFEST_VERSION};
pub use error::BundleError;
