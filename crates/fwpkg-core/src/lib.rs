//! Core library for `fwpkg`.
//!
//! Turns a raw firmware image plus its metadata into a self-describing update
//! archive:
//!
//! ```text
//! FirmwareSpec --validate--> ValidatedSpec --stage artifacts--> Manifest
//!                                                  |
//!                                                  v
//!                        FIRM.bin, FIRM.bin.enc, info.json, params.txt (zip)
//! ```
//!
//! Every call to [`build`] is a pure function of its inputs. Nothing is
//! written to disk here; reading the image and writing the archive belong
//! to the caller.

pub mod archive;
pub mod builder;
pub mod spec;
pub mod transform;
pub mod validate;

pub use builder::{BuildError, Package, build, build_validated};
pub use spec::{FirmwareSpec, SpecError};
pub use transform::{KeyError, Tea, TeaKey, Transform, TransformError, Unkeyed};
pub use validate::{ValidatedSpec, ValidationError};
