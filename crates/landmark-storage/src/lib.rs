//! Landmark Storage Library
//!
//! The transform-and-store stage of the upload pipeline. Every backend
//! implements [`ImageStore`]: it takes a validated [`UploadCandidate`], places
//! it under the configured folder, fill-crops it to the target size and
//! returns a [`StoredImageReference`].
//!
//! # Key format
//!
//! Public ids are `{folder}/{id}`. Keys must not contain `..` or a leading
//! `/`; key generation is centralized in the `keys` module.
//!
//! [`UploadCandidate`]: landmark_core::UploadCandidate
//! [`StoredImageReference`]: landmark_core::StoredImageReference

pub mod cloudinary;
pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod traits;
pub mod transform;

// Re-export commonly used types
pub use cloudinary::{CloudinaryCredentials, CloudinaryImageStore};
pub use factory::create_image_store;
pub use landmark_core::StorageBackend;
pub use local::LocalImageStore;
pub use traits::{ImageStore, StorageError, StorageResult};
pub use transform::TransformSpec;
