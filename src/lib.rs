//! Bundle LC-MS raw files, sample metadata and XCMS processing parameters
//! into a single ZIP archive for upload to XCMS Online.
//!
//! The packaging itself is UI-independent; see [`package::build_package`].
//! [`state::AppState`] holds a session and is driven by the desktop front-end.

pub mod color;
pub mod config;
pub mod data;
pub mod package;
pub mod state;

pub use data::model::{SampleMetadata, SampleSheet, UploadedFile};
pub use data::params::ParameterSet;
pub use package::{Package, PackageError, PackageResult, build_package};
