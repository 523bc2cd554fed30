/// Data layer: session inputs and their intake.
///
/// Architecture:
/// ```text
///  .mzML / .mzXML / .cdf
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  extension filter, read bytes → UploadedFile
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐      ┌──────────┐
///   │  SampleSheet  │      │  params   │  preset → ParameterSet (+ overrides)
///   └──────────────┘      └──────────┘
///        │                      │
///        └──────────┬───────────┘
///                   ▼
///              package::build_package
/// ```

pub mod loader;
pub mod model;
pub mod params;
