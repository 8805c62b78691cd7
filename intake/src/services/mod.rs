//! Service implementations
//!
//! Production implementations of the intake traits.

pub mod duplicate_detector;

pub use duplicate_detector::FuzzyDuplicateDetector;
