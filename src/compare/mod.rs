//! Transcript comparison — similarity ratio and line-level unified diff.
//!
//! Both operations are built on the same longest-matching-blocks machinery
//! ([`matcher`]): the ratio runs it over characters, the diff over lines.
//!
//! # Quick start
//!
//! ```rust
//! use script_check::compare::{similarity_ratio, unified_diff};
//!
//! let ratio = similarity_ratio("hello world", "hello word");
//! assert!((ratio - 20.0 / 21.0).abs() < 1e-9);
//!
//! let diff = unified_diff("hello world", "hello word");
//! assert!(diff[0].starts_with("---"));
//! ```

pub mod diff;
pub mod matcher;

pub use diff::unified_diff;
pub use matcher::similarity_ratio;
