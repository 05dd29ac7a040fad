//! # Cohort Ingest
//!
//! Reads tabular study data into [`Entity`](cohort_factor_tree::Entity) records and
//! [`FactorTree`](cohort_factor_tree::FactorTree)s.
//!
//! ## Layout
//!
//! ```text
//! gender,lunch,...,math score,reading score,writing score
//! └──── factor columns ────┘ └────── subject columns ──────┘
//! ```
//!
//! The first [`IngestConfig::factor_columns`] header cells name the factors, in
//! the branching order of the resulting tree. Every following column is a
//! numeric subject; one subject is selected per load and becomes the score.
//!
//! ## Example
//!
//! ```rust
//! use cohort_ingest::{IngestConfig, SubjectTable};
//!
//! let data = "gender,lunch,math score\nfemale,standard,72\nmale,free/reduced,47\n";
//! let config = IngestConfig { factor_columns: 2, ..IngestConfig::default() };
//!
//! let table = SubjectTable::from_reader(data.as_bytes(), &config).unwrap();
//! let tree = table.build_tree("math score").unwrap();
//! assert_eq!(tree.average().unwrap(), 59.5);
//! ```

mod config;
mod error;
mod table;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use table::{load_entities, load_tree, SubjectTable};
