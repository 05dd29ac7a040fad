//! # Cohort Factor Tree
//!
//! In-memory aggregation of scored entities, partitioned one categorical factor at a time.
//!
//! ## Features
//!
//! - **Incremental construction** - entities are routed into a trie keyed by factor values
//! - **Factor slices** - collect `(score, outcome)` pairs for any factor in the schema
//! - **Outcome filters** - scores of every entity sharing one concrete factor value
//! - **Rollups** - sum, count and average over the whole population
//! - **Prediction** - weighted estimate for an entity whose score is not known yet
//!
//! ## Architecture
//!
//! ```text
//! Entity[] (factors in a fixed order + score)
//!     │
//!     ├──> FactorTree::insert
//!     │      ├─ Empty  → Branch (first factor seen at this depth)
//!     │      ├─ Branch → child keyed by the factor value
//!     │      └─ Empty  → Leaf   (no factors left)
//!     │
//!     ├──> Queries (read-only)
//!     │      ├─ slice_by_factor   → SliceSamples { scores, outcomes }
//!     │      ├─ filter_by_outcome → Vec<score>
//!     │      └─ sum_and_count / average
//!     │
//!     └──> predict
//!            ├─ filter_by_outcome for every factor of the query entity
//!            └─ average() when no factor value was ever observed
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cohort_factor_tree::{predict, Entity, Factor, FactorTree};
//!
//! let mut tree = FactorTree::new();
//! tree.insert(Entity::new(vec![Factor::new("lunch", "standard")], 80)).unwrap();
//! tree.insert(Entity::new(vec![Factor::new("lunch", "standard")], 70)).unwrap();
//! tree.insert(Entity::new(vec![Factor::new("lunch", "free/reduced")], 90)).unwrap();
//!
//! let slice = tree.slice_by_factor("lunch").unwrap();
//! assert_eq!(slice.scores, vec![80, 70, 90]);
//!
//! let newcomer = Entity::unscored(vec![Factor::new("lunch", "standard")]);
//! assert_eq!(predict(&tree, &newcomer).unwrap(), 75.0);
//! ```

mod error;
mod predict;
mod query;
mod stats;
mod tree;
mod types;

pub use error::{Result, TreeError};
pub use predict::{predict, predict_detailed, Prediction};
pub use query::{round_score, SliceSamples};
pub use stats::TreeStats;
pub use tree::FactorTree;
pub use types::{Entity, Factor, UNKNOWN_SCORE};
