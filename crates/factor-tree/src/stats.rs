use crate::tree::FactorTree;
use serde::{Deserialize, Serialize};

/// Shape of a factor tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Entities stored in leaves
    pub entities: usize,

    /// Leaf nodes (distinct full factor-value paths)
    pub leaves: usize,

    /// Branch nodes
    pub branches: usize,

    /// Longest root-to-leaf path, counted in branches
    pub depth: usize,

    /// Branching order
    pub labels: Vec<String>,
}

impl TreeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean number of entities per leaf
    pub fn mean_leaf_size(&self) -> f64 {
        if self.leaves == 0 {
            return 0.0;
        }
        self.entities as f64 / self.leaves as f64
    }

    fn visit(&mut self, node: &FactorTree, depth: usize) {
        match node {
            FactorTree::Empty => {}
            FactorTree::Leaf { entities } => {
                self.leaves += 1;
                self.entities += entities.len();
                self.depth = self.depth.max(depth);
            }
            FactorTree::Branch { children, .. } => {
                self.branches += 1;
                for child in children.values() {
                    self.visit(child, depth + 1);
                }
            }
        }
    }
}

impl FactorTree {
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::new();
        stats.visit(self, 0);
        stats.labels = self.labels().into_iter().map(str::to_string).collect();
        stats
    }
}
