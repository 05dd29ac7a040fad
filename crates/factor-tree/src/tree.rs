use crate::error::{Result, TreeError};
use crate::types::Entity;
use indexmap::IndexMap;

/// Aggregation index over entities, branching on one factor per level.
///
/// Every entity inserted into the same tree must list its factors in the same
/// order; that order becomes the branching order. Children of a branch are kept
/// in the order their outcome value was first observed, and every query walks
/// them in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FactorTree {
    /// Freshly constructed node that has not received an entity
    #[default]
    Empty,

    /// Population partitioned by the value of factor `label`
    Branch {
        label: String,
        children: IndexMap<String, FactorTree>,
    },

    /// Entities sharing one full path of factor values
    Leaf { entities: Vec<Entity> },
}

impl FactorTree {
    pub fn new() -> Self {
        Self::Empty
    }

    /// Build a tree from entities, inserting each from the first factor
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Result<Self> {
        let mut tree = Self::new();
        for entity in entities {
            tree.insert(entity)?;
        }
        Ok(tree)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Insert an entity, branching from its first factor
    pub fn insert(&mut self, entity: Entity) -> Result<()> {
        self.insert_at(entity, 0)
    }

    /// Insert an entity whose factors before `position` are already decided by
    /// the path leading to this node.
    ///
    /// A failed insertion leaves the tree untouched: labels are checked on the
    /// existing path before any node is created.
    pub fn insert_at(&mut self, entity: Entity, position: usize) -> Result<()> {
        if position >= entity.factors.len() {
            return self.push_terminal(entity, position);
        }
        let factor = &entity.factors[position];
        if factor.label.is_empty() {
            return Err(TreeError::schema(position, "factor label is empty"));
        }

        match self {
            Self::Leaf { entities } => Err(TreeError::schema(
                position,
                format!(
                    "factor '{}' reaches a leaf of {} entities with no factors left",
                    factor.label,
                    entities.len()
                ),
            )),
            Self::Branch { label, .. } if *label != factor.label => Err(TreeError::schema(
                position,
                format!("expected factor '{}', found '{}'", label, factor.label),
            )),
            Self::Branch { children, .. } => {
                let value = factor.value.clone();
                match children.get_mut(&value) {
                    Some(child) => child.insert_at(entity, position + 1),
                    None => {
                        log::debug!("New outcome '{}' at factor position {}", value, position);
                        let child = Self::grow(entity, position + 1)?;
                        children.insert(value, child);
                        Ok(())
                    }
                }
            }
            Self::Empty => {
                let label = factor.label.clone();
                let value = factor.value.clone();
                let child = Self::grow(entity, position + 1)?;
                *self = Self::Branch {
                    label,
                    children: IndexMap::from([(value, child)]),
                };
                Ok(())
            }
        }
    }

    /// Fresh subtree holding a single entity
    fn grow(entity: Entity, position: usize) -> Result<Self> {
        let mut node = Self::Empty;
        node.insert_at(entity, position)?;
        Ok(node)
    }

    fn push_terminal(&mut self, entity: Entity, position: usize) -> Result<()> {
        match self {
            Self::Empty => {
                *self = Self::Leaf {
                    entities: vec![entity],
                };
                Ok(())
            }
            Self::Leaf { entities } => {
                entities.push(entity);
                Ok(())
            }
            Self::Branch { label, .. } => Err(TreeError::schema(
                position,
                format!("entity has no factors left but the tree branches on '{label}'"),
            )),
        }
    }

    /// Number of entities stored below this node
    pub fn entity_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf { entities } => entities.len(),
            Self::Branch { children, .. } => children.values().map(Self::entity_count).sum(),
        }
    }

    /// All entities in traversal order (depth-first, children in insertion order)
    pub fn entities(&self) -> Vec<&Entity> {
        let mut out = Vec::with_capacity(self.entity_count());
        self.collect_entities(&mut out);
        out
    }

    fn collect_entities<'a>(&'a self, out: &mut Vec<&'a Entity>) {
        match self {
            Self::Empty => {}
            Self::Leaf { entities } => out.extend(entities.iter()),
            Self::Branch { children, .. } => {
                for child in children.values() {
                    child.collect_entities(out);
                }
            }
        }
    }

    /// Branching order, read along the first path from this node
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        let mut node = self;
        while let Self::Branch { label, children } = node {
            labels.push(label.as_str());
            match children.values().next() {
                Some(child) => node = child,
                None => break,
            }
        }
        labels
    }
}
