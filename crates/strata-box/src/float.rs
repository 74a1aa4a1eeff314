//! Floats registered with a block formatting context.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line."
//!
//! Float *placement* belongs to layout. The manager only remembers which
//! floats live in a formatting context so that their absolute positions can be
//! refreshed after the box that owns the context has moved.

use crate::kind::{BoxKind, FloatSide};
use crate::{BoxId, BoxTree};

/// Tracks the floats placed within one block formatting context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FloatManager {
    /// Left floats in placement order.
    left: Vec<BoxId>,
    /// Right floats in placement order.
    right: Vec<BoxId>,
}

impl FloatManager {
    /// Create an empty manager.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Returns true if no floats were placed in this context.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Record a placed float.
    pub fn add_float(&mut self, side: FloatSide, floater: BoxId) {
        match side {
            FloatSide::Left => self.left.push(floater),
            FloatSide::Right => self.right.push(floater),
        }
    }

    /// Forget a float. Unknown floats are ignored.
    pub fn remove_float(&mut self, floater: BoxId) {
        self.left.retain(|&id| id != floater);
        self.right.retain(|&id| id != floater);
    }

    /// All floats, left floats first, each side in placement order.
    pub fn floats(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }
}

impl BoxTree {
    /// Register a float with the formatting context of its nearest ancestor
    /// block that establishes one.
    ///
    /// Returns `false` when `floater` is not a float or no ancestor
    /// establishes a block formatting context.
    pub fn register_float(&mut self, floater: BoxId) -> bool {
        let Some(side) = self.get(floater).and_then(|node| match &node.kind {
            BoxKind::Float(data) => Some(data.side),
            _ => None,
        }) else {
            return false;
        };

        let mut current = self.parent(floater);
        while let Some(id) = current {
            if let Some(manager) = self
                .get_mut(id)
                .and_then(|node| node.kind.block_data_mut())
                .and_then(|block| block.formatting_context.as_mut())
            {
                manager.add_float(side, floater);
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Run `update` for every float registered in the formatting context
    /// owned by `owner`.
    ///
    /// The float list is snapshotted first so the callback may freely mutate
    /// the tree. Boxes without a formatting context have no floats to update.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `update`.
    pub fn update_float_locations<E>(
        &mut self,
        owner: BoxId,
        mut update: impl FnMut(&mut Self, BoxId) -> Result<(), E>,
    ) -> Result<(), E> {
        let floats: Vec<BoxId> = self
            .get(owner)
            .and_then(|node| node.kind.block_data())
            .and_then(|block| block.formatting_context.as_ref())
            .map(|manager| manager.floats().collect())
            .unwrap_or_default();

        for floater in floats {
            update(self, floater)?;
        }
        Ok(())
    }

    /// Whether `id` owns a persistent block formatting context.
    #[must_use]
    pub fn has_formatting_context(&self, id: BoxId) -> bool {
        self.get(id)
            .and_then(|node| node.kind.block_data())
            .is_some_and(|block| block.formatting_context.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_unknown_float_is_a_no_op() {
        let mut manager = FloatManager::new();
        manager.add_float(FloatSide::Left, BoxId(3));
        manager.remove_float(BoxId(9));
        assert_eq!(manager.floats().collect::<Vec<_>>(), vec![BoxId(3)]);
    }

    #[test]
    fn test_floats_lists_left_side_first() {
        let mut manager = FloatManager::new();
        manager.add_float(FloatSide::Right, BoxId(1));
        manager.add_float(FloatSide::Left, BoxId(2));
        manager.add_float(FloatSide::Left, BoxId(3));
        assert_eq!(
            manager.floats().collect::<Vec<_>>(),
            vec![BoxId(2), BoxId(3), BoxId(1)]
        );
        assert!(!manager.is_empty());
    }
}
