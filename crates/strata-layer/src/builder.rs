//! Layer tree construction from a laid-out box tree.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! Layout creates layers as it goes. The builder does the same thing in one
//! walk for a finished box tree: every positioned box gets a layer attached to
//! the nearest enclosing one, and every non-positioned float is registered
//! with the stacking context it paints in.

use strata_box::{BoxId, BoxTree};
use strata_common::warning::warn_once;

use crate::error::{LayerError, Result};
use crate::layer::{LayerId, LayerTree};

/// Builds a [`LayerTree`] for a box tree.
#[derive(Debug)]
pub struct LayerTreeBuilder<'a> {
    boxes: &'a BoxTree,
    layers: LayerTree,
}

impl<'a> LayerTreeBuilder<'a> {
    /// Build the layer tree for the subtree rooted at `root`.
    ///
    /// # Errors
    ///
    /// [`LayerError::UnknownBox`] if `root` is not in `boxes`. The other
    /// variants indicate a malformed box tree, such as a box reachable twice.
    pub fn build(boxes: &'a BoxTree, root: BoxId) -> Result<LayerTree> {
        let node = boxes.get(root).ok_or(LayerError::UnknownBox(root))?;
        let mut builder = Self {
            boxes,
            layers: LayerTree::new(),
        };

        let root_layer = builder.layers.create_root(root)?;
        if node.style.background_fixed {
            builder.layers.set_fixed_background(root_layer, true)?;
        }
        builder.walk(root, root_layer)?;

        log::debug!(
            target: "strata::layer",
            "built {} layers for {} boxes",
            builder.layers.len(),
            boxes.len()
        );
        Ok(builder.layers)
    }

    fn walk(&mut self, parent: BoxId, enclosing: LayerId) -> Result<()> {
        let boxes = self.boxes;
        for child in boxes.child_boxes(parent) {
            let node = boxes.get(child).ok_or(LayerError::UnknownBox(child))?;

            if node.style.is_positioned() {
                let layer = self.layers.create_layer(boxes, enclosing, child)?;
                if node.style.background_fixed {
                    self.layers.set_fixed_background(layer, true)?;
                }
                self.walk(child, layer)?;
                continue;
            }

            if node.kind.is_float() {
                self.layers.add_float(enclosing, child)?;
            }
            if node.style.background_fixed {
                let _ = warn_once(
                    "background-attachment",
                    "fixed backgrounds are only honored on positioned boxes and the root",
                );
            }
            self.walk(child, enclosing)?;
        }
        Ok(())
    }
}
