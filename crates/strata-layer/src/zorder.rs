//! Z-order grouping.
//!
//! [§ 9.9.1 Specifying the stack level](https://www.w3.org/TR/CSS2/visuren.html#z-index)
//!
//! "Each box belongs to one stacking context. Each positioned box in a given
//! stacking context has an integer stack level, which is its position on the
//! z-axis relative to other stack levels within the same stacking context."
//!
//! Stacking order is never stored. It is derived from the document-ordered
//! children of the layer tree every time a stacking context paints.

use strata_box::BoxTree;
use strum_macros::Display;

use crate::error::Result;
use crate::layer::{LayerId, LayerTree};

/// Which descendants of a stacking context a paint step draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LayerGroup {
    /// "the child stacking contexts with negative stack levels (most
    /// negative first)"
    Negative,
    /// Positioned descendants with `z-index: auto`, which do not establish a
    /// stacking context of their own.
    Auto,
    /// "the child stacking contexts with stack level 0"
    Zero,
    /// "the child stacking contexts with positive stack levels (least
    /// positive first)"
    Positive,
}

impl LayerGroup {
    const fn admits(self, level: i32) -> bool {
        match self {
            Self::Negative => level < 0,
            Self::Zero => level == 0,
            Self::Positive => level > 0,
            Self::Auto => false,
        }
    }
}

impl LayerTree {
    /// Collect the layers of `group` that belong to the stacking context
    /// rooted at `layer`, in document order.
    ///
    /// - [`LayerGroup::Auto`]: every non-stacking descendant reachable
    ///   through non-stacking layers. Stacking children are neither added nor
    ///   entered.
    /// - Otherwise: this layer's stacking children whose level matches, then
    ///   the same collection recursively through each non-stacking child.
    ///
    /// # Errors
    ///
    /// [`crate::LayerError::StaleLayer`] or [`crate::LayerError::UnknownBox`]
    /// if the tree references something that no longer exists.
    pub fn collect_layers(
        &self,
        boxes: &BoxTree,
        layer: LayerId,
        group: LayerGroup,
    ) -> Result<Vec<LayerId>> {
        let mut out = Vec::new();
        self.collect_into(boxes, layer, group, &mut out)?;
        Ok(out)
    }

    fn collect_into(
        &self,
        boxes: &BoxTree,
        layer: LayerId,
        group: LayerGroup,
        out: &mut Vec<LayerId>,
    ) -> Result<()> {
        let children = self.get(layer)?.children();

        if group == LayerGroup::Auto {
            for &child in children {
                if !self.get(child)?.is_stacking_context() {
                    out.push(child);
                    self.collect_into(boxes, child, group, out)?;
                }
            }
            return Ok(());
        }

        for &child in children {
            if self.get(child)?.is_stacking_context()
                && group.admits(self.z_index(boxes, child)?)
            {
                out.push(child);
            }
        }
        for &child in children {
            if !self.get(child)?.is_stacking_context() {
                self.collect_into(boxes, child, group, out)?;
            }
        }
        Ok(())
    }

    /// [`Self::collect_layers`] ordered by ascending z-index.
    ///
    /// "Boxes with the same stack level in a stacking context are stacked
    /// back-to-front according to document tree order." The sort is stable,
    /// so equal levels keep their collection order.
    ///
    /// # Errors
    ///
    /// See [`Self::collect_layers`].
    pub fn sorted_layers(
        &self,
        boxes: &BoxTree,
        layer: LayerId,
        group: LayerGroup,
    ) -> Result<Vec<LayerId>> {
        let collected = self.collect_layers(boxes, layer, group)?;
        let mut keyed = collected
            .into_iter()
            .map(|id| self.z_index(boxes, id).map(|z| (z, id)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by_key(|&(z, _)| z);
        Ok(keyed.into_iter().map(|(_, id)| id).collect())
    }
}
