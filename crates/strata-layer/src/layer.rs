//! The layer tree.
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! A layer wraps one box that needs to be painted as a unit: the root, a
//! positioned box, or a float painted as a pseudo-layer. Layers form a tree
//! overlaid on the box tree. The tree only records *document order*; stacking
//! order is derived from it at paint time (see [`crate::zorder`]).
//!
//! # Design
//!
//! Layers live in a generational arena owned by [`LayerTree`]. A [`LayerId`]
//! is a slot index plus the generation of the slot when the layer was
//! allocated, so a handle to a destroyed layer is detected instead of
//! silently aliasing whatever reuses the slot. Parent links are plain ids and
//! never own anything.

use std::collections::HashMap;

use strata_box::{BoxId, BoxTree};
use strata_common::Point;

use crate::error::{LayerError, Result};

/// A generational handle to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    index: usize,
    generation: u32,
}

/// State that only exists on layers establishing a stacking context.
///
/// [§ 9.9.1](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// Floats are registered with the nearest stacking context, so the float
/// list lives here: a layer that is not a stacking context has nowhere to
/// put one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackingContextState {
    floats: Vec<BoxId>,
}

impl StackingContextState {
    /// Floats in registration order.
    #[must_use]
    pub fn floats(&self) -> &[BoxId] {
        &self.floats
    }
}

/// A node of the layer tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    parent: Option<LayerId>,
    master: BoxId,
    children: Vec<LayerId>,
    stacking: Option<StackingContextState>,
    fixed_background: bool,
}

impl Layer {
    fn new(parent: Option<LayerId>, master: BoxId, stacking_context: bool) -> Self {
        Self {
            parent,
            master,
            children: Vec::new(),
            stacking: stacking_context.then(StackingContextState::default),
            fixed_background: false,
        }
    }

    /// The enclosing layer, `None` for the root and for transient layers.
    #[must_use]
    pub const fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// The box this layer wraps.
    #[must_use]
    pub const fn master(&self) -> BoxId {
        self.master
    }

    /// Child layers in document order.
    #[must_use]
    pub fn children(&self) -> &[LayerId] {
        &self.children
    }

    /// Whether this layer establishes a stacking context.
    #[must_use]
    pub const fn is_stacking_context(&self) -> bool {
        self.stacking.is_some()
    }

    /// Floats registered with this layer. Always empty for layers that are
    /// not stacking contexts.
    #[must_use]
    pub fn floats(&self) -> &[BoxId] {
        self.stacking.as_ref().map_or(&[], StackingContextState::floats)
    }

    /// Whether the master paints a viewport-fixed background.
    #[must_use]
    pub const fn has_fixed_background(&self) -> bool {
        self.fixed_background
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    layer: Option<Layer>,
}

/// Cached result of the root's position pass.
///
/// Positions are resolved once for the root's first paint and then reused
/// until [`LayerTree::invalidate_positions`] is called. Fixed content always
/// bypasses the cache, because it anchors to the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionCache {
    pub(crate) finalized: bool,
    pub(crate) extent: Option<Point>,
}

/// Arena-backed tree of layers.
#[derive(Debug, Clone, Default)]
pub struct LayerTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    by_master: HashMap<BoxId, LayerId>,
    root: Option<LayerId>,
    pub(crate) positions: PositionCache,
}

impl LayerTree {
    /// Create an empty layer tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live layers, transient ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the tree holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The root layer, once created.
    #[must_use]
    pub const fn root(&self) -> Option<LayerId> {
        self.root
    }

    /// Whether `id` refers to a live layer.
    #[must_use]
    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_ok()
    }

    /// Look up a layer.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] if the layer was destroyed.
    pub fn get(&self, id: LayerId) -> Result<&Layer> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layer.as_ref())
            .ok_or(LayerError::StaleLayer(id))
    }

    fn get_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layer.as_mut())
            .ok_or(LayerError::StaleLayer(id))
    }

    /// The layer wrapping `master`, if any.
    #[must_use]
    pub fn layer_for(&self, master: BoxId) -> Option<LayerId> {
        self.by_master.get(&master).copied()
    }

    fn allocate(&mut self, layer: Layer) -> LayerId {
        let master = layer.master;
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.layer = Some(layer);
            LayerId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                layer: Some(layer),
            });
            LayerId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        };
        let _ = self.by_master.insert(master, id);
        id
    }

    fn release(&mut self, id: LayerId) -> Option<Layer> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?;
        let layer = slot.layer.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if self.by_master.get(&layer.master) == Some(&id) {
            let _ = self.by_master.remove(&layer.master);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        Some(layer)
    }

    fn ensure_unwrapped(&self, master: BoxId) -> Result<()> {
        match self.layer_for(master) {
            Some(existing) => Err(LayerError::DuplicateLayer { master, existing }),
            None => Ok(()),
        }
    }

    /// Create the root layer for `master`.
    ///
    /// The root always establishes a stacking context, whatever its z-index.
    /// A tree has one root; [`Self::destroy`] the old one to replace it.
    ///
    /// # Errors
    ///
    /// - [`LayerError::RootExists`] if the tree already has a root.
    /// - [`LayerError::DuplicateLayer`] if `master` already has a layer.
    pub fn create_root(&mut self, master: BoxId) -> Result<LayerId> {
        if let Some(root) = self.root {
            return Err(LayerError::RootExists(root));
        }
        self.ensure_unwrapped(master)?;
        let id = self.allocate(Layer::new(None, master, true));
        self.root = Some(id);
        self.positions = PositionCache::default();
        Ok(id)
    }

    /// Create a layer for `master` and append it to `parent`'s children.
    ///
    /// The layer is a stacking context iff the master's z-index is not
    /// `auto`.
    ///
    /// # Errors
    ///
    /// - [`LayerError::StaleLayer`] if `parent` was destroyed.
    /// - [`LayerError::UnknownBox`] if `master` is not in `boxes`.
    /// - [`LayerError::DuplicateLayer`] if `master` already has a layer.
    pub fn create_layer(
        &mut self,
        boxes: &BoxTree,
        parent: LayerId,
        master: BoxId,
    ) -> Result<LayerId> {
        let _ = self.get(parent)?;
        let node = boxes.get(master).ok_or(LayerError::UnknownBox(master))?;
        self.ensure_unwrapped(master)?;

        let stacking_context = !node.style.is_auto_z_index();
        let id = self.allocate(Layer::new(None, master, stacking_context));
        self.add_child(parent, id)?;
        log::trace!(
            target: "strata::layer",
            "created layer {id:?} for {master:?} (stacking context: {stacking_context})"
        );
        Ok(id)
    }

    /// Wrap `master` in a layer that is not attached to the tree.
    ///
    /// Used to paint floats and replaced roots; the previous back-reference of
    /// `master` is returned so [`Self::discard_transient`] can restore it.
    pub(crate) fn create_transient(&mut self, master: BoxId) -> (LayerId, Option<LayerId>) {
        let previous = self.layer_for(master);
        let id = self.allocate(Layer::new(None, master, false));
        (id, previous)
    }

    /// Drop a transient layer and restore its master's back-reference.
    pub(crate) fn discard_transient(&mut self, id: LayerId, previous: Option<LayerId>) {
        if let Some(layer) = self.release(id)
            && let Some(previous) = previous
        {
            let _ = self.by_master.insert(layer.master, previous);
        }
    }

    /// Append an existing, parentless layer to `parent`'s children.
    ///
    /// Children are append-only and stay in document order.
    ///
    /// # Errors
    ///
    /// - [`LayerError::StaleLayer`] if either layer was destroyed.
    /// - [`LayerError::AlreadyAttached`] if `child` already has a parent.
    /// - [`LayerError::WouldCycle`] if `child` is `parent` or one of its
    ///   ancestors.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) -> Result<()> {
        if let Some(current) = self.get(child)?.parent {
            return Err(LayerError::AlreadyAttached {
                child,
                parent: current,
            });
        }
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(LayerError::WouldCycle { parent, child });
            }
            ancestor = self.get(id)?.parent;
        }
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Turn `id` into a stacking context regardless of its z-index.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] if the layer was destroyed.
    pub fn force_stacking_context(&mut self, id: LayerId) -> Result<()> {
        let layer = self.get_mut(id)?;
        if layer.stacking.is_none() {
            layer.stacking = Some(StackingContextState::default());
        }
        Ok(())
    }

    /// Mark whether the master paints a viewport-fixed background.
    ///
    /// A fixed background repaints with every scroll position, so the layer
    /// is forced to be a stacking context and its content counts as fixed.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] if the layer was destroyed.
    pub fn set_fixed_background(&mut self, id: LayerId, fixed: bool) -> Result<()> {
        self.get_mut(id)?.fixed_background = fixed;
        if fixed {
            self.force_stacking_context(id)?;
        }
        Ok(())
    }

    /// The stacking context `id` belongs to: itself if it is one, otherwise
    /// the nearest ancestor that is.
    ///
    /// # Errors
    ///
    /// - [`LayerError::StaleLayer`] if a layer on the way was destroyed.
    /// - [`LayerError::NoStackingContext`] if the walk ends at a parentless
    ///   layer that is not a stacking context.
    pub fn stacking_context_of(&self, id: LayerId) -> Result<LayerId> {
        let mut current = id;
        loop {
            let layer = self.get(current)?;
            if layer.is_stacking_context() {
                return Ok(current);
            }
            current = layer.parent.ok_or(LayerError::NoStackingContext(current))?;
        }
    }

    /// Register a float with the stacking context enclosing `id`.
    ///
    /// # Errors
    ///
    /// See [`Self::stacking_context_of`].
    pub fn add_float(&mut self, id: LayerId, floater: BoxId) -> Result<()> {
        let target = self.stacking_context_of(id)?;
        if let Some(state) = self.get_mut(target)?.stacking.as_mut() {
            state.floats.push(floater);
        }
        Ok(())
    }

    /// Remove the first registration of `floater` from the stacking context
    /// enclosing `id`. Removing an unregistered float does nothing.
    ///
    /// # Errors
    ///
    /// See [`Self::stacking_context_of`].
    pub fn remove_float(&mut self, id: LayerId, floater: BoxId) -> Result<()> {
        let target = self.stacking_context_of(id)?;
        if let Some(state) = self.get_mut(target)?.stacking.as_mut()
            && let Some(index) = state.floats.iter().position(|&f| f == floater)
        {
            let _ = state.floats.remove(index);
        }
        Ok(())
    }

    /// Remove `child` from `parent`'s children.
    ///
    /// The remaining children keep their order.
    ///
    /// # Errors
    ///
    /// - [`LayerError::StaleLayer`] if `parent` was destroyed.
    /// - [`LayerError::LayerNotFound`] if `child` is not among the children.
    pub fn remove(&mut self, parent: LayerId, child: LayerId) -> Result<()> {
        let children = &mut self.get_mut(parent)?.children;
        let index = children
            .iter()
            .position(|&candidate| candidate == child)
            .ok_or(LayerError::LayerNotFound { parent, child })?;
        let _ = children.remove(index);
        if let Ok(layer) = self.get_mut(child) {
            layer.parent = None;
        }
        Ok(())
    }

    /// Remove `id` from its parent. Does nothing for the root.
    ///
    /// # Errors
    ///
    /// See [`Self::remove`].
    pub fn detach(&mut self, id: LayerId) -> Result<()> {
        match self.get(id)?.parent {
            Some(parent) => self.remove(parent, id),
            None => Ok(()),
        }
    }

    /// Detach `id` and free it together with its whole subtree.
    ///
    /// Called when the master box is removed from the box tree.
    ///
    /// # Errors
    ///
    /// See [`Self::remove`].
    pub fn destroy(&mut self, id: LayerId) -> Result<()> {
        self.detach(id)?;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(layer) = self.release(next) {
                pending.extend(layer.children);
            }
        }
        Ok(())
    }

    /// "The root element forms the root stacking context."
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] if the layer was destroyed.
    pub fn is_root_layer(&self, id: LayerId) -> Result<bool> {
        let layer = self.get(id)?;
        Ok(layer.parent.is_none() && layer.is_stacking_context())
    }

    /// The stack level of `id`, read from its master's style on every call.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleLayer`] or [`LayerError::UnknownBox`].
    pub fn z_index(&self, boxes: &BoxTree, id: LayerId) -> Result<i32> {
        let master = self.get(id)?.master;
        boxes
            .get(master)
            .map(|node| node.style.z_index())
            .ok_or(LayerError::UnknownBox(master))
    }

    /// Whether the root's positions have been resolved and cached.
    #[must_use]
    pub const fn positions_finalized(&self) -> bool {
        self.positions.finalized
    }

    /// Set or clear the one-shot "positions finalized" flag.
    pub const fn set_positions_finalized(&mut self, finalized: bool) {
        self.positions.finalized = finalized;
        if !finalized {
            self.positions.extent = None;
        }
    }

    /// Forget cached positions; the next root paint or extent query resolves
    /// every box again.
    pub const fn invalidate_positions(&mut self) {
        self.set_positions_finalized(false);
    }
}
