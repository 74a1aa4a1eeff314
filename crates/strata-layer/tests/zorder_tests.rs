//! Integration tests for z-order grouping.
//!
//! [§ 9.9.1 Specifying the stack level](https://www.w3.org/TR/CSS2/visuren.html#z-index)

use strata_box::{BoxId, BoxNode, BoxStyle, BoxTree, Position};
use strata_common::Rect;
use strata_layer::{LayerGroup, LayerId, LayerTree};

struct Scene {
    boxes: BoxTree,
    layers: LayerTree,
    root: LayerId,
}

impl Scene {
    fn new() -> Self {
        let mut boxes = BoxTree::new();
        let root_box = boxes.alloc(BoxNode::block(Rect::new(0, 0, 800, 600)));
        let mut layers = LayerTree::new();
        let root = layers.create_root(root_box).unwrap();
        Self { boxes, layers, root }
    }

    /// Add a relatively positioned box under `parent`'s master and wrap it in
    /// a layer.
    fn layer(&mut self, parent: LayerId, z: Option<i32>) -> LayerId {
        let parent_box: BoxId = self.layers.get(parent).unwrap().master();
        let mut style = BoxStyle::positioned(Position::Relative);
        if let Some(z) = z {
            style = style.with_z_index(z);
        }
        let id = self
            .boxes
            .append_new(parent_box, BoxNode::block(Rect::new(0, 0, 10, 10)).with_style(style));
        self.layers.create_layer(&self.boxes, parent, id).unwrap()
    }

    fn sorted(&self, group: LayerGroup) -> Vec<LayerId> {
        self.layers.sorted_layers(&self.boxes, self.root, group).unwrap()
    }

    fn z(&self, layer: LayerId) -> i32 {
        self.layers.z_index(&self.boxes, layer).unwrap()
    }
}

#[test]
fn test_auto_collects_non_stacking_descendants_in_document_order() {
    let mut scene = Scene::new();
    let a = scene.layer(scene.root, None);
    let a1 = scene.layer(a, None);
    let s = scene.layer(scene.root, Some(4));
    let _inside_stacking = scene.layer(s, None);
    let b = scene.layer(scene.root, None);

    let auto = scene
        .layers
        .collect_layers(&scene.boxes, scene.root, LayerGroup::Auto)
        .unwrap();

    assert_eq!(auto, vec![a, a1, b]);
}

#[test]
fn test_negative_group_is_ascending_and_negative() {
    let mut scene = Scene::new();
    let m1 = scene.layer(scene.root, Some(-1));
    let _p = scene.layer(scene.root, Some(3));
    let m5 = scene.layer(scene.root, Some(-5));
    let m3 = scene.layer(scene.root, Some(-3));

    let negative = scene.sorted(LayerGroup::Negative);

    assert_eq!(negative, vec![m5, m3, m1]);
    assert!(negative.iter().all(|&id| scene.z(id) < 0));
}

#[test]
fn test_positive_group_is_ascending_and_positive() {
    let mut scene = Scene::new();
    let p9 = scene.layer(scene.root, Some(9));
    let p2 = scene.layer(scene.root, Some(2));
    let _zero = scene.layer(scene.root, Some(0));
    let _neg = scene.layer(scene.root, Some(-2));

    assert_eq!(scene.sorted(LayerGroup::Positive), vec![p2, p9]);
}

#[test]
fn test_zero_group_takes_exact_zero_only() {
    let mut scene = Scene::new();
    let _auto = scene.layer(scene.root, None);
    let z0 = scene.layer(scene.root, Some(0));
    let _z1 = scene.layer(scene.root, Some(1));
    let _zm = scene.layer(scene.root, Some(-1));

    assert_eq!(scene.sorted(LayerGroup::Zero), vec![z0]);
}

#[test]
fn test_equal_levels_keep_document_order() {
    let mut scene = Scene::new();
    let first = scene.layer(scene.root, Some(2));
    let low = scene.layer(scene.root, Some(1));
    let second = scene.layer(scene.root, Some(2));
    let third = scene.layer(scene.root, Some(2));

    assert_eq!(scene.sorted(LayerGroup::Positive), vec![low, first, second, third]);
}

#[test]
fn test_stacking_children_found_through_non_stacking_layers() {
    let mut scene = Scene::new();
    let wrapper = scene.layer(scene.root, None);
    let nested = scene.layer(wrapper, Some(7));
    let direct = scene.layer(scene.root, Some(1));
    let s = scene.layer(scene.root, Some(3));
    let _hidden = scene.layer(s, Some(5));

    // The stacking child of `s` belongs to `s`, not to the root.
    assert_eq!(scene.sorted(LayerGroup::Positive), vec![direct, s, nested]);
}

#[test]
fn test_own_matches_come_before_nested_ones() {
    let mut scene = Scene::new();
    let wrapper = scene.layer(scene.root, None);
    let nested = scene.layer(wrapper, Some(-1));
    let own = scene.layer(scene.root, Some(-1));

    let collected = scene
        .layers
        .collect_layers(&scene.boxes, scene.root, LayerGroup::Negative)
        .unwrap();
    assert_eq!(collected, vec![own, nested]);
}

#[test]
fn test_groups_follow_style_changes() {
    let mut scene = Scene::new();
    let layer = scene.layer(scene.root, Some(-4));
    assert_eq!(scene.sorted(LayerGroup::Negative), vec![layer]);

    let master = scene.layers.get(layer).unwrap().master();
    scene.boxes.get_mut(master).unwrap().style =
        BoxStyle::positioned(Position::Relative).with_z_index(6);

    assert!(scene.sorted(LayerGroup::Negative).is_empty());
    assert_eq!(scene.sorted(LayerGroup::Positive), vec![layer]);
}

#[test]
fn test_group_names() {
    assert_eq!(LayerGroup::Negative.to_string(), "negative");
    assert_eq!(LayerGroup::Auto.to_string(), "auto");
}
