//! JSON scenes: a laid-out box tree plus the viewport it is shown in.
//!
//! A scene is what layout would hand to the paint engine. Every box carries
//! its geometry relative to its parent's content edge; the engine works out
//! absolute positions itself.
//!
//! ```json
//! {
//!   "viewport": { "x": 0, "y": 0, "width": 800, "height": 600 },
//!   "root": {
//!     "kind": "block", "width": 800, "height": 1200, "bfc": true,
//!     "children": [
//!       { "kind": "line", "y": 10, "width": 400, "height": 18, "text": ["Hello"] }
//!     ]
//!   }
//! }
//! ```

use std::collections::HashMap;

use anyhow::{Result, bail};
use serde::Deserialize;
use strata_box::{
    BlockData, Border, BoxId, BoxKind, BoxNode, BoxOffsets, BoxStyle, BoxTree, Color, FloatManager,
    FloatSide, ListMarker, Position, ZIndex,
};
use strata_common::Rect;
use strata_common::media::{MediaContext, MediaQueryItem, MediaQueryList};

/// A scene document.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    /// The initial viewport, in document coordinates.
    pub viewport: Rect,
    /// The root box.
    pub root: SceneBox,
}

/// What kind of box a scene entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// A block container.
    #[default]
    Block,
    /// A floated block.
    Float,
    /// A replaced element; needs `source`.
    Replaced,
    /// A line box; `text` holds its runs.
    Line,
    /// An inline box holding `text` entries and atomic children.
    Inline,
    /// A text run inside an inline box. Not a box of its own.
    Text,
}

/// One box of a scene.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneBox {
    /// Box kind.
    pub kind: SceneKind,
    /// Name other boxes can refer to.
    pub name: Option<String>,
    /// Horizontal offset from the parent's content edge.
    pub x: i32,
    /// Vertical offset from the parent's content edge.
    pub y: i32,
    /// Border-box width.
    pub width: i32,
    /// Border-box height.
    pub height: i32,
    /// Horizontal content offset applied to children.
    pub tx: i32,
    /// Vertical content offset applied to children.
    pub ty: i32,
    /// Computed style.
    pub style: SceneStyle,
    /// Child boxes in document order.
    pub children: Vec<Self>,
    /// Line runs, or the text of a text entry.
    pub text: Vec<String>,
    /// List marker of a list item.
    pub marker: Option<ListMarker>,
    /// Content key of a replaced element.
    pub source: Option<String>,
    /// Side of a float; left when omitted.
    pub side: Option<FloatSide>,
    /// Whether the box establishes a block formatting context.
    pub bfc: bool,
    /// Media queries gating the box; the box and its subtree are dropped when
    /// none of them match.
    pub media: Vec<MediaQueryItem>,
    /// Name of the in-flow placeholder of an absolutely positioned box.
    pub static_position: Option<String>,
}

/// Computed style of a scene box.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    /// Positioning scheme.
    pub position: Position,
    /// Explicit z-index; `auto` when omitted.
    pub z_index: Option<i32>,
    /// `top`/`right`/`bottom`/`left`.
    #[serde(flatten)]
    pub offsets: BoxOffsets,
    /// Background color.
    pub background: Option<Color>,
    /// `background-attachment: fixed`
    pub background_fixed: bool,
    /// Uniform border.
    pub border: Option<Border>,
}

impl From<SceneStyle> for BoxStyle {
    fn from(style: SceneStyle) -> Self {
        Self {
            position: style.position,
            z_index: ZIndex::from(style.z_index),
            offsets: style.offsets,
            background_color: style.background,
            background_fixed: style.background_fixed,
            border: style.border,
        }
    }
}

/// A scene turned into a box tree.
#[derive(Debug)]
pub struct LoadedScene {
    /// The box tree.
    pub boxes: BoxTree,
    /// Its root box.
    pub root: BoxId,
    /// Boxes dropped by media queries, subtrees included.
    pub excluded: usize,
}

impl Scene {
    /// Parse a scene document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `text` is not a valid scene.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Build the box tree for the given output device.
    ///
    /// Floats are registered with their nearest block formatting context and
    /// named static positions are resolved once every box exists.
    ///
    /// # Errors
    ///
    /// Fails on a replaced box without a source, a text entry outside an
    /// inline box's children, a duplicate or unknown box name, or a root box
    /// the device's media queries exclude.
    pub fn load(&self, device: &MediaContext) -> Result<LoadedScene> {
        if self.root.kind == SceneKind::Text {
            bail!("the root box cannot be a text entry");
        }
        if !self.root.matches(device) {
            bail!("the root box is excluded by its media queries");
        }

        let mut loader = Loader {
            boxes: BoxTree::new(),
            device: *device,
            names: HashMap::new(),
            static_positions: Vec::new(),
            excluded: 0,
        };
        let root = loader.boxes.alloc(self.root.node()?);
        loader.register(root, &self.root)?;
        loader.add_children(root, &self.root)?;

        for (id, name) in &loader.static_positions {
            let Some(&placeholder) = loader.names.get(name) else {
                bail!("unknown static position {name:?}");
            };
            loader.boxes.set_static_equivalent(*id, placeholder);
        }

        log::debug!(
            "loaded scene: {} boxes, {} excluded by media",
            loader.boxes.len(),
            loader.excluded
        );
        Ok(LoadedScene {
            boxes: loader.boxes,
            root,
            excluded: loader.excluded,
        })
    }
}

impl SceneBox {
    fn matches(&self, device: &MediaContext) -> bool {
        self.media.iter().cloned().collect::<MediaQueryList>().eval(device)
    }

    /// Number of scene entries in this subtree.
    fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    fn block_data(&self) -> BlockData {
        BlockData {
            list_marker: self.marker,
            formatting_context: self.bfc.then(FloatManager::new),
        }
    }

    fn node(&self) -> Result<BoxNode> {
        let bounds = Rect::new(self.x, self.y, self.width, self.height);
        let mut node = match self.kind {
            SceneKind::Block => BoxNode::new(BoxKind::Block(self.block_data()), bounds),
            SceneKind::Float => {
                let mut node = BoxNode::float(self.side.unwrap_or(FloatSide::Left), bounds);
                if let Some(block) = node.kind.block_data_mut() {
                    *block = self.block_data();
                }
                node
            }
            SceneKind::Replaced => {
                let Some(source) = &self.source else {
                    bail!("replaced box without a source");
                };
                BoxNode::replaced(source.clone(), bounds)
            }
            SceneKind::Line => BoxNode::line(self.text.clone(), bounds),
            SceneKind::Inline => BoxNode::inline(bounds),
            SceneKind::Text => bail!("text entries are not boxes"),
        };
        node.style = self.style.into();
        Ok(node.with_content_offset(self.tx, self.ty))
    }
}

struct Loader {
    boxes: BoxTree,
    device: MediaContext,
    names: HashMap<String, BoxId>,
    static_positions: Vec<(BoxId, String)>,
    excluded: usize,
}

impl Loader {
    fn add_children(&mut self, parent: BoxId, entry: &SceneBox) -> Result<()> {
        for child in &entry.children {
            if !child.matches(&self.device) {
                self.excluded += child.count();
                continue;
            }
            if child.kind == SceneKind::Text {
                self.boxes.append_text(parent, child.text.concat());
                continue;
            }
            let id = self.boxes.append_new(parent, child.node()?);
            self.register(id, child)?;
            self.add_children(id, child)?;
        }
        Ok(())
    }

    /// Record names and static positions, and hand floats to their
    /// formatting context.
    fn register(&mut self, id: BoxId, entry: &SceneBox) -> Result<()> {
        if let Some(name) = &entry.name
            && self.names.insert(name.clone(), id).is_some()
        {
            bail!("duplicate box name {name:?}");
        }
        if let Some(name) = &entry.static_position {
            self.static_positions.push((id, name.clone()));
        }
        if entry.kind == SceneKind::Float && !self.boxes.register_float(id) {
            log::debug!("float {id:?} has no enclosing block formatting context");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strata_box::InlineChild;
    use strata_common::media::MediaType;
    use strata_layer::{DisplayCommand, LayerTreeBuilder, Painter, RenderingContext};

    use super::*;

    const SCREEN: MediaContext = MediaContext {
        media: MediaType::Screen,
        width: 800,
        height: 600,
    };

    fn load(json: &str) -> Result<LoadedScene> {
        Scene::from_json(json)?.load(&SCREEN)
    }

    #[test]
    fn test_minimal_scene() {
        let scene = load(
            r#"{"viewport": {"x": 0, "y": 0, "width": 800, "height": 600},
                "root": {"width": 800, "height": 600}}"#,
        )
        .unwrap();

        assert_eq!(scene.boxes.len(), 1);
        let root = scene.boxes.get(scene.root).unwrap();
        assert_eq!(root.bounds(), Rect::new(0, 0, 800, 600));
        assert_eq!(root.style, BoxStyle::default());
    }

    #[test]
    fn test_style_fields_map_to_box_style() {
        let scene = load(
            r#"{"viewport": {"x": 0, "y": 0, "width": 800, "height": 600},
                "root": {"children": [
                    {"style": {"position": "absolute", "z_index": -2, "top": 5, "left": 7,
                               "background": {"r": 1, "g": 2, "b": 3},
                               "border": {"width": 2, "color": {"r": 0, "g": 0, "b": 0}}}}
                ]}}"#,
        )
        .unwrap();

        let child = scene.boxes.children(scene.root)[0];
        let style = scene.boxes.get(child).unwrap().style;
        assert_eq!(style.position, Position::Absolute);
        assert_eq!(style.z_index, ZIndex::Integer(-2));
        assert_eq!(style.offsets.top, Some(5));
        assert_eq!(style.offsets.left, Some(7));
        assert_eq!(style.offsets.bottom, None);
        assert_eq!(style.background_color, Some(Color::rgb(1, 2, 3)));
        assert_eq!(style.border.map(|border| border.width), Some(2));
    }

    #[test]
    fn test_floats_register_with_formatting_context() {
        let mut scene = load(
            r#"{"viewport": {"x": 0, "y": 0, "width": 800, "height": 600},
                "root": {"bfc": true, "children": [
                    {"kind": "float", "side": "right", "width": 50, "height": 50}
                ]}}"#,
        )
        .unwrap();

        let floater = scene.boxes.children(scene.root)[0];
        let mut seen = Vec::new();
        scene
            .boxes
            .update_float_locations(scene.root, |_, id| {
                seen.push(id);
                Ok::<(), ()>(())
            })
            .unwrap();
        assert_eq!(seen, vec![floater]);
    }

    #[test]
    fn test_inline_text_and_atomic_children_keep_order() {
        let scene = load(
            r#"{"viewport": {"x": 0, "y": 0, "width": 800, "height": 600},
                "root": {"children": [
                    {"kind": "inline", "children": [
                        {"kind": "text", "text": ["see "]},
                        {"kind": "replaced", "source": "icon.png", "width": 16, "height": 16},
                        {"kind": "text", "text": [" here"]}
                    ]}
                ]}}"#,
        )
        .unwrap();

        let inline = scene.boxes.children(scene.root)[0];
        let content = scene.boxes.inline_children(inline);
        assert_eq!(content.len(), 3);
        assert_eq!(content[0], InlineChild::Text("see ".to_string()));
        assert!(matches!(content[1], InlineChild::Box(_)));
    }

    #[test]
    fn test_media_queries_drop_subtrees() {
        let scene = load(
            r#"{"viewport": {"x": 0, "y": 0, "width": 800, "height": 600},
                "root": {"children": [
                    {"media": [{"media_type": "print"}], "children": [{}, {}]},
                    {"media": [{"media_type": "print"}, {"features": [{"min-width": 640}]}]}
                ]}}"#,
        )
        .unwrap();

        assert_eq!(scene.boxes.len(), 2);
        assert_eq!(scene.excluded, 3);
    }

    #[test]
    fn test_static_position_resolves_by_name() {
        let scene = load(
            r#"{"viewport": {"x": 0, "y": 0, "width": 800, "height": 600},
                "root": {"children": [
                    {"name": "placeholder"},
                    {"style": {"position": "absolute"}, "static_position": "placeholder"}
                ]}}"#,
        )
        .unwrap();

        let children = scene.boxes.children(scene.root);
        assert_eq!(
            scene.boxes.get(children[1]).unwrap().static_equivalent,
            Some(children[0])
        );
    }

    #[test]
    fn test_invalid_scenes_are_rejected() {
        let viewport = r#""viewport": {"x": 0, "y": 0, "width": 800, "height": 600}"#;
        let cases = [
            r#"{"kind": "replaced"}"#,
            r#"{"kind": "text"}"#,
            r#"{"media": [{"media_type": "print"}]}"#,
            r#"{"children": [{"style": {"position": "absolute"}, "static_position": "nowhere"}]}"#,
            r#"{"children": [{"name": "a"}, {"name": "a"}]}"#,
        ];
        for root in cases {
            let json = format!(r#"{{{viewport}, "root": {root}}}"#);
            assert!(load(&json).is_err(), "accepted {root}");
        }
    }

    #[test]
    fn test_demo_scene_paints() {
        let scene = Scene::from_json(include_str!("../../demos/stacking.json")).unwrap();
        let mut loaded = scene.load(&SCREEN).unwrap();
        assert_eq!(loaded.excluded, 2);

        let mut layers = LayerTreeBuilder::build(&loaded.boxes, loaded.root).unwrap();
        let mut ctx = RenderingContext::new(scene.viewport);
        Painter::new(&mut layers, &mut loaded.boxes)
            .paint_root(&mut ctx)
            .unwrap();

        let commands = ctx.into_display_list().commands().to_vec();
        assert!(matches!(
            commands.first(),
            Some(DisplayCommand::Background { box_id, .. }) if *box_id == loaded.root
        ));
        assert!(
            commands
                .iter()
                .any(|command| matches!(command, DisplayCommand::ListMarker { .. }))
        );

        let print = MediaContext {
            media: MediaType::Print,
            ..SCREEN
        };
        assert_eq!(scene.load(&print).unwrap().excluded, 0);
    }
}
