//! Integration tests for painting order.
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)

use strata_box::{
    BlockData, BoxId, BoxKind, BoxNode, BoxOffsets, BoxStyle, BoxTree, Color, ContainingBlock,
    FloatSide, ListMarker, Position,
};
use strata_common::Rect;
use strata_layer::{DisplayCommand, LayerTree, LayerTreeBuilder, Painter, RenderingContext};

const VIEWPORT: Rect = Rect::new(0, 0, 800, 600);

fn paint(boxes: &mut BoxTree, layers: &mut LayerTree, mut ctx: RenderingContext) -> Vec<DisplayCommand> {
    let _ = env_logger::builder().is_test(true).try_init();
    Painter::new(layers, boxes).paint_root(&mut ctx).unwrap();
    ctx.into_display_list().commands().to_vec()
}

fn ops(commands: &[DisplayCommand]) -> Vec<(&'static str, BoxId)> {
    commands
        .iter()
        .map(|command| (command.name(), command.box_id()))
        .collect()
}

fn backgrounds(commands: &[DisplayCommand]) -> Vec<BoxId> {
    commands
        .iter()
        .filter(|command| matches!(command, DisplayCommand::Background { .. }))
        .map(DisplayCommand::box_id)
        .collect()
}

fn layered(boxes: &mut BoxTree, parent: BoxId, z: Option<i32>) -> BoxId {
    let mut style = BoxStyle::positioned(Position::Relative);
    if let Some(z) = z {
        style = style.with_z_index(z);
    }
    boxes.append_new(parent, BoxNode::block(Rect::new(0, 0, 50, 50)).with_style(style))
}

#[test]
fn test_stacking_scenario_paint_order() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT));
    let positive = layered(&mut boxes, root, Some(2));
    let zero = layered(&mut boxes, root, Some(0));
    let negative = layered(&mut boxes, root, Some(-1));
    let auto = layered(&mut boxes, root, None);
    let flow = boxes.append_new(root, BoxNode::block(Rect::new(0, 0, 800, 100)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));

    assert_eq!(
        backgrounds(&commands),
        vec![root, negative, flow, auto, zero, positive]
    );
}

#[test]
fn test_background_precedes_border() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT).with_style(
        BoxStyle::default().with_background(Color::rgb(255, 255, 255)),
    ));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));

    assert_eq!(ops(&commands), vec![("background", root), ("border", root)]);
    assert_eq!(
        commands[0],
        DisplayCommand::Background {
            box_id: root,
            bounds: VIEWPORT,
            color: Some(Color::rgb(255, 255, 255)),
        }
    );
}

#[test]
fn test_floats_paint_in_reverse_registration_order() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT));
    let block = boxes.append_new(root, BoxNode::block(Rect::new(0, 0, 800, 40)));
    let text = boxes.append_new(block, BoxNode::line(vec!["flow".into()], Rect::new(0, 0, 100, 20)));
    let first = boxes.append_new(root, BoxNode::float(FloatSide::Left, Rect::new(0, 40, 100, 100)));
    let first_text = boxes.append_new(first, BoxNode::line(vec!["one".into()], Rect::new(0, 0, 50, 20)));
    let second = boxes.append_new(root, BoxNode::float(FloatSide::Right, Rect::new(700, 40, 100, 100)));
    let second_text =
        boxes.append_new(second, BoxNode::line(vec!["two".into()], Rect::new(0, 0, 50, 20)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let root_layer = layers.root().unwrap();
    assert_eq!(layers.get(root_layer).unwrap().floats(), &[first, second]);

    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));

    assert_eq!(
        ops(&commands),
        vec![
            ("background", root),
            ("border", root),
            ("background", block),
            ("border", block),
            ("background", second),
            ("border", second),
            ("inline_content", second_text),
            ("background", first),
            ("border", first),
            ("inline_content", first_text),
            ("inline_content", text),
        ]
    );
}

#[test]
fn test_float_pseudo_layers_are_discarded() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT));
    let floater = boxes.append_new(root, BoxNode::float(FloatSide::Left, Rect::new(0, 0, 10, 10)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let before = layers.len();
    let _ = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));

    assert_eq!(layers.len(), before);
    assert_eq!(layers.layer_for(floater), None);
}

#[test]
fn test_boxes_outside_clip_are_culled() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(Rect::new(0, 0, 800, 2000)));
    let visible = boxes.append_new(root, BoxNode::block(Rect::new(0, 0, 800, 100)));
    let hidden = boxes.append_new(root, BoxNode::block(Rect::new(0, 1000, 800, 100)));
    let _hidden_line =
        boxes.append_new(hidden, BoxNode::line(vec!["below".into()], Rect::new(0, 0, 800, 20)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));

    assert_eq!(backgrounds(&commands), vec![root, visible]);
    assert!(
        !commands
            .iter()
            .any(|command| matches!(command, DisplayCommand::InlineContent { .. }))
    );
}

#[test]
fn test_empty_clip_paints_only_the_root() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT));
    let _child = boxes.append_new(root, BoxNode::block(Rect::new(0, 0, 10, 10)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let ctx = RenderingContext::new(VIEWPORT).with_clip(Rect::default());
    let commands = paint(&mut boxes, &mut layers, ctx);

    assert_eq!(backgrounds(&commands), vec![root]);
}

#[test]
fn test_replaced_content_suppressed_when_interactive() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT));
    let image = boxes.append_new(root, BoxNode::replaced("logo.png", Rect::new(10, 10, 50, 50)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));
    assert_eq!(
        commands.last(),
        Some(&DisplayCommand::ReplacedContent {
            box_id: image,
            bounds: Rect::new(10, 10, 50, 50),
            source: "logo.png".to_string(),
        })
    );

    let interactive = RenderingContext::new(VIEWPORT).with_interactive(true);
    let commands = paint(&mut boxes, &mut layers, interactive);
    assert_eq!(backgrounds(&commands), vec![root, image]);
    assert!(
        !commands
            .iter()
            .any(|command| matches!(command, DisplayCommand::ReplacedContent { .. }))
    );
}

#[test]
fn test_replaced_master_paints_only_its_content() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT));
    let image = boxes.append_new(root, BoxNode::replaced("frame", Rect::new(0, 0, 20, 20)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let _ = layers.max_offset(&mut boxes).unwrap();

    let mut ctx = RenderingContext::new(VIEWPORT);
    Painter::new(&mut layers, &mut boxes)
        .paint_as_layer(&mut ctx, image)
        .unwrap();
    assert_eq!(ops(ctx.display_list.commands()), vec![("replaced_content", image)]);

    let mut ctx = RenderingContext::new(VIEWPORT).with_interactive(true);
    Painter::new(&mut layers, &mut boxes)
        .paint_as_layer(&mut ctx, image)
        .unwrap();
    assert!(ctx.display_list.is_empty());
}

#[test]
fn test_fixed_layer_anchors_to_viewport() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(Rect::new(0, 0, 800, 3000)));
    let style = BoxStyle::positioned(Position::Fixed).with_offsets(BoxOffsets {
        top: Some(10),
        left: Some(0),
        ..BoxOffsets::default()
    });
    let banner = boxes.append_new(root, BoxNode::block(Rect::new(0, 0, 100, 50)).with_style(style));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();

    let scrolled = Rect::new(0, 500, 800, 600);
    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(scrolled));
    let node = boxes.get(banner).unwrap();
    assert_eq!((node.abs_x, node.abs_y), (0, 510));
    assert_eq!(
        node.containing_block,
        Some(ContainingBlock::Viewport(Rect::new(0, 500, 799, 599)))
    );
    assert!(commands.contains(&DisplayCommand::Background {
        box_id: banner,
        bounds: Rect::new(0, 510, 100, 50),
        color: None,
    }));

    let further = Rect::new(0, 800, 800, 600);
    let _ = paint(&mut boxes, &mut layers, RenderingContext::new(further));
    assert_eq!(boxes.get(banner).unwrap().abs_y, 810);
}

#[test]
fn test_list_markers_paint_master_first() {
    let mut boxes = BoxTree::new();
    let mut list = BoxNode::block(VIEWPORT);
    list.kind = BoxKind::Block(BlockData {
        list_marker: Some(ListMarker::Decimal(1)),
        formatting_context: None,
    });
    let root = boxes.alloc(list);
    let mut item = BoxNode::block(Rect::new(0, 0, 800, 20));
    item.kind = BoxKind::Block(BlockData {
        list_marker: Some(ListMarker::Square),
        formatting_context: None,
    });
    let item = boxes.append_new(root, item);
    let line = boxes.append_new(item, BoxNode::line(vec!["item".into()], Rect::new(0, 0, 40, 20)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));

    assert_eq!(
        ops(&commands)[4..],
        [
            ("inline_content", line),
            ("list_marker", root),
            ("list_marker", item),
        ]
    );
}

#[test]
fn test_child_layers_paint_their_own_subtrees() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(VIEWPORT));
    let card = layered(&mut boxes, root, Some(1));
    let inside = boxes.append_new(card, BoxNode::block(Rect::new(5, 5, 10, 10)));
    let after = boxes.append_new(root, BoxNode::block(Rect::new(0, 100, 10, 10)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let commands = paint(&mut boxes, &mut layers, RenderingContext::new(VIEWPORT));

    assert_eq!(backgrounds(&commands), vec![root, after, card, inside]);
}

#[test]
fn test_display_list_serializes_with_op_tags() {
    let mut boxes = BoxTree::new();
    let root = boxes.alloc(BoxNode::block(Rect::new(0, 0, 10, 10)));

    let mut layers = LayerTreeBuilder::build(&boxes, root).unwrap();
    let mut ctx = RenderingContext::new(VIEWPORT);
    Painter::new(&mut layers, &mut boxes).paint_root(&mut ctx).unwrap();

    let json = serde_json::to_value(&ctx.display_list).unwrap();
    assert_eq!(json[0]["op"], "background");
    assert_eq!(json[0]["box_id"], 0);
    assert_eq!(json[1]["op"], "border");
    assert_eq!(json[0]["bounds"]["width"], 10);
}
