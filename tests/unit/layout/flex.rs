use super::*;

const INK: Rgba8Premul = Rgba8Premul::opaque(0, 0, 0);

fn canvas() -> Canvas {
    Canvas {
        width: 1000,
        height: 1000,
    }
}

fn boxed(w: f64, h: f64) -> Node {
    Node::image(Size::new(w, h), 0.0)
}

#[test]
fn text_box_uses_monospace_metrics() {
    let s = text_box("Picas y Fijas", 64.0);
    assert!((s.width - 13.0 * 0.6 * 64.0).abs() < 1e-9);
    assert!((s.height - 1.48 * 64.0).abs() < 1e-9);
    assert_eq!(text_box("Número", 10.0).width, 6.0 * 0.6 * 10.0);
}

#[test]
fn column_measure_sums_heights_and_gaps() {
    let col = Node::column(40.0, vec![boxed(300.0, 300.0), boxed(100.0, 50.0)]);
    assert_eq!(col.measure(), Size::new(300.0, 390.0));
    assert_eq!(Node::row(10.0, vec![]).measure(), Size::ZERO);
}

#[test]
fn single_leaf_is_centered_in_canvas() {
    let nodes = layout(&boxed(200.0, 100.0), canvas());
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].rect, Rect::new(400.0, 450.0, 600.0, 550.0));
}

#[test]
fn column_centers_children_on_cross_axis() {
    let col = Node::column(20.0, vec![boxed(300.0, 100.0), boxed(100.0, 100.0)]);
    let nodes = layout(&col, canvas());
    assert_eq!(nodes[0].rect, Rect::new(350.0, 390.0, 650.0, 490.0));
    assert_eq!(nodes[1].rect, Rect::new(450.0, 510.0, 550.0, 610.0));
}

#[test]
fn row_advances_by_width_and_gap() {
    let row = Node::row(20.0, (0..4).map(|_| boxed(80.0, 90.0)).collect());
    let nodes = layout(&row, canvas());
    let xs: Vec<f64> = nodes.iter().map(|n| n.rect.x0).collect();
    assert_eq!(xs, vec![310.0, 410.0, 510.0, 610.0]);
    assert!(nodes.iter().all(|n| n.rect.y0 == 455.0));
}

#[test]
fn opacity_multiplies_and_scale_stays_on_leaf() {
    let tree = Node::column(
        0.0,
        vec![Node::column(0.0, vec![boxed(10.0, 10.0).with_opacity(0.5).with_scale(2.0)])
            .with_opacity(0.5)],
    )
    .with_opacity(0.8);
    let nodes = layout(&tree, canvas());
    assert!((nodes[0].opacity - 0.2).abs() < 1e-12);
    assert_eq!(nodes[0].scale, 2.0);
    assert_eq!(nodes[0].rect.size(), Size::new(10.0, 10.0));
}

#[test]
fn backdrop_is_painted_first_with_shared_rect() {
    let tile = Node::text("1", FontRole::Bold, 72.0, INK)
        .with_size(Size::new(80.0, 90.0))
        .with_backdrop(DrawKind::Panel {
            fill: INK,
            radius: 12.0,
            border: None,
        });
    let nodes = layout(&tile, canvas());
    assert_eq!(nodes.len(), 2);
    assert!(matches!(nodes[0].kind, DrawKind::Panel { .. }));
    assert!(matches!(nodes[1].kind, DrawKind::Text { .. }));
    assert_eq!(nodes[0].rect, nodes[1].rect);
}
