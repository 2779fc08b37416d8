use chordial_core::Dataset;
use chordial_render::{DiagramRenderer, ShapeKey, Surface, SvgRenderOptions};

#[test]
fn value_change_updates_in_place_and_animates_geometry() {
    let mut renderer = DiagramRenderer::default();
    let surface = Surface::new(800.0, 400.0).unwrap();

    renderer
        .render(&Dataset::series(vec![3.0, 7.0, 5.0]), surface)
        .unwrap();
    let out = renderer
        .render(&Dataset::series(vec![4.0, 7.0, 5.0]), surface)
        .unwrap();

    // Same bar identities, so nothing enters or exits.
    assert!(out.plan.is_noop());
    assert_eq!(out.plan.update.len(), 3);
    // Only the changed bar animates.
    assert_eq!(out.svg.matches(r#"attributeName="height""#).count(), 1);
    assert_eq!(out.svg.matches(r#"attributeName="y""#).count(), 1);
}

#[test]
fn removed_bar_exits_while_the_rest_update() {
    let mut renderer = DiagramRenderer::default();
    let surface = Surface::new(800.0, 400.0).unwrap();

    renderer
        .render(&Dataset::series(vec![3.0, 7.0, 5.0]), surface)
        .unwrap();
    let out = renderer
        .render(&Dataset::series(vec![3.0, 7.0]), surface)
        .unwrap();

    assert_eq!(out.plan.exit, vec![ShapeKey::Bar(2)]);
    assert!(out.svg.contains(r#"class="exiting""#));
}

#[test]
fn sankey_node_identity_survives_reordering() {
    let mut renderer = DiagramRenderer::default();
    let surface = Surface::new(700.0, 300.0).unwrap();

    let first: Dataset = serde_json::from_value(serde_json::json!({
        "type": "graph",
        "nodes": [{"name": "A"}, {"name": "B"}],
        "links": [{"source": "A", "target": "B", "value": 5.0}],
    }))
    .unwrap();
    let second: Dataset = serde_json::from_value(serde_json::json!({
        "type": "graph",
        "nodes": [{"name": "B"}, {"name": "A"}, {"name": "C"}],
        "links": [
            {"source": "A", "target": "B", "value": 5.0},
            {"source": "B", "target": "C", "value": 2.0},
        ],
    }))
    .unwrap();

    renderer.render(&first, surface).unwrap();
    let out = renderer.render(&second, surface).unwrap();

    // A and B keep their identity by name; only C and its link enter.
    assert!(out.plan.enter.contains(&ShapeKey::Node("C".to_string())));
    assert!(out.plan.update.contains(&ShapeKey::Node("A".to_string())));
    assert!(out.plan.update.contains(&ShapeKey::Flow {
        source: "A".to_string(),
        target: "B".to_string(),
    }));
    assert!(out.plan.exit.is_empty());
}

#[test]
fn chord_svg_embeds_gradients_and_tooltips() {
    let mut renderer = DiagramRenderer::new(SvgRenderOptions {
        diagram_id: Some("flows".to_string()),
        ..Default::default()
    });
    let out = renderer
        .render(
            &Dataset::matrix(vec![vec![10.0, 5.0], vec![5.0, 10.0]]),
            Surface::new(800.0, 800.0).unwrap(),
        )
        .unwrap();

    assert!(out.svg.contains(r#"id="flows""#));
    assert!(out.svg.contains("flows-group-gradient-even"));
    assert!(out.svg.contains("flows-group-gradient-odd"));
    assert!(out.svg.contains("<title>Value: 15</title>"));
    assert!(out.svg.contains(":hover"));
}

#[test]
fn tooltips_can_be_disabled() {
    let mut renderer = DiagramRenderer::new(SvgRenderOptions {
        include_tooltips: false,
        ..Default::default()
    });
    let out = renderer
        .render(
            &Dataset::series(vec![1.0, 2.0]),
            Surface::new(800.0, 400.0).unwrap(),
        )
        .unwrap();
    assert!(!out.svg.contains("<title>"));
    assert!(!out.svg.contains(":hover"));
}
