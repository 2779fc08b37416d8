use chordial_core::Dataset;
use chordial_render::{DiagramLayout, Surface, layout_dataset};

fn surface(w: f64, h: f64) -> Surface {
    Surface::new(w, h).unwrap()
}

#[test]
fn chord_layout_has_one_group_per_matrix_row() {
    let dataset = Dataset::matrix(vec![
        vec![11975.0, 5871.0, 8916.0, 2868.0],
        vec![1951.0, 10048.0, 2060.0, 6171.0],
        vec![8010.0, 16145.0, 8090.0, 8045.0],
        vec![1013.0, 990.0, 940.0, 6907.0],
    ]);
    let DiagramLayout::Chord(layout) = layout_dataset(&dataset, surface(800.0, 800.0)).unwrap()
    else {
        panic!("expected chord layout");
    };

    assert_eq!(layout.groups.len(), 4);
    assert_eq!(layout.inner_radius, 310.0);
    assert_eq!(layout.outer_radius, 320.0);
    for (i, group) in layout.groups.iter().enumerate() {
        assert_eq!(group.index, i);
        assert!(group.end_angle > group.start_angle);
    }
    // Groups are laid out clockwise without overlap.
    for pair in layout.groups.windows(2) {
        assert!(pair[1].start_angle >= pair[0].end_angle);
    }
}

#[test]
fn every_graph_link_appears_in_the_sankey_layout() {
    let dataset: Dataset = serde_json::from_value(serde_json::json!({
        "type": "graph",
        "nodes": [{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}],
        "links": [
            {"source": "A", "target": "B", "value": 5.0},
            {"source": "A", "target": "C", "value": 3.0},
            {"source": "B", "target": "D", "value": 5.0},
            {"source": "C", "target": "D", "value": 3.0},
        ],
    }))
    .unwrap();
    let DiagramLayout::Sankey(layout) = layout_dataset(&dataset, surface(700.0, 300.0)).unwrap()
    else {
        panic!("expected sankey layout");
    };

    assert_eq!(layout.nodes.len(), 4);
    assert_eq!(layout.links.len(), 4);
    for link in &layout.links {
        assert!(link.width > 0.0);
        // Links flow left to right between adjacent node edges.
        assert!(layout.nodes[link.source].x1 <= layout.nodes[link.target].x0);
    }
    // D absorbs everything, so it matches A's outgoing total.
    let a = layout.nodes.iter().find(|n| n.name == "A").unwrap();
    let d = layout.nodes.iter().find(|n| n.name == "D").unwrap();
    assert_eq!(a.value, 8.0);
    assert_eq!(d.value, 8.0);
}

#[test]
fn links_to_unknown_nodes_are_rejected_with_the_name() {
    let dataset: Dataset = serde_json::from_value(serde_json::json!({
        "type": "graph",
        "nodes": [{"name": "A"}, {"name": "B"}],
        "links": [{"source": "A", "target": "Z", "value": 1.0}],
    }))
    .unwrap();
    let err = layout_dataset(&dataset, surface(700.0, 300.0)).unwrap_err();
    assert!(err.to_string().contains("Z"));
}

#[test]
fn lower_hemisphere_labels_mirror() {
    let dataset = Dataset::matrix(vec![vec![10.0, 5.0], vec![5.0, 10.0]]);
    let DiagramLayout::Chord(layout) = layout_dataset(&dataset, surface(800.0, 800.0)).unwrap()
    else {
        panic!("expected chord layout");
    };

    let placements: Vec<_> = layout
        .groups
        .iter()
        .map(|g| g.label_placement(layout.outer_radius))
        .collect();
    assert!(!placements[0].mirrored);
    assert!(placements[1].mirrored);
    for placement in &placements {
        assert_eq!(placement.translate, layout.outer_radius + 5.0);
    }
}

#[test]
fn layout_is_a_pure_function_of_dataset_and_surface() {
    let datasets = [
        Dataset::matrix(vec![vec![10.0, 5.0], vec![5.0, 10.0]]),
        Dataset::series(vec![3.0, 7.0, 5.0, 9.0]),
    ];
    for dataset in &datasets {
        let s = Surface::default_for(dataset.kind());
        let a = layout_dataset(dataset, s).unwrap();
        let b = layout_dataset(dataset, s).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn layout_round_trips_through_json() {
    let dataset = Dataset::matrix(vec![vec![10.0, 5.0], vec![5.0, 10.0]]);
    let layout = layout_dataset(&dataset, surface(800.0, 800.0)).unwrap();
    let json = serde_json::to_string(&layout).unwrap();
    assert!(json.contains(r#""kind":"chord""#));
    let back: DiagramLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(layout, back);
}
