// tests/graph_tests.rs

use macroquad_tmx_grid::{build_graph, build_graph_for_names, parse_str, GridCoord, Layout, LoadOptions};
use std::collections::HashMap;

fn load(layers: &str) -> Layout<u8> {
    let xml = format!(
        r#"<map orientation="orthogonal" width="3" height="2" tilewidth="4" tileheight="4">
  <tileset firstgid="1" name="t"><tile id="0"><image source="x.png"/></tile></tileset>
  {layers}
</map>"#
    );
    let textures = HashMap::from([("x".to_string(), 7u8)]);
    parse_str(&xml, &textures, &LoadOptions::default()).expect("parse")
}

#[test]
fn no_obstacles_keeps_every_cell() {
    let layout = load(r#"<layer name="empty"><data></data></layer>"#);
    let graph = layout.grid_graph();
    assert_eq!(graph.node_count(), 6);
    assert_eq!((graph.columns(), graph.rows()), (3, 2));
    let graph = build_graph(&layout, &[]);
    assert_eq!(graph.node_count(), 6);
}

#[test]
fn fully_occupied_layer_leaves_no_nodes() {
    let layout = load(r#"<layer name="full"><data encoding="csv">1,1,1,1,1,1</data></layer>"#);
    let graph = layout.grid_graph_for(&["full"]);
    assert_eq!(graph.node_count(), 0);
    assert!(graph.find_path(GridCoord::new(0, 0), GridCoord::new(2, 1)).is_none());
}

#[test]
fn overlapping_obstacles_are_removed_once() {
    // both layers fill the top-left cell (0, 1)
    let layout = load(
        r#"<layer name="a"><data><tile gid="1"/></data></layer>
  <layer name="b"><data><tile gid="1"/><tile gid="1"/></data></layer>"#,
    );
    let graph = layout.grid_graph_for(&["a", "b"]);
    assert_eq!(graph.node_count(), 4);
    assert!(!graph.contains(GridCoord::new(0, 1)));
    assert!(!graph.contains(GridCoord::new(1, 1)));
    assert!(graph.contains(GridCoord::new(2, 1)));

    let only_a = build_graph_for_names(&layout, &["a", "missing"]);
    assert_eq!(only_a.node_count(), 5);
}

#[test]
fn path_walks_around_obstacles() {
    // wall in the middle of the top row
    let layout = load(r#"<layer name="w"><data encoding="csv">0,1,0,0,0,0</data></layer>"#);
    let graph = layout.grid_graph_for(&["w"]);
    let path = graph
        .find_path(GridCoord::new(0, 1), GridCoord::new(2, 1))
        .expect("path");
    assert_eq!(path.first(), Some(&GridCoord::new(0, 1)));
    assert_eq!(path.last(), Some(&GridCoord::new(2, 1)));
    assert_eq!(path.len(), 5);
    for pair in path.windows(2) {
        let d = pair[0].col.abs_diff(pair[1].col) + pair[0].row.abs_diff(pair[1].row);
        assert_eq!(d, 1);
        assert!(graph.contains(pair[1]));
    }
}
