// tests/map_tests.rs

use macroquad::prelude::vec2;
use macroquad_tmx_grid::{
    parse_events, parse_str, Attributes, LayoutChild, LoadOptions, LoadWarning, MapError, Orientation, ParserSession,
    TmxEvent, GID_MASK,
};
use std::collections::HashMap;

fn textures() -> HashMap<String, char> {
    HashMap::from([("a".to_string(), 'a'), ("b".to_string(), 'b')])
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn tile_definitions_resolve_after_their_scope_closes() {
    let tex = textures();
    let mut session = ParserSession::new(&tex, LoadOptions::default());
    session
        .start_element(
            "map",
            &attrs(&[("orientation", "orthogonal"), ("width", "2"), ("height", "2"), ("tilewidth", "8"), ("tileheight", "8")]),
        )
        .expect("map");
    session.start_element("tileset", &attrs(&[("name", "ts"), ("firstgid", "10")])).expect("tileset");
    session.start_element("tile", &attrs(&[("id", "2")])).expect("tile");
    session.start_element("image", &attrs(&[("source", "img/b.png")])).expect("image");
    session.end_element("image").expect("image end");
    assert!(session.registry().resolve(12).is_none(), "not registered while open");

    session.end_element("tile").expect("tile end");
    let entry = session.registry().resolve(12).expect("registered on close");
    assert_eq!(entry.tile.local_id, 2);
    assert_eq!(entry.tile.texture, 'b');
    assert_eq!(entry.tileset.name.as_deref(), Some("ts"));
    assert_eq!(session.registry().texture_of(12), Some(&'b'));
    assert!(session.warnings().is_empty());
}

#[test]
fn flip_flags_are_stripped_from_placements() {
    let flipped = (0x8000_0000u32 | 1).to_string();
    let xml = format!(
        r#"<map orientation="orthogonal" width="1" height="1" tilewidth="8" tileheight="8">
  <tileset firstgid="1" name="t"><tile id="0"><image source="a.png"/></tile></tileset>
  <layer name="l"><data><tile gid="{flipped}"/></data></layer>
</map>"#
    );
    let layout = parse_str(&xml, &textures(), &LoadOptions::default()).expect("parse");
    let placed = layout.layers[0].tile_at(0, 0).expect("placed");
    assert_eq!(placed.gid, 1);
    assert_eq!(placed.gid & !GID_MASK, 0);
}

#[test]
fn every_layer_matches_the_base_grid() {
    let xml = r#"<map orientation="isometric" width="3" height="2" tilewidth="16" tileheight="8">
  <tileset firstgid="1" name="t"><tile id="0"><image source="a.png"/></tile></tileset>
  <layer name="empty"><data></data></layer>
  <layer name="partial" offsetx="4" offsety="2"><data><tile gid="1"/></data></layer>
  <objectgroup name="g" offsetx="1" offsety="1"></objectgroup>
</map>"#;
    let layout = parse_str(xml, &textures(), &LoadOptions::default()).expect("parse");
    assert_eq!(layout.orientation, Orientation::Isometric);
    for layer in &layout.layers {
        assert_eq!(layer.columns(), 3);
        assert_eq!(layer.rows(), 2);
        assert_eq!(layer.cell_count(), 6);
        assert!(layer.placed_count() <= layer.cell_count());
    }

    let empty = layout.layer_named("empty").expect("empty");
    assert!(empty.is_empty());
    assert_eq!(empty.position, vec2(0.0, 0.0));

    let partial = layout.layer_named("partial").expect("partial");
    assert!(!partial.is_empty());
    assert_eq!(partial.position, vec2(4.0, -2.0));
    assert!(partial.tile_at(0, 1).is_some());

    let group = layout.object_group_named("g").expect("group");
    assert_eq!(group.position, vec2(1.0, -1.0));

    let kinds: Vec<bool> = layout.children().map(|c| matches!(c, LayoutChild::Tiles(_))).collect();
    assert_eq!(kinds, vec![true, true, false]);

    let dump = format!("{layout:?}");
    assert!(dump.starts_with("Layout"));
    assert!(format!("{:?}", layout.children().last().expect("child")).starts_with("Objects"));
}

#[test]
fn event_stream_and_xml_agree() {
    let xml = r#"<map orientation="orthogonal" width="2" height="1" tilewidth="4" tileheight="4">
  <tileset firstgid="1" name="t"><tile id="0"><image source="a.png"/></tile><tile id="1"><image source="b.png"/></tile></tileset>
  <layer name="l"><data><tile gid="2"/><tile gid="1"/></data></layer>
</map>"#;
    let from_xml = parse_str(xml, &textures(), &LoadOptions::default()).expect("xml");

    let mut events = vec![TmxEvent::start(
        "map",
        &[("orientation", "orthogonal"), ("width", "2"), ("height", "1"), ("tilewidth", "4"), ("tileheight", "4")],
    )];
    events.push(TmxEvent::start("tileset", &[("firstgid", "1"), ("name", "t")]));
    for (id, src) in [("0", "a.png"), ("1", "b.png")] {
        events.push(TmxEvent::start("tile", &[("id", id)]));
        events.extend(TmxEvent::empty("image", &[("source", src)]));
        events.push(TmxEvent::end("tile"));
    }
    events.push(TmxEvent::end("tileset"));
    events.push(TmxEvent::start("layer", &[("name", "l")]));
    events.push(TmxEvent::start("data", &[]));
    events.extend(TmxEvent::empty("tile", &[("gid", "2")]));
    events.extend(TmxEvent::empty("tile", &[("gid", "1")]));
    events.push(TmxEvent::end("data"));
    events.push(TmxEvent::end("layer"));
    events.push(TmxEvent::end("map"));
    let from_events = parse_events(events, &textures(), &LoadOptions::default()).expect("events");

    let textures_of = |layout: &macroquad_tmx_grid::Layout<char>| -> Vec<Option<char>> {
        layout.layers[0].cells().map(|(_, t)| t.map(|p| *p.texture())).collect()
    };
    assert_eq!(textures_of(&from_xml), vec![Some('b'), Some('a')]);
    assert_eq!(textures_of(&from_xml), textures_of(&from_events));
}

#[test]
fn tiles_before_the_map_are_rejected() {
    let events = vec![TmxEvent::start("layer", &[("name", "early")])];
    let err = parse_events(events, &textures(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, MapError::MissingGeometry { .. }));
}

#[test]
fn warnings_do_not_abort_the_load() {
    let xml = r#"<map orientation="orthogonal" width="1" height="1" tilewidth="4" tileheight="4">
  <tileset name="nofirst"><tile id="0"><image source="a.png"/></tile></tileset>
  <layer name="l"><data><tile gid="7"/></data></layer>
</map>"#;
    let layout = parse_str(xml, &textures(), &LoadOptions::default()).expect("parse");
    assert!(layout.warnings.contains(&LoadWarning::TilesetWithoutFirstGid {
        name: Some("nofirst".into())
    }));
    assert!(layout.warnings.contains(&LoadWarning::UnassignedGid {
        gid: 7,
        layer: Some("l".into())
    }));
    assert_eq!(layout.layers[0].placed_count(), 0);
}
