use anyhow::Context;
use macroquad::prelude::*;
use macroquad_tmx_grid::{GridCoord, Layout, LayoutChild, LoadOptions};
use std::collections::HashMap;

// usage: cargo run --example inspect_map -- [map.tmx] [options.json] [layer...]
fn window_conf() -> Conf {
    Conf {
        window_title: "Inspect Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// Flat colours stand in for textures so any map can be shown without assets.
fn palette() -> HashMap<String, Color> {
    HashMap::from([
        ("grass".to_string(), DARKGREEN),
        ("wall".to_string(), GRAY),
        ("hero".to_string(), GOLD),
    ])
}

fn report(layout: &Layout<Color>) -> anyhow::Result<()> {
    println!(
        "{}x{} cells of {}x{} px, {:?}",
        layout.number_of_columns(),
        layout.number_of_rows(),
        layout.base.tile_w,
        layout.base.tile_h,
        layout.orientation
    );
    for child in layout.children() {
        match child {
            LayoutChild::Tiles(layer) => {
                println!(
                    "layer {:?}: {} tiles, source {}",
                    layer.name,
                    layer.placed_count(),
                    layer.tile_source().map_or("-".to_string(), |ts| ts.display_name())
                );
                for (cell, placed) in layer.placed().take(3) {
                    let props = serde_json::to_string(&placed.tile.properties)?;
                    println!("  ({}, {}) gid {} {}", cell.col, cell.row, placed.gid, props);
                }
            }
            LayoutChild::Objects(group) => {
                println!("objects {:?}: {}", group.name, group.objects.len());
                for obj in &group.objects {
                    println!("  {:?} at {}", obj.name, obj.position);
                }
            }
        }
    }
    for warning in &layout.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().map_or("assets/demo.tmx", String::as_str);
    let options = match args.get(1) {
        Some(p) => LoadOptions::from_json_file(p).with_context(|| format!("reading options {p}"))?,
        None => LoadOptions::default(),
    };
    let obstacles: Vec<&str> = args.iter().skip(2).map(String::as_str).collect();

    let layout = macroquad_tmx_grid::load_file(path, palette(), &options)
        .with_context(|| format!("loading {path}"))?;
    report(&layout)?;

    let graph = if obstacles.is_empty() {
        layout.grid_graph()
    } else {
        layout.grid_graph_for(&obstacles)
    };
    println!("grid graph: {} of {} cells walkable", graph.node_count(), layout.base.cell_count());

    let cell = 32.0;
    let rows = layout.number_of_rows();
    loop {
        clear_background(BLACK);
        for layer in &layout.layers {
            for (GridCoord { col, row }, placed) in layer.placed() {
                let y = (rows - 1 - row) as f32 * cell;
                draw_rectangle(col as f32 * cell, y, cell - 1.0, cell - 1.0, *placed.texture());
            }
        }
        for node in graph.nodes() {
            let y = (rows - 1 - node.row) as f32 * cell;
            draw_circle(node.col as f32 * cell + cell * 0.5, y + cell * 0.5, 3.0, WHITE);
        }
        draw_text(&format!("FPS: {}", get_fps()), screen_width() - 135.0, 55.0, 30.0, RED);
        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err:#}");
    }
}
