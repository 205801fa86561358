use clap::{Parser, ValueEnum};
use cmap::buffer::MeshBuffer;
use cmap::map::CombinatorialMap;
use cmap::primitive;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Shape {
    Polygon,
    Tetrahedron,
    Pyramid,
    Prism,
    Cube,
}

/// Builds a reference shape and prints the orbits of its combinatorial map.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    #[arg(value_enum, default_value_t = Shape::Pyramid)]
    shape: Shape,
    /// Number of sides of the polygon, pyramid base, or prism cap.
    #[arg(short, long, default_value_t = 4)]
    sides: usize,
    /// Writes a DOT graph of orbit incidence to the given path (`-` for
    /// standard output).
    #[arg(long)]
    dot: Option<PathBuf>,
    /// Increases logging verbosity. May be repeated.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_filter_from_level(level: u8) -> log::LevelFilter {
    match level {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(log_filter_from_level(args.verbose))
        .init();

    let (map, embedding) = match args.shape {
        Shape::Polygon => {
            let polygon = primitive::polygon(args.sides)?;
            (polygon.map, polygon.embedding)
        }
        Shape::Tetrahedron => {
            let pyramid = primitive::tetrahedron();
            (pyramid.map, pyramid.embedding)
        }
        Shape::Pyramid => {
            let pyramid = primitive::pyramid(args.sides)?;
            (pyramid.map, pyramid.embedding)
        }
        Shape::Prism => {
            let prism = primitive::prism(args.sides)?;
            (prism.map, prism.embedding)
        }
        Shape::Cube => {
            let cube = primitive::cube();
            (cube.map, cube.embedding)
        }
    };
    map.validate()?;
    log::info!("built {:?} with {} darts", args.shape, map.len());

    report(&map);
    let buffer = MeshBuffer::<u32>::from_map(&map, &embedding)?;
    println!(
        "buffer:   {} vertices, {} triangles",
        buffer.as_vertex_slice().len(),
        buffer.triangle_count()
    );

    if let Some(path) = args.dot {
        if path.as_os_str() == "-" {
            map.export_graph(io::stdout().lock())?;
        }
        else {
            let mut sink = BufWriter::new(File::create(&path)?);
            map.export_graph(&mut sink)?;
            sink.flush()?;
            log::info!("wrote DOT graph to {}", path.display());
        }
    }
    Ok(())
}

fn report(map: &CombinatorialMap) {
    let vertices = map.vertices();
    let edges = map.edges();
    let faces = map.faces();
    println!("darts:    {}", map.len());
    println!("vertices: {}", vertices.len());
    println!("edges:    {}", edges.len());
    println!(
        "faces:    {} (arities {:?})",
        faces.len(),
        faces.iter().map(|face| face.len()).collect::<Vec<_>>()
    );
    println!("closed:   {}", map.is_closed());
    println!("euler:    {}", map.euler());
}
