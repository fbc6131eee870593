use std::path::PathBuf;

use rrt_graph::visualize::{ObstacleLayer, SegmentLayer, SvgWriter, VisualLayer};

#[derive(clap::Args, Debug)]
pub struct PlotCommand {
    /// The search-tree edge list, one `x,y-x,y` edge per line
    #[clap(short, long, default_value = "results/graph.txt")]
    graph: PathBuf,
    /// The solution path, a single `x,y-x,y-...-` polyline
    #[clap(short, long, default_value = "results/path.txt")]
    path: PathBuf,
    /// JSON scene providing the obstacles and plot style, the built-in scene is used if omitted
    #[clap(short, long, env = "RRT_SCENE")]
    scene: Option<PathBuf>,
    /// Where to write the SVG figure
    #[clap(short, long, default_value = "results/plot.svg")]
    out: PathBuf,
}

impl PlotCommand {
    #[tracing::instrument(name = "Plot RRT", skip(self), fields(graph = ?self.graph, path = ?self.path))]
    pub fn run(self) -> eyre::Result<()> {
        let scene = crate::utils::load_scene(self.scene.as_deref())?;
        let graph = rrt_parser::parse_graph_file(&self.graph)?;
        let path = rrt_parser::parse_path_file(&self.path)?;

        tracing::info!(graph_edges = graph.len(), path_edges = path.len(), "Loaded graph and path");

        let style = &scene.plot;
        let layers: [&dyn VisualLayer; 3] = [
            &SegmentLayer::graph(&graph, style),
            &SegmentLayer::path(&path, style),
            &ObstacleLayer::new(&scene.obstacles, style),
        ];
        let svg = SvgWriter::write_svg(&layers, style)?;

        crate::utils::write_creating_dirs(&self.out, svg)?;
        tracing::info!(path = ?self.out, "Wrote SVG figure to path");

        Ok(())
    }
}
