use plan::PlanCommand;
use plot::PlotCommand;

pub mod plan;
pub mod plot;

#[derive(clap::Parser, Debug)]
#[clap(version, about)]
pub struct ClapArgs {
    #[clap(subcommand)]
    pub commands: SubCommands,
}

#[derive(clap::Subcommand, Debug)]
pub enum SubCommands {
    /// Draw a search-tree graph file and a solution path file into an SVG figure
    ///
    /// Defaults to the `results/graph.txt` and `results/path.txt` files written by `plan`.
    #[clap(alias = "p")]
    Plot(PlotCommand),
    /// Run the RRT planner and write its graph and path files
    #[clap(alias = "r")]
    Plan(PlanCommand),
}
