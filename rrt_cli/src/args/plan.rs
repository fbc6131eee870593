use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::WrapErr;
use indicatif::ProgressStyle;
use rrt_graph::planner::{PlannerOutput, RrtConfig, RrtPlanner};
use serde_with::{serde_as, DurationSecondsWithFrac};
use tracing_indicatif::span_ext::IndicatifSpanExt;

#[derive(clap::Args, Debug)]
pub struct PlanCommand {
    /// JSON scene providing bounds, start, goal and obstacles, the built-in scene is used if omitted
    #[clap(short, long, env = "RRT_SCENE")]
    scene: Option<PathBuf>,
    /// Directory to write `graph.txt` and `path.txt` into
    #[clap(short, long, default_value = "results")]
    out_dir: PathBuf,
    /// Maximum distance between a new vertex and its nearest neighbour
    #[clap(long, default_value_t = 0.3)]
    step: f64,
    /// Amount of vertices to add to the tree
    #[clap(short, default_value_t = 20_000)]
    k: usize,
    /// Stop as soon as the goal has been reached
    #[clap(long)]
    stop_early: bool,
    /// Seed for the random sampler, a random seed is picked (and logged) if omitted
    #[clap(long)]
    seed: Option<u64>,
    /// How often one iteration may resample after a collision before planning fails
    #[clap(long, default_value_t = 10_000)]
    max_attempts: usize,
    /// Append a row of run statistics to this csv file
    #[clap(long)]
    stats: Option<PathBuf>,
}

#[serde_as]
#[derive(serde::Serialize, Debug)]
struct PlanCsvOutput {
    seed: u64,
    iterations: usize,
    step_length: f64,
    vertices: usize,
    found_at_iteration: Option<usize>,
    path_vertices: usize,
    path_length: f64,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    planning_time: Duration,
}

impl PlanCommand {
    #[tracing::instrument(name = "Plan RRT", skip(self), fields(k = self.k, step = self.step))]
    pub fn run(self) -> eyre::Result<()> {
        if !(self.step > 0.0) {
            eyre::bail!("Step length must be positive, got `{}`", self.step);
        }

        let scene = crate::utils::load_scene(self.scene.as_deref())?;
        let config = RrtConfig {
            step_length: self.step,
            iterations: self.k,
            stop_early: self.stop_early,
            max_sample_attempts: self.max_attempts,
        };
        let seed = self.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, "Using seed");

        let span = tracing::info_span!("Growing tree");
        span.pb_set_style(&ProgressStyle::with_template(
            "{spinner} {span_name} [{wide_bar}] {pos}/{len} ({eta})",
        )?);
        span.pb_set_length(config.iterations as u64);

        let now = std::time::Instant::now();
        let output = span.in_scope(|| {
            RrtPlanner::seeded(&scene, config, seed).run_with_progress(|_| span.pb_inc(1))
        })?;
        let planning_time = now.elapsed();
        drop(span);

        match output.found_at_iteration {
            Some(i) => tracing::info!(
                iteration = i,
                path_length = output.path_length(),
                elapsed = ?planning_time,
                "Planning done"
            ),
            None => tracing::warn!(elapsed = ?planning_time, "Planning done, the goal was never reached"),
        }

        let graph_path = self.out_dir.join("graph.txt");
        let path_path = self.out_dir.join("path.txt");
        crate::utils::write_creating_dirs(&graph_path, output.to_graph_txt())?;
        tracing::info!(path = ?graph_path, "Wrote graph to path");
        crate::utils::write_creating_dirs(&path_path, output.to_path_txt())?;
        tracing::info!(path = ?path_path, "Wrote solution to path");

        if let Some(stats_path) = &self.stats {
            Self::append_stats(stats_path, Self::stats_row(&output, &config, seed, planning_time))?;
            tracing::info!(path = ?stats_path, "Appended statistics");
        }

        Ok(())
    }

    fn stats_row(output: &PlannerOutput, config: &RrtConfig, seed: u64, planning_time: Duration) -> PlanCsvOutput {
        PlanCsvOutput {
            seed,
            iterations: config.iterations,
            step_length: config.step_length,
            vertices: output.tree.len(),
            found_at_iteration: output.found_at_iteration,
            path_vertices: output.solution().len(),
            path_length: output.path_length(),
            planning_time,
        }
    }

    /// Append a single row, writing the header only when the file is new or empty.
    fn append_stats(stats_path: &Path, row: PlanCsvOutput) -> eyre::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(stats_path)
            .wrap_err_with(|| format!("Failed to open `{}`", stats_path.display()))?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::default()
            .has_headers(is_empty)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;

        Ok(())
    }
}
