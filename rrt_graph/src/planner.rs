use std::fmt::Write;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rrt_parser::{Point, Segments};

use crate::{obstacle::is_colliding, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrtConfig {
    /// Maximum distance a new vertex is placed from its nearest neighbour, also the goal tolerance.
    pub step_length: f64,
    /// Amount of vertices to add to the tree (`K`).
    pub iterations: usize,
    /// Stop as soon as the goal has been reached instead of running all iterations.
    pub stop_early: bool,
    /// How often a single iteration may resample after a collision before giving up.
    pub max_sample_attempts: usize,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            step_length: 0.3,
            iterations: 20_000,
            stop_early: false,
            max_sample_attempts: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeVertex {
    pub state: Point,
    /// Index of the parent in [PlannerOutput::tree], `None` only for the root.
    pub parent: Option<usize>,
}

pub struct RrtPlanner<'a, R = ChaCha8Rng> {
    scene: &'a Scene,
    config: RrtConfig,
    rng: R,
}

impl<'a> RrtPlanner<'a, ChaCha8Rng> {
    /// Create a planner with a reproducible random source.
    pub fn seeded(scene: &'a Scene, config: RrtConfig, seed: u64) -> Self {
        Self::new(scene, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> RrtPlanner<'a, R> {
    pub fn new(scene: &'a Scene, config: RrtConfig, rng: R) -> Self {
        Self { scene, config, rng }
    }

    pub fn run(&mut self) -> eyre::Result<PlannerOutput> {
        self.run_with_progress(|_| {})
    }

    /// Grow the tree from the scene's start, `on_iteration` is called after every added vertex.
    #[tracing::instrument(name = "Run RRT", skip_all, fields(k = self.config.iterations, step = self.config.step_length))]
    #[profiling::function]
    pub fn run_with_progress(&mut self, mut on_iteration: impl FnMut(usize)) -> eyre::Result<PlannerOutput> {
        let mut tree = Vec::with_capacity(self.config.iterations + 1);
        tree.push(TreeVertex {
            state: self.scene.start,
            parent: None,
        });
        let mut goal_vertex = None;
        let mut found_at_iteration = None;

        for i in 0..self.config.iterations {
            let (new_state, nearest) = self.sample_free(&tree, i)?;

            tree.push(TreeVertex {
                state: new_state,
                parent: Some(nearest),
            });
            crate::trace!(?new_state, nearest, "Added vertex");

            if goal_vertex.is_none() && new_state.distance(&self.scene.goal) < self.config.step_length {
                tracing::info!(iteration = i, "Found a path");
                goal_vertex = Some(tree.len() - 1);
                found_at_iteration = Some(i);
            }

            on_iteration(i);

            if goal_vertex.is_some() && self.config.stop_early {
                break;
            }
        }

        let output = PlannerOutput {
            tree,
            goal_vertex,
            found_at_iteration,
        };
        tracing::debug!(
            vertices = output.tree.len(),
            found = output.goal_vertex.is_some(),
            "Finished planning"
        );

        Ok(output)
    }

    /// Sample until a new vertex that doesn't collide is found, returns it with the index of its nearest neighbour.
    fn sample_free(&mut self, tree: &[TreeVertex], iteration: usize) -> eyre::Result<(Point, usize)> {
        for _ in 0..self.config.max_sample_attempts {
            let random_state = self.sample();
            let nearest = nearest_neighbour(tree, &random_state);
            let nearest_state = tree[nearest].state;
            let new_state = steer(&nearest_state, &random_state, self.config.step_length);

            if !is_colliding(&self.scene.obstacles, &nearest_state, &new_state) {
                return Ok((new_state, nearest));
            }
            crate::debug!(?new_state, "Rejected colliding sample");
        }

        eyre::bail!(
            "No collision-free vertex found in iteration {iteration} after {} attempts",
            self.config.max_sample_attempts
        )
    }

    fn sample(&mut self) -> Point {
        let bounds = &self.scene.bounds;
        Point::new(
            self.rng.random_range(bounds.min.x..bounds.max.x),
            self.rng.random_range(bounds.min.y..bounds.max.y),
        )
    }
}

/// Linear scan for the closest vertex, the first one wins on ties.
fn nearest_neighbour(tree: &[TreeVertex], state: &Point) -> usize {
    let mut min_dist = f64::MAX;
    let mut nearest = 0;
    for (i, v) in tree.iter().enumerate() {
        let distance = state.distance(&v.state);
        if distance < min_dist {
            min_dist = distance;
            nearest = i;
        }
    }
    nearest
}

/// Move from `from` towards `towards`, at most `step_length` far.
fn steer(from: &Point, towards: &Point, step_length: f64) -> Point {
    let distance = towards.distance(from);
    let step = (step_length / distance).min(1.0);

    *from + (*towards - *from) * step
}

#[derive(Debug, Clone)]
pub struct PlannerOutput {
    /// All vertices in insertion order, the root (start) first.
    pub tree: Vec<TreeVertex>,
    /// The first vertex that came within a step of the goal.
    pub goal_vertex: Option<usize>,
    pub found_at_iteration: Option<usize>,
}

impl PlannerOutput {
    /// The solution from the vertex near the goal back to the start, empty if none was found.
    pub fn solution(&self) -> Vec<Point> {
        let mut out = Vec::new();
        let mut current = self.goal_vertex;
        while let Some(idx) = current {
            let v = &self.tree[idx];
            out.push(v.state);
            current = v.parent;
        }
        out
    }

    pub fn path_length(&self) -> f64 {
        self.solution().windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    /// Every tree edge as `(new vertex, parent)`, in insertion order.
    pub fn tree_segments(&self) -> Segments {
        let mut out = Segments::with_capacity(self.tree.len().saturating_sub(1));
        for v in &self.tree {
            if let Some(parent) = v.parent {
                out.push(v.state, self.tree[parent].state);
            }
        }
        out
    }

    pub fn path_segments(&self) -> Segments {
        let solution = self.solution();
        let mut out = Segments::with_capacity(solution.len().saturating_sub(1));
        for pair in solution.windows(2) {
            out.push(pair[0], pair[1]);
        }
        out
    }

    /// Serialise the tree in the graph file format, one `new-parent` line per added vertex.
    pub fn to_graph_txt(&self) -> String {
        let mut output = String::new();
        for edge in self.tree_segments().iter() {
            // Writing into a String can't fail
            let _ = writeln!(&mut output, "{}-{}", edge.head, edge.tail);
        }
        output
    }

    /// Serialise the solution in the path file format, every point followed by a `-`.
    pub fn to_path_txt(&self) -> String {
        let mut output = String::new();
        for point in self.solution() {
            let _ = write!(&mut output, "{point}-");
        }
        output
    }
}
