use std::fmt::Debug;
use std::path::Path;

use eyre::WrapErr;
use rrt_parser::Point;

use crate::{obstacle::Obstacle, visualize::PlotStyle};

/// The sampling window of the planner.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Everything about a planning problem that isn't the algorithm itself.
///
/// Any field missing from a scene file falls back to [Scene::default].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Scene {
    pub bounds: Bounds,
    pub start: Point,
    pub goal: Point,
    pub obstacles: Vec<Obstacle>,
    pub plot: PlotStyle,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            bounds: Bounds {
                min: Point::new(0.0, 0.0),
                max: Point::new(10.0, 10.0),
            },
            start: Point::new(5.0, 5.0),
            goal: Point::new(9.0, 9.5),
            obstacles: vec![
                Obstacle::rect((1.0, 1.0), (3.0, 3.0)),
                Obstacle::rect((8.0, 1.0), (9.0, 9.0)),
                Obstacle::rect((6.0, 6.0), (7.0, 7.0)),
            ],
            plot: PlotStyle::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("{what} `{point}` has a negative or non-finite coordinate, which the graph and path files can't represent")]
    InvalidCoordinate { what: String, point: Point },
    #[error("Bounds must span a non-empty area, got min `{min}` and max `{max}`")]
    EmptyBounds { min: Point, max: Point },
    #[error("Obstacle {index} is degenerate")]
    DegenerateObstacle { index: usize },
    #[error("The start `{0}` lies inside an obstacle")]
    StartBlocked(Point),
}

impl Scene {
    /// Load a scene from a JSON file and validate it.
    #[tracing::instrument(level = "debug")]
    pub fn load(scene_path: impl AsRef<Path> + Debug) -> eyre::Result<Self> {
        let txt = std::fs::read_to_string(scene_path.as_ref())
            .wrap_err_with(|| format!("Failed to read scene file `{}`", scene_path.as_ref().display()))?;
        let scene: Scene = serde_json::from_str(&txt).wrap_err("Invalid scene file")?;
        scene.validate()?;

        tracing::debug!(obstacles = scene.obstacles.len(), "Loaded scene");
        Ok(scene)
    }

    /// Check the invariants the planner and the file formats rely on.
    pub fn validate(&self) -> Result<(), SceneError> {
        let check = |what: &str, point: &Point| {
            // `-0.0` would be written with a sign, which collides with the `-` separator.
            let representable = |c: f64| c.is_finite() && c.is_sign_positive();
            if representable(point.x) && representable(point.y) {
                Ok(())
            } else {
                Err(SceneError::InvalidCoordinate {
                    what: what.into(),
                    point: *point,
                })
            }
        };

        check("Bounds minimum", &self.bounds.min)?;
        check("Bounds maximum", &self.bounds.max)?;
        check("Start", &self.start)?;
        check("Goal", &self.goal)?;

        if self.bounds.min.x >= self.bounds.max.x || self.bounds.min.y >= self.bounds.max.y {
            return Err(SceneError::EmptyBounds {
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        for (index, obstacle) in self.obstacles.iter().enumerate() {
            for point in obstacle.points() {
                check("Obstacle vertex", point)?;
            }

            let degenerate = match obstacle {
                Obstacle::Rect { bottom_left, top_right } => bottom_left.x >= top_right.x || bottom_left.y >= top_right.y,
                Obstacle::Polygon { vertices } => vertices.len() < 3,
            };
            if degenerate {
                return Err(SceneError::DegenerateObstacle { index });
            }
        }

        if crate::obstacle::is_colliding(&self.obstacles, &self.start, &self.start) {
            return Err(SceneError::StartBlocked(self.start));
        }

        Ok(())
    }
}
