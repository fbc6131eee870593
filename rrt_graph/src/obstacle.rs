use itertools::Itertools;
use rrt_parser::{Edge, Point};

/// A static region of the scene which new tree vertices may not land in.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Obstacle {
    /// Axis-aligned box, boundaries included.
    Rect { bottom_left: Point, top_right: Point },
    /// Closed polygon, the last vertex implicitly connects back to the first.
    Polygon { vertices: Vec<Point> },
}

impl Obstacle {
    pub fn rect(bottom_left: impl Into<Point>, top_right: impl Into<Point>) -> Self {
        Obstacle::Rect {
            bottom_left: bottom_left.into(),
            top_right: top_right.into(),
        }
    }

    /// Whether the given point lies in this obstacle.
    ///
    /// Polygons use the even-odd rule, points exactly on a polygon boundary may go either way.
    pub fn contains(&self, point: &Point) -> bool {
        match self {
            Obstacle::Rect { bottom_left, top_right } => {
                point.x >= bottom_left.x && point.x <= top_right.x && point.y >= bottom_left.y && point.y <= top_right.y
            }
            Obstacle::Polygon { vertices } => {
                let mut inside = false;
                for (a, b) in vertices.iter().circular_tuple_windows() {
                    if (a.y > point.y) != (b.y > point.y) {
                        let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                        if point.x < x_cross {
                            inside = !inside;
                        }
                    }
                }
                inside
            }
        }
    }

    /// Check whether moving from `from` to `to` collides with this obstacle.
    ///
    /// Steps are assumed to be small compared to the obstacle, so only the destination is tested.
    #[inline]
    pub fn is_colliding(&self, _from: &Point, to: &Point) -> bool {
        self.contains(to)
    }

    /// The closed vertex loop of this obstacle, first vertex repeated at the end.
    pub fn outline(&self) -> Vec<Point> {
        let mut out = match self {
            Obstacle::Rect { bottom_left, top_right } => vec![
                *bottom_left,
                Point::new(top_right.x, bottom_left.y),
                *top_right,
                Point::new(bottom_left.x, top_right.y),
            ],
            Obstacle::Polygon { vertices } => vertices.clone(),
        };
        if let Some(&first) = out.first() {
            out.push(first);
        }
        out
    }

    pub fn outline_edges(&self) -> impl Iterator<Item = Edge> {
        self.outline()
            .into_iter()
            .tuple_windows()
            .map(|(head, tail)| Edge { head, tail })
    }

    pub fn points(&self) -> Box<dyn Iterator<Item = &Point> + '_> {
        match self {
            Obstacle::Rect { bottom_left, top_right } => Box::new([bottom_left, top_right].into_iter()),
            Obstacle::Polygon { vertices } => Box::new(vertices.iter()),
        }
    }
}

/// Detects a collision between any of the `obstacles` and the step from `from` to `to`
pub fn is_colliding(obstacles: &[Obstacle], from: &Point, to: &Point) -> bool {
    obstacles.iter().any(|obs| obs.is_colliding(from, to))
}

#[cfg(test)]
mod tests {
    use crate::obstacle::{is_colliding, Obstacle};
    use rrt_parser::Point;

    #[test]
    pub fn test_rect_inclusive() {
        let obs = Obstacle::rect((1.0, 1.0), (3.0, 3.0));

        assert!(obs.contains(&Point::new(1.0, 1.0)));
        assert!(obs.contains(&Point::new(2.0, 3.0)));
        assert!(!obs.contains(&Point::new(3.01, 2.0)));
        assert!(!obs.contains(&Point::new(0.0, 0.0)));
    }

    #[test]
    pub fn test_only_destination_counts() {
        let obstacles = [Obstacle::rect((1.0, 1.0), (3.0, 3.0))];
        let inside = Point::new(2.0, 2.0);
        let outside = Point::new(4.0, 4.0);

        assert!(!is_colliding(&obstacles, &inside, &outside));
        assert!(is_colliding(&obstacles, &outside, &inside));
    }

    #[test]
    pub fn test_polygon_contains() {
        let triangle = Obstacle::Polygon {
            vertices: vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)],
        };

        assert!(triangle.contains(&Point::new(1.0, 1.0)));
        assert!(!triangle.contains(&Point::new(3.0, 3.0)));
        assert!(!triangle.contains(&Point::new(-1.0, 1.0)));
    }

    #[test]
    pub fn test_rect_outline() {
        let obs = Obstacle::rect((8.0, 1.0), (9.0, 9.0));
        let outline = obs.outline();

        assert_eq!(
            outline,
            vec![
                Point::new(8.0, 1.0),
                Point::new(9.0, 1.0),
                Point::new(9.0, 9.0),
                Point::new(8.0, 9.0),
                Point::new(8.0, 1.0),
            ]
        );
        assert_eq!(obs.outline_edges().count(), 4);
    }

    #[test]
    pub fn test_serde_tag() {
        let obs: Obstacle =
            serde_json::from_str(r#"{"kind": "rect", "bottom_left": {"x": 6, "y": 6}, "top_right": {"x": 7, "y": 7}}"#)
                .unwrap();

        assert_eq!(obs, Obstacle::rect((6.0, 6.0), (7.0, 7.0)));
    }
}
