use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

use winnow::{ascii::float, PResult, Parser};

pub use datatypes::*;

mod datatypes;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read `{path}`")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed {position} `{input}`: {message}")]
    Format {
        position: Position,
        input: String,
        message: &'static str,
    },
}

/// Where in the input a [ParseError::Format] occurred, both 1-based.
///
/// Lines are counted after leading whitespace of the file has been trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Line(usize),
    Point(usize),
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Line(n) => write!(f, "line {n}"),
            Position::Point(n) => write!(f, "point {n}"),
        }
    }
}

/// Load and parse a search-tree edge list, see [parse_graph].
#[tracing::instrument(level = "debug")]
pub fn parse_graph_file(graph_path: impl AsRef<Path> + Debug) -> Result<Segments, ParseError> {
    let txt = read_file(graph_path.as_ref())?;
    let segments = parse_graph(&txt)?;

    tracing::debug!(edges = segments.len(), "Parsed graph file");
    Ok(segments)
}

/// Load and parse a solution polyline, see [parse_path].
#[tracing::instrument(level = "debug")]
pub fn parse_path_file(path_path: impl AsRef<Path> + Debug) -> Result<Segments, ParseError> {
    let txt = read_file(path_path.as_ref())?;
    let segments = parse_path(&txt)?;

    tracing::debug!(edges = segments.len(), "Parsed path file");
    Ok(segments)
}

/// Parse the contents of a graph file, one `x_h,y_h-x_t,y_t` edge per line.
///
/// After trimming the content and splitting on `\n` the final entry is discarded, and then the final remaining line is
/// discarded *again* before any line is parsed. This mirrors the convention of the files this was written for, so a
/// content of fewer than three lines never yields any edges.
pub fn parse_graph(content: &str) -> Result<Segments, ParseError> {
    let mut lines: Vec<&str> = content.trim().split('\n').collect();
    lines.pop();
    lines.pop();

    let mut out = Segments::with_capacity(lines.len());

    for (i, line) in lines.into_iter().enumerate() {
        let position = Position::Line(i + 1);
        let (head, tail) = line
            .split_once('-')
            .filter(|(_, tail)| !tail.contains('-'))
            .ok_or_else(|| format_error(position, line, "expected exactly one `-` between the two points"))?;

        out.push(parse_point(head, position)?, parse_point(tail, position)?);
    }

    Ok(out)
}

/// Parse the contents of a path file, a single `x_1,y_1-x_2,y_2-...-x_n,y_n-` polyline.
///
/// The entry after the final `-` is discarded, every consecutive pair of the remaining points becomes an edge.
pub fn parse_path(content: &str) -> Result<Segments, ParseError> {
    let mut raw_points: Vec<&str> = content.trim().split('-').collect();
    raw_points.pop();

    if raw_points.len() < 2 {
        return Ok(Segments::default());
    }

    let points = raw_points
        .into_iter()
        .enumerate()
        .map(|(i, raw)| parse_point(raw, Position::Point(i + 1)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = Segments::with_capacity(points.len() - 1);
    for pair in points.windows(2) {
        out.push(pair[0], pair[1]);
    }

    Ok(out)
}

/// Parse a single `x,y` pair.
///
/// Surrounding whitespace of either coordinate is ignored (any Unicode whitespace, not just ASCII), anything else must
/// be a float literal.
pub fn parse_point(input: &str, position: Position) -> Result<Point, ParseError> {
    let (x, y) = input
        .split_once(',')
        .filter(|(_, y)| !y.contains(','))
        .ok_or_else(|| format_error(position, input, "expected exactly one `,` between the coordinates"))?;

    let parse_coordinate = |raw: &str| {
        coordinate
            .parse(raw.trim())
            .map_err(|_| format_error(position, input, "coordinates must be floating point numbers"))
    };

    Ok(Point::new(parse_coordinate(x)?, parse_coordinate(y)?))
}

fn coordinate(input: &mut &str) -> PResult<f64> {
    float.parse_next(input)
}

fn format_error(position: Position, input: &str, message: &'static str) -> ParseError {
    ParseError::Format {
        position,
        input: input.into(),
        message,
    }
}

fn read_file(path: &Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|source| ParseError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use crate::{parse_graph, parse_graph_file, parse_path, parse_path_file, parse_point, ParseError, Point, Position};
    use std::io::Write;
    use std::path::PathBuf;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    pub fn test_graph_trailing_blank_lines_leave_nothing() {
        let segments = parse_graph("1,1-2,2\n3,3-4,4\n\n").unwrap();

        assert!(segments.is_empty());
        assert_eq!(segments.heads().len(), segments.tails().len());
    }

    #[test]
    pub fn test_graph_drops_two_trailing_lines() {
        let segments = parse_graph("1,1-2,2\n3,3-4,4\n5,5-6,6\n").unwrap();

        assert_eq!(segments.heads(), &[pt(1.0, 1.0)]);
        assert_eq!(segments.tails(), &[pt(2.0, 2.0)]);
    }

    #[test]
    pub fn test_graph_keeps_line_order() {
        let input = "0.5,1.25-3,4\n7.125,8-9,10.5\n1,2-3,4\nignored\nartifact\n";
        let segments = parse_graph(input).unwrap();

        assert_eq!(segments.len(), 3);
        let edges: Vec<_> = segments.iter().collect();
        assert_eq!(edges[0].head, pt(0.5, 1.25));
        assert_eq!(edges[0].tail, pt(3.0, 4.0));
        assert_eq!(edges[1].head, pt(7.125, 8.0));
        assert_eq!(edges[2].tail, pt(3.0, 4.0));
    }

    #[test]
    pub fn test_graph_short_inputs() {
        assert!(parse_graph("").unwrap().is_empty());
        assert!(parse_graph("   \n\n").unwrap().is_empty());
        assert!(parse_graph("1,1-2,2").unwrap().is_empty());
        assert!(parse_graph("1,1-2,2\nnot even an edge").unwrap().is_empty());
    }

    #[test]
    pub fn test_graph_never_parses_dropped_lines() {
        let segments = parse_graph("1,1-2,2\ngarbage\nmore garbage").unwrap();

        assert_eq!(segments.len(), 1);
    }

    #[test]
    pub fn test_graph_crlf() {
        let segments = parse_graph("1,1-2,2\r\n3,3-4,4\r\n5,5-6,6\r\n").unwrap();

        assert_eq!(segments.get(0).map(|e| e.tail), Some(pt(2.0, 2.0)));
    }

    #[test]
    pub fn test_graph_extra_comma_is_an_error() {
        let err = parse_graph("1,1,2-2,2\n3,3-4,4\n5,5-6,6").unwrap_err();

        match err {
            ParseError::Format { position, input, .. } => {
                assert_eq!(position, Position::Line(1));
                assert_eq!(input, "1,1,2");
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    pub fn test_graph_separator_count() {
        let missing = parse_graph("1,1 2,2\na\nb").unwrap_err();
        let extra = parse_graph("0,0-1,1\n1,1-2,2-3,3\na\nb").unwrap_err();

        assert!(matches!(missing, ParseError::Format { position: Position::Line(1), .. }));
        assert!(matches!(extra, ParseError::Format { position: Position::Line(2), .. }));
    }

    #[test]
    pub fn test_graph_non_numeric() {
        let err = parse_graph("1,1-2,two\na\nb").unwrap_err();

        assert!(matches!(err, ParseError::Format { position: Position::Line(1), .. }));
        println!("{err}");
    }

    #[test]
    pub fn test_point_whitespace() {
        assert_eq!(parse_point(" 1 , 2 ", Position::Line(1)).unwrap(), pt(1.0, 2.0));
        assert_eq!(parse_point("\u{a0}1,2\r", Position::Line(1)).unwrap(), pt(1.0, 2.0));
        assert_eq!(parse_point("1.5\u{2003},\t.5", Position::Line(1)).unwrap(), pt(1.5, 0.5));
    }

    #[test]
    pub fn test_point_literals() {
        assert_eq!(parse_point("1.,+2", Position::Line(1)).unwrap(), pt(1.0, 2.0));
        assert_eq!(parse_point("1e3,2", Position::Line(1)).unwrap(), pt(1000.0, 2.0));

        // Whitespace inside a number is not allowed, neither are digit group separators.
        assert!(parse_point("1 0,2", Position::Line(1)).is_err());
        assert!(parse_point("1_0,2", Position::Line(1)).is_err());
        assert!(parse_point(",2", Position::Line(1)).is_err());
    }

    #[test]
    pub fn test_path_three_points() {
        let (heads, tails) = parse_path("0,0-1,1-2,2-").unwrap().into_parts();

        assert_eq!(heads, vec![pt(0.0, 0.0), pt(1.0, 1.0)]);
        assert_eq!(tails, vec![pt(1.0, 1.0), pt(2.0, 2.0)]);
    }

    #[test]
    pub fn test_path_single_point() {
        assert!(parse_path("0,0-").unwrap().is_empty());
        assert!(parse_path("").unwrap().is_empty());
    }

    #[test]
    pub fn test_path_drops_final_segment_even_if_filled() {
        let segments = parse_path("0,0-1,1-2,2").unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments.get(0).map(|e| e.tail), Some(pt(1.0, 1.0)));
    }

    #[test]
    pub fn test_path_edge_count() {
        for n in 1..20 {
            let input: String = (0..n).map(|i| format!("{i}.5,{i}-")).collect();
            let segments = parse_path(&input).unwrap();

            assert_eq!(segments.len(), n - 1);
            assert_eq!(segments.heads().len(), segments.tails().len());
        }
    }

    #[test]
    pub fn test_path_bad_point() {
        let err = parse_path("0,0-1;1-2,2-").unwrap_err();

        assert!(matches!(err, ParseError::Format { position: Position::Point(2), .. }));
    }

    #[test]
    pub fn test_path_extra_comma_is_an_error() {
        let err = parse_path("1,1,2-2,2-3,3-").unwrap_err();

        match err {
            ParseError::Format { position, input, .. } => {
                assert_eq!(position, Position::Point(1));
                assert_eq!(input, "1,1,2");
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    pub fn test_missing_file() {
        let err = parse_graph_file("this/file/does/not/exist.txt").unwrap_err();

        assert!(matches!(err, ParseError::FileAccess { .. }));
    }

    #[test]
    pub fn test_missing_path_file() {
        let missing = PathBuf::from("this/file/does/not/exist/path.txt");
        let err = parse_path_file(&missing).unwrap_err();

        match err {
            ParseError::FileAccess { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    #[tracing_test::traced_test]
    pub fn test_path_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "9.1,9.4-8.9,9.2-5,5-").unwrap();

        let segments = parse_path_file(file.path()).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments.tails()[1], pt(5.0, 5.0));
        assert!(logs_contain("Parsed path file"));
    }

    #[test]
    pub fn test_fixtures() {
        let graph = parse_graph_file(example_dir().join("graph.txt")).unwrap();
        let path = parse_path_file(example_dir().join("path.txt")).unwrap();

        assert_eq!(graph.len(), 10);
        assert_eq!(path.len(), 4);
        // The path runs back from the goal to the start.
        assert_eq!(path.tails().last(), Some(&pt(5.0, 5.0)));
    }

    fn example_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("test_data")
    }
}
