//! A module for rendering a network as a 3D scene.
//!
//! A [`Scene`] pairs a node set (unique region names, 3D positions, label flags, marker styles)
//! with an edge set (name pairs, label flags, line styles). It draws onto a caller-supplied
//! plotters drawing area, so no implicit figure state is shared between calls, and it can export
//! a deterministic turntable frame sequence (`mov_000.png` ... `mov_119.png`) for external video
//! assembly.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::debug;
use nalgebra::{Point3, Vector3};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Marker size applied to nodes without an explicit size. Like a scatter plot's `s` parameter,
/// this is an area; the rendered pixel radius is `sqrt(size / pi)`.
pub const DEFAULT_NODE_SIZE: f64 = 50.0;
/// Marker colour applied to nodes without an explicit colour.
pub const DEFAULT_NODE_COLOR: RGBColor = GREEN;
/// Line width applied to edges without an explicit width.
pub const DEFAULT_EDGE_WIDTH: u32 = 1;
/// Line colour applied to edges without an explicit colour.
pub const DEFAULT_EDGE_COLOR: RGBColor = BLUE;
/// Opacity applied to nodes and edges without an explicit one.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Distance along the positive third axis between an element and its text label.
pub const LABEL_OFFSET: f64 = 0.05;

/// The camera elevation used for every turntable frame, in degrees.
pub const TURNTABLE_ELEVATION_DEG: f64 = 20.0;
/// The number of turntable frames: azimuth -270° to 90° exclusive, in 3° steps.
pub const TURNTABLE_FRAMES: usize = 120;

/// Pixel dimensions of exported frames.
const FRAME_SIZE: (u32, u32) = (900, 700);

/// The azimuth sweep of the turntable, in degrees.
pub fn turntable_azimuths() -> impl Iterator<Item = f64> {
    (0..TURNTABLE_FRAMES).map(|i| -270.0 + 3.0 * i as f64)
}

/// The reasons building or rendering a scene can fail.
#[derive(Debug)]
pub enum SceneError {
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    UnknownRegion(String),
    MissingDirectory(PathBuf),
    Render(String),
}

impl std::error::Error for SceneError {}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "{} has {} elements but {} were expected",
                what, found, expected
            ),
            Self::UnknownRegion(name) => {
                write!(f, "edge references unknown region '{}'", name)
            }
            Self::MissingDirectory(path) => {
                write!(f, "output directory '{}' does not exist", path.display())
            }
            Self::Render(msg) => write!(f, "error drawing scene: {}", msg),
        }
    }
}

/// Visual attributes of a node marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub size: f64,
    pub color: RGBColor,
    pub alpha: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_NODE_SIZE,
            color: DEFAULT_NODE_COLOR,
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Visual attributes of an edge line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub width: u32,
    pub color: RGBColor,
    pub alpha: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_EDGE_WIDTH,
            color: DEFAULT_EDGE_COLOR,
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// A view direction, matching the elevation/azimuth convention of 3D scatter plots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            azimuth_deg: -60.0,
            elevation_deg: 30.0,
        }
    }
}

/// A straight segment between two node positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    start: Point3<f64>,
    end: Point3<f64>,
}

impl Segment {
    /// Creates a segment between two points.
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Returns the start point.
    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    /// Returns the end point.
    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    /// Returns the midpoint of the segment, where edge labels are anchored.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::Point3;
    /// use connectoscope::render::Segment;
    ///
    /// let segment = Segment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
    /// assert_eq!(segment.midpoint(), Point3::new(0.5, 0.0, 0.0));
    /// ```
    pub fn midpoint(&self) -> Point3<f64> {
        Point3::from((self.start.coords + self.end.coords) / 2.0)
    }

    /// Returns the direction vector from start to end.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::{Point3, Vector3};
    /// use connectoscope::render::Segment;
    ///
    /// let segment = Segment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
    /// assert_eq!(segment.direction(), Vector3::new(1.0, 0.0, 0.0));
    /// ```
    pub fn direction(&self) -> Vector3<f64> {
        self.end - self.start
    }
}

/// Counts of the primitives placed by a render call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub markers: usize,
    pub segments: usize,
    pub node_labels: usize,
    pub edge_labels: usize,
}

/// A renderable 3D network: validated node and edge sets with resolved styles.
#[derive(Clone, Debug)]
pub struct Scene {
    node_names: Vec<String>,
    node_positions: Vec<Point3<f64>>,
    node_label_set: Vec<bool>,
    node_styles: Vec<NodeStyle>,
    edges: Vec<(String, String)>,
    edge_indices: Vec<(usize, usize)>,
    edge_label_set: Vec<bool>,
    edge_styles: Vec<EdgeStyle>,
}

impl Scene {
    /// Creates a scene from a node set and an edge set, with default styles.
    ///
    /// Every per-node sequence must match `node_names` in length and every per-edge sequence
    /// must match `edges`. Edge endpoints are resolved against `node_names` up front with
    /// first-match semantics, so a name referencing no node fails here, before anything is
    /// drawn.
    pub fn new(
        node_names: Vec<String>,
        node_positions: Vec<Point3<f64>>,
        node_label_set: Vec<bool>,
        edges: Vec<(String, String)>,
        edge_label_set: Vec<bool>,
    ) -> Result<Self, SceneError> {
        check_len("node_positions", node_names.len(), node_positions.len())?;
        check_len("node_label_set", node_names.len(), node_label_set.len())?;
        check_len("edge_label_set", edges.len(), edge_label_set.len())?;

        let edge_indices = edges
            .iter()
            .map(|(source, target)| {
                Ok((
                    lookup(&node_names, source)?,
                    lookup(&node_names, target)?,
                ))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        let node_styles = vec![NodeStyle::default(); node_names.len()];
        let edge_styles = vec![EdgeStyle::default(); edges.len()];

        Ok(Self {
            node_names,
            node_positions,
            node_label_set,
            node_styles,
            edges,
            edge_indices,
            edge_label_set,
            edge_styles,
        })
    }

    /// Sets per-node marker sizes.
    pub fn with_node_sizes(mut self, sizes: &[f64]) -> Result<Self, SceneError> {
        check_len("node_sizes", self.node_names.len(), sizes.len())?;
        for (style, size) in self.node_styles.iter_mut().zip(sizes) {
            style.size = *size;
        }
        Ok(self)
    }

    /// Sets per-node marker colours.
    pub fn with_node_colors(mut self, colors: &[RGBColor]) -> Result<Self, SceneError> {
        check_len("node_colors", self.node_names.len(), colors.len())?;
        for (style, color) in self.node_styles.iter_mut().zip(colors) {
            style.color = *color;
        }
        Ok(self)
    }

    /// Sets per-node opacities.
    pub fn with_node_alphas(mut self, alphas: &[f64]) -> Result<Self, SceneError> {
        check_len("node_alpha", self.node_names.len(), alphas.len())?;
        for (style, alpha) in self.node_styles.iter_mut().zip(alphas) {
            style.alpha = *alpha;
        }
        Ok(self)
    }

    /// Sets per-edge line widths.
    pub fn with_edge_widths(mut self, widths: &[u32]) -> Result<Self, SceneError> {
        check_len("edge_sizes", self.edges.len(), widths.len())?;
        for (style, width) in self.edge_styles.iter_mut().zip(widths) {
            style.width = *width;
        }
        Ok(self)
    }

    /// Sets per-edge line colours.
    pub fn with_edge_colors(mut self, colors: &[RGBColor]) -> Result<Self, SceneError> {
        check_len("edge_colors", self.edges.len(), colors.len())?;
        for (style, color) in self.edge_styles.iter_mut().zip(colors) {
            style.color = *color;
        }
        Ok(self)
    }

    /// Sets per-edge opacities.
    pub fn with_edge_alphas(mut self, alphas: &[f64]) -> Result<Self, SceneError> {
        check_len("edge_alpha", self.edges.len(), alphas.len())?;
        for (style, alpha) in self.edge_styles.iter_mut().zip(alphas) {
            style.alpha = *alpha;
        }
        Ok(self)
    }

    /// Returns the resolved node styles.
    pub fn node_styles(&self) -> &[NodeStyle] {
        &self.node_styles
    }

    /// Returns the resolved edge styles.
    pub fn edge_styles(&self) -> &[EdgeStyle] {
        &self.edge_styles
    }

    /// Returns the segments the edges resolve to, in edge order.
    pub fn segments(&self) -> Vec<Segment> {
        self.edge_indices
            .iter()
            .map(|(i, j)| Segment::new(self.node_positions[*i], self.node_positions[*j]))
            .collect()
    }

    /// Draws the scene onto the given drawing area from the given camera.
    ///
    /// Edges are drawn first so markers and labels sit on top of them. The area gets a black
    /// background, a fixed title and the two fixed anatomical captions; no axis chrome is drawn.
    pub fn render<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
        camera: &Camera,
    ) -> Result<RenderStats, SceneError> {
        let mut stats = RenderStats::default();

        root.fill(&BLACK).map_err(to_render_error)?;

        let (x_range, y_range, z_range) = self.bounds();
        let mut chart = ChartBuilder::on(root)
            .caption(
                "Top Clustering Coefficients",
                ("sans-serif", 30).into_font().color(&WHITE),
            )
            .margin(10)
            .build_cartesian_3d(x_range, y_range, z_range)
            .map_err(to_render_error)?;

        let pitch = camera.elevation_deg.to_radians();
        let yaw = camera.azimuth_deg.to_radians();
        chart.with_projection(|mut pb| {
            pb.pitch = pitch;
            pb.yaw = yaw;
            pb.scale = 0.9;
            pb.into_matrix()
        });

        // Edges and their labels sit behind the markers.
        for (segment, style) in self.segments().into_iter().zip(&self.edge_styles) {
            let color = style.color.mix(style.alpha);

            chart
                .draw_series(LineSeries::new(
                    [point_coords(segment.start()), point_coords(segment.end())],
                    ShapeStyle::from(&color).stroke_width(style.width),
                ))
                .map_err(to_render_error)?;
            stats.segments += 1;
        }

        for (ei, labelled) in self.edge_label_set.iter().enumerate() {
            if !*labelled {
                continue;
            }

            let (i, j) = self.edge_indices[ei];
            let style = self.edge_styles[ei];
            let segment = Segment::new(self.node_positions[i], self.node_positions[j]);
            let midpoint = segment.midpoint();

            let color = style.color.mix(style.alpha);
            let text_style = ("sans-serif", 14)
                .into_font()
                .color(&color)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            let label = format!("{}<->{}", self.node_names[i], self.node_names[j]);

            chart
                .draw_series(std::iter::once(Text::new(
                    label,
                    (midpoint.x, midpoint.y, midpoint.z + LABEL_OFFSET),
                    text_style,
                )))
                .map_err(to_render_error)?;
            stats.edge_labels += 1;
        }

        // Markers and node labels.
        for ((name, position), (style, labelled)) in self
            .node_names
            .iter()
            .zip(&self.node_positions)
            .zip(self.node_styles.iter().zip(&self.node_label_set))
        {
            let color = style.color.mix(style.alpha);
            let radius = (style.size / std::f64::consts::PI).sqrt().round().max(1.0) as i32;

            chart
                .draw_series(std::iter::once(Circle::new(
                    point_coords(*position),
                    radius,
                    ShapeStyle::from(&color).filled(),
                )))
                .map_err(to_render_error)?;
            stats.markers += 1;

            if *labelled {
                let text_style = ("sans-serif", 14)
                    .into_font()
                    .color(&color)
                    .pos(Pos::new(HPos::Center, VPos::Bottom));

                chart
                    .draw_series(std::iter::once(Text::new(
                        name.clone(),
                        (position.x, position.y, position.z + LABEL_OFFSET),
                        text_style,
                    )))
                    .map_err(to_render_error)?;
                stats.node_labels += 1;
            }
        }

        self.draw_captions(root)?;

        Ok(stats)
    }

    /// Renders one frame per turntable azimuth into the given directory.
    ///
    /// The directory must already exist; frames are named `mov_000.png` through `mov_119.png`
    /// and overwritten if present. Returns the written paths in frame order.
    pub fn export_turntable(&self, dir: &Path) -> Result<Vec<PathBuf>, SceneError> {
        if !dir.is_dir() {
            return Err(SceneError::MissingDirectory(dir.to_path_buf()));
        }

        let mut written = Vec::with_capacity(TURNTABLE_FRAMES);
        for (i, azimuth_deg) in turntable_azimuths().enumerate() {
            let path = dir.join(format!("mov_{i:03}.png"));
            let camera = Camera {
                azimuth_deg,
                elevation_deg: TURNTABLE_ELEVATION_DEG,
            };

            {
                let root = BitMapBackend::new(&path, FRAME_SIZE).into_drawing_area();
                self.render(&root, &camera)?;
                root.present().map_err(to_render_error)?;
            }

            debug!("wrote frame {} at azimuth {azimuth_deg}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    //
    // Private
    //

    /// Returns padded axis ranges covering every node position.
    fn bounds(&self) -> (
        std::ops::Range<f64>,
        std::ops::Range<f64>,
        std::ops::Range<f64>,
    ) {
        if self.node_positions.is_empty() {
            return (0.0..1.0, 0.0..1.0, 0.0..1.0);
        }

        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for position in &self.node_positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }

        // Pad so markers and the label offset stay inside the view, even when the positions are
        // degenerate along an axis.
        let padded = |axis: usize| {
            let pad = (0.1 * (max[axis] - min[axis])).max(2.0 * LABEL_OFFSET);
            min[axis] - pad..max[axis] + pad
        };

        (padded(0), padded(1), padded(2))
    }

    /// Draws the two fixed anatomical axis captions along the bottom of the area.
    fn draw_captions<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
    ) -> Result<(), SceneError> {
        let (w, h) = root.dim_in_pixel();
        let style = ("sans-serif", 18)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Bottom));

        root.draw(&Text::new(
            "A <-> P",
            (w as i32 / 3, h as i32 - 15),
            style.clone(),
        ))
        .map_err(to_render_error)?;
        root.draw(&Text::new(
            "L <-> M <-> L",
            (2 * w as i32 / 3, h as i32 - 15),
            style,
        ))
        .map_err(to_render_error)?;

        Ok(())
    }
}

//
// Helpers
//

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), SceneError> {
    if expected != found {
        return Err(SceneError::LengthMismatch {
            what,
            expected,
            found,
        });
    }

    Ok(())
}

/// Resolves a region name to its node index, first match wins.
fn lookup(node_names: &[String], name: &str) -> Result<usize, SceneError> {
    node_names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| SceneError::UnknownRegion(name.to_string()))
}

fn point_coords(point: Point3<f64>) -> (f64, f64, f64) {
    (point.x, point.y, point.z)
}

fn to_render_error<E: fmt::Display>(err: E) -> SceneError {
    SceneError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn two_node_scene() -> Scene {
        Scene::new(
            names(&["A", "B"]),
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![true, true],
            vec![("A".into(), "B".into())],
            vec![false],
        )
        .unwrap()
    }

    #[test]
    fn default_styles() {
        let scene = two_node_scene();

        assert!(scene
            .node_styles()
            .iter()
            .all(|style| *style == NodeStyle::default()));
        assert!(scene
            .edge_styles()
            .iter()
            .all(|style| *style == EdgeStyle::default()));
        assert_eq!(scene.node_styles()[0].size, 50.0);
        assert_eq!(scene.node_styles()[0].color, GREEN);
        assert_eq!(scene.node_styles()[0].alpha, 1.0);
        assert_eq!(scene.edge_styles()[0].width, 1);
        assert_eq!(scene.edge_styles()[0].color, BLUE);
        assert_eq!(scene.edge_styles()[0].alpha, 1.0);
    }

    #[test]
    fn midpoint_and_direction() {
        let scene = two_node_scene();
        let segments = scene.segments();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].midpoint(), Point3::new(0.5, 0.0, 0.0));
        assert_eq!(segments[0].direction(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_unknown_edge_endpoint() {
        let result = Scene::new(
            names(&["A", "B"]),
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![false, false],
            vec![("A".into(), "C".into())],
            vec![false],
        );

        assert!(matches!(result, Err(SceneError::UnknownRegion(name)) if name == "C"));
    }

    #[test]
    fn rejects_length_mismatches() {
        let result = Scene::new(
            names(&["A", "B"]),
            vec![Point3::new(0.0, 0.0, 0.0)],
            vec![false, false],
            vec![],
            vec![],
        );

        assert!(matches!(
            result,
            Err(SceneError::LengthMismatch {
                what: "node_positions",
                expected: 2,
                found: 1
            })
        ));

        let result = two_node_scene().with_node_sizes(&[10.0]);
        assert!(matches!(
            result,
            Err(SceneError::LengthMismatch {
                what: "node_sizes",
                ..
            })
        ));
    }

    #[test]
    fn style_setters_apply_in_order() {
        let scene = two_node_scene()
            .with_node_sizes(&[10.0, 20.0])
            .unwrap()
            .with_node_colors(&[RED, WHITE])
            .unwrap()
            .with_node_alphas(&[0.25, 0.75])
            .unwrap()
            .with_edge_widths(&[3])
            .unwrap()
            .with_edge_colors(&[MAGENTA])
            .unwrap()
            .with_edge_alphas(&[0.5])
            .unwrap();

        assert_eq!(
            scene.node_styles()[1],
            NodeStyle {
                size: 20.0,
                color: WHITE,
                alpha: 0.75
            }
        );
        assert_eq!(
            scene.edge_styles()[0],
            EdgeStyle {
                width: 3,
                color: MAGENTA,
                alpha: 0.5
            }
        );
    }

    #[test]
    fn render_places_expected_primitives() {
        let scene = Scene::new(
            names(&["A", "B", "C"]),
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 1.0),
            ],
            vec![true, false, true],
            vec![("A".into(), "B".into()), ("B".into(), "C".into())],
            vec![true, false],
        )
        .unwrap();

        let mut buffer = vec![0u8; 320 * 240 * 3];
        let stats = {
            let root = BitMapBackend::with_buffer(&mut buffer, (320, 240)).into_drawing_area();
            scene.render(&root, &Camera::default()).unwrap()
        };

        assert_eq!(
            stats,
            RenderStats {
                markers: 3,
                segments: 2,
                node_labels: 2,
                edge_labels: 1,
            }
        );
    }

    #[test]
    fn turntable_covers_the_sweep() {
        let azimuths: Vec<f64> = turntable_azimuths().collect();

        assert_eq!(azimuths.len(), TURNTABLE_FRAMES);
        assert_eq!(azimuths.first(), Some(&-270.0));
        assert_eq!(azimuths.last(), Some(&87.0));
    }

    #[test]
    fn export_requires_existing_directory() {
        let dir = std::env::temp_dir().join("connectoscope-missing-frames-dir");
        let _ = std::fs::remove_dir_all(&dir);

        let result = two_node_scene().export_turntable(&dir);
        assert!(matches!(result, Err(SceneError::MissingDirectory(_))));
    }
}
