//! Shared pieces of the navgrid terminal demo: dungeon setup, search runs and
//! the coloured overlay printed for each of them.

use std::fmt::Write as _;
use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use log::info;
use navgrid_core::{Point, Tile, TileGrid};
use navgrid_gen::{DungeonConfig, MapGen};
use navgrid_paths::{AnytimeConfig, Navigator, PathResult};
use rand::Rng;

pub const WIDTH: i32 = 60;
pub const HEIGHT: i32 = 22;

// Colours
const COL_WALL: Color = Color::Rgb { r: 100, g: 100, b: 130 };
const COL_FLOOR: Color = Color::Rgb { r: 90, g: 85, b: 80 };
const COL_WATER: Color = Color::Rgb { r: 60, g: 110, b: 200 };
const COL_EXPANDED_BG: Color = Color::Rgb { r: 45, g: 35, b: 20 };
const COL_PATH: Color = Color::Rgb { r: 255, g: 220, b: 80 };
// Older anytime paths fade from the path colour towards this one.
const TRAIL_FAR: (u8, u8, u8) = (70, 60, 40);
const TRAIL_NEAR: (u8, u8, u8) = (230, 150, 60);
const COL_ENDPOINT: Color = Color::Rgb { r: 80, g: 220, b: 80 };

/// A generated map with the two endpoints every search runs between.
#[derive(Debug, Clone)]
pub struct Scene {
    pub grid: TileGrid,
    pub start: Point,
    pub goal: Point,
}

impl Scene {
    /// Generate a dungeon, start at a random walkable tile and aim for the
    /// reachable tile farthest from it. `None` if nothing is walkable.
    pub fn generate<R: Rng>(width: i32, height: i32, rng: R, config: &DungeonConfig) -> Option<Self> {
        let mut mg = MapGen::new(width, height, rng);
        let stats = mg.generate(config);
        let start = mg.random_walkable()?;
        let grid = mg.into_grid();
        let goal = Navigator::new(&grid)
            .cost_map(&[start])
            .reachable()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)?;
        info!(
            "map {width}x{height}: {} carved, {} flooded, {start} -> {goal}",
            stats.carved, stats.flooded
        );
        Some(Self { grid, start, goal })
    }
}

/// What one search did, ready for display.
#[derive(Debug, Clone, Default)]
pub struct Run {
    pub label: String,
    /// Expanded cells, in expansion order (repeats across anytime levels).
    pub expanded: Vec<Point>,
    /// The path shown on the overlay.
    pub path: Vec<Point>,
    /// Paths superseded by `path`, oldest first.
    pub earlier: Vec<Vec<Point>>,
    /// One line per result.
    pub summary: Vec<String>,
}

fn describe(r: &PathResult) -> String {
    match r.failure {
        None => format!(
            "cost {}, {} steps, {} expanded, peak {} nodes",
            r.cost,
            r.path.len().saturating_sub(1),
            r.nodes_expanded,
            r.peak_nodes
        ),
        Some(e) => format!("{e} ({} expanded)", r.nodes_expanded),
    }
}

/// Run plain A* over the scene.
pub fn run_astar(scene: &Scene) -> Run {
    let mut expanded = Vec::new();
    let r = Navigator::new(&scene.grid).astar(scene.start, scene.goal, |p, _| expanded.push(p));
    Run {
        label: "A*".to_string(),
        summary: vec![describe(&r)],
        path: r.path,
        earlier: Vec::new(),
        expanded,
    }
}

/// Run the memory-bounded search over the scene.
pub fn run_bounded(scene: &Scene, limit: usize) -> Run {
    let mut expanded = Vec::new();
    let r = Navigator::new(&scene.grid).bounded_astar(scene.start, scene.goal, limit, |p, _| {
        expanded.push(p)
    });
    Run {
        label: format!("bounded A* (limit {limit})"),
        summary: vec![describe(&r)],
        path: r.path,
        earlier: Vec::new(),
        expanded,
    }
}

/// Run the anytime search over the scene; the overlay shows the best path
/// on top of the fading paths it replaced.
pub fn run_anytime(scene: &Scene, config: &AnytimeConfig) -> Run {
    let mut expanded = Vec::new();
    let r = Navigator::new(&scene.grid).anytime(scene.start, scene.goal, config, |p, _| {
        expanded.push(p)
    });
    let mut summary: Vec<String> = r
        .iter()
        .map(|s| {
            format!(
                "ε {:.3}: cost {}, bound {:.3}, {} expanded",
                s.epsilon, s.cost, s.bound, s.nodes_expanded
            )
        })
        .collect();
    if summary.is_empty() {
        summary.push("no path".to_string());
    }
    let mut earlier = r.into_paths();
    let path = earlier.pop().unwrap_or_default();
    Run {
        label: "anytime A*".to_string(),
        summary,
        path,
        earlier,
        expanded,
    }
}

/// How a cell is drawn on the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Terrain(Tile),
    Expanded(Tile),
    /// Part of a superseded path, `n` solutions older than the best one.
    Trail(usize),
    Path,
    Start,
    Goal,
}

impl Mark {
    fn glyph(self) -> char {
        match self {
            Mark::Terrain(t) => t.glyph(),
            Mark::Expanded(Tile::Difficult) => 'O',
            Mark::Expanded(_) => '+',
            Mark::Trail(_) => ':',
            Mark::Path => '*',
            Mark::Start => 'S',
            Mark::Goal => 'G',
        }
    }
}

/// Per-cell marks of `run` over `scene`, row-major.
pub fn marks(scene: &Scene, run: &Run) -> Vec<Mark> {
    let grid = &scene.grid;
    let bounds = grid.bounds();
    let mut marks: Vec<Mark> = grid.tiles().iter().map(|&t| Mark::Terrain(t)).collect();
    for &p in &run.expanded {
        if let Some(i) = bounds.index_of(p) {
            marks[i] = Mark::Expanded(grid.tiles()[i]);
        }
    }
    let n = run.earlier.len();
    for (i, path) in run.earlier.iter().enumerate() {
        for &p in path {
            if let Some(j) = bounds.index_of(p) {
                marks[j] = Mark::Trail(n - i);
            }
        }
    }
    for &p in &run.path {
        if let Some(i) = bounds.index_of(p) {
            marks[i] = Mark::Path;
        }
    }
    if let Some(i) = bounds.index_of(scene.start) {
        marks[i] = Mark::Start;
    }
    if let Some(i) = bounds.index_of(scene.goal) {
        marks[i] = Mark::Goal;
    }
    marks
}

/// The overlay as plain ASCII rows.
pub fn render_plain(scene: &Scene, run: &Run) -> String {
    let w = scene.grid.width().max(0) as usize;
    let mut out = String::new();
    if w == 0 {
        return out;
    }
    for (y, row) in marks(scene, run).chunks(w).enumerate() {
        if y > 0 {
            out.push('\n');
        }
        out.extend(row.iter().map(|m| m.glyph()));
    }
    out
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

/// Colour of a path `age` solutions older than the best one.
fn trail_colour(age: usize) -> Color {
    let t = 0.7f32.powi(age.saturating_sub(1).min(32) as i32);
    Color::Rgb {
        r: lerp_u8(TRAIL_FAR.0, TRAIL_NEAR.0, t),
        g: lerp_u8(TRAIL_FAR.1, TRAIL_NEAR.1, t),
        b: lerp_u8(TRAIL_FAR.2, TRAIL_NEAR.2, t),
    }
}

fn colours(mark: Mark) -> (Color, Color) {
    let fg = |t: Tile| match t {
        Tile::Open => COL_FLOOR,
        Tile::Difficult => COL_WATER,
        Tile::Wall => COL_WALL,
    };
    match mark {
        Mark::Terrain(t) => (fg(t), Color::Reset),
        Mark::Expanded(t) => (fg(t), COL_EXPANDED_BG),
        Mark::Trail(age) => (trail_colour(age), Color::Reset),
        Mark::Path => (COL_PATH, Color::Reset),
        Mark::Start | Mark::Goal => (COL_ENDPOINT, Color::Reset),
    }
}

/// Print the run's title, summary and coloured overlay to `out`.
pub fn render(out: &mut impl Write, scene: &Scene, run: &Run) -> io::Result<()> {
    let mut header = format!("== {} ==\n", run.label);
    for line in &run.summary {
        let _ = writeln!(header, "  {line}");
    }
    queue!(out, Print(header))?;

    let w = scene.grid.width().max(0) as usize;
    if w > 0 {
        for row in marks(scene, run).chunks(w) {
            for &m in row {
                let (fg, bg) = colours(m);
                queue!(out, SetForegroundColor(fg), SetBackgroundColor(bg), Print(m.glyph()))?;
            }
            queue!(out, ResetColor, Print('\n'))?;
        }
    }
    queue!(out, ResetColor, Print('\n'))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corridor() -> Scene {
        Scene {
            grid: TileGrid::parse("....\n.##.\n.o..").unwrap(),
            start: Point::new(0, 0),
            goal: Point::new(3, 2),
        }
    }

    #[test]
    fn plain_overlay_marks_path_and_endpoints() {
        let scene = corridor();
        let run = run_astar(&scene);
        assert_eq!(run.summary, vec!["cost 5, 5 steps, 7 expanded, peak 9 nodes".to_string()]);
        let text = render_plain(&scene, &run);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.chars().count() == 4));
        assert!(rows[0].starts_with('S'));
        assert!(rows[2].ends_with('G'));
        assert_eq!(rows, vec!["S***", "+##*", "+o.G"]);
    }

    #[test]
    fn failures_are_summarised() {
        let scene = Scene {
            grid: TileGrid::parse("..#.").unwrap(),
            start: Point::new(0, 0),
            goal: Point::new(3, 0),
        };
        let run = run_bounded(&scene, 10);
        assert!(run.path.is_empty());
        assert_eq!(run.summary, vec!["goal is unreachable from start (2 expanded)".to_string()]);
        let run = run_anytime(&scene, &AnytimeConfig::default());
        assert_eq!(run.summary, vec!["no path".to_string()]);
    }

    #[test]
    fn generated_scene_is_solvable() {
        let scene = Scene::generate(40, 18, StdRng::seed_from_u64(12), &DungeonConfig::default()).unwrap();
        assert!(scene.grid.is_passable(scene.start));
        assert!(scene.grid.is_passable(scene.goal));
        let astar = run_astar(&scene);
        assert_eq!(astar.path.first(), Some(&scene.start));
        assert_eq!(astar.path.last(), Some(&scene.goal));
        let anytime = run_anytime(&scene, &AnytimeConfig::default());
        assert_eq!(anytime.path.is_empty(), astar.path.is_empty());
    }

    #[test]
    fn superseded_paths_fade_under_the_best() {
        let scene = Scene {
            grid: TileGrid::new(4, 3),
            start: Point::new(0, 0),
            goal: Point::new(3, 0),
        };
        let p = Point::new;
        let run = Run {
            label: "anytime A*".to_string(),
            earlier: vec![
                vec![p(0, 0), p(0, 1), p(0, 2), p(1, 2), p(2, 2), p(3, 2), p(3, 1), p(3, 0)],
                vec![p(0, 0), p(0, 1), p(1, 1), p(2, 1), p(3, 1), p(3, 0)],
            ],
            path: vec![p(0, 0), p(1, 0), p(2, 0), p(3, 0)],
            ..Run::default()
        };
        let m = marks(&scene, &run);
        assert_eq!(m[4], Mark::Trail(1));
        assert_eq!(m[8], Mark::Trail(2));
        assert_eq!(m[7], Mark::Trail(1));
        assert_eq!(m[11], Mark::Trail(2));
        assert_eq!(render_plain(&scene, &run), "S**G\n::::\n::::");
        assert_eq!(trail_colour(1), Color::Rgb { r: 230, g: 150, b: 60 });
        assert_ne!(trail_colour(2), trail_colour(1));
        assert_ne!(trail_colour(1), COL_PATH);
    }

    #[test]
    fn anytime_run_keeps_every_emitted_path() {
        let scene = corridor();
        let run = run_anytime(&scene, &AnytimeConfig::default());
        let r = Navigator::new(&scene.grid).anytime(scene.start, scene.goal, &AnytimeConfig::default(), |_, _| {});
        assert_eq!(run.earlier.len() + 1, r.len());
        assert_eq!(Some(&run.path), r.best().map(|s| &s.path));
        assert_eq!(run.summary.len(), r.len());
    }

    #[test]
    fn coloured_render_writes_every_row() {
        let scene = corridor();
        let run = run_astar(&scene);
        let mut buf = Vec::new();
        render(&mut buf, &scene, &run).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("== A* =="));
        assert!(text.contains('S'));
        assert!(text.contains('G'));
    }
}
