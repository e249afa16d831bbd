//! Application state and the event loop for `braid view`.
//!
//! One `AppState` owns everything the viewer knows: the loaded posts, the
//! current tree and its layout, the in-flight transition, the pan/zoom
//! viewport, and the interaction state (hover, selection, popups). Input is
//! mapped to `Action`s in `tui::input`; drawing lives in `tui::render`.

use std::collections::HashMap;
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};

use crate::data::loader;
use crate::data::model::{Post, excerpt};
use crate::layout::tidy::TidyConfig;
use crate::layout::{self, Layout, Orientation};
use crate::tree::model::TreeNode;
use crate::tree::transform::build_tree;
use crate::tui::input::{self, Action, Direction, MouseAction};
use crate::tui::render::{
    self, ChainEntry, DiagramLink, DiagramNode, RenderData, SelectorView, Tooltip, Viewport,
};
use crate::tui::transition::Transition;

const IDLE_POLL: Duration = Duration::from_millis(200);
const ACTIVE_POLL: Duration = Duration::from_millis(33);
const PAN_STEP: f64 = 2.0;
const ZOOM_STEP: f64 = 1.25;
const MIN_ZOOM: f64 = 0.25;
const MAX_ZOOM: f64 = 4.0;
/// Keep the tree clear of the pane edges; mirrors `Viewport::identity`.
const MARGIN_X: f64 = 8.0;
const MARGIN_Y: f64 = 2.0;
const EXCERPT_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub source: String,
    pub initial_post: Option<String>,
    pub orientation: Orientation,
    pub show_names: bool,
    pub transition: Duration,
}

struct AppState {
    posts: Vec<Post>,
    pending: Option<mpsc::Receiver<Vec<Post>>>,
    initial_post: Option<String>,
    current: Option<usize>,
    tree: Option<TreeNode>,
    layout: Layout,
    tidy: TidyConfig,
    transition: Option<Transition>,
    transition_duration: Duration,
    /// Positions as of the last draw, keyed by node id. Snapshot source for
    /// transition restarts and for mouse hit-testing.
    displayed: HashMap<String, (f64, f64)>,
    orientation: Orientation,
    show_names: bool,
    viewport: Viewport,
    /// Diagram pane from the last draw, for cell↔world mapping.
    diagram: Rect,
    mouse: (u16, u16),
    hovered: Option<String>,
    selected: Option<String>,
    chain: Vec<ChainEntry>,
    selector: Option<usize>,
    show_help: bool,
    drag: Option<(u16, u16)>,
    status_message: Option<String>,
}

impl AppState {
    fn new(options: ViewOptions) -> Self {
        Self {
            posts: Vec::new(),
            pending: Some(loader::spawn_load(options.source)),
            initial_post: options.initial_post,
            current: None,
            tree: None,
            layout: Layout::default(),
            tidy: TidyConfig::default(),
            transition: None,
            transition_duration: options.transition,
            displayed: HashMap::new(),
            orientation: options.orientation,
            show_names: options.show_names,
            viewport: Viewport::identity(),
            diagram: Rect::default(),
            mouse: (0, 0),
            hovered: None,
            selected: None,
            chain: Vec::new(),
            selector: None,
            show_help: false,
            drag: None,
            status_message: None,
        }
    }

    /// Pick up the background load without blocking. The UI stays in its
    /// "loading" state until the worker delivers; an empty delivery leaves
    /// the viewer in the "no posts available" state.
    fn poll_load(&mut self) {
        let Some(rx) = &self.pending else { return };
        match rx.try_recv() {
            Ok(posts) => {
                self.pending = None;
                self.posts = posts;
                if self.posts.is_empty() {
                    self.status_message = Some("no posts available".to_string());
                } else {
                    let start = self
                        .initial_post
                        .take()
                        .and_then(|id| self.posts.iter().position(|p| p.post_id == id))
                        .unwrap_or(0);
                    self.select_post(start);
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.pending = None;
                self.status_message = Some("no posts available".to_string());
            }
        }
    }

    fn current_label(&self) -> Option<String> {
        self.current.map(|idx| self.posts[idx].label())
    }

    /// Re-visualize: new tree, view transform back to identity, fresh layout.
    fn select_post(&mut self, idx: usize) {
        if idx >= self.posts.len() {
            return;
        }
        self.current = Some(idx);
        self.tree = Some(build_tree(&self.posts[idx]));
        self.viewport = Viewport::identity();
        self.hovered = None;
        self.selected = None;
        self.chain.clear();
        self.relayout();
        self.status_message = Some(format!("viewing: {}", self.posts[idx].label()));
    }

    fn working_area(&self) -> (f64, f64) {
        (
            (f64::from(self.diagram.width) - 2.0 * MARGIN_X).max(4.0),
            (f64::from(self.diagram.height) - 2.0 * MARGIN_Y).max(4.0),
        )
    }

    /// Recompute placements for the current tree and start a transition from
    /// wherever nodes are on screen right now. The first layout (nothing
    /// displayed yet) snaps instead of animating.
    fn relayout(&mut self) {
        let Some(tree) = &self.tree else {
            self.layout = Layout::default();
            self.transition = None;
            return;
        };
        self.layout = layout::compute(tree, self.orientation, self.working_area(), &self.tidy);
        self.transition = if self.displayed.is_empty() || self.transition_duration.is_zero() {
            None
        } else {
            Some(Transition::begin(
                self.displayed.clone(),
                self.transition_duration,
                Instant::now(),
            ))
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let p = render::panes(frame.area());
        if p.diagram != self.diagram {
            self.diagram = p.diagram;
            if self.tree.is_some() {
                self.relayout();
            }
        }

        let now = Instant::now();
        if let Some(t) = &self.transition
            && t.is_done(now)
        {
            self.transition = None;
        }

        let mut positions: HashMap<String, (f64, f64)> =
            HashMap::with_capacity(self.layout.nodes.len());
        let mut nodes = Vec::with_capacity(self.layout.nodes.len());
        for placed in &self.layout.nodes {
            let target = (placed.x, placed.y);
            let pos = match &self.transition {
                Some(t) => t.sample(&placed.id, target, now),
                None => target,
            };
            positions.insert(placed.id.clone(), pos);
            nodes.push(DiagramNode {
                pos,
                depth: placed.depth,
                label: (placed.is_root() || placed.is_leaf).then(|| placed.author.clone()),
                hovered: self.hovered.as_deref() == Some(placed.id.as_str()),
                selected: self.selected.as_deref() == Some(placed.id.as_str()),
            });
        }

        let mut links = Vec::with_capacity(self.layout.links.len());
        for link in &self.layout.links {
            if let (Some(&from), Some(&to)) = (
                positions.get(link.source.as_str()),
                positions.get(link.target.as_str()),
            ) {
                links.push(DiagramLink {
                    from,
                    to,
                    weight: link.weight,
                });
            }
        }
        self.displayed = positions;

        let tooltip = self.hovered.as_ref().and_then(|id| {
            let node = self.tree.as_ref()?.find(id)?;
            Some(Tooltip {
                author: node.author.clone(),
                heading: if node.depth == 0 {
                    "Original Post".to_string()
                } else {
                    format!("Depth: {}", node.depth)
                },
                excerpt: excerpt(&node.text, EXCERPT_LEN),
                more_replies: node.more_replies,
                at: self.mouse,
            })
        });

        let entries: Vec<(String, usize)> = self
            .posts
            .iter()
            .map(|post| (post.label(), post.comments.len()))
            .collect();
        let selector = self.selector.map(|cursor| SelectorView {
            entries: &entries,
            cursor,
        });

        let title = self.current_label().unwrap_or_else(|| "braid".to_string());
        let hints = self.hints();
        let data = RenderData {
            title: &title,
            nodes: &nodes,
            links: &links,
            viewport: self.viewport,
            horizontal: self.orientation == Orientation::Horizontal,
            names_visible: self.show_names,
            orientation_label: self.orientation.label(),
            chain: &self.chain,
            tooltip: tooltip.as_ref(),
            selector,
            show_help: self.show_help,
            loading: self.pending.is_some(),
            message: self.status_message.as_deref(),
            hints: &hints,
        };
        render::draw(frame, &data);
    }

    fn hints(&self) -> String {
        if self.selector.is_some() {
            return "[j/k/↑↓] move  [Enter] view  [Esc] close".to_string();
        }
        if self.show_help {
            return "[?] or [Esc] closes help".to_string();
        }
        "[p] posts  [Tab] next  [o] flip  [n] names  [r] reset view  [+/-] zoom  drag pans  [q] quit"
            .to_string()
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status_message = None;

        if let Some(cursor) = self.selector {
            match input::action_for_key(key, true) {
                Action::Move(Direction::Up) => {
                    self.selector = Some(cursor.saturating_sub(1));
                }
                Action::Move(Direction::Down) => {
                    self.selector =
                        Some((cursor + 1).min(self.posts.len().saturating_sub(1)));
                }
                Action::Confirm => {
                    self.selector = None;
                    self.select_post(cursor);
                }
                Action::Cancel => self.selector = None,
                _ => {}
            }
            return false;
        }

        match input::action_for_key(key, false) {
            Action::Quit => return true,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::OpenSelector => {
                if self.posts.is_empty() {
                    self.status_message = Some("no posts loaded".to_string());
                } else {
                    self.selector = Some(self.current.unwrap_or(0));
                }
            }
            Action::NextPost => {
                if !self.posts.is_empty() {
                    let next = self
                        .current
                        .map(|idx| (idx + 1) % self.posts.len())
                        .unwrap_or(0);
                    self.select_post(next);
                }
            }
            Action::ToggleOrientation => {
                self.orientation = self.orientation.flipped();
                self.relayout();
                self.status_message = Some(format!("layout: {}", self.orientation.label()));
            }
            Action::ToggleNames => {
                // Visibility only; node positions stay put.
                self.show_names = !self.show_names;
            }
            Action::Pan(direction) => {
                let step = PAN_STEP / self.viewport.zoom;
                match direction {
                    Direction::Up => self.viewport.y -= step,
                    Direction::Down => self.viewport.y += step,
                    Direction::Left => self.viewport.x -= step,
                    Direction::Right => self.viewport.x += step,
                }
            }
            Action::ZoomIn => self.zoom_by(ZOOM_STEP),
            Action::ZoomOut => self.zoom_by(1.0 / ZOOM_STEP),
            Action::ResetView => {
                self.viewport = Viewport::identity();
                self.status_message = Some("view reset".to_string());
            }
            Action::Cancel => {
                if self.show_help {
                    self.show_help = false;
                } else if self.selected.is_some() {
                    self.selected = None;
                    self.chain.clear();
                }
            }
            Action::Move(_) | Action::Confirm | Action::Noop => {}
        }
        false
    }

    fn handle_mouse(&mut self, event: crossterm::event::MouseEvent) {
        match input::action_for_mouse(event) {
            MouseAction::MovedTo(col, row) => {
                self.mouse = (col, row);
                self.hovered = self.hit_test(col, row);
            }
            MouseAction::PressedAt(col, row) => {
                if self.selector.is_some() {
                    self.selector = None;
                    return;
                }
                if let Some(id) = self.hit_test(col, row) {
                    self.select_node(&id);
                } else if self.diagram.contains(Position::new(col, row)) {
                    self.drag = Some((col, row));
                }
            }
            MouseAction::DraggedTo(col, row) => {
                if let Some((last_col, last_row)) = self.drag {
                    // Content follows the cursor.
                    self.viewport.x -= (f64::from(col) - f64::from(last_col)) / self.viewport.zoom;
                    self.viewport.y -= (f64::from(row) - f64::from(last_row)) / self.viewport.zoom;
                    self.drag = Some((col, row));
                } else {
                    self.mouse = (col, row);
                    self.hovered = self.hit_test(col, row);
                }
            }
            MouseAction::Released => self.drag = None,
            MouseAction::ZoomIn(_, _) => self.zoom_by(ZOOM_STEP),
            MouseAction::ZoomOut(_, _) => self.zoom_by(1.0 / ZOOM_STEP),
            MouseAction::Noop => {}
        }
    }

    fn zoom_by(&mut self, factor: f64) {
        self.viewport.zoom = (self.viewport.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn hit_test(&self, col: u16, row: u16) -> Option<String> {
        if !self.diagram.contains(Position::new(col, row)) {
            return None;
        }
        nearest_node(&self.displayed, self.viewport, self.diagram, col, row)
    }

    /// Walk the ancestor chain for the clicked node into the side panel.
    fn select_node(&mut self, id: &str) {
        let Some(tree) = &self.tree else { return };
        if let Some(chain) = tree.chain(id) {
            self.chain = chain
                .iter()
                .map(|node| ChainEntry {
                    author: node.author.clone(),
                    text: node.text.clone(),
                    is_root: node.depth == 0,
                    more_replies: node.more_replies,
                })
                .collect();
            self.selected = Some(id.to_string());
        }
    }
}

/// Screen cell (as fractional coordinates) of a world position.
fn cell_of_world(pos: (f64, f64), viewport: Viewport, diagram: Rect) -> (f64, f64) {
    (
        f64::from(diagram.x) + (pos.0 - viewport.x) * viewport.zoom,
        f64::from(diagram.y) + (pos.1 - viewport.y) * viewport.zoom,
    )
}

/// The node nearest to a cell, within a small pick radius. Cells are about
/// twice as tall as wide, so vertical distance counts double.
fn nearest_node(
    displayed: &HashMap<String, (f64, f64)>,
    viewport: Viewport,
    diagram: Rect,
    col: u16,
    row: u16,
) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (id, &pos) in displayed {
        let (cx, cy) = cell_of_world(pos, viewport, diagram);
        let dx = cx - f64::from(col);
        let dy = cy - f64::from(row);
        if dx.abs() > 2.5 || dy.abs() > 1.5 {
            continue;
        }
        let score = dx * dx + (2.0 * dy) * (2.0 * dy);
        match best {
            Some((_, best_score)) if best_score <= score => {}
            _ => best = Some((id.as_str(), score)),
        }
    }
    best.map(|(id, _)| id.to_string())
}

pub fn run(options: ViewOptions) -> Result<()> {
    let mut app = AppState::new(options);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.poll_load();
        terminal.draw(|f| app.draw(f))?;

        // Tick fast enough for smooth animation while something is moving or
        // a load is pending; otherwise relax.
        let timeout = if app.transition.is_some() || app.pending.is_some() {
            ACTIVE_POLL
        } else {
            IDLE_POLL
        };
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                    continue;
                }
                if app.handle_key(key) {
                    break;
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            // The next draw measures the new pane size and re-lays-out.
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_mapping_honors_pan_and_zoom() {
        let diagram = Rect::new(1, 1, 100, 40);
        let viewport = Viewport {
            x: -8.0,
            y: -2.0,
            zoom: 1.0,
        };
        // World origin lands MARGIN cells inside the pane.
        let (cx, cy) = cell_of_world((0.0, 0.0), viewport, diagram);
        assert_eq!((cx, cy), (9.0, 3.0));

        let zoomed = Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 2.0,
        };
        let (cx, cy) = cell_of_world((5.0, 5.0), zoomed, diagram);
        assert_eq!((cx, cy), (11.0, 11.0));
    }

    #[test]
    fn nearest_node_picks_the_closest_within_radius() {
        let diagram = Rect::new(0, 0, 100, 40);
        let viewport = Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        };
        let mut displayed = HashMap::new();
        displayed.insert("near".to_string(), (10.0, 10.0));
        displayed.insert("far".to_string(), (30.0, 10.0));

        assert_eq!(
            nearest_node(&displayed, viewport, diagram, 11, 10),
            Some("near".to_string())
        );
        // Out of pick radius: nothing.
        assert_eq!(nearest_node(&displayed, viewport, diagram, 20, 10), None);
    }

    #[test]
    fn nearest_node_prefers_the_smaller_distance() {
        let diagram = Rect::new(0, 0, 100, 40);
        let viewport = Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        };
        let mut displayed = HashMap::new();
        displayed.insert("a".to_string(), (10.0, 10.0));
        displayed.insert("b".to_string(), (12.0, 10.0));

        assert_eq!(
            nearest_node(&displayed, viewport, diagram, 12, 10),
            Some("b".to_string())
        );
    }
}
