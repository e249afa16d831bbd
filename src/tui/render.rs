//! All drawing for the viewer: the diagram canvas, the comment-thread panel,
//! the tooltip, the post selector, the help overlay, and the status bar.
//!
//! Drawing is split from state: `tui::app` assembles a `RenderData` of plain
//! values (already animated, already hit-tested) and this module paints it.
//! World coordinates are unzoomed terminal cells; the canvas y axis is
//! negated on entry so that depth can grow downward like the rest of the UI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

/// Node fill colors: one for the post root, one for every reply.
pub const ROOT_FILL: Color = Color::Rgb(0x23, 0x78, 0xae);
pub const REPLY_FILL: Color = Color::Rgb(0xff, 0x7f, 0x0e);

const NODE_RADIUS: f64 = 0.8;
const CURVE_SEGMENTS: usize = 16;
const CHAIN_PANEL_WIDTH: u16 = 38;
const TOOLTIP_WIDTH: u16 = 36;

/// Pan/zoom state. `x`/`y` are the world coordinates at the diagram pane's
/// top-left corner; `zoom` scales world units to cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Viewport {
    /// The reset transform: zoom 1, with a small margin so the tree's origin
    /// does not sit on the pane border.
    pub fn identity() -> Self {
        Self {
            x: -8.0,
            y: -2.0,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Panes {
    pub diagram: Rect,
    pub chain: Rect,
    pub status: Rect,
}

/// Split the frame into panes. `tui::app` uses the same split for mouse
/// hit-testing, so this must stay the single source of the geometry.
pub fn panes(frame_area: Rect) -> Panes {
    let inner = frame_area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let [main, status] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(2)]).areas(inner);
    let [diagram, chain] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(CHAIN_PANEL_WIDTH)])
            .areas(main);
    Panes {
        diagram,
        chain,
        status,
    }
}

#[derive(Debug, Clone)]
pub struct DiagramNode {
    pub pos: (f64, f64),
    pub depth: u32,
    /// Author label; present only for the root and for leaves.
    pub label: Option<String>,
    pub hovered: bool,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct DiagramLink {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct Tooltip {
    pub author: String,
    /// "Original Post" for the root, "Depth: N" otherwise.
    pub heading: String,
    pub excerpt: String,
    pub more_replies: bool,
    /// Cell the cursor is on.
    pub at: (u16, u16),
}

#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub author: String,
    pub text: String,
    pub is_root: bool,
    pub more_replies: bool,
}

#[derive(Debug)]
pub struct SelectorView<'a> {
    /// (label, comment count) per post.
    pub entries: &'a [(String, usize)],
    pub cursor: usize,
}

#[derive(Debug)]
pub struct RenderData<'a> {
    pub title: &'a str,
    pub nodes: &'a [DiagramNode],
    pub links: &'a [DiagramLink],
    pub viewport: Viewport,
    pub horizontal: bool,
    pub names_visible: bool,
    pub orientation_label: &'a str,
    pub chain: &'a [ChainEntry],
    pub tooltip: Option<&'a Tooltip>,
    pub selector: Option<SelectorView<'a>>,
    pub show_help: bool,
    pub loading: bool,
    pub message: Option<&'a str>,
    pub hints: &'a str,
}

pub fn draw(frame: &mut Frame, data: &RenderData<'_>) {
    let area = frame.area();

    let title = Line::from(vec![
        Span::styled("braid view", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ]);
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    frame.render_widget(outer, area);

    let p = panes(area);
    draw_diagram(frame, p.diagram, data);
    draw_chain_panel(frame, p.chain, data.chain);
    draw_status(frame, p.status, data);

    if let Some(tooltip) = data.tooltip {
        draw_tooltip(frame, area, tooltip);
    }
    if let Some(selector) = &data.selector {
        draw_selector(frame, area, selector);
    }
    if data.show_help {
        draw_help(frame, area);
    }
}

// ---------------------------------------------------------------------------
// Diagram canvas
// ---------------------------------------------------------------------------

fn draw_diagram(frame: &mut Frame, rect: Rect, data: &RenderData<'_>) {
    if data.loading || data.nodes.is_empty() {
        let text = if data.loading {
            "loading posts..."
        } else {
            "no posts available"
        };
        let [centered] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(rect);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )))
            .centered(),
            centered,
        );
        return;
    }

    let vp = data.viewport;
    let view_w = f64::from(rect.width.max(1)) / vp.zoom;
    let view_h = f64::from(rect.height.max(1)) / vp.zoom;

    let canvas = Canvas::default()
        .x_bounds([vp.x, vp.x + view_w])
        .y_bounds([-(vp.y + view_h), -vp.y])
        .paint(|ctx| {
            for link in data.links {
                draw_link(ctx, link, data.horizontal);
            }
            for node in data.nodes {
                draw_node(ctx, node);
            }
            if data.names_visible {
                for node in data.nodes {
                    if let Some(label) = &node.label {
                        draw_label(ctx, node, label, vp.zoom);
                    }
                }
            }
        });
    frame.render_widget(canvas, rect);
}

/// Smooth parent→child curve: a cubic with control points at the midpoint of
/// the depth axis, sampled into short segments.
fn draw_link(ctx: &mut Context<'_>, link: &DiagramLink, horizontal: bool) {
    let (sx, sy) = link.from;
    let (tx, ty) = link.to;
    let (c1, c2) = if horizontal {
        let mx = (sx + tx) / 2.0;
        ((mx, sy), (mx, ty))
    } else {
        let my = (sy + ty) / 2.0;
        ((sx, my), (tx, my))
    };

    let color = link_shade(link.weight);
    let mut prev = (sx, sy);
    for step in 1..=CURVE_SEGMENTS {
        let t = step as f64 / CURVE_SEGMENTS as f64;
        let next = cubic_point((sx, sy), c1, c2, (tx, ty), t);
        ctx.draw(&CanvasLine {
            x1: prev.0,
            y1: -prev.1,
            x2: next.0,
            y2: -next.1,
            color,
        });
        prev = next;
    }
}

fn draw_node(ctx: &mut Context<'_>, node: &DiagramNode) {
    let (x, y) = node.pos;
    let fill = if node.depth == 0 { ROOT_FILL } else { REPLY_FILL };
    ctx.draw(&Circle {
        x,
        y: -y,
        radius: NODE_RADIUS,
        color: fill,
    });
    if node.hovered || node.selected {
        let ring = if node.hovered {
            Color::White
        } else {
            Color::Yellow
        };
        ctx.draw(&Circle {
            x,
            y: -y,
            radius: NODE_RADIUS + 0.6,
            color: ring,
        });
    }
}

fn draw_label(ctx: &mut Context<'_>, node: &DiagramNode, label: &str, zoom: f64) {
    let (x, y) = node.pos;
    // Root labels sit to the left of the node, leaves to the right. Text
    // occupies cells regardless of zoom, so the offset is scaled back.
    let lx = if node.depth == 0 {
        x - (label.chars().count() as f64 + 2.0) / zoom
    } else {
        x + 2.0 / zoom
    };
    ctx.print(
        lx,
        -y,
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Gray),
        )),
    );
}

pub(crate) fn cubic_point(
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
    t: f64,
) -> (f64, f64) {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

/// Terminal cells have no stroke width; heavier links render brighter.
pub(crate) fn link_shade(weight: f64) -> Color {
    let t = ((weight - 1.5) / 2.5).clamp(0.0, 1.0);
    let v = (0x50 as f64 + t * f64::from(0xA8 - 0x50)) as u8;
    Color::Rgb(v, v, v)
}

// ---------------------------------------------------------------------------
// Comment-thread panel
// ---------------------------------------------------------------------------

fn draw_chain_panel(frame: &mut Frame, rect: Rect, chain: &[ChainEntry]) {
    let block = Block::default()
        .title(" comment thread ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .padding(Padding::new(1, 1, 0, 0));
    let inner_width = block.inner(rect).width as usize;

    let lines = if chain.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "click a node to trace its thread",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        chain_lines(chain, inner_width)
    };

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// Pre-wrapped panel lines: each entry indented by its position in the chain,
/// with a separator rule between entries but not after the last.
pub(crate) fn chain_lines(chain: &[ChainEntry], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, entry) in chain.iter().enumerate() {
        let indent = (idx * 2).min(width.saturating_sub(10));
        let pad = " ".repeat(indent);
        let wrap_width = width.saturating_sub(indent).max(8);

        let name_color = if entry.is_root { ROOT_FILL } else { REPLY_FILL };
        lines.push(Line::from(vec![
            Span::raw(pad.clone()),
            Span::styled(
                entry.author.clone(),
                Style::default()
                    .fg(name_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        for piece in textwrap::wrap(&entry.text, wrap_width) {
            lines.push(Line::from(vec![
                Span::raw(pad.clone()),
                Span::styled(piece.into_owned(), Style::default().fg(Color::Gray)),
            ]));
        }
        if entry.more_replies {
            lines.push(Line::from(vec![
                Span::raw(pad.clone()),
                Span::styled(
                    "(more replies not shown)",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }
        if idx + 1 < chain.len() {
            lines.push(Line::from(vec![
                Span::raw(pad),
                Span::styled(
                    "─".repeat(wrap_width.min(18)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn draw_tooltip(frame: &mut Frame, area: Rect, tooltip: &Tooltip) {
    let width = TOOLTIP_WIDTH.min(area.width.saturating_sub(2));
    let wrap_width = width.saturating_sub(4).max(8) as usize;

    let mut lines = vec![Line::from(Span::styled(
        tooltip.heading.clone(),
        Style::default().fg(Color::DarkGray),
    ))];
    for piece in textwrap::wrap(&tooltip.excerpt, wrap_width) {
        lines.push(Line::from(piece.into_owned()));
    }
    if tooltip.more_replies {
        lines.push(Line::from(Span::styled(
            "(more replies not shown)",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let height = (lines.len() as u16).saturating_add(2);
    let rect = tooltip_rect(tooltip.at, (width, height), area);

    frame.render_widget(Clear, rect);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                format!(" {} ", tooltip.author),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(paragraph, rect);
}

/// Place the tooltip beside the cursor, flipped or clamped when it would
/// leave the frame.
pub(crate) fn tooltip_rect(at: (u16, u16), size: (u16, u16), area: Rect) -> Rect {
    let (width, height) = size;
    let mut x = at.0.saturating_add(2);
    if x.saturating_add(width) > area.right() {
        x = at.0.saturating_sub(width.saturating_add(2)).max(area.left());
    }
    let mut y = at.1.saturating_add(1);
    if y.saturating_add(height) > area.bottom() {
        y = at.1.saturating_sub(height).max(area.top());
    }
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_selector(frame: &mut Frame, area: Rect, selector: &SelectorView<'_>) {
    let rect = centered_rect(area, 56, 50);
    frame.render_widget(Clear, rect);

    let title = Line::from(vec![
        Span::styled(
            "Posts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("[Esc] close", Style::default().fg(Color::Gray)),
    ]);

    let cursor = selector.cursor.min(selector.entries.len().saturating_sub(1));
    let mut lines = Vec::new();
    for (idx, (label, comment_count)) in selector.entries.iter().enumerate() {
        let selected = idx == cursor;
        let indicator = if selected { ">" } else { " " };
        let base_style = if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{indicator} {label}"), base_style),
            Span::styled(
                format!(
                    "  ({} comment{})",
                    comment_count,
                    if *comment_count == 1 { "" } else { "s" }
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Use arrows/jk to move, Enter to view.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(panel, rect);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let rect = centered_rect(area, 48, 60);
    frame.render_widget(Clear, rect);

    let key = |k: &str, what: &str| {
        Line::from(vec![
            Span::styled(format!("  {k:<14}"), Style::default().fg(Color::Cyan)),
            Span::styled(what.to_string(), Style::default().fg(Color::Gray)),
        ])
    };
    let lines = vec![
        key("mouse move", "hover a node for details"),
        key("click", "trace the comment thread"),
        key("drag", "pan the diagram"),
        key("scroll", "zoom"),
        key("arrows/hjkl", "pan"),
        key("+ / -", "zoom in / out"),
        key("r", "reset pan & zoom"),
        key("o", "toggle orientation"),
        key("n", "toggle author names"),
        key("p", "choose a post"),
        key("Tab", "next post"),
        key("q", "quit"),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                " help ",
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .padding(Padding::new(1, 1, 1, 1)),
    );
    frame.render_widget(panel, rect);
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

fn draw_status(frame: &mut Frame, rect: Rect, data: &RenderData<'_>) {
    let mut info = vec![
        Span::styled(
            data.title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            data.orientation_label.to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!("zoom {:.1}x", data.viewport.zoom),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            if data.names_visible {
                "names on"
            } else {
                "names off"
            },
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(message) = data.message {
        info.push(Span::raw("  "));
        info.push(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let lines = vec![
        Line::from(info),
        Line::from(Span::styled(
            data.hints.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), rect);
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_curve_hits_its_endpoints() {
        let p0 = (0.0, 0.0);
        let p3 = (10.0, 4.0);
        let c1 = (5.0, 0.0);
        let c2 = (5.0, 4.0);
        assert_eq!(cubic_point(p0, c1, c2, p3, 0.0), p0);
        let end = cubic_point(p0, c1, c2, p3, 1.0);
        assert!((end.0 - p3.0).abs() < 1e-9);
        assert!((end.1 - p3.1).abs() < 1e-9);
    }

    #[test]
    fn heavier_links_render_brighter() {
        let dim = link_shade(1.5);
        let bright = link_shade(4.0);
        let level = |c: Color| match c {
            Color::Rgb(v, _, _) => v,
            _ => panic!("expected rgb"),
        };
        assert!(level(bright) > level(dim));
        // Weights outside the expected range clamp instead of wrapping.
        assert_eq!(link_shade(0.0), link_shade(1.5));
        assert_eq!(link_shade(9.0), link_shade(4.0));
    }

    #[test]
    fn chain_lines_indent_and_separate() {
        let chain = vec![
            ChainEntry {
                author: "op".into(),
                text: "root text".into(),
                is_root: true,
                more_replies: false,
            },
            ChainEntry {
                author: "replier".into(),
                text: "reply text".into(),
                is_root: false,
                more_replies: false,
            },
        ];
        let lines = chain_lines(&chain, 30);

        let rendered: Vec<String> = lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect();
        assert!(rendered[0].starts_with("op"));
        // Second entry is indented one step further.
        assert!(rendered.iter().any(|l| l.starts_with("  replier")));
        // Exactly one separator for two entries.
        let separators = rendered.iter().filter(|l| l.contains('─')).count();
        assert_eq!(separators, 1);
    }

    #[test]
    fn chain_lines_single_entry_has_no_separator() {
        let chain = vec![ChainEntry {
            author: "op".into(),
            text: "only".into(),
            is_root: true,
            more_replies: false,
        }];
        let lines = chain_lines(&chain, 30);
        assert!(lines.iter().all(|l| {
            l.spans
                .iter()
                .all(|s| !s.content.contains('─'))
        }));
    }

    #[test]
    fn tooltip_flips_to_stay_inside_the_frame() {
        let area = Rect::new(0, 0, 80, 24);
        // Near the right edge the tooltip flips to the cursor's left.
        let rect = tooltip_rect((78, 5), (36, 6), area);
        assert!(rect.right() <= area.right());
        assert!(rect.x < 78);
        // Near the bottom it moves above the cursor.
        let rect = tooltip_rect((10, 23), (36, 6), area);
        assert!(rect.bottom() <= area.bottom());
    }

    #[test]
    fn panes_reserve_the_chain_panel_and_status_rows() {
        let p = panes(Rect::new(0, 0, 120, 40));
        assert_eq!(p.chain.width, CHAIN_PANEL_WIDTH);
        assert_eq!(p.status.height, 2);
        assert!(p.diagram.width > 0);
        // The chain panel sits to the diagram's right.
        assert_eq!(p.diagram.right(), p.chain.left());
    }
}
