//! Draws the virtual display of the playground with `ratatui`.
//!
//! Display pixels map onto terminal cells through a [`Viewport`]; every
//! window is a bordered block at its visual bounds (layer transform applied),
//! so tuck and snap-back animations are visible as they run. All drawing
//! goes through [`UiFrame`], which clips to the visible buffer because scaled
//! rectangles regularly poke past the edges.

use indoc::indoc;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect as CellRect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::geometry::{Point, Rect};
use crate::playground::Playground;
use crate::window::headless::HeadlessHost;
use crate::window::{Container, HelperKind, WindowHost, WindowId};

const HELP_HEADER: &str = indoc! {"
    Drag a floated window by its body. Drop it on the left or right edge in
    tablet mode to snap it, fling it sideways to tuck it. Drag the divider to
    resize a split view; push it to an edge to end the split. In overview,
    drag desk mini views to reorder them.
"};

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: CellRect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    pub fn area(&self) -> CellRect {
        self.area
    }

    fn clip_rect(&self, rect: CellRect) -> Option<CellRect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: CellRect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn fill(&mut self, area: CellRect, symbol: &str, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol).set_style(style);
                }
            }
        }
    }
}

/// Maps display pixels onto a rectangle of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: CellRect,
    pub display: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            area: CellRect::new(0, 0, 80, 24),
            display: Rect::new(0, 0, 1600, 1000),
        }
    }
}

impl Viewport {
    pub fn new(area: CellRect, display: Rect) -> Self {
        Self { area, display }
    }

    fn column_of(&self, x: i32) -> f64 {
        (x - self.display.x) as f64 * self.area.width as f64 / self.display.width.max(1) as f64
    }

    fn row_of(&self, y: i32) -> f64 {
        (y - self.display.y) as f64 * self.area.height as f64 / self.display.height.max(1) as f64
    }

    /// Cells covered by `rect`, clipped to the viewport. `None` when nothing
    /// of it is visible.
    pub fn to_cells(&self, rect: &Rect) -> Option<CellRect> {
        let left = self.column_of(rect.x).floor();
        let top = self.row_of(rect.y).floor();
        let right = self.column_of(rect.right()).ceil();
        let bottom = self.row_of(rect.bottom()).ceil();

        let clamp_x = |v: f64| v.clamp(0.0, self.area.width as f64) as u16;
        let clamp_y = |v: f64| v.clamp(0.0, self.area.height as f64) as u16;
        let (x0, x1) = (clamp_x(left), clamp_x(right));
        let (y0, y1) = (clamp_y(top), clamp_y(bottom));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CellRect::new(
            self.area.x + x0,
            self.area.y + y0,
            x1 - x0,
            y1 - y0,
        ))
    }

    /// Display point at the center of a cell, or `None` outside the
    /// viewport.
    pub fn to_display(&self, column: u16, row: u16) -> Option<Point> {
        let inside = column >= self.area.x
            && column < self.area.right()
            && row >= self.area.y
            && row < self.area.bottom();
        inside.then(|| self.to_display_clamped(column, row))
    }

    pub fn to_display_clamped(&self, column: u16, row: u16) -> Point {
        let column = column.clamp(self.area.x, self.area.right().saturating_sub(1));
        let row = row.clamp(self.area.y, self.area.bottom().saturating_sub(1));
        let px_per_column = self.display.width as f64 / self.area.width.max(1) as f64;
        let px_per_row = self.display.height as f64 / self.area.height.max(1) as f64;
        let x = ((column - self.area.x) as f64 + 0.5) * px_per_column;
        let y = ((row - self.area.y) as f64 + 0.5) * px_per_row;
        Point::new(
            self.display.x + x.floor() as i32,
            self.display.y + y.floor() as i32,
        )
    }
}

/// Splits the terminal into display, optional log panel and status line.
pub fn split_screen(area: CellRect, show_log: bool) -> (CellRect, Option<CellRect>, CellRect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    if !show_log {
        return (rows[0], None, rows[1]);
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[0]);
    (columns[0], Some(columns[1]), rows[1])
}

/// Display viewport inside the bordered display block.
pub fn display_viewport(area: CellRect, display: Rect) -> Viewport {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    Viewport::new(inner, display)
}

pub fn render(frame: &mut Frame<'_>, playground: &Playground) {
    let (display_area, log_area, status_area) = split_screen(frame.area(), playground.show_log());
    let mut ui = UiFrame::new(frame);
    let host = playground.wm().host();
    let viewport = playground.viewport();

    ui.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(display_title(host)),
        display_area,
    );
    draw_display(&mut ui, playground, &viewport);

    if let Some(log_area) = log_area {
        draw_log(&mut ui, playground, log_area);
    }
    ui.render_widget(Paragraph::new(status_line(playground)), status_area);
    if playground.show_help() {
        draw_help(&mut ui, playground);
    }
}

fn display_title(host: &HeadlessHost) -> String {
    let display = host.display_bounds();
    format!(
        " {}x{} {} {} desk {} ",
        display.width,
        display.height,
        if host.is_in_tablet_mode() {
            "tablet"
        } else {
            "clamshell"
        },
        if host.orientation().is_landscape() {
            "landscape"
        } else {
            "portrait"
        },
        host.active_desk().0 + 1,
    )
}

fn draw_display(ui: &mut UiFrame<'_>, playground: &Playground, viewport: &Viewport) {
    let host = playground.wm().host();
    let display = host.display_bounds();
    let work_area = host.work_area();
    let shelf = Rect::new(
        display.x,
        work_area.bottom(),
        display.width,
        display.bottom() - work_area.bottom(),
    );
    if let Some(cells) = viewport.to_cells(&shelf) {
        ui.fill(cells, " ", Style::default().bg(Color::DarkGray));
    }

    for container in [host.active_desk_container(), Container::Float] {
        for window in host.children(container) {
            draw_window(ui, playground, viewport, window);
        }
    }
    if playground.in_overview() {
        draw_desks_bar(ui, playground, viewport);
    }
    for window in host.children(Container::Overlay) {
        draw_window(ui, playground, viewport, window);
    }

    if let Some(cells) = host.keyboard_bounds().and_then(|kb| viewport.to_cells(&kb)) {
        ui.render_widget(Clear, cells);
        ui.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .title(" keyboard ")
                .style(Style::default().fg(Color::Gray)),
            cells,
        );
    }
}

fn draw_window(
    ui: &mut UiFrame<'_>,
    playground: &Playground,
    viewport: &Viewport,
    window: WindowId,
) {
    let host = playground.wm().host();
    if !host.is_visible(window) {
        return;
    }
    let Some(cells) = viewport.to_cells(&host.visual_bounds(window)) else {
        return;
    };
    match host.helper_kind(window) {
        Some(HelperKind::Divider) => {
            let style = if playground.wm().split_view().divider().is_resizing() {
                Style::default().bg(Color::Yellow)
            } else {
                Style::default().bg(Color::Gray)
            };
            ui.fill(cells, " ", style);
        }
        Some(HelperKind::TuckHandle) => {
            ui.fill(cells, "▒", Style::default().fg(Color::LightBlue));
        }
        Some(HelperKind::DeskDragProxy) => {
            let name = playground
                .wm()
                .desks()
                .dragged_desk()
                .and_then(|desk| playground.wm().desks().desks().iter().find(|d| d.id == desk))
                .map(|desk| desk.name.clone())
                .unwrap_or_default();
            ui.render_widget(Clear, cells);
            ui.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .title(name)
                    .border_style(Style::default().fg(Color::Yellow)),
                cells,
            );
        }
        None => {
            let active = host.active_window() == Some(window);
            let state = playground.wm().window_state(window);
            let title = format!(" {window} {state:?} ");
            let border = if active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ui.render_widget(Clear, cells);
            ui.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border),
                cells,
            );
        }
    }
}

fn draw_desks_bar(ui: &mut UiFrame<'_>, playground: &Playground, viewport: &Viewport) {
    let desks = playground.wm().desks();
    if let Some(cells) = viewport.to_cells(&desks.bounds()) {
        ui.render_widget(Clear, cells);
        ui.fill(cells, " ", Style::default().bg(Color::Black));
    }
    let active = playground.wm().host().active_desk();
    for (index, desk) in desks.desks().iter().enumerate() {
        if desks.dragged_desk() == Some(desk.id) {
            continue;
        }
        let Some(cells) = viewport.to_cells(&desks.mini_view_bounds(index)) else {
            continue;
        };
        let border = if desk.id == active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        ui.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .title(desk.name.as_str())
                .border_style(border),
            cells,
        );
    }
}

fn draw_log(ui: &mut UiFrame<'_>, playground: &Playground, area: CellRect) {
    let block = Block::default().borders(Borders::ALL).title(" log ");
    let inner = block.inner(area);
    let lines: Vec<Line> = playground
        .log()
        .map(|log| log.tail(inner.height as usize))
        .unwrap_or_default()
        .into_iter()
        .map(Line::from)
        .collect();
    ui.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_line(playground: &Playground) -> String {
    let wm = playground.wm();
    let active = wm
        .host()
        .active_window()
        .map(|w| format!("{w} {:?}", wm.window_state(w)))
        .unwrap_or_else(|| "no active window".to_string());
    let split = match (wm.split_view().primary_window(), wm.split_view().secondary_window()) {
        (Some(p), Some(s)) => format!(" | split {p}|{s} at {}", wm.split_view().divider_position()),
        (Some(w), None) | (None, Some(w)) => format!(" | {w} snapped alone"),
        (None, None) => String::new(),
    };
    format!(
        " {active}{split} | {} | ? help",
        playground.status()
    )
}

fn draw_help(ui: &mut UiFrame<'_>, playground: &Playground) {
    let area = ui.area();
    let width = area.width.min(64);
    let height = area.height.min(30);
    let popup = CellRect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let mut lines: Vec<Line> = HELP_HEADER.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    for (action, combos) in playground.keybindings().help_entries() {
        lines.push(Line::from(format!("{:<14} {action}", combos.join(", "))));
    }
    ui.render_widget(Clear, popup);
    ui.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" help ")),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_display_onto_cells() {
        let viewport = Viewport::new(CellRect::new(1, 1, 160, 50), Rect::new(0, 0, 1600, 1000));
        assert_eq!(
            viewport.to_cells(&Rect::new(0, 0, 800, 500)),
            Some(CellRect::new(1, 1, 80, 25))
        );
        // Partially off screen is clipped, fully off screen is dropped.
        assert_eq!(
            viewport.to_cells(&Rect::new(-100, 0, 200, 100)),
            Some(CellRect::new(1, 1, 10, 5))
        );
        assert_eq!(viewport.to_cells(&Rect::new(-300, 0, 200, 100)), None);
    }

    #[test]
    fn viewport_maps_cells_back_to_display() {
        let viewport = Viewport::new(CellRect::new(1, 1, 160, 50), Rect::new(0, 0, 1600, 1000));
        assert_eq!(viewport.to_display(1, 1), Some(Point::new(5, 10)));
        assert_eq!(viewport.to_display(80, 25), Some(Point::new(795, 490)));
        assert_eq!(viewport.to_display(0, 0), None);
        assert_eq!(viewport.to_display_clamped(500, 500), Point::new(1595, 990));
    }

    #[test]
    fn log_panel_takes_a_column() {
        let (display, log, status) = split_screen(CellRect::new(0, 0, 100, 40), true);
        assert_eq!(display, CellRect::new(0, 0, 70, 39));
        assert_eq!(log, Some(CellRect::new(70, 0, 30, 39)));
        assert_eq!(status, CellRect::new(0, 39, 100, 1));
    }
}
