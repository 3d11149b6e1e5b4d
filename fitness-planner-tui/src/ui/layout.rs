// fitness-planner-tui/src/ui/layout.rs
use crate::{
    app::{ActiveModal, App},
    ui::{
        form_view::render_planner, modals::render_modal, status_bar::render_status_bar,
        toasts::render_toasts,
    },
};
use fitness_planner_lib::{parse_color, StandardColor};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

const PAGE_TITLE: &str = "フィットネスプランナー";
const PAGE_SUBTITLE: &str = "あなたに最適な1日のトレーニングメニューを作成します";

pub fn render_ui(f: &mut Frame, app: &App) {
    let size = f.size();

    // Header on top, form and results below, status bar at the bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status Bar
        ])
        .split(size);

    render_header(f, app, main_chunks[0]);
    render_planner(f, app, main_chunks[1]);
    render_status_bar(f, app, main_chunks[2]);
    render_toasts(f, app, main_chunks[1]);

    // Render modal last if active
    if app.active_modal != ActiveModal::None {
        render_modal(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(vec![
        Line::styled(
            PAGE_TITLE,
            Style::default()
                .fg(header_color(app))
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(PAGE_SUBTITLE, Style::default().fg(Color::Gray)),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, area.inner(&ratatui::layout::Margin { vertical: 0, horizontal: 1 }));
}

/// Accent colour from the `[theme]` config section, green if it does not parse.
pub fn header_color(app: &App) -> Color {
    match parse_color(&app.service.config.theme.header_color) {
        Ok(color) => to_tui_color(color),
        Err(_) => Color::Green,
    }
}

fn to_tui_color(color: StandardColor) -> Color {
    match color {
        StandardColor::Black => Color::Black,
        StandardColor::Red => Color::LightRed,
        StandardColor::Green => Color::LightGreen,
        StandardColor::Yellow => Color::LightYellow,
        StandardColor::Blue => Color::LightBlue,
        StandardColor::Magenta => Color::LightMagenta,
        StandardColor::Cyan => Color::LightCyan,
        StandardColor::White => Color::White,
        StandardColor::DarkGrey => Color::DarkGray,
        StandardColor::DarkRed => Color::Red,
        StandardColor::DarkGreen => Color::Green,
        StandardColor::DarkYellow => Color::Yellow,
        StandardColor::DarkBlue => Color::Blue,
        StandardColor::DarkMagenta => Color::Magenta,
        StandardColor::DarkCyan => Color::Cyan,
        StandardColor::Grey => Color::Gray,
    }
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
