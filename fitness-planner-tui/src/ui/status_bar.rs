// fitness-planner-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, App, FocusedField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.active_modal {
        ActiveModal::None => match app.focused_field {
            FocusedField::Age => " [Tab/↑↓] Field | [0-9/Bksp] Edit age | [s] Generate | [x/X] Toasts | [?] Help | [Q]uit ",
            FocusedField::Submit => " [Tab/↑↓] Field | [Enter/s] Generate | [PgUp/PgDn] Scroll | [x/X] Toasts | [?] Help | [Q]uit ",
            _ => " [Tab/↑↓] Field | [←→/hl] Change | [s] Generate | [x/X] Toasts | [?] Help | [Q]uit ",
        },
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
    };

    let (state_text, state_color) = if app.form.is_loading() {
        (format!("{} 生成中... ", app.spinner()), Color::Yellow)
    } else if !app.form.field_errors().is_empty() {
        (
            format!("入力エラー {}件 ", app.form.field_errors().len()),
            Color::Red,
        )
    } else {
        (String::new(), Color::White)
    };

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(80), Constraint::Percentage(20)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let state_paragraph = Paragraph::new(state_text)
        .style(Style::default().bg(Color::DarkGray).fg(state_color))
        .alignment(Alignment::Right);
    f.render_widget(state_paragraph, status_chunks[1]);
}
