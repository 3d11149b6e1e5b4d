// fitness-planner-tui/src/ui/modals.rs
use crate::{
    app::{ActiveModal, App},
    ui::layout::centered_rect,
};
use ratatui::{
    layout::Margin,
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::None => {}
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" q / Ctrl+C: Quit"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" s: Generate the training menu"),
        Line::from(" x: Dismiss newest notification"),
        Line::from(" X: Dismiss all notifications"),
        Line::from(" PgUp / PgDn: Scroll the training menu"),
        Line::from(""),
        Line::from("--- Form ---").style(Style::new().bold().underlined()),
        Line::from(" Tab / j / ↓: Next field"),
        Line::from(" Shift+Tab / k / ↑: Previous field"),
        Line::from(" 0-9 / Backspace: Edit age (age field)"),
        Line::from(" h / ←, l / → / Space: Change selection"),
        Line::from(" Enter: Next field, or generate on the button"),
        Line::from(""),
        Line::from("Submitting is disabled while a request is in flight.")
            .style(Style::new().italic()),
    ];

    let paragraph = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .alignment(ratatui::layout::Alignment::Left);
    f.render_widget(paragraph, area.inner(&Margin { vertical: 1, horizontal: 2 }));
}
