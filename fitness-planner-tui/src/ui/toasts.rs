// fitness-planner-tui/src/ui/toasts.rs
use crate::app::App;
use fitness_planner_lib::{Toast, ToastKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{
        block::{Position, Title},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

const TOAST_WIDTH: u16 = 44;

/// Stacks toasts in the bottom-right corner of `area`, newest at the bottom.
pub fn render_toasts(f: &mut Frame, app: &App, area: Rect) {
    let toasts = app.form.toasts();
    if toasts.is_empty() {
        return;
    }

    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;
    let mut bottom = area.y + area.height;

    for (index, toast) in toasts.iter().rev().enumerate() {
        let height = toast_height(toast, width);
        if bottom < area.y + height {
            break;
        }
        bottom -= height;
        render_toast(f, toast, Rect::new(x, bottom, width, height), index == 0);
    }
}

fn kind_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
        ToastKind::Info => Color::Blue,
    }
}

fn toast_height(toast: &Toast, width: u16) -> u16 {
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let text_width = Line::from(toast.message.as_str()).width();
    let message_lines = text_width.div_ceil(inner_width).max(1) as u16;
    message_lines + 2
}

fn render_toast(f: &mut Frame, toast: &Toast, area: Rect, newest: bool) {
    let color = kind_color(toast.kind);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if let Some(title) = &toast.title {
        block = block.title(Line::styled(format!(" {title} "), Style::default().fg(color).bold()));
    }
    if newest {
        block = block.title(
            Title::from("[x]")
                .alignment(Alignment::Right)
                .position(Position::Bottom),
        );
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(toast.message.as_str())
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
