// fitness-planner-tui/src/ui/form_view.rs
use crate::{
    app::{ActiveModal, App, FocusedField},
    ui::layout::header_color,
};
use fitness_planner_lib::FormField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const RESULT_TITLE: &str = " あなたの1日のトレーニングメニュー ";
const SUBMIT_LABEL: &str = "トレーニングメニューを生成";
const SUBMITTING_LABEL: &str = "生成中...";
const FIELDS: [FormField; 4] = [
    FormField::Age,
    FormField::Gender,
    FormField::FitnessLevel,
    FormField::ExerciseFrequency,
];
const LINES_PER_FIELD: u16 = 3;
// Borders, four fields, a spacer and the button
const FORM_HEIGHT: u16 = 2 + LINES_PER_FIELD * FIELDS.len() as u16 + 2;
const VALUE_INDENT: &str = "  ";

pub fn render_planner(f: &mut Frame, app: &App, area: Rect) {
    let area = area.inner(&Margin {
        vertical: 0,
        horizontal: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)])
        .split(area);

    render_form(f, app, chunks[0]);
    render_result(f, app, chunks[1]);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let accent = header_color(app);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 入力 ")
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for field in FIELDS {
        let focused = app.focused_field.form_field() == Some(field);
        lines.push(label_line(field, focused, accent));
        lines.push(value_line(app, field, focused));
        lines.push(hint_line(app, field));
    }
    lines.push(Line::from(""));
    lines.push(submit_line(app));

    f.render_widget(Paragraph::new(lines), inner);

    if app.focused_field == FocusedField::Age && app.active_modal == ActiveModal::None {
        let text_width = Line::from(app.form.input().age.as_str()).width() as u16;
        f.set_cursor(inner.x + VALUE_INDENT.len() as u16 + text_width, inner.y + 1);
    }
}

fn label_line(field: FormField, focused: bool, accent: Color) -> Line<'static> {
    if focused {
        Line::from(vec![
            Span::styled("▶ ", Style::default().fg(accent)),
            Span::styled(field.label(), Style::default().fg(accent).bold()),
        ])
    } else {
        Line::from(vec![Span::raw(VALUE_INDENT), Span::raw(field.label()).bold()])
    }
}

fn value_line<'a>(app: &'a App, field: FormField, focused: bool) -> Line<'a> {
    let value = app.form.input().value(field);
    let style = if focused {
        Style::default().reversed()
    } else {
        Style::default()
    };

    let content = match field {
        FormField::Age => Span::styled(value, style),
        _ if value.is_empty() => Span::styled(field.hint(), style.fg(Color::DarkGray)),
        _ => Span::styled(format!("◀ {value} ▶"), style),
    };
    Line::from(vec![Span::raw(VALUE_INDENT), content])
}

fn hint_line<'a>(app: &'a App, field: FormField) -> Line<'a> {
    match app.form.field_error(field) {
        Some(message) => Line::from(vec![
            Span::raw(VALUE_INDENT),
            Span::styled(message, Style::default().fg(Color::Red)),
        ]),
        // Select fields show their hint as a placeholder instead
        None if field == FormField::Age => Line::from(vec![
            Span::raw(VALUE_INDENT),
            Span::styled(field.hint(), Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(""),
    }
}

fn submit_line(app: &App) -> Line<'static> {
    let focused = app.focused_field == FocusedField::Submit;
    let (label, mut style) = if app.form.is_loading() {
        (
            format!("[ {} {} ]", app.spinner(), SUBMITTING_LABEL),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )
    } else {
        (
            format!("[ {SUBMIT_LABEL} ]"),
            Style::default().fg(Color::White).bold(),
        )
    };
    if focused {
        style = style.reversed();
    }
    Line::styled(label, style).alignment(Alignment::Center)
}

fn render_result(f: &mut Frame, app: &App, area: Rect) {
    // Nothing to show until the first successful submission
    let Some(text) = app.form.training_menu() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(RESULT_TITLE)
        .title_style(Style::default().bold())
        .border_style(Style::default().fg(header_color(app)));
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    f.render_widget(paragraph, area);
}
