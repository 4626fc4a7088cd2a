//! Widget layout for the study screen.
//!
//! Four bands top to bottom: category tabs, the question card, the
//! note pane, and a one-line status bar. The help overlay is drawn on
//! top when active.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::question::{AnswerEmphasis, Category, CategoryFilter};
use crate::session::SessionView;

use super::app::{App, InputMode};

pub(super) fn draw(frame: &mut Frame, app: &App) {
    let view = app.session.view();
    let bands = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_category_tabs(frame, bands[0], view.filter);
    draw_question_card(frame, bands[1], &view);
    draw_note_pane(frame, bands[2], &view, app.mode == InputMode::EditNote);
    draw_status_bar(frame, bands[3], &view);

    if app.mode == InputMode::Help {
        draw_help_overlay(frame, app);
    }
}

fn draw_category_tabs(frame: &mut Frame, area: Rect, filter: CategoryFilter) {
    let mut titles = vec![String::from("0 all")];
    titles.extend(
        Category::ALL
            .iter()
            .enumerate()
            .map(|(i, category)| format!("{} {}", i + 1, category.name())),
    );
    let selected = match filter {
        CategoryFilter::All => 0,
        CategoryFilter::Only(category) => {
            1 + Category::ALL
                .iter()
                .position(|&c| c == category)
                .unwrap_or(0)
        }
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Categories "))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_question_card(frame: &mut Frame, area: Rect, view: &SessionView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(progress_title(view.position, view.total));

    let Some(question) = view.question else {
        let empty = Paragraph::new("No questions in this category.")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![Line::from(question.text.clone()), Line::default()];
    if let Some(image_id) = &question.image_id {
        lines.push(Line::from(Span::styled(
            format!("[figure {image_id}]"),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::default());
    }
    for number in 1..=4u8 {
        if let Some(option) = question.option(number) {
            let emphasis = question.emphasis(view.answer_revealed, number);
            lines.push(Line::from(Span::styled(
                format!("{number}) {option}"),
                emphasis_style(emphasis),
            )));
        }
    }

    let card = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(card, area);
}

fn draw_note_pane(frame: &mut Frame, area: Rect, view: &SessionView, editing: bool) {
    let title = if editing {
        " Notes (Esc to finish) "
    } else {
        " Notes (Enter to edit) "
    };
    let mut text = view.note_draft.to_string();
    if editing {
        text.push('\u{258c}');
    }
    let pane = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(pane, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, view: &SessionView) {
    let gate = if view.reveal_before_advance {
        "on"
    } else {
        "off"
    };
    let status = format!(
        "order {} | reveal gate {} | ? help  q quit",
        view.ordering, gate
    );
    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(bar, area);
}

fn draw_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(frame.area(), 40, 60);
    let mut lines: Vec<Line> = app
        .bindings
        .help_entries()
        .into_iter()
        .map(|(keys, action)| Line::from(format!("{keys} -> {action}")))
        .collect();
    lines.push(Line::from("0-5 -> category filter"));
    lines.push(Line::from("Enter -> edit note"));
    lines.push(Line::from("Esc -> leave note editor"));

    let help = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Keys "));
    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

fn progress_title(position: usize, total: usize) -> String {
    if total == 0 {
        String::from(" 0 of 0 ")
    } else {
        format!(" {} of {} ", position + 1, total)
    }
}

fn emphasis_style(emphasis: AnswerEmphasis) -> Style {
    match emphasis {
        AnswerEmphasis::Normal => Style::default(),
        AnswerEmphasis::Emphasized => Style::default().add_modifier(Modifier::BOLD),
        AnswerEmphasis::Dimmed => Style::default().fg(Color::DarkGray),
    }
}

/// Rectangle covering the given percentages of `area`, centered.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
