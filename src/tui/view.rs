use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::shared::{DisplayState, FillView, BANK_SIZE, TAP_KEYS};

use super::grid::draw_step_grid;

const NAME_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // transport
            Constraint::Length(6), // pattern grid
            Constraint::Length(3), // fills
            Constraint::Length(TAP_PANE_HEIGHT),
            Constraint::Length(3), // prompt
            Constraint::Min(0),
        ])
        .split(area);

    draw_transport(frame, sections[0], state);
    let current = state.playing.then_some(state.step);
    draw_step_grid(frame, sections[1], &state.pattern, current);
    draw_fills(frame, sections[2], state);
    draw_taps(frame, sections[3], state);
    draw_prompt(frame, sections[4], state);
}

// truncate to 16 columns with a trailing ~, or pad to 16
pub fn fit_name(name: &str) -> String {
    let count = name.chars().count();
    if count > NAME_WIDTH {
        let mut s: String = name.chars().take(NAME_WIDTH - 1).collect();
        s.push('~');
        s
    } else {
        format!("{name:<NAME_WIDTH$}")
    }
}

fn key_span(label: &str, style: Style) -> Span<'static> {
    Span::styled(format!("[{label}]"), style)
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let stop = if state.playing { Style::default() } else { Style::default().fg(Color::Red) };
    let start = if state.playing { Style::default().fg(Color::Cyan) } else { Style::default() };
    let mute = if state.muted { Style::default().fg(Color::Yellow) } else { Style::default() };

    let line = Line::from(vec![
        key_span("-", stop),
        Span::raw(" Stop   "),
        key_span("=", start),
        Span::raw(" Start   "),
        key_span("+", Style::default()),
        Span::raw(" Resume   "),
        key_span("M", mute),
        Span::raw(" Mute   "),
        key_span("\\", Style::default()),
        Span::raw(" Shut Down   "),
        Span::styled(format!("{:.0} bpm", state.bpm), Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn fill_spans(key: &str, fill: &Option<FillView>, on: bool) -> Vec<Span<'static>> {
    match fill {
        Some(f) => {
            let style = if on {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Black).bg(Color::Red)
            };
            vec![
                key_span(key, style),
                Span::raw(format!(" {} /{:<2} ", fit_name(&f.name), f.interval)),
            ]
        }
        None => vec![
            key_span(key, Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {} /-- ", ".".repeat(NAME_WIDTH))),
        ],
    }
}

fn draw_fills(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let mut spans = fill_spans(":", &state.fills[0], state.fills_on[0]);
    spans.extend(fill_spans("\"", &state.fills[1], state.fills_on[1]));
    spans.push(Span::raw(" [C] Change  [Z] Add  [X] Delete"));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)), area);
}

// four rows of two taps, the page line, and the border
const TAP_PANE_HEIGHT: u16 = (BANK_SIZE / 2) as u16 + 1 + 2;

fn draw_taps(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let mut lines: Vec<Line> = TAP_KEYS
        .chunks(2)
        .zip(state.taps.chunks(2))
        .map(|(keys, names)| {
            let mut spans = Vec::new();
            for (key, name) in keys.iter().zip(names) {
                let label = key.to_ascii_uppercase().to_string();
                match name {
                    Some(n) => {
                        spans.push(key_span(&label, Style::default().fg(Color::Black).bg(Color::Yellow)));
                        spans.push(Span::raw(format!(" {} ", fit_name(n))));
                    }
                    None => {
                        spans.push(key_span(&label, Style::default().fg(Color::Yellow)));
                        spans.push(Span::raw(format!(" {} ", ".".repeat(NAME_WIDTH))));
                    }
                }
            }
            Line::from(spans)
        })
        .collect();

    let pages = if state.bank_count == 0 {
        "[<] ---/--- [>]".to_string()
    } else {
        format!("[<] {:03}/{:03} [>]", state.bank_index + 1, state.bank_count)
    };
    lines.push(Line::from(pages));
    frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL)), area);
}

fn draw_prompt(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let text = format!("> {}", state.prompt);
    frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL)), area);
}
