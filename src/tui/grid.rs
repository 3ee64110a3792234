use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::shared::{NUM_STEPS, STEP_KEYS};

const COLS: usize = NUM_STEPS / 2;
const ROWS: usize = 2;

// two rows of eight steps, labelled with their keys
pub fn draw_step_grid(frame: &mut Frame, area: Rect, filled: &[bool; NUM_STEPS], current: Option<u8>) {
    let row_constraints = [Constraint::Ratio(1, ROWS as u32); ROWS];
    let col_constraints = [Constraint::Ratio(1, COLS as u32); COLS];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints)
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let step = row_idx * COLS + col_idx;
            let style = step_style(filled[step], current == Some(step as u8));
            let label = STEP_KEYS[step].to_ascii_uppercase().to_string();
            let cell = Paragraph::new(label)
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_style(style));
            frame.render_widget(cell, *cell_area);
        }
    }
}

fn step_style(filled: bool, current: bool) -> Style {
    match (filled, current) {
        (_, true) => Style::default().fg(Color::Black).bg(Color::Cyan),
        (true, false) => Style::default().fg(Color::Black).bg(Color::Yellow),
        (false, false) => Style::default().fg(Color::Yellow),
    }
}
