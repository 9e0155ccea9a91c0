//! Debugger console pane: message log plus the input line
//!
//! The input line doubles as the program's keyboard while a read instruction
//! waits for data; the prompt changes to show which one is being typed.

use super::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the console pane
pub struct ConsoleRenderData<'a> {
    pub log: &'a [String],
    pub input: &'a str,
    pub prompt: &'a str,
    /// The program, not the debugger, receives the typed line
    pub is_program_input: bool,
    /// A command is running and input is ignored
    pub is_busy: bool,
}

/// Render the console pane
pub fn render_console_pane(
    frame: &mut Frame,
    area: Rect,
    data: ConsoleRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Console ", is_focused);

    // one row of the inner area is reserved for the input line
    let log_height = area.height.saturating_sub(1);
    let visible_height = clamp_scroll(scroll_offset, data.log.len(), log_height);

    let mut lines: Vec<Line> = data
        .log
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| Line::styled(line.as_str(), Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    let prompt_style = if data.is_program_input {
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD)
    };
    let input_line = if data.is_busy {
        Line::from(Span::styled(
            "running... (Esc or Ctrl-C to interrupt)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))
    } else {
        Line::from(vec![
            Span::styled(data.prompt, prompt_style),
            Span::styled(data.input, Style::default().fg(DEFAULT_THEME.fg)),
        ])
    };
    let input_row = lines.len() as u16;
    lines.push(input_line);

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if is_focused && !data.is_busy {
        let cursor_x = area.x + 1 + (data.prompt.chars().count() + data.input.chars().count()) as u16;
        let cursor_y = area.y + 1 + input_row;
        if cursor_x < area.right().saturating_sub(1) && cursor_y < area.bottom().saturating_sub(1) {
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }
}
