//! Program listing pane
//!
//! Shows one row per instruction line: a breakpoint dot, the offset, the
//! SPACE/TAB/LF tokens (colored per byte) and the decoded mnemonic. The
//! current line is kept at a fixed visual row while stepping, so the listing
//! scrolls under it instead of the marker jumping around.

use super::pane_block;
use crate::interpreter::Machine;
use crate::memory::Number;
use crate::program::listing;
use crate::program::opcode::{LF, SPACE, TAB};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Scroll state for the program pane
pub struct ProgramScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

impl ProgramScrollState {
    pub fn new() -> Self {
        ProgramScrollState {
            offset: 0,
            target_line_row: None, // Will be set to center on first render
        }
    }
}

impl Default for ProgramScrollState {
    fn default() -> Self {
        Self::new()
    }
}

fn token_span(byte: u8) -> Span<'static> {
    let color = match byte {
        SPACE => DEFAULT_THEME.space_token,
        TAB => DEFAULT_THEME.tab_token,
        LF => DEFAULT_THEME.lf_token,
        _ => DEFAULT_THEME.error,
    };
    Span::styled(listing::token(byte), Style::default().fg(color))
}

/// Render the program listing pane
pub fn render_program_pane<N: Number>(
    frame: &mut Frame,
    area: Rect,
    machine: &Machine<N>,
    is_halted_on_error: bool,
    is_focused: bool,
    scroll_state: &mut ProgramScrollState,
) {
    let program = machine.program();
    let title = format!(" Program: {} ", program.name());
    let block = pane_block(&title, is_focused);

    if program.is_empty() {
        let paragraph = Paragraph::new("(no program loaded, try 'file <path>')")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let lines = program.lines();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if scroll_state.target_line_row.is_none() {
        scroll_state.target_line_row = Some(visible_height / 2);
    }
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(0)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    let current = machine
        .ip()
        .filter(|&ip| ip < program.len())
        .map(|ip| program.line_index(ip));

    // Keep the current line at the target row
    if let Some(index) = current {
        scroll_state.offset = index.saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(index, &start)| {
            let is_current = current == Some(index);
            let end = program.line_end(start);

            let marker = if machine.breakpoints().contains(start) {
                Span::styled("● ", Style::default().fg(DEFAULT_THEME.breakpoint))
            } else {
                Span::raw("  ")
            };
            let arrow = if is_current { "▶ " } else { "  " };
            let offset_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![
                marker,
                Span::styled(arrow, offset_style),
                Span::styled(format!("0x{:04x} ", start), offset_style),
                Span::styled(
                    format!("{:<10} ", listing::mnemonic::<N>(program, start)),
                    Style::default().fg(DEFAULT_THEME.mnemonic),
                ),
            ];
            spans.extend(program.bytes()[start..end].iter().map(|&b| token_span(b)));

            if is_current {
                let background = if is_halted_on_error {
                    Style::default().bg(DEFAULT_THEME.error).fg(Color::Black)
                } else {
                    Style::default().bg(DEFAULT_THEME.current_line_bg)
                };
                for span in &mut spans {
                    span.style = span.style.patch(background);
                }
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
