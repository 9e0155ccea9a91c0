//! Program output pane

use super::{clamp_scroll, pane_block};
use crate::interpreter::io::ProgramOutput;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the output of the debugged program
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &ProgramOutput,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Program Output ", is_focused);
    let total_lines = output.line_count();

    if total_lines == 0 {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = clamp_scroll(scroll_offset, total_lines, area.height);

    let visible_items: Vec<ListItem> = output
        .lines()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line.into_owned()).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
