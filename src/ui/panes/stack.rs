//! Data stack pane

use super::{clamp_scroll, pane_block};
use crate::debugger::report::format_entry;
use crate::memory::{Number, Stack};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the data stack, top first
pub fn render_stack_pane<N: Number>(
    frame: &mut Frame,
    area: Rect,
    stack: &Stack<N>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Data Stack [{}] ", stack.len());
    let block = pane_block(&title, is_focused);

    if stack.is_empty() {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = clamp_scroll(scroll_offset, stack.len(), area.height);

    let items: Vec<ListItem> = stack
        .iter_from_top()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(depth, value)| {
            let depth_style = if depth == 0 {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4} ", depth), depth_style),
                Span::styled(
                    format!("{:<12}", value.to_string()),
                    Style::default().fg(DEFAULT_THEME.number),
                ),
                Span::styled(format_entry(value), Style::default().fg(DEFAULT_THEME.comment)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
