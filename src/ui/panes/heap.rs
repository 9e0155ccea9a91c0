//! Heap pane
//!
//! Only cells holding a non-zero value are listed; the title shows how many
//! cells the heap has grown to and its limit.

use super::{clamp_scroll, pane_block};
use crate::memory::{Heap, Number};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use std::cmp::Ordering;

/// Render the heap pane
pub fn render_heap_pane<N: Number>(
    frame: &mut Frame,
    area: Rect,
    heap: &Heap<N>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Heap [{}/{} cells] ", heap.len(), heap.max_cells());
    let block = pane_block(&title, is_focused);

    let cells: Vec<(usize, &N)> = heap
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, value)| value.cmp_zero() != Ordering::Equal)
        .collect();

    if cells.is_empty() {
        let paragraph = Paragraph::new("(all zero)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = clamp_scroll(scroll_offset, cells.len(), area.height);

    let items: Vec<ListItem> = cells
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(address, value)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{:>6}] ", address),
                    Style::default().fg(DEFAULT_THEME.primary),
                ),
                Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.number)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
