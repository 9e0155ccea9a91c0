//! Backtrace pane: the call/return stack, innermost frame first

use super::{clamp_scroll, pane_block};
use crate::interpreter::Machine;
use crate::memory::Number;
use crate::program::listing;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the backtrace pane
pub fn render_backtrace_pane<N: Number>(
    frame: &mut Frame,
    area: Rect,
    machine: &Machine<N>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let backtrace = machine.backtrace();
    let title = format!(" Backtrace [{}] ", backtrace.len());
    let block = pane_block(&title, is_focused);

    if backtrace.is_empty() {
        let paragraph = Paragraph::new("(not running)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = clamp_scroll(scroll_offset, backtrace.len(), area.height);
    let program = machine.program();

    let items: Vec<ListItem> = backtrace
        .iter_from_top()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(frame_index, &ip)| {
            let style = if frame_index == 0 {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            let mnemonic = if ip < program.len() {
                listing::mnemonic::<N>(program, program.line_begin(ip))
            } else {
                String::from("<end>")
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{:<3} 0x{:04x} ", frame_index, ip), style),
                Span::styled(mnemonic, Style::default().fg(DEFAULT_THEME.mnemonic)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
