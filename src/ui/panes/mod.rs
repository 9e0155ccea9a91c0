//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`program`]: instruction listing with current line and breakpoint markers
//! - [`stack`]: data stack, top first
//! - [`heap`]: allocated heap cells
//! - [`backtrace`]: call/return stack
//! - [`terminal`]: output of the debugged program
//! - [`console`]: debugger messages and the command prompt
//! - [`status`]: status bar with keybindings and machine state
//!
//! Each pane module exports a `render_*_pane()` function taking the frame,
//! its area, the data to show, whether it is focused and its scroll state.

pub mod backtrace;
pub mod console;
pub mod heap;
pub mod program;
pub mod stack;
pub mod status;
pub mod terminal;

pub use backtrace::render_backtrace_pane;
pub use console::{render_console_pane, ConsoleRenderData};
pub use heap::render_heap_pane;
pub use program::{render_program_pane, ProgramScrollState};
pub use stack::render_stack_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered pane block, highlighted when focused
fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp a scroll offset so the last page stays full. Returns the number of
/// visible rows.
fn clamp_scroll(offset: &mut usize, total_items: usize, area_height: u16) -> usize {
    let visible_height = area_height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
    visible_height
}
