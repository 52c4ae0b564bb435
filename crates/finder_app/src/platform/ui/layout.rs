use ratatui::layout::{Constraint, Layout, Rect};

use super::constants::{BUTTON_WIDTH, INPUT_HEIGHT};

/// Screen regions of the search view, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    pub input: Rect,
    pub button: Rect,
    pub status: Rect,
    pub results: Rect,
    pub help: Rect,
}

pub fn split(area: Rect) -> ViewLayout {
    let [search_row, status, results, help] = Layout::vertical([
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [input, button] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(BUTTON_WIDTH)])
            .areas(search_row);

    ViewLayout {
        input,
        button,
        status,
        results,
        help,
    }
}
