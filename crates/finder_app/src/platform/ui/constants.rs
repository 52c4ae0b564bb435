use std::time::Duration;

/// Input poll interval; also the coalescing window for redraws.
pub const TICK_INTERVAL: Duration = Duration::from_millis(75);

pub const TITLE_INPUT: &str = " Search jobs ";
pub const TITLE_RESULTS: &str = " Results ";
pub const BUTTON_SEARCH: &str = "Search";
pub const LABEL_LOADING: &str = "Loading...";
pub const HELP_TEXT: &str = "Enter search · ↑/↓ select · Ctrl+O open link · Ctrl+U clear · Esc quit";

pub const INPUT_HEIGHT: u16 = 3;
pub const BUTTON_WIDTH: u16 = 12;
