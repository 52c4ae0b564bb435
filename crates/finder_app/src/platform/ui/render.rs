use finder_core::{AppViewModel, JobCardView};
use ratatui::layout::{Alignment, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, HighlightSpacing, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::constants::*;
use super::layout;

/// Draws the whole search view from the view model.
///
/// `notice` is a transient line for the help bar (e.g. the result of opening
/// a link); it is UI-only state and never part of the core.
pub fn render(
    frame: &mut Frame,
    view: &AppViewModel,
    list_state: &mut ListState,
    notice: Option<&str>,
) {
    let areas = layout::split(frame.area());

    render_input(frame, areas.input, &view.query);

    let button = Paragraph::new(BUTTON_SEARCH)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::bordered());
    frame.render_widget(button, areas.button);

    frame.render_widget(Paragraph::new(status_line(view)), areas.status);

    let cards = List::new(view.cards.iter().map(card_item))
        .block(Block::bordered().title(TITLE_RESULTS))
        .highlight_symbol("▌")
        .highlight_spacing(HighlightSpacing::Always)
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(cards, areas.results, list_state);

    let help = match notice {
        Some(text) => Line::from(text.to_string()),
        None => Line::from(Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(help), areas.help);
}

fn render_input(frame: &mut Frame, area: ratatui::layout::Rect, query: &str) {
    let inner_width = area.width.saturating_sub(2);
    // Keep the end of a long query (where the cursor is) visible.
    let (visible, visible_width) =
        visible_tail(query, usize::from(inner_width.saturating_sub(1)));

    let input = Paragraph::new(visible.to_string()).block(Block::bordered().title(TITLE_INPUT));
    frame.render_widget(input, area);

    if inner_width > 0 && area.height > 2 {
        let cursor = u16::try_from(visible_width).unwrap_or(u16::MAX);
        frame.set_cursor_position(Position::new(
            area.x + 1 + cursor.min(inner_width - 1),
            area.y + 1,
        ));
    }
}

/// Longest suffix of `text` that fits in `max_width` columns, with its width.
fn visible_tail(text: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0;
    let mut start = text.len();
    for (index, ch) in text.char_indices().rev() {
        let ch_width = Span::raw(&text[index..index + ch.len_utf8()]).width();
        if width + ch_width > max_width {
            break;
        }
        width += ch_width;
        start = index;
    }
    (&text[start..], width)
}

fn status_line(view: &AppViewModel) -> Line<'static> {
    if view.loading {
        return Line::from(Span::styled(
            LABEL_LOADING,
            Style::default().fg(Color::Yellow),
        ));
    }
    match &view.error {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::default(),
    }
}

fn card_item(card: &JobCardView) -> ListItem<'static> {
    let link_style = Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(card.title.clone(), link_style)),
        Line::from(Span::styled(format!("↗ {}", card.link.href), dim)),
    ];
    lines.extend(
        card.description
            .lines()
            .map(|line| Line::from(line.to_string())),
    );
    lines.push(Line::from(card.organization.clone()));
    lines.push(Line::from(card.location.clone()));
    lines.push(Line::from(Span::styled(card.date_posted.clone(), dim)));
    lines.push(Line::default());

    ListItem::new(Text::from(lines))
}
