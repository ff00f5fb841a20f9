use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Row, Table, Widget};

use crate::engine::bounds;
use crate::engine::scoring::Draft;
use crate::session::result::ScoredEvent;
use crate::ui::theme::Theme;

pub const HEADERS: [&str; 10] = [
    "Name", "Type", "Dist km", "Elev m", "Temp \u{b0}C", "Alt m", "Draft", "Rough", "Draft %",
    "Score",
];

const WIDTHS: [Constraint; 10] = [
    Constraint::Min(10),
    Constraint::Length(10),
    Constraint::Length(7),
    Constraint::Length(6),
    Constraint::Length(7),
    Constraint::Length(5),
    Constraint::Length(5),
    Constraint::Length(5),
    Constraint::Length(7),
    Constraint::Length(6),
];

/// Formatted cells for one table row. Modifier columns that do not apply to
/// the event's scoring version show "-".
pub fn row_cells(position: usize, event: &ScoredEvent) -> [String; 10] {
    let input = &event.input;
    let (draftable, roughness, draft_pct) = match input.draft {
        Draft::Draftable(d) => (
            (if d { "yes" } else { "no" }).to_string(),
            "-".to_string(),
            "-".to_string(),
        ),
        Draft::Surface {
            roughness,
            draft_percentage,
        } => (
            "-".to_string(),
            bounds::ROUGHNESS.format(roughness),
            bounds::DRAFT_PERCENTAGE.format(draft_percentage),
        ),
    };
    [
        event.display_name(position),
        input.event_type.to_key().to_string(),
        bounds::DISTANCE.format(input.distance_km),
        bounds::ELEVATION.format(input.elevation_m),
        bounds::TEMPERATURE.format(input.temperature_c),
        bounds::ALTITUDE.format(input.altitude_m),
        draftable,
        roughness,
        draft_pct,
        format!("{:.2}", event.score),
    ]
}

pub struct EventTable<'a> {
    pub events: &'a [ScoredEvent],
    pub theme: &'a Theme,
}

impl<'a> EventTable<'a> {
    pub fn new(events: &'a [ScoredEvent], theme: &'a Theme) -> Self {
        Self { events, theme }
    }
}

impl Widget for EventTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" Events ({}) ", self.events.len()),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border()));

        // Newest rows win when the table overflows
        let visible = block.inner(area).height.saturating_sub(1) as usize;
        let skip = self.events.len().saturating_sub(visible);

        let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        );

        let rows = self
            .events
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, event)| {
                let cells = row_cells(i, event);
                let type_color = colors.event_color(event.input.event_type);
                Row::new(cells.into_iter().enumerate().map(|(col, text)| {
                    let style = match col {
                        1 => Style::default().fg(type_color),
                        9 => Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                        _ => Style::default().fg(colors.fg()),
                    };
                    Cell::from(text).style(style)
                }))
            });

        Table::new(rows, WIDTHS)
            .header(header)
            .column_spacing(1)
            .block(block)
            .render(area, buf);
    }
}
