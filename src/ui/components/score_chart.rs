use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Paragraph, Widget};

use crate::engine::scoring::EventType;
use crate::session::result::ScoredEvent;
use crate::ui::theme::Theme;

const BAR_GAP: u16 = 1;
const GROUP_GAP: u16 = 2;
const MAX_BAR_WIDTH: u16 = 9;

/// Events grouped by display name in first-seen order, so same-named events
/// of different types sit side by side.
pub fn group_by_name(events: &[ScoredEvent]) -> Vec<(String, Vec<&ScoredEvent>)> {
    let mut groups: Vec<(String, Vec<&ScoredEvent>)> = Vec::new();
    for (i, event) in events.iter().enumerate() {
        let name = event.display_name(i);
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, members)) => members.push(event),
            None => groups.push((name, vec![event])),
        }
    }
    groups
}

/// Event types present, in selector order, for the legend.
pub fn types_present(events: &[ScoredEvent]) -> Vec<EventType> {
    EventType::all()
        .iter()
        .copied()
        .filter(|t| events.iter().any(|e| e.input.event_type == *t))
        .collect()
}

/// Widest bar that lets every group fit in `width` columns.
pub fn bar_width_for(width: u16, groups: &[(String, Vec<&ScoredEvent>)]) -> u16 {
    let bars: u16 = groups.iter().map(|(_, m)| m.len() as u16).sum();
    if bars == 0 {
        return 1;
    }
    let group_count = groups.len() as u16;
    let gaps = GROUP_GAP * group_count.saturating_sub(1) + BAR_GAP * (bars - group_count);
    (width.saturating_sub(gaps) / bars).clamp(1, MAX_BAR_WIDTH)
}

// Bar heights are integral; scores keep two decimals.
fn bar_value(score: f64) -> u64 {
    (score.max(0.0) * 100.0).round() as u64
}

pub struct ScoreChart<'a> {
    pub events: &'a [ScoredEvent],
    pub theme: &'a Theme,
}

impl<'a> ScoreChart<'a> {
    pub fn new(events: &'a [ScoredEvent], theme: &'a Theme) -> Self {
        Self { events, theme }
    }
}

impl Widget for ScoreChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Event Comparison: Grit Points ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height < 4 || self.events.is_empty() {
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(inner);

        let mut legend: Vec<Span> = vec![Span::styled(
            " Type: ",
            Style::default().fg(colors.text_pending()),
        )];
        for event_type in types_present(self.events) {
            legend.push(Span::styled(
                "\u{25a0} ",
                Style::default().fg(colors.event_color(event_type)),
            ));
            legend.push(Span::styled(
                format!("{}  ", event_type.to_key()),
                Style::default().fg(colors.fg()),
            ));
        }
        Paragraph::new(Line::from(legend)).render(layout[0], buf);

        let groups = group_by_name(self.events);
        let bar_width = bar_width_for(layout[1].width, &groups);
        let max = self
            .events
            .iter()
            .map(|e| bar_value(e.score))
            .max()
            .unwrap_or(0)
            .max(1);

        let mut chart = BarChart::default()
            .bar_width(bar_width)
            .bar_gap(BAR_GAP)
            .group_gap(GROUP_GAP)
            .max(max)
            .value_style(Style::default().fg(colors.bg()).add_modifier(Modifier::BOLD))
            .label_style(Style::default().fg(colors.fg()));

        for (name, members) in &groups {
            let bars: Vec<Bar> = members
                .iter()
                .map(|event| {
                    let bar = Bar::default()
                        .value(bar_value(event.score))
                        .text_value(format!("{:.2}", event.score))
                        .style(Style::default().fg(colors.event_color(event.input.event_type)));
                    // A zero-height bar draws no value, so print it underneath
                    if event.score < 0.0 {
                        bar.label(Line::styled(
                            format!("{:.2}", event.score),
                            Style::default().fg(colors.error()),
                        ))
                    } else {
                        bar
                    }
                })
                .collect();
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(name.clone()))
                    .bars(&bars),
            );
        }

        chart.render(layout[1], buf);
    }
}
