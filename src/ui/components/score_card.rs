use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::scoring::{self, ScoreBreakdown};
use crate::session::result::ScoredEvent;
use crate::ui::theme::Theme;

/// Factor-by-factor breakdown of the most recent score.
pub struct ScoreCard<'a> {
    pub event: &'a ScoredEvent,
    pub position: usize,
    pub theme: &'a Theme,
}

impl<'a> ScoreCard<'a> {
    pub fn new(event: &'a ScoredEvent, position: usize, theme: &'a Theme) -> Self {
        Self {
            event,
            position,
            theme,
        }
    }

    fn breakdown(&self) -> ScoreBreakdown {
        scoring::breakdown(&self.event.input, self.event.scoring_version)
    }
}

fn signed(value: f64) -> String {
    format!("{value:+.2}")
}

impl Widget for ScoreCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let parts = self.breakdown();

        let block = Block::bordered()
            .title(format!(" Last Result: {} ", self.event.display_name(self.position)))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.fg());
        let muted = Style::default().fg(colors.text_pending());
        let score_color = if parts.gated {
            colors.warning()
        } else {
            colors.event_color(self.event.input.event_type)
        };

        let mut lines = vec![Line::from(vec![
            Span::styled("  Grit points: ", label),
            Span::styled(
                format!("{:.2}", self.event.score),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ({})", self.event.scoring_version), muted),
        ])];

        if parts.gated {
            let minimum = scoring::minimum_distance_km(self.event.input.event_type);
            lines.push(Line::from(Span::styled(
                format!("  Below the {minimum:.1} km minimum distance: no points"),
                Style::default().fg(colors.warning()),
            )));
        } else {
            lines.push(Line::from(vec![
                Span::styled("  Distance + elevation: ", label),
                Span::styled(format!("{:.2}", parts.base), muted),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Terrain x", label),
                Span::styled(format!("{:.2}", parts.terrain_multiplier), muted),
                Span::styled("   Draft x", label),
                Span::styled(format!("{:.2}", parts.draft_multiplier), muted),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Temperature ", label),
                Span::styled(signed(parts.temperature_adjustment), muted),
                Span::styled("   Altitude ", label),
                Span::styled(signed(parts.altitude_adjustment), muted),
            ]));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::{EventInput, EventType, ScoringVersion};

    fn render(event: &ScoredEvent) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        ScoreCard::new(event, 0, &theme).render(area, &mut buf);
        (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn shows_factors_for_scored_event() {
        let input = EventInput::new(42.2, 0.0, EventType::Run)
            .with_temperature(5.0)
            .draftable(true);
        let event = ScoredEvent::from_input("Cold one", input, ScoringVersion::V1);
        let text = render(&event);
        assert!(text.contains("Last Result: Cold one"));
        assert!(text.contains("Draft x0.80"));
        assert!(text.contains("Temperature -0.25"));
        assert!(text.contains("Altitude +0.00"));
    }

    #[test]
    fn explains_gated_event() {
        let input = EventInput::new(60.0, 0.0, EventType::Gravel).with_surface(0.0, 0.0);
        let event = ScoredEvent::from_input("Short gravel", input, ScoringVersion::V2);
        let text = render(&event);
        assert!(text.contains("0.00"));
        assert!(text.contains("70.0 km minimum"));
    }
}
