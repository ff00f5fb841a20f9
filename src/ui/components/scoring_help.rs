use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::engine::scoring::{
    self, ALTITUDE_CUTOFF_M, ALTITUDE_POINTS_PER_KM, COLD_PENALTY_PER_C, CYCLE_MIN_DISTANCE_KM,
    DRAFT_MULTIPLIER_V1, EventType, HEAT_BONUS_PER_C, MARATHON_KM, MARATHON_POINTS,
    MAX_DRAFT_REDUCTION_V2, OPTIMAL_TEMP_HIGH_C, OPTIMAL_TEMP_LOW_C, RUN_MIN_DISTANCE_KM,
    ScoringVersion,
};
use crate::ui::theme::Theme;

/// Rule text for one scoring version. Numbers come from the scoring constants.
pub fn help_lines(version: ScoringVersion) -> Vec<String> {
    let rules = version.rules();
    let mut lines = vec![
        format!("A flat {MARATHON_KM} km marathon is worth {MARATHON_POINTS:.1} points."),
        format!("Elevation: +1 point per {:.0} m of climbing.", rules.elevation_per_point_m),
        format!(
            "Cycling: distance / {:.0} and elevation / {:.0} before scoring.",
            rules.cycle_distance_divisor, rules.cycle_elevation_divisor
        ),
    ];

    match version {
        ScoringVersion::V1 => {
            let factors: Vec<String> = EventType::all()
                .iter()
                .map(|t| format!("{} x{:.1}", t.to_key(), t.terrain_factor()))
                .collect();
            lines.push(format!("Terrain: {}.", factors.join(", ")));
            lines.push(format!("Draftable events: score x{DRAFT_MULTIPLIER_V1:.1}."));
        }
        ScoringVersion::V2 => {
            lines.push("Terrain: x(1 + roughness), roughness 0.0 to 1.0.".to_string());
            lines.push(format!(
                "Drafting: up to -{:.0}% at 100% of the event drafted.",
                MAX_DRAFT_REDUCTION_V2 * 100.0
            ));
            lines.push(format!(
                "Minimum distance: {RUN_MIN_DISTANCE_KM:.1} km running, \
                 {CYCLE_MIN_DISTANCE_KM:.1} km cycling, otherwise 0 points."
            ));
        }
    }

    lines.push(format!(
        "Temperature: -{COLD_PENALTY_PER_C:.2} per degree below {OPTIMAL_TEMP_LOW_C:.0} C, \
         +{HEAT_BONUS_PER_C:.1} per degree above {OPTIMAL_TEMP_HIGH_C:.0} C."
    ));
    lines.push(format!(
        "Altitude: +{ALTITUDE_POINTS_PER_KM:.1} per 1000 m below {ALTITUDE_CUTOFF_M:.0} m, \
         none at or above it."
    ));
    lines.push(format!(
        "Example: {MARATHON_KM} km run with 300 m climbing scores {:.2}.",
        scoring::score_event(
            &scoring::EventInput::new(MARATHON_KM, 300.0, EventType::Run),
            version,
        )
    ));
    lines
}

pub struct ScoringHelp<'a> {
    pub version: ScoringVersion,
    pub theme: &'a Theme,
}

impl<'a> ScoringHelp<'a> {
    pub fn new(version: ScoringVersion, theme: &'a Theme) -> Self {
        Self { version, theme }
    }
}

impl Widget for ScoringHelp<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(format!(" Scoring System ({}) ", self.version))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                self.version.label(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for text in help_lines(self.version) {
            lines.push(Line::from(Span::styled(
                format!("- {text}"),
                Style::default().fg(colors.fg()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[F1/?] Close",
            Style::default().fg(colors.text_pending()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v2_help_states_gate_constants() {
        let text = help_lines(ScoringVersion::V2).join("\n");
        assert!(text.contains("21.2 km running"));
        assert!(text.contains(&format!("{CYCLE_MIN_DISTANCE_KM:.1} km cycling")));
        assert!(text.contains("distance / 3 and elevation / 4"));
        assert!(text.contains("per 400 m"));
    }

    #[test]
    fn v1_help_lists_terrain_table() {
        let text = help_lines(ScoringVersion::V1).join("\n");
        assert!(text.contains("trail_run x1.4"));
        assert!(text.contains("gravel x1.2"));
        assert!(text.contains("score x0.8"));
        assert!(!text.contains("Minimum distance"));
        assert!(text.contains("scores 3.00"));
    }

    #[test]
    fn renders_title_with_version() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 20);
        let mut buf = Buffer::empty(area);
        ScoringHelp::new(ScoringVersion::V1, &theme).render(area, &mut buf);
        let top: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(top.contains("Scoring System (v1)"));
    }
}
