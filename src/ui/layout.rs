use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: form and results side by side
    Narrow, // <100 cols: form stacked above results
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_score_card(&self, height: u16) -> bool {
        *self == LayoutTier::Wide && height >= 30
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub form: Rect,
    pub results: Rect,
    pub status: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(1),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        let (direction, constraints) = match tier {
            LayoutTier::Wide => (
                Direction::Horizontal,
                [Constraint::Percentage(40), Constraint::Percentage(60)],
            ),
            LayoutTier::Narrow => (
                Direction::Vertical,
                [Constraint::Length(FORM_HEIGHT), Constraint::Min(6)],
            ),
        };
        let body = Layout::default()
            .direction(direction)
            .constraints(constraints)
            .split(vertical[1]);

        Self {
            header: vertical[0],
            form: body[0],
            results: body[1],
            status: vertical[2],
            footer: vertical[3],
            tier,
        }
    }
}

/// Bordered form height with every v2 field visible.
pub const FORM_HEIGHT: u16 = 19;

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 60;
    const MIN_POPUP_HEIGHT: u16 = 16;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_layout_puts_results_beside_form() {
        let layout = AppLayout::new(Rect::new(0, 0, 120, 40), 1);
        assert_eq!(layout.tier, LayoutTier::Wide);
        assert_eq!(layout.form.y, layout.results.y);
        assert!(layout.results.x > layout.form.x);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.y, 39);
    }

    #[test]
    fn narrow_layout_stacks_results_below_form() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 50), 2);
        assert_eq!(layout.tier, LayoutTier::Narrow);
        assert_eq!(layout.form.height, FORM_HEIGHT);
        assert!(layout.results.y >= layout.form.y + FORM_HEIGHT);
        assert_eq!(layout.footer.height, 2);
    }

    #[test]
    fn hints_wrap_to_width() {
        let lines = pack_hint_lines(&["[Enter] Calculate", "[Tab] Next", "[Esc] Quit"], 32);
        assert_eq!(lines, vec!["  [Enter] Calculate  [Tab] Next", "  [Esc] Quit"]);
        assert!(pack_hint_lines(&["x"], 0).is_empty());
    }

    #[test]
    fn centered_rect_stays_inside_small_areas() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, area);

        let big = Rect::new(0, 0, 200, 60);
        let popup = centered_rect(50, 50, big);
        assert_eq!(popup, Rect::new(50, 15, 100, 30));
    }
}
