use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::form::{EventForm, FormField};
use crate::ui::theme::Theme;

pub struct EventFormView<'a> {
    pub form: &'a EventForm,
    pub theme: &'a Theme,
}

impl<'a> EventFormView<'a> {
    pub fn new(form: &'a EventForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }

    fn value_line(&self, field: FormField, focused: bool) -> Line<'a> {
        let colors = &self.theme.colors;
        let value_style = Style::default().fg(if focused {
            colors.fg()
        } else {
            colors.text_pending()
        });

        if field.is_text() {
            let Some(input) = self.form.text_input(field) else {
                return Line::from("");
            };
            if !focused {
                return Line::from(Span::styled(format!("    {}", input.value()), value_style));
            }
            let cursor_style = Style::default()
                .fg(colors.text_cursor_fg())
                .bg(colors.text_cursor_bg());
            let (before, cursor, after) = input.render_parts();
            let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
            return Line::from(vec![
                Span::styled("    ", value_style),
                Span::styled(before.to_string(), value_style),
                Span::styled(cursor_text, cursor_style),
                Span::styled(after.to_string(), value_style),
            ]);
        }

        let text = self.form.selector_text(field);
        if focused {
            Line::from(vec![
                Span::styled("  < ", Style::default().fg(colors.accent())),
                Span::styled(text, value_style.add_modifier(Modifier::BOLD)),
                Span::styled(" >", Style::default().fg(colors.accent())),
            ])
        } else {
            Line::from(Span::styled(format!("    {text}"), value_style))
        }
    }
}

impl Widget for EventFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Add New Event ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let focused = self.form.focused();
        let mut lines: Vec<Line> = Vec::new();
        for &field in self.form.fields() {
            let is_focused = field == focused;
            let indicator = if is_focused { " > " } else { "   " };
            let label_style = Style::default()
                .fg(if is_focused { colors.accent() } else { colors.fg() })
                .add_modifier(if is_focused {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            lines.push(Line::from(Span::styled(
                format!("{indicator}{}", field.label()),
                label_style,
            )));
            lines.push(self.value_line(field, is_focused));
        }

        let button = Line::from(Span::styled(
            "[Enter] Calculate Grit Points",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.accent_dim())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        lines.push(button);

        Paragraph::new(lines).render(inner, buf);
    }
}
