use crossterm::event::{KeyCode, KeyEvent};

use crate::engine::bounds::{self, FieldBounds};
use crate::engine::error::InputError;
use crate::engine::scoring::{Draft, EventInput, EventType, ScoringVersion};
use crate::session::result::ScoredEvent;
use crate::ui::line_input::LineInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    EventType,
    Distance,
    Elevation,
    Temperature,
    Altitude,
    Draftable,
    Roughness,
    DraftPercentage,
}

const V1_FIELDS: &[FormField] = &[
    FormField::Name,
    FormField::EventType,
    FormField::Distance,
    FormField::Elevation,
    FormField::Temperature,
    FormField::Altitude,
    FormField::Draftable,
];

const V2_FIELDS: &[FormField] = &[
    FormField::Name,
    FormField::EventType,
    FormField::Distance,
    FormField::Elevation,
    FormField::Temperature,
    FormField::Altitude,
    FormField::Roughness,
    FormField::DraftPercentage,
];

impl FormField {
    pub fn fields_for(version: ScoringVersion) -> &'static [FormField] {
        match version {
            ScoringVersion::V1 => V1_FIELDS,
            ScoringVersion::V2 => V2_FIELDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Event Name",
            FormField::EventType => "Event Type",
            FormField::Distance => "Distance (km)",
            FormField::Elevation => "Elevation Gain (m)",
            FormField::Temperature => "Average Temperature (\u{b0}C)",
            FormField::Altitude => "Average Altitude (m)",
            FormField::Draftable => "Draftable event",
            FormField::Roughness => "Terrain Roughness (0-1)",
            FormField::DraftPercentage => "Draft Percentage",
        }
    }

    /// Typed text fields, as opposed to selectors cycled with arrows.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Name
                | FormField::Distance
                | FormField::Elevation
                | FormField::Temperature
                | FormField::Altitude
        )
    }

    fn bounds(self) -> Option<&'static FieldBounds> {
        match self {
            FormField::Distance => Some(&bounds::DISTANCE),
            FormField::Elevation => Some(&bounds::ELEVATION),
            FormField::Temperature => Some(&bounds::TEMPERATURE),
            FormField::Altitude => Some(&bounds::ALTITUDE),
            FormField::Roughness => Some(&bounds::ROUGHNESS),
            FormField::DraftPercentage => Some(&bounds::DRAFT_PERCENTAGE),
            FormField::Name | FormField::EventType | FormField::Draftable => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
}

/// Starting values for a fresh form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormDefaults {
    pub event_type: EventType,
    pub distance_km: f64,
    pub temperature_c: f64,
}

impl FormDefaults {
    /// Value a blank numeric field stands for.
    pub fn value_for(&self, field: FormField) -> f64 {
        match field {
            FormField::Distance => self.distance_km,
            FormField::Temperature => self.temperature_c,
            _ => 0.0,
        }
    }
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            event_type: EventType::Run,
            distance_km: 42.2,
            temperature_c: 20.0,
        }
    }
}

/// "Add New Event" form state.
pub struct EventForm {
    pub version: ScoringVersion,
    pub focus: usize,
    pub name: LineInput,
    pub event_type: EventType,
    pub distance: LineInput,
    pub elevation: LineInput,
    pub temperature: LineInput,
    pub altitude: LineInput,
    pub draftable: bool,
    pub roughness: f64,
    pub draft_percentage: f64,
    defaults: FormDefaults,
}

impl EventForm {
    pub fn new(version: ScoringVersion, defaults: &FormDefaults) -> Self {
        Self {
            version,
            focus: 0,
            name: LineInput::new(""),
            event_type: defaults.event_type,
            distance: LineInput::numeric(&defaults.distance_km.to_string()),
            elevation: LineInput::numeric("0"),
            temperature: LineInput::numeric(&defaults.temperature_c.to_string()),
            altitude: LineInput::numeric("0"),
            draftable: false,
            roughness: 0.0,
            draft_percentage: 0.0,
            defaults: *defaults,
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        FormField::fields_for(self.version)
    }

    pub fn focused(&self) -> FormField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Switch the modifier fields shown, keeping focus on the same field when it survives.
    pub fn set_version(&mut self, version: ScoringVersion) {
        let current = self.focused();
        self.version = version;
        let fields = self.fields();
        self.focus = fields
            .iter()
            .position(|f| *f == current)
            .unwrap_or(fields.len() - 1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return FormAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return FormAction::None;
            }
            _ => {}
        }

        let field = self.focused();
        match field {
            FormField::Name => {
                self.name.handle(key);
            }
            FormField::EventType => match key.code {
                KeyCode::Left => self.event_type = self.event_type.prev(),
                KeyCode::Right | KeyCode::Char(' ') => self.event_type = self.event_type.next(),
                _ => {}
            },
            FormField::Draftable => {
                if matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                    self.draftable = !self.draftable;
                }
            }
            FormField::Roughness | FormField::DraftPercentage => match key.code {
                KeyCode::Left | KeyCode::PageDown => self.step(field, false),
                KeyCode::Right | KeyCode::PageUp | KeyCode::Char(' ') => self.step(field, true),
                _ => {}
            },
            FormField::Distance
            | FormField::Elevation
            | FormField::Temperature
            | FormField::Altitude => match key.code {
                KeyCode::PageUp | KeyCode::Char('+') => self.step(field, true),
                KeyCode::PageDown => self.step(field, false),
                _ => {
                    if let Some(input) = self.text_input_mut(field) {
                        input.handle(key);
                    }
                }
            },
        }
        FormAction::None
    }

    /// Nudge a numeric field by its step, staying within bounds.
    pub fn step(&mut self, field: FormField, up: bool) {
        let Some(b) = field.bounds() else {
            return;
        };
        let nudge = |v: f64| if up { b.step_up(v) } else { b.step_down(v) };
        match field {
            FormField::Roughness => self.roughness = nudge(self.roughness),
            FormField::DraftPercentage => self.draft_percentage = nudge(self.draft_percentage),
            _ => {
                let fallback = self.defaults.value_for(field);
                if let Some(input) = self.text_input_mut(field) {
                    let current = b.parse_or(input.value(), fallback).unwrap_or(fallback);
                    input.set_value(&nudge(current).to_string());
                }
            }
        }
    }

    pub fn text_input(&self, field: FormField) -> Option<&LineInput> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Distance => Some(&self.distance),
            FormField::Elevation => Some(&self.elevation),
            FormField::Temperature => Some(&self.temperature),
            FormField::Altitude => Some(&self.altitude),
            _ => None,
        }
    }

    fn text_input_mut(&mut self, field: FormField) -> Option<&mut LineInput> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Distance => Some(&mut self.distance),
            FormField::Elevation => Some(&mut self.elevation),
            FormField::Temperature => Some(&mut self.temperature),
            FormField::Altitude => Some(&mut self.altitude),
            _ => None,
        }
    }

    /// Selector value as shown in the form.
    pub fn selector_text(&self, field: FormField) -> String {
        match field {
            FormField::EventType => self.event_type.label().to_string(),
            FormField::Draftable => (if self.draftable { "[x] yes" } else { "[ ] no" }).to_string(),
            FormField::Roughness => bounds::ROUGHNESS.format(self.roughness),
            FormField::DraftPercentage => {
                format!("{}%", bounds::DRAFT_PERCENTAGE.format(self.draft_percentage))
            }
            _ => self
                .text_input(field)
                .map(|i| i.value().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse every field, clamping numbers into their accepted ranges.
    pub fn build_input(&self) -> Result<EventInput, InputError> {
        let read = |field: FormField, input: &LineInput, b: &FieldBounds| {
            let value = b.parse_or(input.value(), self.defaults.value_for(field))?;
            Ok::<f64, InputError>(b.clamp(value))
        };

        let draft = match self.version {
            ScoringVersion::V1 => Draft::Draftable(self.draftable),
            ScoringVersion::V2 => Draft::Surface {
                roughness: bounds::ROUGHNESS.clamp(self.roughness),
                draft_percentage: bounds::DRAFT_PERCENTAGE.clamp(self.draft_percentage),
            },
        };

        Ok(EventInput {
            distance_km: read(FormField::Distance, &self.distance, &bounds::DISTANCE)?,
            elevation_m: read(FormField::Elevation, &self.elevation, &bounds::ELEVATION)?,
            event_type: self.event_type,
            temperature_c: read(FormField::Temperature, &self.temperature, &bounds::TEMPERATURE)?,
            altitude_m: read(FormField::Altitude, &self.altitude, &bounds::ALTITUDE)?,
            draft,
        })
    }

    /// Score the current form. Clamped values are written back so the form
    /// shows what was actually scored.
    pub fn submit(&mut self) -> Result<ScoredEvent, InputError> {
        let input = self.build_input()?;
        self.distance.set_value(&input.distance_km.to_string());
        self.elevation.set_value(&input.elevation_m.to_string());
        self.temperature.set_value(&input.temperature_c.to_string());
        self.altitude.set_value(&input.altitude_m.to_string());
        Ok(ScoredEvent::from_input(self.name.value(), input, self.version))
    }
}
