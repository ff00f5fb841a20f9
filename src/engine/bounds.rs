use crate::engine::error::InputError;
use crate::engine::scoring::{Draft, EventInput};

/// Accepted range and stepping for one numeric event field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBounds {
    pub field: &'static str,
    pub min: f64,
    /// `None` means unbounded above.
    pub max: Option<f64>,
    pub step: f64,
    /// Decimal places shown in the event table.
    pub decimals: usize,
}

pub const DISTANCE: FieldBounds = FieldBounds {
    field: "distance",
    min: 0.0,
    max: None,
    step: 1.0,
    decimals: 1,
};

pub const ELEVATION: FieldBounds = FieldBounds {
    field: "elevation",
    min: 0.0,
    max: None,
    step: 50.0,
    decimals: 0,
};

pub const TEMPERATURE: FieldBounds = FieldBounds {
    field: "temperature",
    min: -20.0,
    max: Some(50.0),
    step: 1.0,
    decimals: 1,
};

pub const ALTITUDE: FieldBounds = FieldBounds {
    field: "altitude",
    min: 0.0,
    max: Some(5000.0),
    step: 100.0,
    decimals: 0,
};

pub const ROUGHNESS: FieldBounds = FieldBounds {
    field: "roughness",
    min: 0.0,
    max: Some(1.0),
    step: 0.1,
    decimals: 1,
};

pub const DRAFT_PERCENTAGE: FieldBounds = FieldBounds {
    field: "draft_pct",
    min: 0.0,
    max: Some(100.0),
    step: 5.0,
    decimals: 0,
};

impl FieldBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        let value = value.max(self.min);
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }

    pub fn check(&self, value: f64) -> Result<f64, InputError> {
        if !value.is_finite() {
            return Err(InputError::NotANumber {
                field: self.field,
                text: value.to_string(),
            });
        }
        match self.max {
            Some(max) if value < self.min || value > max => Err(InputError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max,
            }),
            None if value < self.min => Err(InputError::BelowMinimum {
                field: self.field,
                value,
                min: self.min,
            }),
            _ => Ok(value),
        }
    }

    /// Parse user text. Blank text is an error; see [`FieldBounds::parse_or`].
    pub fn parse(&self, text: &str) -> Result<f64, InputError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(InputError::Blank { field: self.field });
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(InputError::NotANumber {
                field: self.field,
                text: trimmed.to_string(),
            }),
        }
    }

    /// Like `parse`, but blank text reads as `fallback`.
    pub fn parse_or(&self, text: &str, fallback: f64) -> Result<f64, InputError> {
        if text.trim().is_empty() {
            Ok(fallback)
        } else {
            self.parse(text)
        }
    }

    pub fn step_up(&self, value: f64) -> f64 {
        self.snap(self.clamp(value + self.step))
    }

    pub fn step_down(&self, value: f64) -> f64 {
        self.snap(self.clamp(value - self.step))
    }

    pub fn format(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.decimals)
    }

    // Keeps repeated 0.1 steps from drifting to 0.30000000000000004.
    fn snap(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals.max(1) as i32);
        (value * scale).round() / scale
    }
}

/// Reject any field outside its accepted range.
pub fn validate(input: &EventInput) -> Result<(), InputError> {
    DISTANCE.check(input.distance_km)?;
    ELEVATION.check(input.elevation_m)?;
    TEMPERATURE.check(input.temperature_c)?;
    ALTITUDE.check(input.altitude_m)?;
    if let Draft::Surface {
        roughness,
        draft_percentage,
    } = input.draft
    {
        ROUGHNESS.check(roughness)?;
        DRAFT_PERCENTAGE.check(draft_percentage)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::EventType;

    #[test]
    fn clamp_respects_both_ends() {
        assert_eq!(TEMPERATURE.clamp(-40.0), -20.0);
        assert_eq!(TEMPERATURE.clamp(60.0), 50.0);
        assert_eq!(TEMPERATURE.clamp(12.5), 12.5);
        assert_eq!(DISTANCE.clamp(-1.0), 0.0);
        assert_eq!(DISTANCE.clamp(900.0), 900.0);
    }

    #[test]
    fn check_reports_field_and_bounds() {
        let err = ALTITUDE.check(6000.0).unwrap_err();
        assert_eq!(
            err,
            InputError::OutOfRange {
                field: "altitude",
                value: 6000.0,
                min: 0.0,
                max: 5000.0
            }
        );
        assert!(err.to_string().contains("altitude"));

        assert!(matches!(
            ELEVATION.check(-5.0),
            Err(InputError::BelowMinimum { field: "elevation", .. })
        ));
        assert!(DISTANCE.check(f64::NAN).is_err());
        assert_eq!(DISTANCE.check(42.2), Ok(42.2));
    }

    #[test]
    fn parse_handles_blank_and_garbage() {
        assert_eq!(
            TEMPERATURE.parse("  "),
            Err(InputError::Blank {
                field: "temperature"
            })
        );
        assert_eq!(TEMPERATURE.parse_or("  ", 20.0), Ok(20.0));
        assert_eq!(TEMPERATURE.parse_or("-5", 20.0), Ok(-5.0));
        assert_eq!(DISTANCE.parse(" 42.2 "), Ok(42.2));
        assert!(matches!(
            DISTANCE.parse("far"),
            Err(InputError::NotANumber { field: "distance", .. })
        ));
        assert!(DISTANCE.parse("inf").is_err());
    }

    #[test]
    fn roughness_steps_stay_on_grid() {
        let mut value = 0.0;
        for _ in 0..3 {
            value = ROUGHNESS.step_up(value);
        }
        assert_eq!(value, 0.3);
        for _ in 0..20 {
            value = ROUGHNESS.step_up(value);
        }
        assert_eq!(value, 1.0);
        assert_eq!(ROUGHNESS.step_down(0.0), 0.0);
    }

    #[test]
    fn draft_percentage_steps_by_five() {
        assert_eq!(DRAFT_PERCENTAGE.step_up(0.0), 5.0);
        assert_eq!(DRAFT_PERCENTAGE.step_up(100.0), 100.0);
        assert_eq!(DRAFT_PERCENTAGE.step_down(5.0), 0.0);
    }

    #[test]
    fn validate_checks_surface_only_when_present() {
        let ok = EventInput::new(42.2, 100.0, EventType::Run).draftable(true);
        assert!(validate(&ok).is_ok());

        let rough = EventInput::new(42.2, 100.0, EventType::Run).with_surface(1.5, 0.0);
        assert!(matches!(
            validate(&rough),
            Err(InputError::OutOfRange { field: "roughness", .. })
        ));

        let cold = EventInput::new(42.2, 0.0, EventType::Run).with_temperature(-30.0);
        assert!(validate(&cold).is_err());
    }

    #[test]
    fn format_uses_column_precision() {
        assert_eq!(DISTANCE.format(42.195), "42.2");
        assert_eq!(ELEVATION.format(1234.6), "1235");
        assert_eq!(ROUGHNESS.format(0.26), "0.3");
        assert_eq!(DRAFT_PERCENTAGE.format(35.0), "35");
    }
}
