use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::error::ScoreError;

/// A flat marathon is worth this many grit points.
pub const MARATHON_POINTS: f64 = 2.0;
pub const MARATHON_KM: f64 = 42.2;

/// Shortest running event (km) that scores under v2.
pub const RUN_MIN_DISTANCE_KM: f64 = 21.2;
/// Shortest cycling event (km) that scores under v2.
pub const CYCLE_MIN_DISTANCE_KM: f64 = 70.0;

pub const DRAFT_MULTIPLIER_V1: f64 = 0.8;
/// Largest fraction of difficulty removed by drafting under v2 (at 100%).
pub const MAX_DRAFT_REDUCTION_V2: f64 = 0.3;

pub const OPTIMAL_TEMP_LOW_C: f64 = 10.0;
pub const OPTIMAL_TEMP_HIGH_C: f64 = 20.0;
pub const COLD_PENALTY_PER_C: f64 = 0.05;
pub const HEAT_BONUS_PER_C: f64 = 0.1;

pub const ALTITUDE_CUTOFF_M: f64 = 500.0;
pub const ALTITUDE_POINTS_PER_KM: f64 = 0.8;

// --- Event Type ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Run,
    TrailRun,
    RoadCycle,
    Gravel,
    Mtb,
}

impl EventType {
    pub fn to_key(self) -> &'static str {
        match self {
            EventType::Run => "run",
            EventType::TrailRun => "trail_run",
            EventType::RoadCycle => "road_cycle",
            EventType::Gravel => "gravel",
            EventType::Mtb => "mtb",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "run" => Some(EventType::Run),
            "trail_run" => Some(EventType::TrailRun),
            "road_cycle" => Some(EventType::RoadCycle),
            "gravel" => Some(EventType::Gravel),
            "mtb" => Some(EventType::Mtb),
            _ => None,
        }
    }

    pub fn all() -> &'static [EventType] {
        &[
            EventType::Run,
            EventType::TrailRun,
            EventType::RoadCycle,
            EventType::Gravel,
            EventType::Mtb,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            EventType::Run => "Road Running",
            EventType::TrailRun => "Trail Running",
            EventType::RoadCycle => "Road Cycling",
            EventType::Gravel => "Gravel Cycling",
            EventType::Mtb => "Mountain Biking",
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, EventType::Run | EventType::TrailRun)
    }

    /// Next type in selector order, wrapping around.
    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|t| *t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|t| *t == self).unwrap_or(0);
        if idx == 0 { all[all.len() - 1] } else { all[idx - 1] }
    }

    /// Fixed v1 terrain multiplier.
    pub fn terrain_factor(self) -> f64 {
        match self {
            EventType::Run => 1.0,
            EventType::TrailRun => 1.4,
            EventType::RoadCycle => 1.0,
            EventType::Gravel => 1.2,
            EventType::Mtb => 1.4,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_key())
    }
}

impl FromStr for EventType {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| ScoreError::UnknownEventType(s.to_string()))
    }
}

// --- Scoring Version ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringVersion {
    #[default]
    V1,
    V2,
}

/// Per-version constants for the distance/elevation base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VersionRules {
    /// Non-running distance is divided by this before normalizing.
    pub cycle_distance_divisor: f64,
    /// Non-running elevation is divided by this before normalizing.
    pub cycle_elevation_divisor: f64,
    /// Meters of (running-equivalent) climbing worth one point.
    pub elevation_per_point_m: f64,
}

const V1_RULES: VersionRules = VersionRules {
    cycle_distance_divisor: 4.0,
    cycle_elevation_divisor: 6.0,
    elevation_per_point_m: 300.0,
};

const V2_RULES: VersionRules = VersionRules {
    cycle_distance_divisor: 3.0,
    cycle_elevation_divisor: 4.0,
    elevation_per_point_m: 400.0,
};

impl ScoringVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringVersion::V1 => "v1",
            ScoringVersion::V2 => "v2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoringVersion::V1 => "v1 (terrain table, draftable flag)",
            ScoringVersion::V2 => "v2 (roughness, draft %, minimum distance)",
        }
    }

    pub fn rules(self) -> &'static VersionRules {
        match self {
            ScoringVersion::V1 => &V1_RULES,
            ScoringVersion::V2 => &V2_RULES,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ScoringVersion::V1 => ScoringVersion::V2,
            ScoringVersion::V2 => ScoringVersion::V1,
        }
    }

    /// Draft modifier a fresh form starts with for this version.
    pub fn default_draft(self) -> Draft {
        match self {
            ScoringVersion::V1 => Draft::Draftable(false),
            ScoringVersion::V2 => Draft::Surface {
                roughness: 0.0,
                draft_percentage: 0.0,
            },
        }
    }
}

impl fmt::Display for ScoringVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringVersion {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ScoringVersion::V1),
            "v2" | "2" => Ok(ScoringVersion::V2),
            _ => Err(ScoreError::UnknownScoringVersion(s.to_string())),
        }
    }
}

// --- Event Input ---

/// Drafting and surface modifiers. Each scoring version reads only its own
/// variant; the other is scored as no drafting on a smooth surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Draft {
    Draftable(bool),
    Surface {
        roughness: f64,
        draft_percentage: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub distance_km: f64,
    pub elevation_m: f64,
    pub event_type: EventType,
    pub temperature_c: f64,
    pub altitude_m: f64,
    pub draft: Draft,
}

impl EventInput {
    /// Event at the optimal temperature, sea level, no drafting.
    pub fn new(distance_km: f64, elevation_m: f64, event_type: EventType) -> Self {
        Self {
            distance_km,
            elevation_m,
            event_type,
            temperature_c: OPTIMAL_TEMP_HIGH_C,
            altitude_m: 0.0,
            draft: Draft::Draftable(false),
        }
    }

    pub fn with_temperature(mut self, temperature_c: f64) -> Self {
        self.temperature_c = temperature_c;
        self
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = altitude_m;
        self
    }

    pub fn draftable(mut self, draftable: bool) -> Self {
        self.draft = Draft::Draftable(draftable);
        self
    }

    pub fn with_surface(mut self, roughness: f64, draft_percentage: f64) -> Self {
        self.draft = Draft::Surface {
            roughness,
            draft_percentage,
        };
        self
    }
}

// --- Scoring ---

/// Compute the grit score for one event, rounded to 2 decimals.
pub fn score_event(input: &EventInput, version: ScoringVersion) -> f64 {
    if gate_applies(input, version) {
        return 0.0;
    }

    let base = base_score(input, version.rules());
    let terrain_adjusted = base * terrain_multiplier(input, version);
    let draft_adjusted = terrain_adjusted * draft_multiplier(input, version);
    let final_score = draft_adjusted
        + temperature_adjustment(input.temperature_c)
        + altitude_adjustment(input.altitude_m);

    round2(final_score)
}

/// Each factor that went into a score, for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
    /// Set when the v2 minimum-distance gate zeroed the score.
    pub gated: bool,
    pub base: f64,
    pub terrain_multiplier: f64,
    pub draft_multiplier: f64,
    pub temperature_adjustment: f64,
    pub altitude_adjustment: f64,
    pub score: f64,
}

pub fn breakdown(input: &EventInput, version: ScoringVersion) -> ScoreBreakdown {
    ScoreBreakdown {
        gated: gate_applies(input, version),
        base: base_score(input, version.rules()),
        terrain_multiplier: terrain_multiplier(input, version),
        draft_multiplier: draft_multiplier(input, version),
        temperature_adjustment: temperature_adjustment(input.temperature_c),
        altitude_adjustment: altitude_adjustment(input.altitude_m),
        score: score_event(input, version),
    }
}

/// Marathon-normalized distance plus elevation points, before multipliers.
pub fn base_score(input: &EventInput, rules: &VersionRules) -> f64 {
    let (distance_km, elevation_m) = if input.event_type.is_running() {
        (input.distance_km, input.elevation_m)
    } else {
        (
            input.distance_km / rules.cycle_distance_divisor,
            input.elevation_m / rules.cycle_elevation_divisor,
        )
    };
    distance_km * (MARATHON_POINTS / MARATHON_KM) + elevation_m / rules.elevation_per_point_m
}

pub fn terrain_multiplier(input: &EventInput, version: ScoringVersion) -> f64 {
    match version {
        ScoringVersion::V1 => input.event_type.terrain_factor(),
        ScoringVersion::V2 => match input.draft {
            Draft::Surface { roughness, .. } => 1.0 + roughness,
            Draft::Draftable(_) => 1.0,
        },
    }
}

pub fn draft_multiplier(input: &EventInput, version: ScoringVersion) -> f64 {
    match (version, input.draft) {
        (ScoringVersion::V1, Draft::Draftable(true)) => DRAFT_MULTIPLIER_V1,
        (
            ScoringVersion::V2,
            Draft::Surface {
                draft_percentage, ..
            },
        ) => 1.0 - (draft_percentage / 100.0 * MAX_DRAFT_REDUCTION_V2),
        _ => 1.0,
    }
}

/// Penalty below the optimal band, bonus above it, flat inside.
pub fn temperature_adjustment(temperature_c: f64) -> f64 {
    if temperature_c <= OPTIMAL_TEMP_LOW_C {
        (temperature_c - OPTIMAL_TEMP_LOW_C) * COLD_PENALTY_PER_C
    } else if temperature_c <= OPTIMAL_TEMP_HIGH_C {
        0.0
    } else {
        (temperature_c - OPTIMAL_TEMP_HIGH_C) * HEAT_BONUS_PER_C
    }
}

/// Drops to zero at the cutoff instead of saturating.
pub fn altitude_adjustment(altitude_m: f64) -> f64 {
    if altitude_m < ALTITUDE_CUTOFF_M {
        (altitude_m / 1000.0) * ALTITUDE_POINTS_PER_KM
    } else {
        0.0
    }
}

pub fn minimum_distance_km(event_type: EventType) -> f64 {
    if event_type.is_running() {
        RUN_MIN_DISTANCE_KM
    } else {
        CYCLE_MIN_DISTANCE_KM
    }
}

pub fn below_minimum_distance(distance_km: f64, event_type: EventType) -> bool {
    distance_km < minimum_distance_km(event_type)
}

fn gate_applies(input: &EventInput, version: ScoringVersion) -> bool {
    version == ScoringVersion::V2 && below_minimum_distance(input.distance_km, input.event_type)
}

/// Round to 2 decimals from the exact binary value, ties to even.
pub fn round2(value: f64) -> f64 {
    // `{:.2}` rounds the exact stored value; scaling by 100 first can push a
    // value stored just short of a .xx5 tie over it.
    match format!("{value:.2}").parse::<f64>() {
        // + 0.0 turns a rounded -0.0 into 0.0
        Ok(rounded) => rounded + 0.0,
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1(distance: f64, elevation: f64, kind: EventType) -> f64 {
        score_event(&EventInput::new(distance, elevation, kind), ScoringVersion::V1)
    }

    fn v2(distance: f64, elevation: f64, kind: EventType) -> f64 {
        let input = EventInput::new(distance, elevation, kind).with_surface(0.0, 0.0);
        score_event(&input, ScoringVersion::V2)
    }

    fn is_two_decimals(score: f64) -> bool {
        ((score * 100.0).round() - score * 100.0).abs() < 1e-6
    }

    #[test]
    fn flat_marathon_is_two_points() {
        assert_eq!(v1(42.2, 0.0, EventType::Run), 2.0);
    }

    #[test]
    fn three_hundred_meters_adds_one_point_v1() {
        assert_eq!(v1(42.2, 300.0, EventType::Run), 3.0);
    }

    #[test]
    fn v1_cycling_divides_distance_by_four() {
        assert_eq!(v1(42.2, 0.0, EventType::RoadCycle), 0.5);
        assert_eq!(v1(168.8, 0.0, EventType::RoadCycle), 2.0);
    }

    #[test]
    fn v1_cycling_divides_elevation_by_six() {
        // 1800 m / 6 = 300 m running-equivalent = 1 point
        assert_eq!(v1(0.0, 1800.0, EventType::RoadCycle), 1.0);
    }

    #[test]
    fn v1_draft_multiplies_by_point_eight() {
        let plain = EventInput::new(42.2, 0.0, EventType::RoadCycle);
        let drafted = plain.draftable(true);
        assert_eq!(score_event(&plain, ScoringVersion::V1), 0.5);
        assert_eq!(score_event(&drafted, ScoringVersion::V1), 0.4);

        let run = EventInput::new(42.2, 0.0, EventType::Run).draftable(true);
        assert_eq!(score_event(&run, ScoringVersion::V1), 1.6);
    }

    #[test]
    fn v1_terrain_table() {
        assert_eq!(v1(42.2, 0.0, EventType::TrailRun), 2.8);
        assert_eq!(v1(168.8, 0.0, EventType::Gravel), 2.4);
        assert_eq!(v1(168.8, 0.0, EventType::Mtb), 2.8);
    }

    #[test]
    fn v1_has_no_minimum_distance() {
        assert!(v1(1.0, 0.0, EventType::Run) > 0.0);
        assert!(v1(10.0, 0.0, EventType::Mtb) > 0.0);
        assert_eq!(v1(0.0, 0.0, EventType::Run), 0.0);
    }

    #[test]
    fn v2_gates_short_runs() {
        assert_eq!(v2(20.0, 0.0, EventType::Run), 0.0);
        assert_eq!(v2(21.1, 5000.0, EventType::TrailRun), 0.0);
        assert!(v2(21.2, 0.0, EventType::Run) > 0.0);
    }

    #[test]
    fn v2_cycling_gate_is_seventy_km() {
        assert!(v2(70.0, 0.0, EventType::RoadCycle) > 0.0);
        assert_eq!(v2(69.9, 0.0, EventType::RoadCycle), 0.0);
        assert_eq!(v2(69.9, 0.0, EventType::Gravel), 0.0);
        assert!(v2(75.0, 0.0, EventType::Mtb) > 0.0);
    }

    #[test]
    fn v2_gate_skips_adjustments() {
        let input = EventInput::new(10.0, 0.0, EventType::Run)
            .with_temperature(45.0)
            .with_altitude(400.0)
            .with_surface(1.0, 0.0);
        assert_eq!(score_event(&input, ScoringVersion::V2), 0.0);
    }

    #[test]
    fn v2_base_uses_four_hundred_meters_per_point() {
        assert_eq!(v2(42.2, 400.0, EventType::Run), 3.0);
        // 90 km / 3 = 30 km; 1600 m / 4 = 400 m
        let expected = round2(30.0 * (2.0 / 42.2) + 1.0);
        assert_eq!(v2(90.0, 1600.0, EventType::Gravel), expected);
    }

    #[test]
    fn v2_roughness_scales_terrain() {
        let smooth = EventInput::new(42.2, 0.0, EventType::TrailRun).with_surface(0.0, 0.0);
        let rough = EventInput::new(42.2, 0.0, EventType::TrailRun).with_surface(1.0, 0.0);
        let half = EventInput::new(42.2, 0.0, EventType::TrailRun).with_surface(0.5, 0.0);
        assert_eq!(score_event(&smooth, ScoringVersion::V2), 2.0);
        assert_eq!(score_event(&rough, ScoringVersion::V2), 4.0);
        assert_eq!(score_event(&half, ScoringVersion::V2), 3.0);
    }

    #[test]
    fn v2_draft_percentage_scales_down_to_point_seven() {
        let full = EventInput::new(42.2, 0.0, EventType::Run).with_surface(0.0, 100.0);
        let half = EventInput::new(42.2, 0.0, EventType::Run).with_surface(0.0, 50.0);
        assert_eq!(score_event(&full, ScoringVersion::V2), 1.4);
        assert_eq!(score_event(&half, ScoringVersion::V2), 1.7);
    }

    #[test]
    fn mismatched_modifier_is_neutral() {
        let surface = EventInput::new(42.2, 0.0, EventType::Run).with_surface(1.0, 100.0);
        assert_eq!(score_event(&surface, ScoringVersion::V1), 2.0);

        let flag = EventInput::new(42.2, 0.0, EventType::Run).draftable(true);
        assert_eq!(score_event(&flag, ScoringVersion::V2), 2.0);
    }

    #[test]
    fn temperature_adjustment_bands() {
        assert_eq!(temperature_adjustment(10.0), 0.0);
        assert_eq!(temperature_adjustment(15.0), 0.0);
        assert_eq!(temperature_adjustment(20.0), 0.0);
        assert!((temperature_adjustment(0.0) - -0.5).abs() < 1e-9);
        assert!((temperature_adjustment(-20.0) - -1.5).abs() < 1e-9);
        assert!((temperature_adjustment(30.0) - 1.0).abs() < 1e-9);
        assert!((temperature_adjustment(50.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn score_is_monotonic_outside_optimal_band() {
        let at = |t: f64| {
            score_event(
                &EventInput::new(42.2, 0.0, EventType::Run).with_temperature(t),
                ScoringVersion::V1,
            )
        };
        let mut prev = at(10.0);
        for t in (-20..10).rev() {
            let score = at(t as f64);
            assert!(score <= prev, "cold {t}: {score} > {prev}");
            prev = score;
        }
        let mut prev = at(20.0);
        for t in 21..=50 {
            let score = at(t as f64);
            assert!(score >= prev, "heat {t}: {score} < {prev}");
            prev = score;
        }
        for t in [10.5, 12.0, 15.0, 19.9, 20.0] {
            assert_eq!(at(t), 2.0);
        }
    }

    #[test]
    fn altitude_steps_down_at_cutoff() {
        assert!(altitude_adjustment(499.0) > 0.0);
        assert_eq!(altitude_adjustment(500.0), 0.0);
        assert_eq!(altitude_adjustment(4000.0), 0.0);

        let at = |a: f64| {
            score_event(
                &EventInput::new(42.2, 0.0, EventType::Run).with_altitude(a),
                ScoringVersion::V1,
            )
        };
        assert_eq!(at(499.0), 2.4);
        assert_eq!(at(500.0), 2.0);
        assert!(at(499.0) > at(500.0));
    }

    #[test]
    fn scores_are_rounded_to_two_decimals() {
        for &kind in EventType::all() {
            for version in [ScoringVersion::V1, ScoringVersion::V2] {
                for distance in [0.0, 13.7, 21.2, 42.2, 71.3, 160.9] {
                    let input = EventInput::new(distance, 777.0, kind)
                        .with_temperature(-7.3)
                        .with_altitude(333.0)
                        .with_surface(0.3, 35.0);
                    let score = score_event(&input, version);
                    assert!(score.is_finite());
                    assert!(is_two_decimals(score), "{score} not rounded");
                }
            }
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let input = EventInput::new(55.5, 1234.0, EventType::Gravel)
            .with_temperature(27.0)
            .with_altitude(120.0)
            .draftable(true);
        let first = score_event(&input, ScoringVersion::V1);
        let second = score_event(&input, ScoringVersion::V1);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn breakdown_matches_score() {
        let input = EventInput::new(120.0, 2400.0, EventType::Gravel)
            .with_temperature(28.0)
            .with_altitude(250.0)
            .draftable(true);
        let parts = breakdown(&input, ScoringVersion::V1);
        assert!(!parts.gated);
        assert_eq!(parts.terrain_multiplier, 1.2);
        assert_eq!(parts.draft_multiplier, 0.8);
        let recomposed = parts.base * parts.terrain_multiplier * parts.draft_multiplier
            + parts.temperature_adjustment
            + parts.altitude_adjustment;
        assert_eq!(round2(recomposed), parts.score);
        assert_eq!(parts.score, score_event(&input, ScoringVersion::V1));
    }

    #[test]
    fn breakdown_flags_gated_events() {
        let input = EventInput::new(50.0, 0.0, EventType::Mtb).with_surface(0.5, 0.0);
        let parts = breakdown(&input, ScoringVersion::V2);
        assert!(parts.gated);
        assert_eq!(parts.score, 0.0);
        assert!(parts.base > 0.0);
    }

    #[test]
    fn rounding_uses_the_stored_value() {
        // -1.495 + 0.16 is stored just above -1.335
        let cold = EventInput::new(0.0, 0.0, EventType::Run)
            .with_temperature(-19.9)
            .with_altitude(200.0);
        assert_eq!(score_event(&cold, ScoringVersion::V1), -1.33);
        assert_eq!(round2(2.3992), 2.4);
        assert_eq!(round2(-0.001).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn event_type_keys_round_trip() {
        for &kind in EventType::all() {
            assert_eq!(EventType::from_key(kind.to_key()), Some(kind));
            assert_eq!(kind.to_string().parse::<EventType>().unwrap(), kind);
        }
        assert!(matches!(
            "swim".parse::<EventType>(),
            Err(ScoreError::UnknownEventType(s)) if s == "swim"
        ));
    }

    #[test]
    fn event_type_selector_wraps() {
        assert_eq!(EventType::Mtb.next(), EventType::Run);
        assert_eq!(EventType::Run.prev(), EventType::Mtb);
        assert_eq!(EventType::Run.next(), EventType::TrailRun);
    }

    #[test]
    fn scoring_version_parses() {
        assert_eq!("v2".parse::<ScoringVersion>().unwrap(), ScoringVersion::V2);
        assert_eq!("V1".parse::<ScoringVersion>().unwrap(), ScoringVersion::V1);
        assert!("v3".parse::<ScoringVersion>().is_err());
    }
}
