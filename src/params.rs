//! Simulation parameters
//!
//! Every balance-affecting number lives here. Parameters are built once per
//! engine from the default table plus a sparse set of overrides, validated,
//! and then shared read-only (usually behind an `Arc`).
//!
//! Each group is `#[serde(default)]`, so a partial JSON group fills its gaps
//! from that group's defaults. The equipment modifier map is the one nested
//! map and merges key by key instead of being replaced wholesale.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec3;
use crate::player::RubberKind;

/// Configuration failures (the only fallible surface of the crate)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("malformed parameter overrides: {0}")]
    Json(#[from] serde_json::Error),
}

/// Table dimensions (cm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableGeometry {
    pub length: f64,
    pub width: f64,
    pub net_height: f64,
}

impl Default for TableGeometry {
    fn default() -> Self {
        Self {
            length: 274.0,
            width: 152.5,
            net_height: 15.25,
        }
    }
}

impl TableGeometry {
    #[inline]
    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Whether a point on the table plane is within the playing surface
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.abs() <= self.half_width() && y.abs() <= self.half_length()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallProperties {
    /// kg
    pub mass: f64,
    /// cm
    pub diameter: f64,
}

impl Default for BallProperties {
    fn default() -> Self {
        Self {
            mass: 0.0027,
            diameter: 4.0,
        }
    }
}

impl BallProperties {
    #[inline]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Cross-sectional area (cm²)
    #[inline]
    pub fn area(&self) -> f64 {
        PI * self.radius() * self.radius()
    }
}

/// Aerodynamics and gravity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirParams {
    /// kg/cm³ (1.2 kg/m³ at sea level)
    pub density: f64,
    pub drag_coefficient: f64,
    /// Dimensionless lift factor; Magnus constant is `C_m·ρ·A·R`
    pub magnus_coefficient: f64,
    /// cm/s²
    pub gravity: f64,
    pub drag_enabled: bool,
    pub magnus_enabled: bool,
}

impl Default for AirParams {
    fn default() -> Self {
        Self {
            density: 1.2e-6,
            drag_coefficient: 0.45,
            magnus_coefficient: 0.25,
            gravity: 981.0,
            drag_enabled: true,
            magnus_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceParams {
    /// Vertical coefficient of restitution against the table
    pub restitution: f64,
    /// Spin-friction coupling at table contact
    pub friction: f64,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            restitution: 0.89,
            friction: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetParams {
    /// Crossings this far below the net tape still clip over (cm)
    pub clip_margin: f64,
    /// Per-axis velocity kept after a clip
    pub clip_retention: Vec3,
    /// How far the net extends past each side line (cm)
    pub post_overhang: f64,
}

impl Default for NetParams {
    fn default() -> Self {
        Self {
            clip_margin: 1.0,
            clip_retention: Vec3::new(0.7, 0.35, 0.5),
            post_overhang: 15.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Landings within this distance of a table edge are edge balls (cm)
    pub margin: f64,
    /// Lateral deflection added to vx and vy (cm/s)
    pub deflection_stddev: f64,
    /// Lower bound of the random vertical retention
    pub vertical_retention_min: f64,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            margin: 1.5,
            deflection_stddev: 60.0,
            vertical_retention_min: 0.3,
        }
    }
}

/// Execution quality weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityParams {
    pub position_weight: f64,
    pub pressure_weight: f64,
    pub risk_weight: f64,
    /// Time available (s) above which there is no time pressure
    pub comfortable_time: f64,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self {
            position_weight: 0.5,
            pressure_weight: 0.35,
            risk_weight: 0.3,
            comfortable_time: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorModelParams {
    /// Azimuth stddev (rad) at zero quality and zero accuracy
    pub base_angle_stddev: f64,
    /// Elevation stddev relative to azimuth stddev
    pub elevation_scale: f64,
    /// Accuracy multiplier at perfect accuracy
    pub accuracy_floor: f64,
    /// Relative spin-magnitude stddev at zero quality
    pub spin_error_scale: f64,
}

impl Default for ErrorModelParams {
    fn default() -> Self {
        Self {
            base_angle_stddev: 0.06,
            elevation_scale: 0.5,
            accuracy_floor: 0.3,
            spin_error_scale: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementParams {
    /// Top movement speed at footwork 100 (cm/s)
    pub max_speed: f64,
    /// Fraction of `max_speed` available at footwork 0
    pub footwork_floor: f64,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            max_speed: 450.0,
            footwork_floor: 0.4,
        }
    }
}

impl MovementParams {
    /// Movement speed for a footwork attribute (0-100)
    pub fn speed_for(&self, footwork: f64) -> f64 {
        let f = (footwork / 100.0).clamp(0.0, 1.0);
        self.max_speed * (self.footwork_floor + (1.0 - self.footwork_floor) * f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalParams {
    /// Contact height above the table for a ball with no vertical speed (cm)
    pub base_contact_height: f64,
    /// Extra contact height per cm/s of vertical speed (s)
    pub contact_height_per_speed: f64,
    /// Time available when the incoming ball has no speed (s)
    pub fallback_time: f64,
    /// Deficit above which only the nearer paddle side is reachable
    pub stretch_threshold: f64,
    /// Longest time the ball keeps travelling after the bounce before it is
    /// played (s)
    pub max_contact_delay: f64,
}

impl Default for ArrivalParams {
    fn default() -> Self {
        Self {
            base_contact_height: 20.0,
            contact_height_per_speed: 0.05,
            fallback_time: 0.5,
            stretch_threshold: 0.6,
            max_contact_delay: 0.4,
        }
    }
}

/// Integration settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParams {
    /// Timestep (s)
    pub dt: f64,
    /// Safety cap on a single flight segment (s)
    pub max_flight_time: f64,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            dt: 0.002,
            max_flight_time: 5.0,
        }
    }
}

impl StepParams {
    pub fn max_steps(&self) -> usize {
        (self.max_flight_time / self.dt).round().max(1.0) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotParams {
    /// Share of the speed budget given to the horizontal component
    pub horizontal_fraction: f64,
    /// Speed fraction of the ceiling at zero requested power; must be > 0
    pub min_speed_fraction: f64,
    /// Flight time used when start and target coincide (s)
    pub min_flight_time: f64,
}

impl Default for ShotParams {
    fn default() -> Self {
        Self {
            horizontal_fraction: 0.9,
            min_speed_fraction: 0.3,
            min_flight_time: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeParams {
    /// Ball height above the table at contact (cm)
    pub contact_height: f64,
    /// Distance behind the end line at contact (cm)
    pub behind_end_line: f64,
    /// Share of the stroke speed ceiling available on serve
    pub speed_factor: f64,
    /// Share of the stroke spin ceiling available on serve
    pub spin_factor: f64,
    /// Serve targets stay within this fraction of the half width
    pub width_fraction: f64,
}

impl Default for ServeParams {
    fn default() -> Self {
        Self {
            contact_height: 25.0,
            behind_end_line: 15.0,
            speed_factor: 0.55,
            spin_factor: 1.0,
            width_fraction: 0.6,
        }
    }
}

/// Rubber-type generation modifiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentModifier {
    pub speed: f64,
    pub spin: f64,
}

impl Default for EquipmentModifier {
    fn default() -> Self {
        Self {
            speed: 1.0,
            spin: 1.0,
        }
    }
}

pub fn default_equipment_modifiers() -> BTreeMap<RubberKind, EquipmentModifier> {
    BTreeMap::from([
        (RubberKind::Inverted, EquipmentModifier { speed: 1.0, spin: 1.0 }),
        (RubberKind::ShortPips, EquipmentModifier { speed: 1.05, spin: 0.7 }),
        (RubberKind::LongPips, EquipmentModifier { speed: 0.85, spin: 0.35 }),
        (RubberKind::Anti, EquipmentModifier { speed: 0.7, spin: 0.15 }),
    ])
}

// === Decision tuning ===

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendencyParams {
    /// Per-shot Gaussian noise on a mapped tendency
    pub noise_stddev: f64,
    /// How hard effective risk pushes power/spin away from 0.5
    pub risk_amplification: f64,
}

impl Default for TendencyParams {
    fn default() -> Self {
        Self {
            noise_stddev: 0.1,
            risk_amplification: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureParams {
    /// Largest risk shift on a pressure point
    pub max_adjustment: f64,
    /// Mental attribute with no pressure effect
    pub neutral_mental: f64,
    /// Mental distance from neutral that yields the full adjustment
    pub mental_span: f64,
}

impl Default for PressureParams {
    fn default() -> Self {
        Self {
            max_adjustment: 0.2,
            neutral_mental: 50.0,
            mental_span: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyParams {
    /// Deficit beyond which risk is scaled down
    pub deficit_threshold: f64,
    /// Risk reduction at deficit 1.0
    pub max_reduction: f64,
}

impl Default for SafetyParams {
    fn default() -> Self {
        Self {
            deficit_threshold: 0.5,
            max_reduction: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideSelectionParams {
    /// Weight of capability versus the random term
    pub preference_weight: f64,
    pub power_weight: f64,
    pub spin_weight: f64,
    pub accuracy_weight: f64,
    pub consistency_weight: f64,
    /// Speed ceiling scored as 1.0 (cm/s)
    pub reference_speed: f64,
    /// Spin ceiling scored as 1.0 (rev/s)
    pub reference_spin: f64,
}

impl Default for SideSelectionParams {
    fn default() -> Self {
        Self {
            preference_weight: 0.75,
            power_weight: 1.0,
            spin_weight: 1.0,
            accuracy_weight: 1.0,
            consistency_weight: 1.0,
            reference_speed: 2500.0,
            reference_spin: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingParams {
    /// Depth as a fraction of the half length, at depth tendency 0 and 1
    pub short_depth: f64,
    pub deep_depth: f64,
    /// Weight of aiming away from the opponent versus the width tendency
    pub opponent_bias_weight: f64,
    /// Edge margin at zero risk (cm)
    pub base_edge_margin: f64,
    /// Edge margin never goes below this (cm)
    pub min_edge_margin: f64,
    pub jitter_x: f64,
    pub jitter_y: f64,
    /// Targets stay at least this far past the net (cm)
    pub net_margin: f64,
}

impl Default for TargetingParams {
    fn default() -> Self {
        Self {
            short_depth: 0.35,
            deep_depth: 0.9,
            opponent_bias_weight: 0.6,
            base_edge_margin: 30.0,
            min_edge_margin: 6.0,
            jitter_x: 6.0,
            jitter_y: 8.0,
            net_margin: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionParams {
    pub difficulty_scale: f64,
    pub base_accuracy: f64,
    /// Read accuracy gained per unit of spin-read attribute (0-1)
    pub attribute_scale: f64,
    pub difficulty_penalty: f64,
    pub min_accuracy: f64,
    /// Perceived-spin noise per unit of inaccuracy, relative to spin magnitude
    pub noise_scale: f64,
}

impl Default for PerceptionParams {
    fn default() -> Self {
        Self {
            difficulty_scale: 1.0,
            base_accuracy: 0.5,
            attribute_scale: 0.5,
            difficulty_penalty: 0.6,
            min_accuracy: 0.1,
            noise_scale: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FatigueParams {
    pub base_drain: f64,
    pub deficit_drain_scale: f64,
    /// Below 1.0 so maximal stamina still drains
    pub stamina_resistance: f64,
    /// Fraction of fatigue removed at a game break
    pub game_recovery: f64,
    /// Fraction of fatigue removed by a timeout
    pub timeout_recovery: f64,
}

impl Default for FatigueParams {
    fn default() -> Self {
        Self {
            base_drain: 0.004,
            deficit_drain_scale: 0.01,
            stamina_resistance: 0.7,
            game_recovery: 0.5,
            timeout_recovery: 0.3,
        }
    }
}

/// Desired net clearance ranges (cm above the tape)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearanceParams {
    pub min: f64,
    pub max: f64,
    pub serve_min: f64,
    pub serve_max: f64,
}

impl Default for ClearanceParams {
    fn default() -> Self {
        Self {
            min: 3.0,
            max: 25.0,
            serve_min: 2.0,
            serve_max: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryParams {
    /// How far the ready position pulls toward the centre line
    pub centering: f64,
    /// Ready position distance behind the end line (cm)
    pub depth: f64,
}

impl Default for RecoveryParams {
    fn default() -> Self {
        Self {
            centering: 0.6,
            depth: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    pub tendency: TendencyParams,
    pub pressure: PressureParams,
    pub safety: SafetyParams,
    pub side_selection: SideSelectionParams,
    pub targeting: TargetingParams,
    pub perception: PerceptionParams,
    pub fatigue: FatigueParams,
    pub clearance: ClearanceParams,
    pub recovery: RecoveryParams,
}

/// The full parameter table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub table: TableGeometry,
    pub ball: BallProperties,
    pub air: AirParams,
    pub bounce: BounceParams,
    pub net: NetParams,
    pub edge: EdgeParams,
    pub quality: QualityParams,
    pub error_model: ErrorModelParams,
    pub movement: MovementParams,
    pub arrival: ArrivalParams,
    pub step: StepParams,
    pub shot: ShotParams,
    pub serve: ServeParams,
    pub decision: DecisionParams,
    pub equipment_modifiers: BTreeMap<RubberKind, EquipmentModifier>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            table: TableGeometry::default(),
            ball: BallProperties::default(),
            air: AirParams::default(),
            bounce: BounceParams::default(),
            net: NetParams::default(),
            edge: EdgeParams::default(),
            quality: QualityParams::default(),
            error_model: ErrorModelParams::default(),
            movement: MovementParams::default(),
            arrival: ArrivalParams::default(),
            step: StepParams::default(),
            shot: ShotParams::default(),
            serve: ServeParams::default(),
            decision: DecisionParams::default(),
            equipment_modifiers: default_equipment_modifiers(),
        }
    }
}

/// Sparse overrides: `None` groups keep their defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterOverrides {
    pub table: Option<TableGeometry>,
    pub ball: Option<BallProperties>,
    pub air: Option<AirParams>,
    pub bounce: Option<BounceParams>,
    pub net: Option<NetParams>,
    pub edge: Option<EdgeParams>,
    pub quality: Option<QualityParams>,
    pub error_model: Option<ErrorModelParams>,
    pub movement: Option<MovementParams>,
    pub arrival: Option<ArrivalParams>,
    pub step: Option<StepParams>,
    pub shot: Option<ShotParams>,
    pub serve: Option<ServeParams>,
    pub decision: Option<DecisionParams>,
    /// Merged key by key into the default modifier table
    pub equipment_modifiers: BTreeMap<RubberKind, EquipmentModifier>,
}

impl SimulationParameters {
    /// Defaults with `overrides` applied, then validated
    pub fn from_overrides(overrides: ParameterOverrides) -> Result<Self, ConfigError> {
        let mut params = Self::default();
        params.apply(overrides);
        params.validate()?;
        Ok(params)
    }

    /// Parse a sparse JSON override document
    pub fn from_json_overrides(json: &str) -> Result<Self, ConfigError> {
        let overrides: ParameterOverrides = serde_json::from_str(json)?;
        Self::from_overrides(overrides)
    }

    fn apply(&mut self, o: ParameterOverrides) {
        if let Some(v) = o.table {
            self.table = v;
        }
        if let Some(v) = o.ball {
            self.ball = v;
        }
        if let Some(v) = o.air {
            self.air = v;
        }
        if let Some(v) = o.bounce {
            self.bounce = v;
        }
        if let Some(v) = o.net {
            self.net = v;
        }
        if let Some(v) = o.edge {
            self.edge = v;
        }
        if let Some(v) = o.quality {
            self.quality = v;
        }
        if let Some(v) = o.error_model {
            self.error_model = v;
        }
        if let Some(v) = o.movement {
            self.movement = v;
        }
        if let Some(v) = o.arrival {
            self.arrival = v;
        }
        if let Some(v) = o.step {
            self.step = v;
        }
        if let Some(v) = o.shot {
            self.shot = v;
        }
        if let Some(v) = o.serve {
            self.serve = v;
        }
        if let Some(v) = o.decision {
            self.decision = v;
        }
        self.equipment_modifiers.extend(o.equipment_modifiers);
    }

    /// Modifier for a rubber type; unknown types are neutral
    pub fn equipment_modifier(&self, kind: RubberKind) -> EquipmentModifier {
        self.equipment_modifiers
            .get(&kind)
            .copied()
            .unwrap_or_default()
    }

    /// Drag constant `k = ½·ρ·C_d·A` (kg/cm)
    pub fn drag_constant(&self) -> f64 {
        0.5 * self.air.density * self.air.drag_coefficient * self.ball.area()
    }

    /// Magnus constant `c = C_m·ρ·A·R` (kg)
    pub fn magnus_constant(&self) -> f64 {
        self.air.magnus_coefficient * self.air.density * self.ball.area() * self.ball.radius()
    }

    /// Reject values the physics or decision code cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("table.length", self.table.length)?;
        positive("table.width", self.table.width)?;
        positive("table.net_height", self.table.net_height)?;
        positive("ball.mass", self.ball.mass)?;
        positive("ball.diameter", self.ball.diameter)?;
        non_negative("air.density", self.air.density)?;
        non_negative("air.gravity", self.air.gravity)?;
        unit("bounce.restitution", self.bounce.restitution)?;
        unit("bounce.friction", self.bounce.friction)?;
        non_negative("net.clip_margin", self.net.clip_margin)?;
        non_negative("net.post_overhang", self.net.post_overhang)?;
        for (name, v) in [
            ("net.clip_retention.x", self.net.clip_retention.x),
            ("net.clip_retention.y", self.net.clip_retention.y),
            ("net.clip_retention.z", self.net.clip_retention.z),
        ] {
            unit(name, v)?;
        }
        non_negative("edge.margin", self.edge.margin)?;
        unit("edge.vertical_retention_min", self.edge.vertical_retention_min)?;
        unit("quality.position_weight", self.quality.position_weight)?;
        unit("quality.pressure_weight", self.quality.pressure_weight)?;
        unit("quality.risk_weight", self.quality.risk_weight)?;
        positive("quality.comfortable_time", self.quality.comfortable_time)?;
        unit("error_model.accuracy_floor", self.error_model.accuracy_floor)?;
        positive("movement.max_speed", self.movement.max_speed)?;
        unit("movement.footwork_floor", self.movement.footwork_floor)?;
        positive("arrival.fallback_time", self.arrival.fallback_time)?;
        unit("arrival.stretch_threshold", self.arrival.stretch_threshold)?;
        non_negative("arrival.max_contact_delay", self.arrival.max_contact_delay)?;
        positive("step.dt", self.step.dt)?;
        positive("step.max_flight_time", self.step.max_flight_time)?;
        if self.step.dt > self.step.max_flight_time {
            return Err(invalid("step.dt", "exceeds step.max_flight_time"));
        }
        if !(self.shot.horizontal_fraction > 0.0 && self.shot.horizontal_fraction <= 1.0) {
            return Err(invalid("shot.horizontal_fraction", "must be in (0, 1]"));
        }
        if !(self.shot.min_speed_fraction > 0.0 && self.shot.min_speed_fraction <= 1.0) {
            return Err(invalid(
                "shot.min_speed_fraction",
                "must be in (0, 1] so a zero-power stroke still has pace",
            ));
        }
        positive("shot.min_flight_time", self.shot.min_flight_time)?;
        unit("serve.width_fraction", self.serve.width_fraction)?;

        let d = &self.decision;
        unit("decision.safety.deficit_threshold", d.safety.deficit_threshold)?;
        unit("decision.safety.max_reduction", d.safety.max_reduction)?;
        unit("decision.side_selection.preference_weight", d.side_selection.preference_weight)?;
        positive("decision.side_selection.reference_speed", d.side_selection.reference_speed)?;
        positive("decision.side_selection.reference_spin", d.side_selection.reference_spin)?;
        unit("decision.targeting.opponent_bias_weight", d.targeting.opponent_bias_weight)?;
        if d.targeting.short_depth > d.targeting.deep_depth {
            return Err(invalid("decision.targeting.short_depth", "exceeds deep_depth"));
        }
        positive("decision.pressure.mental_span", d.pressure.mental_span)?;
        unit("decision.perception.min_accuracy", d.perception.min_accuracy)?;
        if !(d.fatigue.stamina_resistance >= 0.0 && d.fatigue.stamina_resistance < 1.0) {
            return Err(invalid(
                "decision.fatigue.stamina_resistance",
                "must be in [0, 1) so stamina never stops drain",
            ));
        }
        unit("decision.fatigue.game_recovery", d.fatigue.game_recovery)?;
        unit("decision.fatigue.timeout_recovery", d.fatigue.timeout_recovery)?;
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

fn positive(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, &format!("must be > 0, got {v}")))
    }
}

fn non_negative(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(name, &format!("must be >= 0, got {v}")))
    }
}

fn unit(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(name, &format!("must be in [0, 1], got {v}")))
    }
}
