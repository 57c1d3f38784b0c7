//! Player capability data
//!
//! Externally owned, read-only inputs to both the physics and the decision
//! code. Attributes and tendencies are on a 0-100 scale; stroke ceilings are
//! physical (cm/s and rev/s); equipment ratings are multipliers where 1.0 is
//! a nominal setup.

use serde::{Deserialize, Serialize};

use crate::decision::DecisionEngineKind;
use crate::sim::PhysicsEngineKind;

/// Which face of the paddle plays the stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleSide {
    Forehand,
    Backhand,
}

impl PaddleSide {
    pub fn other(self) -> Self {
        match self {
            PaddleSide::Forehand => PaddleSide::Backhand,
            PaddleSide::Backhand => PaddleSide::Forehand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// +1 for right-handed, -1 for left-handed
    pub fn sign(self) -> f64 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// Rubber surface families; each has its own generation modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubberKind {
    #[default]
    Inverted,
    ShortPips,
    LongPips,
    Anti,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rubber {
    pub kind: RubberKind,
    /// Speed rating multiplier
    pub speed: f64,
    /// Spin rating multiplier
    pub spin: f64,
}

impl Default for Rubber {
    fn default() -> Self {
        Self {
            kind: RubberKind::Inverted,
            speed: 1.0,
            spin: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blade {
    /// Speed rating multiplier
    pub speed: f64,
}

impl Default for Blade {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub blade: Blade,
    pub forehand: Rubber,
    pub backhand: Rubber,
}

impl Equipment {
    pub fn rubber(&self, side: PaddleSide) -> &Rubber {
        match side {
            PaddleSide::Forehand => &self.forehand,
            PaddleSide::Backhand => &self.backhand,
        }
    }
}

/// Per-side ceilings before equipment is applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeCapability {
    /// Maximum ball speed (cm/s)
    pub power: f64,
    /// Maximum spin (rev/s)
    pub spin: f64,
    /// 0-100
    pub accuracy: f64,
    /// 0-100
    pub consistency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub footwork: f64,
    pub mental: f64,
    pub stamina: f64,
    pub spin_read: f64,
    pub deception: f64,
    pub service: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            footwork: 60.0,
            mental: 50.0,
            stamina: 60.0,
            spin_read: 55.0,
            deception: 50.0,
            service: 60.0,
        }
    }
}

/// Rally stroke tendencies (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeTendencies {
    /// Baseline appetite for risk
    pub aggression: f64,
    pub power: f64,
    pub spin: f64,
    /// 100 = pure topspin, 0 = pure backspin
    pub topspin: f64,
    /// 50 = none, above = positive sidespin axis
    pub sidespin: f64,
    /// 0 = short, 100 = deep
    pub depth: f64,
    /// 50 = neutral, above/below = aim toward +x/-x
    pub width: f64,
    /// 0 = skims the net, 100 = safe margin
    pub net_clearance: f64,
    pub deception: f64,
}

impl Default for StrokeTendencies {
    fn default() -> Self {
        Self {
            aggression: 50.0,
            power: 55.0,
            spin: 55.0,
            topspin: 75.0,
            sidespin: 50.0,
            depth: 65.0,
            width: 50.0,
            net_clearance: 50.0,
            deception: 30.0,
        }
    }
}

/// Serve tendencies (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeTendencies {
    pub aggression: f64,
    pub power: f64,
    pub spin: f64,
    /// 100 = topspin serve, 0 = backspin serve
    pub topspin: f64,
    pub sidespin: f64,
    pub depth: f64,
    pub width: f64,
    pub net_clearance: f64,
    pub deception: f64,
    /// Preference for serving with the forehand
    pub forehand: f64,
}

impl Default for ServeTendencies {
    fn default() -> Self {
        Self {
            aggression: 40.0,
            power: 40.0,
            spin: 65.0,
            topspin: 30.0,
            sidespin: 60.0,
            depth: 35.0,
            width: 50.0,
            net_clearance: 40.0,
            deception: 50.0,
            forehand: 80.0,
        }
    }
}

/// Which decision/physics implementations drive this player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSelection {
    pub decision: DecisionEngineKind,
    pub physics: PhysicsEngineKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub handedness: Handedness,
    #[serde(default)]
    pub attributes: Attributes,
    pub forehand: StrokeCapability,
    pub backhand: StrokeCapability,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub stroke: StrokeTendencies,
    #[serde(default)]
    pub serve: ServeTendencies,
    #[serde(default)]
    pub engines: EngineSelection,
}

impl Player {
    /// A balanced club-level player on nominal inverted rubber
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handedness: Handedness::Right,
            attributes: Attributes::default(),
            forehand: StrokeCapability {
                power: 1800.0,
                spin: 110.0,
                accuracy: 65.0,
                consistency: 70.0,
            },
            backhand: StrokeCapability {
                power: 1500.0,
                spin: 85.0,
                accuracy: 60.0,
                consistency: 68.0,
            },
            equipment: Equipment::default(),
            stroke: StrokeTendencies::default(),
            serve: ServeTendencies::default(),
            engines: EngineSelection::default(),
        }
    }

    pub fn capability(&self, side: PaddleSide) -> &StrokeCapability {
        match side {
            PaddleSide::Forehand => &self.forehand,
            PaddleSide::Backhand => &self.backhand,
        }
    }
}
