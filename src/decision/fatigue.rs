//! Match fatigue
//!
//! Fatigue is a [0, 1] level that rises with every rally decision and is
//! partially reset at game breaks and timeouts. Stamina slows the drain but
//! never stops it.

use crate::math::clamp01;
use crate::params::FatigueParams;

/// Fatigue added by one rally decision
pub fn decision_drain(deficit: f64, stamina: f64, params: &FatigueParams) -> f64 {
    let load = params.base_drain + clamp01(deficit) * params.deficit_drain_scale;
    let resistance = clamp01(stamina / 100.0) * params.stamina_resistance;
    (load * (1.0 - resistance)).max(0.0)
}

/// Fatigue after a drain
#[inline]
pub fn drained(fatigue: f64, drain: f64) -> f64 {
    clamp01(fatigue + drain)
}

/// Fatigue after recovering `fraction` of it
#[inline]
pub fn recovered(fatigue: f64, fraction: f64) -> f64 {
    clamp01(fatigue * (1.0 - clamp01(fraction)))
}
