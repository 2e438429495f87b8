//! Fixed risk policy: every trade risks 1% of equity over an 80-pip stop.

use serde::{Deserialize, Serialize};

/// Price units to pips (4-decimal pip convention).
pub const PIPS_PER_PRICE_UNIT: f64 = 10_000.0;

/// Offset added to every pip reading. Preserves the spread/rounding
/// convention of the source data.
pub const PIP_OFFSET: f64 = 1.0;

/// Profit per pip per unit of position size.
pub const PROFIT_PER_PIP: f64 = 100.0;

/// Lot scaling applied after the risk division.
pub const LOT_SCALE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Fraction of equity risked per trade.
    pub risk_fraction: f64,
    /// Stop distance in pips.
    pub risk_pips: f64,
    /// Price value of one pip.
    pub pip_size: f64,
}

impl RiskPolicy {
    pub const STANDARD: RiskPolicy = RiskPolicy {
        risk_fraction: 0.01,
        risk_pips: 80.0,
        pip_size: 0.0001,
    };

    pub fn position_size(&self, equity: f64) -> f64 {
        equity * self.risk_fraction / self.risk_pips * LOT_SCALE
    }

    pub fn stop_distance(&self) -> f64 {
        self.risk_pips * self.pip_size
    }

    /// Pips for a favourable price move of `delta`.
    pub fn pips(&self, delta: f64) -> f64 {
        PIP_OFFSET + delta * PIPS_PER_PRICE_UNIT
    }

    pub fn profit(&self, pips: f64, size: f64) -> f64 {
        pips * size * PROFIT_PER_PIP
    }
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_for_default_equity() {
        let size = RiskPolicy::STANDARD.position_size(100.0);
        assert!((size - 0.000125).abs() < 1e-15);
    }

    #[test]
    fn stop_distance_is_eighty_pips() {
        assert!((RiskPolicy::STANDARD.stop_distance() - 0.008).abs() < 1e-12);
    }

    #[test]
    fn pips_include_offset() {
        let pips = RiskPolicy::STANDARD.pips(1.2050 - 1.2000);
        assert!((pips - 51.0).abs() < 1e-9);
        assert!((RiskPolicy::STANDARD.pips(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn full_stop_loses_risk_fraction() {
        // 80 pips against, offset included: (1 - 80) pips
        let policy = RiskPolicy::STANDARD;
        let size = policy.position_size(100.0);
        let loss = policy.profit(policy.pips(-policy.stop_distance()), size);
        assert!((loss - (-79.0 * size * 100.0)).abs() < 1e-12);
        assert!(loss < 0.0 && loss > -1.0);
    }
}
