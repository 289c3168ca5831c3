//! Synthetic monthly ratio history.
//!
//! The series follows a fixed calendar of alternating 7-year inflation and
//! deflation cycles starting in 1972. It has no noise term, so the same
//! year range always produces the same series.

use allocator_core::traits::Indicator;
use allocator_core::types::{MovingAverages, RatioPair};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::moving_average::Sma;

/// Trailing window of the 7-year moving average, in months.
pub const MA_WINDOW_MONTHS: usize = 7 * 12;

/// First year of the synthetic history.
pub const HISTORY_START_YEAR: i32 = 1972;

const BASE_GOLD_BONDS: f64 = 2.0;
const BASE_STOCKS_GOLD: f64 = 25.0;
const MIN_GOLD_BONDS: f64 = 1.0;
const MIN_STOCKS_GOLD: f64 = 10.0;

/// Direction of a 7-year monetary cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Inflation,
    Deflation,
}

const CYCLES: [(i32, i32, CycleKind); 7] = [
    (1972, 1979, CycleKind::Inflation),
    (1980, 1987, CycleKind::Deflation),
    (1988, 1995, CycleKind::Inflation),
    (1996, 2003, CycleKind::Deflation),
    (2004, 2011, CycleKind::Inflation),
    (2012, 2019, CycleKind::Deflation),
    (2020, 2027, CycleKind::Inflation),
];

/// One month of the synthetic series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioObservation {
    pub year: i32,
    pub month: u32,
    pub ratios: RatioPair,
    pub cycle: Option<CycleKind>,
}

/// Monthly gold/bonds and stocks/gold ratios.
#[derive(Debug, Clone)]
pub struct SyntheticRatioHistory {
    observations: Vec<RatioObservation>,
}

impl SyntheticRatioHistory {
    /// Generate months from January 1972 through December of `end_year`.
    pub fn generate(end_year: i32) -> Self {
        let mut observations = Vec::new();

        for year in HISTORY_START_YEAR..=end_year {
            let cycle = CYCLES.iter().find(|(s, e, _)| year >= *s && year <= *e);
            let ratios = match cycle {
                Some(&(start, end, kind)) => cycle_ratios(year, start, end, kind),
                None => RatioPair::new(BASE_GOLD_BONDS, BASE_STOCKS_GOLD),
            };

            for month in 1..=12 {
                observations.push(RatioObservation {
                    year,
                    month,
                    ratios,
                    cycle: cycle.map(|c| c.2),
                });
            }
        }

        Self { observations }
    }

    pub fn observations(&self) -> &[RatioObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Moving averages over the trailing 84 months, one per month from the
    /// first full window onward.
    pub fn moving_average_series(&self) -> Vec<MovingAverages> {
        let sma = Sma::new(MA_WINDOW_MONTHS);
        let gold_bonds: Vec<f64> = self.observations.iter().map(|o| o.ratios.gold_bonds).collect();
        let stocks_gold: Vec<f64> =
            self.observations.iter().map(|o| o.ratios.stocks_gold).collect();

        sma.calculate(&gold_bonds)
            .into_iter()
            .zip(sma.calculate(&stocks_gold))
            .map(|(gb, sg)| MovingAverages::new(gb, sg))
            .collect()
    }

    /// Most recent ratios and their trailing averages.
    pub fn latest(&self) -> Option<(RatioPair, MovingAverages)> {
        let last = self.observations.last()?;
        let averages = *self.moving_average_series().last()?;
        Some((last.ratios, averages))
    }
}

fn cycle_ratios(year: i32, start: i32, end: i32, kind: CycleKind) -> RatioPair {
    let phase = f64::from(year - start) / f64::from(end - start) * PI;
    let (gold_bonds, stocks_gold) = match kind {
        CycleKind::Inflation => (
            BASE_GOLD_BONDS + phase.sin() * 0.8,
            BASE_STOCKS_GOLD + phase.cos() * 10.0,
        ),
        CycleKind::Deflation => (
            BASE_GOLD_BONDS - phase.sin() * 0.5,
            BASE_STOCKS_GOLD - phase.cos() * 8.0,
        ),
    };
    RatioPair::new(
        gold_bonds.max(MIN_GOLD_BONDS),
        stocks_gold.max(MIN_STOCKS_GOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_month_count() {
        let history = SyntheticRatioHistory::generate(1980);
        assert_eq!(history.len(), 9 * 12);
        assert_eq!(history.observations()[0].year, 1972);
        assert_eq!(history.observations()[0].cycle, Some(CycleKind::Inflation));
    }

    #[test]
    fn test_cycle_start_values() {
        let history = SyntheticRatioHistory::generate(1980);
        // Phase zero: sin = 0, cos = 1
        let first = history.observations()[0].ratios;
        assert!((first.gold_bonds - 2.0).abs() < 1e-10);
        assert!((first.stocks_gold - 35.0).abs() < 1e-10);

        let deflation = history
            .observations()
            .iter()
            .find(|o| o.year == 1980)
            .unwrap()
            .ratios;
        assert!((deflation.stocks_gold - 17.0).abs() < 1e-10);
    }

    #[test]
    fn test_moving_average_window() {
        let history = SyntheticRatioHistory::generate(1980);
        let series = history.moving_average_series();
        assert_eq!(series.len(), history.len() - MA_WINDOW_MONTHS + 1);

        let short = SyntheticRatioHistory::generate(1975);
        assert!(short.moving_average_series().is_empty());
        assert!(short.latest().is_none());
    }

    #[test]
    fn test_latest_is_deterministic() {
        let a = SyntheticRatioHistory::generate(2025).latest().unwrap();
        let b = SyntheticRatioHistory::generate(2025).latest().unwrap();
        assert_eq!(a, b);
        assert!(a.1.gold_bonds.unwrap() > 0.0);
        assert!(a.1.stocks_gold.unwrap() > 0.0);
    }

    #[test]
    fn test_years_after_calendar_use_base() {
        let history = SyntheticRatioHistory::generate(2030);
        let last = history.observations().last().unwrap();
        assert_eq!(last.cycle, None);
        assert_eq!(last.ratios, RatioPair::new(2.0, 25.0));
    }
}
