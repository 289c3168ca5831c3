//! Economic regimes and their fixed allocations.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Allocation;

/// Allocation rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// Thirds between stocks, cash and one defensive asset
    #[default]
    Simple,
    /// Four-quadrant growth/inflation table
    Extreme,
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMode::Simple => f.write_str("simple"),
            AllocationMode::Extreme => f.write_str("extreme"),
        }
    }
}

/// The rule branch that produced an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    /// Growth without inflation
    BoomDeflation,
    /// Growth with inflation
    BoomInflation,
    /// Stagflation
    RecessionInflation,
    /// Deflationary depression
    RecessionDeflation,
    /// Exit signal, inflationary
    GrizzlyInflation,
    /// Exit signal, deflationary
    GrizzlyDeflation,
    SimpleInflation,
    SimpleDeflation,
}

impl Quadrant {
    pub const ALL: [Quadrant; 8] = [
        Quadrant::BoomDeflation,
        Quadrant::BoomInflation,
        Quadrant::RecessionInflation,
        Quadrant::RecessionDeflation,
        Quadrant::GrizzlyInflation,
        Quadrant::GrizzlyDeflation,
        Quadrant::SimpleInflation,
        Quadrant::SimpleDeflation,
    ];

    /// The fixed target allocation of this quadrant.
    pub const fn allocation(&self) -> Allocation {
        match self {
            Quadrant::BoomDeflation => Allocation::new(80.0, 0.0, 20.0, 0.0),
            Quadrant::BoomInflation => Allocation::new(50.0, 50.0, 0.0, 0.0),
            Quadrant::RecessionInflation => Allocation::new(0.0, 70.0, 0.0, 30.0),
            Quadrant::RecessionDeflation => Allocation::new(0.0, 0.0, 100.0, 0.0),
            Quadrant::GrizzlyInflation => Allocation::new(0.0, 50.0, 0.0, 50.0),
            Quadrant::GrizzlyDeflation => Allocation::new(0.0, 0.0, 50.0, 50.0),
            Quadrant::SimpleInflation => Allocation::new(33.33, 33.33, 0.0, 33.33),
            Quadrant::SimpleDeflation => Allocation::new(33.33, 0.0, 33.33, 33.33),
        }
    }

    /// Stable kebab-case label.
    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::BoomDeflation => "boom-deflation",
            Quadrant::BoomInflation => "boom-inflation",
            Quadrant::RecessionInflation => "recession-inflation",
            Quadrant::RecessionDeflation => "recession-deflation",
            Quadrant::GrizzlyInflation => "grizzly-inflation",
            Quadrant::GrizzlyDeflation => "grizzly-deflation",
            Quadrant::SimpleInflation => "simple-inflation",
            Quadrant::SimpleDeflation => "simple-deflation",
        }
    }

    /// Whether the exit signal produced this quadrant.
    pub fn is_exit(&self) -> bool {
        matches!(self, Quadrant::GrizzlyInflation | Quadrant::GrizzlyDeflation)
    }

    pub fn is_stagflation(&self) -> bool {
        matches!(self, Quadrant::RecessionInflation)
    }

    pub fn is_inflationary(&self) -> bool {
        matches!(
            self,
            Quadrant::BoomInflation
                | Quadrant::RecessionInflation
                | Quadrant::GrizzlyInflation
                | Quadrant::SimpleInflation
        )
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
