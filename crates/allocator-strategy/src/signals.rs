//! Signal engine.

use allocator_core::types::{ExitSignal, InflationSignal, MovingAverages, RatioPair, SignalPair};

/// Compare both ratios with their moving averages.
///
/// Missing or non-positive averages are replaced by the reference
/// constants. A missing or non-positive ratio is replaced by its own
/// average, which lands on the calm side of both comparisons.
///
/// Ties resolve to calm on both axes: inflation needs a strictly higher
/// gold/bonds ratio and exiting stocks needs a strictly lower
/// stocks/gold ratio.
pub fn compute_signals(ratios: &RatioPair, averages: &MovingAverages) -> SignalPair {
    let gold_bonds_ma = averages.gold_bonds_or_reference();
    let stocks_gold_ma = averages.stocks_gold_or_reference();

    let gold_bonds = ratios.usable_gold_bonds().unwrap_or(gold_bonds_ma);
    let stocks_gold = ratios.usable_stocks_gold().unwrap_or(stocks_gold_ma);

    let inflation = if gold_bonds > gold_bonds_ma {
        InflationSignal::Gold
    } else {
        InflationSignal::Bonds
    };

    let exit = if stocks_gold < stocks_gold_ma {
        ExitSignal::ExitStocks
    } else {
        ExitSignal::KeepStocks
    };

    SignalPair { inflation, exit }
}
