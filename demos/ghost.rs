//! # Ghost bars after a sample session
//!
//! Projects 40 ghost candles after two days of 5 minute sample candles and
//! prints the zones, the reversal signal and the ghosts.
//!
//! Run with `RUST_LOG=ghost_bars=debug` to see the run logs.
mod utils;

use std::error::Error;
use std::result::Result as StdResult;

use ghost_bars::prelude::*;

fn main() -> StdResult<(), Box<dyn Error>> {
    utils::init_tracing();

    let projector = Projector::default().count(40).seed(42);
    let projection = projector.project(&utils::SampleSource, "GC=F")?;

    let outlook = match projection {
        Projection::Ready(outlook) => outlook,
        Projection::Unavailable { reason } => {
            println!("waiting for data: {reason}");
            return Ok(());
        }
    };

    let stats = outlook.stats();
    println!("resistance {:.2}", stats.resistance());
    println!("support    {:.2}", stats.support());
    println!("volatility {:.2}", stats.volatility());
    println!("trend      {:.4}", stats.trend());
    if let Some(signal) = outlook.signal() {
        println!("possible reversal: {signal:?}");
    }

    let history = outlook.history();
    utils::print_candles("market", history.tail(5));
    utils::print_candles("ghosts", outlook.ghosts());

    Ok(())
}
