//! # Bias policies side by side
//!
//! Runs the three bias policies with the same seed from a close sitting
//! just under resistance, then shows the cache serving a second request.
mod utils;

use std::error::Error;
use std::result::Result as StdResult;

use chrono::{Duration, Utc};
use ghost_bars::prelude::*;

fn main() -> StdResult<(), Box<dyn Error>> {
    utils::init_tracing();

    let stats = Stats::new(2010.0, 1990.0, 2.0, 0.4)?;
    let start = Utc::now();

    for policy in [BiasPolicy::Piecewise, BiasPolicy::Graded, BiasPolicy::Stacked] {
        let ghost = Ghost::new(GhostConfig::default().bias(policy))?;
        let ghosts = ghost.extrapolate(2008.0, start, 12, Duration::minutes(5), &stats, Some(42))?;
        let last = ghosts.last().map(|c| c.close()).unwrap_or(2008.0);
        println!("{policy:?}: 2008.00 -> {last:.2}");
    }

    let mut cache = Cache::new(Duration::seconds(10));
    let projector = Projector::default().count(3).seed(7);
    let now = Utc::now();
    let first = projector.project_cached(&utils::SampleSource, &mut cache, "GC=F", now)?;
    let second = projector.project_cached(&utils::SampleSource, &mut cache, "GC=F", now + Duration::seconds(5))?;
    println!("cached entries: {}, both ready: {}", cache.len(), first.is_ready() && second.is_ready());

    // "force refresh"
    cache.clear();
    println!("cached entries after refresh: {}", cache.len());

    Ok(())
}
