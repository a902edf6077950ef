//! Market data in, ghost bars out.
//!
//! A [`Projector`] fetches candles from a [`MarketData`] source, validates
//! them into a [`History`], derives [`Stats`], extrapolates ghost bars and
//! checks for a [`Reversal`]. Whatever goes wrong on the data side (a failing
//! source, no candles, a malformed series) yields [`Projection::Unavailable`]
//! instead of an error, so the caller can show a "waiting for data" state.
//! Only an invalid projector configuration is returned as an error.

use std::sync::Arc;

use crate::cache::Cache;
use crate::engine::{Candle, Ghost, GhostConfig, History, Reversal, Stats, StatsWindows};
use crate::errors::{Error, Result};

use chrono::{DateTime, Duration, Utc};

/// A provider of time-ordered candles for a symbol.
pub trait MarketData {
    /// Returns the recent candles of `symbol`, oldest first. May be empty.
    fn candles(&self, symbol: &str) -> Result<Vec<Candle>>;
}

/// Reads a JSON array of candles from a file, regardless of the symbol.
#[cfg(feature = "serde")]
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: std::path::PathBuf,
}

#[cfg(feature = "serde")]
impl JsonFileSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "serde")]
impl MarketData for JsonFileSource {
    fn candles(&self, _symbol: &str) -> Result<Vec<Candle>> {
        crate::utils::get_data_from_file(&self.path)
    }
}

/// Everything a chart needs: the real candles, the ghosts and the zones.
#[derive(Debug, Clone)]
pub struct Outlook {
    history: History,
    stats: Stats,
    ghosts: Vec<Candle>,
    signal: Option<Reversal>,
}

impl Outlook {
    /// Returns the real candles.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the stats the ghosts were drawn from.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Returns an iterator over the ghost candles.
    pub fn ghosts(&self) -> std::slice::Iter<'_, Candle> {
        self.ghosts.iter()
    }

    /// Returns the reversal signal at the last real close, if any.
    pub fn signal(&self) -> Option<Reversal> {
        self.signal
    }
}

/// Result of a projection run.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Data was available and ghosts were generated.
    Ready(Box<Outlook>),
    /// No usable data: nothing to extrapolate.
    Unavailable {
        /// Why the data could not be used.
        reason: String,
    },
}

impl Projection {
    /// Returns the outlook if the projection is ready.
    pub fn outlook(&self) -> Option<&Outlook> {
        match self {
            Self::Ready(outlook) => Some(outlook),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns `true` if ghosts were generated.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Fallback spacing when the history holds a single candle.
const DEFAULT_INTERVAL_MINUTES: i64 = 5;

/// Runs fetch, stats, extrapolation and signal detection.
///
/// ### Example
/// ```rust
/// use ghost_bars::prelude::*;
/// use chrono::{DateTime, Duration};
///
/// struct Flat;
///
/// impl MarketData for Flat {
///     fn candles(&self, _symbol: &str) -> Result<Vec<Candle>> {
///         (0..30)
///             .map(|i| {
///                 CandleBuilder::builder()
///                     .open(100.0)
///                     .high(101.0)
///                     .low(99.0)
///                     .close(100.0)
///                     .timestamp(DateTime::default() + Duration::minutes(5 * i))
///                     .build()
///             })
///             .collect()
///     }
/// }
///
/// let projector = Projector::default().count(10).seed(42);
/// let projection = projector.project(&Flat, "GC=F").unwrap();
/// let outlook = projection.outlook().unwrap();
///
/// assert_eq!(outlook.ghosts().count(), 10);
/// assert_eq!(outlook.stats().resistance(), 101.0);
/// ```
#[derive(Debug, Clone)]
pub struct Projector {
    ghost: GhostConfig,
    windows: StatsWindows,
    count: usize,
    interval: Option<Duration>,
    seed: Option<u64>,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            ghost: GhostConfig::default(),
            windows: StatsWindows::default(),
            count: 40,
            interval: None,
            seed: None,
        }
    }
}

impl Projector {
    /// Sets the ghost tunables.
    pub fn ghost(mut self, config: GhostConfig) -> Self {
        self.ghost = config;
        self
    }

    /// Sets the stats windows.
    pub fn windows(mut self, windows: StatsWindows) -> Self {
        self.windows = windows;
        self
    }

    /// Sets how many ghost candles to generate.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Forces the bar interval instead of inferring it from the last two candles.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Makes every run reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration without touching any data.
    pub fn validate(&self) -> Result<()> {
        self.ghost.validate()?;
        self.windows.validate()?;
        if let Some(interval) = self.interval
            && interval <= Duration::zero()
        {
            return Err(Error::InvalidInterval(interval));
        }
        Ok(())
    }

    /// Fetches `symbol` from `source` and projects it.
    ///
    /// ### Returns
    /// `Projection::Unavailable` when the source fails or returns unusable data,
    /// an error only when the projector itself is misconfigured.
    pub fn project<M: MarketData>(&self, source: &M, symbol: &str) -> Result<Projection> {
        self.validate()?;
        match source.candles(symbol) {
            Ok(candles) => self.project_candles(candles),
            Err(e) => Ok(unavailable(symbol, e.to_string())),
        }
    }

    /// Like [`Projector::project`], but serves fresh candles from `cache` and
    /// stores non-empty responses in it.
    pub fn project_cached<M: MarketData>(
        &self,
        source: &M,
        cache: &mut Cache,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<Projection> {
        self.validate()?;
        if let Some(candles) = cache.get(symbol, now) {
            return self.project_candles(candles);
        }

        let candles: Arc<[Candle]> = match source.candles(symbol) {
            Ok(candles) => candles.into(),
            Err(e) => return Ok(unavailable(symbol, e.to_string())),
        };
        if !candles.is_empty() {
            cache.put(symbol, Arc::clone(&candles), now);
        }
        self.project_candles(candles)
    }

    /// Projects candles already at hand.
    pub fn project_candles(&self, candles: impl Into<Arc<[Candle]>>) -> Result<Projection> {
        self.validate()?;
        let history = match History::new(candles) {
            Ok(history) => history,
            Err(e) => return Ok(unavailable("history", e.to_string())),
        };

        let stats = Stats::compute(&history, &self.windows)?;
        let last = history.last();
        let interval = self
            .interval
            .or(history.interval())
            .unwrap_or(Duration::minutes(DEFAULT_INTERVAL_MINUTES));

        let ghosts = Ghost::new(self.ghost)?.extrapolate(
            last.close(),
            last.timestamp(),
            self.count,
            interval,
            &stats,
            self.seed,
        )?;
        let signal = Reversal::detect(last.close(), &stats);

        tracing::debug!(
            candles = history.len(),
            ghosts = ghosts.len(),
            resistance = stats.resistance(),
            support = stats.support(),
            volatility = stats.volatility(),
            trend = stats.trend(),
            signal = ?signal,
            "projection ready"
        );

        Ok(Projection::Ready(Box::new(Outlook {
            history,
            stats,
            ghosts,
            signal,
        })))
    }
}

fn unavailable(symbol: &str, reason: String) -> Projection {
    tracing::warn!(symbol, %reason, "market data unavailable");
    Projection::Unavailable { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CandleBuilder;
    use std::cell::Cell;

    struct Source {
        candles: Vec<Candle>,
        calls: Cell<usize>,
    }

    impl Source {
        fn new(candles: Vec<Candle>) -> Self {
            Self {
                candles,
                calls: Cell::new(0),
            }
        }
    }

    impl MarketData for Source {
        fn candles(&self, _symbol: &str) -> Result<Vec<Candle>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.candles.clone())
        }
    }

    struct Failing;

    impl MarketData for Failing {
        fn candles(&self, _symbol: &str) -> Result<Vec<Candle>> {
            Err(Error::DataSource("connection reset".to_string()))
        }
    }

    fn get_start() -> DateTime<Utc> {
        DateTime::from_timestamp_secs(1515151515).unwrap()
    }

    fn get_data(n: i64, step: Duration) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = 2000.0 + (i as f64 * 0.5).sin() * 5.0;
                CandleBuilder::builder()
                    .open(close - 0.5)
                    .high(close + 2.0)
                    .low(close - 2.0)
                    .close(close)
                    .volume(10.0)
                    .timestamp(get_start() + step * i as i32)
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn empty_source_is_unavailable() {
        let source = Source::new(Vec::new());
        let projection = Projector::default().project(&source, "GC=F").unwrap();

        assert!(!projection.is_ready());
        assert!(projection.outlook().is_none());
    }

    #[test]
    fn failing_source_is_unavailable() {
        let projection = Projector::default().project(&Failing, "GC=F").unwrap();
        match projection {
            Projection::Unavailable { reason } => assert!(reason.contains("connection reset")),
            Projection::Ready(_) => panic!("expected unavailable"),
        }
    }

    #[test]
    fn unordered_source_is_unavailable() {
        let mut candles = get_data(10, Duration::minutes(5));
        candles.swap(3, 4);
        let projection = Projector::default().project(&Source::new(candles), "GC=F").unwrap();
        assert!(!projection.is_ready());
    }

    #[test]
    fn ready_outlook_continues_history() {
        let candles = get_data(120, Duration::minutes(5));
        let last = *candles.last().unwrap();
        let projection = Projector::default().seed(42).project(&Source::new(candles), "GC=F").unwrap();
        let outlook = projection.outlook().unwrap();

        assert_eq!(outlook.history().len(), 120);
        assert_eq!(outlook.ghosts().count(), 40);

        let first = outlook.ghosts().next().unwrap();
        assert_eq!(first.timestamp(), last.timestamp() + Duration::minutes(5));
        assert_eq!(first.open(), last.close());
    }

    #[test]
    fn interval_is_inferred_or_forced() {
        let candles = get_data(10, Duration::hours(1));
        let last = *candles.last().unwrap();

        let inferred = Projector::default().count(1).project_candles(candles.clone()).unwrap();
        let ghost = inferred.outlook().unwrap().ghosts().next().copied().unwrap();
        assert_eq!(ghost.timestamp(), last.timestamp() + Duration::hours(1));

        let forced = Projector::default()
            .count(1)
            .interval(Duration::minutes(15))
            .project_candles(candles)
            .unwrap();
        let ghost = forced.outlook().unwrap().ghosts().next().copied().unwrap();
        assert_eq!(ghost.timestamp(), last.timestamp() + Duration::minutes(15));
    }

    #[test]
    fn single_candle_uses_default_interval() {
        let candles = get_data(1, Duration::minutes(5));
        let projection = Projector::default().count(2).project_candles(candles).unwrap();
        let ghosts = projection.outlook().unwrap().ghosts().copied().collect::<Vec<_>>();
        assert_eq!(ghosts[0].timestamp(), get_start() + Duration::minutes(5));
        assert_eq!(ghosts[1].timestamp(), get_start() + Duration::minutes(10));
    }

    #[test]
    fn seeded_projections_repeat() {
        let source = Source::new(get_data(50, Duration::minutes(5)));
        let projector = Projector::default().seed(7);
        let a = projector.project(&source, "GC=F").unwrap();
        let b = projector.project(&source, "GC=F").unwrap();

        let a = a.outlook().unwrap().ghosts().copied().collect::<Vec<_>>();
        let b = b.outlook().unwrap().ghosts().copied().collect::<Vec<_>>();
        assert_eq!(a, b);
    }

    #[test]
    fn misconfiguration_is_an_error() {
        let source = Source::new(get_data(10, Duration::minutes(5)));

        let projector = Projector::default().interval(Duration::zero());
        assert!(matches!(projector.project(&source, "GC=F"), Err(Error::InvalidInterval(_))));

        let projector = Projector::default().windows(StatsWindows::default().trend(0));
        assert!(matches!(projector.project(&source, "GC=F"), Err(Error::InvalidWindow("trend"))));
        // misconfiguration is caught before the source is asked
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn cache_serves_until_expiry_or_invalidation() {
        let source = Source::new(get_data(30, Duration::minutes(5)));
        let mut cache = Cache::new(Duration::seconds(10));
        let projector = Projector::default().seed(1);
        let now = get_start();

        assert!(projector.project_cached(&source, &mut cache, "GC=F", now).unwrap().is_ready());
        assert!(projector.project_cached(&source, &mut cache, "GC=F", now + Duration::seconds(5)).unwrap().is_ready());
        assert_eq!(source.calls.get(), 1);

        projector.project_cached(&source, &mut cache, "GC=F", now + Duration::seconds(11)).unwrap();
        assert_eq!(source.calls.get(), 2);

        cache.clear();
        projector.project_cached(&source, &mut cache, "GC=F", now + Duration::seconds(12)).unwrap();
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn empty_responses_are_not_cached() {
        let source = Source::new(Vec::new());
        let mut cache = Cache::default();
        let projector = Projector::default();

        let projection = projector.project_cached(&source, &mut cache, "GC=F", get_start()).unwrap();
        assert!(!projection.is_ready());
        assert!(cache.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_file_source() {
        let path = std::env::temp_dir().join(format!("ghost-bars-{}.json", std::process::id()));
        let candles = get_data(25, Duration::minutes(5));
        std::fs::write(&path, serde_json::to_string(&candles).unwrap()).unwrap();

        let projection = Projector::default()
            .count(5)
            .project(&JsonFileSource::new(&path), "GC=F")
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        let outlook = projection.outlook().unwrap();
        assert_eq!(outlook.history().len(), 25);
        assert_eq!(outlook.ghosts().count(), 5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_file_is_unavailable() {
        let source = JsonFileSource::new("/nonexistent/ghost-bars.json");
        let projection = Projector::default().project(&source, "GC=F").unwrap();
        assert!(!projection.is_ready());
    }
}
