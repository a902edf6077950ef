use rand::SeedableRng;
use rand::rngs::StdRng;

#[cfg(feature = "serde")]
/// Reads candles from the JSON array at `filepath`.
pub fn get_data_from_file(filepath: &std::path::Path) -> crate::errors::Result<Vec<crate::engine::Candle>> {
    use crate::errors::Error;
    use std::{fs::File, io::BufReader};

    let file = File::open(filepath)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(Error::from)
}

/// Returns a reproducible RNG for `Some(seed)`, a freshly seeded one otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.into_iter().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Population standard deviation, `None` for an empty input.
pub fn std_dev(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let values = values.into_iter().collect::<Vec<_>>();
    let mean = mean(values.iter().copied())?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}
