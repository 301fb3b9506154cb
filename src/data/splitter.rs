// ============================================================
// Layer 4 — Stratified Train/Validation Splitter
// ============================================================
// Shuffles samples and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// Stratified: each class (human / generated) is shuffled and
// split on its own, so both sets keep the corpus's class balance.
// With a heavily skewed corpus a plain random split can leave the
// validation set with almost no examples of the minority class.
//
//   class      total   train (80%)   val (20%)
//   human        600       480          120
//   generated    400       320           80
//
// Seeded: the same seed always yields the same split, so runs
// are reproducible and comparable.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle and split `samples` into (train, validation), keeping
/// the proportion of each class given by `is_positive`.
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed; same seed → same split
/// * `is_positive`    - Class of a sample
pub fn split_stratified<T, F>(
    samples:        Vec<T>,
    train_fraction: f64,
    seed:           u64,
    is_positive:    F,
) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> bool,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let total = samples.len();

    let (positives, negatives): (Vec<T>, Vec<T>) = samples.into_iter().partition(|s| is_positive(s));

    let mut train = Vec::with_capacity(total);
    let mut val   = Vec::with_capacity(total);

    for mut class in [negatives, positives] {
        class.shuffle(&mut rng);

        // Clamp to valid range to avoid panics on tiny classes
        let split_at = ((class.len() as f64) * train_fraction).round() as usize;
        let split_at = split_at.min(class.len());

        let class_val = class.split_off(split_at);
        train.extend(class);
        val.extend(class_val);
    }

    // Interleave the classes again
    train.shuffle(&mut rng);
    val.shuffle(&mut rng);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        train.len(),
        val.len(),
        (train.len() * 100) / total.max(1),
        (val.len()   * 100) / total.max(1),
    );

    (train, val)
}
