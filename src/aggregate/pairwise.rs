//! Pairwise co-occurrence counts and correlations.
//!
//! Items (usually words) are grouped into features (usually line sections,
//! `Column::Bucket(10)`), and each pair of items is scored by the sections
//! they share. Both orderings of a pair are reported, as `(a, b)` and
//! `(b, a)`, so a table can be filtered on `item1` alone.

use ahash::{AHashMap, AHashSet};
use log::debug;
use serde::Serialize;

use crate::aggregate::column::{Column, Key, Row};
use crate::error::Result;

/// Number of features in which two items appear together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PairCount {
    pub item1: String,
    pub item2: String,
    pub n: u64,
}

/// Phi coefficient between the presence of two items across features.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairCorrelation {
    pub item1: String,
    pub item2: String,
    pub correlation: f64,
}

/// Which features each item appears in.
struct Incidence {
    items: Vec<Key>,
    occurrences: Vec<u64>,
    /// Distinct item indices per feature, in first-appearance order.
    features: Vec<Vec<usize>>,
}

impl Incidence {
    fn build<'a, R, I>(records: I, item: &Column, feature: &Column) -> Result<Self>
    where
        R: Row + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut item_index: AHashMap<Key, usize> = AHashMap::new();
        let mut feature_index: AHashMap<Key, usize> = AHashMap::new();
        let mut items = Vec::new();
        let mut occurrences = Vec::new();
        let mut features: Vec<Vec<usize>> = Vec::new();
        let mut seen: AHashSet<(usize, usize)> = AHashSet::new();

        for record in records {
            let mut key = record.group_key(&[item.clone(), feature.clone()])?;
            let feature_key = key.pop().unwrap_or(Key::Null);
            let item_key = key.pop().unwrap_or(Key::Null);

            let i = *item_index.entry(item_key.clone()).or_insert_with(|| {
                items.push(item_key);
                occurrences.push(0);
                items.len() - 1
            });
            occurrences[i] += 1;

            let f = *feature_index.entry(feature_key).or_insert_with(|| {
                features.push(Vec::new());
                features.len() - 1
            });
            if seen.insert((f, i)) {
                features[f].push(i);
            }
        }

        Ok(Incidence {
            items,
            occurrences,
            features,
        })
    }

    /// Co-occurrence counts for ordered pairs of kept items, in order of
    /// first co-occurrence.
    fn pairs(&self, keep: &[bool]) -> (Vec<(usize, usize)>, AHashMap<(usize, usize), u64>) {
        let mut order = Vec::new();
        let mut counts: AHashMap<(usize, usize), u64> = AHashMap::new();
        for members in &self.features {
            for &a in members.iter().filter(|&&a| keep[a]) {
                for &b in members.iter().filter(|&&b| keep[b] && b != a) {
                    let n = counts.entry((a, b)).or_insert_with(|| {
                        order.push((a, b));
                        0
                    });
                    *n += 1;
                }
            }
        }
        (order, counts)
    }

    /// Number of features each item appears in.
    fn presence(&self) -> Vec<u64> {
        let mut presence = vec![0u64; self.items.len()];
        for members in &self.features {
            for &i in members {
                presence[i] += 1;
            }
        }
        presence
    }
}

/// Count the features in which each pair of distinct items appears together.
///
/// Results are sorted by descending count; ties keep first co-occurrence
/// order.
pub fn pairwise_count<'a, R, I>(records: I, item: &Column, feature: &Column) -> Result<Vec<PairCount>>
where
    R: Row + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let incidence = Incidence::build(records, item, feature)?;
    let keep = vec![true; incidence.items.len()];
    let (order, counts) = incidence.pairs(&keep);

    let mut result: Vec<PairCount> = order
        .into_iter()
        .map(|(a, b)| PairCount {
            item1: incidence.items[a].to_string(),
            item2: incidence.items[b].to_string(),
            n: counts.get(&(a, b)).copied().unwrap_or_default(),
        })
        .collect();
    result.sort_by(|x, y| y.n.cmp(&x.n));

    debug!(
        "{} items over {} features, {} co-occurring pairs",
        incidence.items.len(),
        incidence.features.len(),
        result.len()
    );
    Ok(result)
}

/// Phi coefficient for every ordered pair of items occurring at least
/// `min_count` times.
///
/// Features are counted after the threshold is applied, so a section whose
/// items were all dropped does not count. Pairs whose coefficient is
/// undefined (an item present in every feature) are skipped. Results are
/// sorted by descending correlation.
pub fn pairwise_cor<'a, R, I>(
    records: I,
    item: &Column,
    feature: &Column,
    min_count: u64,
) -> Result<Vec<PairCorrelation>>
where
    R: Row + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let incidence = Incidence::build(records, item, feature)?;
    let keep: Vec<bool> = incidence
        .occurrences
        .iter()
        .map(|&n| n >= min_count)
        .collect();
    let (_, together) = incidence.pairs(&keep);
    let presence = incidence.presence();

    let total = incidence
        .features
        .iter()
        .filter(|members| members.iter().any(|&i| keep[i]))
        .count() as f64;

    let kept: Vec<usize> = (0..incidence.items.len()).filter(|&i| keep[i]).collect();
    let mut result = Vec::new();
    for &a in &kept {
        for &b in kept.iter().filter(|&&b| b != a) {
            let both = together.get(&(a, b)).copied().unwrap_or_default() as f64;
            let na = presence[a] as f64;
            let nb = presence[b] as f64;

            let denominator = (na * (total - na) * nb * (total - nb)).sqrt();
            if denominator == 0.0 {
                continue;
            }
            result.push(PairCorrelation {
                item1: incidence.items[a].to_string(),
                item2: incidence.items[b].to_string(),
                correlation: (total * both - na * nb) / denominator,
            });
        }
    }
    result.sort_by(|x, y| y.correlation.total_cmp(&x.correlation));

    debug!(
        "{} of {} items kept at min_count {}, {} correlations",
        kept.len(),
        incidence.items.len(),
        min_count,
        result.len()
    );
    Ok(result)
}
