//! Group-by-key and reduce.
//!
//! Every analyzer funnels through these functions so that grouping order,
//! tie-breaking and empty-input behavior are the same everywhere:
//!
//! - groups appear in first-occurrence order of their key,
//! - an empty input yields an empty [`Groups`],
//! - [`top_n_by`] is a stable descending sort, so equal scores keep input order,
//! - averages over nothing are `0.0`.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Reduced values keyed by group, in first-occurrence order.
#[derive(Debug, Clone)]
pub struct Groups<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for Groups<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Groups<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the value for `key`, inserting `init()` on first sight.
    pub fn entry_or_insert_with(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(key.clone(), position);
                self.entries.push((key, init()));
                position
            }
        };
        &mut self.entries[position].1
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Transforms every reduced value, keeping keys and order.
    pub fn map_values<W>(self, mut f: impl FnMut(V) -> W) -> Groups<K, W> {
        Groups {
            entries: self
                .entries
                .into_iter()
                .map(|(key, value)| (key, f(value)))
                .collect(),
            index: self.index,
        }
    }

    /// Converts into a key-sorted map.
    pub fn into_btree_map(self) -> BTreeMap<K, V>
    where
        K: Ord,
    {
        self.entries.into_iter().collect()
    }

    /// Consumes the groups into `(key, value)` pairs in first-occurrence order.
    pub fn into_vec(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K, V> IntoIterator for Groups<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// General reduction: starts each group at `init()` and folds its items in.
pub fn fold_by<I, K, A, KeyFn, InitFn, FoldFn>(
    items: I,
    key: KeyFn,
    init: InitFn,
    mut fold: FoldFn,
) -> Groups<K, A>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KeyFn: Fn(&I::Item) -> K,
    InitFn: Fn() -> A,
    FoldFn: FnMut(&mut A, I::Item),
{
    let mut groups = Groups::new();
    for item in items {
        let accumulator = groups.entry_or_insert_with(key(&item), &init);
        fold(accumulator, item);
    }
    groups
}

/// Collects the items of each group.
pub fn group_by<I, K, KeyFn>(items: I, key: KeyFn) -> Groups<K, Vec<I::Item>>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KeyFn: Fn(&I::Item) -> K,
{
    fold_by(items, key, Vec::new, |members, item| members.push(item))
}

/// Counts the items of each group.
pub fn count_by<I, K, KeyFn>(items: I, key: KeyFn) -> Groups<K, u64>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KeyFn: Fn(&I::Item) -> K,
{
    fold_by(items, key, || 0, |count, _| *count += 1)
}

/// Arithmetic mean of `value` over the items of each group.
pub fn mean_by<I, K, KeyFn, ValueFn>(items: I, key: KeyFn, value: ValueFn) -> Groups<K, f64>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KeyFn: Fn(&I::Item) -> K,
    ValueFn: Fn(&I::Item) -> f64,
{
    fold_by(
        items,
        key,
        || (0.0_f64, 0_u64),
        |(sum, count), item| {
            *sum += value(&item);
            *count += 1;
        },
    )
    .map_values(|(sum, count)| sum / count as f64)
}

/// The `n` items with the highest score, highest first; ties keep input order.
pub fn top_n_by<T, S, ScoreFn>(items: impl IntoIterator<Item = T>, n: usize, score: ScoreFn) -> Vec<T>
where
    S: Ord,
    ScoreFn: Fn(&T) -> S,
{
    let mut ranked: Vec<T> = items.into_iter().collect();
    ranked.sort_by(|a, b| score(b).cmp(&score(a)));
    ranked.truncate(n);
    ranked
}

/// Arithmetic mean, `0.0` for no values.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_u64), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_groups_keep_first_occurrence_order() {
        let counts = count_by(["b", "a", "b", "c", "a", "b"], |s| *s);
        assert_eq!(counts.into_vec(), vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_empty_input_yields_empty_groups() {
        let empty: Vec<u32> = Vec::new();
        assert!(count_by(empty.clone(), |n| *n % 2).is_empty());
        assert!(mean_by(empty.clone(), |n| *n, |n| f64::from(*n)).is_empty());
        assert!(group_by(empty.clone(), |n| *n).into_btree_map().is_empty());
        assert!(top_n_by(empty, 5, |n| *n).is_empty());
        assert_eq!(mean(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_mean_by_and_group_by() {
        let scores = [("pop", 5.0), ("rock", 3.0), ("pop", 4.0)];
        let means = mean_by(scores, |(genre, _)| *genre, |(_, score)| *score);
        assert_eq!(means.get(&"pop"), Some(&4.5));
        assert_eq!(means.get(&"rock"), Some(&3.0));
        assert_eq!(means.get(&"jazz"), None);

        let grouped = group_by(scores, |(genre, _)| *genre).into_btree_map();
        assert_eq!(grouped["pop"], vec![("pop", 5.0), ("pop", 4.0)]);
    }

    #[test]
    fn test_top_n_is_stable_descending() {
        let items = [("a", 1), ("b", 3), ("c", 3), ("d", 2), ("e", 3)];
        let top = top_n_by(items, 4, |(_, score)| *score);
        assert_eq!(top, vec![("b", 3), ("c", 3), ("e", 3), ("d", 2)]);

        assert_eq!(top_n_by(items, 10, |(_, score)| *score).len(), 5);
        assert!(top_n_by(items, 0, |(_, score)| *score).is_empty());
    }

    #[test]
    fn test_map_values_keeps_lookup() {
        let doubled = count_by([1, 2, 1], |n| *n).map_values(|count| count * 2);
        assert_eq!(doubled.get(&1), Some(&4));
        assert_eq!(doubled.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_input_len(items in prop::collection::vec(0u8..10, 0..200)) {
            let counts = count_by(items.iter(), |n| **n);
            prop_assert_eq!(counts.iter().map(|(_, c)| *c).sum::<u64>(), items.len() as u64);
        }

        #[test]
        fn prop_top_n_non_increasing(items in prop::collection::vec(0u32..50, 0..100), n in 0usize..20) {
            let top = top_n_by(items.clone(), n, |v| *v);
            prop_assert!(top.len() <= n.min(items.len()));
            prop_assert!(top.windows(2).all(|pair| pair[0] >= pair[1]));
        }

        #[test]
        fn prop_mean_within_bounds(values in prop::collection::vec(-1000.0f64..1000.0, 1..50)) {
            let m = mean(values.iter().copied());
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m >= min - 1e-9 && m <= max + 1e-9);
        }
    }
}
