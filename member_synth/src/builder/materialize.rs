//! Executable model of `@Singular` accumulation.
//!
//! Generated builders run on the host; these accumulators reproduce their
//! semantics so the three materialization arms can be exercised directly.
//! Accumulators start absent, as the generated fields start `null`.

use std::sync::Arc;

use crate::model::MaterializeArm;

/// Immutable result of a build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized<T> {
    /// Nothing was added.
    Empty,
    /// Exactly one element was added.
    Singleton(T),
    /// An immutable copy of everything added.
    Copy(Arc<[T]>),
}

impl<T> Materialized<T> {
    /// Arm that produced this value.
    #[must_use]
    pub const fn arm(&self) -> MaterializeArm {
        match self {
            Self::Empty => MaterializeArm::Empty,
            Self::Singleton(_) => MaterializeArm::Singleton,
            Self::Copy(_) => MaterializeArm::Copy,
        }
    }

    /// Elements in order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::Singleton(item) => std::slice::from_ref(item),
            Self::Copy(items) => items,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Accumulator behind a collection-valued `@Singular` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAccumulator<E> {
    items: Option<Vec<E>>,
}

impl<E> Default for ListAccumulator<E> {
    fn default() -> Self {
        Self { items: None }
    }
}

impl<E: Clone> ListAccumulator<E> {
    /// An absent accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: None }
    }

    /// Add-one.
    pub fn add(&mut self, item: E) -> &mut Self {
        self.items.get_or_insert_with(Vec::new).push(item);
        self
    }

    /// Add-all.
    pub fn add_all<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
    {
        self.items.get_or_insert_with(Vec::new).extend(items);
        self
    }

    /// Clear; the accumulator stays present but empty.
    pub fn clear(&mut self) -> &mut Self {
        if let Some(items) = self.items.as_mut() {
            items.clear();
        }
        self
    }

    /// Accumulated count; zero when absent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    /// Whether nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build-time conversion. The accumulator is left untouched, so later
    /// adds never affect a value already built.
    #[must_use]
    pub fn materialize(&self) -> Materialized<E> {
        match self.items.as_deref() {
            None | Some([]) => Materialized::Empty,
            Some([only]) => Materialized::Singleton(only.clone()),
            Some(items) => Materialized::Copy(Arc::from(items)),
        }
    }
}

/// Accumulator behind a map-valued `@Singular` entry: parallel key and
/// value lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAccumulator<K, V> {
    entries: Option<(Vec<K>, Vec<V>)>,
}

impl<K, V> Default for MapAccumulator<K, V> {
    fn default() -> Self {
        Self { entries: None }
    }
}

impl<K: Clone + PartialEq, V: Clone> MapAccumulator<K, V> {
    /// An absent accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: None }
    }

    /// Add-one.
    pub fn put(&mut self, key: K, value: V) -> &mut Self {
        let (keys, values) = self.entries.get_or_insert_with(|| (Vec::new(), Vec::new()));
        keys.push(key);
        values.push(value);
        self
    }

    /// Add-all.
    pub fn put_all<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.put(key, value);
        }
        self
    }

    /// Clear both lists.
    pub fn clear(&mut self) -> &mut Self {
        if let Some((keys, values)) = self.entries.as_mut() {
            keys.clear();
            values.clear();
        }
        self
    }

    /// Accumulated pair count, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |(keys, _)| keys.len())
    }

    /// Whether nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build-time conversion.
    ///
    /// The arm follows the accumulated count. A repeated key keeps the
    /// position of its first insertion and the value of its last.
    #[must_use]
    pub fn materialize(&self) -> Materialized<(K, V)> {
        let Some((keys, values)) = self.entries.as_ref() else {
            return Materialized::Empty;
        };
        let mut merged: Vec<(K, V)> = Vec::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(values) {
            match merged.iter_mut().find(|(existing, _)| existing == key) {
                Some(slot) => slot.1 = value.clone(),
                None => merged.push((key.clone(), value.clone())),
            }
        }
        match MaterializeArm::for_len(keys.len()) {
            MaterializeArm::Empty => Materialized::Empty,
            MaterializeArm::Singleton => merged
                .into_iter()
                .next()
                .map_or(Materialized::Empty, Materialized::Singleton),
            MaterializeArm::Copy => Materialized::Copy(Arc::from(merged)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], MaterializeArm::Empty)]
    #[case(&["java"], MaterializeArm::Singleton)]
    #[case(&["java", "rust"], MaterializeArm::Copy)]
    fn arm_follows_the_count(#[case] tags: &[&str], #[case] arm: MaterializeArm) {
        let mut acc = ListAccumulator::new();
        acc.add_all(tags.iter().copied());
        let built = acc.materialize();
        assert_eq!(built.arm(), arm);
        assert_eq!(built.as_slice(), tags);
    }

    #[test]
    fn built_values_are_independent_of_later_adds() {
        let mut acc = ListAccumulator::new();
        acc.add("a").add("b");
        let first = acc.materialize();
        acc.add("c");
        assert_eq!(first.as_slice(), ["a", "b"]);
        assert_eq!(acc.materialize().len(), 3);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut acc = ListAccumulator::new();
        acc.add(1).add(2).clear();
        assert!(acc.is_empty());
        assert_eq!(acc.materialize(), Materialized::Empty);
    }

    #[test]
    fn map_keeps_first_position_and_last_value() {
        let mut acc = MapAccumulator::new();
        acc.put("a", 1).put("b", 2).put("a", 3);
        let built = acc.materialize();
        assert_eq!(built.arm(), MaterializeArm::Copy);
        assert_eq!(built.as_slice(), [("a", 3), ("b", 2)]);
    }

    #[test]
    fn map_with_a_repeated_key_still_takes_the_copy_arm() {
        let mut acc = MapAccumulator::new();
        acc.put("a", 1).put("a", 2);
        let built = acc.materialize();
        assert_eq!(built.arm(), MaterializeArm::Copy);
        assert_eq!(built.as_slice(), [("a", 2)]);
    }
}
