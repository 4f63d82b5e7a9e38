//! Equality-based partitioning of submitted results.

use std::collections::HashMap;
use std::hash::Hash;

/// Partition `items` into equivalence classes by equality.
///
/// Returns one `Vec` of indices per distinct value. Classes appear in order
/// of their first occurrence and indices within a class are ascending, so
/// the output is fully determined by the input order.
pub fn partition_by_equality<T: Eq + Hash>(items: &[T]) -> Vec<Vec<usize>> {
    let mut class_of: HashMap<&T, usize> = HashMap::with_capacity(items.len());
    let mut classes: Vec<Vec<usize>> = Vec::new();

    for (i, item) in items.iter().enumerate() {
        match class_of.get(item) {
            Some(&c) => classes[c].push(i),
            None => {
                class_of.insert(item, classes.len());
                classes.push(vec![i]);
            }
        }
    }

    classes
}
