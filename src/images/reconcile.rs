use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Reference to a stored image; its meaning is its position in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSlot(String);

impl ImageSlot {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for ImageSlot {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ImageSlot {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Edit instructions for a batch image list.
///
/// Indices refer to the list as it was before the edit. `T` is the image
/// payload: uploaded files while planning, [`ImageSlot`]s once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation<T = ImageSlot> {
    pub removed_indices: BTreeSet<i64>,
    pub replacements: Vec<(i64, T)>,
    pub appended: Vec<T>,
}

impl<T> Default for EditOperation<T> {
    fn default() -> Self {
        Self {
            removed_indices: BTreeSet::new(),
            replacements: Vec::new(),
            appended: Vec::new(),
        }
    }
}

impl<T> EditOperation<T> {
    pub fn is_noop(&self) -> bool {
        self.removed_indices.is_empty() && self.replacements.is_empty() && self.appended.is_empty()
    }

    /// A replacement lands only inside the original bounds and never on a
    /// slot that is also being removed.
    pub fn replacement_applies(&self, index: i64, original_len: usize) -> bool {
        in_bounds(index, original_len) && !self.removed_indices.contains(&index)
    }

    /// Drop replacements that [`reconcile`] would skip, so their payloads
    /// need not be uploaded.
    pub fn retain_effective(mut self, original_len: usize) -> Self {
        let replacements = std::mem::take(&mut self.replacements);
        let kept: Vec<(i64, T)> = replacements
            .into_iter()
            .filter(|(index, _)| {
                let keep = self.replacement_applies(*index, original_len);
                if !keep {
                    tracing::debug!("Skipping replacement at index {} (removed or out of range)", index);
                }
                keep
            })
            .collect();
        self.replacements = kept;
        self
    }

    /// Swap payloads, keeping every index as it is.
    pub fn map<U, F>(self, mut f: F) -> EditOperation<U>
    where
        F: FnMut(T) -> U,
    {
        EditOperation {
            removed_indices: self.removed_indices,
            replacements: self.replacements.into_iter().map(|(i, t)| (i, f(t))).collect(),
            appended: self.appended.into_iter().map(f).collect(),
        }
    }

    /// Number of payloads carried (replacements plus appended).
    pub fn payload_count(&self) -> usize {
        self.replacements.len() + self.appended.len()
    }

    /// Split into the bare plan and its payloads, replacements first and
    /// then appended, each in list order.
    pub fn into_parts(self) -> (EditOperation<()>, Vec<T>) {
        let mut payloads = Vec::with_capacity(self.payload_count());
        let plan = self.map(|payload| payloads.push(payload));
        (plan, payloads)
    }
}

impl EditOperation<()> {
    /// Refill a plan from [`EditOperation::into_parts`] with one payload per
    /// slot, in the same order. `None` if the counts differ.
    pub fn fill<U>(self, payloads: Vec<U>) -> Option<EditOperation<U>> {
        if payloads.len() != self.payload_count() {
            return None;
        }
        let mut payloads = payloads.into_iter();
        let replacements = self
            .replacements
            .into_iter()
            .zip(payloads.by_ref())
            .map(|((index, ()), payload)| (index, payload))
            .collect();
        Some(EditOperation {
            removed_indices: self.removed_indices,
            replacements,
            appended: payloads.collect(),
        })
    }
}

fn in_bounds(index: i64, len: usize) -> bool {
    usize::try_from(index).map(|i| i < len).unwrap_or(false)
}

/// Apply `op` to `current`: replacements first (against original indices),
/// then removals from the highest index down, then appends.
///
/// Out-of-range indices are ignored; the operation cannot fail.
pub fn reconcile<T: Clone>(current: &[T], op: &EditOperation<T>) -> Vec<T> {
    let original_len = current.len();
    let mut working = current.to_vec();

    for (index, image) in &op.replacements {
        if op.replacement_applies(*index, original_len) {
            working[*index as usize] = image.clone();
        }
    }

    // Descending, so a removal never shifts a lower index still pending.
    for index in op.removed_indices.iter().rev() {
        if in_bounds(*index, working.len()) {
            working.remove(*index as usize);
        }
    }

    working.extend(op.appended.iter().cloned());
    working
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(names: &[&str]) -> Vec<ImageSlot> {
        names.iter().map(|n| ImageSlot::from(*n)).collect()
    }

    fn op(removed: &[i64], replacements: &[(i64, &str)], appended: &[&str]) -> EditOperation {
        EditOperation {
            removed_indices: removed.iter().copied().collect(),
            replacements: replacements.iter().map(|(i, s)| (*i, ImageSlot::from(*s))).collect(),
            appended: slots(appended),
        }
    }

    #[test]
    fn removes_single_index() {
        let result = reconcile(&slots(&["a", "b", "c"]), &op(&[1], &[], &[]));
        assert_eq!(result, slots(&["a", "c"]));
    }

    #[test]
    fn replaces_in_place() {
        let result = reconcile(&slots(&["a", "b", "c"]), &op(&[], &[(0, "x")], &[]));
        assert_eq!(result, slots(&["x", "b", "c"]));
    }

    #[test]
    fn removal_wins_over_replacement() {
        let result = reconcile(&slots(&["a", "b", "c"]), &op(&[0], &[(0, "x")], &[]));
        assert_eq!(result, slots(&["b", "c"]));
    }

    #[test]
    fn remove_all_then_append() {
        let result = reconcile(&slots(&["a", "b"]), &op(&[0, 1], &[], &["d", "e"]));
        assert_eq!(result, slots(&["d", "e"]));
    }

    #[test]
    fn empty_operation_is_identity() {
        let current = slots(&["a", "b", "c"]);
        let empty = EditOperation::default();
        assert!(empty.is_noop());
        assert_eq!(reconcile(&current, &empty), current);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let current = slots(&["a", "b"]);
        assert_eq!(reconcile(&current, &op(&[99], &[], &[])), current);
        assert_eq!(reconcile(&current, &op(&[-1], &[(-1, "x"), (2, "y")], &[])), current);
        assert_eq!(reconcile(&current, &op(&[99, 0], &[], &["z"])), slots(&["b", "z"]));
    }

    #[test]
    fn append_only_on_empty_list() {
        let result = reconcile(&[], &op(&[], &[], &["p", "q"]));
        assert_eq!(result, slots(&["p", "q"]));
    }

    #[test]
    fn replacements_keep_original_index_meaning_across_removals() {
        // Replace index 3 while removing 0 and 2: the replaced image must be
        // the one originally at 3.
        let current = slots(&["a", "b", "c", "d", "e"]);
        let result = reconcile(&current, &op(&[0, 2], &[(3, "D"), (4, "E")], &["f"]));
        assert_eq!(result, slots(&["b", "D", "E", "f"]));
    }

    #[test]
    fn result_length_invariant() {
        let current = slots(&["a", "b", "c", "d"]);
        let edit = op(&[1, 3, 7], &[(0, "x"), (1, "y")], &["n1", "n2", "n3"]);
        let result = reconcile(&current, &edit);
        let valid_removals = 2;
        assert_eq!(result.len(), current.len() - valid_removals + edit.appended.len());
        assert_eq!(result, slots(&["x", "c", "n1", "n2", "n3"]));
    }

    #[test]
    fn later_replacement_for_same_index_wins() {
        let result = reconcile(&slots(&["a", "b"]), &op(&[], &[(1, "x"), (1, "y")], &[]));
        assert_eq!(result, slots(&["a", "y"]));
    }

    #[test]
    fn retain_effective_drops_skipped_replacements() {
        let plan: EditOperation<&str> = EditOperation {
            removed_indices: [1].into_iter().collect(),
            replacements: vec![(0, "keep"), (1, "removed"), (5, "out"), (-2, "neg")],
            appended: vec!["new"],
        };
        let plan = plan.retain_effective(3);
        assert_eq!(plan.replacements, vec![(0, "keep")]);
        assert_eq!(plan.payload_count(), 2);
    }

    #[test]
    fn map_preserves_indices() {
        let plan: EditOperation<u8> = EditOperation {
            removed_indices: [2].into_iter().collect(),
            replacements: vec![(0, 1)],
            appended: vec![2, 3],
        };
        let mapped = plan.map(|n| ImageSlot::new(format!("img{}", n)));
        assert_eq!(mapped.replacements, vec![(0, ImageSlot::from("img1"))]);
        assert_eq!(mapped.appended, slots(&["img2", "img3"]));
        assert!(mapped.removed_indices.contains(&2));
    }

    #[test]
    fn parts_refill_in_order() {
        let plan: EditOperation<&str> = EditOperation {
            removed_indices: [4].into_iter().collect(),
            replacements: vec![(2, "r2"), (0, "r0")],
            appended: vec!["a"],
        };
        let (bare, payloads) = plan.into_parts();
        assert_eq!(payloads, vec!["r2", "r0", "a"]);

        let stored = bare.clone().fill(vec!["u1", "u2", "u3"]).unwrap();
        assert_eq!(stored.replacements, vec![(2, "u1"), (0, "u2")]);
        assert_eq!(stored.appended, vec!["u3"]);
        assert!(stored.removed_indices.contains(&4));

        assert!(bare.fill(vec!["only one"]).is_none());
    }
}
