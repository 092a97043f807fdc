use super::Value;
use std::fmt;
use std::sync::Arc;

/// A sparse, shareable sequence.
///
/// Each slot is either present (`Some`) or a hole (`None`). A hole is not the
/// same as a present `undefined`: iteration skips holes while `undefined` is
/// visited like any other element. Clones share storage until written to.
#[derive(Clone, Default, PartialEq)]
pub struct Array {
    slots: Arc<Vec<Option<Value>>>,
}

impl Array {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an array from explicit slots, `None` marking a hole.
    pub fn from_slots(slots: Vec<Option<Value>>) -> Self {
        Self {
            slots: Arc::new(slots),
        }
    }

    /// Creates an array of `len` holes.
    pub fn holes(len: usize) -> Self {
        Self::from_slots(vec![None; len])
    }

    /// Number of slots, holes included.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when there are no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Element at `index`, or `None` for holes and out-of-range indices.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Returns true when `index` is in range and holds no element.
    pub fn is_hole(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    /// All slots in order.
    #[inline]
    pub fn slots(&self) -> &[Option<Value>] {
        &self.slots
    }

    /// Iterates slots in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Option<Value>> {
        self.slots.iter()
    }

    /// Iterates present elements with their indices.
    pub fn present(&self) -> impl Iterator<Item = (usize, &Value)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    /// Number of present elements.
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Consumes the array, returning its slots without copying when unshared.
    pub fn into_slots(self) -> Vec<Option<Value>> {
        Arc::try_unwrap(self.slots).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Identity comparison: true when both handles share storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }

    /// Joins string forms with `separator`; holes, `undefined` and `null` render empty.
    pub fn join(&self, separator: &str) -> String {
        let mut out = String::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            match slot {
                None | Some(Value::Undefined) | Some(Value::Null) => {}
                Some(value) => out.push_str(&value.to_string()),
            }
        }
        out
    }

    /// Writes `value` at `index`, copying the storage first if it is shared.
    pub(crate) fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = Arc::make_mut(&mut self.slots).get_mut(index) {
            *slot = Some(value);
        }
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Hole;
        impl fmt::Debug for Hole {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("<hole>")
            }
        }

        let mut list = f.debug_list();
        for slot in self.slots.iter() {
            match slot {
                Some(value) => list.entry(value),
                None => list.entry(&Hole),
            };
        }
        list.finish()
    }
}

impl From<Vec<Option<Value>>> for Array {
    fn from(slots: Vec<Option<Value>>) -> Self {
        Self::from_slots(slots)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().map(Some).collect())
    }
}

impl FromIterator<Option<Value>> for Array {
    fn from_iter<I: IntoIterator<Item = Option<Value>>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Option<Value>;
    type IntoIter = std::slice::Iter<'a, Option<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holes_are_distinct_from_undefined() {
        let array = Array::from_slots(vec![Some(Value::Undefined), None]);
        assert!(!array.is_hole(0));
        assert!(array.is_hole(1));
        assert!(!array.is_hole(2));
        assert_eq!(array.present_count(), 1);
    }

    #[test]
    fn set_copies_shared_storage() {
        let original = Array::from_slots(vec![Some(Value::from(1)), None]);
        let mut copy = original.clone();
        copy.set(1, Value::from(2));
        assert!(original.is_hole(1));
        assert_eq!(copy.get(1), Some(&Value::from(2)));
        assert!(!copy.ptr_eq(&original));
    }

    #[test]
    fn join_renders_empty_slots() {
        let array = Array::from_slots(vec![
            Some(Value::from(1)),
            None,
            Some(Value::Null),
            Some(Value::from("x")),
        ]);
        assert_eq!(array.join("-"), "1---x");
    }
}
