use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

use super::structs::{BOTTOM_FLOOR, TOP_FLOOR};

/**
 * Set of floors in the building, stored as a bitmask.
 *
 * Bit `n` is set when floor `n` is a member. Floors outside
 * `BOTTOM_FLOOR..=TOP_FLOOR` are never stored: inserting one is ignored and
 * querying one reports absence.
 */
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FloorSet(u8);

impl FloorSet {
    pub const fn new() -> FloorSet {
        FloorSet(0)
    }

    fn bit(floor: u8) -> Option<u8> {
        if (BOTTOM_FLOOR..=TOP_FLOOR).contains(&floor) {
            Some(1 << floor)
        } else {
            None
        }
    }

    pub fn contains(&self, floor: u8) -> bool {
        Self::bit(floor).map_or(false, |bit| self.0 & bit != 0)
    }

    /// Returns true if the floor was not already present.
    pub fn insert(&mut self, floor: u8) -> bool {
        match Self::bit(floor) {
            Some(bit) => {
                let added = self.0 & bit == 0;
                self.0 |= bit;
                added
            }
            None => false,
        }
    }

    /// Returns true if the floor was present.
    pub fn remove(&mut self, floor: u8) -> bool {
        match Self::bit(floor) {
            Some(bit) => {
                let present = self.0 & bit != 0;
                self.0 &= !bit;
                present
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, floor: u8) {
        if let Some(bit) = Self::bit(floor) {
            self.0 ^= bit;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(&self, other: FloorSet) -> FloorSet {
        FloorSet(self.0 | other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (BOTTOM_FLOOR..=TOP_FLOOR).filter(move |floor| self.contains(*floor))
    }

    /// Smallest member strictly above `floor`.
    pub fn min_above(&self, floor: u8) -> Option<u8> {
        self.iter().find(|f| *f > floor)
    }

    /// Largest member strictly below `floor`.
    pub fn max_below(&self, floor: u8) -> Option<u8> {
        self.iter().filter(|f| *f < floor).last()
    }

    /// Largest member strictly above `floor`.
    pub fn max_above(&self, floor: u8) -> Option<u8> {
        self.iter().filter(|f| *f > floor).last()
    }

    /// Smallest member strictly below `floor`.
    pub fn min_below(&self, floor: u8) -> Option<u8> {
        self.iter().find(|f| *f < floor)
    }

    pub fn any_above(&self, floor: u8) -> bool {
        self.min_above(floor).is_some()
    }

    pub fn any_below(&self, floor: u8) -> bool {
        self.max_below(floor).is_some()
    }

    /// Member closest to `floor`; on equal distance the lower floor wins.
    pub fn nearest_to(&self, floor: u8) -> Option<u8> {
        self.iter().min_by_key(|f| (*f as i16 - floor as i16).abs())
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl FromIterator<u8> for FloorSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = FloorSet::new();
        for floor in iter {
            set.insert(floor);
        }
        set
    }
}

impl fmt::Debug for FloorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for FloorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for floor in self.iter() {
            seq.serialize_element(&floor)?;
        }
        seq.end()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
