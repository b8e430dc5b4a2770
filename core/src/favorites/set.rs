// Ordered, id-unique collection of favorites

use super::record::FavoriteRecord;

/// Favorites in insertion order, at most one record per id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesSet {
    records: Vec<FavoriteRecord>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from stored records, keeping the first record for each id.
    ///
    /// Returns the set and how many later duplicates were dropped.
    pub fn dedup_from(records: Vec<FavoriteRecord>) -> (Self, usize) {
        let mut set = Self::new();
        let mut dropped = 0;
        for record in records {
            if !set.insert(record) {
                dropped += 1;
            }
        }
        (set, dropped)
    }

    /// Linear scan for the first record with this id
    pub fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: u64) -> Option<&FavoriteRecord> {
        self.position(id).map(|index| &self.records[index])
    }

    /// Append at the end. Returns false, leaving the set untouched, if the id
    /// is already present.
    pub fn insert(&mut self, record: FavoriteRecord) -> bool {
        if self.contains(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Remove exactly one record with this id, preserving the order of the rest
    pub fn remove(&mut self, id: u64) -> Option<FavoriteRecord> {
        self.position(id).map(|index| self.records.remove(index))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.records.iter().map(|record| record.id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FavoriteRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[FavoriteRecord] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<FavoriteRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a FavoritesSet {
    type Item = &'a FavoriteRecord;
    type IntoIter = std::slice::Iter<'a, FavoriteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
