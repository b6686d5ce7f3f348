//! Tile coding with an index hash table.
//!
//! Each of `num_tilings` grids is offset from the previous one by an
//! asymmetric displacement; a point activates exactly one tile per grid.
//! Tiles are identified by their integer coordinates, which the [`Iht`] maps to
//! dense indices in `[0, size)`.
use log::warn;
use std::collections::HashMap;
use xxhash_rust::xxh3::xxh3_64;

/// Index hash table.
///
/// Assigns consecutive indices to coordinates in order of first appearance.
/// Once `size` coordinates are stored, new coordinates are hashed into
/// `[0, size)` and may collide with stored ones.
#[derive(Debug, Clone)]
pub struct Iht {
    size: usize,
    overfull_count: usize,
    dictionary: HashMap<Vec<i64>, usize>,
}

impl Iht {
    /// Constructs an empty table of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            overfull_count: 0,
            dictionary: HashMap::new(),
        }
    }

    /// Size of the table.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored coordinates.
    pub fn count(&self) -> usize {
        self.dictionary.len()
    }

    /// Returns `true` if no more coordinates can be stored.
    pub fn is_full(&self) -> bool {
        self.dictionary.len() >= self.size
    }

    /// Number of lookups that fell back to hashing.
    pub fn overfull_count(&self) -> usize {
        self.overfull_count
    }

    /// Index of the given coordinates, stored on first appearance.
    pub fn get_index(&mut self, coords: &[i64]) -> usize {
        if let Some(ix) = self.dictionary.get(coords) {
            return *ix;
        }
        if self.is_full() {
            if self.overfull_count == 0 {
                warn!("IHT full, starting to allow collisions");
            }
            self.overfull_count += 1;
            return Self::hash(coords) % self.size.max(1);
        }
        let ix = self.dictionary.len();
        self.dictionary.insert(coords.to_vec(), ix);
        ix
    }

    /// Stored coordinates and their indices, ordered by index.
    pub fn entries(&self) -> Vec<(Vec<i64>, usize)> {
        let mut entries: Vec<_> = self
            .dictionary
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by_key(|(_, v)| *v);
        entries
    }

    /// Restores a table from the output of [`Iht::entries`].
    pub fn from_entries(size: usize, entries: Vec<(Vec<i64>, usize)>) -> Self {
        Self {
            size,
            overfull_count: 0,
            dictionary: entries.into_iter().collect(),
        }
    }

    /// Index of the given coordinates if they are stored.
    pub fn get_index_readonly(&self, coords: &[i64]) -> Option<usize> {
        self.dictionary.get(coords).copied()
    }

    fn hash(coords: &[i64]) -> usize {
        let bytes: Vec<u8> = coords.iter().flat_map(|c| c.to_le_bytes()).collect();
        xxh3_64(&bytes) as usize
    }
}

/// Indices of the tiles activated by `floats` and `ints`, one per tiling.
///
/// `floats` should be scaled so that one unit is the width of a tile.
/// `ints` are appended to the coordinates of every tile unchanged, e.g.,
/// to code an action.
pub fn tiles(iht: &mut Iht, num_tilings: usize, floats: &[f64], ints: &[i64]) -> Vec<usize> {
    let n = num_tilings as i64;
    let qfloats: Vec<i64> = floats.iter().map(|f| (f * n as f64).floor() as i64).collect();
    let mut result = Vec::with_capacity(num_tilings);
    let mut coords = Vec::with_capacity(1 + floats.len() + ints.len());

    for tiling in 0..n {
        coords.clear();
        coords.push(tiling);
        let mut b = tiling;
        for q in qfloats.iter() {
            coords.push((q + b).div_euclid(n));
            b += tiling * 2;
        }
        coords.extend_from_slice(ints);
        result.push(iht.get_index(&coords));
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tiles_are_dense_and_deterministic() {
        let mut iht = Iht::new(64);
        let t1 = tiles(&mut iht, 4, &[0.1, 0.2], &[0]);
        assert_eq!(t1, vec![0, 1, 2, 3]);
        let t2 = tiles(&mut iht, 4, &[0.1, 0.2], &[0]);
        assert_eq!(t1, t2);
        assert_eq!(iht.count(), 4);
    }

    #[test]
    fn test_nearby_points_share_tiles() {
        let mut iht = Iht::new(1024);
        let a = tiles(&mut iht, 8, &[1.0, 1.0], &[]);
        let b = tiles(&mut iht, 8, &[1.3, 1.0], &[]);
        let c = tiles(&mut iht, 8, &[5.0, 5.0], &[]);
        let shared = |x: &[usize], y: &[usize]| x.iter().zip(y).filter(|(p, q)| p == q).count();
        assert!(shared(&a, &b) > 0);
        assert!(shared(&a, &b) < 8);
        assert_eq!(shared(&a, &c), 0);
    }

    #[test]
    fn test_actions_do_not_share_tiles() {
        let mut iht = Iht::new(1024);
        let a = tiles(&mut iht, 4, &[0.5], &[0]);
        let b = tiles(&mut iht, 4, &[0.5], &[1]);
        assert!(a.iter().all(|t| !b.contains(t)));
    }

    #[test]
    fn test_overfull_table_hashes() {
        let mut iht = Iht::new(2);
        let t = tiles(&mut iht, 4, &[0.0], &[]);
        assert!(iht.is_full());
        assert_eq!(iht.overfull_count(), 2);
        assert!(t.iter().all(|ix| *ix < 2));
        assert_eq!(t, tiles(&mut iht, 4, &[0.0], &[]));
        assert_eq!(iht.get_index_readonly(&[0, 0]), Some(0));
        assert_eq!(iht.get_index_readonly(&[9, 9]), None);
    }

    #[test]
    fn test_entries_restore_table() {
        let mut iht = Iht::new(64);
        let t = tiles(&mut iht, 4, &[0.3, 1.7], &[2]);
        let mut restored = Iht::from_entries(64, iht.entries());
        assert_eq!(restored.count(), 4);
        assert_eq!(tiles(&mut restored, 4, &[0.3, 1.7], &[2]), t);
    }
}
