//! Discrete action space.
use crate::{Action, EnvError};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::ops::Index;

/// Ordered set of at most `n` [`Action`]s with an owned random source.
///
/// The index of every action equals its position in the space.
pub struct ActionSpace {
    n: usize,
    actions: Vec<Action>,
    rng: StdRng,
}

impl ActionSpace {
    /// Constructs an empty action space of capacity `n`, seeded with `0`.
    pub fn new(n: usize) -> Self {
        Self::with_seed(n, 0)
    }

    /// Constructs an empty action space of capacity `n` with the given seed.
    pub fn with_seed(n: usize, seed: u64) -> Self {
        Self {
            n,
            actions: Vec::with_capacity(n),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reseeds the random source.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Capacity.
    pub fn capacity(&self) -> usize {
        self.n
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the space has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Appends an action and assigns its index.
    pub fn add(&mut self, mut action: Action) -> Result<(), EnvError> {
        if self.actions.len() >= self.n {
            return Err(EnvError::CapacityExceeded { capacity: self.n });
        }
        action.set_idx(self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    /// Appends several actions.
    ///
    /// Either all actions are added or, if they do not fit, none is.
    pub fn add_many(&mut self, actions: impl IntoIterator<Item = Action>) -> Result<(), EnvError> {
        let actions: Vec<Action> = actions.into_iter().collect();
        if self.actions.len() + actions.len() > self.n {
            return Err(EnvError::CapacityExceeded { capacity: self.n });
        }
        for action in actions {
            self.add(action)?;
        }
        Ok(())
    }

    /// Samples an action uniformly. The action may be exhausted.
    ///
    /// Fails with [`EnvError::NotFound`] if the space is empty.
    pub fn sample_and_get(&mut self) -> Result<&Action, EnvError> {
        if self.actions.is_empty() {
            return Err(EnvError::NotFound("Action in an empty action space".to_string()));
        }
        let ix = self.rng.gen_range(0..self.actions.len());
        Ok(&self.actions[ix])
    }

    /// Actions which are not exhausted, in index order.
    pub fn get_non_exhausted_actions(&self) -> Vec<&Action> {
        self.actions.iter().filter(|a| !a.is_exhausted()).collect()
    }

    /// Samples uniformly among the actions which are not exhausted.
    ///
    /// Fails with [`EnvError::ActionSpaceExhausted`] if there is none.
    pub fn sample_and_get_non_exhausted(&mut self) -> Result<&Action, EnvError> {
        let candidates: Vec<usize> = self
            .actions
            .iter()
            .filter(|a| !a.is_exhausted())
            .map(|a| a.idx())
            .collect();
        let ix = candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(EnvError::ActionSpaceExhausted)?;
        Ok(&self.actions[ix])
    }

    /// Returns `true` if every action is exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.actions.iter().all(|a| a.is_exhausted())
    }

    /// Reinitializes every action.
    pub fn reset(&mut self) {
        self.actions.iter_mut().for_each(|a| a.reinitialize());
    }

    /// Shuffles the actions and reassigns their indices to the new positions.
    pub fn shuffle(&mut self) {
        self.actions.shuffle(&mut self.rng);
        for (i, a) in self.actions.iter_mut().enumerate() {
            a.set_idx(i);
        }
    }

    /// First action targeting the given column.
    pub fn get_action_by_column_name(&self, column_name: &str) -> Result<&Action, EnvError> {
        self.actions
            .iter()
            .find(|a| a.column_name() == column_name)
            .ok_or_else(|| EnvError::NotFound(format!("Action for column {}", column_name)))
    }

    /// Action with the given index.
    pub fn get(&self, idx: usize) -> Option<&Action> {
        self.actions.get(idx)
    }

    /// Mutable action with the given index.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Action> {
        self.actions.get_mut(idx)
    }

    /// Iterator over the actions in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }
}

impl Index<usize> for ActionSpace {
    type Output = Action;

    fn index(&self, idx: usize) -> &Action {
        &self.actions[idx]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ColumnData, Dataset};
    use std::collections::BTreeMap;

    fn suppress(column: &str) -> Action {
        let table: BTreeMap<String, String> = [("F", "*"), ("M", "*")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Action::suppress(column, table)
    }

    #[test]
    fn test_capacity_and_indices() {
        let mut space = ActionSpace::new(2);
        space.add(Action::identity("gender")).unwrap();
        space.add(suppress("gender")).unwrap();
        assert_eq!(
            space.add(Action::identity("salary")),
            Err(EnvError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(space.len(), 2);
        for (i, a) in space.iter().enumerate() {
            assert_eq!(a.idx(), i);
        }
    }

    #[test]
    fn test_add_many_is_atomic() {
        let mut space = ActionSpace::new(2);
        space.add(Action::identity("gender")).unwrap();
        let result = space.add_many(vec![suppress("gender"), Action::identity("salary")]);
        assert!(result.is_err());
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn test_exhaustion_and_reset() {
        let mut ds = Dataset::new()
            .with_column("gender", ColumnData::Text(vec!["F".into(), "M".into()]))
            .unwrap();
        let mut space = ActionSpace::with_seed(2, 42);
        space.add_many(vec![suppress("gender")]).unwrap();
        assert!(!space.is_exhausted());

        space.get_mut(0).unwrap().apply(&mut ds).unwrap();
        assert!(space.is_exhausted());
        assert!(space.get_non_exhausted_actions().is_empty());
        assert!(matches!(
            space.sample_and_get_non_exhausted(),
            Err(EnvError::ActionSpaceExhausted)
        ));
        // An exhausted action can still be drawn.
        assert_eq!(space.sample_and_get().unwrap().idx(), 0);

        space.reset();
        assert!(!space.is_exhausted());
        assert_eq!(space.sample_and_get_non_exhausted().unwrap().idx(), 0);
    }

    #[test]
    fn test_shuffle_reassigns_indices() {
        let mut space = ActionSpace::with_seed(10, 7);
        let columns = ["a", "b", "c", "d", "e", "f"];
        space
            .add_many(columns.iter().map(|c| Action::identity(*c)))
            .unwrap();
        space.shuffle();
        let mut names: Vec<&str> = space.iter().map(|a| a.column_name()).collect();
        for (i, a) in space.iter().enumerate() {
            assert_eq!(a.idx(), i);
        }
        names.sort_unstable();
        assert_eq!(names, columns);
    }

    #[test]
    fn test_lookup_by_column_name() {
        let mut space = ActionSpace::new(3);
        space
            .add_many(vec![
                Action::identity("salary"),
                suppress("gender"),
                Action::identity("gender"),
            ])
            .unwrap();
        assert_eq!(space.get_action_by_column_name("gender").unwrap().idx(), 1);
        assert!(matches!(
            space.get_action_by_column_name("dob"),
            Err(EnvError::NotFound(_))
        ));
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let build = || {
            let mut space = ActionSpace::with_seed(5, 3);
            space
                .add_many(["a", "b", "c", "d", "e"].iter().map(|c| Action::identity(*c)))
                .unwrap();
            space
        };
        let (mut s1, mut s2) = (build(), build());
        for _ in 0..20 {
            assert_eq!(
                s1.sample_and_get().unwrap().idx(),
                s2.sample_and_get().unwrap().idx()
            );
        }
    }
}
