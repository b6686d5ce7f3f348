//! Column-level anonymization actions.
use crate::{ColumnData, ColumnType, Dataset, EnvError, SerialHierarchy};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Kind of an [`Action`], without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Leaves the column unchanged.
    Identity,

    /// Masks values through a lookup table.
    Suppress,

    /// Moves values one level up their generalization hierarchy.
    Generalize,

    /// Applies a numeric transformation.
    Transform,
}

/// Parameters of a suppression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suppress {
    /// Replacement of each value. Values without an entry are kept.
    pub table: BTreeMap<String, String>,

    applied: bool,
}

/// Parameters and progress of a generalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generalize {
    /// Hierarchy of each raw value.
    pub table: BTreeMap<String, SerialHierarchy>,

    level: usize,

    // Set once every value of the column carries its top label.
    #[serde(default)]
    exhausted: bool,
}

impl Generalize {
    /// Number of levels applied so far.
    pub fn level(&self) -> usize {
        self.level
    }

    fn depth(&self) -> usize {
        self.table.values().map(|h| h.len()).max().unwrap_or(0)
    }

    // Label a raw value carries after `level` applications.
    fn label_at<'a>(raw: &'a str, h: &'a SerialHierarchy, level: usize) -> &'a str {
        match level {
            0 => raw,
            l => h.get(l - 1).or_else(|| h.top()).unwrap_or(raw),
        }
    }

    // Maps every label reachable at the current level to its next label.
    // When two raw values share a label, the first raw value wins.
    fn next_labels(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for (raw, h) in self.table.iter() {
            let current = Self::label_at(raw, h, self.level);
            let next = Self::label_at(raw, h, self.level + 1);
            map.entry(current.to_string())
                .or_insert_with(|| next.to_string());
        }
        map
    }

    // A value is at the top when it has no coarser label to move to,
    // including values without a hierarchy.
    fn is_top_for(&self, values: &[String]) -> bool {
        let next = self.next_labels();
        values
            .iter()
            .all(|v| next.get(v.as_str()).map_or(true, |n| n == v))
    }
}

/// Numeric transformation methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformMethod {
    /// Rounds values down to a multiple of a width which doubles on every
    /// application.
    Coarsen {
        /// Width of the first application.
        width: f64,

        /// Width beyond which the transformation is exhausted.
        max_width: Option<f64>,
    },

    /// Multiplies values by a factor.
    Scale {
        /// Multiplier.
        factor: f64,
    },
}

/// Parameters and progress of a numeric transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The transformation.
    pub method: TransformMethod,

    /// Number of applications after which the transformation is exhausted.
    pub max_applications: usize,

    n_applied: usize,
}

impl Transform {
    /// Number of applications so far.
    pub fn n_applied(&self) -> usize {
        self.n_applied
    }

    fn current_width(&self) -> Option<f64> {
        match self.method {
            TransformMethod::Coarsen { width, .. } => Some(width * 2f64.powi(self.n_applied as i32)),
            TransformMethod::Scale { .. } => None,
        }
    }

    fn is_exhausted(&self) -> bool {
        if self.n_applied >= self.max_applications {
            return true;
        }
        match (&self.method, self.current_width()) {
            (TransformMethod::Coarsen { max_width: Some(m), .. }, Some(w)) => w > *m,
            _ => false,
        }
    }

    fn map(&self, v: f64) -> f64 {
        match (&self.method, self.current_width()) {
            (TransformMethod::Coarsen { .. }, Some(w)) if w > 0.0 => (v / w).floor() * w,
            (TransformMethod::Scale { factor }, _) => v * factor,
            _ => v,
        }
    }
}

/// Kind of an [`Action`] together with its parameters and progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    /// See [`ActionType::Identity`].
    Identity,

    /// See [`ActionType::Suppress`].
    Suppress(Suppress),

    /// See [`ActionType::Generalize`].
    Generalize(Generalize),

    /// See [`ActionType::Transform`].
    Transform(Transform),
}

/// A discrete action operating on a single dataset column.
///
/// The index of an action is its position in the [`ActionSpace`](crate::ActionSpace)
/// it was added to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    idx: usize,
    column_name: String,
    kind: ActionKind,
}

impl Action {
    fn new(column_name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            idx: 0,
            column_name: column_name.into(),
            kind,
        }
    }

    /// Action leaving the column unchanged. It is never exhausted.
    pub fn identity(column_name: impl Into<String>) -> Self {
        Self::new(column_name, ActionKind::Identity)
    }

    /// Suppression of a text column through a lookup table.
    pub fn suppress(column_name: impl Into<String>, table: BTreeMap<String, String>) -> Self {
        Self::new(
            column_name,
            ActionKind::Suppress(Suppress {
                table,
                applied: false,
            }),
        )
    }

    /// Generalization of a text column, one hierarchy level per application.
    pub fn generalize(
        column_name: impl Into<String>,
        table: BTreeMap<String, SerialHierarchy>,
    ) -> Self {
        Self::new(
            column_name,
            ActionKind::Generalize(Generalize {
                table,
                level: 0,
                exhausted: false,
            }),
        )
    }

    /// Numeric transformation of an integer or real column.
    pub fn transform(
        column_name: impl Into<String>,
        method: TransformMethod,
        max_applications: usize,
    ) -> Self {
        Self::new(
            column_name,
            ActionKind::Transform(Transform {
                method,
                max_applications,
                n_applied: 0,
            }),
        )
    }

    /// Position of the action in its action space.
    pub fn idx(&self) -> usize {
        self.idx
    }

    pub(crate) fn set_idx(&mut self, idx: usize) {
        self.idx = idx;
    }

    /// Name of the target column.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Kind and parameters.
    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Kind without parameters.
    pub fn action_type(&self) -> ActionType {
        match self.kind {
            ActionKind::Identity => ActionType::Identity,
            ActionKind::Suppress(_) => ActionType::Suppress,
            ActionKind::Generalize(_) => ActionType::Generalize,
            ActionKind::Transform(_) => ActionType::Transform,
        }
    }

    /// Returns `true` if no further transformation is available.
    pub fn is_exhausted(&self) -> bool {
        match &self.kind {
            ActionKind::Identity => false,
            ActionKind::Suppress(s) => s.applied,
            ActionKind::Generalize(g) => g.exhausted || g.level >= g.depth(),
            ActionKind::Transform(t) => t.is_exhausted(),
        }
    }

    /// Forgets the applications so far.
    pub fn reinitialize(&mut self) {
        match &mut self.kind {
            ActionKind::Identity => {}
            ActionKind::Suppress(s) => s.applied = false,
            ActionKind::Generalize(g) => {
                g.level = 0;
                g.exhausted = false;
            }
            ActionKind::Transform(t) => t.n_applied = 0,
        }
    }

    fn type_error(&self, expected: &str, found: ColumnType) -> EnvError {
        EnvError::ColumnType {
            column: self.column_name.clone(),
            expected: expected.to_string(),
            found,
        }
    }

    /// Mutates the target column of `ds`.
    ///
    /// Fails with [`EnvError::InvalidAction`] if the action is exhausted or
    /// the dataset has no such column, and with [`EnvError::ColumnType`] if
    /// the kind of the action does not support the type of the column.
    /// The dataset is left untouched on failure.
    pub fn apply(&mut self, ds: &mut Dataset) -> Result<(), EnvError> {
        if self.is_exhausted() {
            return Err(EnvError::InvalidAction(format!(
                "action {} on column {} is exhausted",
                self.idx, self.column_name
            )));
        }
        let column = match ds.column_mut(&self.column_name) {
            Some(column) => column,
            None => {
                return Err(EnvError::InvalidAction(format!(
                    "column {} is not in the dataset",
                    self.column_name
                )))
            }
        };
        let found = column.column_type();

        let applied: Result<(), &str> = match (&mut self.kind, column) {
            (ActionKind::Identity, _) => Ok(()),
            (ActionKind::Suppress(s), ColumnData::Text(values)) => {
                for v in values.iter_mut() {
                    if let Some(masked) = s.table.get(v.as_str()) {
                        *v = masked.clone();
                    }
                }
                s.applied = true;
                Ok(())
            }
            (ActionKind::Generalize(g), ColumnData::Text(values)) => {
                let next = g.next_labels();
                for v in values.iter_mut() {
                    if let Some(label) = next.get(v.as_str()) {
                        *v = label.clone();
                    }
                }
                g.level += 1;
                g.exhausted = g.is_top_for(values.as_slice());
                Ok(())
            }
            (ActionKind::Transform(t), ColumnData::Integer(values)) => {
                for v in values.iter_mut() {
                    *v = t.map(*v as f64).round() as i64;
                }
                t.n_applied += 1;
                Ok(())
            }
            (ActionKind::Transform(t), ColumnData::Real(values)) => {
                for v in values.iter_mut() {
                    *v = t.map(*v);
                }
                t.n_applied += 1;
                Ok(())
            }
            (ActionKind::Transform(_), _) => Err("Integer or Real"),
            (_, _) => Err("Text"),
        };
        if let Err(expected) = applied {
            return Err(self.type_error(expected, found));
        }

        trace!(
            "Applied {:?} action {} on column {}",
            self.action_type(),
            self.idx,
            self.column_name
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ActionSpace;

    fn dataset() -> Dataset {
        Dataset::new()
            .with_column(
                "gender",
                ColumnData::Text(vec!["F".into(), "M".into(), "F".into()]),
            )
            .unwrap()
            .with_column("salary", ColumnData::Integer(vec![1050, 2230, 3999]))
            .unwrap()
    }

    #[test]
    fn test_suppress_exhausts_after_first_application() {
        let mut ds = dataset();
        let table = [("F", "*"), ("M", "*")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut action = Action::suppress("gender", table);
        assert!(!action.is_exhausted());
        action.apply(&mut ds).unwrap();
        assert_eq!(ds.get_column_unique_values("gender").unwrap(), vec!["*"]);
        assert!(action.is_exhausted());
        assert!(matches!(
            action.apply(&mut ds),
            Err(EnvError::InvalidAction(_))
        ));
        action.reinitialize();
        assert!(!action.is_exhausted());
    }

    #[test]
    fn test_generalize_walks_hierarchy() {
        let mut ds = Dataset::new()
            .with_column(
                "city",
                ColumnData::Text(vec!["Leeds".into(), "York".into(), "Paris".into()]),
            )
            .unwrap();
        let table: BTreeMap<String, SerialHierarchy> = [
            ("Leeds", vec!["England", "Europe"]),
            ("York", vec!["England", "Europe"]),
            ("Paris", vec!["France", "Europe"]),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), SerialHierarchy::from(v.clone())))
        .collect();
        let mut action = Action::generalize("city", table);

        action.apply(&mut ds).unwrap();
        assert_eq!(
            ds.get_column_unique_values("city").unwrap(),
            vec!["England", "France"]
        );
        assert!(!action.is_exhausted());

        action.apply(&mut ds).unwrap();
        assert_eq!(ds.get_column_unique_values("city").unwrap(), vec!["Europe"]);
        assert!(action.is_exhausted());
    }

    #[test]
    fn test_generalize_exhausts_on_column_values() {
        let mut ds = Dataset::new()
            .with_column(
                "city",
                ColumnData::Text(vec!["Leeds".into(), "York".into()]),
            )
            .unwrap();
        let table: BTreeMap<String, SerialHierarchy> = [
            ("Leeds", vec!["England"]),
            ("York", vec!["England"]),
            ("Paris", vec!["France", "Europe", "World"]),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), SerialHierarchy::from(v.clone())))
        .collect();
        let mut space = ActionSpace::new(1);
        space.add(Action::generalize("city", table)).unwrap();

        space.get_mut(0).unwrap().apply(&mut ds).unwrap();
        assert_eq!(ds.get_column_unique_values("city").unwrap(), vec!["England"]);
        // Paris is deeper but absent from the column.
        assert!(space.get(0).unwrap().is_exhausted());
        assert!(space.is_exhausted());
        assert!(matches!(
            space.get_mut(0).unwrap().apply(&mut ds),
            Err(EnvError::InvalidAction(_))
        ));

        space.reset();
        assert!(!space.is_exhausted());
    }

    #[test]
    fn test_transform_coarsen() {
        let mut ds = dataset();
        let method = TransformMethod::Coarsen {
            width: 1000.0,
            max_width: Some(2000.0),
        };
        let mut action = Action::transform("salary", method, 5);
        action.apply(&mut ds).unwrap();
        assert_eq!(
            ds.column("salary"),
            Some(&ColumnData::Integer(vec![1000, 2000, 3000]))
        );
        action.apply(&mut ds).unwrap();
        assert_eq!(
            ds.column("salary"),
            Some(&ColumnData::Integer(vec![0, 2000, 2000]))
        );
        // The next width would be 4000.
        assert!(action.is_exhausted());
    }

    #[test]
    fn test_type_and_column_errors() {
        let mut ds = dataset();
        let mut action = Action::transform("gender", TransformMethod::Scale { factor: 2.0 }, 1);
        assert!(matches!(
            action.apply(&mut ds),
            Err(EnvError::ColumnType { found: ColumnType::Text, .. })
        ));

        let mut action = Action::identity("dob");
        assert!(matches!(
            action.apply(&mut ds),
            Err(EnvError::InvalidAction(_))
        ));

        let mut action = Action::identity("gender");
        action.apply(&mut ds).unwrap();
        assert!(!action.is_exhausted());
        assert_eq!(ds, dataset());
    }
}
