//! In-memory tabular dataset.
use crate::EnvError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, convert::TryFrom};

/// Type of the values in a [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Categorical or free text values.
    Text,

    /// Integer values.
    Integer,

    /// Floating-point values.
    Real,
}

/// Values of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    /// Text values.
    Text(Vec<String>),

    /// Integer values.
    Integer(Vec<i64>),

    /// Floating-point values.
    Real(Vec<f64>),
}

impl ColumnData {
    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Real(v) => v.len(),
        }
    }

    /// Returns `true` if the column has no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type of the values.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Text(_) => ColumnType::Text,
            Self::Integer(_) => ColumnType::Integer,
            Self::Real(_) => ColumnType::Real,
        }
    }

    /// The `i`-th value formatted as a string.
    pub fn value_as_string(&self, i: usize) -> Option<String> {
        match self {
            Self::Text(v) => v.get(i).cloned(),
            Self::Integer(v) => v.get(i).map(|x| x.to_string()),
            Self::Real(v) => v.get(i).map(|x| x.to_string()),
        }
    }

    /// Numeric values as `f64`, or `None` for a text column.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Self::Text(_) => None,
            Self::Integer(v) => Some(v.iter().map(|x| *x as f64).collect()),
            Self::Real(v) => Some(v.clone()),
        }
    }

    /// Distinct values formatted as strings, sorted.
    pub fn unique_values(&self) -> Vec<String> {
        let values: BTreeSet<String> = (0..self.len())
            .filter_map(|i| self.value_as_string(i))
            .collect();
        values.into_iter().collect()
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values of the column.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }
}

/// A table with named, typed columns of equal length.
///
/// The dataset is built in memory; reading it from a file is left to the
/// application. Deserialized columns go through [`Dataset::add_column`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr")]
pub struct Dataset {
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct DatasetRepr {
    columns: Vec<Column>,
}

impl TryFrom<DatasetRepr> for Dataset {
    type Error = EnvError;

    fn try_from(repr: DatasetRepr) -> Result<Self, Self::Error> {
        let mut ds = Dataset::new();
        for Column { name, data } in repr.columns {
            ds.add_column(name, data)?;
        }
        Ok(ds)
    }
}

impl Dataset {
    /// Constructs an empty dataset.
    pub fn new() -> Self {
        Self { columns: vec![] }
    }

    // Columns must have distinct names and the same length.
    pub(crate) fn from_columns_unchecked(columns: Vec<(&str, ColumnData)>) -> Self {
        let columns = columns
            .into_iter()
            .map(|(name, data)| Column {
                name: name.to_string(),
                data,
            })
            .collect();
        Self { columns }
    }

    /// Adds a column, consuming and returning the dataset.
    pub fn with_column(mut self, name: impl Into<String>, data: ColumnData) -> Result<Self, EnvError> {
        self.add_column(name, data)?;
        Ok(self)
    }

    /// Adds a column.
    ///
    /// Fails if a column with the same name exists or if the number of
    /// values differs from the number of rows of the dataset.
    pub fn add_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<(), EnvError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(EnvError::invalid_param(
                "column",
                format!("{} is a duplicate column name", name),
            ));
        }
        if !self.columns.is_empty() && data.len() != self.n_rows() {
            return Err(EnvError::invalid_param(
                "column",
                format!(
                    "{} has {} values, the dataset has {} rows",
                    name,
                    data.len(),
                    self.n_rows()
                ),
            ));
        }
        self.columns.push(Column { name, data });
        Ok(())
    }

    /// Names of the columns, in insertion order.
    pub fn columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Iterator over the columns.
    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the dataset has a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Values of the column with the given name.
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.data)
    }

    /// Mutable values of the column with the given name.
    ///
    /// Callers mutate values in place; the variant of the column, and so its
    /// type, is kept.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnData> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| &mut c.data)
    }

    /// Distinct values of a column, sorted.
    pub fn get_column_unique_values(&self, col_name: &str) -> Result<Vec<String>, EnvError> {
        self.column(col_name)
            .map(|c| c.unique_values())
            .ok_or_else(|| EnvError::NotFound(format!("Column {}", col_name)))
    }

    /// Exports the dataset as a `(n_rows, n_columns)` array.
    ///
    /// Numeric values are copied; a text value is replaced with the position
    /// of the value among the sorted distinct values of its column.
    pub fn to_array(&self) -> Array2<f64> {
        let mut arr = Array2::<f64>::zeros((self.n_rows(), self.n_columns()));
        for (j, column) in self.columns.iter().enumerate() {
            match &column.data {
                ColumnData::Text(values) => {
                    let codes = column.data.unique_values();
                    for (i, v) in values.iter().enumerate() {
                        arr[[i, j]] = codes.binary_search(v).unwrap_or(0) as f64;
                    }
                }
                data => {
                    if let Some(values) = data.as_f64() {
                        for (i, v) in values.into_iter().enumerate() {
                            arr[[i, j]] = v;
                        }
                    }
                }
            }
        }
        arr
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new()
            .with_column(
                "gender",
                ColumnData::Text(vec!["F".into(), "M".into(), "F".into()]),
            )
            .unwrap()
            .with_column("salary", ColumnData::Integer(vec![100, 200, 300]))
            .unwrap()
    }

    #[test]
    fn test_shape_and_unique_values() {
        let ds = dataset();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_columns(), 2);
        assert_eq!(ds.columns(), vec!["gender", "salary"]);
        assert_eq!(ds.get_column_unique_values("gender").unwrap(), vec!["F", "M"]);
        assert!(matches!(
            ds.get_column_unique_values("dob"),
            Err(EnvError::NotFound(_))
        ));
    }

    #[test]
    fn test_add_column_checks_length_and_name() {
        let mut ds = dataset();
        assert!(ds.add_column("age", ColumnData::Integer(vec![1])).is_err());
        assert!(ds
            .add_column("gender", ColumnData::Text(vec!["F".into(); 3]))
            .is_err());
        assert_eq!(ds.n_columns(), 2);
    }

    #[test]
    fn test_deserialize_checks_columns() {
        let ds: Dataset = serde_yaml::from_str(&serde_yaml::to_string(&dataset()).unwrap()).unwrap();
        assert_eq!(ds, dataset());

        let ragged = "
columns:
  - name: a
    data:
      Integer: [1]
  - name: b
    data:
      Integer: [1, 2, 3]
";
        assert!(serde_yaml::from_str::<Dataset>(ragged).is_err());

        let duplicate = "
columns:
  - name: a
    data:
      Integer: [1]
  - name: a
    data:
      Real: [2.0]
";
        assert!(serde_yaml::from_str::<Dataset>(duplicate).is_err());
    }

    #[test]
    fn test_to_array_encodes_text() {
        let arr = dataset().to_array();
        assert_eq!(arr.shape(), &[3, 2]);
        assert_eq!(arr[[1, 0]], 1.0);
        assert_eq!(arr[[2, 1]], 300.0);
    }
}
