//! Mock subjects dataset and anonymization tables for tests and demos.
use crate::{Action, ColumnData, Dataset, SerialHierarchy};
use std::collections::BTreeMap;

/// Raw ethnicity categories and their coarse bucket.
pub const ETHNICITIES: [(&str, &str); 18] = [
    ("Mixed White/Asian", "Mixed"),
    ("Chinese", "Asian"),
    ("Indian", "Asian"),
    ("Mixed White/Black African", "Mixed"),
    ("Black African", "Black"),
    ("Asian other", "Asian"),
    ("Black other", "Black"),
    ("Mixed White/Black Caribbean", "Mixed"),
    ("Mixed other", "Mixed"),
    ("Arab", "Asian"),
    ("White Irish", "White"),
    ("Not stated", "Not stated"),
    ("White Gypsy/Traveller", "White"),
    ("White British", "White"),
    ("Bangladeshi", "Asian"),
    ("White other", "White"),
    ("Black Caribbean", "Black"),
    ("Pakistani", "Asian"),
];

/// Number of rows of [`mock_subjects`].
pub const N_SUBJECTS: usize = 54;

/// Mock subjects: `gender`, `ethnicity`, `education`, `salary`, `diagnosis`,
/// `preventative_treatment` and `mutation_status`.
///
/// Every ethnicity category appears, so generalizing the column with
/// [`ethnicity_hierarchy`] leaves exactly five values.
pub fn mock_subjects() -> Dataset {
    let rows = 0..N_SUBJECTS;
    let gender = rows
        .clone()
        .map(|i| if i % 3 == 0 { "M" } else { "F" }.to_string())
        .collect();
    let ethnicity = rows
        .clone()
        .map(|i| ETHNICITIES[(i * 7) % ETHNICITIES.len()].0.to_string())
        .collect();
    let education = rows.clone().map(|i| (i % 5) as i64 + 1).collect();
    let salary = rows
        .clone()
        .map(|i| 18_000 + ((i * 7919) % 61) as i64 * 1_150)
        .collect();
    let diagnosis = rows.clone().map(|i| ((i * 5) % 4) as i64).collect();
    let preventative_treatment = rows
        .clone()
        .map(|i| ["Yes", "No", "NA"][(i * 11) % 3].to_string())
        .collect();
    let mutation_status = rows.map(|i| ((i / 2) % 2) as i64).collect();

    Dataset::from_columns_unchecked(vec![
        ("gender", ColumnData::Text(gender)),
        ("ethnicity", ColumnData::Text(ethnicity)),
        ("education", ColumnData::Integer(education)),
        ("salary", ColumnData::Integer(salary)),
        ("diagnosis", ColumnData::Integer(diagnosis)),
        ("preventative_treatment", ColumnData::Text(preventative_treatment)),
        ("mutation_status", ColumnData::Integer(mutation_status)),
    ])
}

/// Hierarchy mapping each raw ethnicity to one of `Mixed`, `Asian`,
/// `Not stated`, `White` and `Black`.
pub fn ethnicity_hierarchy() -> BTreeMap<String, SerialHierarchy> {
    ETHNICITIES
        .iter()
        .map(|(raw, bucket)| (raw.to_string(), SerialHierarchy::from(vec![*bucket])))
        .collect()
}

/// Table masking both genders with `*`.
pub fn gender_suppression_table() -> BTreeMap<String, String> {
    ["F", "M"]
        .iter()
        .map(|g| (g.to_string(), "*".to_string()))
        .collect()
}

/// Suppression of the `gender` column.
pub fn gender_suppression() -> Action {
    Action::suppress("gender", gender_suppression_table())
}

/// Generalization of the `ethnicity` column with [`ethnicity_hierarchy`].
pub fn ethnicity_generalization() -> Action {
    Action::generalize("ethnicity", ethnicity_hierarchy())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_subjects() {
        let ds = mock_subjects();
        assert_eq!(ds.n_rows(), N_SUBJECTS);
        assert_eq!(ds.n_columns(), 7);
        assert_eq!(ds.get_column_unique_values("ethnicity").unwrap().len(), 18);
        assert_eq!(ds.get_column_unique_values("gender").unwrap(), vec!["F", "M"]);
    }
}
