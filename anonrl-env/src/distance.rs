//! Text distances.
use crate::EnvError;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, convert::TryFrom, str::FromStr};

/// Supported text distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceType {
    /// Cosine distance between the bags of characters of two strings.
    Cosine,

    /// Number of positions at which two strings differ.
    Hamming,
}

impl FromStr for DistanceType {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "hamming" => Ok(Self::Hamming),
            _ => Err(EnvError::UnsupportedDistanceType(s.to_string())),
        }
    }
}

impl TryFrom<i64> for DistanceType {
    type Error = EnvError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Cosine),
            1 => Ok(Self::Hamming),
            _ => Err(EnvError::UnsupportedDistanceType(code.to_string())),
        }
    }
}

/// Computes distances between strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDistanceCalculator {
    distance_type: DistanceType,
}

fn char_counts(s: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

impl TextDistanceCalculator {
    /// Constructs a calculator of the given type.
    pub fn new(distance_type: DistanceType) -> Self {
        Self { distance_type }
    }

    /// Type of the distance.
    pub fn distance_type(&self) -> DistanceType {
        self.distance_type
    }

    /// Distance between two strings.
    ///
    /// Cosine distances lie in `[0, 1]`; Hamming distances count characters.
    pub fn calculate(&self, txt1: &str, txt2: &str) -> f64 {
        match self.distance_type {
            DistanceType::Cosine => Self::cosine(txt1, txt2),
            DistanceType::Hamming => Self::hamming(txt1, txt2) as f64,
        }
    }

    /// Distance between two strings scaled to `[0, 1]`.
    pub fn normalized(&self, txt1: &str, txt2: &str) -> f64 {
        match self.distance_type {
            DistanceType::Cosine => Self::cosine(txt1, txt2),
            DistanceType::Hamming => {
                let len = txt1.chars().count().max(txt2.chars().count());
                match len {
                    0 => 0.0,
                    len => Self::hamming(txt1, txt2) as f64 / len as f64,
                }
            }
        }
    }

    fn cosine(txt1: &str, txt2: &str) -> f64 {
        let (n1, n2) = (txt1.chars().count(), txt2.chars().count());
        match (n1, n2) {
            (0, 0) => return 0.0,
            (0, _) | (_, 0) => return 1.0,
            _ => {}
        }
        let (c1, c2) = (char_counts(txt1), char_counts(txt2));
        let common: usize = c1
            .iter()
            .map(|(c, k)| c2.get(c).map_or(0, |l| (*k).min(*l)))
            .sum();
        let similarity = common as f64 / ((n1 * n2) as f64).sqrt();
        (1.0 - similarity).max(0.0)
    }

    fn hamming(txt1: &str, txt2: &str) -> usize {
        let (n1, n2) = (txt1.chars().count(), txt2.chars().count());
        let differing = txt1
            .chars()
            .zip(txt2.chars())
            .filter(|(a, b)| a != b)
            .count();
        differing + n1.max(n2) - n1.min(n2)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_distance_type() {
        assert_eq!("COSINE".parse::<DistanceType>(), Ok(DistanceType::Cosine));
        assert_eq!(DistanceType::try_from(1), Ok(DistanceType::Hamming));
        assert_eq!(
            DistanceType::try_from(2),
            Err(EnvError::UnsupportedDistanceType("2".to_string()))
        );
        assert!("jaccard".parse::<DistanceType>().is_err());
    }

    #[test]
    fn test_cosine() {
        let calc = TextDistanceCalculator::new(DistanceType::Cosine);
        assert_eq!(calc.calculate("White", "White"), 0.0);
        assert_eq!(calc.calculate("", ""), 0.0);
        assert_eq!(calc.calculate("abc", ""), 1.0);
        assert_eq!(calc.calculate("ab", "cd"), 1.0);
        // Two of four characters in common out of sqrt(4 * 4).
        assert!((calc.calculate("abcd", "abxy") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_hamming() {
        let calc = TextDistanceCalculator::new(DistanceType::Hamming);
        assert_eq!(calc.calculate("karolin", "kathrin"), 3.0);
        assert_eq!(calc.calculate("F", "*"), 1.0);
        assert_eq!(calc.calculate("abc", "a"), 2.0);
        assert!((calc.normalized("abcd", "abxy") - 0.5).abs() < 1e-12);
        assert_eq!(calc.normalized("", ""), 0.0);
    }
}
