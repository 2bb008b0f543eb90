//! Wind direction decoding
//!
//! The weather feed describes wind direction in free text ("北风",
//! "从西北偏西方向吹来的风", "Northeast"). The model consumes it as two signed
//! axis components, one for east-west and one for north-south.

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Wind direction decomposed onto the compass axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionVector {
    /// East = +1, West = -1
    pub east_west: i32,
    /// North = +1, South = -1
    pub north_south: i32,
}

impl DirectionVector {
    pub const NORTH: Self = Self::new(0, 1);
    pub const SOUTH: Self = Self::new(0, -1);
    pub const EAST: Self = Self::new(1, 0);
    pub const WEST: Self = Self::new(-1, 0);

    pub const fn new(east_west: i32, north_south: i32) -> Self {
        Self {
            east_west,
            north_south,
        }
    }
}

impl Add for DirectionVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.east_west + rhs.east_west,
            self.north_south + rhs.north_south,
        )
    }
}

/// Recognised terms, matched against lowercased text
const TERMS: &[(&str, DirectionVector)] = &[
    ("北", DirectionVector::NORTH),
    ("南", DirectionVector::SOUTH),
    ("东", DirectionVector::EAST),
    ("西", DirectionVector::WEST),
    ("north", DirectionVector::NORTH),
    ("south", DirectionVector::SOUTH),
    ("east", DirectionVector::EAST),
    ("west", DirectionVector::WEST),
];

/// Turns direction text into a [`DirectionVector`]
///
/// Decoding is total: unknown or missing text decodes to the zero vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionDecoder {
    max_terms: Option<usize>,
}

impl DirectionDecoder {
    /// Every recognised term contributes
    pub fn new() -> Self {
        Self { max_terms: None }
    }

    /// Only the first `max_terms` recognised terms contribute
    pub fn with_term_limit(max_terms: usize) -> Self {
        Self {
            max_terms: Some(max_terms),
        }
    }

    pub fn from_limit(max_terms: Option<usize>) -> Self {
        Self { max_terms }
    }

    pub fn decode(&self, text: Option<&str>) -> DirectionVector {
        let Some(text) = text else {
            return DirectionVector::default();
        };

        let lowered = text.to_lowercase();
        scan_terms(&lowered)
            .into_iter()
            .take(self.max_terms.unwrap_or(usize::MAX))
            .fold(DirectionVector::default(), |acc, vector| acc + vector)
    }
}

/// Left-to-right scan, each match consumes its bytes
fn scan_terms(text: &str) -> Vec<DirectionVector> {
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        match TERMS.iter().find(|(term, _)| rest.starts_with(term)) {
            Some((term, vector)) => {
                found.push(*vector);
                rest = &rest[term.len()..];
            }
            None => rest = &rest[ch.len_utf8()..],
        }
    }

    found
}
