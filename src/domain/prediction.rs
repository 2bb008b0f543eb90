use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Three-hour reporting window of the day ahead
///
/// Labels are what downstream dashboards key on and must not change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, IntoStaticStr,
)]
pub enum TimeBucket {
    #[strum(serialize = "5-8点")]
    Dawn,
    #[strum(serialize = "8-11点")]
    Morning,
    #[strum(serialize = "11-14点")]
    Midday,
    #[strum(serialize = "14-17点")]
    Afternoon,
    #[strum(serialize = "17-20点")]
    Evening,
}

impl TimeBucket {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Calibrated generation estimate per time bucket, in bucket order
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    entries: Vec<(TimeBucket, f64)>,
}

impl PredictionResult {
    pub fn new(entries: impl IntoIterator<Item = (TimeBucket, f64)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, bucket: TimeBucket) -> Option<f64> {
        self.entries
            .iter()
            .find(|(b, _)| *b == bucket)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(TimeBucket, f64)> {
        self.entries.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serialized as a JSON object keyed by label; a map type would reorder the keys.
impl Serialize for PredictionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (bucket, value) in &self.entries {
            map.serialize_entry(bucket.label(), value)?;
        }
        map.end()
    }
}

/// Low-severity answer returned instead of a forecast when the request is malformed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRejection {
    pub msg: String,
    pub code: u16,
}

impl InputRejection {
    pub fn not_two_dimensional() -> Self {
        Self {
            msg: "Invalid input: Data should be a 2D list.".to_string(),
            code: 400,
        }
    }
}

/// What a caller gets back for a well-formed or a rejected request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictOutcome {
    Forecast(PredictionResult),
    Rejected(InputRejection),
}

impl PredictOutcome {
    pub fn forecast(&self) -> Option<&PredictionResult> {
        match self {
            Self::Forecast(result) => Some(result),
            Self::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_bucket_labels_in_order() {
        let labels: Vec<&str> = TimeBucket::iter().map(TimeBucket::label).collect();
        assert_eq!(labels, vec!["5-8点", "8-11点", "11-14点", "14-17点", "17-20点"]);
        assert_eq!(TimeBucket::COUNT, 5);
        assert_eq!(TimeBucket::Midday.to_string(), "11-14点");
    }

    #[test]
    fn test_result_serializes_in_bucket_order() {
        let result = PredictionResult::new(TimeBucket::iter().zip([1.0, 2.0, 3.0, 4.0, 5.0]));
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"5-8点":1.0,"8-11点":2.0,"11-14点":3.0,"14-17点":4.0,"17-20点":5.0}"#
        );
        assert_eq!(result.get(TimeBucket::Afternoon), Some(4.0));
        assert!(!result.is_empty());
        assert!(PredictionResult::new([]).is_empty());
    }

    #[test]
    fn test_rejection_shape() {
        let outcome = PredictOutcome::Rejected(InputRejection::not_two_dimensional());
        assert!(outcome.is_rejected());
        assert!(outcome.forecast().is_none());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"msg": "Invalid input: Data should be a 2D list.", "code": 400})
        );
    }
}
