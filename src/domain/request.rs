use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Raw prediction request as posted by the scheduling front end
///
/// `data` is left untyped: shape validation is part of the pipeline and a
/// malformed payload must produce a structured rejection, not a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub data: Value,
    pub id: i64,
}

impl ForecastRequest {
    /// Day of readings recorded for site 6 on 2024-02-24
    pub fn reference_sample() -> Self {
        Self {
            data: json!([
                [4.7, 93.0, 3.0, 6.0, "北风", 1018.2, "2024-02-24 05:00:00"],
                [5.5, 89.0, 1.0, 5.0, "从西北偏西方向吹来的风", 1014.64, "2024-02-24 08:00:00"],
                [6.9, 87.0, 1.0, 5.0, "从北方吹来的风", 1013.71, "2024-02-24 11:00:00"],
                [8.6, 80.0, 1.0, 1.0, "从东北方吹来的风", 1011.86, "2024-02-24 14:00:00"],
                [9.0, 69.0, 2.0, 0.5, "从北方吹来的风", 1011.46, "2024-02-24 17:00:00"],
                [7.9, 66.0, 4.0, 0.5, "从北方吹来的风", 1011.99, "2024-02-24 20:00:00"]
            ]),
            id: 6,
        }
    }
}
