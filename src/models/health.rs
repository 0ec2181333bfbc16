// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily health measurements: sleep, body weight and water intake.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Which measurement a health entry records. Each lives in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthMetric {
    Sleep,
    Weight,
    Water,
}

/// Metric-specific columns of a health entry.
///
/// Untagged: the variant is recognized by its required columns, which do
/// not overlap between metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthReading {
    Sleep {
        duration_hours: f64,
        quality_rating: u8,
        #[serde(default)]
        notes: Option<String>,
    },
    Weight {
        weight_kg: f64,
        #[serde(default)]
        notes: Option<String>,
    },
    Water {
        amount_ml: u32,
    },
}

impl HealthReading {
    pub fn metric(&self) -> HealthMetric {
        match self {
            HealthReading::Sleep { .. } => HealthMetric::Sleep,
            HealthReading::Weight { .. } => HealthMetric::Weight,
            HealthReading::Water { .. } => HealthMetric::Water,
        }
    }
}

/// Stored health entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: HealthReading,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewHealthEntry {
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: HealthReading,
}

impl NewHealthEntry {
    pub fn into_entry(self, id: Uuid, created_at: DateTime<Utc>) -> HealthEntry {
        HealthEntry {
            id,
            user_id: self.user_id,
            date: self.date,
            reading: self.reading,
            created_at,
        }
    }
}

/// Optional inclusive date bounds for health listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSleep {
    pub date: NaiveDate,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep duration must be 0-24 hours"))]
    pub duration_hours: f64,
    #[validate(range(min = 1, max = 5, message = "Quality rating must be between 1 and 5"))]
    pub quality_rating: u8,
    pub notes: Option<String>,
}

impl CreateSleep {
    pub fn into_new(self, user_id: Uuid) -> NewHealthEntry {
        NewHealthEntry {
            user_id,
            date: self.date,
            reading: HealthReading::Sleep {
                duration_hours: self.duration_hours,
                quality_rating: self.quality_rating,
                notes: self.notes,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWeight {
    pub date: NaiveDate,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight_kg: f64,
    pub notes: Option<String>,
}

impl CreateWeight {
    pub fn into_new(self, user_id: Uuid) -> NewHealthEntry {
        NewHealthEntry {
            user_id,
            date: self.date,
            reading: HealthReading::Weight {
                weight_kg: self.weight_kg,
                notes: self.notes,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWater {
    pub date: NaiveDate,
    #[validate(range(min = 1, max = 20000, message = "Amount must be 1-20000 ml"))]
    pub amount_ml: u32,
}

impl CreateWater {
    pub fn into_new(self, user_id: Uuid) -> NewHealthEntry {
        NewHealthEntry {
            user_id,
            date: self.date,
            reading: HealthReading::Water {
                amount_ml: self.amount_ml,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_decode_to_matching_metric() {
        let base = |extra: serde_json::Value| {
            let mut row = json!({
                "id": "9b2f6f8e-3c1a-4d2b-8f4e-1a2b3c4d5e6f",
                "user_id": "0c8e1d7a-5b6c-4e3f-9a8b-7c6d5e4f3a2b",
                "date": "2024-01-02",
                "created_at": "2024-01-02T08:00:00Z"
            });
            row.as_object_mut()
                .unwrap()
                .extend(extra.as_object().unwrap().clone());
            serde_json::from_value::<HealthEntry>(row).unwrap()
        };

        let sleep = base(json!({"duration_hours": 7.5, "quality_rating": 4, "notes": null}));
        assert_eq!(sleep.reading.metric(), HealthMetric::Sleep);

        let weight = base(json!({"weight_kg": 72, "notes": "after run"}));
        assert_eq!(
            weight.reading,
            HealthReading::Weight {
                weight_kg: 72.0,
                notes: Some("after run".to_string())
            }
        );

        let water = base(json!({"amount_ml": 500}));
        assert_eq!(water.reading.metric(), HealthMetric::Water);
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = NewHealthEntry {
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reading: HealthReading::Water { amount_ml: 250 },
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["amount_ml"], 250);
        assert_eq!(value["date"], "2024-01-02");
    }

    #[test]
    fn test_bounds_are_inclusive_and_open_ended() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let bounds = DateBounds {
            from: Some(day(2)),
            to: Some(day(4)),
        };
        assert!(bounds.contains(day(2)));
        assert!(bounds.contains(day(4)));
        assert!(!bounds.contains(day(5)));
        assert!(DateBounds::default().contains(day(31)));
        assert!(DateBounds {
            from: None,
            to: Some(day(4))
        }
        .contains(day(1)));
    }
}
