// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile and tag-set models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Onboarding profile. The id is the identity provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Onboarding is complete once a display name has been saved.
    pub fn is_onboarded(&self) -> bool {
        self.display_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

/// User-scoped tag sets attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Goal,
    DietaryRestriction,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: Option<&str>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: None,
            display_name: name.map(str::to_string),
            age: None,
            height_cm: None,
            weight_kg: None,
            activity_level: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_onboarded_requires_non_blank_name() {
        assert!(profile(Some("Sam")).is_onboarded());
        assert!(!profile(Some("   ")).is_onboarded());
        assert!(!profile(None).is_onboarded());
    }
}
