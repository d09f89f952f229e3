//! Specials (daily deals, seasonal dishes)

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::DayOfWeek;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Special {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    /// Empty means every day
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_available: Vec<DayOfWeek>,
    #[serde(default)]
    pub is_active: bool,
}

impl Special {
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        if self.valid_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.valid_until.is_some_and(|until| date > until) {
            return false;
        }

        self.days_available.is_empty()
            || self
                .days_available
                .contains(&DayOfWeek::from(date.weekday()))
    }
}
