use chrono::Datelike;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalyticsError, Result};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month, always in 1..=12. Orders Jan < Feb < ... < Dec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month(u32);

impl Month {
    pub fn new(number: u32) -> Result<Self> {
        if (1..=12).contains(&number) {
            Ok(Self(number))
        } else {
            Err(AnalyticsError::InvalidMonth(number))
        }
    }

    /// Month of a chrono date or datetime, which is always in range.
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self(date.month())
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    pub fn abbr(&self) -> &'static str {
        MONTH_ABBR[(self.0 - 1) as usize]
    }

    pub fn season(&self) -> Season {
        Season::from_month(*self)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbr())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.abbr())
    }
}

/// Indian meteorological seasons. The derived ordering is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Winter,
    Summer,
    Monsoon,
    #[serde(rename = "Post-Monsoon")]
    PostMonsoon,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Winter,
        Season::Summer,
        Season::Monsoon,
        Season::PostMonsoon,
    ];

    /// Dec-Feb winter, Mar-May summer, Jun-Sep monsoon, Oct-Nov post-monsoon.
    pub fn from_month(month: Month) -> Self {
        match month.number() {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Summer,
            6..=9 => Season::Monsoon,
            _ => Season::PostMonsoon,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
            Season::PostMonsoon => "Post-Monsoon",
        }
    }

    pub fn months(&self) -> Vec<Month> {
        Month::all().filter(|m| m.season() == *self).collect()
    }
}

impl FromStr for Season {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "winter" => Ok(Season::Winter),
            "summer" | "pre-monsoon" => Ok(Season::Summer),
            "monsoon" => Ok(Season::Monsoon),
            "post-monsoon" | "postmonsoon" => Ok(Season::PostMonsoon),
            _ => Err(AnalyticsError::UnknownSeason(s.to_string())),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        assert!(Month::new(0).is_err());
        assert!(Month::new(13).is_err());
        assert_eq!(Month::new(1).unwrap().abbr(), "Jan");
        assert_eq!(Month::new(12).unwrap().abbr(), "Dec");
        assert_eq!(Month::all().count(), 12);
    }

    #[test]
    fn test_season_partition_is_total() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Summer),
            (4, Season::Summer),
            (5, Season::Summer),
            (6, Season::Monsoon),
            (7, Season::Monsoon),
            (8, Season::Monsoon),
            (9, Season::Monsoon),
            (10, Season::PostMonsoon),
            (11, Season::PostMonsoon),
            (12, Season::Winter),
        ];
        for (number, season) in expected {
            assert_eq!(Month::new(number).unwrap().season(), season, "month {number}");
        }
    }

    #[test]
    fn test_season_sizes_are_asymmetric() {
        let sizes: Vec<usize> = Season::ALL.iter().map(|s| s.months().len()).collect();
        assert_eq!(sizes, vec![3, 3, 4, 2]);
    }

    #[test]
    fn test_season_display_order() {
        let mut seasons = vec![
            Season::PostMonsoon,
            Season::Monsoon,
            Season::Winter,
            Season::Summer,
        ];
        seasons.sort();
        assert_eq!(seasons, Season::ALL.to_vec());
    }

    #[test]
    fn test_season_from_label() {
        assert_eq!("Post-Monsoon".parse::<Season>().unwrap(), Season::PostMonsoon);
        assert_eq!("post_monsoon".parse::<Season>().unwrap(), Season::PostMonsoon);
        assert_eq!("WINTER".parse::<Season>().unwrap(), Season::Winter);
        assert!("Autumn".parse::<Season>().is_err());
    }
}
