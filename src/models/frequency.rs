//! Series cadence
//!
//! The model is closed to exactly three cadences. Anything else is rejected
//! when the frequency is parsed, before a series can be built from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BilltrackError;

/// How often a series recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every 7 days
    Weekly,
    /// Every 14 days
    Biweekly,
    /// Once per calendar month
    Monthly,
}

impl Frequency {
    /// All supported frequencies
    pub const ALL: [Frequency; 3] = [Self::Weekly, Self::Biweekly, Self::Monthly];

    /// The lowercase name used in stored records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    /// Fixed step in days, or `None` for calendar-month stepping
    pub fn step_days(&self) -> Option<i64> {
        match self {
            Self::Weekly => Some(7),
            Self::Biweekly => Some(14),
            Self::Monthly => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = BilltrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(BilltrackError::InvalidFrequency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("BiWeekly".parse::<Frequency>().unwrap(), Frequency::Biweekly);
        assert_eq!(" Monthly ".parse::<Frequency>().unwrap(), Frequency::Monthly);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "fortnightly".parse::<Frequency>().unwrap_err();
        assert!(matches!(err, BilltrackError::InvalidFrequency(ref s) if s == "fortnightly"));
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for freq in Frequency::ALL {
            assert_eq!(freq.to_string().parse::<Frequency>().unwrap(), freq);
        }
    }

    #[test]
    fn test_step_days() {
        assert_eq!(Frequency::Weekly.step_days(), Some(7));
        assert_eq!(Frequency::Biweekly.step_days(), Some(14));
        assert_eq!(Frequency::Monthly.step_days(), None);
    }
}
