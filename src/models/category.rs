use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spending group every category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum Group {
    Necessary,
    Discretionary,
}

impl Group {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Necessary => "necessary",
            Self::Discretionary => "discretionary",
        }
    }

    pub(crate) fn all() -> &'static [Group] {
        &[Self::Necessary, Self::Discretionary]
    }

    pub(crate) fn members(&self) -> &'static [Category] {
        match self {
            Self::Necessary => Category::necessary(),
            Self::Discretionary => Category::discretionary(),
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum Category {
    Food,
    Gifts,
    MedicalInsurance,
    Transport,
    HousingUtilities,
    Entertainment,
    DailyNecessities,
    Clothing,
    Pets,
    Travel,
}

impl Category {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Gifts => "gifts",
            Self::MedicalInsurance => "medicalInsurance",
            Self::Transport => "transport",
            Self::HousingUtilities => "housingUtilities",
            Self::Entertainment => "entertainment",
            Self::DailyNecessities => "dailyNecessities",
            Self::Clothing => "clothing",
            Self::Pets => "pets",
            Self::Travel => "travel",
        }
    }

    /// Parse the wire identifier. Matching ignores case so the CLI accepts `medicalinsurance`.
    pub(crate) fn parse(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }

    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Gifts,
            Self::MedicalInsurance,
            Self::Transport,
            Self::HousingUtilities,
            Self::Entertainment,
            Self::DailyNecessities,
            Self::Clothing,
            Self::Pets,
            Self::Travel,
        ]
    }

    pub(crate) fn necessary() -> &'static [Category] {
        &[
            Self::Food,
            Self::Gifts,
            Self::MedicalInsurance,
            Self::Transport,
            Self::HousingUtilities,
        ]
    }

    pub(crate) fn discretionary() -> &'static [Category] {
        &[
            Self::Entertainment,
            Self::DailyNecessities,
            Self::Clothing,
            Self::Pets,
            Self::Travel,
        ]
    }

    pub(crate) fn group(&self) -> Group {
        if Self::necessary().contains(self) {
            Group::Necessary
        } else {
            Group::Discretionary
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
