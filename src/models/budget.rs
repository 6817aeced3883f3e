use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::{Category, Group, Month};

/// One amount per category. Keys missing or `null` on the wire read back as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CategoryAmounts {
    #[serde(deserialize_with = "zero_if_null")]
    pub food: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub gifts: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub medical_insurance: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub transport: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub housing_utilities: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub entertainment: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub daily_necessities: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub clothing: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub pets: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub travel: Decimal,
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

impl CategoryAmounts {
    pub fn get(&self, category: Category) -> Decimal {
        match category {
            Category::Food => self.food,
            Category::Gifts => self.gifts,
            Category::MedicalInsurance => self.medical_insurance,
            Category::Transport => self.transport,
            Category::HousingUtilities => self.housing_utilities,
            Category::Entertainment => self.entertainment,
            Category::DailyNecessities => self.daily_necessities,
            Category::Clothing => self.clothing,
            Category::Pets => self.pets,
            Category::Travel => self.travel,
        }
    }

    pub fn set(&mut self, category: Category, amount: Decimal) {
        let slot = match category {
            Category::Food => &mut self.food,
            Category::Gifts => &mut self.gifts,
            Category::MedicalInsurance => &mut self.medical_insurance,
            Category::Transport => &mut self.transport,
            Category::HousingUtilities => &mut self.housing_utilities,
            Category::Entertainment => &mut self.entertainment,
            Category::DailyNecessities => &mut self.daily_necessities,
            Category::Clothing => &mut self.clothing,
            Category::Pets => &mut self.pets,
            Category::Travel => &mut self.travel,
        };
        *slot = amount;
    }

    pub fn add(&mut self, category: Category, amount: Decimal) {
        self.set(category, self.get(category) + amount);
    }

    pub fn group_sum(&self, group: Group) -> Decimal {
        group.members().iter().map(|c| self.get(*c)).sum()
    }

    pub fn sum(&self) -> Decimal {
        Category::all().iter().map(|c| self.get(*c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        Category::all().iter().map(move |c| (*c, self.get(*c)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GroupTotal {
    pub total: Decimal,
}

/// A month's (or the standing default) spending plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BudgetSet {
    pub necessary: GroupTotal,
    pub discretionary: GroupTotal,
    pub categories: CategoryAmounts,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetSet {
    pub fn group_total(&self, group: Group) -> Decimal {
        match group {
            Group::Necessary => self.necessary.total,
            Group::Discretionary => self.discretionary.total,
        }
    }

    /// Recompute group and grand totals from the category amounts.
    pub fn recompute(&mut self) {
        self.necessary.total = self.categories.group_sum(Group::Necessary);
        self.discretionary.total = self.categories.group_sum(Group::Discretionary);
        self.total = self.necessary.total + self.discretionary.total;
    }

    pub fn set_category(&mut self, category: Category, amount: Decimal) -> Decimal {
        let old = self.categories.get(category);
        self.categories.set(category, amount);
        self.recompute();
        old
    }

    /// Copy of `self` to seed a new monthly entry.
    pub fn seeded(&self, now: DateTime<Utc>) -> Self {
        let mut seed = self.clone();
        seed.created_at = Some(now);
        seed.updated_at = Some(now);
        seed.recompute();
        seed
    }
}

/// The standing default budget plus per-month overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct BudgetTable {
    pub default: BudgetSet,
    pub monthly: BTreeMap<Month, BudgetSet>,
}

impl BudgetTable {
    /// The latest monthly entry strictly before `month`.
    pub fn nearest_prior(&self, month: Month) -> Option<(&Month, &BudgetSet)> {
        self.monthly.range(..month).next_back()
    }

    /// Return the entry for `month`, creating it from the nearest prior month
    /// (or the default) when absent.
    pub fn month_entry(&mut self, month: Month, now: DateTime<Utc>) -> &mut BudgetSet {
        if !self.monthly.contains_key(&month) {
            let seed = match self.nearest_prior(month) {
                Some((_, prior)) => prior.seeded(now),
                None => self.default.seeded(now),
            };
            self.monthly.insert(month, seed);
        }
        self.monthly.entry(month).or_default()
    }
}
