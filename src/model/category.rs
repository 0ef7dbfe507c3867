use crate::Result;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fixed set of spending categories found in the bank's CSV export.
///
/// The declaration order is significant: it is the bit order used when the
/// active-category set is encoded as a bitmask string for cache keys.
/// "Income & credits" is deliberately absent since it is not an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Communication & media")]
    CommunicationMedia,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Household")]
    Household,
    #[serde(rename = "Leisure time, sport & hobby")]
    LeisureSportHobby,
    #[serde(rename = "Living & energy")]
    LivingEnergy,
    #[serde(rename = "Other expenses")]
    OtherExpenses,
    #[serde(rename = "Personal expenditure")]
    PersonalExpenditure,
    #[serde(rename = "Taxes & duties")]
    TaxesDuties,
    #[serde(rename = "Traffic, car & transport")]
    TrafficCarTransport,
    #[serde(rename = "Vacation & travel")]
    VacationTravel,
    #[serde(rename = "Withdrawals")]
    Withdrawals,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// Every category, in bitmask order.
    pub const ALL: [Category; 11] = [
        Category::CommunicationMedia,
        Category::Health,
        Category::Household,
        Category::LeisureSportHobby,
        Category::LivingEnergy,
        Category::OtherExpenses,
        Category::PersonalExpenditure,
        Category::TaxesDuties,
        Category::TrafficCarTransport,
        Category::VacationTravel,
        Category::Withdrawals,
    ];

    /// The category name exactly as it appears in the CSV's "Main category" column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CommunicationMedia => "Communication & media",
            Category::Health => "Health",
            Category::Household => "Household",
            Category::LeisureSportHobby => "Leisure time, sport & hobby",
            Category::LivingEnergy => "Living & energy",
            Category::OtherExpenses => "Other expenses",
            Category::PersonalExpenditure => "Personal expenditure",
            Category::TaxesDuties => "Taxes & duties",
            Category::TrafficCarTransport => "Traffic, car & transport",
            Category::VacationTravel => "Vacation & travel",
            Category::Withdrawals => "Withdrawals",
        }
    }

    /// Looks up a category by its CSV name. Returns `None` for names outside
    /// the fixed enumeration.
    pub fn from_name(name: &str) -> Option<Category> {
        name.parse().ok()
    }

    /// The position of this category in the bitmask.
    pub fn bit_index(&self) -> usize {
        Category::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or_default()
    }
}

/// Table of icon names for every category, in bitmask order.
///
/// The presentation layer names its category widgets after these icons, so the
/// mapping must stay complete with respect to [`Category::ALL`]. That is
/// checked in [`IconMap::new`] rather than assumed.
const ICONS: [(&str, Category); 11] = [
    ("Movie", Category::CommunicationMedia),
    ("MedicalBox", Category::Health),
    ("ShoppingCart", Category::Household),
    ("Football", Category::LeisureSportHobby),
    ("House", Category::LivingEnergy),
    ("Others", Category::OtherExpenses),
    ("Person", Category::PersonalExpenditure),
    ("Taxes", Category::TaxesDuties),
    ("Car", Category::TrafficCarTransport),
    ("Airplane", Category::VacationTravel),
    ("Cash", Category::Withdrawals),
];

/// A validated mapping between presentation-layer icon names and categories.
#[derive(Debug, Clone)]
pub struct IconMap {
    map: HashMap<&'static str, Category>,
}

impl IconMap {
    /// Builds the icon mapping and verifies that it covers every category
    /// exactly once.
    pub fn new() -> Result<Self> {
        let map: HashMap<&'static str, Category> = ICONS.iter().copied().collect();
        if map.len() != ICONS.len() {
            bail!("the icon mapping contains a duplicate icon name");
        }
        for category in Category::ALL {
            if !map.values().any(|c| *c == category) {
                bail!("the icon mapping has no icon for category '{category}'");
            }
        }
        Ok(Self { map })
    }

    /// Resolves an icon name to its category.
    pub fn get(&self, icon: &str) -> Option<Category> {
        self.map.get(icon).copied()
    }

    /// The icon name for a category.
    pub fn icon_for(&self, category: Category) -> Option<&'static str> {
        self.map
            .iter()
            .find(|(_, c)| **c == category)
            .map(|(icon, _)| *icon)
    }
}
