//! The closed set of spending categories and the colors they are drawn with.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An RGB color triple.
pub type Rgb = [u8; 3];

/// One of the five categories that the tracker aggregates over.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[value(rename_all = "verbatim")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    /// All categories in their fixed enumeration order. Charts and legends follow this order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// The fixed color used for this category in charts and legends.
    pub fn color(&self) -> Rgb {
        match self {
            Category::Food => [65, 105, 225],
            Category::Transport => [0, 191, 255],
            Category::Utilities => [34, 139, 34],
            Category::Entertainment => [255, 165, 0],
            Category::Other => [128, 128, 128],
        }
    }

    /// Exact, case-sensitive lookup by name.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == s)
    }
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

/// The category of a transaction as received from the store. The store keeps a free-form string,
/// so anything outside the fixed set is preserved as `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionCategory {
    Known(Category),
    Unrecognized(String),
}

impl TransactionCategory {
    /// Classifies a raw category string.
    pub fn parse(s: &str) -> Self {
        match Category::from_name(s) {
            Some(c) => TransactionCategory::Known(c),
            None => TransactionCategory::Unrecognized(s.to_string()),
        }
    }

    /// The fixed category, if this is one.
    pub fn known(&self) -> Option<Category> {
        match self {
            TransactionCategory::Known(c) => Some(*c),
            TransactionCategory::Unrecognized(_) => None,
        }
    }

    /// The raw category string.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionCategory::Known(c) => c.name(),
            TransactionCategory::Unrecognized(s) => s,
        }
    }

    /// The label shown in the transaction table: a blank category shows as `Other`.
    pub fn display_name(&self) -> &str {
        match self.as_str() {
            "" => Category::Other.name(),
            s => s,
        }
    }
}

impl Default for TransactionCategory {
    fn default() -> Self {
        TransactionCategory::Known(Category::default())
    }
}

impl From<Category> for TransactionCategory {
    fn from(value: Category) -> Self {
        TransactionCategory::Known(value)
    }
}

impl FromStr for TransactionCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Display for TransactionCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransactionCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A null category is what an older row without the column looks like.
        let s = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(TransactionCategory::parse(&s))
    }
}
