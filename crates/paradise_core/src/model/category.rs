//! Category model and icon keys.
//!
//! # Invariants
//! - `id` is unique within one identity's category collection.
//! - `icon` keeps the raw key as persisted; unknown keys render as
//!   [`CategoryIcon::Hash`] but are never rewritten.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub type CategoryId = String;

/// Grouping label for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Color token, usually a `#rrggbb` hex string.
    pub color: String,
    /// Symbolic icon key, see [`CategoryIcon`].
    pub icon: String,
}

impl Category {
    /// Resolved icon, falling back to the default for unknown keys.
    pub fn icon_kind(&self) -> CategoryIcon {
        CategoryIcon::from_key(&self.icon)
    }
}

/// Enumerated icon set a category can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryIcon {
    ShoppingBag,
    Music,
    Book,
    PartyPopper,
    Bookmark,
    Briefcase,
    Coffee,
    Zap,
    Heart,
    Star,
    Clock,
    /// Fallback for unrecognized keys.
    Hash,
}

impl CategoryIcon {
    /// Icons a user can pick from.
    pub const SELECTABLE: [CategoryIcon; 11] = [
        Self::ShoppingBag,
        Self::Music,
        Self::Book,
        Self::PartyPopper,
        Self::Bookmark,
        Self::Briefcase,
        Self::Coffee,
        Self::Zap,
        Self::Heart,
        Self::Star,
        Self::Clock,
    ];

    pub fn from_key(key: &str) -> Self {
        match key {
            "shopping-bag" => Self::ShoppingBag,
            "music" => Self::Music,
            "book" => Self::Book,
            "party-popper" => Self::PartyPopper,
            "bookmark" => Self::Bookmark,
            "briefcase" => Self::Briefcase,
            "coffee" => Self::Coffee,
            "zap" => Self::Zap,
            "heart" => Self::Heart,
            "star" => Self::Star,
            "clock" => Self::Clock,
            _ => Self::Hash,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::ShoppingBag => "shopping-bag",
            Self::Music => "music",
            Self::Book => "book",
            Self::PartyPopper => "party-popper",
            Self::Bookmark => "bookmark",
            Self::Briefcase => "briefcase",
            Self::Coffee => "coffee",
            Self::Zap => "zap",
            Self::Heart => "heart",
            Self::Star => "star",
            Self::Clock => "clock",
            Self::Hash => "hash",
        }
    }
}

/// Categories seeded for an identity that has none stored.
pub fn default_categories() -> Vec<Category> {
    [
        ("1", "Haul", "#ff7b5c", CategoryIcon::ShoppingBag),
        ("2", "Vibes", "#7b61ff", CategoryIcon::Music),
        ("3", "Study", "#41b883", CategoryIcon::Book),
        ("4", "Fun", "#ff61a6", CategoryIcon::PartyPopper),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        icon: icon.key().to_string(),
    })
    .collect()
}

/// Input for creating a category; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>, icon: CategoryIcon) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            icon: icon.key().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankCategoryName);
        }
        Ok(())
    }

    pub(crate) fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            color: self.color,
            icon: self.icon,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) if name.trim().is_empty() => Err(ValidationError::BlankCategoryName),
            _ => Ok(()),
        }
    }

    pub(crate) fn apply_to(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{default_categories, Category, CategoryIcon};

    #[test]
    fn unknown_icon_keys_fall_back_to_hash() {
        let category = Category {
            id: "9".to_string(),
            name: "Misc".to_string(),
            color: "#000000".to_string(),
            icon: "rocket".to_string(),
        };
        assert_eq!(category.icon_kind(), CategoryIcon::Hash);
        assert_eq!(CategoryIcon::from_key("coffee"), CategoryIcon::Coffee);
    }

    #[test]
    fn selectable_icons_roundtrip_through_keys() {
        for icon in CategoryIcon::SELECTABLE {
            assert_eq!(CategoryIcon::from_key(icon.key()), icon);
        }
    }

    #[test]
    fn default_set_has_four_unique_ids() {
        let defaults = default_categories();
        let ids: Vec<&str> = defaults.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
        assert_eq!(defaults[3].icon_kind(), CategoryIcon::PartyPopper);
    }
}
