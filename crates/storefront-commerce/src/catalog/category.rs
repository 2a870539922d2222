//! Category tags for product organization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// The closed set of category tags a product can carry.
///
/// On the wire categories travel as their Russian labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[default]
    #[serde(rename = "другое")]
    Other,
    #[serde(rename = "кнопка")]
    Button,
    #[serde(rename = "дополнительное")]
    Additional,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 5] = [
        Category::SoftSkill,
        Category::HardSkill,
        Category::Other,
        Category::Button,
        Category::Additional,
    ];

    /// Machine-friendly slug (also used as a style modifier by views).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SoftSkill => "soft-skill",
            Category::HardSkill => "hard-skill",
            Category::Other => "other",
            Category::Button => "button",
            Category::Additional => "additional",
        }
    }

    /// Label used by the remote API.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SoftSkill => "софт-скил",
            Category::HardSkill => "хард-скил",
            Category::Other => "другое",
            Category::Button => "кнопка",
            Category::Additional => "дополнительное",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::SoftSkill => "Soft skill",
            Category::HardSkill => "Hard skill",
            Category::Other => "Other",
            Category::Button => "Button",
            Category::Additional => "Additional",
        }
    }

    /// Parse either the API label or the slug.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label || c.as_str().eq_ignore_ascii_case(label))
    }
}

impl FromStr for Category {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| CommerceError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
