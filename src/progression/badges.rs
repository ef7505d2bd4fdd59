//! Badge catalog.

use std::fmt;
use std::str::FromStr;

/// Grouping shown next to a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BadgeCategory {
    Beginner,
    Streak,
    Achievement,
    Usage,
    Level,
}

/// Stable badge identifiers. The string form is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BadgeId {
    FirstLesson,
    #[cfg_attr(feature = "serde", serde(rename = "streak_7"))]
    Streak7,
    #[cfg_attr(feature = "serde", serde(rename = "streak_30"))]
    Streak30,
    CourseComplete,
    AllLessons,
    PromptMaster,
    #[cfg_attr(feature = "serde", serde(rename = "level_5"))]
    Level5,
}

/// Display metadata for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Badge {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
}

/// Every badge, in catalog order.
pub const BADGES: &[Badge] = &[
    Badge {
        id: BadgeId::FirstLesson,
        name: "First Lesson",
        description: "Completed your first lesson",
        icon: "🎉",
        category: BadgeCategory::Beginner,
    },
    Badge {
        id: BadgeId::Streak7,
        name: "7-Day Streak",
        description: "Studied seven days in a row",
        icon: "🔥",
        category: BadgeCategory::Streak,
    },
    Badge {
        id: BadgeId::Streak30,
        name: "30-Day Streak",
        description: "Studied thirty days in a row",
        icon: "💪",
        category: BadgeCategory::Streak,
    },
    Badge {
        id: BadgeId::CourseComplete,
        name: "Course Complete",
        description: "Finished a course",
        icon: "📚",
        category: BadgeCategory::Achievement,
    },
    Badge {
        id: BadgeId::AllLessons,
        name: "All Lessons",
        description: "Completed every lesson",
        icon: "⭐",
        category: BadgeCategory::Achievement,
    },
    Badge {
        id: BadgeId::PromptMaster,
        name: "Prompt Master",
        description: "Used prompts more than 100 times",
        icon: "💡",
        category: BadgeCategory::Usage,
    },
    Badge {
        id: BadgeId::Level5,
        name: "Expert",
        description: "Reached level 5",
        icon: "🏆",
        category: BadgeCategory::Level,
    },
];

impl BadgeId {
    pub const fn as_str(self) -> &'static str {
        match self {
            BadgeId::FirstLesson => "first_lesson",
            BadgeId::Streak7 => "streak_7",
            BadgeId::Streak30 => "streak_30",
            BadgeId::CourseComplete => "course_complete",
            BadgeId::AllLessons => "all_lessons",
            BadgeId::PromptMaster => "prompt_master",
            BadgeId::Level5 => "level_5",
        }
    }

    /// Catalog entry for this id.
    pub fn badge(self) -> &'static Badge {
        // BADGES holds one entry per variant, in declaration order.
        &BADGES[self as usize]
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown badge id string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown badge id '{0}'")]
pub struct UnknownBadge(pub String);

impl FromStr for BadgeId {
    type Err = UnknownBadge;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BADGES
            .iter()
            .map(|b| b.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownBadge(s.to_string()))
    }
}
