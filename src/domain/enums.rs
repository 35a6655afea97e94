use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category a task is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Personal,
    Work,
    Education,
    #[serde(alias = "Fitness")]
    Sport,
    Health,
}

impl Category {
    /// Get all categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Category::Personal,
            Category::Work,
            Category::Education,
            Category::Sport,
            Category::Health,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Education => "Education",
            Category::Sport => "Sport",
            Category::Health => "Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Parse a category name, case-insensitive ("fitness" maps to Sport)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "work" => Ok(Self::Work),
            "education" => Ok(Self::Education),
            "sport" | "fitness" => Ok(Self::Sport),
            "health" => Ok(Self::Health),
            other => Err(format!(
                "unknown category '{}' (expected Personal, Work, Education, Sport or Health)",
                other
            )),
        }
    }
}

/// Active category filter for the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{}' (expected low, medium or high)", other)),
        }
    }
}

/// Completion state of the tasks created on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// Nothing was created that day
    NoTasks,
    /// Tasks exist but none are done
    Pending,
    /// Some, but not all, tasks are done
    Partial,
    /// Every task is done
    Complete,
}

impl DayStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            DayStatus::NoTasks => " ",
            DayStatus::Pending => "·",
            DayStatus::Partial => "◐",
            DayStatus::Complete => "●",
        }
    }
}
