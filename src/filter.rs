use std::{fmt::Display, str::FromStr};

use itertools::Itertools;

use crate::project::{Category, ProjectRecord};

/// The value of filter controls that disables a criterion.
pub const WILDCARD: &str = "all";

/// A single filter criterion: the wildcard or an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
  #[default]
  All,
  Only(T),
}

impl<T: PartialEq> Choice<T> {
  /// Exact equality, the wildcard admits everything.
  #[must_use]
  pub fn admits(&self, value: &T) -> bool {
    match self {
      Choice::All => true,
      Choice::Only(expected) => expected == value,
    }
  }

  #[must_use]
  pub fn is_all(&self) -> bool {
    matches!(self, Choice::All)
  }
}

impl<T: FromStr> FromStr for Choice<T> {
  type Err = T::Err;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    if input == WILDCARD {
      Ok(Choice::All)
    } else {
      input.parse().map(Choice::Only)
    }
  }
}

impl<T: Display> Display for Choice<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Choice::All => write!(f, "{WILDCARD}"),
      Choice::Only(value) => write!(f, "{value}"),
    }
  }
}

/// The state of the three filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
  pub year: Choice<String>,
  pub category: Choice<Category>,
  pub status: Choice<String>,
}

impl FilterSelection {
  /// Parses the raw control values, each either `all` or a value.
  ///
  /// # Errors
  /// If the category is neither `all` nor a known category.
  pub fn from_controls(
    year: &str,
    category: &str,
    status: &str,
  ) -> Result<Self, crate::project::UnknownCategory> {
    Ok(Self {
      year: year.parse().unwrap_or_default(),
      category: category.parse()?,
      status: status.parse().unwrap_or_default(),
    })
  }

  #[must_use]
  pub fn is_wildcard(&self) -> bool {
    self.year.is_all() && self.category.is_all() && self.status.is_all()
  }

  #[must_use]
  pub fn matches(&self, project: &ProjectRecord) -> bool {
    self.year.admits(&project.year)
      && self.category.admits(&project.category)
      && self.status.admits(&project.status)
  }
}

/// Positions of the projects passing `selection`, in their original order.
#[must_use]
pub fn filter_indices(projects: &[ProjectRecord], selection: &FilterSelection) -> Vec<usize> {
  projects
    .iter()
    .enumerate()
    .filter(|(_, project)| selection.matches(project))
    .map(|(index, _)| index)
    .collect()
}

/// The projects passing `selection`, in their original order.
#[must_use]
pub fn filter_projects<'a>(
  projects: &'a [ProjectRecord],
  selection: &FilterSelection,
) -> Vec<&'a ProjectRecord> {
  projects.iter().filter(|p| selection.matches(p)).collect()
}

/// The discrete values offered by the filter controls besides the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
  /// Newest first.
  pub years: Vec<String>,
  pub categories: Vec<Category>,
  pub statuses: Vec<String>,
}

impl FilterOptions {
  #[must_use]
  pub fn from_projects(projects: &[ProjectRecord]) -> Self {
    Self {
      years: projects
        .iter()
        .map(|p| p.year.clone())
        .unique()
        .sorted_by(|a, b| b.cmp(a))
        .collect(),
      categories: Category::all().to_vec(),
      statuses: projects
        .iter()
        .map(|p| p.status.clone())
        .unique()
        .sorted()
        .collect(),
    }
  }
}
