use tracing::info;

use std::{collections::HashMap, fmt::Display};

use crate::{
    dataset::Dataset,
    error::{Error, Result},
    model::UNKNOWN_CITY,
};

/// Labelled totals, kept in the order each label was first seen.
///
/// ```
/// # use matreport::Series;
/// let mut series = Series::new();
/// series.add("Metal", 5)?;
/// series.add("Other", 0)?;
/// series.add("Metal", 3)?;
/// assert_eq!(series.get("Metal"), Some(8));
/// assert_eq!(series.labels().collect::<Vec<_>>(), vec!["Metal", "Other"]);
/// # Ok::<(), matreport::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Series {
    entries: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl Series {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the total for `label`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the label's total would no longer
    /// fit, leaving the total unchanged.
    pub fn add(&mut self, label: &str, amount: u64) -> Result<()> {
        match self.positions.get(label) {
            Some(&i) => {
                let total = &mut self.entries[i].1;
                *total = total.checked_add(amount).ok_or_else(|| Error::Overflow {
                    label: label.to_string(),
                    reason: "series total is too large".into(),
                })?;
            }
            None => {
                self.positions.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), amount));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<u64> {
        self.positions.get(label).map(|&i| self.entries[i].1)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), *value))
    }

    /// Returns the sum of all totals, saturating at `u64::MAX`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0, |sum: u64, (_, value)| sum.saturating_add(*value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (label, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label:?}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// Totals the quantity used per material category.
///
/// Every category in the materials table is present, even when none of
/// its materials were used. Each material row adds the quantity of every
/// project that uses its id, so rows sharing an id all count those
/// projects, as in the per-material reports. Projects for unknown
/// materials count nowhere.
///
/// # Errors
///
/// Returns [`Error::Overflow`] if a category's total is too large.
pub fn category_quantities(data: &Dataset) -> Result<Series> {
    let mut series = Series::new();
    for material in data.materials() {
        series.add(&material.category, 0)?;
        for project in data
            .projects()
            .iter()
            .filter(|p| p.material_id == material.id)
        {
            series.add(&material.category, project.quantity)?;
        }
    }
    Ok(series)
}

/// Counts projects per client city.
///
/// Each project counts once, under its client's city, or under
/// [`UNKNOWN_CITY`] if the client is not in the clients table or has no
/// city.
///
/// # Errors
///
/// Returns [`Error::Overflow`] only if a city has more than `u64::MAX`
/// projects.
pub fn city_participation(data: &Dataset) -> Result<Series> {
    let clients = data.client_index();
    let mut series = Series::new();
    for project in data.projects() {
        let city = clients
            .get(&project.client_id)
            .map_or(UNKNOWN_CITY, |c| c.city());
        series.add(city, 1)?;
    }
    info!("projects by city: {series}");
    Ok(series)
}
