use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    dataset::Dataset,
    error::{Error, Result},
    model::{Material, Project},
    money::{two_places, Money},
};

/// Default folder for the per-material text reports.
pub const REPORT_DIR: &str = "Materials report";

/// Characters that cannot appear in a path component on common platforms.
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("valid pattern"));

/// Usage totals for one material.
///
/// The [`Display`] implementation gives the text written to the
/// material's report file.
///
/// ```
/// # use std::str::FromStr;
/// # use matreport::{Material, MaterialSummary, Money, Project};
/// let steel = Material {
///     id: "M1".into(),
///     name: "Steel".into(),
///     unit_value: Money::from_str("10.00").unwrap(),
///     category: "Metal".into(),
/// };
/// let used = [Project { material_id: "M1".into(), client_id: "C1".into(), quantity: 5 }];
/// let summary = MaterialSummary::new(&steel, &used)?;
/// assert_eq!(
///     summary.to_string(),
///     "Total quantity of material: 5\n\
///      Average material used: 5.00\n\
///      Total material cost: 50.00\n"
/// );
/// # Ok::<(), matreport::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSummary {
    pub material_id: String,
    pub name: String,
    pub total_quantity: u64,
    pub count: usize,
    pub total_cost: Money,
}

impl MaterialSummary {
    /// Totals the projects in `projects` that use `material`. Projects for
    /// other materials are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the total quantity or cost is too
    /// large to hold.
    pub fn new(material: &Material, projects: &[Project]) -> Result<Self> {
        let mut summary = Self {
            material_id: material.id.clone(),
            name: material.name.clone(),
            total_quantity: 0,
            count: 0,
            total_cost: Money::default(),
        };
        let overflow = |what: &str| Error::Overflow {
            label: material.name.clone(),
            reason: format!("total {what} is too large"),
        };
        for project in projects.iter().filter(|p| p.material_id == material.id) {
            summary.total_quantity = summary
                .total_quantity
                .checked_add(project.quantity)
                .ok_or_else(|| overflow("quantity"))?;
            summary.total_cost = material
                .unit_value
                .checked_mul(project.quantity)
                .and_then(|cost| summary.total_cost.checked_add(cost))
                .ok_or_else(|| overflow("cost"))?;
            summary.count += 1;
        }
        Ok(summary)
    }

    /// Returns the mean quantity per project, or zero if no project used
    /// the material.
    #[must_use]
    pub fn average_quantity(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.total_quantity) / Decimal::from(self.count)
    }
}

impl Display for MaterialSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total quantity of material: {}", self.total_quantity)?;
        writeln!(f, "Average material used: {}", two_places(self.average_quantity()))?;
        writeln!(f, "Total material cost: {}", self.total_cost)?;
        Ok(())
    }
}

/// Writes one report per material under a root folder, as
/// `<root>/<name>/<name>.txt`.
#[derive(Debug)]
pub struct ReportWriter {
    root: PathBuf,
}

impl ReportWriter {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `name` made safe to use as a single path component.
    ///
    /// ```
    /// # use matreport::ReportWriter;
    /// let writer = ReportWriter::new("out");
    /// assert_eq!(writer.folder_name("Pipe 1/2\""), "Pipe 1_2_");
    /// assert_eq!(writer.folder_name(".."), "_");
    /// ```
    #[must_use]
    pub fn folder_name(&self, name: &str) -> String {
        let safe = UNSAFE_CHARS.replace_all(name, "_");
        if safe.chars().all(|c| c == '.') {
            return "_".into();
        }
        safe.into_owned()
    }

    /// Summarises every material in `data`, in table order, and writes
    /// its report, replacing any earlier one. Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if a material's totals are too large,
    /// or [`Error::Io`] if a folder or file cannot be written. Reports
    /// written before the failure are left in place.
    pub fn write_all(&self, data: &Dataset) -> Result<Vec<PathBuf>> {
        create_dir(&self.root)?;
        let mut written = Vec::with_capacity(data.materials().len());
        for material in data.materials() {
            let summary = MaterialSummary::new(material, data.projects())?;
            written.push(self.write(&summary)?);
        }
        Ok(written)
    }

    /// Writes a single material's report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the folder or file cannot be written.
    pub fn write(&self, summary: &MaterialSummary) -> Result<PathBuf> {
        let name = self.folder_name(&summary.name);
        let dir = self.root.join(&name);
        create_dir(&dir)?;
        let path = dir.join(format!("{name}.txt"));
        fs::write(&path, summary.to_string()).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        debug!(
            "{}: {} units over {} projects",
            summary.material_id, summary.total_quantity, summary.count
        );
        Ok(path)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    fn material(id: &str, name: &str, unit_value: &str) -> Material {
        Material {
            id: id.into(),
            name: name.into(),
            unit_value: Money::from_str(unit_value).unwrap(),
            category: "Metal".into(),
        }
    }

    fn project(material_id: &str, client_id: &str, quantity: u64) -> Project {
        Project {
            material_id: material_id.into(),
            client_id: client_id.into(),
            quantity,
        }
    }

    #[test]
    fn new_fn_totals_matching_projects() {
        let steel = material("M1", "Steel", "10.00");
        let projects = [
            project("M1", "C1", 5),
            project("M1", "C2", 3),
            project("M2", "C1", 100),
        ];
        let summary = MaterialSummary::new(&steel, &projects).unwrap();
        assert_eq!(summary.total_quantity, 8);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average_quantity(), dec!(4));
        assert_eq!(summary.total_cost, Money::new(dec!(80)));
        assert_eq!(
            summary.to_string(),
            "Total quantity of material: 8\n\
             Average material used: 4.00\n\
             Total material cost: 80.00\n"
        );
    }

    #[test]
    fn new_fn_gives_zeros_for_unused_material() {
        let glass = material("M2", "Glass", "2.50");
        let summary = MaterialSummary::new(&glass, &[]).unwrap();
        assert_eq!(summary.total_quantity, 0);
        assert_eq!(summary.average_quantity(), Decimal::ZERO);
        assert_eq!(summary.total_cost, Money::default());
        assert_eq!(
            summary.to_string(),
            "Total quantity of material: 0\n\
             Average material used: 0.00\n\
             Total material cost: 0.00\n"
        );
    }

    #[test]
    fn total_cost_equals_total_quantity_times_unit_value() {
        let pipe = material("M3", "Pipe", "0.1");
        let projects: Vec<_> = (1..=7).map(|q| project("M3", "C1", q)).collect();
        let summary = MaterialSummary::new(&pipe, &projects).unwrap();
        assert_eq!(
            Some(summary.total_cost),
            pipe.unit_value.checked_mul(summary.total_quantity)
        );
    }

    #[test]
    fn display_fn_rounds_average_to_two_places() {
        let cement = material("M4", "Cement", "1");
        let projects = [
            project("M4", "C1", 1),
            project("M4", "C1", 1),
            project("M4", "C1", 2),
        ];
        let text = MaterialSummary::new(&cement, &projects).unwrap().to_string();
        assert!(text.contains("Average material used: 1.33\n"), "{text}");
    }

    #[test]
    fn new_fn_returns_overflow_when_cost_is_too_large() {
        let gold = material("M5", "Gold", "10000000000");
        let err = MaterialSummary::new(&gold, &[project("M5", "C1", u64::MAX)]).unwrap_err();
        match err {
            Error::Overflow { label, reason } => {
                assert_eq!(label, "Gold");
                assert!(reason.contains("cost"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn new_fn_returns_overflow_when_quantity_is_too_large() {
        let sand = material("M6", "Sand", "0");
        let half = u64::MAX / 2 + 1;
        let projects = [project("M6", "C1", half), project("M6", "C2", half)];
        let err = MaterialSummary::new(&sand, &projects).unwrap_err();
        match err {
            Error::Overflow { label, reason } => {
                assert_eq!(label, "Sand");
                assert!(reason.contains("quantity"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn write_all_fn_stops_on_overflow_before_writing_that_report() {
        let dir = TempDir::new().unwrap();
        let data = Dataset::new(
            vec![],
            vec![material("M1", "Steel", "10.00"), material("M5", "Gold", "10000000000")],
            vec![project("M1", "C1", 5), project("M5", "C1", u64::MAX)],
        );
        let writer = ReportWriter::new(dir.path());
        let err = writer.write_all(&data).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }), "{err:?}");
        assert!(dir.path().join("Steel").join("Steel.txt").exists());
        assert!(!dir.path().join("Gold").exists());
    }

    #[test]
    fn write_all_fn_writes_one_report_per_material() {
        let dir = TempDir::new().unwrap();
        let data = Dataset::new(
            vec![],
            vec![material("M1", "Steel", "10.00"), material("M2", "Glass", "2.50")],
            vec![project("M1", "C1", 5), project("M1", "C2", 3)],
        );
        let writer = ReportWriter::new(dir.path().join(REPORT_DIR));
        let written = writer.write_all(&data).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join(REPORT_DIR).join("Steel").join("Steel.txt"),
                dir.path().join(REPORT_DIR).join("Glass").join("Glass.txt"),
            ]
        );
        let steel = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(
            steel,
            "Total quantity of material: 8\n\
             Average material used: 4.00\n\
             Total material cost: 80.00\n"
        );
    }

    #[test]
    fn write_all_fn_overwrites_previous_reports() {
        let dir = TempDir::new().unwrap();
        let data = Dataset::new(
            vec![],
            vec![material("M1", "Steel", "10.00")],
            vec![project("M1", "C1", 5)],
        );
        let writer = ReportWriter::new(dir.path());
        let path = writer.write_all(&data).unwrap().remove(0);
        let first = fs::read(&path).unwrap();
        fs::write(&path, "stale content that is longer than the report itself\n".repeat(3))
            .unwrap();
        writer.write_all(&data).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn folder_name_fn_keeps_ordinary_names() {
        let writer = ReportWriter::new("out");
        assert_eq!(writer.folder_name("Ladrillo Rojo"), "Ladrillo Rojo");
        assert_eq!(writer.folder_name("a:b*c?"), "a_b_c_");
        assert_eq!(writer.folder_name(""), "_");
    }

    #[test]
    fn folder_name_fn_is_the_same_for_every_writer() {
        let first = ReportWriter::new("a");
        let second = ReportWriter::new("b");
        assert_eq!(first.folder_name("x<y>z"), second.folder_name("x<y>z"));
        assert_eq!(second.folder_name("x<y>z"), "x_y_z");
    }
}
