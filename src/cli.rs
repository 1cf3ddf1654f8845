use clap::Parser;
use tracing::Level;

use std::path::PathBuf;

use matreport::{Columns, Inputs, OnInvalid, GRAPH_DIR, REPORT_DIR};

/// Reports construction material usage from client, material and project
/// CSV files.
///
/// Writes one text report per material, then offers to draw a bar chart of
/// quantity by category or a pie chart of projects by city.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Clients CSV file
    #[arg(long, value_name = "FILE", env = "MATREPORT_CLIENTS")]
    pub clients: PathBuf,

    /// Materials CSV file
    #[arg(long, value_name = "FILE", env = "MATREPORT_MATERIALS")]
    pub materials: PathBuf,

    /// Projects CSV file
    #[arg(long, value_name = "FILE", env = "MATREPORT_PROJECTS")]
    pub projects: PathBuf,

    /// Folder for the per-material text reports
    #[arg(long, value_name = "DIR", default_value = REPORT_DIR, env = "MATREPORT_REPORT_DIR")]
    pub report_dir: PathBuf,

    /// Folder for chart images
    #[arg(long, value_name = "DIR", default_value = GRAPH_DIR, env = "MATREPORT_GRAPH_DIR")]
    pub graph_dir: PathBuf,

    /// Skip rows with unparseable numbers instead of stopping
    #[arg(long)]
    pub skip_invalid: bool,

    /// Show debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

/// Column header overrides.
#[derive(clap::Args, Debug)]
#[command(next_help_heading = "Columns")]
pub struct ColumnArgs {
    /// Client id column
    #[arg(long, value_name = "NAME", default_value = "Id")]
    pub client_id_col: String,

    /// Client city column
    #[arg(long, value_name = "NAME", default_value = "Ciudad")]
    pub client_city_col: String,

    /// Material id column
    #[arg(long, value_name = "NAME", default_value = "ID")]
    pub material_id_col: String,

    /// Material name column
    #[arg(long, value_name = "NAME", default_value = "Nombre")]
    pub material_name_col: String,

    /// Material unit value column
    #[arg(long, value_name = "NAME", default_value = "Valor Unitario")]
    pub material_value_col: String,

    /// Material category column
    #[arg(long, value_name = "NAME", default_value = "Categoria")]
    pub material_category_col: String,

    /// Project material id column
    #[arg(long, value_name = "NAME", default_value = "ID Material")]
    pub project_material_col: String,

    /// Project client id column
    #[arg(long, value_name = "NAME", default_value = "ID Client")]
    pub project_client_col: String,

    /// Project quantity column
    #[arg(long, value_name = "NAME", default_value = "Cantidad")]
    pub project_quantity_col: String,
}

impl Args {
    #[must_use]
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }

    #[must_use]
    pub fn inputs(&self) -> Inputs {
        Inputs {
            clients: self.clients.clone(),
            materials: self.materials.clone(),
            projects: self.projects.clone(),
            columns: self.columns.to_columns(),
            on_invalid: if self.skip_invalid {
                OnInvalid::Skip
            } else {
                OnInvalid::Fail
            },
        }
    }
}

impl ColumnArgs {
    fn to_columns(&self) -> Columns {
        Columns {
            client_id: self.client_id_col.clone(),
            client_city: self.client_city_col.clone(),
            material_id: self.material_id_col.clone(),
            material_name: self.material_name_col.clone(),
            material_unit_value: self.material_value_col.clone(),
            material_category: self.material_category_col.clone(),
            project_material_id: self.project_material_col.clone(),
            project_client_id: self.project_client_col.clone(),
            project_quantity: self.project_quantity_col.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "matreport",
            "--clients",
            "c.csv",
            "--materials",
            "m.csv",
            "--projects",
            "p.csv",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn args_default_to_standard_folders_and_columns() {
        let args = parse(&[]);
        assert_eq!(args.report_dir, PathBuf::from("Materials report"));
        assert_eq!(args.graph_dir, PathBuf::from("Graph reports"));
        let inputs = args.inputs();
        assert_eq!(inputs.columns, Columns::default());
        assert_eq!(inputs.on_invalid, OnInvalid::Fail);
        assert_eq!(args.log_level(), Level::WARN);
    }

    #[test]
    fn args_accept_column_overrides_and_skip_invalid() {
        let args = parse(&["--project-quantity-col", "Qty", "--skip-invalid", "-v"]);
        let inputs = args.inputs();
        assert_eq!(inputs.columns.project_quantity, "Qty");
        assert_eq!(inputs.on_invalid, OnInvalid::Skip);
        assert_eq!(args.log_level(), Level::DEBUG);
    }

    #[test]
    fn args_reject_verbose_with_quiet() {
        let argv = [
            "matreport", "--clients", "c", "--materials", "m", "--projects", "p", "-v", "-q",
        ];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
