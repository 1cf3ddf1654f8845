#![doc = include_str!("../README.md")]
pub mod chart;
pub mod dataset;
pub mod error;
pub mod index;
pub mod menu;
pub mod model;
pub mod money;
pub mod series;
pub mod summary;
pub mod table;

pub use chart::{ChartKind, GRAPH_DIR};
pub use dataset::{Dataset, Inputs};
pub use error::{Error, Result};
pub use index::Index;
pub use menu::select_chart;
pub use model::{Client, Columns, Material, Project, UNKNOWN_CITY};
pub use money::Money;
pub use series::{category_quantities, city_participation, Series};
pub use summary::{MaterialSummary, ReportWriter, REPORT_DIR};
pub use table::{OnInvalid, Row, Table};
