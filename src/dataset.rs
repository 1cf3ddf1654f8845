use std::path::PathBuf;

use crate::{
    error::Result,
    index::Index,
    model::{Client, Columns, Material, Project},
    table::{OnInvalid, Table},
};

/// Where to find the three input files, and how to read them.
#[derive(Clone, Debug)]
pub struct Inputs {
    pub clients: PathBuf,
    pub materials: PathBuf,
    pub projects: PathBuf,
    pub columns: Columns,
    pub on_invalid: OnInvalid,
}

/// All the data for one reporting run.
///
/// A `Dataset` is built once, at start-up, and never changes afterwards;
/// every aggregation borrows it.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    clients: Vec<Client>,
    materials: Vec<Material>,
    projects: Vec<Project>,
}

impl Dataset {
    #[must_use]
    pub fn new(clients: Vec<Client>, materials: Vec<Material>, projects: Vec<Project>) -> Self {
        Self {
            clients,
            materials,
            projects,
        }
    }

    /// Reads and converts the three input files.
    ///
    /// # Errors
    ///
    /// Returns the first error from reading or converting any of the files;
    /// all three must exist before anything is aggregated.
    pub fn load(inputs: &Inputs) -> Result<Self> {
        let clients = Table::read_csv(&inputs.clients)?;
        let materials = Table::read_csv(&inputs.materials)?;
        let projects = Table::read_csv(&inputs.projects)?;
        let cols = &inputs.columns;
        Ok(Self {
            clients: cols.clients(&clients, inputs.on_invalid)?,
            materials: cols.materials(&materials, inputs.on_invalid)?,
            projects: cols.projects(&projects, inputs.on_invalid)?,
        })
    }

    #[must_use]
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Returns a lookup of clients by id.
    #[must_use]
    pub fn client_index(&self) -> Index<'_, Client> {
        Index::build(&self.clients, |c| c.id.as_str())
    }
}
