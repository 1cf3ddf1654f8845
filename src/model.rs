use serde::Deserialize;

use crate::{
    error::Result,
    money::Money,
    table::{OnInvalid, Table},
};

/// City reported for projects whose client is unknown or has no city.
pub const UNKNOWN_CITY: &str = "Unknown";

/// A customer who commissions projects.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Client {
    pub id: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl Client {
    /// Returns the client's city, or [`UNKNOWN_CITY`] if none was given.
    #[must_use]
    pub fn city(&self) -> &str {
        self.city.as_deref().unwrap_or(UNKNOWN_CITY)
    }
}

/// A construction material and its price per unit.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub unit_value: Money,
    pub category: String,
}

/// One use of a material by a client's project.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Project {
    pub material_id: String,
    pub client_id: String,
    pub quantity: u64,
}

/// Names of the CSV columns that hold each field.
///
/// The defaults are the Spanish headers of the source spreadsheets.
#[derive(Clone, Debug, PartialEq)]
pub struct Columns {
    pub client_id: String,
    pub client_city: String,
    pub material_id: String,
    pub material_name: String,
    pub material_unit_value: String,
    pub material_category: String,
    pub project_material_id: String,
    pub project_client_id: String,
    pub project_quantity: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            client_id: "Id".into(),
            client_city: "Ciudad".into(),
            material_id: "ID".into(),
            material_name: "Nombre".into(),
            material_unit_value: "Valor Unitario".into(),
            material_category: "Categoria".into(),
            project_material_id: "ID Material".into(),
            project_client_id: "ID Client".into(),
            project_quantity: "Cantidad".into(),
        }
    }
}

impl Columns {
    /// Converts the clients table. The city column may be absent, in which
    /// case every client's city is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the id column is missing, or a row does not
    /// convert (see [`Table::deserialize`]).
    pub fn clients(&self, table: &Table, on_invalid: OnInvalid) -> Result<Vec<Client>> {
        table.require(&self.client_id)?;
        let mut columns = vec![(self.client_id.as_str(), "id")];
        if table.has_column(&self.client_city) {
            table.require(&self.client_city)?;
            columns.push((self.client_city.as_str(), "city"));
        }
        table.deserialize(&columns, on_invalid)
    }

    /// Converts the materials table.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing, or a unit value is not a
    /// number.
    pub fn materials(&self, table: &Table, on_invalid: OnInvalid) -> Result<Vec<Material>> {
        let columns = [
            (self.material_id.as_str(), "id"),
            (self.material_name.as_str(), "name"),
            (self.material_unit_value.as_str(), "unit_value"),
            (self.material_category.as_str(), "category"),
        ];
        for (header, _) in &columns {
            table.require(header)?;
        }
        table.deserialize(&columns, on_invalid)
    }

    /// Converts the projects table.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing, or a quantity is not a
    /// non-negative integer.
    pub fn projects(&self, table: &Table, on_invalid: OnInvalid) -> Result<Vec<Project>> {
        let columns = [
            (self.project_material_id.as_str(), "material_id"),
            (self.project_client_id.as_str(), "client_id"),
            (self.project_quantity.as_str(), "quantity"),
        ];
        for (header, _) in &columns {
            table.require(header)?;
        }
        table.deserialize(&columns, on_invalid)
    }
}
