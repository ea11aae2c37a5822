//! Data table component types.
//!
//! Column definitions and the click-to-sort state shared by list pages. Sorting
//! is driven by query parameters (`?sort=<key>&dir=asc|desc`) so every header
//! is a plain link.

use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column, also the sort key.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is sortable.
    pub sortable: bool,
    /// Right-align numeric columns.
    pub numeric: bool,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: true,
            numeric: false,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: false,
            numeric: false,
        }
    }

    /// Mark the column as numeric.
    #[must_use]
    pub const fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }
}

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Which column a table is sorted by, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Build from query parameters. Unknown keys and directions mean unsorted.
    #[must_use]
    pub fn from_query(key: Option<&str>, direction: Option<&str>, allowed: &[&str]) -> Self {
        let key = key.filter(|k| allowed.contains(k));
        let direction = direction.and_then(SortDirection::parse);
        match (key, direction) {
            (Some(key), Some(direction)) => Self {
                key: Some(key.to_string()),
                direction: Some(direction),
            },
            _ => Self::default(),
        }
    }

    /// The state after clicking `key`: a new column starts ascending, then
    /// descending, then back to unsorted.
    #[must_use]
    pub fn next(&self, key: &str) -> Self {
        if self.key.as_deref() != Some(key) {
            return Self {
                key: Some(key.to_string()),
                direction: Some(SortDirection::Asc),
            };
        }
        match self.direction {
            Some(SortDirection::Asc) => Self {
                key: Some(key.to_string()),
                direction: Some(SortDirection::Desc),
            },
            _ => Self::default(),
        }
    }

    /// Direction applied to `key`, if it is the sorted column.
    #[must_use]
    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        if self.key.as_deref() == Some(key) {
            self.direction
        } else {
            None
        }
    }

    /// Arrow shown next to a header.
    #[must_use]
    pub fn indicator(&self, key: &str) -> &'static str {
        match self.direction_for(key) {
            Some(SortDirection::Asc) => "▲",
            Some(SortDirection::Desc) => "▼",
            None => "",
        }
    }

    /// Query fragment (`sort=..&dir=..`) for this state, empty when unsorted.
    #[must_use]
    pub fn query(&self) -> String {
        match (&self.key, self.direction) {
            (Some(key), Some(direction)) => format!("sort={key}&dir={}", direction.as_str()),
            _ => String::new(),
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for empty state.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            search_placeholder: "Buscar...".to_string(),
            empty_title: "No hay registros".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state title.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Keys of the sortable columns.
    #[must_use]
    pub fn sort_keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key.as_str())
            .collect()
    }
}

/// Build the inventory table configuration.
#[must_use]
pub fn inventory_table_config() -> DataTableConfig {
    DataTableConfig::new("inventory")
        .column(TableColumn::sortable("nombre", "Producto"))
        .column(TableColumn::sortable("tipo_prenda", "Categoría"))
        .column(TableColumn::sortable("tipo_oro", "Material"))
        .column(TableColumn::sortable("peso", "Peso").numeric())
        .column(TableColumn::sortable("existencia", "Cantidad").numeric())
        .column(TableColumn::sortable("chatarra", "Chatarra"))
        .column(TableColumn::sortable("recuperable", "Recuperable"))
        .column(TableColumn::new("acciones", ""))
        .search_placeholder("Buscar prenda por nombre...")
        .empty_state("No se encontraron prendas")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycle() {
        let none = SortState::default();
        let asc = none.next("peso");
        assert_eq!(asc.direction_for("peso"), Some(SortDirection::Asc));
        let desc = asc.next("peso");
        assert_eq!(desc.direction_for("peso"), Some(SortDirection::Desc));
        assert_eq!(desc.next("peso"), SortState::default());

        // Switching column restarts ascending
        let other = desc.next("nombre");
        assert_eq!(other.direction_for("nombre"), Some(SortDirection::Asc));
        assert_eq!(other.direction_for("peso"), None);
    }

    #[test]
    fn test_from_query_rejects_unknown_keys() {
        let config = inventory_table_config();
        let keys = config.sort_keys();
        assert_eq!(
            SortState::from_query(Some("peso"), Some("desc"), &keys).query(),
            "sort=peso&dir=desc"
        );
        assert_eq!(
            SortState::from_query(Some("acciones"), Some("asc"), &keys),
            SortState::default()
        );
        assert_eq!(
            SortState::from_query(Some("peso"), Some("sideways"), &keys),
            SortState::default()
        );
    }

    #[test]
    fn test_indicator() {
        let state = SortState::default().next("existencia");
        assert_eq!(state.indicator("existencia"), "▲");
        assert_eq!(state.indicator("nombre"), "");
    }
}
