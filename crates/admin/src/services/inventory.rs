//! Inventory derivations: gold summaries, list filters, sorting, and the
//! garment form.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use joyeria_core::{GarmentTypeId, GoldKind, GoldTypeId, Grams};
use serde::Deserialize;

use crate::api::{Garment, GarmentPatch, NewGarment};
use crate::components::data_table::{SortDirection, SortState};
use crate::error::ValidationError;

/// Selector value that disables a filter.
pub const ALL: &str = "Todos";

/// Split garments into (active, archived), keeping API order.
#[must_use]
pub fn split_archived(garments: Vec<Garment>) -> (Vec<Garment>, Vec<Garment>) {
    garments.into_iter().partition(|g| !g.archivado)
}

fn distinct<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    names
        .filter(|n| !n.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct garment category names, sorted, for the category selector.
#[must_use]
pub fn garment_type_names(garments: &[Garment]) -> Vec<String> {
    distinct(garments.iter().map(|g| &g.tipo_prenda_nombre))
}

/// Distinct gold grade names, sorted, for the material selector.
#[must_use]
pub fn gold_type_names(garments: &[Garment]) -> Vec<String> {
    distinct(garments.iter().map(|g| &g.tipo_oro_nombre))
}

// =============================================================================
// Gold summaries
// =============================================================================

/// Grams on hand for one gold grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldSummary {
    pub kind: GoldKind,
    /// Neither scrap nor recoverable.
    pub regular: Grams,
    pub scrap: Grams,
    pub recoverable: Grams,
    /// Sum of the three columns; a garment flagged both ways is in both.
    pub total: Grams,
    /// Number of garment records of this grade.
    pub units: usize,
}

impl GoldSummary {
    #[must_use]
    pub fn for_kind(garments: &[Garment], kind: &GoldKind) -> Self {
        let of_kind: Vec<&Garment> = garments
            .iter()
            .filter(|g| kind.matches(&g.tipo_oro_nombre))
            .collect();

        let grams_where = |pred: &dyn Fn(&Garment) -> bool| -> Grams {
            of_kind
                .iter()
                .filter(|g| pred(g))
                .map(|g| g.stock_grams())
                .sum()
        };

        let regular = grams_where(&Garment::is_regular);
        let scrap = grams_where(&|g| g.es_chatarra);
        let recoverable = grams_where(&|g| g.es_recuperable);

        Self {
            kind: kind.clone(),
            regular,
            scrap,
            recoverable,
            total: regular + scrap + recoverable,
            units: of_kind.len(),
        }
    }

    /// Summaries for the grades shown on the inventory page.
    #[must_use]
    pub fn summarised(garments: &[Garment]) -> Vec<Self> {
        GoldKind::SUMMARISED
            .iter()
            .map(|kind| Self::for_kind(garments, kind))
            .collect()
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Inventory list filters, decoded from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GarmentFilter {
    #[serde(default, rename = "q")]
    pub search: String,
    #[serde(default)]
    pub gold: Option<String>,
    #[serde(default)]
    pub garment_type: Option<String>,
    #[serde(default)]
    pub scrap_only: Option<String>,
    #[serde(default)]
    pub recoverable_only: Option<String>,
}

impl GarmentFilter {
    fn selector(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty() && *v != ALL)
    }

    #[must_use]
    pub fn gold_selected(&self) -> &str {
        Self::selector(self.gold.as_deref()).unwrap_or(ALL)
    }

    #[must_use]
    pub fn garment_type_selected(&self) -> &str {
        Self::selector(self.garment_type.as_deref()).unwrap_or(ALL)
    }

    #[must_use]
    pub const fn scrap(&self) -> bool {
        self.scrap_only.is_some()
    }

    #[must_use]
    pub const fn recoverable(&self) -> bool {
        self.recoverable_only.is_some()
    }

    /// # Errors
    ///
    /// Scrap-only and recoverable-only cannot both be set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scrap() && self.recoverable() {
            return Err(ValidationError::new(
                "scrap_only",
                "No puede seleccionar 'Chatarra' y 'Recuperable' al mismo tiempo.",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn matches(&self, garment: &Garment) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty() && !garment.nombre.to_lowercase().contains(&search) {
            return false;
        }
        if let Some(gold) = Self::selector(self.gold.as_deref())
            && garment.tipo_oro_nombre != gold
        {
            return false;
        }
        if let Some(kind) = Self::selector(self.garment_type.as_deref())
            && garment.tipo_prenda_nombre != kind
        {
            return false;
        }
        if self.scrap() && !garment.es_chatarra {
            return false;
        }
        if self.recoverable() && !garment.es_recuperable {
            return false;
        }
        true
    }

    /// Apply the filter, preserving order.
    #[must_use]
    pub fn apply(&self, garments: Vec<Garment>) -> Vec<Garment> {
        garments.into_iter().filter(|g| self.matches(g)).collect()
    }
}

// =============================================================================
// Sorting
// =============================================================================

fn compare(a: &Garment, b: &Garment, key: &str) -> Ordering {
    match key {
        "nombre" => a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()),
        "tipo_prenda" => a
            .tipo_prenda_nombre
            .to_lowercase()
            .cmp(&b.tipo_prenda_nombre.to_lowercase()),
        "tipo_oro" => a
            .tipo_oro_nombre
            .to_lowercase()
            .cmp(&b.tipo_oro_nombre.to_lowercase()),
        "peso" => a.stock_grams().cmp(&b.stock_grams()),
        "existencia" => a.existencia.cmp(&b.existencia),
        "chatarra" => a.es_chatarra.cmp(&b.es_chatarra),
        "recuperable" => a.es_recuperable.cmp(&b.es_recuperable),
        _ => Ordering::Equal,
    }
}

/// Sort in place. An unsorted state leaves API order untouched.
pub fn sort_garments(garments: &mut [Garment], sort: &SortState) {
    let (Some(key), Some(direction)) = (sort.key.as_deref(), sort.direction) else {
        return;
    };
    garments.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

// =============================================================================
// Garment form
// =============================================================================

/// Raw garment form fields. Checkboxes are present only when ticked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GarmentForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub gramos: String,
    #[serde(default)]
    pub existencia: String,
    #[serde(default)]
    pub tipo_oro: String,
    #[serde(default)]
    pub tipo_prenda: String,
    #[serde(default)]
    pub es_chatarra: Option<String>,
    #[serde(default)]
    pub es_recuperable: Option<String>,
}

impl From<&Garment> for GarmentForm {
    fn from(garment: &Garment) -> Self {
        Self {
            nombre: garment.nombre.clone(),
            gramos: garment.gramos.value().to_string(),
            existencia: garment.existencia.to_string(),
            tipo_oro: garment.tipo_oro.map(|id| id.to_string()).unwrap_or_default(),
            tipo_prenda: garment
                .tipo_prenda
                .map(|id| id.to_string())
                .unwrap_or_default(),
            es_chatarra: garment.es_chatarra.then(|| "on".to_string()),
            es_recuperable: garment.es_recuperable.then(|| "on".to_string()),
        }
    }
}

impl GarmentForm {
    #[must_use]
    pub const fn scrap(&self) -> bool {
        self.es_chatarra.is_some()
    }

    #[must_use]
    pub const fn recoverable(&self) -> bool {
        self.es_recuperable.is_some()
    }

    fn name(&self) -> Result<String, ValidationError> {
        let name = self.nombre.trim();
        if name.is_empty() {
            return Err(ValidationError::new("nombre", "El nombre es obligatorio"));
        }
        Ok(name.to_string())
    }

    fn grams(&self) -> Result<Grams, ValidationError> {
        Grams::parse_input(&self.gramos)
            .filter(|g| !g.is_negative())
            .ok_or_else(|| {
                ValidationError::new("gramos", "Los gramos deben ser un número mayor o igual a 0")
            })
    }

    fn stock(&self) -> Result<i64, ValidationError> {
        self.existencia
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| {
                ValidationError::new(
                    "existencia",
                    "La existencia debe ser un número entero mayor o igual a 0",
                )
            })
    }

    /// Validate a new garment.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails: name, grams, stock, gold type,
    /// garment type.
    pub fn validate_new(&self) -> Result<NewGarment, ValidationError> {
        let nombre = self.name()?;
        let gramos = self.grams()?;
        let existencia = self.stock()?;
        let tipo_oro = parse_id(&self.tipo_oro)
            .map(GoldTypeId::new)
            .ok_or_else(|| ValidationError::new("tipo_oro", "Seleccione el tipo de oro"))?;
        let tipo_prenda = parse_id(&self.tipo_prenda)
            .map(GarmentTypeId::new)
            .ok_or_else(|| ValidationError::new("tipo_prenda", "Seleccione el tipo de prenda"))?;

        Ok(NewGarment {
            nombre,
            gramos: gramos.value(),
            tipo_oro,
            tipo_prenda,
            existencia,
            es_chatarra: self.scrap(),
            es_recuperable: self.recoverable(),
        })
    }

    /// Validate an edit. Only name, grams, and the two flags are editable.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or negative grams.
    pub fn validate_edit(&self) -> Result<GarmentPatch, ValidationError> {
        Ok(GarmentPatch {
            nombre: Some(self.name()?),
            gramos: Some(self.grams()?.value()),
            es_chatarra: Some(self.scrap()),
            es_recuperable: Some(self.recoverable()),
            ..GarmentPatch::default()
        })
    }
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn garment(id: i64, name: &str, gold: &str, grams: &str, stock: i64) -> Garment {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "nombre": name,
            "gramos": grams,
            "tipo_oro_nombre": gold,
            "tipo_prenda_nombre": "Anillo",
            "existencia": stock,
        }))
        .unwrap()
    }

    fn grams(text: &str) -> Grams {
        Grams::new(Decimal::from_str(text).unwrap())
    }

    #[test]
    fn test_gold_summary_splits_by_flag() {
        let mut scrap = garment(2, "Chatarra mixta", "ITALIANO", "10", 1);
        scrap.es_chatarra = true;
        let mut recoverable = garment(3, "Pulsera rota", "ITALIANO", "2.5", 2);
        recoverable.es_recuperable = true;
        let garments = vec![
            garment(1, "Cadena", "ITALIANO", "4.5", 3),
            scrap,
            recoverable,
            garment(4, "Anillo", "NACIONAL", "3", 1),
        ];

        let summary = GoldSummary::for_kind(&garments, &GoldKind::Italian);
        assert_eq!(summary.regular, grams("13.5"));
        assert_eq!(summary.scrap, grams("10"));
        assert_eq!(summary.recoverable, grams("5"));
        assert_eq!(summary.total, grams("28.5"));
        assert_eq!(summary.units, 3);

        let national = GoldSummary::for_kind(&garments, &GoldKind::National);
        assert_eq!(national.total, grams("3"));
        assert_eq!(national.units, 1);
    }

    #[test]
    fn test_gold_summary_counts_every_recoverable_garment() {
        let mut both = garment(5, "Esclava partida", "ITALIANO", "3", 2);
        both.es_chatarra = true;
        both.es_recuperable = true;
        let mut recoverable = garment(6, "Argolla", "ITALIANO", "1.5", 1);
        recoverable.es_recuperable = true;
        let garments = vec![garment(1, "Cadena", "ITALIANO", "4.5", 1), both, recoverable];

        let summary = GoldSummary::for_kind(&garments, &GoldKind::Italian);
        assert_eq!(summary.regular, grams("4.5"));
        assert_eq!(summary.scrap, grams("6"));
        assert_eq!(summary.recoverable, grams("7.5"));
        assert_eq!(summary.total, grams("18"));
        assert_eq!(summary.units, 3);
    }

    #[test]
    fn test_split_archived() {
        let mut archived = garment(2, "Vieja", "NACIONAL", "1", 0);
        archived.archivado = true;
        let (active, archived) =
            split_archived(vec![garment(1, "Nueva", "NACIONAL", "1", 1), archived]);
        assert_eq!(active.len(), 1);
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].nombre, "Vieja");
    }

    #[test]
    fn test_filter_search_and_selectors() {
        let garments = vec![
            garment(1, "Cadena Lazo", "ITALIANO", "4", 1),
            garment(2, "Anillo liso", "NACIONAL", "2", 1),
            garment(3, "cadena cubana", "NACIONAL", "8", 1),
        ];
        let filter = GarmentFilter {
            search: "CADENA".to_string(),
            gold: Some(ALL.to_string()),
            ..GarmentFilter::default()
        };
        let ids: Vec<i64> = filter
            .apply(garments.clone())
            .iter()
            .map(|g| g.id.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);

        let filter = GarmentFilter {
            search: "cadena".to_string(),
            gold: Some("NACIONAL".to_string()),
            ..GarmentFilter::default()
        };
        assert_eq!(filter.apply(garments).len(), 1);
    }

    #[test]
    fn test_filter_rejects_scrap_and_recoverable_together() {
        let filter = GarmentFilter {
            scrap_only: Some("on".to_string()),
            recoverable_only: Some("on".to_string()),
            ..GarmentFilter::default()
        };
        assert!(filter.validate().is_err());
        assert!(GarmentFilter::default().validate().is_ok());
    }

    #[test]
    fn test_sort_by_weight_and_back_to_api_order() {
        let mut garments = vec![
            garment(1, "b", "ITALIANO", "4", 1),
            garment(2, "a", "ITALIANO", "1", 10),
            garment(3, "c", "ITALIANO", "3", 1),
        ];
        let asc = SortState::default().next("peso");
        sort_garments(&mut garments, &asc);
        let ids: Vec<i64> = garments.iter().map(|g| g.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let desc = asc.next("peso");
        sort_garments(&mut garments, &desc);
        let ids: Vec<i64> = garments.iter().map(|g| g.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        sort_garments(&mut garments, &desc.next("peso"));
        let ids: Vec<i64> = garments.iter().map(|g| g.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut garments = vec![
            garment(1, "zafiro", "ITALIANO", "1", 1),
            garment(2, "Anillo", "ITALIANO", "1", 1),
            garment(3, "broche", "ITALIANO", "1", 1),
        ];
        sort_garments(&mut garments, &SortState::default().next("nombre"));
        let names: Vec<&str> = garments.iter().map(|g| g.nombre.as_str()).collect();
        assert_eq!(names, vec!["Anillo", "broche", "zafiro"]);
    }

    #[test]
    fn test_garment_form_validation() {
        let form = GarmentForm {
            nombre: "  ".to_string(),
            gramos: "2".to_string(),
            existencia: "1".to_string(),
            ..GarmentForm::default()
        };
        assert_eq!(form.validate_new().unwrap_err().field, "nombre");

        let form = GarmentForm {
            nombre: "Anillo".to_string(),
            gramos: "-1".to_string(),
            existencia: "1".to_string(),
            ..GarmentForm::default()
        };
        assert_eq!(form.validate_new().unwrap_err().field, "gramos");

        let form = GarmentForm {
            nombre: "Anillo".to_string(),
            gramos: "2.5".to_string(),
            existencia: "-3".to_string(),
            ..GarmentForm::default()
        };
        assert_eq!(form.validate_new().unwrap_err().field, "existencia");

        let form = GarmentForm {
            nombre: "Anillo".to_string(),
            gramos: "2.5".to_string(),
            existencia: "0".to_string(),
            tipo_oro: "1".to_string(),
            tipo_prenda: "2".to_string(),
            es_chatarra: Some("on".to_string()),
            ..GarmentForm::default()
        };
        let garment = form.validate_new().unwrap();
        assert!(garment.es_chatarra);
        assert!(!garment.es_recuperable);
        assert_eq!(garment.tipo_prenda, GarmentTypeId::new(2));
    }

    #[test]
    fn test_edit_patch_only_touches_editable_fields() {
        let form = GarmentForm {
            nombre: "Anillo".to_string(),
            gramos: "3".to_string(),
            existencia: "garbage".to_string(),
            ..GarmentForm::default()
        };
        let patch = form.validate_edit().unwrap();
        assert_eq!(patch.existencia, None);
        assert_eq!(patch.es_recuperable, Some(false));
    }
}
