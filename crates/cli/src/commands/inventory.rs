//! Inventory report.

use std::fmt::Write;

use joyeria_admin::api::ApiClient;
use joyeria_admin::services::inventory::{GoldSummary, split_archived};

use super::{CliError, emit};

/// Print grams on hand per gold grade, archived garments excluded.
///
/// # Errors
///
/// Returns an error if the garment list cannot be loaded.
pub async fn summary(api: &ApiClient) -> Result<(), CliError> {
    let (active, _) = split_archived(api.list_garments().await?);
    emit(&render(&GoldSummary::summarised(&active)));
    Ok(())
}

fn render(summaries: &[GoldSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>14} {:>14} {:>14} {:>14} {:>9}",
        "Material", "Normal", "Chatarra", "Recuperable", "Total", "Registros"
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<16} {:>14} {:>14} {:>14} {:>14} {:>9}",
            s.kind.to_string(),
            s.regular.to_string(),
            s.scrap.to_string(),
            s.recoverable.to_string(),
            s.total.to_string(),
            s.units
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use joyeria_admin::api::Garment;

    use super::*;

    #[test]
    fn test_render_one_line_per_grade() {
        let garments: Vec<Garment> = serde_json::from_value(serde_json::json!([
            {"id": 1, "nombre": "Anillo", "gramos": "2.5", "existencia": 2,
             "tipo_oro_nombre": "NACIONAL"},
            {"id": 2, "nombre": "Cadena", "gramos": "10", "existencia": 1,
             "tipo_oro_nombre": "ITALIANO", "es_chatarra": true}
        ]))
        .unwrap();
        let summaries = GoldSummary::summarised(&garments);
        let report = render(&summaries);
        assert_eq!(report.lines().count(), summaries.len() + 1);
        assert!(report.contains("5,00 g"));
        assert!(report.contains("10,00 g"));
    }
}
