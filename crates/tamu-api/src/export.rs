// CSV rendering for attendance export
//
// Every field is quoted; embedded quotes are doubled per RFC 4180.

use tamu_storage::ExportRow;

const HEADERS: [&str; 11] = [
    "Guest Name",
    "Institution",
    "Position",
    "Phone",
    "Email",
    "Representative Count",
    "Category",
    "Arrival Time",
    "Event Name",
    "Event Date",
    "Event Location",
];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn row_line(row: &ExportRow) -> String {
    let cells = [
        row.guest_name.clone(),
        row.institution.clone(),
        row.position.clone().unwrap_or_default(),
        row.phone.clone().unwrap_or_default(),
        row.email.clone().unwrap_or_default(),
        row.representative_count.to_string(),
        row.category.clone(),
        row.arrival_time.to_rfc3339(),
        row.event_name.clone(),
        row.event_date.to_rfc3339(),
        row.event_location.clone().unwrap_or_default(),
    ];
    cells
        .iter()
        .map(|c| quote(c))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render export rows as a CSV document, header line first.
pub fn render_csv(rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADERS.join(","));
    lines.extend(rows.iter().map(row_line));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row() -> ExportRow {
        ExportRow {
            guest_name: "Ana Putri".into(),
            institution: "PT \"Maju\", Tbk".into(),
            position: Some("Lecturer".into()),
            phone: None,
            email: Some("ana@example.ac.id".into()),
            representative_count: 3,
            category: "guest".into(),
            arrival_time: Utc.with_ymd_and_hms(2024, 12, 15, 9, 30, 0).unwrap(),
            event_name: "Open Campus Day 2024".into(),
            event_date: Utc.with_ymd_and_hms(2024, 12, 15, 9, 0, 0).unwrap(),
            event_location: None,
        }
    }

    #[test]
    fn header_comes_first() {
        let csv = render_csv(&[]);
        assert_eq!(csv, HEADERS.join(","));
    }

    #[test]
    fn quotes_and_commas_are_escaped() {
        let csv = render_csv(&[row()]);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.contains(r#""PT ""Maju"", Tbk""#));
        assert!(line.starts_with(r#""Ana Putri""#));
    }

    #[test]
    fn absent_optionals_render_empty() {
        let csv = render_csv(&[row()]);
        let line = csv.lines().nth(1).unwrap();
        // phone and event location are empty quoted cells
        assert!(line.contains(r#","","#));
        assert!(line.ends_with(r#""""#));
    }
}
