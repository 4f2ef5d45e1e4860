//! HTML rendering of ranked results for email delivery.

use std::path::Path;

use crate::table::RankedTable;

const STYLE: &str = "\
table { border-collapse: collapse; width: 100%; font-family: Arial, sans-serif; } \
th, td { padding: 8px 12px; border: 1px solid #dddddd; text-align: center; } \
th { background-color: #009879; color: #ffffff; } \
tr:nth-child(even) { background-color: #f2f2f2; } \
tr:nth-child(odd) { background-color: #ffffff; }";

/// Builds the HTML body for result emails: a heading, the ranked table and
/// a note pointing at the CSV attachment. Cell text is escaped. Scores are
/// shown with four decimals; the attachment keeps full precision.
pub fn html_report(table: &RankedTable) -> String {
    let mut rows = String::new();
    let header_cells: String = table
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape::encode_text(h)))
        .collect();
    rows.push_str(&format!("<tr>{header_cells}</tr>"));
    for row in &table.rows {
        let mut cells: String = row
            .cells
            .iter()
            .map(|c| format!("<td>{}</td>", html_escape::encode_text(c)))
            .collect();
        cells.push_str(&format!("<td>{:.4}</td>", row.score));
        cells.push_str(&format!("<td>{}</td>", row.rank));
        rows.push_str(&format!("<tr>{cells}</tr>"));
    }
    format!(
        "<html><head><style>{STYLE}</style></head><body>\
         <h2 style=\"color: #2e7d32;\">Here are your TOPSIS Results</h2>\
         <p>The full result table is attached as a CSV file.</p>\
         <table>{rows}</table>\
         <p style=\"color: #888888; font-size: 12px;\">Generated by Topsis Webservice</p>\
         </body></html>"
    )
}

/// Names the result attachment after the uploaded file: `phones.csv`
/// becomes `result_phones.csv`. Falls back to `result_data.csv` when no
/// usable stem exists.
pub fn result_filename(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("data");
    format!("result_{stem}.csv")
}
