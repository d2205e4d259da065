//! Markdown catalog tables.
//!
//! [`render_table`] applies a [`TableView`] to the catalog records, lays the
//! cells out with `tabled`'s markdown style and then rewrites the header
//! underline into an alignment row (`:---:` for centered columns).

use tabled::builder::Builder;
use tabled::settings::Style;

use syncwright_core::{ExchangeRecord, TableView};

use crate::countries::country_name;

pub const COUNTRY_COLUMN: &str = "country / region";

const BASE_COLUMNS: &[&str] = &["logo", "id", "name", "ver", "certified", "pro"];

const CERTIFIED_BADGE: &str = "[![Certified](https://img.shields.io/badge/Certified-green.svg)](#certified)";
const PRO_BADGE: &str = "[![Pro](https://img.shields.io/badge/Pro-black.svg)](#pro)";

/// Column headers of `view`, left to right.
pub fn columns(view: TableView) -> Vec<&'static str> {
    match view {
        TableView::Full => BASE_COLUMNS.to_vec(),
        TableView::Certified => {
            let mut cols = BASE_COLUMNS.to_vec();
            cols.push("discount");
            cols
        }
        TableView::ByCountry => {
            let mut cols = vec![COUNTRY_COLUMN];
            cols.extend_from_slice(BASE_COLUMNS);
            cols
        }
    }
}

/// Integer percentage of a discount fraction (`0.1` ⇒ `10`).
pub fn discount_percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// Referral badge. The badge service cannot print a literal minus sign, so it
/// is sent as the escape `%2d`.
pub fn discount_badge(record: &ExchangeRecord) -> Option<String> {
    let fraction = record.discount?;
    let referral = record.urls.referral.as_deref()?;
    let pct = discount_percent(fraction);
    Some(format!(
        "[![Sign up with {name} using the referral link for a {pct}% discount!](https://img.shields.io/static/v1?label=Fee&message=%2d{pct}%25&color=orange)]({referral})",
        name = escape_cell(&record.name),
    ))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn base_cells(record: &ExchangeRecord) -> Vec<String> {
    let id = escape_cell(record.id.as_str());
    let website = record.urls.website.as_deref();

    let logo = match (record.urls.logo.as_deref(), website) {
        (Some(logo), Some(site)) => format!("[![{id}]({logo})]({site})"),
        (Some(logo), None) => format!("![{id}]({logo})"),
        _ => String::new(),
    };
    let name = match website {
        Some(site) => format!("[{}]({site})", escape_cell(&record.name)),
        None => escape_cell(&record.name),
    };
    let version = match (record.version.as_deref(), record.urls.doc.as_deref()) {
        (Some(v), Some(doc)) => format!("[{v}]({doc})"),
        (Some(v), None) => v.to_string(),
        (None, _) => "*".to_string(),
    };
    let certified = if record.certified { CERTIFIED_BADGE } else { "" };
    let pro = if record.pro { PRO_BADGE } else { "" };

    vec![
        logo,
        id,
        name,
        version,
        certified.to_string(),
        pro.to_string(),
    ]
}

fn rows(records: &[&ExchangeRecord], view: TableView) -> Vec<Vec<String>> {
    match view {
        TableView::Full => records.iter().map(|r| base_cells(r)).collect(),
        TableView::Certified => records
            .iter()
            .filter(|r| r.certified)
            .map(|r| {
                let mut cells = base_cells(r);
                cells.push(discount_badge(r).unwrap_or_default());
                cells
            })
            .collect(),
        TableView::ByCountry => {
            let mut keyed: Vec<(String, String, Vec<String>)> = Vec::new();
            for record in records {
                let names: Vec<String> = if record.countries.is_empty() {
                    vec![String::new()]
                } else {
                    record
                        .countries
                        .iter()
                        .map(|c| country_name(c).to_string())
                        .collect()
                };
                for country in names {
                    let mut cells = vec![country.clone()];
                    cells.extend(base_cells(record));
                    keyed.push((country, record.id.0.clone(), cells));
                }
            }
            keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            keyed.into_iter().map(|(_, _, cells)| cells).collect()
        }
    }
}

/// Render `records` as a markdown table, newline-terminated.
pub fn render_table(records: &[&ExchangeRecord], view: TableView, centered: &[String]) -> String {
    let headers = columns(view);

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows(records, view) {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::markdown());

    let rendered = table.to_string();
    let mut lines: Vec<String> = rendered.lines().map(str::to_owned).collect();
    if let Some(header) = lines.first() {
        let alignment = alignment_row(header, &headers, centered);
        if lines.len() > 1 && lines[1].starts_with("|-") {
            lines[1] = alignment;
        } else {
            lines.insert(1, alignment);
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Markdown alignment row with the same cell widths as `header`.
fn alignment_row(header: &str, columns: &[&str], centered: &[String]) -> String {
    let inner = header.trim_start_matches('|').trim_end_matches('|');
    let mut row = String::from("|");
    for (i, segment) in inner.split('|').enumerate() {
        let width = segment.chars().count().max(3);
        let center = columns
            .get(i)
            .map(|c| centered.iter().any(|name| name == c))
            .unwrap_or(false);
        if center {
            row.push(':');
            row.push_str(&"-".repeat(width - 2));
            row.push(':');
        } else {
            row.push_str(&"-".repeat(width));
        }
        row.push('|');
    }
    row
}
