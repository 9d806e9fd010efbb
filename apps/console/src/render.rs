//! Plain-text rendering of command results.
//!
//! Column widths count characters, so Cyrillic values line up.

use std::fmt::Write;

use equip_core::report::{BranchCount, StackedCounts};

use crate::commands::config::{AboutInfo, HELP};
use crate::commands::unit::EditReport;
use crate::commands::UnitCard;

const UNKNOWN_DATE: &str = "-";

pub fn unit_card(card: &UnitCard) -> String {
    let date = card.first_seen.as_deref().unwrap_or(UNKNOWN_DATE);
    format!(
        "[{pool}] {branch} / {imei}\n  \
         brand:     {brand}\n  \
         model:     {model}\n  \
         status:    {status}\n  \
         condition: {condition}\n  \
         location:  {location}\n  \
         date:      {date}\n  \
         warranty:  {warranty}",
        pool = card.pool,
        branch = card.branch,
        imei = card.imei,
        brand = card.brand,
        model = card.model,
        status = card.status,
        condition = card.condition,
        location = card.location,
        warranty = card.warranty.label(),
    )
}

/// One row per unit under a header row.
pub fn unit_table(cards: &[UnitCard]) -> String {
    if cards.is_empty() {
        return "No units.".to_string();
    }

    let header = [
        "pool", "branch", "imei", "brand", "model", "status", "condition", "location", "date",
    ];
    let rows: Vec<[String; 9]> = cards
        .iter()
        .map(|card| {
            [
                card.pool.to_string(),
                card.branch.clone(),
                card.imei.clone(),
                card.brand.clone(),
                card.model.clone(),
                card.status.to_string(),
                card.condition.to_string(),
                card.location.to_string(),
                card.first_seen.clone().unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, header.iter().copied(), &widths);
    for row in &rows {
        out.push('\n');
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
}

pub fn ranking(entries: &[BranchCount]) -> String {
    if entries.is_empty() {
        return "No faulty units.".to_string();
    }
    let width = entries
        .iter()
        .map(|entry| entry.branch.chars().count())
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{:>2}. {:<width$}  {}", i + 1, entry.branch, entry.count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Brand rows × category columns, with a total column.
pub fn pivot(counts: &StackedCounts) -> String {
    if counts.is_empty() {
        return "No data.".to_string();
    }

    let brand_width = counts
        .brands
        .iter()
        .map(|brand| brand.chars().count())
        .chain(std::iter::once("brand".len()))
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = counts.categories.iter().map(|c| c.chars().count().max(3)).collect();

    let mut out = format!("{:<brand_width$}", "brand");
    for (category, &width) in counts.categories.iter().zip(&widths) {
        let _ = write!(out, "  {category:>width$}");
    }
    out.push_str("  total");

    for (brand, row) in counts.brands.iter().zip(&counts.counts) {
        let _ = write!(out, "\n{brand:<brand_width$}");
        for (count, &width) in row.iter().zip(&widths) {
            let _ = write!(out, "  {count:>width$}");
        }
        let _ = write!(out, "  {:>5}", row.iter().sum::<usize>());
    }
    out
}

pub fn edit_report(report: &EditReport) -> String {
    let mut lines = Vec::new();
    if report.applied.is_empty() && report.rejected.is_empty() {
        lines.push("Nothing changed.".to_string());
    }
    if !report.applied.is_empty() {
        lines.push(format!("Updated: {}", report.applied.join(", ")));
    }
    for message in &report.rejected {
        lines.push(format!("Rejected: {message}"));
    }
    lines.push(unit_card(&report.unit));
    lines.join("\n")
}

pub fn about(info: &AboutInfo) -> String {
    format!(
        "{} {}\n\
         data directory: {}\n\
         store:          {}\n\
         units:          {} active, {} faulty, {} under diagnostic\n\
         warranty:       {} days from first-seen date\n\
         imei:           {} to {} digits",
        info.name,
        info.version,
        info.data_dir,
        info.store,
        info.counts.active,
        info.counts.faulty,
        info.counts.under_diagnostic,
        info.warranty_days,
        info.imei_digits.0,
        info.imei_digits.1,
    )
}

pub fn help() -> String {
    let width = HELP.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    HELP.iter()
        .map(|(name, text)| format!("  {name:<width$}  {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use equip_core::{Condition, Location, Pool, Status, WarrantyStatus};

    fn card(branch: &str, imei: &str, date: Option<&str>) -> UnitCard {
        UnitCard {
            pool: Pool::Active,
            branch: branch.into(),
            imei: imei.into(),
            brand: "самсунг".into(),
            model: "4567".into(),
            status: Status::Operational,
            condition: Condition::Installed,
            location: Location::Warehouse,
            first_seen: date.map(str::to_string),
            warranty: if date.is_some() {
                WarrantyStatus::Expired
            } else {
                WarrantyStatus::Unknown
            },
        }
    }

    #[test]
    fn test_unit_card_shows_warranty_label() {
        let text = unit_card(&card("альфа", "123", None));
        assert!(text.starts_with("[active] альфа / 123"));
        assert!(text.contains("date:      -"));
        assert!(text.ends_with("warranty:  date unknown"));
    }

    #[test]
    fn test_unit_table_aligns_cyrillic() {
        let text = unit_table(&[
            card("альфа", "1", Some("2020-01-01")),
            card("бета", "22", None),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("pool    branch  imei"));
        assert!(lines[1].starts_with("active  альфа   1   "));
        assert!(lines[2].starts_with("active  бета    22  "));
        assert!(lines[2].ends_with("склад     -"));
    }

    #[test]
    fn test_ranking() {
        let text = ranking(&[
            BranchCount { branch: "бета".into(), count: 2 },
            BranchCount { branch: "альфа".into(), count: 1 },
        ]);
        assert_eq!(text, " 1. бета   2\n 2. альфа  1");
        assert_eq!(ranking(&[]), "No faulty units.");
    }

    #[test]
    fn test_pivot() {
        let counts = StackedCounts {
            brands: vec!["нокиа".into()],
            categories: vec!["склад".into(), "тс".into()],
            counts: vec![vec![1, 2]],
        };
        assert_eq!(pivot(&counts), "brand  склад   тс  total\nнокиа      1    2      3");
    }

    #[test]
    fn test_help_lists_quit() {
        assert!(help().lines().any(|line| line.trim_start().starts_with("quit")));
    }
}
