//! CSV renderings of catalogs, statements and settlements.
//!
//! Amounts are written as plain decimals with two fractional digits, rounded
//! once from the unrounded allocation values.

use std::io::Write;

use csv::Writer;
use engine::{CategoryCatalog, MoneyCents, Settlement, Statement, Unit};

fn amount(value: f64) -> String {
    let cents = MoneyCents::from_major(value).cents();
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

pub fn categories<W: Write>(out: W, catalog: &CategoryCatalog) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["code", "name", "name_en", "allocation_method", "is_heating"])?;
    for category in catalog.iter() {
        wtr.write_record([
            category.code.as_str(),
            category.name.as_str(),
            category.name_en.as_deref().unwrap_or_default(),
            category.allocation_method.as_str(),
            if category.is_heating { "yes" } else { "no" },
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn units<W: Write>(out: W, units: &[Unit]) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["unit_id", "label", "area_sqm"])?;
    for unit in units {
        wtr.write_record([unit.id.to_string(), unit.label.clone(), unit.area_sqm.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// One line per unit with its rounded total.
pub fn statement_preview<W: Write>(out: W, statement: &Statement) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["unit_id", "label", "area_sqm", "total"])?;
    for row in statement.preview() {
        wtr.write_record([
            row.unit_id.to_string(),
            row.label,
            row.area_sqm.to_string(),
            amount(row.total.to_major()),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Every (entry, unit) share of the statement.
pub fn statement_details<W: Write>(out: W, statement: &Statement) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["entry_id", "unit_id", "category", "gross", "vat_rate"])?;
    for row in &statement.detail_rows {
        wtr.write_record([
            row.entry_id.to_string(),
            row.unit_id.to_string(),
            row.category_code.clone(),
            amount(row.gross),
            row.vat_rate.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Per category lines followed by the block totals and the balance.
pub fn settlement<W: Write>(out: W, settlement: &Settlement) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["section", "item", "net", "vat", "gross"])?;
    for category in &settlement.categories {
        let block = match category.block {
            engine::CostBlock::Heating => "heating",
            engine::CostBlock::Other => "other",
        };
        wtr.write_record([
            block.to_string(),
            category.category_code.clone(),
            amount(category.totals.net),
            amount(category.totals.vat),
            amount(category.totals.gross),
        ])?;
    }
    for (label, totals) in [("heating", settlement.heating), ("other", settlement.other)] {
        wtr.write_record([
            "total".to_string(),
            label.to_string(),
            amount(totals.net),
            amount(totals.vat),
            amount(totals.gross),
        ])?;
    }
    for (label, value) in [
        ("allocated", settlement.total_allocated),
        ("advances", settlement.advances),
        ("balance", settlement.balance),
    ] {
        wtr.write_record([
            "summary".to_string(),
            label.to_string(),
            String::new(),
            String::new(),
            amount(value),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use engine::{BlockTotals, CategoryTotals, CostBlock, DetailRow};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn amounts_have_two_decimals() {
        assert_eq!(amount(0.0), "0.00");
        assert_eq!(amount(1589.1), "1589.10");
        assert_eq!(amount(-80.0), "-80.00");
        assert_eq!(amount(0.666_666), "0.67");
    }

    #[test]
    fn categories_export_has_header_and_every_code() {
        let mut out = Vec::new();
        categories(&mut out, &CategoryCatalog::seed()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "code,name,name_en,allocation_method,is_heating");
        assert!(lines.contains(&"HEIZ_BRENN,Heizung Brennstoff,Heating fuel,HEAT_SPLIT_70_30,yes"));
    }

    #[test]
    fn units_export() {
        let unit = Unit::new(Uuid::new_v4(), "DG links", 42.5);
        let mut out = Vec::new();
        units(&mut out, std::slice::from_ref(&unit)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["unit_id,label,area_sqm".to_string(), format!("{},DG links,42.5", unit.id)]
        );
    }

    #[test]
    fn statement_exports() {
        let property_id = Uuid::new_v4();
        let unit = Unit::new(property_id, "EG", 60.0);
        let statement = Statement {
            property_id,
            year: 2024,
            per_unit_totals: BTreeMap::from([(unit.id, 2.0 / 3.0)]),
            detail_rows: vec![DetailRow {
                entry_id: Uuid::new_v4(),
                unit_id: unit.id,
                category_code: "REINIGUNG".to_string(),
                gross: 2.0 / 3.0,
                vat_rate: 19.0,
            }],
            units: vec![unit.clone()],
        };

        let mut out = Vec::new();
        statement_preview(&mut out, &statement).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some(format!("{},EG,60,0.67", unit.id).as_str()));

        let mut out = Vec::new();
        statement_details(&mut out, &statement).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",REINIGUNG,0.67,19"));
    }

    #[test]
    fn settlement_export_ends_with_balance() {
        let heating = BlockTotals::split(119.0, 19.0);
        let settlement = Settlement {
            lease_id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            year: 2024,
            heating,
            other: BlockTotals::default(),
            categories: vec![CategoryTotals {
                category_code: "HEIZ_BRENN".to_string(),
                block: CostBlock::Heating,
                totals: heating,
            }],
            total_allocated: 119.0,
            advances: 100.0,
            balance: 19.0,
        };

        let mut out = Vec::new();
        super::settlement(&mut out, &settlement).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "heating,HEIZ_BRENN,100.00,19.00,119.00");
        assert_eq!(lines.last(), Some(&"summary,balance,,,19.00"));
    }
}
