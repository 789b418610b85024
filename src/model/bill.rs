use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::model::Id;

/// Inclusive calendar range a bill covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Period {
    /// Returns None when `from` is after `to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// The whole calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let from = date.with_day(1).unwrap_or(date);
        let next_month = if from.month() == 12 {
            NaiveDate::from_ymd_opt(from.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(from.year(), from.month() + 1, 1)
        };
        let to = next_month
            .and_then(|d| d.pred_opt())
            .unwrap_or(from);
        Self { from, to }
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_id: Id,
    pub user_id: Id,
    pub period: Period,
    pub items: Vec<BillItem>,
    pub total_cents: i64,
    pub currency: String,
}

impl Bill {
    /// Render as the XML document served by `GET /bill/`
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            out,
            "<bill id=\"{}\" user=\"{}\">",
            escape_xml(&self.bill_id),
            escape_xml(&self.user_id)
        );
        let _ = writeln!(
            out,
            "  <period from=\"{}\" to=\"{}\"/>",
            self.period.from, self.period.to
        );
        out.push_str("  <items>\n");
        for item in &self.items {
            let _ = writeln!(
                out,
                "    <item description=\"{}\" quantity=\"{}\" unitPrice=\"{}\" amount=\"{}\"/>",
                escape_xml(&item.description),
                item.quantity,
                format_cents(item.unit_price_cents),
                format_cents(item.amount_cents)
            );
        }
        out.push_str("  </items>\n");
        let _ = writeln!(
            out,
            "  <total currency=\"{}\">{}</total>",
            escape_xml(&self.currency),
            format_cents(self.total_cents)
        );
        out.push_str("</bill>\n");
        out
    }
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_of_handles_year_end_and_leap_years() {
        let december = Period::month_of(date(2023, 12, 15));
        assert_eq!(december.from, date(2023, 12, 1));
        assert_eq!(december.to, date(2023, 12, 31));

        let february = Period::month_of(date(2024, 2, 10));
        assert_eq!(february.to, date(2024, 2, 29));
        assert_eq!(february.days(), 29);
    }

    #[test]
    fn test_period_rejects_inverted_range() {
        assert!(Period::new(date(2024, 3, 2), date(2024, 3, 1)).is_none());
        assert_eq!(Period::new(date(2024, 3, 1), date(2024, 3, 1)).unwrap().days(), 1);
    }

    #[test]
    fn test_bill_xml_escapes_markup() {
        let bill = Bill {
            bill_id: "b-1".into(),
            user_id: "<script>&\"".into(),
            period: Period::month_of(date(2024, 1, 1)),
            items: vec![BillItem {
                description: "Compute & storage".into(),
                quantity: 31,
                unit_price_cents: 10,
                amount_cents: 310,
            }],
            total_cents: 310,
            currency: "EUR".into(),
        };

        let xml = bill.to_xml();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("user=\"&lt;script&gt;&amp;&quot;\""));
        assert!(xml.contains("description=\"Compute &amp; storage\""));
        assert!(xml.contains("<period from=\"2024-01-01\" to=\"2024-01-31\"/>"));
        assert!(xml.contains("<total currency=\"EUR\">3.10</total>"));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(12345), "123.45");
        assert_eq!(format_cents(-250), "-2.50");
    }
}
