//! Output formats for extracted invoices.

use factura_core::format_amount;
use factura_core::models::invoice::Invoice;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_invoice(invoice: &Invoice, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Json => Ok(serde_json::to_string(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &Invoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "point_of_sale",
        "invoice_number",
        "issue_date",
        "cae",
        "description",
        "net_amount",
        "vat_applies",
    ])?;

    let header = &invoice.header;
    let issue_date = header.issue_date.map(|d| d.to_string()).unwrap_or_default();

    for item in &invoice.line_items {
        wtr.write_record([
            header.point_of_sale.as_deref().unwrap_or(""),
            header.invoice_number.as_deref().unwrap_or(""),
            issue_date.as_str(),
            header.authorization_code.as_deref().unwrap_or(""),
            item.description.as_str(),
            item.net_amount.to_string().as_str(),
            if item.vat_applies { "true" } else { "false" },
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(invoice: &Invoice) -> String {
    let header = &invoice.header;
    let mut output = String::new();

    output.push_str(&format!(
        "Factura: {}\n",
        header.full_number().unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "Fecha:   {}\n",
        header.issue_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "CAE:     {}\n",
        header.authorization_code.as_deref().unwrap_or("-")
    ));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &invoice.line_items {
        output.push_str(&format!(
            "  {:<40} $ {:>14} {}\n",
            item.description,
            format_amount(item.net_amount),
            if item.vat_applies { "IVA" } else { "exento" }
        ));
    }
    output.push('\n');

    let totals = &invoice.totals;
    output.push_str(&format!("Neto:  $ {}\n", format_amount(totals.total_net)));
    output.push_str(&format!("IVA:   $ {}\n", format_amount(totals.total_vat)));
    output.push_str(&format!("Total: $ {}\n", format_amount(totals.total_gross)));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use factura_core::models::invoice::{InvoiceHeader, LineItem};
    use factura_core::{calculate_totals, Decimal};
    use std::str::FromStr;

    fn sample() -> Invoice {
        let line_items = vec![
            LineItem::new("Honorarios, liquidación", dec("1500.00"), true),
            LineItem::new("Gastos", dec("250.00"), false),
        ];
        Invoice {
            header: InvoiceHeader {
                point_of_sale: Some("0003".to_string()),
                invoice_number: Some("00000123".to_string()),
                ..Default::default()
            },
            totals: calculate_totals(&line_items, dec("0.21")),
            line_items,
            ..Default::default()
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_csv_has_row_per_item() {
        let csv = format_invoice(&sample(), OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0003,00000123,,,\"Honorarios, liquidación\",1500.00,true");
    }

    #[test]
    fn test_text_summary() {
        let text = format_invoice(&sample(), OutputFormat::Text, false).unwrap();

        assert!(text.contains("Factura: 0003-00000123"));
        assert!(text.contains("Total: $ 2.065,00"));
    }
}
