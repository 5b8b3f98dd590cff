//! Rule-based parser for Argentine electronic invoices.
//!
//! The pipeline is normalize, segment the items table into blocks, derive
//! each item from its block, then assemble. Nothing in it fails: fields that
//! cannot be read are left out or defaulted.

use tracing::{debug, info, trace};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::*;

use super::rules::{
    amounts::MoneyTokenExtractor,
    cae::extract_cae,
    dates::extract_issue_date,
    description::item_description,
    numbering::extract_invoice_number,
    patterns::{ITEM_START, NEXT_ITEM},
    text::{find_ignore_ascii_case, normalize_whitespace},
    vat::{calculate_totals, vat_applies},
    FieldExtractor,
};

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: Invoice,
    /// Raw extracted text.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// One raw row of the items table: the item code and the text after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemBlock<'a> {
    pub code: &'a str,
    pub block: &'a str,
}

/// Invoice parser for AFIP-style invoice text.
#[derive(Debug, Clone, Default)]
pub struct FacturaParser {
    config: ExtractionConfig,
}

impl FacturaParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Set the VAT rate used for totals.
    pub fn with_vat_rate(mut self, rate: rust_decimal::Decimal) -> Self {
        self.config.vat_rate = rate;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract header fields from invoice text.
    pub fn extract_header(&self, text: &str) -> InvoiceHeader {
        let text = normalize_whitespace(text);
        let number = extract_invoice_number(&text);

        InvoiceHeader {
            point_of_sale: number.as_ref().map(|n| n.point_of_sale.clone()),
            invoice_number: number.map(|n| n.number),
            issue_date: extract_issue_date(&text),
            authorization_code: extract_cae(&text),
        }
    }

    /// Extract line items from invoice text.
    pub fn extract_items(&self, text: &str) -> Vec<LineItem> {
        let text = normalize_whitespace(text);
        let zone = self.items_zone(&text);

        item_blocks(zone)
            .into_iter()
            .filter_map(|item| self.derive_item(item))
            .collect()
    }

    /// The part of the text between the items table header and the first
    /// end marker.
    pub fn items_zone<'a>(&self, text: &'a str) -> &'a str {
        let zone = match find_ignore_ascii_case(text, &self.config.table_start_marker) {
            Some(start) => &text[start..],
            None => {
                debug!("No items table header found, scanning the whole text");
                text
            }
        };

        let end = self
            .config
            .table_end_markers
            .iter()
            .filter_map(|marker| find_ignore_ascii_case(zone, marker))
            .min()
            .unwrap_or(zone.len());

        debug!("Items zone spans {} of {} bytes", end, text.len());
        &zone[..end]
    }

    fn derive_item(&self, item: ItemBlock<'_>) -> Option<LineItem> {
        let Some(last) = MoneyTokenExtractor::new().extract_all(item.block).pop() else {
            trace!("Discarding candidate {} without amounts: {:?}", item.code, item.block);
            return None;
        };

        Some(LineItem {
            description: item_description(item.code, item.block, &self.config),
            net_amount: last.value,
            vat_applies: vat_applies(item.block),
        })
    }
}

/// Split an items zone into rows.
///
/// A row starts with a line number and an item code of up to eight
/// uppercase letters or digits; its block runs until the next such start or
/// the end of the zone.
pub fn item_blocks(zone: &str) -> Vec<ItemBlock<'_>> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < zone.len() {
        let Some(caps) = ITEM_START.captures_at(zone, pos) else {
            break;
        };
        let (Some(start), Some(code)) = (caps.get(0), caps.get(2)) else {
            break;
        };

        let block_start = start.end();
        let block_end = NEXT_ITEM
            .find_at(zone, block_start)
            .map(|m| m.start())
            .unwrap_or(zone.len());

        blocks.push(ItemBlock {
            code: code.as_str().trim(),
            block: zone[block_start..block_end].trim(),
        });

        pos = block_end;
    }

    blocks
}

/// Extract line items with the default configuration.
pub fn extract_items(text: &str) -> Vec<LineItem> {
    FacturaParser::new().extract_items(text)
}

/// Extract header fields with the default configuration.
pub fn extract_header(text: &str) -> InvoiceHeader {
    FacturaParser::new().extract_header(text)
}

/// Wall-clock timer. `std::time::Instant` panics on wasm32, where parsing
/// time is reported as zero.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_ms(&self) -> u64 {
        0
    }
}

impl InvoiceParser for FacturaParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Stopwatch::start();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let header = self.extract_header(text);
        if header.full_number().is_none() {
            warnings.push("Could not extract point of sale and invoice number".to_string());
        }
        if header.issue_date.is_none() {
            warnings.push("Could not extract issue date".to_string());
        }
        if header.authorization_code.is_none() {
            warnings.push("Could not extract CAE".to_string());
        }

        let line_items = self.extract_items(text);
        if line_items.is_empty() {
            warnings.push("No line items detected".to_string());
        }

        let totals = calculate_totals(&line_items, self.config.vat_rate);

        debug!(
            "Extracted {} line items, net total {}",
            line_items.len(),
            totals.total_net
        );

        let processing_time_ms = start.elapsed_ms();
        let invoice = Invoice {
            header,
            line_items,
            totals,
            metadata: ExtractionMetadata {
                source_type: SourceType::Text,
                processing_time_ms: Some(processing_time_ms),
                warnings: warnings.clone(),
            },
        };

        ExtractionResult {
            invoice,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const SAMPLE: &str = r#"
        ORIGINAL  FACTURA  C
        Punto de Venta: Comp. N° 00003-00000123
        Fecha: 05/03/2024
        CUIT: 20301234567
        Cantidad Código Descripción Precio unitario % IVA Importe
        1 HORV Honorarios liquidación Nro de Stro: 4455/23 1.500,00 21% 1.500,00
        1 GAST Gastos de traslado – 250,00 0% 250,00
        2 KM Kilometraje 12,50 25,00
        Importe Neto Gravado: 1.500,00
        IVA 21%: 315,00
        Importe Total: 2.065,00
        CAE: 74123456789012
        Fecha de Vto. de CAE: 15/03/2024
    "#;

    #[test]
    fn test_parse_sample_invoice() {
        let result = FacturaParser::new().parse(SAMPLE);
        let invoice = result.invoice;

        assert_eq!(invoice.header.point_of_sale.as_deref(), Some("00003"));
        assert_eq!(invoice.header.invoice_number.as_deref(), Some("00000123"));
        assert_eq!(invoice.header.issue_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(invoice.header.authorization_code.as_deref(), Some("74123456789012"));

        assert_eq!(
            invoice.line_items,
            vec![
                LineItem::new("Nro de Stro: 4455/23", dec("1500.00"), true),
                LineItem::new("Gastos de traslado", dec("250.00"), false),
                LineItem::new("Kilometraje", dec("25.00"), true),
            ]
        );

        assert_eq!(invoice.totals.total_net, dec("1775.00"));
        assert_eq!(invoice.totals.total_vat, dec("320.25"));
        assert_eq!(invoice.totals.total_gross, dec("2095.25"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_claim_reference_row() {
        let text = "CANTIDAD 1 HORV Seguro Nro de Stro: 12345 1.500,00 21%";
        let items = extract_items(text);

        assert_eq!(items.len(), 1);
        assert!(items[0].description.starts_with("Nro de Stro:"));
        assert_eq!(items[0].description, "Nro de Stro: 12345");
        assert_eq!(items[0].net_amount, dec("1500.00"));
        assert!(items[0].vat_applies);
    }

    #[test]
    fn test_zero_vat_marker() {
        let items = extract_items("CANTIDAD 1 GAST Gastos 300,00 0% 300,00");
        assert_eq!(items.len(), 1);
        assert!(!items[0].vat_applies);

        let items = extract_items("CANTIDAD 1 GAST Gastos 300,00");
        assert!(items[0].vat_applies);
    }

    #[test]
    fn test_rows_without_amounts_are_discarded() {
        let text = "Cantidad 1 UN Unidad de medida 2 HON Honorarios 100,00";
        let items = extract_items(text);

        assert_eq!(items, vec![LineItem::new("Honorarios", dec("100.00"), true)]);
    }

    #[test]
    fn test_amount_glued_to_accented_letter() {
        let items = extract_items("1 AB Servicio é1,00 2,00");
        assert_eq!(items, vec![LineItem::new("Servicio é", dec("2.00"), true)]);
    }

    #[test]
    fn test_no_table_header_scans_whole_text() {
        let items = extract_items("1 A1 Servicio 10,00");
        assert_eq!(items, vec![LineItem::new("Servicio", dec("10.00"), true)]);
    }

    #[test]
    fn test_earliest_end_marker_closes_zone() {
        let parser = FacturaParser::new();
        let zone = parser.items_zone("X CANTIDAD 1 A Uno 1,00 Son Pesos: mil CAE: 1 Pag: 1/1");
        assert_eq!(zone, "CANTIDAD 1 A Uno 1,00 ");
    }

    #[test]
    fn test_item_blocks() {
        let blocks = item_blocks("CANTIDAD 1 HORV texto 1,00 2 AB otro 3,00");
        assert_eq!(
            blocks,
            vec![
                ItemBlock { code: "HORV", block: "texto 1,00" },
                ItemBlock { code: "AB", block: "otro 3,00" },
            ]
        );
    }

    #[test]
    fn test_empty_text() {
        let result = FacturaParser::new().parse("");

        assert!(result.invoice.header.is_empty());
        assert!(result.invoice.line_items.is_empty());
        assert!(result.warnings.contains(&"No line items detected".to_string()));
        assert_eq!(result.invoice.totals, InvoiceTotals::default());
    }

    #[test]
    fn test_header_fields() {
        let header = extract_header("Comp. N° 7-1234 Fecha: 05/03/2024 CAE: 12345678901234");

        assert_eq!(header.point_of_sale.as_deref(), Some("0007"));
        assert_eq!(header.invoice_number.as_deref(), Some("00001234"));
        assert_eq!(header.issue_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(header.authorization_code.as_deref(), Some("12345678901234"));
    }

    #[test]
    fn test_header_whitespace_is_normalized() {
        let header = extract_header("CAE:\u{00a0}\n 12345678901234");
        assert_eq!(header.authorization_code.as_deref(), Some("12345678901234"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let parser = FacturaParser::new();
        let first = parser.parse(SAMPLE).invoice;
        let second = parser.parse(SAMPLE).invoice;

        assert_eq!(first.header, second.header);
        assert_eq!(first.line_items, second.line_items);
        assert_eq!(first.totals, second.totals);
    }

    #[test]
    fn test_custom_config() {
        let config = ExtractionConfig {
            table_start_marker: "DETALLE".to_string(),
            claim_reference_codes: vec!["PERI".to_string()],
            claim_reference_marker: "SINIESTRO".to_string(),
            ..Default::default()
        };
        let parser = FacturaParser::with_config(config).with_vat_rate(dec("0.105"));

        let result = parser.parse("1 X Ignorado 5,00 DETALLE 1 PERI Pericia siniestro 77 100,00");

        assert_eq!(
            result.invoice.line_items,
            vec![LineItem::new("siniestro 77", dec("100.00"), true)]
        );
        assert_eq!(result.invoice.totals.total_vat, dec("10.5"));
    }
}
