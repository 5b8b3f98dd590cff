//! WASM bindings for Argentine invoice text extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! PDF text has to be extracted on the JavaScript side; these bindings take
//! the resulting text.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use wasm_bindgen::prelude::*;

use factura_core::invoice::{FacturaParser, InvoiceParser};
use factura_core::models::invoice::{Invoice, LineItem};
use factura_core::Decimal;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Extract invoice data from text with the default rules.
#[wasm_bindgen]
pub fn extract_invoice_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&FacturaParser::new().parse(text).invoice)
}

/// Parse an `es-AR` amount (e.g., "1.234,50"). Unreadable input gives 0.
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> f64 {
    factura_core::parse_amount(amount).to_f64().unwrap_or(0.0)
}

/// Format an amount in `es-AR` style (1.234,50).
#[wasm_bindgen]
pub fn format_amount(amount: f64) -> String {
    factura_core::format_amount(to_decimal(amount))
}

/// Net, VAT and gross totals for an array of line items.
#[wasm_bindgen]
pub fn calculate_totals(items: JsValue, vat_rate: f64) -> Result<JsValue, JsValue> {
    let items: Vec<LineItem> =
        serde_wasm_bindgen::from_value(items).map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_js(&factura_core::calculate_totals(&items, to_decimal(vat_rate)))
}

/// Invoice extractor class for browser use.
#[wasm_bindgen]
pub struct InvoiceExtractor {
    parser: FacturaParser,
}

#[wasm_bindgen]
impl InvoiceExtractor {
    /// Create a new invoice extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: FacturaParser::new(),
        }
    }

    /// VAT rate used for totals, as a fraction (0.21 for 21%).
    #[wasm_bindgen]
    pub fn set_vat_rate(&mut self, rate: f64) {
        self.parser = self.parser.clone().with_vat_rate(to_decimal(rate));
    }

    /// Extract invoice from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text).invoice)
    }

    /// Get extraction result with metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let start = js_sys::Date::now();
        let result = self.parser.parse(text);

        #[derive(serde::Serialize)]
        struct ExtractResult {
            invoice: Invoice,
            raw_text: String,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        let output = ExtractResult {
            invoice: result.invoice,
            raw_text: result.raw_text,
            warnings: result.warnings,
            processing_time_ms: (js_sys::Date::now() - start).max(0.0) as u64,
        };

        to_js(&output)
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const INVOICE: &str = "Punto de Venta: Comp. N° 00003-00000123 \
        Cantidad Código Descripción Importe \
        1 GAST Gastos de traslado 250,00 0% 250,00 \
        CAE: 74123456789012";

    #[wasm_bindgen_test]
    fn test_parse_amount() {
        assert!((parse_amount("1.234,50") - 1234.5).abs() < 0.001);
        assert_eq!(parse_amount("abc"), 0.0);
    }

    #[wasm_bindgen_test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5), "1.234,50");
        assert_eq!(format_amount(0.0), "0,00");
    }

    #[wasm_bindgen_test]
    fn test_extract_invoice_from_text() {
        let value = extract_invoice_from_text(INVOICE).unwrap();
        let invoice: Invoice = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(invoice.header.authorization_code.as_deref(), Some("74123456789012"));
        assert_eq!(invoice.line_items.len(), 1);
        assert!(!invoice.line_items[0].vat_applies);
    }

    #[wasm_bindgen_test]
    fn test_extractor_vat_rate() {
        let mut extractor = InvoiceExtractor::new();
        extractor.set_vat_rate(0.105);

        let text = "CANTIDAD 1 HORV Honorarios 1.000,00 21%";
        let invoice: Invoice =
            serde_wasm_bindgen::from_value(extractor.extract(text).unwrap()).unwrap();

        assert_eq!(invoice.totals.total_vat, Decimal::new(105, 0));
    }
}
