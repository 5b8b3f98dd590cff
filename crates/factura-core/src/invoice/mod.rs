//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{
    extract_header, extract_items, item_blocks, ExtractionResult, FacturaParser, InvoiceParser,
    ItemBlock,
};
