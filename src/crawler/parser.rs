//! HTML parsers for catalog listing pages and product detail pages
//!
//! Both parsers are all-or-nothing: a page that does not have the expected
//! shape yields an error rather than partial data. The `extract_*` wrappers
//! log that error with the page URL and degrade to "no data" so a single
//! bad page never aborts a crawl.

use crate::record::{AttributeRecord, NAME_KEY, PRICE_KEY};
use crate::{ParseError, ParseResult};
use scraper::{ElementRef, Html, Selector};

/// Container wrapping each product tile on a listing page
const PRODUCT_IMAGE: &str = ".product_image";

/// Product display name on a detail page
const PRODUCT_NAME: &str = ".color_9D.font_24.fFamily_mrsEaves.fStyle_italic.text-transform-none.fWeight_regular.d-block";

const PRODUCT_PRICE: &str = ".price";

/// "First row" specification block and its cells
const SPEC_FIRST_ROW: &str = ".specColWidth.specFirstRow";
const SPEC_FIRST_ROW_CELL: &str = ".specCol";

/// General specification rows
const SPEC_ROW: &str = ".specRow";

/// Calibre specification rows (second markup variant of the same data)
const SPEC_CALIBRE_ROW: &str = ".calibre_sepcColumn.specRow";

const SPEC_NAME: &str = ".specName";
const SPEC_VALUE: &str = ".specValue";

fn selector(css: &str) -> ParseResult<Selector> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css.to_string()))
}

/// Collects the trimmed text content of an element
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses product detail links out of a listing page
///
/// Every `.product_image` container must hold an anchor with an `href`;
/// hrefs are returned exactly as written in the page, in document order.
///
/// # Example
///
/// ```
/// use watch_etl::crawler::parse_listing;
///
/// let html = r#"<div class="product_image"><a href="/product-a.html"><img></a></div>"#;
/// assert_eq!(parse_listing(html).unwrap(), vec!["/product-a.html".to_string()]);
/// ```
pub fn parse_listing(html: &str) -> ParseResult<Vec<String>> {
    let document = Html::parse_document(html);
    let tile_selector = selector(PRODUCT_IMAGE)?;
    let anchor_selector = selector("a")?;

    let mut links = Vec::new();
    for tile in document.select(&tile_selector) {
        let anchor = tile
            .select(&anchor_selector)
            .next()
            .ok_or_else(|| ParseError::MissingElement("product_image anchor".to_string()))?;

        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| ParseError::MissingElement("product_image href".to_string()))?;

        links.push(href.to_string());
    }

    Ok(links)
}

/// Listing extractor: product links of one listing page, or none
///
/// Absent page text (failed fetch) and parse errors both yield an empty
/// vector; parse errors are logged with the URL.
pub fn extract_listing(url: &str, page_text: Option<&str>) -> Vec<String> {
    let Some(html) = page_text else {
        return Vec::new();
    };

    match parse_listing(html) {
        Ok(links) => {
            tracing::debug!("Found {} product links on {}", links.len(), url);
            links
        }
        Err(e) => {
            tracing::error!("Failed to parse listing page {}: {}", url, e);
            Vec::new()
        }
    }
}

/// Parses one product detail page into an attribute record
///
/// The record starts with `name` and `price`, then takes label/value pairs
/// from three zones in order: the first-row block, every spec row, and the
/// calibre spec rows. A later zone overwrites an earlier one on the same
/// label.
pub fn parse_detail(html: &str) -> ParseResult<AttributeRecord> {
    let document = Html::parse_document(html);

    let name = required_text(&document, PRODUCT_NAME, NAME_KEY)?;
    let price = required_text(&document, PRODUCT_PRICE, PRICE_KEY)?;

    let mut record = AttributeRecord::new();
    record.insert(NAME_KEY.to_string(), name);
    record.insert(PRICE_KEY.to_string(), price);

    let first_row_selector = selector(SPEC_FIRST_ROW)?;
    let first_row = document
        .select(&first_row_selector)
        .next()
        .ok_or_else(|| ParseError::MissingElement("specFirstRow block".to_string()))?;

    let cell_selector = selector(SPEC_FIRST_ROW_CELL)?;
    for cell in first_row.select(&cell_selector) {
        insert_spec(&mut record, cell)?;
    }

    let row_selector = selector(SPEC_ROW)?;
    for row in document.select(&row_selector) {
        insert_spec(&mut record, row)?;
    }

    let calibre_selector = selector(SPEC_CALIBRE_ROW)?;
    for row in document.select(&calibre_selector) {
        insert_spec(&mut record, row)?;
    }

    Ok(record)
}

/// Detail extractor: one attribute record, or None
///
/// Absent page text and parse errors both yield None; parse errors are
/// logged with the URL. No partial record is ever returned.
pub fn extract_detail(url: &str, page_text: Option<&str>) -> Option<AttributeRecord> {
    let html = page_text?;

    match parse_detail(html) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::error!("Failed to extract product data from {}: {}", url, e);
            None
        }
    }
}

/// Trimmed text of the first element matching `css`; must be non-empty
fn required_text(document: &Html, css: &str, field: &str) -> ParseResult<String> {
    let element_selector = selector(css)?;
    let element = document
        .select(&element_selector)
        .next()
        .ok_or_else(|| ParseError::MissingElement(field.to_string()))?;

    let text = element_text(element);
    if text.is_empty() {
        return Err(ParseError::EmptyField(field.to_string()));
    }
    Ok(text)
}

/// Reads the label/value pair of one spec row into the record
fn insert_spec(record: &mut AttributeRecord, row: ElementRef<'_>) -> ParseResult<()> {
    let name_selector = selector(SPEC_NAME)?;
    let value_selector = selector(SPEC_VALUE)?;

    let label = row
        .select(&name_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| ParseError::MissingElement("specName".to_string()))?;
    let value = row
        .select(&value_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| ParseError::MissingElement("specValue".to_string()))?;

    record.insert(label, value);
    Ok(())
}
