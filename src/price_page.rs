//! Fetching and parsing of the historical gold price page.
//!
//! The page carries two tables: a legend first, then the daily history with
//! one row per date. Rows are parsed independently so a malformed row only
//! drops itself.

use crate::config::ScraperConfig;
use crate::models::NewGoldPrice;
use ::scraper::{ElementRef, Html, Selector};
use chrono::NaiveDate;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors raised while fetching or parsing the price page
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Parse(String),
}

/// HTTP client for the price page
#[derive(Clone)]
pub struct PricePageClient {
    client: Client,
    url: String,
}

impl PricePageClient {
    /// Build a client with the configured user agent and timeout
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the page body
    pub async fn fetch_html(&self) -> Result<String, ScrapeError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Download the page and parse every usable price row
    pub async fn fetch_prices(&self) -> Result<Vec<NewGoldPrice>, ScrapeError> {
        let html = self.fetch_html().await?;
        Ok(parse_price_table(&html))
    }
}

/// Parse a currency cell such as `Rs. 165,400.00`
pub fn parse_price(text: &str) -> Result<f64, ScrapeError> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("Rs.")
        .trim_start_matches("Rs")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let value = cleaned
        .parse::<f64>()
        .map_err(|_| ScrapeError::Parse(format!("Invalid price: '{}'", text.trim())))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ScrapeError::Parse(format!(
            "Price out of range: '{}'",
            text.trim()
        )));
    }

    Ok(value)
}

/// Parse a `YYYY-MM-DD` date cell
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse(format!("Bad selector '{}': {}", css, e)))
}

/// Parse one data row. `Ok(None)` means the row is not a price row.
fn parse_row(cells: &[String]) -> Result<Option<NewGoldPrice>, ScrapeError> {
    if cells.len() < 5 {
        return Ok(None);
    }

    let date = match parse_date(&cells[0]) {
        Some(date) => date,
        None => {
            warn!("Skipping row with unparsable date '{}'", cells[0]);
            return Ok(None);
        }
    };

    let carat_21_1gram = match cells.get(5) {
        Some(text) => parse_price(text)?,
        None => 0.0,
    };

    Ok(Some(NewGoldPrice {
        date,
        gold_ounce: parse_price(&cells[1])?,
        carat_24_1gram: parse_price(&cells[2])?,
        carat_22_1gram: parse_price(&cells[3])?,
        carat_22_8grams: parse_price(&cells[4])?,
        carat_21_1gram,
    }))
}

/// Extract price rows from the second table of the page.
///
/// Returns an empty list (and logs an error) when the page has fewer than
/// two tables.
pub fn parse_price_table(html: &str) -> Vec<NewGoldPrice> {
    let (table_sel, row_sel, cell_sel) = match (selector("table"), selector("tr"), selector("th, td")) {
        (Ok(t), Ok(r), Ok(c)) => (t, r, c),
        _ => {
            error!("Failed to build HTML selectors");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);

    let table = match document.select(&table_sel).nth(1) {
        Some(table) => table,
        None => {
            error!("Could not find the price table");
            return Vec::new();
        }
    };

    let mut prices = Vec::new();

    // First row is the header
    for (row_idx, row) in table.select(&row_sel).skip(1).enumerate() {
        let cells: Vec<String> = row.select(&cell_sel).map(|c| cell_text(&c)).collect();

        if row_idx < 3 {
            debug!("Row {}: {:?}", row_idx, cells);
        }

        match parse_row(&cells) {
            Ok(Some(price)) => prices.push(price),
            Ok(None) => {}
            Err(e) => {
                warn!("Error parsing row {}: {}", row_idx, e);
            }
        }
    }

    info!("Successfully scraped {} price records", prices.len());
    prices
}
