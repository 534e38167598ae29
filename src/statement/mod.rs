//! Renders the downloadable statement: an A4 PDF with a summary block, a category ring chart and
//! a chronological ledger with a running balance.
//!
//! Layout coordinates are millimetres from the top-left corner of the page.

mod chart;
mod ledger;
mod page;
mod text;

pub use chart::{chart_png, draw_ring_chart, RasterSurface, Surface, CHART_SIZE};
pub use ledger::{estimated_page_count, ledger_rows, place_rows, Entry, LedgerRow, Placement};

use crate::model::{Rgb, Transactions};
use crate::summary::{category_totals, CategoryTotal, Totals};
use crate::Result;
use chrono::{DateTime, FixedOffset};
use image::DynamicImage;
use ledger::{CONTINUATION_TOP, FIRST_PAGE_TOP};
use page::{map_pdf_error, Align, Fonts, Page, BLACK, PAGE_HEIGHT, PAGE_WIDTH};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::path::Path;
use tracing::{debug, warn};

/// The name the statement is always saved under.
pub const STATEMENT_FILENAME: &str = "OBICS_Statement.pdf";

const DOCUMENT_TITLE: &str = "OBICS Statement";
const LAYER_NAME: &str = "Statement";
const LEFT_MARGIN: f32 = 14.0;

const GRAY: Rgb = [100, 100, 100];
const CREDIT_COLOR: Rgb = [34, 139, 34];
const DEBIT_COLOR: Rgb = [220, 20, 60];
const TITLE_COLOR: Rgb = [0, 191, 255];
const STRIPE_COLOR: Rgb = [248, 248, 248];

/// Width of the description column. Longer descriptions are cut at their first wrapped line.
const DESCRIPTION_WIDTH: f32 = 50.0;
const BODY_FONT_SIZE: f32 = 10.0;

// Table columns.
const DATE_X: f32 = LEFT_MARGIN + 2.0;
const DESCRIPTION_X: f32 = 45.0;
const DEBIT_X: f32 = PAGE_WIDTH - 85.0;
const CREDIT_X: f32 = PAGE_WIDTH - 60.0;
const BALANCE_X: f32 = PAGE_WIDTH - 35.0;

/// A summary card on the first page.
struct Card {
    top: f32,
    label: &'static str,
    value: String,
    background: Rgb,
    accent: Rgb,
}

/// Everything needed to render a statement. The transactions are a snapshot taken when the
/// statement was requested and are used in chronological order.
pub struct Statement<'a> {
    transactions: &'a Transactions,
    totals: Totals,
    generated_at: DateTime<FixedOffset>,
    logo: Option<&'a DynamicImage>,
}

/// How the ledger is spread over pages.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementLayout {
    rows: Vec<LedgerRow>,
    placements: Vec<Placement>,
    estimated_pages: usize,
}

impl StatementLayout {
    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The page count printed in every footer.
    pub fn estimated_pages(&self) -> usize {
        self.estimated_pages
    }

    /// The number of pages the document really has.
    pub fn pages(&self) -> usize {
        self.placements.last().map(|p| p.page + 1).unwrap_or(1)
    }
}

impl<'a> Statement<'a> {
    /// `totals` are the aggregate figures shown in the summary cards. Dates in the ledger are
    /// shown in the offset of `generated_at`.
    pub fn new(
        transactions: &'a Transactions,
        totals: Totals,
        generated_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            transactions,
            totals,
            generated_at,
            logo: None,
        }
    }

    /// Adds the logo mark to every page header.
    pub fn with_logo(mut self, logo: Option<&'a DynamicImage>) -> Self {
        self.logo = logo;
        self
    }

    /// Computes the ledger rows and where they go, without drawing anything.
    pub fn layout(&self) -> StatementLayout {
        let chronological = self.transactions.chronological();
        let rows = ledger_rows(&chronological, *self.generated_at.offset());
        let placements = place_rows(rows.len());
        let estimated_pages = estimated_page_count(rows.len());
        StatementLayout {
            rows,
            placements,
            estimated_pages,
        }
    }

    /// Renders the statement to PDF bytes.
    pub fn render(&self) -> Result<Vec<u8>> {
        let layout = self.layout();
        let categories = category_totals(self.transactions);
        let chart = chart_image(&categories);
        debug!(
            "Rendering {} ledger rows on {} pages (footer says {})",
            layout.rows.len(),
            layout.pages(),
            layout.estimated_pages
        );

        let (doc, page_ix, layer_ix) = PdfDocument::new(
            DOCUMENT_TITLE,
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            LAYER_NAME,
        );
        let fonts = Fonts {
            normal: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(map_pdf_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(map_pdf_error)?,
        };

        {
            let mut page = Page::new(doc.get_page(page_ix).get_layer(layer_ix), &fonts);
            self.draw_header(&mut page);
            self.draw_first_page_summary(&mut page, &categories, chart.as_ref());
            draw_table_header(&mut page, FIRST_PAGE_TOP);

            let mut current = 0;
            for (row, placement) in layout.rows.iter().zip(&layout.placements) {
                if placement.page != current {
                    draw_footer(&mut page, current + 1, layout.estimated_pages);
                    let (next_page, next_layer) =
                        doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
                    page.turn(doc.get_page(next_page).get_layer(next_layer));
                    current = placement.page;
                    self.draw_header(&mut page);
                    draw_table_header(&mut page, CONTINUATION_TOP);
                }
                draw_row(&mut page, row, placement);
            }
            draw_footer(&mut page, current + 1, layout.estimated_pages);
        }

        doc.save_to_bytes().map_err(map_pdf_error)
    }

    /// The part of the header that every page has: the generation time and the logo.
    fn draw_header(&self, page: &mut Page) {
        page.set_font_size(8.0);
        page.set_text_color(GRAY);
        page.text(
            &format!(
                "Generated: {}",
                self.generated_at.format("%Y/%m/%d, %H:%M:%S")
            ),
            PAGE_WIDTH - LEFT_MARGIN,
            10.0,
            Align::Right,
        );
        if let Some(logo) = self.logo {
            page.image(logo, LEFT_MARGIN, 5.0, 15.0, 15.0);
        }
    }

    fn draw_first_page_summary(
        &self,
        page: &mut Page,
        categories: &[CategoryTotal],
        chart: Option<&DynamicImage>,
    ) {
        page.set_font_size(18.0);
        page.set_bold(true);
        page.set_text_color(BLACK);
        page.text("Financial Summary", LEFT_MARGIN, 30.0, Align::Left);

        let cards = [
            Card {
                top: 35.0,
                label: "Income",
                value: self.totals.income().to_string(),
                background: [240, 255, 240],
                accent: CREDIT_COLOR,
            },
            Card {
                top: 60.0,
                label: "Expenses",
                value: self.totals.expense().to_string(),
                background: [255, 240, 240],
                accent: DEBIT_COLOR,
            },
            Card {
                top: 85.0,
                label: "Balance",
                value: self.totals.balance().to_string(),
                background: [245, 245, 250],
                accent: BLACK,
            },
        ];
        for card in &cards {
            page.set_fill_color(card.background);
            page.fill_rounded_rect(LEFT_MARGIN, card.top, 75.0, 22.0, 3.0);
            page.set_stroke(card.accent, 0.5);
            page.stroke_circle(LEFT_MARGIN + 8.0, card.top + 11.0, 4.0);
            page.set_text_color(card.accent);
            page.set_font_size(10.0);
            page.text(card.label, LEFT_MARGIN + 15.0, card.top + 8.0, Align::Left);
            page.set_font_size(14.0);
            page.text(&card.value, LEFT_MARGIN + 15.0, card.top + 16.0, Align::Left);
        }

        page.set_font_size(22.0);
        page.set_text_color(TITLE_COLOR);
        page.text("STATEMENT", PAGE_WIDTH / 2.0 + 10.0, 25.0, Align::Center);
        page.set_font_size(12.0);
        page.set_text_color(BLACK);
        page.text("Category Total", PAGE_WIDTH - 55.0, 35.0, Align::Center);
        if let Some(chart) = chart {
            page.image(chart, PAGE_WIDTH - 80.0, 40.0, 50.0, 50.0);
        }

        page.set_font_size(8.0);
        for (i, total) in categories.iter().enumerate() {
            let offset = 6.0 * i as f32;
            page.set_fill_color(total.color());
            page.fill_rect(PAGE_WIDTH - 25.0, 45.0 + offset, 3.0, 3.0);
            page.text(total.label(), PAGE_WIDTH - 20.0, 48.0 + offset, Align::Left);
        }
    }
}

fn draw_table_header(page: &mut Page, y: f32) {
    page.set_font_size(12.0);
    page.set_bold(true);
    page.set_text_color(BLACK);
    page.text("Date", DATE_X, y, Align::Left);
    page.text("Description", DESCRIPTION_X, y, Align::Left);
    page.text("Debit", DEBIT_X, y, Align::Left);
    page.text("Credit", CREDIT_X, y, Align::Left);
    page.text("Balance", BALANCE_X, y, Align::Left);
    page.line(LEFT_MARGIN, y + 2.0, PAGE_WIDTH - LEFT_MARGIN, y + 2.0);
}

fn draw_row(page: &mut Page, row: &LedgerRow, placement: &Placement) {
    let y = placement.y;
    if placement.row % 2 == 0 {
        page.set_fill_color(STRIPE_COLOR);
        page.fill_rect(LEFT_MARGIN, y - 7.0, PAGE_WIDTH - LEFT_MARGIN * 2.0, 10.0);
    }
    page.set_font_size(BODY_FONT_SIZE);
    page.set_bold(false);
    page.set_text_color(BLACK);
    page.text(row.date(), DATE_X, y, Align::Left);
    let description = text::first_line(row.description(), DESCRIPTION_WIDTH, BODY_FONT_SIZE);
    page.text(&description, DESCRIPTION_X, y, Align::Left);
    match row.entry() {
        Entry::Debit(amount) => {
            page.set_text_color(DEBIT_COLOR);
            page.text(&amount.to_string(), DEBIT_X, y, Align::Left);
        }
        Entry::Credit(amount) => {
            page.set_text_color(CREDIT_COLOR);
            page.text(&amount.to_string(), CREDIT_X, y, Align::Left);
        }
    }
    page.set_text_color(BLACK);
    page.text(&row.balance().to_string(), BALANCE_X, y, Align::Left);
}

fn draw_footer(page: &mut Page, current: usize, total: usize) {
    page.set_font_size(8.0);
    page.text(
        &format!("Page {current} of {total}"),
        PAGE_WIDTH / 2.0,
        290.0,
        Align::Center,
    );
}

/// Draws the ring chart offscreen and decodes it for embedding. Any failure leaves the statement
/// without a chart.
fn chart_image(categories: &[CategoryTotal]) -> Option<DynamicImage> {
    let mut surface = RasterSurface::new(CHART_SIZE, CHART_SIZE);
    let png = chart_png(Some(&mut surface), categories);
    if png.is_empty() {
        return None;
    }
    match image::load_from_memory(&png) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("The chart image could not be decoded: {e}");
            None
        }
    }
}

/// Loads the logo shown in the page header. A missing or unreadable logo is logged and the
/// statement is rendered without it.
pub fn load_logo(path: &Path) -> Option<DynamicImage> {
    if !path.is_file() {
        warn!("Logo not found at '{}', continuing without it", path.display());
        return None;
    }
    match image::open(path) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("Unable to load the logo at '{}': {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category, Transaction};
    use std::str::FromStr;

    fn generated_at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-06-30T16:45:10+02:00").unwrap()
    }

    fn transactions(n: usize) -> Transactions {
        Transactions::new(
            (0..n)
                .map(|i| {
                    let (amount, category) = if i % 4 == 0 {
                        ("2500.00", Category::Other)
                    } else {
                        ("-123.45", Category::ALL[i % 4])
                    };
                    Transaction::new(
                        i.to_string(),
                        format!("Transaction number {i} with a rather long description attached"),
                        category,
                        Amount::from_str(amount).unwrap(),
                        DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z").unwrap()
                            + chrono::Duration::hours(i as i64),
                    )
                })
                .collect(),
        )
    }

    fn render(list: &Transactions) -> Vec<u8> {
        Statement::new(list, Totals::new(list), generated_at())
            .render()
            .unwrap()
    }

    #[test]
    fn test_empty_statement_renders() {
        let list = Transactions::default();
        let statement = Statement::new(&list, Totals::new(&list), generated_at());
        let layout = statement.layout();
        assert!(layout.rows().is_empty());
        assert_eq!(layout.pages(), 1);
        assert_eq!(layout.estimated_pages(), 1);
        let bytes = statement.render().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_statement_renders_multiple_pages() {
        let list = transactions(37);
        let statement = Statement::new(&list, Totals::new(&list), generated_at());
        let layout = statement.layout();
        assert_eq!(layout.rows().len(), 37);
        assert_eq!(layout.pages(), 2);
        assert_eq!(layout.estimated_pages(), 3);
        let bytes = render(&list);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_layout_uses_chronological_order_and_matches_totals() {
        let mut list: Vec<Transaction> = transactions(10).data().to_vec();
        list.reverse();
        let list = Transactions::new(list);
        let statement = Statement::new(&list, Totals::new(&list), generated_at());
        let layout = statement.layout();
        let dates: Vec<_> = layout.rows().iter().map(|r| r.date().to_string()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(
            layout.rows().last().unwrap().balance(),
            Totals::new(&list).balance()
        );
    }

    #[test]
    fn test_ledger_dates_follow_generation_offset() {
        let list = Transactions::new(vec![Transaction::new(
            "late",
            "Late night",
            Category::Food,
            Amount::from_str("-1").unwrap(),
            DateTime::parse_from_rfc3339("2025-06-01T23:30:00Z").unwrap(),
        )]);
        let statement = Statement::new(&list, Totals::new(&list), generated_at());
        assert_eq!(statement.layout().rows()[0].date(), "2025/06/02");
    }

    #[test]
    fn test_statement_with_logo() {
        let list = transactions(3);
        let logo = DynamicImage::new_rgba8(32, 16);
        let bytes = Statement::new(&list, Totals::new(&list), generated_at())
            .with_logo(Some(&logo))
            .render()
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_chart_image_is_decoded() {
        let list = transactions(5);
        let chart = chart_image(&category_totals(&list)).unwrap();
        assert_eq!(chart.width(), CHART_SIZE);
        assert_eq!(chart.height(), CHART_SIZE);
    }

    #[test]
    fn test_missing_logo_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_logo(&dir.path().join("nope.png")).is_none());
        let not_an_image = dir.path().join("logo.png");
        std::fs::write(&not_an_image, "not a png").unwrap();
        assert!(load_logo(&not_an_image).is_none());
    }
}
