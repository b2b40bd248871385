use std::path::{Path, PathBuf};

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Element as _, Margins, PaperSize, SimplePageDecorator};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use pdfparse_core::{BackendError, ConversionOptions, HtmlRenderer, PageSize};

/// Font directory used when none is configured.
pub const DEFAULT_FONT_DIR: &str = "/usr/share/fonts/truetype/liberation";
/// Font family used when none is configured.
pub const DEFAULT_FONT_NAME: &str = "LiberationSans";

/// Elements turned into flowables, matched in document order.
const FLOW_ELEMENTS: &str = "h1, h2, h3, h4, h5, h6, p, ul, ol, table";

/// One piece of the flow produced from the parsed HTML.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Block {
    Title(String),
    Subtitle(String),
    Heading(String),
    Paragraph(String),
    ListItem(String),
    /// Gap after a heading or list, in lines.
    Spacer(f64),
    Table(Vec<Vec<String>>),
}

/// Flowable layout builder over `genpdf`, fed by a `scraper` walk of the
/// HTML.
///
/// Only headings, paragraphs, lists and tables survive; inline styling, CSS
/// and images are dropped. Page size is honored but margins are fixed.
#[derive(Debug, Clone)]
pub struct GenpdfRenderer {
    font_dir: PathBuf,
    font_name: String,
}

impl Default for GenpdfRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_DIR, DEFAULT_FONT_NAME)
    }
}

impl GenpdfRenderer {
    /// Use the TrueType family `<font_name>-{Regular,Bold,Italic,BoldItalic}.ttf`
    /// from `font_dir`.
    pub fn new(font_dir: impl Into<PathBuf>, font_name: impl Into<String>) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_name: font_name.into(),
        }
    }
}

impl HtmlRenderer for GenpdfRenderer {
    fn name(&self) -> &'static str {
        "genpdf"
    }

    fn render(
        &self,
        html: &str,
        output: &Path,
        options: &ConversionOptions,
    ) -> Result<(), BackendError> {
        let (title, blocks) = layout_blocks(html);

        let family = genpdf::fonts::from_files(&self.font_dir, &self.font_name, None).map_err(|e| {
            BackendError::Render(format!(
                "could not load font '{}' from {}: {e}",
                self.font_name,
                self.font_dir.display()
            ))
        })?;

        let mut doc = genpdf::Document::new(family);
        doc.set_title(title.unwrap_or_default());
        doc.set_paper_size(paper_size(options.page_size));

        // 72pt sides and top, 18pt bottom
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(Margins::trbl(25.4, 25.4, 6.35, 25.4));
        doc.set_page_decorator(decorator);

        debug!(blocks = blocks.len(), "laying out document");
        for block in blocks {
            push_block(&mut doc, block)?;
        }

        doc.render_to_file(output)
            .map_err(|e| BackendError::Render(e.to_string()))
    }
}

fn paper_size(size: PageSize) -> PaperSize {
    match size {
        PageSize::A4 => PaperSize::A4,
        PageSize::Letter => PaperSize::Letter,
        PageSize::Legal => PaperSize::Legal,
    }
}

fn push_block(doc: &mut genpdf::Document, block: Block) -> Result<(), BackendError> {
    match block {
        Block::Title(text) => doc.push(Paragraph::new(text).styled(
            Style::new()
                .bold()
                .with_font_size(18)
                .with_color(Color::Rgb(0x2c, 0x3e, 0x50)),
        )),
        Block::Subtitle(text) => doc.push(Paragraph::new(text).styled(
            Style::new()
                .bold()
                .with_font_size(14)
                .with_color(Color::Rgb(0x34, 0x98, 0xdb)),
        )),
        Block::Heading(text) => {
            doc.push(Paragraph::new(text).styled(Style::new().bold().with_font_size(12)))
        }
        Block::Paragraph(text) | Block::ListItem(text) => doc.push(Paragraph::new(text)),
        Block::Spacer(lines) => doc.push(Break::new(lines)),
        Block::Table(rows) => doc.push(build_table(rows)?),
    }
    Ok(())
}

fn build_table(rows: Vec<Vec<String>>) -> Result<TableLayout, BackendError> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let mut table = TableLayout::new(vec![1; columns]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let header = Style::new()
        .bold()
        .with_font_size(12)
        .with_color(Color::Greyscale(90));
    // genpdf cells have no background fill, so body rows alternate text shade
    let shades = [Color::Greyscale(0), Color::Greyscale(70)];

    for (i, mut cells) in rows.into_iter().enumerate() {
        cells.resize(columns, String::new());
        let style = if i == 0 {
            header
        } else {
            Style::new().with_color(shades[i % 2])
        };
        let mut row = table.row();
        for cell in cells {
            row = row.element(Paragraph::new(cell).styled(style).padded(1));
        }
        row.push()
            .map_err(|e| BackendError::Render(e.to_string()))?;
    }
    Ok(table)
}

/// Walk the HTML and return the document title plus the flow blocks.
///
/// The title is the `<title>` text, falling back to the first `h1`.
pub(crate) fn layout_blocks(html: &str) -> (Option<String>, Vec<Block>) {
    let document = Html::parse_document(html);
    let mut blocks = Vec::new();

    let title = select_text(&document, "title").filter(|t| !t.is_empty());
    let first_h1 = select_text(&document, "h1");

    // Selectors are fixed strings; parse failures cannot happen at runtime
    let (Ok(flow), Ok(li), Ok(tr), Ok(cell)) = (
        Selector::parse(FLOW_ELEMENTS),
        Selector::parse("li"),
        Selector::parse("tr"),
        Selector::parse("td, th"),
    ) else {
        return (title.or(first_h1), blocks);
    };

    for element in document.select(&flow) {
        match element.value().name() {
            "h1" => {
                blocks.push(Block::Title(element_text(&element)));
                blocks.push(Block::Spacer(1.0));
            }
            "h2" | "h3" => {
                blocks.push(Block::Subtitle(element_text(&element)));
                blocks.push(Block::Spacer(0.66));
            }
            "h4" | "h5" | "h6" => {
                blocks.push(Block::Heading(element_text(&element)));
                blocks.push(Block::Spacer(0.5));
            }
            "p" => {
                let text = element_text(&element);
                if !text.is_empty() {
                    blocks.push(Block::Paragraph(text));
                    blocks.push(Block::Spacer(0.5));
                }
            }
            name @ ("ul" | "ol") => {
                for (n, item) in element.select(&li).enumerate() {
                    let prefix = if name == "ul" {
                        "• ".to_string()
                    } else {
                        format!("{}. ", n + 1)
                    };
                    blocks.push(Block::ListItem(format!("{prefix}{}", element_text(&item))));
                }
                blocks.push(Block::Spacer(0.5));
            }
            "table" => {
                let rows: Vec<Vec<String>> = element
                    .select(&tr)
                    .map(|row| row.select(&cell).map(|c| element_text(&c)).collect())
                    .filter(|row: &Vec<String>| !row.is_empty())
                    .collect();
                if !rows.is_empty() {
                    blocks.push(Block::Table(rows));
                }
            }
            _ => {}
        }
    }

    (title.or(first_h1), blocks)
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next().map(|e| element_text(&e))
}

/// Concatenated descendant text, whitespace runs collapsed.
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
