use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pdfparse_convert::HtmlToPdfConverter;
use pdfparse_core::config_file::{self, ConfigFile};
use pdfparse_core::{PageSelector, parse_page_range};
use pdfparse_extract::PdfTextExtractor;

mod output;
mod settings;

use output::ColorMode;
use settings::{ConvertFlags, process_env, resolve_convert, resolve_extract};

/// PDFParse - convert HTML to PDF and extract text from PDF files
#[derive(Parser, Debug)]
#[command(name = "pdfparse", version, about, long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Read settings from this TOML file instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an HTML file (or string) to PDF
    Convert(ConvertArgs),

    /// Extract text, metadata or search results from a PDF
    Extract(ExtractArgs),

    /// Search a PDF for a literal string
    Search {
        /// PDF file to search
        pdf: PathBuf,

        /// Text to look for (matched literally)
        query: String,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Extraction engine: lopdf, pdf-extract or mupdf
        #[arg(long)]
        backend: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input HTML file, or literal HTML with --string
    input: String,

    /// Output PDF path
    output: PathBuf,

    /// Rendering engine: chromium, printpdf or genpdf
    #[arg(long)]
    backend: Option<String>,

    /// Treat INPUT as an HTML string instead of a file path
    #[arg(long)]
    string: bool,

    /// CSS file to apply to the document
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Page size: A4, letter or legal
    #[arg(long)]
    page_size: Option<String>,

    /// Top margin (CSS length, default 0.75in)
    #[arg(long)]
    margin_top: Option<String>,

    /// Right margin
    #[arg(long)]
    margin_right: Option<String>,

    /// Bottom margin
    #[arg(long)]
    margin_bottom: Option<String>,

    /// Left margin
    #[arg(long)]
    margin_left: Option<String>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// PDF file to read
    pdf: PathBuf,

    /// Write extracted text to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extraction engine: lopdf, pdf-extract or mupdf
    #[arg(long)]
    backend: Option<String>,

    /// Pages to extract, 1-indexed: "1,3,5" or "1-5"
    #[arg(long)]
    pages: Option<String>,

    /// Search for this text instead of printing it
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Make --search case sensitive
    #[arg(long)]
    case_sensitive: bool,

    /// Print document metadata instead of text
    #[arg(long)]
    metadata: bool,

    /// Skip whitespace and spacing cleanup
    #[arg(long)]
    raw: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config_file::read_config(path)
            .with_context(|| format!("could not read config file {}", path.display()))?,
        // The configured log level is not known yet, so warnings about
        // skipped files go through a temporary stderr subscriber.
        None => tracing::subscriber::with_default(startup_subscriber(), config_file::load_config),
    };
    init_tracing(&config);

    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    match cli.command {
        Command::Convert(args) => convert(args, &config, color),
        Command::Extract(args) => extract(args, &config, color),
        Command::Search {
            pdf,
            query,
            case_sensitive,
            backend,
        } => search(&pdf, &query, case_sensitive, backend, &config, color),
    }
}

fn startup_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish()
}

/// Log to stderr. `RUST_LOG` wins over the configured level.
fn init_tracing(config: &ConfigFile) {
    let level = config
        .logging
        .as_ref()
        .and_then(|l| l.level.clone())
        .unwrap_or_else(|| "warn".to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn convert(args: ConvertArgs, config: &ConfigFile, color: ColorMode) -> anyhow::Result<()> {
    let flags = ConvertFlags {
        backend: args.backend,
        css: args.css,
        page_size: args.page_size,
        margin_top: args.margin_top,
        margin_right: args.margin_right,
        margin_bottom: args.margin_bottom,
        margin_left: args.margin_left,
    };
    let settings = resolve_convert(flags, config, process_env)?;
    tracing::debug!(backend = %settings.backend, page_size = %settings.options.page_size, "converting");

    let mut converter = HtmlToPdfConverter::new(&settings.backend)?;
    if let Some(chrome) = settings.chrome_path {
        converter = converter.with_chrome_executable(chrome);
    }
    if settings.font_dir.is_some() || settings.font_name.is_some() {
        converter = converter.with_fonts(
            settings
                .font_dir
                .unwrap_or_else(|| PathBuf::from(pdfparse_convert::DEFAULT_FONT_DIR)),
            settings
                .font_name
                .unwrap_or_else(|| pdfparse_convert::DEFAULT_FONT_NAME.to_string()),
        );
    }

    let ok = if args.string {
        converter.convert_string(&args.input, &args.output, &settings.options)
    } else {
        converter.convert_file(Path::new(&args.input), &args.output, &settings.options)?
    };

    if !ok {
        anyhow::bail!("Conversion failed (see log output for details)");
    }

    let msg = format!("Successfully converted to PDF: {}", args.output.display());
    if color.enabled() {
        println!("{}", msg.green());
    } else {
        println!("{msg}");
    }
    Ok(())
}

fn extract(args: ExtractArgs, config: &ConfigFile, color: ColorMode) -> anyhow::Result<()> {
    let settings = resolve_extract(args.backend, args.raw, config, process_env);
    tracing::debug!(backend = %settings.backend, clean = settings.clean_text, "extracting");
    let extractor = PdfTextExtractor::new(&settings.backend)?;

    let mut stdout = std::io::stdout().lock();

    if args.metadata {
        let metadata = extractor.get_metadata(&args.pdf)?;
        output::print_metadata(&mut stdout, &metadata, color)?;
        return Ok(());
    }

    if let Some(query) = &args.search {
        let matches = extractor.search_text(&args.pdf, query, args.case_sensitive)?;
        output::print_search_results(&mut stdout, query, &matches, color)?;
        return Ok(());
    }

    let selector = match &args.pages {
        Some(spec) => parse_page_range(spec)?,
        None => PageSelector::All,
    };
    let text = extractor.extract_text(&args.pdf, &selector, settings.clean_text)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("could not write {}", path.display()))?;
            let msg = format!("Text written to {}", path.display());
            if color.enabled() {
                writeln!(stdout, "{}", msg.green())?;
            } else {
                writeln!(stdout, "{msg}")?;
            }
        }
        None => writeln!(stdout, "{text}")?,
    }
    Ok(())
}

fn search(
    pdf: &Path,
    query: &str,
    case_sensitive: bool,
    backend: Option<String>,
    config: &ConfigFile,
    color: ColorMode,
) -> anyhow::Result<()> {
    let settings = resolve_extract(backend, false, config, process_env);
    let extractor = PdfTextExtractor::new(&settings.backend)?;
    let matches = extractor.search_text(pdf, query, case_sensitive)?;

    let mut stdout = std::io::stdout().lock();
    output::print_search_results(&mut stdout, query, &matches, color)?;
    Ok(())
}
