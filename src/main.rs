//! Date Stamper CLI Application.
//!
//! This binary provides a command-line interface for the datestamp library:
//! stamping a date next to the `ENTERED:` and `Date:` fields of a PDF, and
//! inspecting the text layout the anchors are found in.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use datestamp::domain::style::{DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE};
use datestamp::{PageText, Rgb, StampOptions, StampService, StandardFont};

/// PDF Date Stamper
///
/// Writes a date next to the first `ENTERED:` label and the first line
/// starting with `Date:`. Use the 'extract' subcommand to inspect the
/// text layout of a document.
#[derive(Parser)]
#[command(name = "datestamp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input PDF file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Date string to insert (defaults to today, YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    date: Option<String>,

    /// Font size in points
    #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f32,

    /// Text colour as "r,g,b" (0.0-1.0) or "#RRGGBB"
    #[arg(long, value_name = "COLOR", value_parser = parse_color)]
    color: Option<Rgb>,

    /// Standard PDF font name (see 'datestamp fonts')
    #[arg(long, value_name = "NAME", default_value = DEFAULT_FONT_NAME)]
    font: String,

    /// Write FreeText annotations instead of page content
    #[arg(long)]
    annotate: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the block/line/span layout of a PDF (for locating anchors)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Only show lines whose text matches this regular expression
        #[arg(short, long, value_name = "REGEX")]
        filter: Option<String>,

        /// Dump plain text instead of the layout
        #[arg(long, conflicts_with = "filter")]
        plain: bool,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the accepted font names
    Fonts,
}

fn parse_color(value: &str) -> std::result::Result<Rgb, String> {
    Rgb::parse(value).map_err(|e| e.to_string())
}

/// Stamp command handler with dependency injection.
struct StampHandler {
    service: StampService,
    verbose: bool,
}

impl StampHandler {
    /// Creates a handler using the content-stream or annotation writer.
    fn new(annotate: bool, verbose: bool) -> Self {
        let service = if annotate {
            StampService::with_annotation_writer()
        } else {
            StampService::with_content_writer()
        };
        Self { service, verbose }
    }

    /// Executes a stamping operation.
    fn stamp(&self, input: &Path, output: &Path, options: &StampOptions) -> Result<()> {
        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Writer: {}", self.service.writer_name());
        }

        let report = self
            .service
            .stamp(input, output, options)
            .with_context(|| "Stamping failed")?;

        if self.verbose && !report.has_insertions() {
            println!("⚠ No 'ENTERED:' or 'Date:' field found; output is an unchanged copy");
        }

        Ok(())
    }

    /// Prints the text layout of a PDF, or its plain text.
    fn extract(
        &self,
        input: &Path,
        filter: Option<&str>,
        plain: bool,
        output: Option<&Path>,
    ) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let text = if plain {
            self.service
                .extract_text(input)
                .with_context(|| "Text extraction failed")?
        } else {
            let filter = filter
                .map(Regex::new)
                .transpose()
                .with_context(|| "Invalid --filter expression")?;
            let pages = self
                .service
                .extract_layout(input)
                .with_context(|| "Layout extraction failed")?;
            render_layout(&pages, filter.as_ref())
        };

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            if self.verbose {
                println!(
                    "✓ Extracted {} characters → {}",
                    text.len(),
                    output_path.display()
                );
            }
        } else {
            print!("{}", text);
        }

        Ok(())
    }
}

/// Formats pages as an indented block/line/span tree.
fn render_layout(pages: &[PageText], filter: Option<&Regex>) -> String {
    let mut out = String::new();

    for page in pages {
        let _ = writeln!(
            out,
            "Page {} ({:.0} x {:.0})",
            page.number,
            page.geometry.width(),
            page.geometry.height()
        );
        for (index, block) in page.blocks.iter().enumerate() {
            let lines: Vec<_> = block
                .lines
                .iter()
                .map(|line| (line, line.full_text()))
                .filter(|(_, text)| filter.map_or(true, |re| re.is_match(text)))
                .collect();
            if lines.is_empty() {
                continue;
            }

            let _ = writeln!(out, "  Block {} {}", index + 1, block.bbox);
            for (line, text) in lines {
                let _ = writeln!(out, "    Line {} {:?}", line.bbox, text);
                for span in &line.spans {
                    let _ = writeln!(
                        out,
                        "      Span {} {} {:.1}pt {:?}",
                        span.bbox, span.font, span.size, span.text
                    );
                }
            }
        }
    }

    out
}

fn list_fonts() {
    for font in StandardFont::ALL {
        println!("{:<24} {}", font.base_font(), font.short_name());
    }
}

/// Builds stamp options from command-line flags.
fn build_options(cli: &Cli) -> StampOptions {
    let mut options = StampOptions::new()
        .with_font_size(cli.font_size)
        .with_font(cli.font.clone());
    if let Some(date) = &cli.date {
        options = options.with_date(date.clone());
    }
    if let Some(color) = cli.color {
        options = options.with_color(color);
    }
    if cli.quiet {
        options = options.quiet();
    }
    options
}

fn run(cli: Cli) -> Result<()> {
    let verbose = !cli.quiet;

    match &cli.command {
        Some(Commands::Extract {
            input,
            filter,
            plain,
            output,
        }) => {
            let handler = StampHandler::new(false, verbose);
            handler.extract(input, filter.as_deref(), *plain, output.as_deref())?;
        }
        Some(Commands::Fonts) => list_fonts(),
        None => {
            // Default: stamping mode
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            let handler = StampHandler::new(cli.annotate, verbose);
            handler.stamp(input, output, &build_options(&cli))?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("⚠ Error: {:#}", e);
        std::process::exit(1);
    }
}
