//! md2docx CLI - Markdown to DOCX conversion tool
//!
//! A command-line tool for converting Markdown into Word documents styled
//! after a template.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use md2docx::model::StyleInfo;
use md2docx::{LineAnalysis, Md2Docx, RenderOptions, StyleRegistry, TemplateAnalysis};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Markdown to DOCX conversion using a styled template
#[derive(Parser)]
#[command(
    name = "md2docx",
    author = "iyulab",
    version,
    about = "Convert Markdown to DOCX using a template's styles",
    long_about = "md2docx - Markdown to DOCX conversion with template styles.\n\n\
                  Write Markdown markers in a Word template (# Heading, - item, > quote)\n\
                  and format those paragraphs the way generated content should look.\n\n\
                  Usage:\n  \
                  md2docx convert <template> <input.md> -o out.docx\n  \
                  md2docx analyze <template>"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Markdown to DOCX
    Convert {
        /// Template .docx file
        template: PathBuf,

        /// Markdown input file (default: stdin, or "-")
        input: Option<PathBuf>,

        /// Output file path
        #[arg(short, long, default_value = "output.docx")]
        output: PathBuf,

        /// Do not emit empty paragraphs for blank lines
        #[arg(long)]
        no_blank_paragraphs: bool,

        /// Blank lines needed between blocks to emit an empty paragraph
        #[arg(long, default_value_t = 1, value_name = "N")]
        space_lines: usize,

        /// Do not carry the template's headers, footers and page size
        #[arg(long)]
        no_page_setup: bool,
    },

    /// Show how a template's paragraphs were matched to styles
    Analyze {
        /// Template .docx file
        template: PathBuf,

        /// Output the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            template,
            input,
            output,
            no_blank_paragraphs,
            space_lines,
            no_page_setup,
        } => {
            let markdown = read_input(input.as_deref())?;

            let pb = create_spinner("Analyzing template...");

            let options = RenderOptions::new()
                .with_blank_paragraphs(!no_blank_paragraphs)
                .with_space_blank_lines(space_lines)
                .with_page_setup(!no_page_setup);
            let mut session = Md2Docx::new().with_options(options);
            session.load_template(&template)?;

            pb.set_message("Generating document...");
            let document = session.convert(&markdown)?;
            document.write_to(&output)?;

            pb.finish_and_clear();
            println!(
                "{} Converted to DOCX: {} ({} bytes)",
                "✓".green().bold(),
                output.display(),
                document.len()
            );
        }

        Commands::Analyze { template, json } => {
            let pb = create_spinner("Analyzing template...");

            let mut session = Md2Docx::new();
            let loaded = session.load_template(&template)?;

            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(loaded.analysis())?);
            } else {
                print_analysis(&template, loaded.analysis(), loaded.registry());
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Reads Markdown from a file, or from stdin for `-` or no path.
fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p),
        _ => {
            let mut buffer = String::new();
            io::stdin().lock().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn print_analysis(template: &Path, analysis: &TemplateAnalysis, registry: &StyleRegistry) {
    println!("{}", "Template Analysis".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        template.file_name().unwrap_or_default().to_string_lossy()
    );

    for line in &analysis.lines {
        println!("{}", format_line(line));
    }
    if let Some(ref table) = analysis.table {
        println!("{}", format_line(table));
    }

    println!("\n{}", "Style Registry".cyan().bold());
    println!("{}", "─".repeat(40));
    for (role, style) in registry.iter() {
        let description = match style {
            StyleInfo::Paragraph(style) => {
                format!("{} ({})", style.style_id, style.source_text)
            }
            StyleInfo::Table(_) => "first table".to_string(),
        };
        println!("{}: {}", role.key().bold(), description);
    }
}

fn format_line(line: &LineAnalysis) -> String {
    match line.role {
        Some(role) => format!("{} {}", line.text, format!("[matched: {role}]").green()),
        None => format!("{} {}", line.text, "[unmatched]".dimmed()),
    }
}

fn print_version() {
    println!("{} {}", "md2docx".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown to DOCX conversion using template styles");
    println!();
    println!("Roles: h1-h6, p, blockquote, ol, ul, table");
    println!("Repository: https://github.com/iyulab/md2docx");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
