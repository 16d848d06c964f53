//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use docxkit_ooxml::{Block, Package, PackageOptions, Paragraph, RelType};

/// Options file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "docxkit.toml";

/// Longest paragraph excerpt shown by `inspect`
const EXCERPT_CHARS: usize = 60;

#[derive(Parser)]
#[command(name = "docxkit")]
#[command(author, version, about = "Read, edit and write .docx packages", long_about = None)]
struct Cli {
    /// Package options file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parts, relationships and block structure of a package
    Inspect {
        /// Input DOCX file
        input: PathBuf,
    },

    /// Print the plain text of a package
    Text {
        /// Input DOCX file
        input: PathBuf,
    },

    /// Unpack and pack a package, checking that nothing was lost
    Roundtrip {
        /// Input DOCX file
        input: PathBuf,

        /// Output DOCX file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Create a new package
    New {
        /// Output DOCX file
        #[arg(short, long)]
        output: PathBuf,

        /// Paragraph text, one paragraph per occurrence
        #[arg(short, long)]
        text: Vec<String>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { input } => inspect_command(&input, options),
        Commands::Text { input } => text_command(&input, options),
        Commands::Roundtrip { input, output } => {
            roundtrip_command(&input, &output, options).map(|_| ())
        }
        Commands::New { output, text } => new_command(&output, &text, options),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    // A second initialisation (tests driving run_cli) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve package options from `--config`, then `docxkit.toml`, then defaults
pub fn load_options(config_path: Option<&Path>) -> Result<PackageOptions> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !candidate.exists() {
                return Ok(PackageOptions::default());
            }
            candidate
        }
    };

    debug!(path = %path.display(), "loading package options");
    PackageOptions::from_file(&path)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

fn open_package(input: &Path, options: PackageOptions) -> Result<Package> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Package::open_with_options(input, options)
        .with_context(|| format!("Failed to open DOCX file: {}", input.display()))
}

/// Execute the inspect command
pub fn inspect_command(input: &Path, options: PackageOptions) -> Result<()> {
    let package = open_package(input, options)?;
    print!("{}", inspect_report(&package));
    Ok(())
}

/// Human-readable description of a package
pub fn inspect_report(package: &Package) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Document part: {}", package.document_path());

    let _ = writeln!(out, "Other parts:");
    for path in package.files().paths() {
        let _ = writeln!(out, "  {path}");
    }

    let _ = writeln!(out, "Relationships:");
    for rel in package.relationships().iter() {
        let kind = match rel.kind() {
            RelType::Other => rel.rel_type.rsplit('/').next().unwrap_or_default().to_string(),
            kind => format!("{kind:?}"),
        };
        let external = if rel.is_external() { " (external)" } else { "" };
        let _ = writeln!(out, "  {} {} -> {}{}", rel.id, kind, rel.target, external);
    }

    let body = &package.document().body;
    let _ = writeln!(out, "Blocks: {}", body.children.len());
    for (index, block) in body.children.iter().enumerate() {
        let _ = writeln!(out, "  {:>3} {}", index + 1, summarize_block(block));
    }

    let images = package.document().image_ids();
    if !images.is_empty() {
        let _ = writeln!(out, "Images: {}", images.join(", "));
    }
    out
}

fn summarize_block(block: &Block) -> String {
    match block {
        Block::Paragraph(paragraph) => summarize_paragraph(paragraph),
        Block::Table(table) => format!(
            "table {} row(s) x {} column(s)",
            table.rows().count(),
            table.grid.columns.len()
        ),
    }
}

fn summarize_paragraph(paragraph: &Paragraph) -> String {
    let text = paragraph.plain_text();
    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    if text.chars().count() > EXCERPT_CHARS {
        excerpt.push('…');
    }
    match paragraph.style_id() {
        Some(style) => format!("paragraph [{style}] {excerpt:?}"),
        None => format!("paragraph {excerpt:?}"),
    }
}

/// Execute the text command
pub fn text_command(input: &Path, options: PackageOptions) -> Result<()> {
    let package = open_package(input, options)?;
    println!("{}", package.document().plain_text());
    Ok(())
}

/// Outcome of a round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundtripReport {
    /// Size of the written package in bytes
    pub bytes: usize,
    /// Number of parts in the written package
    pub parts: usize,
    /// Whether the re-read document equals the one first decoded
    pub identical: bool,
}

/// Execute the roundtrip command
///
/// Fails when the document read back from `output` differs from the one
/// decoded from `input`.
pub fn roundtrip_command(
    input: &Path,
    output: &Path,
    options: PackageOptions,
) -> Result<RoundtripReport> {
    println!("Round trip: {} -> {}", input.display(), output.display());

    let mut package = open_package(input, options.clone())?;
    let bytes = package
        .pack()
        .with_context(|| format!("Failed to pack document: {}", input.display()))?;
    fs::write(output, &bytes)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    let reread = Package::open_with_options(output, options)
        .with_context(|| format!("Failed to reopen output file: {}", output.display()))?;

    let report = RoundtripReport {
        bytes: bytes.len(),
        parts: package.files().len(),
        identical: reread.document() == package.document(),
    };

    println!("  Parts: {}", report.parts);
    println!("  Size: {} bytes", report.bytes);
    if !report.identical {
        anyhow::bail!(
            "Decoded documents differ after round trip: {}",
            input.display()
        );
    }
    println!("  Document tree: identical");
    Ok(report)
}

/// Execute the new command
pub fn new_command(output: &Path, paragraphs: &[String], options: PackageOptions) -> Result<()> {
    let mut package = Package::with_options(options);
    let document = package.document_mut();
    for text in paragraphs {
        document.add_paragraph(Paragraph::with_text(text.as_str()));
    }

    package
        .save(output)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    println!("Created: {}", output.display());
    println!("  {} paragraph(s)", paragraphs.len());
    Ok(())
}
