//! xlsheet CLI - SpreadsheetML workbook inspection tool
//!
//! A command-line tool for looking inside XLSX files: properties, cells,
//! package relationships, or the whole workbook as JSON.

mod logger;

use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;
use xlsheet::model::{Cell, CellValue, Workbook, Worksheet};
use xlsheet::ReadOptions;

/// Inspect SpreadsheetML (.xlsx) workbooks
#[derive(Parser)]
#[command(
    name = "xlsheet",
    version,
    about = "Inspect Excel workbooks",
    long_about = "xlsheet - SpreadsheetML (.xlsx) reader.\n\n\
                  Loads a workbook completely and shows its properties, cells,\n\
                  package manifest, or the whole model as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keep cached values instead of formulas
    #[arg(long, global = true)]
    values_only: bool,

    /// Do not require every relationship target to exist
    #[arg(long, global = true)]
    lenient: bool,

    /// Increase log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show workbook information and properties
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// List the cells of a sheet
    Cells {
        /// Input file path
        input: PathBuf,

        /// Sheet title (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Show at most this many cells
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Convert a workbook to JSON
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show package relationships and content types
    Manifest {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = ReadOptions::new()
        .with_values_only(cli.values_only)
        .with_strict_relationships(!cli.lenient);

    match cli.command {
        Commands::Info { input } => {
            let workbook = load(&input, options, "Analyzing workbook...")?;
            print_info(&input, &workbook);
        }

        Commands::Cells {
            input,
            sheet,
            limit,
        } => {
            let workbook = load(&input, options, "Reading workbook...")?;
            let worksheet = match &sheet {
                Some(title) => workbook
                    .sheet_by_title(title)
                    .ok_or_else(|| format!("no sheet named {:?}", title))?,
                None => workbook
                    .worksheets
                    .first()
                    .ok_or("workbook has no sheets")?,
            };
            print_cells(&workbook, worksheet, limit.unwrap_or(usize::MAX))?;
        }

        Commands::Json {
            input,
            output,
            compact,
        } => {
            let pb = create_spinner("Reading workbook...");
            let workbook = xlsheet::load_file_with_options(&input, options)?;
            pb.set_message("Rendering to JSON...");

            let json = if compact {
                workbook.to_json_compact()?
            } else {
                workbook.to_json()?
            };

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to JSON: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Manifest { input } => {
            let workbook = load(&input, options, "Reading package...")?;
            print_manifest(&workbook);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn load(
    input: &Path,
    options: ReadOptions,
    message: &str,
) -> Result<Workbook, Box<dyn std::error::Error>> {
    let pb = create_spinner(message);
    let result = xlsheet::load_file_with_options(input, options);
    pb.finish_and_clear();
    Ok(result?)
}

fn print_info(input: &Path, workbook: &Workbook) {
    let props = &workbook.properties;

    println!("{}", "Workbook Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    if let Some(ref title) = props.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref creator) = props.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref modified_by) = props.last_modified_by {
        println!("{}: {}", "Last modified by".bold(), modified_by);
    }
    if let Some(created) = props.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(modified) = props.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }
    if let Some(ref application) = props.application {
        println!("{}: {}", "Application".bold(), application);
    }
    println!("{}: {:?}", "Calendar".bold(), workbook.calendar);
    for custom in &props.custom {
        println!("{}: {}", custom.name.bold(), custom.value);
    }

    println!("\n{}", "Sheets".cyan().bold());
    println!("{}", "─".repeat(40));
    for (descriptor, sheet) in workbook.sheets.iter().zip(&workbook.worksheets) {
        let dimension = sheet
            .dimension
            .or_else(|| sheet.used_range())
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {} [{:?}, {:?}] {} cells, {} merged, range {}",
            format!("{}.", descriptor.index + 1).dimmed(),
            sheet.title.bold(),
            sheet.kind,
            descriptor.state,
            sheet.cells.len(),
            sheet.merged_cells.len(),
            dimension
        );
    }

    let styles = &workbook.stylesheet;
    println!("\n{}", "Tables".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Shared strings".bold(), workbook.shared_strings.len());
    println!("{}: {}", "Number formats".bold(), styles.number_formats.len());
    println!("{}: {}", "Fonts".bold(), styles.fonts.len());
    println!("{}: {}", "Fills".bold(), styles.fills.len());
    println!("{}: {}", "Borders".bold(), styles.borders.len());
    println!("{}: {}", "Cell styles".bold(), styles.styles.len());
    println!("{}: {}", "Cell formats".bold(), styles.formats.len());
    if let Some(ref theme) = workbook.theme {
        println!("{}: {}", "Theme".bold(), theme.name);
    }
    println!("{}: {}", "Defined names".bold(), workbook.defined_names.len());
}

fn print_cells(
    workbook: &Workbook,
    worksheet: &Worksheet,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<(String, &str, String)> = worksheet
        .cells
        .values()
        .take(limit)
        .map(|cell| {
            (
                cell.reference.to_string(),
                cell.value.type_code(),
                display_value(workbook, cell),
            )
        })
        .collect();

    let reference_width = rows
        .iter()
        .map(|(r, _, _)| r.width())
        .max()
        .unwrap_or(0)
        .max("Cell".len());

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(
        handle,
        "{} {} {}",
        pad("Cell", reference_width).bold(),
        pad("Type", 4).bold(),
        "Value".bold()
    )?;
    for (reference, type_code, value) in &rows {
        writeln!(
            handle,
            "{} {} {}",
            pad(reference, reference_width),
            pad(type_code, 4).dimmed(),
            value
        )?;
    }
    Ok(())
}

/// Text shown for a cell: the formula when one is kept, ISO dates for
/// date-formatted numbers, otherwise the value itself.
fn display_value(workbook: &Workbook, cell: &Cell) -> String {
    if let Some(ref formula) = cell.formula {
        return format!("={}", formula);
    }
    if let CellValue::Number(serial) = cell.value {
        let is_date = cell
            .format_id
            .is_some_and(|id| workbook.stylesheet.is_date_format(id));
        if is_date {
            if let Some(iso) = workbook.calendar.serial_to_iso(serial) {
                return iso;
            }
        }
    }
    cell.value.to_string()
}

/// Pad to a display width, counting wide characters as two columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn print_manifest(workbook: &Workbook) {
    let manifest = &workbook.manifest;

    println!("{}", "Relationships".cyan().bold());
    println!("{}", "─".repeat(40));
    for rel in manifest.relationships() {
        let target = if rel.is_external() {
            format!("{} {}", rel.target, "(external)".dimmed())
        } else {
            rel.target_path()
        };
        println!(
            "{} {} {} -> {}",
            rel.source.dimmed(),
            rel.id.bold(),
            rel.rel_type.label(),
            target
        );
    }

    let content_types = manifest.content_types();
    println!("\n{}", "Content Types".cyan().bold());
    println!("{}", "─".repeat(40));
    for (extension, content_type) in &content_types.defaults {
        println!("{} {}", format!("*.{}", extension).bold(), content_type);
    }
    for (part, content_type) in &content_types.overrides {
        println!("{} {}", part.bold(), content_type);
    }
}

fn print_version() {
    println!("{} {}", "xlsheet".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("SpreadsheetML (.xlsx) workbook reader");
    println!();
    println!("Supported formats: XLSX, XLTX");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
