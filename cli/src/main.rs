//! sectrank CLI - rank and summarize PDF sections per persona and task

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sectrank::pipeline::discover_collections;
use sectrank::{
    render, CollectionOutcome, CollectionPipeline, ErrorMode, JsonFormat, LayoutHeuristicsConfig,
    LopdfTextSource, PdfTextSource, PipelineOptions, StructureRecovery,
};

#[derive(Parser)]
#[command(name = "sectrank")]
#[command(version)]
#[command(
    about = "Extract, rank and summarize PDF sections for a persona and task",
    long_about = None
)]
struct Cli {
    /// Root directory holding collection directories
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,

    /// Number of ranked sections per collection
    #[arg(long, global = true, default_value_t = 5)]
    top_k: usize,

    /// Character budget of each refined summary
    #[arg(long, global = true, default_value_t = 600)]
    max_chars: usize,

    /// Title characters used to locate section boundaries
    #[arg(long, global = true, default_value_t = 10)]
    title_chars: usize,

    /// Process collections one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Fail a collection on the first unreadable PDF
    #[arg(long, global = true)]
    strict: bool,

    /// Do not write output files
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every collection under a root directory
    Run {
        /// Root directory (current directory if not specified)
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,
    },

    /// Process a single collection directory
    Collection {
        /// Collection directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Print the full output record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the sections recovered from a PDF as JSON
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the headings detected in a PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn layout(&self) -> LayoutHeuristicsConfig {
        LayoutHeuristicsConfig::new().with_title_match_chars(self.title_chars)
    }

    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions::new()
            .with_layout(self.layout())
            .with_top_k(self.top_k)
            .with_max_summary_chars(self.max_chars)
            .with_parallel(!self.sequential)
            .with_error_mode(if self.strict {
                ErrorMode::Strict
            } else {
                ErrorMode::Lenient
            })
            .with_dry_run(self.dry_run)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.pipeline_options();
    let layout = cli.layout();
    log::debug!("Pipeline options: {:?}", options);

    let result = match cli.command {
        Some(Commands::Run { root }) => {
            let root = root.or(cli.root).unwrap_or_else(|| PathBuf::from("."));
            cmd_run(&root, options)
        }
        Some(Commands::Collection { dir, json }) => cmd_collection(&dir, options, json),
        Some(Commands::Sections { input, compact }) => cmd_sections(&input, &layout, compact),
        Some(Commands::Outline { input }) => cmd_outline(&input, &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
            cmd_run(&root, options)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_run(root: &Path, options: PipelineOptions) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = CollectionPipeline::new(options)?;
    let total = discover_collections(root)?.len() as u64;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = pipeline.run_batch_with(root, |dir, _| {
        pb.set_message(display_name(dir));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    for (dir, outcome) in &report.outcomes {
        match outcome {
            CollectionOutcome::Processed { sections } => {
                println!("{} {} ({} sections)", "✓".green(), display_name(dir), sections);
            }
            CollectionOutcome::Skipped => {
                println!("{} {} (not a collection)", "-".dimmed(), display_name(dir));
            }
            CollectionOutcome::Failed(e) => {
                println!("{} {}: {}", "✗".red(), display_name(dir), e);
            }
        }
    }

    println!(
        "\n{} {} processed, {} skipped, {} failed",
        "Done!".green().bold(),
        report.processed(),
        report.skipped(),
        report.failed()
    );

    if !report.is_success() {
        return Err(format!("{} collection(s) failed", report.failed()).into());
    }
    Ok(())
}

fn cmd_collection(
    dir: &Path,
    options: PipelineOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = dir.join(&options.output_file_name);
    let dry_run = options.dry_run;
    let pipeline = CollectionPipeline::new(options)?;

    let output = pipeline.process_collection(dir)?.ok_or_else(|| {
        format!(
            "{} is not a collection (needs {} and {}/)",
            dir.display(),
            pipeline.options().input_file_name,
            pipeline.options().pdf_dir_name
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Ranked Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for section in &output.extracted_sections {
        println!(
            "{:>2}. {} {}",
            section.importance_rank,
            section.section_title.bold(),
            format!("({}, p. {})", section.document, section.page_number).dimmed()
        );
    }

    if dry_run {
        println!("\n{}", "Dry run: nothing written".yellow());
    } else {
        println!("\n{} {}", "Saved to".green(), output_path.display());
    }
    Ok(())
}

fn cmd_sections(
    input: &Path,
    layout: &LayoutHeuristicsConfig,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    layout.validate()?;
    let document = LopdfTextSource::new().extract(input)?;
    let sections = StructureRecovery::new(layout).sections(&document, &display_name(input));

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", render::to_json(&sections, format)?);
    Ok(())
}

fn cmd_outline(input: &Path, layout: &LayoutHeuristicsConfig) -> Result<(), Box<dyn std::error::Error>> {
    layout.validate()?;
    let document = LopdfTextSource::new().extract(input)?;
    let headings = StructureRecovery::new(layout).headings(&document);

    println!("{}", "Document Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), document.page_count());
    println!("{}: {}", "Headings".bold(), headings.len());
    println!();
    print!("{}", render::to_outline(&headings));
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "sectrank".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Persona-driven PDF section ranking and summarization");
    println!();
    println!("License: MIT");
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
