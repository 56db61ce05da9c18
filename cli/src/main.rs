//! pdfquest CLI - exam question extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfquest::{extract_records, to_json, BlockSource, Classifier, JsonFormat, LopdfBackend};

#[derive(Parser)]
#[command(name = "pdfquest")]
#[command(version)]
#[command(about = "Extract exam questions and their images from PDF papers", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract questions and images into an output directory
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            compact,
        }) => cmd_extract(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract if input is provided
            if let Some(input) = cli.input {
                cmd_extract(&input, cli.output.as_deref(), cli.compact)
            } else {
                println!("{}", "Usage: pdfquest <FILE> [OUTPUT]".yellow());
                println!("       pdfquest --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    // Parse document
    pb.set_message("Parsing PDF...");
    let backend = LopdfBackend::load_file(input)?;
    pb.inc(1);

    // Walk the page stream: tag images, split questions, write image files
    pb.set_message("Extracting questions...");
    let images_dir = output_dir.join("images");
    fs::create_dir_all(&images_dir)?;
    let records = extract_records(&backend, &images_dir)?;
    pb.inc(1);

    // Write structured JSON
    pb.set_message("Writing JSON...");
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&records, format)?;
    let json_path = output_dir.join("questions_structured.json");
    fs::write(&json_path, &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} questions_structured.json", "├─".dimmed());
    println!("  {} images/", "└─".dimmed());
    println!();
    println!("{}: {}", "Questions".bold(), records.len());
    println!("{} {}", "Saved to".green(), json_path.display());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let backend = LopdfBackend::load_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), backend.version());
    println!("{}: {}", "Pages".bold(), backend.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if backend.is_encrypted() { "Yes" } else { "No" }
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let blocks = backend.blocks()?;
    let stream = Classifier::new().classify(&blocks)?;
    let text = stream.joined_text();
    let words: usize = text.split_whitespace().count();

    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Text fragments".bold(), stream.flat_text.len());
    println!("{}: {}", "Images".bold(), stream.images.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfquest".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Exam question extraction tool for PDF papers");
    println!();
    println!("License: MIT");
}
