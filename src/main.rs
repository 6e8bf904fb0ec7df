// Form Fields PDF Generator
// Renders numbered notification-form fields to a printable PDF

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use form_fields_pdf::{sample_form, AppError, FormSpec};

// ============================================================================
// CLI
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Render numbered form fields to PDF")]
struct Args {
    /// Form description (JSON). Renders the built-in sample form when omitted.
    #[arg(short, long)]
    form: Option<PathBuf>,

    /// Output filename (defaults to formulario-{date}.pdf)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the sample form as JSON and exit
    #[arg(long)]
    print_sample: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    if args.print_sample {
        println!("{}", sample_form().to_json()?);
        return Ok(());
    }

    let form = match &args.form {
        Some(path) => FormSpec::load(path)?,
        None => sample_form(),
    };
    let title = form.title.clone();
    let fields = form.field_count();

    let output_file = args
        .output
        .unwrap_or_else(|| format!("formulario-{}.pdf", Local::now().format("%Y-%m-%d")));

    let doc = form.into_document()?;
    let pages = doc.save(Path::new(&output_file))?;

    println!("✓ Generated: {}", output_file);
    println!("  Form: {}", title);
    println!("  Fields: {}", fields);
    println!("  Pages: {}", pages);

    Ok(())
}
