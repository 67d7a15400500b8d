//! Sticker Sheets CLI tool
//!
//! A command-line tool for generating die-cut QR sticker sheets as PDFs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use image::imageops::FilterType;
use image::{Luma, Rgb, RgbImage};
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::path::PathBuf;
use std::process;

use sticker_sheets::catalog::{scan_qr_directory, QR_FILE_PREFIX};
use sticker_sheets::layout::GridConfig;
use sticker_sheets::overrides::{
    load_override_map, parse_id_list, save_override_map, OverrideMap,
};
use sticker_sheets::pdf::{generate_sheets, pages_needed, summarize, SheetOptions};

/// Sticker Sheets - lay out QR keychain stickers on printable A3 sheets
#[derive(Parser)]
#[command(name = "sticker-sheets")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Generate sheets from ./qrs with the default logo
    sticker-sheets generate

    # Generate into a specific file and open it
    sticker-sheets generate -o batch-07.pdf --open

    # Give IDs 1, 5 and 10 through 12 a special logo
    sticker-sheets assign --ids \"1, 5, 10-12\" --logo logos/gold.png

    # Check what a run would produce without generating
    sticker-sheets status

    # Create a test logo plus 50 sample QR images
    sticker-sheets sample --count 50")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the sticker sheet PDF from the QR directory
    Generate {
        /// Directory holding whokey-<number>.png images
        #[arg(long, default_value = "qrs")]
        qr_dir: PathBuf,

        /// Default logo used for rows without an override
        #[arg(long, default_value = "logo.png")]
        logo: PathBuf,

        /// Override store file mapping identifiers to logo paths
        #[arg(long, default_value = "logo-overrides.json")]
        overrides: PathBuf,

        /// Output PDF file path
        #[arg(short, long, default_value = "sticker-sheets.pdf")]
        output: PathBuf,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Assign an override logo to a list of IDs
    Assign {
        /// IDs to assign, e.g. "1, 5, 10-12"
        #[arg(long)]
        ids: String,

        /// Logo image these IDs should use instead of the default
        #[arg(long)]
        logo: PathBuf,

        /// Override store file to update
        #[arg(long, default_value = "logo-overrides.json")]
        overrides: PathBuf,
    },

    /// Remove every override assignment
    Clear {
        /// Override store file to empty
        #[arg(long, default_value = "logo-overrides.json")]
        overrides: PathBuf,
    },

    /// Report catalog size, logo presence and the sheets a run would need
    Status {
        /// Directory holding whokey-<number>.png images
        #[arg(long, default_value = "qrs")]
        qr_dir: PathBuf,

        /// Default logo path to check
        #[arg(long, default_value = "logo.png")]
        logo: PathBuf,

        /// Override store file to count
        #[arg(long, default_value = "logo-overrides.json")]
        overrides: PathBuf,
    },

    /// Show page count and metadata of an existing PDF
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },

    /// Create a sample logo and QR images for trying the tool out
    Sample {
        /// Directory to fill with sample QR images
        #[arg(long, default_value = "qrs")]
        qr_dir: PathBuf,

        /// Path for the sample default logo
        #[arg(long, default_value = "logo.png")]
        logo: PathBuf,

        /// How many QR images to create
        #[arg(long, default_value_t = 50)]
        count: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            qr_dir,
            logo,
            overrides,
            output,
            open,
        } => cmd_generate(qr_dir, logo, overrides, output, open),
        Commands::Assign {
            ids,
            logo,
            overrides,
        } => cmd_assign(ids, logo, overrides),
        Commands::Clear { overrides } => cmd_clear(overrides),
        Commands::Status {
            qr_dir,
            logo,
            overrides,
        } => cmd_status(qr_dir, logo, overrides),
        Commands::Info { input } => cmd_info(input),
        Commands::Sample {
            qr_dir,
            logo,
            count,
        } => cmd_sample(qr_dir, logo, count),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Open a file with the system default application
fn open_file(path: &PathBuf) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Generate the sticker sheet PDF and print run statistics
fn cmd_generate(
    qr_dir: PathBuf,
    logo: PathBuf,
    overrides: PathBuf,
    output: PathBuf,
    open: bool,
) -> Result<()> {
    // A broken override store should not block a print run
    let override_map = match load_override_map(&overrides) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Warning: {} (continuing without overrides)", e);
            OverrideMap::new()
        }
    };

    eprintln!("Generating sticker sheets from {}...", qr_dir.display());

    let options = SheetOptions {
        qr_dir,
        default_logo: logo,
        overrides: override_map,
        output_path: output.clone(),
        config: GridConfig::a3(),
    };

    let result = generate_sheets(&options)?;

    println!("Output: {}", output.display());
    println!("Pages: {}", result.total_pages);
    println!("Rows: {}", result.total_rows);
    println!("Logo stickers: {}", result.logo_stickers);
    println!("QR stickers: {}", result.qr_stickers);
    println!("Overrides applied: {}", result.overrides_applied);

    if !result.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &result.warnings {
            eprintln!("  {}", warning);
        }
    }

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Point a list of IDs at an override logo
fn cmd_assign(ids: String, logo: PathBuf, overrides: PathBuf) -> Result<()> {
    let parsed = parse_id_list(&ids);
    if parsed.is_empty() {
        bail!("No valid IDs in {:?}", ids);
    }
    if !logo.exists() {
        bail!("Logo file not found: {}", logo.display());
    }

    let mut map =
        load_override_map(&overrides).context("Failed to load the override store")?;
    for id in &parsed {
        map.insert(*id, logo.clone());
    }
    save_override_map(&overrides, &map).context("Failed to save the override store")?;

    let listed: Vec<String> = parsed.iter().map(|id| id.to_string()).collect();
    println!(
        "Assigned {} to {} ID(s): {}",
        logo.display(),
        parsed.len(),
        listed.join(", ")
    );

    Ok(())
}

/// Empty the override store
fn cmd_clear(overrides: PathBuf) -> Result<()> {
    save_override_map(&overrides, &OverrideMap::new())
        .context("Failed to save the override store")?;
    println!("Override store cleared: {}", overrides.display());
    Ok(())
}

/// Report what a generation run would find and produce
fn cmd_status(qr_dir: PathBuf, logo: PathBuf, overrides: PathBuf) -> Result<()> {
    let qr_count = match scan_qr_directory(&qr_dir) {
        Ok(entries) => entries.len(),
        Err(e) => {
            println!("QR images: none ({})", e);
            0
        }
    };
    if qr_count > 0 {
        println!("QR images: {} in {}", qr_count, qr_dir.display());
    }

    if logo.exists() {
        println!("Default logo: {}", logo.display());
    } else {
        println!("Default logo: MISSING ({})", logo.display());
    }

    match load_override_map(&overrides) {
        Ok(map) => println!("Overrides: {}", map.len()),
        Err(e) => println!("Overrides: unreadable ({})", e),
    }

    println!("Sheets needed: {}", pages_needed(qr_count, &GridConfig::a3())?);

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    let summary = summarize(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", summary.page_count);

    if let Some(title) = summary.title {
        println!("Title: {}", title);
    }
    if let Some(author) = summary.author {
        println!("Author: {}", author);
    }

    Ok(())
}

/// Create a sample default logo plus numbered QR images
fn cmd_sample(qr_dir: PathBuf, logo: PathBuf, count: u32) -> Result<()> {
    fs::create_dir_all(&qr_dir)
        .with_context(|| format!("Failed to create {}", qr_dir.display()))?;

    write_sample_logo(&logo)?;
    eprintln!("Sample logo: {}", logo.display());

    for i in 1..=count {
        let payload = format!("https://whokey.com/verify/{:03}", i);
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
        let rendered = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(6, 6)
            .build();
        let scaled = image::imageops::resize(&rendered, 210, 210, FilterType::Lanczos3);
        scaled.save(qr_dir.join(format!("{}-{:03}.png", QR_FILE_PREFIX, i)))?;
    }
    eprintln!("Created {} sample QR images in {}", count, qr_dir.display());

    Ok(())
}

/// Draw a flat circular placeholder logo with a darker outline
fn write_sample_logo(path: &PathBuf) -> Result<()> {
    const SIZE: u32 = 250;
    const FILL: Rgb<u8> = Rgb([33, 150, 243]);
    const OUTLINE: Rgb<u8> = Rgb([25, 118, 210]);

    let center = SIZE as f64 / 2.0;
    let radius = center - 20.0;

    let mut img = RgbImage::from_pixel(SIZE, SIZE, Rgb([255, 255, 255]));
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = x as f64 + 0.5 - center;
            let dy = y as f64 + 0.5 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= radius {
                let color = if dist >= radius - 5.0 { OUTLINE } else { FILL };
                img.put_pixel(x, y, color);
            }
        }
    }
    img.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
