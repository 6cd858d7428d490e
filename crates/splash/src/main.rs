//! splash CLI - Syntax highlight the code blocks of HTML files.

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use splash::{DEFAULT_STYLE, ProcessOptions, Processor, Splash};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Syntax highlight the `<pre>` and `<code>` blocks of HTML files.
///
/// Files are rewritten in place unless an output directory is given. Pass `-`
/// as the only input to filter stdin to stdout.
#[derive(Debug, Parser)]
#[command(name = "splash", version, about)]
struct Args {
    /// HTML files or directories to process
    #[arg(required_unless_present = "list_styles")]
    inputs: Vec<PathBuf>,

    /// Style to highlight with
    #[arg(short, long, default_value = DEFAULT_STYLE)]
    style: String,

    /// Decode HTML entities in code blocks before highlighting
    #[arg(long)]
    unescape: bool,

    /// Output directory (defaults to modifying inputs in place)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    /// List the available styles and exit
    #[arg(long)]
    list_styles: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    let splash = Splash::new();

    if args.list_styles {
        let default = &splash.styles().default_style().name;
        for name in splash.styles().names() {
            if name == default {
                println!("{} {}", name, "(default)".dimmed());
            } else {
                println!("{name}");
            }
        }
        return Ok(());
    }

    if splash.styles().resolve(&args.style).is_none() {
        eprintln!(
            "{} Unknown style {:?}, using {}",
            "Warning:".yellow(),
            args.style,
            splash.styles().default_style().name
        );
    }

    if args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-" {
        return filter_stdin(&splash, &args);
    }

    for input in &args.inputs {
        if !input.exists() {
            bail!("Input does not exist: {}", input.display());
        }
    }

    let options = ProcessOptions {
        inputs: args.inputs.clone(),
        output_dir: args.output.clone(),
        style: args.style.clone(),
        unescape: args.unescape,
        verbose: args.verbose,
    };
    let processor = Processor::with_splash(options, splash);

    // Print header
    eprintln!(
        "{} Highlighting {} input(s) with style {}",
        "splash".green().bold(),
        args.inputs.len(),
        args.style.cyan()
    );
    if let Some(out) = &args.output {
        eprintln!("  Output: {}", out.display());
    } else {
        eprintln!("  {} Modifying in place", "Note:".yellow());
    }
    eprintln!();

    let start = Instant::now();
    let stats = processor.process()?;
    let elapsed = start.elapsed();

    // Print results
    eprintln!("{}", "Results:".bold());
    eprintln!(
        "  {} HTML files processed",
        stats.files_processed.to_string().cyan()
    );
    eprintln!(
        "  {} code blocks highlighted",
        stats.blocks_highlighted.to_string().green()
    );
    eprintln!(
        "  {} code blocks skipped (already highlighted or nested)",
        stats.blocks_skipped.to_string().yellow()
    );
    eprintln!(
        "  {:.1}% size increase, {:.1} MB/s",
        stats.html_inflation_percent(),
        stats.throughput_mb_s()
    );

    if stats.files_failed > 0 {
        eprintln!("\n  {} Failed files:", "Error:".red().bold());
        for (_, error) in &stats.failed_files {
            eprintln!("    {error}");
        }
    }

    eprintln!("\n  Completed in {:.2}s", elapsed.as_secs_f64());

    if stats.files_failed > 0 {
        bail!("{} file(s) could not be highlighted", stats.files_failed);
    }

    Ok(())
}

fn filter_stdin(splash: &Splash, args: &Args) -> Result<()> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;

    let output = splash
        .highlight_bytes(&input, &args.style, args.unescape)
        .context("failed to highlight stdin")?;

    std::io::stdout()
        .write_all(&output)
        .context("failed to write stdout")?;
    Ok(())
}
