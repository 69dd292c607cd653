//! CLI entry point for `emlShell`.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use humansize::{format_size, BINARY};

use emlshell::{parse, parse_with_diagnostics, ParseResult};

#[derive(Parser)]
#[command(name = "emlshell", version, about = "Decode and inspect EML message files")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// EML file to show
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a message and print its body and summary
    Show {
        path: PathBuf,
        #[arg(long)]
        json: bool,
        /// Print parser recovery events to stderr
        #[arg(long)]
        diagnostics: bool,
    },
    /// Print the decoded headers
    Headers {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List attachments and inline images
    Attachments {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level);

    match cli.command {
        Some(Commands::Show {
            path,
            json,
            diagnostics,
        }) => cmd_show(&path, json, diagnostics),
        Some(Commands::Headers { path, json }) => cmd_headers(&path, json),
        Some(Commands::Attachments { path, json }) => cmd_attachments(&path, json),
        None => {
            if let Some(path) = cli.file {
                cmd_show(&path, false, false)
            } else {
                anyhow::bail!("no file given; see --help");
            }
        }
    }
}

fn setup_logging(level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn read_message(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("file not found: {}", path.display());
    }
    // EML files are not always valid UTF-8; decode lossily and let the
    // per-part charset handling do the real work.
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode a message and print its body.
fn cmd_show(path: &Path, json: bool, diagnostics: bool) -> anyhow::Result<()> {
    let text = read_message(path)?;

    let result = if diagnostics {
        let (result, events) = parse_with_diagnostics(&text)?;
        for event in &events {
            eprintln!("{event}");
        }
        result
    } else {
        parse(&text)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_summary(&result);
    println!();
    println!("{}", result.body);
    Ok(())
}

/// Print the decoded headers.
fn cmd_headers(path: &Path, json: bool) -> anyhow::Result<()> {
    let text = read_message(path)?;
    let result = parse(&text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.headers)?);
        return Ok(());
    }

    for (name, value) in result.headers.iter() {
        println!("{name}: {value}");
    }
    Ok(())
}

/// List attachments and inline images.
fn cmd_attachments(path: &Path, json: bool) -> anyhow::Result<()> {
    let text = read_message(path)?;
    let result = parse(&text)?;

    if json {
        #[derive(serde::Serialize)]
        struct Listing<'a> {
            attachments: &'a [emlshell::Attachment],
            inline_images: Vec<&'a str>,
        }
        let listing = Listing {
            attachments: &result.attachments,
            inline_images: result.inline_images.keys().map(String::as_str).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if result.attachments.is_empty() && result.inline_images.is_empty() {
        println!("  No attachments found.");
        return Ok(());
    }

    for att in &result.attachments {
        let kind = if att.is_inline { "inline" } else { "attachment" };
        println!(
            "  {:<40} {:<24} {:>10}  {}",
            att.filename,
            att.content_type,
            format_size(att.size, BINARY),
            kind
        );
    }
    for (id, image) in &result.inline_images {
        println!(
            "  {:<40} {:<24} {:>10}  image",
            id,
            image.content_type,
            format_size(image.payload.len() as u64, BINARY)
        );
    }
    Ok(())
}

/// Print a short header summary before the body.
fn print_summary(result: &ParseResult) {
    for name in ["from", "to", "subject", "date"] {
        if let Some(value) = result.headers.get(name) {
            println!("  {:<9} {value}", capitalize(name));
        }
    }
    if !result.attachments.is_empty() {
        println!("  {:<9} {}", "Files", result.attachments.len());
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
