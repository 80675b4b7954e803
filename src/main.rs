use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ad_creative_designer::{
    commands,
    gemini::{GeminiClient, GeminiConfig},
    load_env_files, logging,
    models::{
        BackgroundStyle, Channel, CreativeBrief, DecorativeDensity, DecorativeStyle, DesignStyle,
        ModelUsage, ProductRole, TextBlockPosition, TextBlockSize, Tone,
    },
    storage, AppResult,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;

#[derive(Parser)]
#[command(name = "ad-creative")]
#[command(version)]
#[command(
    about = "Turn a creative brief into an ad image prompt and a generated ad image",
    long_about = None
)]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the prompt and the ad image for a brief
    #[clap(visible_alias = "g")]
    Generate {
        /// Brief file (.json or .toml)
        #[arg(short, long)]
        brief: PathBuf,
        /// Output directory (defaults to out/creative-<timestamp>)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Stop after the prompt call
        #[arg(long)]
        prompt_only: bool,
    },
    /// Print the instructions that would be sent, without calling the API
    #[clap(visible_alias = "p")]
    Preview {
        /// Brief file (.json or .toml)
        #[arg(short, long)]
        brief: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the accepted values for every brief option
    Options,
    /// Print a brief filled with the default values
    Template,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    load_env_files();
    logging::init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Generate {
            brief,
            out,
            prompt_only,
        } => generate(&brief, out, !prompt_only).await,
        Commands::Preview { brief, json } => preview(&brief, json),
        Commands::Options => {
            print_options();
            Ok(())
        }
        Commands::Template => {
            println!("{}", serde_json::to_string_pretty(&CreativeBrief::default())?);
            Ok(())
        }
    }
}

async fn generate(brief_path: &Path, out: Option<PathBuf>, render_image: bool) -> AppResult<()> {
    let brief = load_prepared_brief(brief_path)?;
    let client = GeminiClient::new(GeminiConfig::from_env())?;

    let result = commands::generate_creative(&client, &brief, render_image).await?;
    let mut record = commands::new_record(&client, &brief, &result, render_image);

    let out_dir = out.unwrap_or_else(|| {
        PathBuf::from("out").join(format!(
            "creative-{}",
            record.created_at.format("%Y%m%d_%H%M%S")
        ))
    });
    println!("Aspect ratio: {}", result.aspect_ratio_label);
    println!();
    println!("{}", result.prompt);
    println!();

    let paths = storage::write_result(&out_dir, &result, &mut record)?;
    println!("Prompt: {}", paths.prompt_path.display());
    match paths.image_path {
        Some(path) => println!("Image:  {}", path.display()),
        None if render_image => println!("Image:  (model returned no image)"),
        None => {}
    }
    println!("Record: {}", paths.record_path.display());
    Ok(())
}

fn preview(brief_path: &Path, json: bool) -> AppResult<()> {
    let brief = load_prepared_brief(brief_path)?;
    let preview = commands::preview_prompt(&brief)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!("# System instruction\n{}\n", preview.system_instruction);
    println!("# Request\n{}\n", preview.request_text);
    println!(
        "Aspect ratio: {} (sent as {}), attached images: {}",
        preview.aspect_ratio, preview.api_aspect_ratio, preview.attached_images
    );
    Ok(())
}

fn load_prepared_brief(path: &Path) -> AppResult<CreativeBrief> {
    let brief = commands::load_brief(path)?;
    let base_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    commands::prepare_brief(brief, base_dir)
}

fn print_options() {
    println!("channel:");
    for channel in Channel::ALL {
        let spec = channel.spec();
        println!(
            "  {:<22} {} [prompt {}, api {}]",
            key(&channel),
            spec.label,
            spec.aspect_ratio,
            spec.api_aspect_ratio
        );
    }

    print_group("tone", Tone::ALL.map(|v| (key(&v), v.label())));
    print_group("designStyle", DesignStyle::ALL.map(|v| (key(&v), v.label())));
    print_group(
        "backgroundStyle",
        BackgroundStyle::ALL.map(|v| (key(&v), v.label())),
    );
    print_group(
        "decorativeStyle",
        DecorativeStyle::ALL.map(|v| (key(&v), v.label())),
    );
    print_group(
        "decorativeDensity",
        DecorativeDensity::ALL.map(|v| (key(&v), v.label())),
    );
    print_group(
        "textBlockMainPosition",
        TextBlockPosition::ALL.map(|v| (key(&v), v.label())),
    );
    print_group(
        "textBlockMainSize",
        TextBlockSize::ALL.map(|v| (key(&v), v.label())),
    );
    print_group("modelUsageRule", ModelUsage::ALL.map(|v| (key(&v), v.label())));
    print_group("productRoles", ProductRole::ALL.map(|v| (key(&v), v.label())));
}

fn print_group<const N: usize>(name: &str, entries: [(String, &'static str); N]) {
    println!("{name}:");
    for (key, label) in entries {
        println!("  {key:<22} {label}");
    }
}

/// The serialized name a brief file uses for an option.
fn key<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default()
}
