use anyhow::Result;
use clap::{Parser, Subcommand};

use moodpaper::cli::{handle_generate_command, handle_key_command, GenerateArgs, KeyCommands};
use moodpaper::config::{MoodPaperPaths, Settings};
use moodpaper::logging::{init_tracing, DEFAULT_LOG_LEVEL};

#[derive(Parser)]
#[command(
    name = "moodpaper",
    version,
    about = "Turn a mood into phone wallpapers",
    long_about = "MoodPaper turns a short mood description into a set of 9:16 \
                  wallpapers using Gemini image generation. The API key can be \
                  kept in a password-encrypted backup file."
)]
struct Cli {
    /// Log level for moodpaper output (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate wallpaper variations from a mood prompt
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// API key backup and verification commands
    #[command(subcommand)]
    Key(KeyCommands),

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let paths = MoodPaperPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Generate(args)) => {
            handle_generate_command(&paths, &settings, args).await?;
        }
        Some(Commands::Key(cmd)) => {
            handle_key_command(&paths, &settings, cmd).await?;
        }
        Some(Commands::Config) => {
            println!("MoodPaper Configuration");
            println!("=======================");
            println!("Base directory:      {}", paths.base_dir().display());
            println!("Backup directory:    {}", paths.backup_dir().display());
            println!("Wallpaper directory: {}", paths.wallpaper_dir().display());
            println!("Settings file:       {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  API base URL:       {}", settings.api_base_url);
            println!("  Image model:        {}", settings.image_model);
            println!("  Verification model: {}", settings.verification_model);
            println!(
                "  Image:              {} at {}",
                settings.image.aspect_ratio, settings.image.image_size
            );
            println!("  Variations:         {}", settings.variations);
            println!("  Request timeout:    {}s", settings.request_timeout_secs);
            println!("  Backup file name:   {}", settings.backup_file_name);
        }
        None => {
            println!("MoodPaper - mood-driven wallpapers");
            println!();
            println!("Run 'moodpaper --help' for usage information.");
            println!("Run 'moodpaper generate \"<mood>\"' to create wallpapers.");
        }
    }

    Ok(())
}
