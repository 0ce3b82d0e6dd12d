use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use billtrack::cli::{
    handle_bill_command, handle_export_command, handle_import_command, handle_pay_command,
    handle_week_command, BillCommands, ExportFormat, ImportFormat, PayCommands,
};
use billtrack::config::{paths::BilltrackPaths, settings::Settings};
use billtrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "billtrack",
    author = "Kaylee Beyene",
    version,
    about = "Track recurring bills and paychecks from the terminal",
    long_about = "billtrack keeps a list of recurring bills and pay, works out \
                  when each one falls, and shows what is due this week and how \
                  much is left to spend once the bills are paid."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bill management commands
    #[command(subcommand)]
    Bill(BillCommands),

    /// Pay series management commands
    #[command(subcommand)]
    Pay(PayCommands),

    /// Show this week's bills, pay and disposable income
    Week {
        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Export data
    Export {
        /// Export format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// CSV range start (YYYY-MM-DD, defaults to this week's Monday)
        #[arg(long)]
        from: Option<String>,

        /// CSV range end (YYYY-MM-DD, defaults to this week's Sunday)
        #[arg(long)]
        to: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Replace all bills and pay series with the contents of an export
    Import {
        /// Import format
        #[arg(value_enum)]
        format: ImportFormat,

        /// Path to the export file
        path: PathBuf,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Initialize the data directory and settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    billtrack::init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BilltrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone(), settings.month_end_policy)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Bill(cmd)) => handle_bill_command(&storage, &settings, cmd)?,
        Some(Commands::Pay(cmd)) => handle_pay_command(&storage, &settings, cmd)?,
        Some(Commands::Week { date }) => handle_week_command(&storage, &settings, date)?,
        Some(Commands::Export {
            format,
            output,
            from,
            to,
            pretty,
        }) => handle_export_command(&storage, format, output, from, to, pretty)?,
        Some(Commands::Import { format, path }) => {
            handle_import_command(&storage, &settings, format, path)?
        }
        Some(Commands::Audit { count }) => {
            if !storage.audit().exists() {
                println!("No audit entries yet.");
                return Ok(());
            }
            let entries = storage.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing billtrack at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Run 'billtrack bill add --help' to add your first bill.");
        }
        Some(Commands::Config) => {
            println!("billtrack Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", storage.audit().path().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Month-end policy: {}", settings.month_end_policy);
        }
        None => {
            println!("billtrack - recurring bills and pay from the terminal");
            println!();
            if !paths.is_initialized() {
                println!("Run 'billtrack init' to create the settings file.");
            }
            println!("Run 'billtrack --help' for usage information.");
            println!("Run 'billtrack week' to see this week at a glance.");
        }
    }

    Ok(())
}
