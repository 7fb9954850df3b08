//! strmerge CLI
//!
//! Command-line tool for parsing, merging and regenerating localized
//! `.strings` tables.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use strmerge_core::{
    localize_project, merge_files, parse_strings, scan_project, LocalizeConfig, MergeReport,
    StringsOutcome, XcodeToolchain,
};
use tracing::Level;

#[derive(Parser)]
#[command(name = "strmerge")]
#[command(about = "Incremental merger for localized .strings tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and display a single .strings file
    Parse {
        /// Path to .strings file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the parsed table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge an old translated table with a freshly extracted one
    Merge {
        /// Table holding the existing translations
        #[arg(long)]
        old: PathBuf,

        /// Freshly extracted table (authoritative key set)
        #[arg(long)]
        new: PathBuf,

        /// Output path for the merged table (may be --old or --new)
        #[arg(short, long)]
        output: PathBuf,

        /// Print the merge report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List language directories and interface files in a project
    Scan {
        /// Project root containing *.lproj directories
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Regenerate and merge the strings tables of every language
    Localize {
        /// Project root containing *.lproj directories
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Template language directory (overrides config)
        #[arg(short, long)]
        template: Option<String>,

        /// Strings table name (overrides config)
        #[arg(long)]
        strings_file: Option<String>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a config file with default settings
    CreateConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> strmerge_core::Result<()> {
    match command {
        Commands::Parse { file, json } => cmd_parse(&file, json),
        Commands::Merge {
            old,
            new,
            output,
            json,
        } => cmd_merge(&old, &new, &output, json),
        Commands::Scan { root, config } => cmd_scan(&root, config.as_deref()),
        Commands::Localize {
            root,
            config,
            template,
            strings_file,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(template) = template {
                config.template_language = template;
            }
            if let Some(strings_file) = strings_file {
                config.strings_file = strings_file;
            }
            cmd_localize(&root, &config, json)
        }
        Commands::CreateConfig { output } => cmd_create_config(&output),
    }
}

fn load_config(path: Option<&Path>) -> strmerge_core::Result<LocalizeConfig> {
    match path {
        Some(path) => LocalizeConfig::load(path),
        None => Ok(LocalizeConfig::default()),
    }
}

fn cmd_parse(file: &Path, json: bool) -> strmerge_core::Result<()> {
    let table = parse_strings(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Entries: {}", table.len());
    println!();

    for entry in table.entries() {
        for comment in &entry.comments {
            println!("  {}", comment);
        }
        println!("  {} = {}", entry.key, entry.value);
    }

    Ok(())
}

fn cmd_merge(old: &Path, new: &Path, output: &Path, json: bool) -> strmerge_core::Result<()> {
    let report = merge_files(old, new, output)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Merged {} into {}", new.display(), output.display());
    print_merge_report(&report, "  ");

    Ok(())
}

fn print_merge_report(report: &MergeReport, indent: &str) {
    println!("{}{} translated key(s) kept", indent, report.kept.len());
    println!("{}{} new key(s) added", indent, report.added.len());
    for key in &report.added {
        println!("{}  + {}", indent, key);
    }
    println!("{}{} key(s) dropped", indent, report.dropped.len());
    for key in &report.dropped {
        println!("{}  - {}", indent, key);
    }
}

fn cmd_scan(root: &Path, config: Option<&Path>) -> strmerge_core::Result<()> {
    let config = load_config(config)?;
    let result = scan_project(root, &config)?;

    println!("Scanned {}:", result.root.display());
    println!("  {} source file(s)", result.source_files.len());
    println!();
    println!("Languages ({}):", result.languages.len());

    for language in &result.languages {
        let marker = if language.name == config.template_language {
            " [template]"
        } else {
            ""
        };
        let strings = if language.has_strings() {
            config.strings_file.as_str()
        } else {
            "(no strings table)"
        };
        println!("  {}{}: {}", language.name, marker, strings);
        for interface in &language.interface_files {
            println!("    {}", interface.display());
        }
    }

    Ok(())
}

fn cmd_localize(root: &Path, config: &LocalizeConfig, json: bool) -> strmerge_core::Result<()> {
    let tools = XcodeToolchain::from_config(config);
    let report = localize_project(root, config, &tools)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for language in &report.languages {
            match &language.strings {
                StringsOutcome::Merged { report } => {
                    println!("{}: merged {}", language.language, config.strings_file);
                    print_merge_report(report, "  ");
                }
                StringsOutcome::Generated => {
                    println!("{}: generated {}", language.language, config.strings_file);
                }
                StringsOutcome::Failed { error } => {
                    println!("{}: failed: {}", language.language, error);
                }
            }
            for interface in &language.interfaces_updated {
                println!("  updated {}", interface.display());
            }
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        eprintln!("{} language(s) failed", failed);
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_create_config(output: &Path) -> strmerge_core::Result<()> {
    LocalizeConfig::default().save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to adjust your project, then run:");
    println!("  strmerge localize --root <path> --config {}", output.display());

    Ok(())
}
