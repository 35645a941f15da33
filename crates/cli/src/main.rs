mod logging;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use photo_renamer_core::{
    app_paths, apply_plan, generate_plan, load_config, parse_template, save_config,
    scan_candidates, AppConfig, ApplyMode, DateResolver, ExtensionSet, ResolverOptions,
    RunOutcome,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[derive(Debug, Parser)]
#[command(name = "photo-renamer")]
#[command(about = "Rename photos to their capture date read from EXIF metadata")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the config file location and the effective settings
    Show,
    /// Write a config file with the default settings
    Init,
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// Files or directories to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Recurse into directories
    #[arg(short, long, default_value_t = false, overrides_with = "no_recursive")]
    recursive: bool,
    /// Only process direct children, even when the config enables recursion
    #[arg(long, default_value_t = false, overrides_with = "recursive")]
    no_recursive: bool,
    /// Dry-run; show what would be renamed
    #[arg(short, long, default_value_t = false)]
    simulate: bool,
    /// If EXIF date is missing, use the file modification time
    #[arg(long, default_value_t = false, overrides_with = "no_use_filetime")]
    use_filetime: bool,
    /// Never fall back to the file modification time
    #[arg(long, default_value_t = false, overrides_with = "use_filetime")]
    no_use_filetime: bool,
    /// strftime pattern for the new file name [default: %Y-%m-%d_%H-%M-%S]
    #[arg(short, long)]
    format: Option<String>,
    /// Comma-separated list of extensions [default: jpg,jpeg,heic,cr2,nef,arw,raf,dng,png]
    #[arg(long)]
    extensions: Option<String>,
    /// exiftool executable used when EXIF cannot be read directly
    #[arg(long)]
    exiftool: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = matches!(&cli.command, Commands::Rename(args) if args.verbose);
    logging::init_logger(verbose);

    let result = match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init => cmd_config_init(),
        },
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_rename(args: RenameArgs) -> Result<ExitCode> {
    let config = load_config()?;

    let pattern = parse_template(args.format.as_deref().unwrap_or(&config.date_format))?;
    let extensions = match args.extensions.as_deref() {
        Some(list) => ExtensionSet::parse(list),
        None => ExtensionSet::from_list(&config.extensions),
    };
    if extensions.is_empty() {
        info!("no file extensions selected");
    }

    let recursive = resolve_flag(args.recursive, args.no_recursive, config.recursive_default);
    let use_file_modified = resolve_flag(
        args.use_filetime,
        args.no_use_filetime,
        config.use_filetime_default,
    );
    let resolver = DateResolver::from_options(&ResolverOptions {
        use_file_modified,
        exiftool_program: Some(args.exiftool.unwrap_or(config.exiftool_program)),
    });
    debug!(sources = ?resolver.source_kinds(), "date resolution chain");

    let candidates = scan_candidates(&args.paths, recursive, &extensions);
    let plan = generate_plan(candidates, &resolver, &pattern);

    let mode = if args.simulate {
        ApplyMode::Simulate
    } else {
        ApplyMode::Execute
    };

    // JSON keeps stdout machine-readable; the console report moves to stderr.
    let mut console: Box<dyn Write> = match args.output {
        OutputFormat::Table => Box::new(io::stdout().lock()),
        OutputFormat::Json => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &plan)?;
            writeln!(stdout)?;
            Box::new(io::stderr().lock())
        }
    };

    if plan.stats.scanned == 0 {
        info!(extensions = %extensions, "no files found matching extensions");
    } else {
        info!(count = plan.stats.scanned, "found candidate files");
    }

    let applied = if plan.entries.is_empty() {
        None
    } else {
        Some(apply_plan(&plan, mode, &mut console)?)
    };

    let outcome = RunOutcome::from_run(&plan, applied.as_ref(), args.simulate);
    outcome.write_summary(&mut console)?;
    console.flush()?;

    Ok(ExitCode::from(outcome.exit_code()))
}

/// An explicit `--flag` or `--no-flag` wins over the config default.
fn resolve_flag(on: bool, off: bool, default: bool) -> bool {
    match (on, off) {
        (_, true) => false,
        (true, false) => true,
        (false, false) => default,
    }
}

fn cmd_config_show() -> Result<ExitCode> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_init() -> Result<ExitCode> {
    let paths = app_paths()?;
    if paths.config_path.exists() {
        bail!("config file already exists: {}", paths.config_path.display());
    }
    let written = save_config(&AppConfig::default())?;
    println!("wrote default config: {}", written.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename_args(argv: &[&str]) -> RenameArgs {
        let cli = Cli::try_parse_from(argv).expect("arguments must parse");
        match cli.command {
            Commands::Rename(args) => args,
            Commands::Config(_) => panic!("expected the rename subcommand"),
        }
    }

    #[test]
    fn negative_flags_turn_off_config_defaults() {
        let args = rename_args(&[
            "photo-renamer",
            "rename",
            "--no-recursive",
            "--no-use-filetime",
            ".",
        ]);
        assert!(!resolve_flag(args.recursive, args.no_recursive, true));
        assert!(!resolve_flag(args.use_filetime, args.no_use_filetime, true));
    }

    #[test]
    fn unset_flags_follow_config_and_positive_flags_enable() {
        let args = rename_args(&["photo-renamer", "rename", "."]);
        assert!(resolve_flag(args.recursive, args.no_recursive, true));
        assert!(!resolve_flag(args.recursive, args.no_recursive, false));

        let args = rename_args(&["photo-renamer", "rename", "-r", "--use-filetime", "."]);
        assert!(resolve_flag(args.recursive, args.no_recursive, false));
        assert!(resolve_flag(args.use_filetime, args.no_use_filetime, false));
    }

    #[test]
    fn last_of_a_flag_pair_wins() {
        let args = rename_args(&["photo-renamer", "rename", "-r", "--no-recursive", "."]);
        assert!(!resolve_flag(args.recursive, args.no_recursive, true));

        let args = rename_args(&["photo-renamer", "rename", "--no-recursive", "-r", "."]);
        assert!(resolve_flag(args.recursive, args.no_recursive, false));
    }

    #[test]
    fn empty_extension_list_parses_to_an_empty_set() {
        let args = rename_args(&["photo-renamer", "rename", "--extensions", "", "."]);
        let set = ExtensionSet::parse(args.extensions.as_deref().unwrap_or_default());
        assert!(set.is_empty());
    }
}
