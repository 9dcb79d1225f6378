mod build;
mod commands;
mod core;
mod manifest;
mod publish;
mod release;
mod utils;
mod verify;


use clap::{Parser, Subcommand};
use core::error::{CutError, print_error};
use manifest::ReleaseKind;
use release::ReleaseOptions;
use tracing_subscriber::EnvFilter;

/// Cut patch and release-candidate versions of a Cargo package
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Cut(CutCli),
}

#[derive(Parser)]
#[command(name = "cut")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct CutCli {
  /// Show debug logs on stderr (overrides RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Release pipeline
  // ============================================================================
  /// Bump the patch version, rebuild, verify and commit on a release branch
  Bump {
    /// Push the branch and open a pull request on GitHub
    #[arg(long)]
    create_pull_request: bool,
    /// Output the release report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Cut a timestamped release candidate (`X.Y.Z-rc.<stamp>`)
  Rc {
    /// Push the branch and open a pull request on GitHub
    #[arg(long)]
    create_pull_request: bool,
    /// Output the release report in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Inspection & checks
  // ============================================================================
  /// Print the package version from the manifest
  Show {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Fail unless the local version is newer than the registry's
  VersionCheck,

  /// Fail if any commit was authored with a test email domain
  EmailCheck {
    /// Email suffix to reject (defaults to `test_email_domain` in cut.toml)
    #[arg(long)]
    domain: Option<String>,
  },
}

fn main() {
  let CargoCli::Cut(cli) = CargoCli::parse();
  init_logging(cli.verbose);

  let result = match cli.command {
    Commands::Bump {
      create_pull_request,
      json,
    } => commands::run_release(
      ReleaseOptions {
        kind: ReleaseKind::Bump,
        create_pull_request,
        quiet: json,
      },
      json,
    ),
    Commands::Rc {
      create_pull_request,
      json,
    } => commands::run_release(
      ReleaseOptions {
        kind: ReleaseKind::Rc,
        create_pull_request,
        quiet: json,
      },
      json,
    ),
    Commands::Show { json } => commands::run_show(json),
    Commands::VersionCheck => commands::run_version_check(),
    Commands::EmailCheck { domain } => commands::run_email_check(domain),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("cargo_cut=debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cargo_cut=warn"))
  };
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}

fn handle_error(err: CutError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}
