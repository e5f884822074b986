mod clipboard;
mod logger;
mod messages;
mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use messages::Messages;
use passgen::{MaxLength, Version};
use std::process::ExitCode;
use zeroize::Zeroizing;

const ERROR: u8 = 2;

#[derive(Parser)]
#[command(
    name = "passgen",
    version,
    about = "Derive site passwords from memorable answers without storing them",
    after_help = "Passwords are never stored. Run passgen again with the same inputs \
                  to get the same password back."
)]
struct Cli {
    /// Print usage examples and exit
    #[arg(short, long)]
    example: bool,

    /// Maximum password length [default: 15]
    #[arg(
        short = 'l',
        long,
        value_name = "N",
        env = "PASSGEN_MAX_LENGTH",
        allow_hyphen_values = true
    )]
    max_length: Option<String>,

    /// Derivation algorithm; passwords differ between versions
    #[arg(short, long, value_enum, env = "PASSGEN_ALGORITHM", default_value = "v1")]
    algorithm: Algorithm,

    /// Copy the password to the clipboard without asking
    #[arg(short, long)]
    copy: bool,

    /// Print only the password
    #[arg(short, long)]
    quiet: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Website name followed by security answers; prompted for when omitted
    components: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Algorithm {
    V1,
    V2,
}

/// Settings fixed for the lifetime of the process.
struct Config {
    max_length: Option<MaxLength>,
    version: Version,
    copy: bool,
    display: ui::DisplayOptions,
}

impl Config {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let max_length = cli
            .max_length
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(str::parse::<MaxLength>)
            .transpose()?;

        let version = match cli.algorithm {
            Algorithm::V1 => Version::V1,
            Algorithm::V2 => Version::V2,
        };

        Ok(Self {
            max_length,
            version,
            copy: cli.copy,
            display: ui::DisplayOptions {
                unicode_support: ui::detect_unicode_support(),
                color_support: ui::detect_color_support(),
                quiet: cli.quiet,
            },
        })
    }
}

fn collect_from_prompts(
    config: &Config,
    messages: &Messages,
) -> Result<(Vec<Zeroizing<String>>, MaxLength)> {
    ui::prompt_welcome(messages)?;

    let mut components = vec![ui::prompt_website_name(messages)?];
    components.extend(ui::prompt_answers(messages)?);

    let max_length = match config.max_length {
        Some(max_length) => max_length,
        None => ui::prompt_max_length(messages, MaxLength::DEFAULT)?,
    };

    Ok((components, max_length))
}

fn run(cli: Cli, messages: &Messages) -> Result<()> {
    if cli.example {
        for line in messages.example {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = Config::from_cli(&cli)?;

    let (components, max_length) = if cli.components.is_empty() {
        collect_from_prompts(&config, messages)?
    } else {
        ui::check_components(&cli.components, messages)?;
        let components: Vec<_> = cli.components.into_iter().map(Zeroizing::new).collect();
        (components, config.max_length.unwrap_or_default())
    };

    tracing::debug!(
        components = components.len(),
        %max_length,
        version = %config.version,
        "deriving password"
    );

    let phrase: Vec<&str> = components.iter().map(|c| c.as_str()).collect();
    let password = passgen::derive_with(config.version, &phrase, max_length)?;

    let info = ui::InputInfo::from_components(&phrase);
    ui::display_output(
        &password,
        &info,
        config.version,
        max_length,
        &config.display,
        messages,
    );

    let copy = config.copy || (!config.display.quiet && ui::prompt_clipboard(messages)?);
    if copy {
        let notice = if clipboard::copy(&password)? {
            messages.clipboard_copied
        } else {
            messages.clipboard_unavailable
        };
        eprintln!("{}", notice);
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let messages = Messages::ENGLISH;

    match run(cli, &messages) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "passgen failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(ERROR)
        }
    }
}
