use std::io::{self, Write};

use clap::{Args, Subcommand};

use revsync::config::{StoredConfig, config_file_path};
use revsync::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring revsync.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The password is stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "Repository URL (e.g., https://svn.example.com/repos/web/trunk)",
        &mut cfg.repository.url,
        false,
    )?;
    apply_prompt("Username", &mut cfg.repository.username, false)?;
    apply_prompt("Password", &mut cfg.repository.password, true)?;
    apply_prompt("svn binary", &mut cfg.svn_binary, false)?;
    apply_list_prompt(
        "Exclusions for every project (comma separated)",
        &mut cfg.exclusions.defaults,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Repository URL: {}", display_value(&cfg.repository.url));
    println!("Username: {}", display_value(&cfg.repository.username));
    println!("Password: {}", mask_secret(&cfg.repository.password));
    println!("svn binary: {}", display_value(&cfg.svn_binary));
    println!("Default exclusions: {}", display_list(&cfg.exclusions.defaults));
    for (project, rules) in &cfg.exclusions.projects {
        println!("Exclusions for {project}: {}", display_list(rules));
    }
    for (project, settings) in &cfg.projects {
        println!("Root of {project}: {}", display_value(&settings.root));
    }

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_list_prompt(field: &str, target: &mut Vec<String>) -> AppResult<()> {
    let current = (!target.is_empty()).then(|| target.join(", "));
    match prompt(field, current.as_deref(), false)? {
        PromptAction::Keep => {}
        PromptAction::Clear => target.clear(),
        PromptAction::Set(value) => *target = split_list(&value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(parse_answer(&input))
}

fn parse_answer(input: &str) -> PromptAction {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        PromptAction::Keep
    } else if trimmed == "-" {
        PromptAction::Clear
    } else {
        PromptAction::Set(trimmed.to_string())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn display_list(values: &[String]) -> String {
    if values.is_empty() {
        "<none>".to_string()
    } else {
        values.join(", ")
    }
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
