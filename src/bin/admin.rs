//! CLI administration tool for moltly-web.
//!
//! Produces the values operators put into the environment and lets them
//! check how a `callbackUrl` would be treated, without running the server.
//!
//! # Usage
//!
//! ```bash
//! # Generate a signing secret
//! cargo run --bin admin -- gen-secret
//!
//! # Produce an AUTH_USERS entry (prompts for the password)
//! cargo run --bin admin -- hash-password --email keeper@moltly.app
//!
//! # See where a callback would land
//! cargo run --bin admin -- check-callback "//evil.com" --origin https://moltly.app
//! ```
//!
//! # Environment Variables
//!
//! - `AUTH_SIGNING_SECRET` (required by `hash-password`)

use moltly_web::domain::callback::{AppOrigin, sanitize_callback_path};
use moltly_web::infrastructure::identity::digest_secret;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Input, Password};

/// CLI tool for managing moltly-web.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce an AUTH_USERS entry for an account
    HashPassword {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Display name appended to the entry
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Generate a random AUTH_SIGNING_SECRET
    GenSecret,

    /// Show how a callbackUrl is sanitized
    CheckCallback {
        /// Untrusted callbackUrl value
        raw: String,

        /// Application origin (e.g. https://moltly.app)
        #[arg(short, long)]
        origin: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { email, name } => hash_password(email, name)?,
        Commands::GenSecret => gen_secret(),
        Commands::CheckCallback { raw, origin } => check_callback(&raw, origin.as_deref())?,
    }

    Ok(())
}

/// Prompts for a password and prints the matching `AUTH_USERS` entry.
///
/// # Security
///
/// - The password is read without echo and confirmed
/// - Only the HMAC digest is printed
/// - The digest is bound to the current `AUTH_SIGNING_SECRET`; rotating the
///   secret invalidates every entry
fn hash_password(email: Option<String>, name: Option<String>) -> Result<()> {
    let secret = std::env::var("AUTH_SIGNING_SECRET").context("AUTH_SIGNING_SECRET must be set")?;

    println!("{}", "🔐 Hash Password".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_ascii_lowercase();
    if email.contains([':', ',']) || email.is_empty() {
        anyhow::bail!("Email must be non-empty and contain no ':' or ','");
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    let mut entry = format!("{email}:{}", digest_secret(&secret, &password));
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        entry.push(':');
        entry.push_str(name.trim());
    }

    println!();
    println!("{}", "✅ Entry ready".green().bold());
    println!();
    println!("{}", "Add this to AUTH_USERS (comma-separated):".bright_white());
    println!("  {}", entry.bright_yellow());
    println!();

    Ok(())
}

fn gen_secret() {
    let secret = generate_secret();

    println!("{}", "🔑 Signing Secret".bright_blue().bold());
    println!();
    println!("  {}={}", "AUTH_SIGNING_SECRET".bright_cyan(), secret.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  Changing the secret invalidates every AUTH_USERS digest."
            .red()
            .bold()
    );
    println!();
}

/// Prints the sanitized path and the absolute callback URL for `raw`.
fn check_callback(raw: &str, origin: Option<&str>) -> Result<()> {
    let origin = origin
        .map(AppOrigin::parse)
        .transpose()
        .context("Invalid --origin")?;

    let target = sanitize_callback_path(Some(raw), origin.as_ref());

    println!("{}", "🧭 Callback Check".bright_blue().bold());
    println!();
    println!("  Input:    {}", raw.cyan());
    println!("  Path:     {}", target.as_str().bright_white().bold());
    println!(
        "  Absolute: {}",
        target.absolute_url(origin.as_ref()).bright_white()
    );

    if target.is_root() && raw.trim() != "/" {
        println!();
        println!("{}", "⚠️  Input was rejected and replaced with /".yellow());
    }
    println!();

    Ok(())
}

/// Generates a random signing secret.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_secret() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const SECRET_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..SECRET_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
