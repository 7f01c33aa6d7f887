use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use http::Method;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wallet_auth::{HeaderBuilder, HeaderConfig};

/// Prints the authentication headers a request to the wallet service would
/// carry. Useful when checking a server's verifier by hand.
#[derive(Parser)]
struct Args {
    /// JSON file with `xpriv`, `xpub`, `access_key` and `sign_request`.
    #[clap(long, env = "WALLET_AUTH_CONFIG")]
    config: Option<PathBuf>,
    #[clap(long, env = "WALLET_XPRIV", hide_env_values = true)]
    xpriv: Option<String>,
    #[clap(long, env = "WALLET_XPUB")]
    xpub: Option<String>,
    #[clap(long, env = "WALLET_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,
    /// Whether an extended private key signs. Unset keeps the config file's
    /// choice, which itself defaults to signing.
    #[clap(long, env = "WALLET_SIGN_REQUEST", action = clap::ArgAction::Set)]
    sign_request: Option<bool>,

    #[clap(long, default_value = "GET")]
    method: String,
    #[clap(long, default_value = "")]
    body: String,

    #[clap(short, long)]
    verbose: bool,
}

impl Args {
    /// Flags override values from the config file.
    ///
    /// A key given by flag replaces every key from the file, so the file's
    /// precedence can never pick a different credential than the flags name.
    fn header_config(&self) -> Result<HeaderConfig> {
        let mut config = match &self.config {
            Some(path) => HeaderConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => HeaderConfig::default(),
        };
        if self.xpriv.is_some() || self.xpub.is_some() || self.access_key.is_some() {
            if config.has_key() {
                debug!("key flags replace keys from the config file");
            }
            config.xpriv = self.xpriv.clone();
            config.xpub = self.xpub.clone();
            config.access_key = self.access_key.clone();
        }
        if let Some(sign_request) = self.sign_request {
            config.sign_request = sign_request;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = args.header_config()?;
    let builder = HeaderBuilder::new(Some(&config)).context("building header builder")?;

    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method {:?}", args.method))?;
    let headers = builder
        .build_for(&method, args.body.as_bytes())
        .context("authenticating request")?;

    info!(
        credential = %builder.credential().kind(),
        signed = headers.is_signed(),
        "built headers"
    );

    let json: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
        .collect();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
