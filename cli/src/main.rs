//! Demo caller for the NMA client library.
//!
//! Verifies the supplied key(s), then sends one notification and prints
//! the results. Not meant as a full-featured command-line program; all
//! the interesting behavior lives in `nma-core`.

use std::process::ExitCode;

use clap::Parser;
use nma_core::{NmaClient, Notification, Verification};

#[derive(Parser, Debug)]
#[command(name = "nma", about = "Send a Notify My Android notification")]
struct Args {
    /// One 48-character API key, or a comma-separated list of them.
    apikey: String,

    /// Application name (up to 256 characters).
    application: String,

    /// Event or subject line (up to 1000 characters).
    event: String,

    /// Message body (up to 10000 characters).
    description: String,

    /// Priority, -2 (very low) through 2 (emergency).
    #[arg(default_value_t = 0)]
    priority: i32,

    /// Optional 48-character developer key.
    devkey: Option<String>,

    /// Alternate API base URL (e.g. a local mock server).
    #[arg(long, default_value = nma_core::DEFAULT_BASE_URL)]
    url: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let client = NmaClient::with_base_url(&args.url);

    // notify accepts a comma-separated list, but verify checks one key per
    // call, so a list is verified key by key.
    for key in args.apikey.split(',') {
        let mut verification = Verification::new(key);
        if let Some(devkey) = &args.devkey {
            verification = verification.with_developer_key(devkey);
        }
        match client.verify(&verification) {
            Ok(()) => println!("Key [{key}] is valid!"),
            Err(err) => println!("Key [{key}]: {err}"),
        }
    }

    let mut notification =
        Notification::new(&args.application, &args.event, &args.description, &args.apikey)
            .with_priority(args.priority);
    if let Some(devkey) = &args.devkey {
        notification = notification.with_developer_key(devkey);
    }

    match client.notify(&notification) {
        Ok(()) => {
            println!("Message sent!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}
