//! paystore CLI
//!
//! Inspect and edit a store file directly. Values are raw JSON documents,
//! so any bucket can be read regardless of the type that wrote it.
//!
//! The store file is exclusively locked; stop the server before using this.

use clap::{Parser, Subcommand};
use paystore::{Bucket, Engine, RecordId, Result};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// paystore CLI
#[derive(Parser, Debug)]
#[command(name = "paystore-cli")]
#[command(about = "Inspect and edit a paystore store file")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = "storage.redb")]
    storage: String,

    /// Bucket to operate on
    #[arg(short, long, default_value = "payment")]
    bucket: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one record
    Get {
        /// Record id (16 hex digits)
        id: String,
    },

    /// Print every record in id order
    List,

    /// Store a JSON document under the next id
    Create {
        /// The document
        json: String,
    },

    /// Write a JSON document under an id (upsert)
    Update {
        /// Record id (16 hex digits)
        id: String,

        /// The document
        json: String,
    },

    /// Delete a record
    Delete {
        /// Record id (16 hex digits)
        id: String,
    },

    /// List bucket names
    Buckets,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let engine = match Engine::open_path(&args.storage) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = run(&engine, &args.bucket, args.command);
    let closed = engine.close();

    if let Err(e) = result.and(closed) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(engine: &Engine, bucket: &str, command: Commands) -> Result<()> {
    let records: Bucket<Value> = engine.bucket(bucket);

    match command {
        Commands::Get { id } => {
            let id: RecordId = id.parse()?;
            let value = records.get(id)?;
            print_record(id, &value);
        }
        Commands::List => {
            let mut iter = records.list()?;
            let mut printed = 0usize;
            let scanned: Result<()> = iter.records().try_for_each(|record| {
                let (id, value) = record?;
                print_record(id, &value);
                printed += 1;
                Ok(())
            });
            iter.close()?;
            scanned?;
            eprintln!("{} record(s)", printed);
        }
        Commands::Create { json } => {
            let value = parse_json(&json)?;
            let id = records.create(&value)?;
            println!("{}", id);
        }
        Commands::Update { id, json } => {
            let id: RecordId = id.parse()?;
            let value = parse_json(&json)?;
            records.update(id, &value)?;
            println!("OK");
        }
        Commands::Delete { id } => {
            let id: RecordId = id.parse()?;
            records.delete(id)?;
            println!("OK");
        }
        Commands::Buckets => {
            for name in engine.bucket_names()? {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn parse_json(json: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(paystore::StoreError::Decode)
}

fn print_record(id: RecordId, value: &Value) {
    println!("{}\t{}", id, value);
}
