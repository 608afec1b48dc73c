//! GroveKV CLI
//!
//! Runs a single command against a database file and prints the reply.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use grovekv::{Command, Config, Direction, Engine, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// GroveKV CLI
#[derive(Parser, Debug)]
#[command(name = "grovekv-cli")]
#[command(about = "Hashes and sorted sets on an embedded database file")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "./grovekv_data/grove.redb")]
    db: PathBuf,

    /// Seconds to wait for another process to release the file
    #[arg(short, long, default_value = "1")]
    timeout: u64,

    /// Let the OS decide when commits reach the disk
    #[arg(long)]
    eventual: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set a field of a hash
    Hset { key: String, field: String, value: String },

    /// Get a field of a hash
    Hget { key: String, field: String },

    /// Set several fields: FIELD VALUE [FIELD VALUE ...]
    Hmset {
        key: String,
        #[arg(required = true, num_args = 2..)]
        pairs: Vec<String>,
    },

    /// Get several fields
    Hmget {
        key: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Add DELTA to an integer field
    #[command(allow_negative_numbers = true)]
    Hincr { key: String, field: String, delta: i64 },

    /// Read an integer field
    Hgetint { key: String, field: String },

    /// Check whether a field exists
    Hexists { key: String, field: String },

    /// Delete fields
    Hdel {
        key: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Count fields of a hash
    Hlen { key: String },

    /// Every field of a hash
    Hscan { key: String },

    /// Every field of a hash, walked backward
    Hrscan { key: String },

    /// Fields starting with PREFIX
    Hprefix { key: String, prefix: String },

    /// Add a member, or move it to a new score
    #[command(allow_negative_numbers = true)]
    Zadd { key: String, score: f64, member: String },

    /// Members by rank, lowest score first
    #[command(allow_negative_numbers = true)]
    Zrange {
        key: String,
        start: i64,
        stop: i64,
        #[arg(long)]
        withscores: bool,
    },

    /// Members by rank, highest score first
    #[command(allow_negative_numbers = true)]
    Zrevrange {
        key: String,
        start: i64,
        stop: i64,
        #[arg(long)]
        withscores: bool,
    },

    /// Score of a member
    Zscore { key: String, member: String },

    /// Remove a member
    Zrem { key: String, member: String },

    /// Count members of a sorted set
    Zcard { key: String },

    /// Delete a whole collection
    Del { key: String },

    /// Kind of a collection
    Kind { key: String },

    /// List every collection
    Collections,
}

impl Commands {
    fn into_command(self) -> Command {
        match self {
            Commands::Hset { key, field, value } => Command::HSet {
                key,
                field: field.into_bytes(),
                value: value.into_bytes(),
            },
            Commands::Hget { key, field } => Command::HGet {
                key,
                field: field.into_bytes(),
            },
            Commands::Hmset { key, pairs } => Command::HMSet {
                key,
                fields: pairs
                    .chunks_exact(2)
                    .map(|pair| (pair[0].as_bytes().to_vec(), pair[1].as_bytes().to_vec()))
                    .collect(),
            },
            Commands::Hmget { key, fields } => Command::HMGet {
                key,
                fields: fields.into_iter().map(String::into_bytes).collect(),
            },
            Commands::Hincr { key, field, delta } => Command::HIncr {
                key,
                field: field.into_bytes(),
                delta,
            },
            Commands::Hgetint { key, field } => Command::HGetInt {
                key,
                field: field.into_bytes(),
            },
            Commands::Hexists { key, field } => Command::HExists {
                key,
                field: field.into_bytes(),
            },
            Commands::Hdel { key, fields } => Command::HDel {
                key,
                fields: fields.into_iter().map(String::into_bytes).collect(),
            },
            Commands::Hlen { key } => Command::HLen { key },
            Commands::Hscan { key } => Command::HScan { key },
            Commands::Hrscan { key } => Command::HRScan { key },
            Commands::Hprefix { key, prefix } => Command::HPrefix {
                key,
                prefix: prefix.into_bytes(),
            },
            Commands::Zadd { key, score, member } => Command::ZAdd {
                key,
                score,
                member: member.into_bytes(),
            },
            Commands::Zrange {
                key,
                start,
                stop,
                withscores,
            } => Command::ZRange {
                key,
                start,
                stop,
                direction: Direction::Forward,
                with_scores: withscores,
            },
            Commands::Zrevrange {
                key,
                start,
                stop,
                withscores,
            } => Command::ZRange {
                key,
                start,
                stop,
                direction: Direction::Reverse,
                with_scores: withscores,
            },
            Commands::Zscore { key, member } => Command::ZScore {
                key,
                member: member.into_bytes(),
            },
            Commands::Zrem { key, member } => Command::ZRem {
                key,
                member: member.into_bytes(),
            },
            Commands::Zcard { key } => Command::ZCard { key },
            Commands::Del { key } => Command::Del { key },
            Commands::Kind { key } => Command::Kind { key },
            Commands::Collections => Command::Collections,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,grovekv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Commands::Hmset { pairs, .. } = &args.command {
        if pairs.len() % 2 != 0 {
            eprintln!("error: HMSET takes FIELD VALUE pairs");
            process::exit(2);
        }
    }

    let sync_strategy = if args.eventual {
        SyncStrategy::Eventual
    } else {
        SyncStrategy::Immediate
    };
    let config = Config::builder()
        .path(&args.db)
        .open_timeout(Duration::from_secs(args.timeout))
        .sync_strategy(sync_strategy)
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            process::exit(1);
        }
    };

    let command = args.command.into_command();
    let name = command.name();
    match engine.execute(command) {
        Ok(reply) => println!("{reply}"),
        Err(e) => {
            tracing::error!(command = name, "{}", e);
            eprintln!("(error) {e}");
            process::exit(1);
        }
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close database: {}", e);
        process::exit(1);
    }
}
