//! FireMPQ CLI Client
//!
//! Command-line interface for interacting with a FireMPQ server.

use clap::{Parser, Subcommand};
use firempq::{
    ClientConfig, FireMpqClient, PopLockOptions, PopOptions, PushMessage, QueueMessage,
    QueueOptions, Result,
};
use tracing_subscriber::{fmt, EnvFilter};

/// FireMPQ CLI
#[derive(Parser, Debug)]
#[command(name = "fmpq-cli")]
#[command(about = "CLI for the FireMPQ priority message queue")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:9033")]
    server: String,

    /// Read timeout in milliseconds (0 = wait forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the server version
    Version,

    /// Create a priority queue
    Create {
        queue: String,

        /// Default message TTL in milliseconds
        #[arg(long)]
        msg_ttl: Option<i64>,

        /// Max number of messages
        #[arg(long)]
        max_size: Option<i64>,

        /// Default delivery delay in milliseconds
        #[arg(long)]
        delay: Option<i64>,

        /// Max pop attempts per message
        #[arg(long)]
        pop_limit: Option<i64>,

        /// Default lock timeout in milliseconds
        #[arg(long)]
        lock_timeout: Option<i64>,
    },

    /// Push a message
    Push {
        queue: String,
        payload: String,

        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        priority: Option<i64>,

        /// Delivery delay in milliseconds
        #[arg(long)]
        delay: Option<i64>,

        /// Time to live in milliseconds
        #[arg(long)]
        ttl: Option<i64>,

        /// Wait until the message is stored
        #[arg(long)]
        sync_wait: bool,
    },

    /// Pop and remove messages
    Pop {
        queue: String,

        #[arg(short, long)]
        limit: Option<i64>,

        /// Wait timeout in milliseconds
        #[arg(short, long)]
        wait: Option<i64>,
    },

    /// Pop and lock messages
    PopLock {
        queue: String,

        #[arg(short, long)]
        limit: Option<i64>,

        #[arg(short, long)]
        wait: Option<i64>,

        /// Lock timeout in milliseconds
        #[arg(long)]
        lock_timeout: Option<i64>,
    },

    /// Delete a message by id
    Delete { queue: String, id: String },

    /// Unlock a message by id
    Unlock { queue: String, id: String },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,firempq=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = ClientConfig::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    let client = FireMpqClient::connect(config)?;

    match args.command {
        Commands::Version => {
            println!("{}", client.version());
        }
        Commands::Create {
            queue,
            msg_ttl,
            max_size,
            delay,
            pop_limit,
            lock_timeout,
        } => {
            let mut builder = QueueOptions::builder();
            if let Some(v) = msg_ttl {
                builder = builder.msg_ttl(v);
            }
            if let Some(v) = max_size {
                builder = builder.max_size(v);
            }
            if let Some(v) = delay {
                builder = builder.delay(v);
            }
            if let Some(v) = pop_limit {
                builder = builder.pop_limit(v);
            }
            if let Some(v) = lock_timeout {
                builder = builder.lock_timeout(v);
            }
            let session = client.create_queue(&queue, &builder.build()?)?;
            println!("OK");
            session.close()?;
        }
        Commands::Push {
            queue,
            payload,
            id,
            priority,
            delay,
            ttl,
            sync_wait,
        } => {
            let mut builder = PushMessage::builder(payload.into_bytes()).sync_wait(sync_wait);
            if let Some(v) = id {
                builder = builder.id(v);
            }
            if let Some(v) = priority {
                builder = builder.priority(v);
            }
            if let Some(v) = delay {
                builder = builder.delay(v);
            }
            if let Some(v) = ttl {
                builder = builder.ttl(v);
            }
            let message = builder.build()?;

            let mut session = client.open_queue(&queue)?;
            match session.push(&message)? {
                Some(id) => println!("{}", id),
                None => println!("OK"),
            }
            session.close()?;
        }
        Commands::Pop { queue, limit, wait } => {
            let mut builder = PopOptions::builder();
            if let Some(v) = limit {
                builder = builder.limit(v);
            }
            if let Some(v) = wait {
                builder = builder.wait(v);
            }
            let options = builder.build()?;

            let mut session = client.open_queue(&queue)?;
            print_messages(&session.pop(&options)?);
            session.close()?;
        }
        Commands::PopLock {
            queue,
            limit,
            wait,
            lock_timeout,
        } => {
            let mut builder = PopLockOptions::builder();
            if let Some(v) = limit {
                builder = builder.limit(v);
            }
            if let Some(v) = wait {
                builder = builder.wait(v);
            }
            if let Some(v) = lock_timeout {
                builder = builder.lock_timeout(v);
            }
            let options = builder.build()?;

            let mut session = client.open_queue(&queue)?;
            print_messages(&session.pop_lock(&options)?);
            session.close()?;
        }
        Commands::Delete { queue, id } => {
            let mut session = client.open_queue(&queue)?;
            session.delete_by_id(&id)?;
            println!("OK");
            session.close()?;
        }
        Commands::Unlock { queue, id } => {
            let mut session = client.open_queue(&queue)?;
            session.unlock_by_id(&id)?;
            println!("OK");
            session.close()?;
        }
    }

    Ok(())
}

fn print_messages(messages: &[QueueMessage]) {
    for msg in messages {
        let receipt = msg.receipt().unwrap_or("-");
        println!(
            "{}\t{}\tpops={}\treceipt={}",
            msg.id(),
            String::from_utf8_lossy(msg.payload()),
            msg.pop_count(),
            receipt
        );
    }
}
