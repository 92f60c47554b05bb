use anyhow::Result;
use clap::Parser;
use colored::*;
use parley_server::{RelayConfig, RoomConfig, serve};
use std::net::{IpAddr, SocketAddr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// WebRTC signaling relay: brokers offers, answers and ICE candidates between call participants.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, env = "SIGNALING_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    #[arg(short, long, env = "SIGNALING_PORT", default_value_t = 8888)]
    port: u16,

    /// Route prefix for sockets; clients connect to `<path>/<room id>`.
    #[arg(long, env = "SIGNALING_PATH", default_value = "/ws")]
    path: String,

    /// Allowed CORS origin. Any origin when unset.
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origin: Option<String>,

    /// Cap on registered participants per room. Unlimited when unset.
    #[arg(long, env = "MAX_PARTICIPANTS")]
    max_participants: Option<usize>,

    #[arg(long, env = "ROOM_QUEUE", default_value_t = 256)]
    room_queue: usize,
}

impl From<Args> for RelayConfig {
    fn from(args: Args) -> Self {
        RelayConfig {
            bind: SocketAddr::new(args.host, args.port),
            ws_path: args.path,
            cors_origin: args.cors_origin,
            room: RoomConfig {
                max_participants: args.max_participants,
                queue_capacity: args.room_queue,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    let config = RelayConfig::from(args);

    println!(
        "{} {}",
        "📡 parley signaling relay".green().bold(),
        format!("ws://{}{}/<room>", config.bind, config.ws_path.trim_end_matches('/')).cyan()
    );

    info!(
        bind = %config.bind,
        path = %config.ws_path,
        max_participants = ?config.room.max_participants,
        "Starting signaling relay"
    );

    serve(config).await
}
