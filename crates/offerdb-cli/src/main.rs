mod offers;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::offers::OffersCommands;

#[derive(Debug, Parser)]
#[command(name = "offerdb-cli")]
#[command(about = "Restaurant offer cache command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Look up or inspect cached offers
    Offers {
        #[command(subcommand)]
        command: OffersCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("offerdb-cli: no command given (try --help)");
        return Ok(());
    };

    let config = offerdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = offerdb_db::PoolConfig::from_app_config(&config);
    let pool = offerdb_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            offerdb_db::health_check(&pool).await?;
            println!("database ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = offerdb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Offers { command } => offers::run(&pool, &config, command).await?,
    }

    Ok(())
}
