//! Subcommand execution.

use std::sync::Arc;

use clap::ArgMatches;
use eyre::{Result, WrapErr};
use lodestone_blockservice::{
    BlockService, Datastore, MemoryDatastore, OfflineExchange, RedbDatastore,
};
use lodestone_primitives::Block;
use lodestone_providers::{ProviderHandle, create_provider_actor};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::config::LodestoneConfig;
use crate::dirs::DataDirs;
use crate::identity;

/// Bring up the registry and block service, run one command, then halt.
///
/// Command output goes to `out`; `matches` is the parse `cli` was built from.
pub(crate) async fn run<W>(cli: Cli, matches: &ArgMatches, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let dirs = DataDirs::new(cli.node.datadir.as_deref())?;
    let config_path = cli.node.config.as_deref().unwrap_or(dirs.config_file.as_path());

    let mut config = LodestoneConfig::load(Some(config_path))?;
    config.apply_args(&cli.node, matches);
    config.validate()?;
    debug!(?config, datadir = %dirs.root.display(), "Loaded configuration");

    let local = identity::load_or_create(&dirs.peer_id)?;

    let (registry, providers) = create_provider_actor(local, config.providers.config());
    let registry = tokio::spawn(registry.into_task());

    let datastore: Arc<dyn Datastore> = if config.blocks.in_memory {
        Arc::new(MemoryDatastore::new())
    } else {
        Arc::new(
            RedbDatastore::open(&dirs.blocks_db)
                .wrap_err_with(|| format!("Failed to open {}", dirs.blocks_db.display()))?,
        )
    };
    let exchange = Arc::new(OfflineExchange::new(local, providers.clone()));

    let blocks = BlockService::builder()
        .datastore(datastore)
        .exchange(exchange)
        .fetch_timeout(config.blocks.fetch_timeout())
        .build()?;

    let announced = blocks
        .reprovide()
        .await
        .wrap_err("Failed to announce stored blocks")?;
    info!(peer = %local, announced, "Node ready");

    let result = execute(cli.command, &blocks, &providers, out).await;

    // The registry may already be gone if a command failed on it.
    let _ = providers.halt();
    registry.await.wrap_err("Provider registry task failed")?;

    result
}

async fn execute<W>(
    command: Commands,
    blocks: &BlockService,
    providers: &ProviderHandle,
    out: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    match command {
        Commands::Put { file } => {
            let data = match file {
                Some(path) => tokio::fs::read(&path)
                    .await
                    .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut data = Vec::new();
                    tokio::io::stdin()
                        .read_to_end(&mut data)
                        .await
                        .wrap_err("Failed to read stdin")?;
                    data
                }
            };

            let key = blocks.put(&Block::new(data)).await?;
            out.write_all(format!("{key}\n").as_bytes()).await?;
        }
        Commands::Get { key } => {
            let block = blocks.get(&key).await?;
            out.write_all(block.data()).await?;
        }
        Commands::Providers { key } => {
            for peer in providers.get_providers(key).await? {
                let line = if peer.addresses().is_empty() {
                    format!("{}\n", peer.id())
                } else {
                    let addresses: Vec<_> =
                        peer.addresses().iter().map(ToString::to_string).collect();
                    format!("{} {}\n", peer.id(), addresses.join(","))
                };
                out.write_all(line.as_bytes()).await?;
            }
        }
        Commands::Local => {
            let mut keys = providers.get_local().await?;
            keys.sort();
            for key in keys {
                out.write_all(format!("{key}\n").as_bytes()).await?;
            }
        }
    }

    out.flush().await?;
    Ok(())
}
