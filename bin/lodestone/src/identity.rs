//! Persisted local peer identity.

use std::{fs, path::Path};

use eyre::{Result, WrapErr};
use lodestone_primitives::PeerId;
use tracing::info;

/// Load the peer id stored at `path`, generating and saving one on first run.
pub(crate) fn load_or_create(path: &Path) -> Result<PeerId> {
    if path.exists() {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read peer id from {}", path.display()))?;
        return raw
            .trim()
            .parse::<PeerId>()
            .wrap_err_with(|| format!("Invalid peer id in {}", path.display()));
    }

    let id = PeerId::random();
    fs::write(path, id.to_string())
        .wrap_err_with(|| format!("Failed to write peer id to {}", path.display()))?;
    info!(peer = %id, "Generated new peer identity");
    Ok(id)
}
