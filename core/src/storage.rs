use std::path::Path;

use log::{info, warn};

use crate::error::Result;
use crate::types::DetectorConfig;

/// Leser detektor-konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: impl AsRef<Path>) -> Result<DetectorConfig> {
    let path = path.as_ref();
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let de = &mut serde_json::Deserializer::from_str(&contents);
        let cfg: DetectorConfig = serde_path_to_error::deserialize(de)?;
        info!(
            "📂 Konfig lastet fra {} (thresholds={})",
            path.display(),
            cfg.thresholds.is_some()
        );
        Ok(cfg)
    } else {
        warn!("⚠️ Fant ikke konfig på {}, returnerer default", path.display());
        Ok(DetectorConfig::default())
    }
}

/// Lagrer konfig til disk som JSON (pretty-print).
pub fn save_config(cfg: &DetectorConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(cfg).map_err(|source| crate::Error::Json {
        path: ".".into(),
        source,
    })?;
    std::fs::write(path, json)?;
    info!("✅ Konfig lagret til {}", path.display());
    Ok(())
}
