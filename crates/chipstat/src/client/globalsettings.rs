use std::path::{Path, PathBuf};

use crate::client::output::outputs::Output;
use crate::common::inventory::{ChipInventory, DEFAULT_INVENTORY_PATH};

pub struct GlobalSettings {
    inventory_path: Option<PathBuf>,
    printer: Box<dyn Output>,
}

impl GlobalSettings {
    pub fn new(inventory_path: Option<PathBuf>, printer: Box<dyn Output>) -> Self {
        GlobalSettings {
            inventory_path,
            printer,
        }
    }

    /// Path of the chip inventory, the hardware database unless overridden.
    pub fn inventory_path(&self) -> &Path {
        self.inventory_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_INVENTORY_PATH))
    }

    pub fn printer(&self) -> &dyn Output {
        self.printer.as_ref()
    }

    /// Loads the chip inventory if it is available.
    ///
    /// An explicitly configured inventory must be readable, while a missing
    /// hardware database at the default location is skipped.
    pub fn load_inventory(&self) -> anyhow::Result<Option<ChipInventory>> {
        let path = self.inventory_path();
        if self.inventory_path.is_none() && !path.exists() {
            log::debug!("Chip inventory {} not found, skipping it", path.display());
            return Ok(None);
        }
        ChipInventory::load(path).map(Some)
    }

    /// Loads the chip inventory, failing if it cannot be read.
    pub fn require_inventory(&self) -> anyhow::Result<ChipInventory> {
        ChipInventory::load(self.inventory_path())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::GlobalSettings;
    use crate::client::output::quiet::Quiet;
    use crate::common::inventory::DEFAULT_INVENTORY_PATH;

    #[test]
    fn test_default_inventory_path() {
        let settings = GlobalSettings::new(None, Box::<Quiet>::default());
        assert_eq!(settings.inventory_path(), Path::new(DEFAULT_INVENTORY_PATH));
        if !settings.inventory_path().exists() {
            assert!(settings.load_inventory().unwrap().is_none());
            let error = settings.require_inventory().unwrap_err();
            assert!(format!("{error:#}").contains(DEFAULT_INVENTORY_PATH));
        }
    }

    #[test]
    fn test_missing_explicit_inventory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("db.yaml");
        let settings = GlobalSettings::new(Some(path), Box::<Quiet>::default());
        assert!(settings.load_inventory().is_err());
        assert!(settings.require_inventory().is_err());
    }

    #[test]
    fn test_load_inventory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("db.yaml");
        std::fs::write(
            &path,
            "---\nhxcube_id: 3\nfpgas:\n  - fpga: 1\n    chip_revision: 3\n",
        )
        .unwrap();
        let settings = GlobalSettings::new(Some(path), Box::<Quiet>::default());
        let inventory = settings.require_inventory().unwrap();
        assert_eq!(inventory.chips(3)[0].to_string(), "W63F1");
        assert!(settings.load_inventory().unwrap().is_some());
    }
}
