//! Chips installed in the cubes of the system, read from the hardware database.
//!
//! The database is a multi-document YAML file. Documents describing a cube carry
//! a `hxcube_id`, all other documents are ignored:
//!
//! ```yaml
//! ---
//! hxcube_id: 2
//! fpgas:
//!   - fpga: 3
//!     chip_revision: 3
//!   - fpga: 4
//! ```
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::usage::license::ChipLicense;

pub const DEFAULT_INVENTORY_PATH: &str = "/wang/data/bss-hwdb/db.yaml";

/// Wafer id of a cube's chips is the cube id shifted by this offset.
pub const WAFER_ID_OFFSET: u32 = 60;

pub const DEFAULT_CHIP_REVISION: u32 = 3;

const CUBE_ID_KEY: &str = "hxcube_id";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FpgaEntry {
    pub fpga: u32,
    /// Missing for FPGAs without a chip.
    pub chip_revision: Option<u32>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CubeEntry {
    pub hxcube_id: u32,
    #[serde(default)]
    pub fpgas: Vec<FpgaEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipInventory {
    pub cubes: Vec<CubeEntry>,
}

impl ChipInventory {
    pub fn parse(content: &str) -> crate::Result<Self> {
        let mut cubes = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = serde_yaml::Value::deserialize(document)?;
            if value.get(CUBE_ID_KEY).is_none() {
                continue;
            }
            cubes.push(serde_yaml::from_value::<CubeEntry>(value)?);
        }
        Ok(Self { cubes })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read chip inventory {}", path.display()))?;
        let inventory = Self::parse(&content)
            .with_context(|| format!("Invalid chip inventory {}", path.display()))?;
        log::debug!(
            "Loaded chip inventory {} with {} cube(s)",
            path.display(),
            inventory.cubes.len()
        );
        Ok(inventory)
    }

    fn chips_with<F: Fn(u32) -> bool>(&self, filter: F) -> Vec<ChipLicense> {
        self.cubes
            .iter()
            .flat_map(|cube| {
                cube.fpgas
                    .iter()
                    .filter(|fpga| fpga.chip_revision.is_some_and(&filter))
                    .map(move |fpga| {
                        ChipLicense::new(cube.hxcube_id + WAFER_ID_OFFSET, fpga.fpga)
                    })
            })
            .collect()
    }

    /// Licenses of all chips of the given revision, in database order.
    pub fn chips(&self, revision: u32) -> Vec<ChipLicense> {
        self.chips_with(|chip_revision| chip_revision == revision)
    }

    /// Licenses of all installed chips regardless of their revision.
    pub fn all_chips(&self) -> Vec<ChipLicense> {
        self.chips_with(|_| true)
    }
}
