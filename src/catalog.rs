//! Persisted effect catalog document.
//!
//! The document is a JSON object with a format version (`"v"`), the enabled
//! flags (`"eef"`) and the effect records (`"efs"`). Each record carries its
//! type tag (`"t"`), friendly name (`"n"`) and optional parameters.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::color::{RED, Rgb};
use crate::effect::{EffectSlot, PaletteFlameEffect, RainbowEffect, VuMeterEffect};
use crate::error::ConfigError;

/// Maximum number of effects in a catalog
pub const MAX_EFFECTS: usize = 32;

/// Format version written to saved documents
pub const JSON_FORMAT_VERSION: u32 = 1;

/// Ordered effect catalog; position is rotation order
pub type Catalog = heapless::Vec<EffectSlot, MAX_EFFECTS>;

/// Enabled flags parallel to a [`Catalog`]
pub type EnabledFlags = heapless::Vec<bool, MAX_EFFECTS>;

/// Serialized form of a single effect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectConfig {
    #[serde(rename = "t")]
    pub kind: u8,
    #[serde(rename = "n", default)]
    pub name: String,
    #[serde(rename = "mt", default, skip_serializing_if = "Option::is_none")]
    pub max_effect_time_ms: Option<u64>,
    #[serde(rename = "cl", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(rename = "cl2", default, skip_serializing_if = "Option::is_none")]
    pub color2: Option<u32>,
    #[serde(rename = "spd", default, skip_serializing_if = "Option::is_none")]
    pub speed_ms: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(rename = "v", default)]
    version: u32,
    // Enabled flags come first so a document cut short still reports them
    #[serde(rename = "eef", default)]
    enabled: Option<Vec<bool>>,
    #[serde(rename = "efs", default)]
    effects: Option<Vec<serde_json::Value>>,
}

/// A catalog reconstructed from a document
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub effects: Catalog,
    pub enabled: EnabledFlags,
}

/// Parse a catalog document.
///
/// Records that fail to deserialize or carry an unknown type tag are
/// skipped. Missing enabled flags default to enabled.
pub fn parse_catalog(document: &[u8]) -> Result<LoadedCatalog, ConfigError> {
    let document: CatalogDocument = serde_json::from_slice(document).map_err(|error| {
        log::warn!("catalog document rejected: {}", error);
        ConfigError::Malformed
    })?;

    if document.version > JSON_FORMAT_VERSION {
        log::warn!(
            "catalog format version {} is newer than {}",
            document.version,
            JSON_FORMAT_VERSION
        );
    }

    let records = document.effects.ok_or(ConfigError::MissingEffects)?;

    let mut effects = Catalog::new();
    for (position, record) in records.into_iter().enumerate() {
        let config = match serde_json::from_value::<EffectConfig>(record) {
            Ok(config) => config,
            Err(error) => {
                log::warn!("skipping effect record {}: {}", position, error);
                continue;
            }
        };
        let Some(slot) = EffectSlot::from_config(&config) else {
            log::warn!("skipping effect record {}: unknown type {}", position, config.kind);
            continue;
        };
        effects
            .push(slot)
            .map_err(|_| ConfigError::TooManyEffects { max: MAX_EFFECTS })?;
    }

    if effects.is_empty() {
        return Err(ConfigError::NoUsableEffects);
    }

    let flags = document.enabled.unwrap_or_default();
    let enabled = (0..effects.len())
        .map(|index| flags.get(index).copied().unwrap_or(true))
        .collect();

    Ok(LoadedCatalog { effects, enabled })
}

/// Serialize a catalog and its enabled flags into a document
pub fn serialize_catalog(effects: &[EffectSlot], enabled: &[bool]) -> Result<Vec<u8>, ConfigError> {
    let records = effects
        .iter()
        .map(|effect| serde_json::to_value(effect.to_config()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::Serialize)?;

    let document = CatalogDocument {
        version: JSON_FORMAT_VERSION,
        enabled: Some(enabled.to_vec()),
        effects: Some(records),
    };
    serde_json::to_vec(&document).map_err(|_| ConfigError::Serialize)
}

/// Built-in catalog used when no usable document is available
pub fn default_catalog() -> Catalog {
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const CYAN: Rgb = Rgb {
        r: 0,
        g: 255,
        b: 255,
    };

    [
        EffectSlot::Rainbow(RainbowEffect::default()),
        EffectSlot::PaletteFlame(PaletteFlameEffect::new(RED, None)).with_name("Red Fire"),
        EffectSlot::PaletteFlame(PaletteFlameEffect::new(BLUE, Some(CYAN))).with_name("Blue Fire"),
        EffectSlot::VuMeter(VuMeterEffect::default()),
    ]
    .into_iter()
    .collect()
}
