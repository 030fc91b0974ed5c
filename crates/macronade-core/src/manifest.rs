//! Asset/rig manifest: which members a pantin can rotate and which variant
//! groups it exposes.
//!
//! Read-only collaborator. The core uses it to *report* unknown
//! member/variant keys; it never rejects state on that basis.

use hashbrown::HashMap;
use serde::Deserialize;

use macronade_api_core::SceneItem;

/// Rig description for one pantin asset.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantinSpec {
    /// Rotatable member ids, e.g. "bras_gauche".
    #[serde(default)]
    pub members: Vec<String>,
    /// Named variant group -> available options.
    #[serde(default)]
    pub variant_groups: HashMap<String, Vec<String>>,
}

/// The whole manifest, keyed by asset path.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RigManifest {
    #[serde(default)]
    pub pantins: HashMap<String, PantinSpec>,
}

impl RigManifest {
    pub fn parse(json: &str) -> Result<RigManifest, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn spec_for(&self, asset_path: &str) -> Option<&PantinSpec> {
        self.pantins.get(asset_path)
    }

    /// Keys on the item that the manifest does not know about. Unknown keys
    /// are logged and returned; the caller decides whether to surface them.
    pub fn unknown_keys(&self, item: &SceneItem) -> Vec<String> {
        let Some(spec) = self.spec_for(&item.asset_path) else {
            return Vec::new();
        };
        let mut unknown = Vec::new();
        for member in item.member_rotations.keys() {
            if !spec.members.iter().any(|m| m == member) {
                unknown.push(member.clone());
            }
        }
        for group in item.variants.keys() {
            if !spec.variant_groups.contains_key(group) {
                unknown.push(group.clone());
            }
        }
        if !unknown.is_empty() {
            log::warn!(
                "item {} uses keys absent from the rig manifest: {:?}",
                item.id,
                unknown
            );
        }
        unknown
    }
}
