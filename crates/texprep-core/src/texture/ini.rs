//! Texture override INI generation.

use std::fmt::Write as _;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{HashPair, SlotHash, TextureError};

#[allow(clippy::unwrap_used)] // Constant pattern
static DDS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)_(\w+)-R8G8B8A8_UNORM_SRGB\.dds").unwrap());

/// One converted texture referenced by the INI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniEntry {
    pub hashes: HashPair,
    pub file_name: String,
}

impl IniEntry {
    /// Build an entry from a converted texture's file name. Only lowercase
    /// `.dds` names in the texture naming scheme qualify.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if !file_name.ends_with(".dds") {
            return None;
        }
        let caps = DDS_NAME.captures(file_name)?;
        Some(Self {
            hashes: HashPair::new(&caps[1], &caps[2]),
            file_name: file_name.to_string(),
        })
    }

    fn block(&self) -> String {
        let hash = &self.hashes.primary;
        format!(
            "[TextureOverride_Texture_{hash}]\n\
             hash = {hash}\n\
             this = ResourceTexture_{hash}\n\
             \n\
             [ResourceTexture_{hash}]\n\
             filename = {}\n",
            self.file_name
        )
    }
}

/// Entries for every converted texture in `dir`, in case-insensitive name
/// order.
pub fn collect_entries(dir: &Path) -> Result<Vec<IniEntry>, TextureError> {
    let mut names = super::file_names(dir)?;
    super::sort_case_insensitive(&mut names);
    Ok(names
        .iter()
        .filter_map(|name| IniEntry::from_file_name(name))
        .collect())
}

/// Render the INI: the slot check header, then one override and one
/// resource block per entry, separated by blank lines.
pub fn render_ini(slot: &SlotHash, entries: &[IniEntry]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "[TextureOverride_IB_SlotCheck]\n\
         hash = {slot}\n\
         match_priority = 0\n\
         run = CommandListSkinTexture\n\
         \n"
    );
    let blocks: Vec<String> = entries.iter().map(IniEntry::block).collect();
    out.push_str(&blocks.join("\n"));
    out
}
