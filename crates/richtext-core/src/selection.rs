use serde::{Deserialize, Serialize};

/// Opaque lookup key for a link node owned by the host surface. Keys are
/// weak: the host invalidates them when the node leaves the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkKey(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl BlockTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTag::P => "p",
            BlockTag::H1 => "h1",
            BlockTag::H2 => "h2",
            BlockTag::H3 => "h3",
            BlockTag::H4 => "h4",
            BlockTag::H5 => "h5",
            BlockTag::H6 => "h6",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "p" => Some(BlockTag::P),
            "h1" => Some(BlockTag::H1),
            "h2" => Some(BlockTag::H2),
            "h3" => Some(BlockTag::H3),
            "h4" => Some(BlockTag::H4),
            "h5" => Some(BlockTag::H5),
            "h6" => Some(BlockTag::H6),
            _ => None,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockTag::P => None,
            BlockTag::H1 => Some(1),
            BlockTag::H2 => Some(2),
            BlockTag::H3 => Some(3),
            BlockTag::H4 => Some(4),
            BlockTag::H5 => Some(5),
            BlockTag::H6 => Some(6),
        }
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }
}

/// Snapshot of what the cursor or highlighted range sits in. Recomputed by
/// the host on every cursor-affecting event, consumed once, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    #[serde(default)]
    pub contains_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_link: Option<LinkKey>,
    #[serde(default)]
    pub in_block_quote: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_block_tag: Option<BlockTag>,
}
