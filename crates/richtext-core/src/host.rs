use serde::{Deserialize, Serialize};

use crate::link::LinkMetadata;
use crate::selection::{BlockTag, LinkKey, SelectionContext};

/// How an image is laid out when an alignment command targets it instead of
/// text: left/right float, or block display with centering margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAlignment {
    FloatLeft,
    Centered,
    FloatRight,
}

/// Capability interface to the editable surface.
///
/// The host exclusively owns the live document tree and its undo/redo
/// history. The core keeps no node references across calls; every operation
/// re-derives its target from the `SelectionContext` reported at call time.
pub trait HostSurface {
    /// Apply a named formatting command to the current selection. Returns
    /// whether the surface accepted the mutation.
    fn apply_style_command(&mut self, name: &str, value: Option<&str>) -> bool;

    /// Whether the named style is on at the cursor right now.
    fn query_style_active(&self, name: &str) -> bool;

    fn current_block_tag(&self) -> Option<BlockTag>;

    fn selection_context(&self) -> SelectionContext;

    fn set_image_alignment(&mut self, alignment: ImageAlignment);

    /// Left margin of the selection's containing block. `None` when the
    /// selection has no qualifying block.
    fn block_margin_left(&self) -> Option<i32>;

    fn set_block_margin_left(&mut self, margin: i32);

    /// Attach traceable origin metadata to the link node behind `key`.
    /// Returns false when the key no longer resolves.
    fn attach_link_metadata(&mut self, key: LinkKey, metadata: LinkMetadata) -> bool;

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    fn perform_undo(&mut self) -> bool;

    fn perform_redo(&mut self) -> bool;

    /// Replace the entire editable content with the given markup.
    fn replace_all_content(&mut self, markup: &str);

    /// Return input focus to the editable surface.
    fn focus(&mut self);
}
