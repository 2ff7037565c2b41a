use log::debug;

use crate::active::{ActiveStateSet, compute_active_states};
use crate::catalog::{CommandCatalog, CommandKind};
use crate::error::DispatchError;
use crate::history::HistoryAvailability;
use crate::host::{HostSurface, ImageAlignment};
use crate::link::{LinkMetadata, normalize_url};

/// Margin delta per indent/outdent step. Outdent clamps at zero.
pub const INDENT_STEP: i32 = 20;

/// Content installed by `reset_to_default`.
pub const DEFAULT_TEMPLATE: &str = "<h1>Untitled document</h1><p></p>";

/// Everything the UI needs after a user action: which commands are on at the
/// new cursor position, and whether undo/redo are possible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub active: ActiveStateSet,
    pub history: HistoryAvailability,
}

pub struct EditorCore<H: HostSurface> {
    catalog: CommandCatalog,
    host: H,
}

impl<H: HostSurface> EditorCore<H> {
    pub fn new(host: H) -> Self {
        Self {
            catalog: CommandCatalog::standard(),
            host,
        }
    }

    pub fn with_catalog(catalog: CommandCatalog, host: H) -> Self {
        Self { catalog, host }
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Resolve `name`, apply the mutation it stands for in the current
    /// selection context, and report the recomputed UI state.
    pub fn dispatch(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(command) = self.catalog.lookup(name) else {
            return Err(DispatchError::UnknownCommand(name.to_string()));
        };
        let command = command.clone();
        debug!("dispatch {} ({:?})", command.name, command.kind);

        let value = value.map(str::trim).filter(|v| !v.is_empty());
        if command.value_required && value.is_none() {
            // Cancelled input: the value prompt came back empty.
            return Ok(self.finish());
        }

        let context = self.host.selection_context();
        match command.kind {
            // The same toolbar action floats or centers an image when the
            // selection targets one; text styles stay untouched.
            CommandKind::Alignment if context.contains_image => {
                if let Some(alignment) = image_alignment_for(&command.name) {
                    self.host.set_image_alignment(alignment);
                }
            }
            CommandKind::Indentation => {
                if let Some(margin) = self.host.block_margin_left() {
                    let next = if command.name == "outdent" {
                        (margin - INDENT_STEP).max(0)
                    } else {
                        margin + INDENT_STEP
                    };
                    if next != margin {
                        self.host.set_block_margin_left(next);
                    }
                }
            }
            CommandKind::Link if command.name == "createLink" => {
                self.create_link(value);
            }
            CommandKind::History => {
                if command.name == "undo" {
                    self.host.perform_undo();
                } else {
                    self.host.perform_redo();
                }
            }
            _ => {
                self.host.apply_style_command(&command.name, value);
            }
        }

        Ok(self.finish())
    }

    /// Insert a link at the current selection, normalizing the value and
    /// attaching origin metadata to the created anchor. Empty input cancels.
    pub fn insert_link(&mut self, value: &str) -> DispatchOutcome {
        self.create_link(Some(value));
        self.finish()
    }

    /// Insert an image; the value is used as-is, no scheme normalization.
    pub fn insert_image(&mut self, value: &str) -> DispatchOutcome {
        let value = value.trim();
        if !value.is_empty() {
            self.host.apply_style_command("insertImage", Some(value));
        }
        self.finish()
    }

    pub fn request_undo(&mut self) -> DispatchOutcome {
        self.host.perform_undo();
        self.finish()
    }

    pub fn request_redo(&mut self) -> DispatchOutcome {
        self.host.perform_redo();
        self.finish()
    }

    /// Replace the whole document with the default template. The only
    /// operation that discards content instead of targeting the selection.
    pub fn reset_to_default(&mut self) -> DispatchOutcome {
        self.host.replace_all_content(DEFAULT_TEMPLATE);
        self.finish()
    }

    pub fn active_states(&self) -> ActiveStateSet {
        let context = self.host.selection_context();
        compute_active_states(&self.catalog, &self.host, &context)
    }

    pub fn refresh_history(&self) -> HistoryAvailability {
        HistoryAvailability {
            can_undo: self.host.can_undo(),
            can_redo: self.host.can_redo(),
        }
    }

    fn create_link(&mut self, value: Option<&str>) {
        let Some(url) = value.and_then(normalize_url) else {
            return;
        };
        if !self.host.apply_style_command("createLink", Some(&url)) {
            // Nothing was created; any anchor the walk-up would find is a
            // pre-existing one whose origin metadata must stay untouched.
            debug!("host rejected createLink, skipping metadata");
            return;
        }

        // Walk up from the insertion point to the enclosing anchor and tag
        // it with the URL the link was created with. A vanished anchor means
        // the metadata is skipped; the link itself stands.
        match self.host.selection_context().nearest_link {
            Some(key) => {
                if !self.host.attach_link_metadata(key, LinkMetadata { url }) {
                    debug!("link metadata target vanished before attachment");
                }
            }
            None => debug!("no enclosing link found after createLink"),
        }
    }

    fn finish(&mut self) -> DispatchOutcome {
        self.host.focus();
        let context = self.host.selection_context();
        let active = compute_active_states(&self.catalog, &self.host, &context);
        let history = self.refresh_history();
        DispatchOutcome { active, history }
    }
}

fn image_alignment_for(name: &str) -> Option<ImageAlignment> {
    match name {
        "justifyLeft" => Some(ImageAlignment::FloatLeft),
        "justifyCenter" => Some(ImageAlignment::Centered),
        "justifyRight" => Some(ImageAlignment::FloatRight),
        _ => None,
    }
}
