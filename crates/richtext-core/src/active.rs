use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Command, CommandCatalog, CommandKind};
use crate::host::HostSurface;
use crate::selection::SelectionContext;

/// Command names (plus pseudo-names such as `h1` or `blockquote`) whose
/// effect is on at the cursor. Always rebuilt wholesale; incremental patching
/// would go stale on plain cursor movement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveStateSet {
    names: BTreeSet<String>,
}

impl ActiveStateSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn command_is_queryable(command: &Command) -> bool {
    match command.kind {
        CommandKind::InlineStyle | CommandKind::Alignment | CommandKind::List => true,
        CommandKind::Link => command.name == "createLink",
        _ => false,
    }
}

/// Ask the host which queryable commands apply at the cursor, then add the
/// synthetic block-quote and heading states from the selection context.
/// History and Clear commands are stateless actions and never members.
pub fn compute_active_states<H: HostSurface>(
    catalog: &CommandCatalog,
    host: &H,
    context: &SelectionContext,
) -> ActiveStateSet {
    let mut active = ActiveStateSet::default();

    for command in catalog.commands() {
        if !command_is_queryable(command) {
            continue;
        }
        if host.query_style_active(&command.name) {
            active.insert(command.name.clone());
        }
    }

    if context.in_block_quote {
        active.insert("blockquote");
    }
    if let Some(tag) = context.current_block_tag {
        if tag.is_heading() {
            active.insert(tag.as_str());
        }
    }

    active
}
