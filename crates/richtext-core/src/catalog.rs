use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    InlineStyle,
    Alignment,
    List,
    Indentation,
    BlockFormat,
    Link,
    Image,
    Color,
    History,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub label: String,
    pub kind: CommandKind,
    #[serde(default)]
    pub value_required: bool,
}

impl Command {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            value_required: false,
        }
    }

    pub fn value_required(mut self, value_required: bool) -> Self {
        self.value_required = value_required;
        self
    }
}

/// Read-only registry of the commands a toolbar can issue. Immutable after
/// construction; duplicate names are rejected at registration.
#[derive(Debug, Default)]
pub struct CommandCatalog {
    order: Vec<String>,
    commands: HashMap<String, Command>,
}

impl CommandCatalog {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Result<Self, String> {
        let mut catalog = Self::default();
        for command in commands {
            catalog.register(command)?;
        }
        Ok(catalog)
    }

    pub fn standard() -> Self {
        Self::new([
            Command::new("bold", "Bold", CommandKind::InlineStyle),
            Command::new("italic", "Italic", CommandKind::InlineStyle),
            Command::new("underline", "Underline", CommandKind::InlineStyle),
            Command::new("strikeThrough", "Strike Through", CommandKind::InlineStyle),
            Command::new("superscript", "Superscript", CommandKind::InlineStyle),
            Command::new("subscript", "Subscript", CommandKind::InlineStyle),
            Command::new("justifyLeft", "Align Left", CommandKind::Alignment),
            Command::new("justifyCenter", "Align Center", CommandKind::Alignment),
            Command::new("justifyRight", "Align Right", CommandKind::Alignment),
            Command::new("insertUnorderedList", "Bullet List", CommandKind::List),
            Command::new("insertOrderedList", "Numbered List", CommandKind::List),
            Command::new("indent", "Indent", CommandKind::Indentation),
            Command::new("outdent", "Outdent", CommandKind::Indentation),
            Command::new("formatBlock", "Format Block", CommandKind::BlockFormat)
                .value_required(true),
            Command::new("createLink", "Insert Link", CommandKind::Link).value_required(true),
            Command::new("unlink", "Remove Link", CommandKind::Link),
            Command::new("insertImage", "Insert Image", CommandKind::Image).value_required(true),
            Command::new("foreColor", "Text Color", CommandKind::Color).value_required(true),
            Command::new("hiliteColor", "Highlight Color", CommandKind::Color)
                .value_required(true),
            Command::new("undo", "Undo", CommandKind::History),
            Command::new("redo", "Redo", CommandKind::History),
            Command::new("clearFormat", "Clear Formatting", CommandKind::Clear),
        ])
        .expect("standard catalog must be valid")
    }

    fn register(&mut self, command: Command) -> Result<(), String> {
        if self.commands.contains_key(&command.name) {
            return Err(format!("Duplicate command name: {}", command.name));
        }
        self.order.push(command.name.clone());
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Commands in registration order, for toolbar construction.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.order.iter().filter_map(|name| self.commands.get(name))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
