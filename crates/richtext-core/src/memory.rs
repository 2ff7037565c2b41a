//! In-memory `HostSurface` backed by a small block/run document and a
//! snapshot-log undo history. Lets the core run and be tested without a
//! rendering surface, and doubles as reference semantics for host authors.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::host::{HostSurface, ImageAlignment};
use crate::link::LinkMetadata;
use crate::selection::{BlockTag, LinkKey, SelectionContext};

const MAX_UNDO: usize = 200;

const DEFAULT_SCHEMA: &str = "richtext-memory";
const DEFAULT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMark {
    pub id: u64,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub superscript: bool,
    #[serde(default)]
    pub subscript: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fore_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hilite_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkMark>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub marks: Marks,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub tag: BlockTag,
    #[serde(default)]
    pub quoted: bool,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub margin_left: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ListKind>,
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl TextBlock {
    pub fn empty(tag: BlockTag) -> Self {
        Self::with_text(tag, "")
    }

    pub fn with_text(tag: BlockTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            quoted: false,
            align: TextAlign::default(),
            margin_left: 0,
            list: None,
            runs: vec![Run {
                text: text.into(),
                marks: Marks::default(),
            }],
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.text.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<ImageAlignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDocument {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Single-block selection: byte offsets into the block's concatenated text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySelection {
    pub block: usize,
    pub start: usize,
    pub end: usize,
}

impl MemorySelection {
    pub fn collapsed(block: usize, offset: usize) -> Self {
        Self {
            block,
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentValue {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub document: MemoryDocument,
}

impl DocumentValue {
    pub fn from_document(document: MemoryDocument) -> Self {
        Self {
            schema: default_schema(),
            version: default_version(),
            document,
        }
    }

    pub fn into_document(self) -> MemoryDocument {
        self.document
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    doc: MemoryDocument,
    selection: MemorySelection,
    link_meta: HashMap<u64, LinkMetadata>,
}

#[derive(Debug)]
pub struct MemoryHost {
    doc: MemoryDocument,
    selection: MemorySelection,
    link_meta: HashMap<u64, LinkMetadata>,
    next_link_id: u64,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    // Typing state: marks a collapsed-selection toggle applies to text
    // entered next. Dies on any selection move.
    pending_marks: Option<Marks>,
    focused: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::with_document(
            MemoryDocument {
                blocks: vec![Block::Text(TextBlock::empty(BlockTag::P))],
            },
            MemorySelection::collapsed(0, 0),
        )
    }

    pub fn with_document(doc: MemoryDocument, selection: MemorySelection) -> Self {
        let mut host = Self {
            doc,
            selection: MemorySelection::default(),
            link_meta: HashMap::new(),
            next_link_id: 1,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending_marks: None,
            focused: false,
        };
        if host.doc.blocks.is_empty() {
            host.doc
                .blocks
                .push(Block::Text(TextBlock::empty(BlockTag::P)));
        }
        host.selection = host.clamp_selection(selection);
        host
    }

    pub fn doc(&self) -> &MemoryDocument {
        &self.doc
    }

    pub fn selection(&self) -> MemorySelection {
        self.selection
    }

    pub fn select(&mut self, block: usize, start: usize, end: usize) {
        self.set_selection(MemorySelection { block, start, end });
    }

    pub fn set_selection(&mut self, selection: MemorySelection) {
        self.pending_marks = None;
        self.selection = self.clamp_selection(selection);
    }

    pub fn metadata(&self, key: LinkKey) -> Option<&LinkMetadata> {
        self.link_meta.get(&key.0)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn clamp_selection(&self, selection: MemorySelection) -> MemorySelection {
        let block = selection
            .block
            .min(self.doc.blocks.len().saturating_sub(1));
        let len = match &self.doc.blocks[block] {
            Block::Text(text) => text.len(),
            Block::Image(_) => 0,
        };
        let start = selection.start.min(len);
        let end = selection.end.clamp(start, len);
        MemorySelection { block, start, end }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            doc: self.doc.clone(),
            selection: self.selection,
            link_meta: self.link_meta.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.doc = snapshot.doc;
        self.selection = snapshot.selection;
        self.link_meta = snapshot.link_meta;
        self.pending_marks = None;
    }

    fn checkpoint(&mut self) {
        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.remove(0);
        }
    }

    fn current_text_block(&self) -> Option<&TextBlock> {
        match self.doc.blocks.get(self.selection.block) {
            Some(Block::Text(block)) => Some(block),
            _ => None,
        }
    }

    /// Mutate the selection's text block, recording one undo step. False
    /// when the selection targets no text block or the edit changes nothing.
    fn with_current_text_block(&mut self, f: impl FnOnce(&mut TextBlock)) -> bool {
        let Some(block) = self.current_text_block() else {
            return false;
        };
        let mut updated = block.clone();
        f(&mut updated);
        if updated == *block {
            return false;
        }
        self.checkpoint();
        if let Some(Block::Text(block)) = self.doc.blocks.get_mut(self.selection.block) {
            *block = updated;
        }
        true
    }

    fn marks_at_caret(&self) -> Marks {
        if let Some(pending) = &self.pending_marks {
            return pending.clone();
        }
        let Some(block) = self.current_text_block() else {
            return Marks::default();
        };
        let offset = self.selection.start;
        let mut cursor = 0usize;
        for run in &block.runs {
            let end = cursor + run.text.len();
            if offset <= end {
                return run.marks.clone();
            }
            cursor = end;
        }
        block
            .runs
            .last()
            .map(|run| run.marks.clone())
            .unwrap_or_default()
    }

    fn selection_marks_all(&self, get: impl Fn(&Marks) -> bool) -> bool {
        let sel = self.selection;
        let Some(block) = self.current_text_block() else {
            return false;
        };
        let mut cursor = 0usize;
        let mut any = false;
        for run in &block.runs {
            let start = cursor;
            let end = cursor + run.text.len();
            cursor = end;
            if sel.end <= start || sel.start >= end {
                continue;
            }
            any = true;
            if !get(&run.marks) {
                return false;
            }
        }
        any
    }

    fn active_bool(&self, get: impl Fn(&Marks) -> bool) -> bool {
        if self.selection.is_collapsed() {
            get(&self.marks_at_caret())
        } else {
            self.selection_marks_all(get)
        }
    }

    fn selection_link(&self) -> Option<LinkMark> {
        if self.selection.is_collapsed() {
            return self.marks_at_caret().link;
        }
        let sel = self.selection;
        let block = self.current_text_block()?;
        let mut cursor = 0usize;
        for run in &block.runs {
            let start = cursor;
            let end = cursor + run.text.len();
            cursor = end;
            if sel.end <= start || sel.start >= end {
                continue;
            }
            if let Some(link) = &run.marks.link {
                return Some(link.clone());
            }
        }
        None
    }

    fn edit_marks_in_selection(&mut self, apply: &dyn Fn(&mut Marks)) -> bool {
        if self.selection.is_collapsed() {
            let mut marks = self.marks_at_caret();
            apply(&mut marks);
            self.pending_marks = Some(marks);
            return true;
        }
        if self.current_text_block().is_none() {
            return false;
        }
        self.checkpoint();
        let sel = self.selection;
        let Some(Block::Text(block)) = self.doc.blocks.get_mut(sel.block) else {
            return false;
        };
        apply_marks_in_range(block, sel.start, sel.end, apply);
        true
    }

    fn toggle_bool_mark(&mut self, get: fn(&Marks) -> bool, set: fn(&mut Marks, bool)) -> bool {
        let target = if self.selection.is_collapsed() {
            !get(&self.marks_at_caret())
        } else {
            !self.selection_marks_all(get)
        };
        self.edit_marks_in_selection(&move |marks| set(marks, target))
    }

    fn toggle_list(&mut self, kind: ListKind) -> bool {
        self.with_current_text_block(|block| {
            block.list = if block.list == Some(kind) {
                None
            } else {
                Some(kind)
            };
        })
    }

    fn create_link(&mut self, href: &str) -> bool {
        if self.selection.is_collapsed() || self.current_text_block().is_none() {
            return false;
        }
        self.checkpoint();
        let id = self.next_link_id;
        self.next_link_id += 1;
        let sel = self.selection;
        let Some(Block::Text(block)) = self.doc.blocks.get_mut(sel.block) else {
            return false;
        };
        let link = LinkMark {
            id,
            href: href.to_string(),
        };
        apply_marks_in_range(block, sel.start, sel.end, &move |marks| {
            marks.link = Some(link.clone());
        });
        true
    }

    fn unlink(&mut self) -> bool {
        let changed = self.edit_marks_in_selection(&|marks| marks.link = None);
        if changed {
            self.prune_link_metadata();
        }
        changed
    }

    fn insert_image(&mut self, src: &str) -> bool {
        self.checkpoint();
        let at = (self.selection.block + 1).min(self.doc.blocks.len());
        self.doc.blocks.insert(
            at,
            Block::Image(ImageBlock {
                src: src.to_string(),
                alignment: None,
            }),
        );
        self.pending_marks = None;
        self.selection = MemorySelection::collapsed(at, 0);
        true
    }

    fn prune_link_metadata(&mut self) {
        let mut used: HashSet<u64> = HashSet::new();
        for block in &self.doc.blocks {
            if let Block::Text(block) = block {
                for run in &block.runs {
                    if let Some(link) = &run.marks.link {
                        used.insert(link.id);
                    }
                }
            }
        }
        self.link_meta.retain(|id, _| used.contains(id));
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSurface for MemoryHost {
    fn apply_style_command(&mut self, name: &str, value: Option<&str>) -> bool {
        match name {
            "bold" => self.toggle_bool_mark(|m| m.bold, |m, v| m.bold = v),
            "italic" => self.toggle_bool_mark(|m| m.italic, |m, v| m.italic = v),
            "underline" => self.toggle_bool_mark(|m| m.underline, |m, v| m.underline = v),
            "strikeThrough" => {
                self.toggle_bool_mark(|m| m.strikethrough, |m, v| m.strikethrough = v)
            }
            "superscript" => self.toggle_bool_mark(|m| m.superscript, |m, v| m.superscript = v),
            "subscript" => self.toggle_bool_mark(|m| m.subscript, |m, v| m.subscript = v),
            "foreColor" => {
                let Some(color) = value else { return false };
                let color = color.to_string();
                self.edit_marks_in_selection(&move |marks| {
                    marks.fore_color = Some(color.clone());
                })
            }
            "hiliteColor" => {
                let Some(color) = value else { return false };
                let color = color.to_string();
                self.edit_marks_in_selection(&move |marks| {
                    marks.hilite_color = Some(color.clone());
                })
            }
            "justifyLeft" => self.with_current_text_block(|b| b.align = TextAlign::Left),
            "justifyCenter" => self.with_current_text_block(|b| b.align = TextAlign::Center),
            "justifyRight" => self.with_current_text_block(|b| b.align = TextAlign::Right),
            "insertOrderedList" => self.toggle_list(ListKind::Ordered),
            "insertUnorderedList" => self.toggle_list(ListKind::Unordered),
            "formatBlock" => {
                let Some(value) = value else { return false };
                if value.eq_ignore_ascii_case("blockquote") {
                    self.with_current_text_block(|b| b.quoted = !b.quoted)
                } else if let Some(tag) = BlockTag::parse(value) {
                    self.with_current_text_block(|b| b.tag = tag)
                } else {
                    false
                }
            }
            "createLink" => {
                let Some(href) = value else { return false };
                self.create_link(href)
            }
            "unlink" => self.unlink(),
            "insertImage" => {
                let Some(src) = value else { return false };
                self.insert_image(src)
            }
            "clearFormat" => self.edit_marks_in_selection(&|marks| {
                let link = marks.link.take();
                *marks = Marks::default();
                marks.link = link;
            }),
            _ => false,
        }
    }

    fn query_style_active(&self, name: &str) -> bool {
        match name {
            "bold" => self.active_bool(|m| m.bold),
            "italic" => self.active_bool(|m| m.italic),
            "underline" => self.active_bool(|m| m.underline),
            "strikeThrough" => self.active_bool(|m| m.strikethrough),
            "superscript" => self.active_bool(|m| m.superscript),
            "subscript" => self.active_bool(|m| m.subscript),
            "justifyLeft" => self
                .current_text_block()
                .is_some_and(|b| b.align == TextAlign::Left),
            "justifyCenter" => self
                .current_text_block()
                .is_some_and(|b| b.align == TextAlign::Center),
            "justifyRight" => self
                .current_text_block()
                .is_some_and(|b| b.align == TextAlign::Right),
            "insertOrderedList" => self
                .current_text_block()
                .is_some_and(|b| b.list == Some(ListKind::Ordered)),
            "insertUnorderedList" => self
                .current_text_block()
                .is_some_and(|b| b.list == Some(ListKind::Unordered)),
            "createLink" => self.selection_link().is_some(),
            _ => false,
        }
    }

    fn current_block_tag(&self) -> Option<BlockTag> {
        self.current_text_block().map(|block| block.tag)
    }

    fn selection_context(&self) -> SelectionContext {
        let contains_image = matches!(
            self.doc.blocks.get(self.selection.block),
            Some(Block::Image(_))
        );
        SelectionContext {
            contains_image,
            nearest_link: self.selection_link().map(|link| LinkKey(link.id)),
            in_block_quote: self.current_text_block().is_some_and(|b| b.quoted),
            current_block_tag: self.current_block_tag(),
        }
    }

    fn set_image_alignment(&mut self, alignment: ImageAlignment) {
        if !matches!(
            self.doc.blocks.get(self.selection.block),
            Some(Block::Image(_))
        ) {
            return;
        }
        self.checkpoint();
        if let Some(Block::Image(image)) = self.doc.blocks.get_mut(self.selection.block) {
            image.alignment = Some(alignment);
        }
    }

    fn block_margin_left(&self) -> Option<i32> {
        self.current_text_block().map(|block| block.margin_left)
    }

    fn set_block_margin_left(&mut self, margin: i32) {
        self.with_current_text_block(|block| block.margin_left = margin.max(0));
    }

    fn attach_link_metadata(&mut self, key: LinkKey, metadata: LinkMetadata) -> bool {
        let exists = self.doc.blocks.iter().any(|block| {
            matches!(block, Block::Text(text) if text
                .runs
                .iter()
                .any(|run| run.marks.link.as_ref().is_some_and(|l| l.id == key.0)))
        });
        if !exists {
            return false;
        }
        self.link_meta.insert(key.0, metadata);
        true
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn perform_undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(self.snapshot());
        self.restore(snapshot);
        true
    }

    fn perform_redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(self.snapshot());
        self.restore(snapshot);
        true
    }

    fn replace_all_content(&mut self, markup: &str) {
        self.doc = MemoryDocument {
            blocks: parse_block_markup(markup),
        };
        self.selection = MemorySelection::collapsed(0, 0);
        self.link_meta.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_marks = None;
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

/// Split runs at the range boundaries, rewrite the marks of everything fully
/// inside, and merge adjacent equal-mark runs back together.
fn apply_marks_in_range(
    block: &mut TextBlock,
    start: usize,
    end: usize,
    apply: &dyn Fn(&mut Marks),
) {
    let mut out: Vec<Run> = Vec::new();
    let mut cursor = 0usize;

    for run in std::mem::take(&mut block.runs) {
        let run_start = cursor;
        let run_end = cursor + run.text.len();
        cursor = run_end;

        let sel_start = start.clamp(run_start, run_end);
        let sel_end = end.clamp(run_start, run_end);
        if sel_start >= sel_end {
            out.push(run);
            continue;
        }

        let local_start = clamp_to_char_boundary(&run.text, sel_start - run_start);
        let mut local_end = clamp_to_char_boundary(&run.text, sel_end - run_start);
        local_end = local_end.max(local_start);

        let (head, rest) = run.text.split_at(local_start);
        let (mid, tail) = rest.split_at(local_end - local_start);

        if !head.is_empty() {
            out.push(Run {
                text: head.to_string(),
                marks: run.marks.clone(),
            });
        }
        let mut marks = run.marks.clone();
        apply(&mut marks);
        out.push(Run {
            text: mid.to_string(),
            marks,
        });
        if !tail.is_empty() {
            out.push(Run {
                text: tail.to_string(),
                marks: run.marks.clone(),
            });
        }
    }

    block.runs = merge_adjacent_runs(out);
}

fn merge_adjacent_runs(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::new();
    for run in runs {
        if run.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    if merged.is_empty() {
        merged.push(Run {
            text: String::new(),
            marks: Marks::default(),
        });
    }
    merged
}

/// Minimal block-markup reader for `replace_all_content`: a flat sequence of
/// `<p>`, `<h1>`..`<h6>` and `<blockquote>` elements with plain-text bodies.
/// Unknown elements are skipped.
fn parse_block_markup(markup: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut rest = markup;

    while let Some(open_start) = rest.find('<') {
        let after_open = &rest[open_start + 1..];
        let Some(open_end) = after_open.find('>') else {
            break;
        };
        let tag = after_open[..open_end].trim().to_ascii_lowercase();
        let body_start = open_start + 1 + open_end + 1;
        let end_marker = format!("</{tag}>");

        let Some(body_len) = rest[body_start..].find(&end_marker) else {
            rest = &rest[body_start..];
            continue;
        };
        let body = &rest[body_start..body_start + body_len];
        rest = &rest[body_start + body_len + end_marker.len()..];

        if tag == "blockquote" {
            let mut block = TextBlock::with_text(BlockTag::P, body);
            block.quoted = true;
            blocks.push(Block::Text(block));
        } else if let Some(tag) = BlockTag::parse(&tag) {
            blocks.push(Block::Text(TextBlock::with_text(tag, body)));
        }
    }

    if blocks.is_empty() {
        blocks.push(Block::Text(TextBlock::empty(BlockTag::P)));
    }
    blocks
}
