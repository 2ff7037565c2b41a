use richtext_core::{Block, BlockTag, EditorCore, HostSurface, MemoryHost};

fn core_with_selected_text(text: &str) -> EditorCore<MemoryHost> {
    let mut host = MemoryHost::new();
    host.replace_all_content(&format!("<p>{text}</p>"));
    host.select(0, 0, text.len());
    EditorCore::new(host)
}

#[test]
fn format_block_sets_the_heading_pseudo_state() {
    let mut core = core_with_selected_text("title");

    let outcome = core.dispatch("formatBlock", Some("h2")).unwrap();
    assert!(outcome.active.contains("h2"));
    assert_eq!(core.host().current_block_tag(), Some(BlockTag::H2));

    let outcome = core.dispatch("formatBlock", Some("p")).unwrap();
    assert!(!outcome.active.contains("h2"));
    assert_eq!(core.host().current_block_tag(), Some(BlockTag::P));
}

#[test]
fn blockquote_membership_toggles() {
    let mut core = core_with_selected_text("quote me");

    let outcome = core.dispatch("formatBlock", Some("blockquote")).unwrap();
    assert!(outcome.active.contains("blockquote"));
    assert!(core.host().selection_context().in_block_quote);

    let outcome = core.dispatch("formatBlock", Some("blockquote")).unwrap();
    assert!(!outcome.active.contains("blockquote"));
}

#[test]
fn quoted_heading_reports_both_states() {
    let mut core = core_with_selected_text("title");
    core.dispatch("formatBlock", Some("h3")).unwrap();

    let outcome = core.dispatch("formatBlock", Some("blockquote")).unwrap();
    assert!(outcome.active.contains("blockquote"));
    assert!(outcome.active.contains("h3"));
}

#[test]
fn invalid_format_block_value_is_rejected() {
    let mut core = core_with_selected_text("hello");
    let doc_before = core.host().doc().clone();

    let outcome = core.dispatch("formatBlock", Some("div")).unwrap();

    assert_eq!(core.host().doc(), &doc_before);
    assert!(!outcome.history.can_undo);
}

#[test]
fn reapplying_the_current_block_tag_records_no_history() {
    let mut core = core_with_selected_text("title");
    core.dispatch("formatBlock", Some("h2")).unwrap();
    let history_before = core.refresh_history();

    let outcome = core.dispatch("formatBlock", Some("h2")).unwrap();

    assert!(outcome.active.contains("h2"));
    assert_eq!(outcome.history, history_before);
}

#[test]
fn list_toggle_switches_between_kinds() {
    let mut core = core_with_selected_text("item");

    let outcome = core.dispatch("insertOrderedList", None).unwrap();
    assert!(outcome.active.contains("insertOrderedList"));

    let outcome = core.dispatch("insertUnorderedList", None).unwrap();
    assert!(outcome.active.contains("insertUnorderedList"));
    assert!(!outcome.active.contains("insertOrderedList"));

    let outcome = core.dispatch("insertUnorderedList", None).unwrap();
    assert!(!outcome.active.contains("insertUnorderedList"));

    let Block::Text(block) = &core.host().doc().blocks[0] else {
        panic!("expected text block");
    };
    assert!(block.list.is_none());
}
