use richtext_core::{DispatchError, EditorCore, HostSurface, Marks, MemoryHost, Run};

fn core_with_selected_text(text: &str) -> EditorCore<MemoryHost> {
    let mut host = MemoryHost::new();
    host.replace_all_content(&format!("<p>{text}</p>"));
    host.select(0, 0, text.len());
    EditorCore::new(host)
}

#[test]
fn inline_style_dispatch_reports_active() {
    for name in [
        "bold",
        "italic",
        "underline",
        "strikeThrough",
        "superscript",
        "subscript",
    ] {
        let mut core = core_with_selected_text("hello");
        let outcome = core.dispatch(name, None).unwrap();
        assert!(outcome.active.contains(name), "{name} should be active");
    }
}

#[test]
fn alignment_and_list_dispatch_reports_active() {
    for name in [
        "justifyCenter",
        "justifyRight",
        "insertOrderedList",
        "insertUnorderedList",
    ] {
        let mut core = core_with_selected_text("hello");
        let outcome = core.dispatch(name, None).unwrap();
        assert!(outcome.active.contains(name), "{name} should be active");
    }
}

#[test]
fn toggling_twice_clears_inline_state() {
    let mut core = core_with_selected_text("hello");
    core.dispatch("bold", None).unwrap();
    let outcome = core.dispatch("bold", None).unwrap();
    assert!(!outcome.active.contains("bold"));
}

#[test]
fn unknown_command_is_an_error_and_leaves_state_alone() {
    let mut core = core_with_selected_text("hello");
    let doc_before = core.host().doc().clone();
    let active_before = core.active_states();

    let err = core.dispatch("blink", None).unwrap_err();
    assert_eq!(err, DispatchError::UnknownCommand("blink".to_string()));

    assert_eq!(core.host().doc(), &doc_before);
    assert_eq!(core.active_states(), active_before);
    assert!(!core.refresh_history().can_undo);
}

#[test]
fn value_required_command_without_value_is_a_no_op() {
    let mut core = core_with_selected_text("hello");
    let doc_before = core.host().doc().clone();

    let outcome = core.dispatch("foreColor", None).unwrap();
    assert_eq!(core.host().doc(), &doc_before);
    assert!(!outcome.history.can_undo);

    let outcome = core.dispatch("foreColor", Some("   ")).unwrap();
    assert_eq!(core.host().doc(), &doc_before);
    assert!(!outcome.history.can_undo);
}

#[test]
fn clear_format_strips_inline_styles() {
    let mut core = core_with_selected_text("hello");
    core.dispatch("bold", None).unwrap();
    core.dispatch("foreColor", Some("#ff0000")).unwrap();

    let outcome = core.dispatch("clearFormat", None).unwrap();
    assert!(!outcome.active.contains("bold"));

    let richtext_core::Block::Text(block) = &core.host().doc().blocks[0] else {
        panic!("expected text block");
    };
    assert_eq!(
        block.runs,
        vec![Run {
            text: "hello".to_string(),
            marks: Marks::default(),
        }]
    );
}

#[test]
fn dispatch_refocuses_the_surface() {
    let mut core = core_with_selected_text("hello");
    assert!(!core.host().is_focused());
    core.dispatch("bold", None).unwrap();
    assert!(core.host().is_focused());
}
