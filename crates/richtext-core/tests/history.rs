use richtext_core::{EditorCore, HistoryAvailability, HostSurface, MemoryHost};

fn core_with_selected_text(text: &str) -> EditorCore<MemoryHost> {
    let mut host = MemoryHost::new();
    host.replace_all_content(&format!("<p>{text}</p>"));
    host.select(0, 0, text.len());
    EditorCore::new(host)
}

#[test]
fn fresh_load_has_no_history() {
    let core = EditorCore::new(MemoryHost::new());
    assert_eq!(core.refresh_history(), HistoryAvailability::default());
}

#[test]
fn first_dispatch_enables_undo_only() {
    let mut core = core_with_selected_text("hello");
    let outcome = core.dispatch("bold", None).unwrap();
    assert_eq!(
        outcome.history,
        HistoryAvailability {
            can_undo: true,
            can_redo: false,
        }
    );
}

#[test]
fn undo_redo_cycle_through_the_gate() {
    let mut core = core_with_selected_text("hello");
    core.dispatch("bold", None).unwrap();

    let outcome = core.request_undo();
    assert_eq!(
        outcome.history,
        HistoryAvailability {
            can_undo: false,
            can_redo: true,
        }
    );
    assert!(!outcome.active.contains("bold"));

    let outcome = core.request_redo();
    assert_eq!(
        outcome.history,
        HistoryAvailability {
            can_undo: true,
            can_redo: false,
        }
    );
    assert!(outcome.active.contains("bold"));
}

#[test]
fn history_commands_dispatch_through_the_catalog() {
    let mut core = core_with_selected_text("hello");
    core.dispatch("bold", None).unwrap();

    let outcome = core.dispatch("undo", None).unwrap();
    assert!(!outcome.history.can_undo);
    assert!(outcome.history.can_redo);

    let outcome = core.dispatch("redo", None).unwrap();
    assert!(outcome.history.can_undo);
    assert!(!outcome.history.can_redo);
}

#[test]
fn a_new_edit_clears_redo() {
    let mut core = core_with_selected_text("hello");
    core.dispatch("bold", None).unwrap();
    core.request_undo();

    let outcome = core.dispatch("italic", None).unwrap();
    assert!(outcome.history.can_undo);
    assert!(!outcome.history.can_redo);
}
