// Integration tests for the editor core.
//
// These drive the public `Editor` API through realistic editing and
// scrolling sessions and check the document, viewport and caret against
// each other after every step.

use gridpad_core::{
    Axis, Direction, Document, Editor, EditorError, EditorOptions, GridSize, GridSurface,
    LayoutMode, Motion,
};

fn editor(text: &str, columns: usize, rows: usize, mode: LayoutMode) -> Editor {
    let doc = Document::from_bytes(text.as_bytes()).unwrap();
    Editor::new(
        doc,
        EditorOptions {
            window: GridSize::new(columns, rows),
            mode,
            ..EditorOptions::default()
        },
    )
}

fn text(editor: &Editor) -> String {
    String::from_utf8(editor.document().to_bytes()).unwrap()
}

fn frame(editor: &Editor) -> Vec<String> {
    let window = editor.viewport().window();
    let mut grid = GridSurface::new(window.columns, window.rows);
    editor.render(&mut grid);
    grid.lines()
}

/// Small deterministic generator so edit sequences are reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

// ── Ranges ─────────────────────────────────────────────────────────────

#[test]
fn test_empty_document_fixed_80x24_has_no_range() {
    let ed = Editor::new(Document::new(), EditorOptions::default());
    assert_eq!(ed.viewport().vertical().max_pos, 0);
    assert_eq!(ed.viewport().horizontal().max_pos, 0);
    ed.assert_invariants();
}

#[test]
fn test_long_line_wraps_into_four_rows() {
    let ed = editor(&"x".repeat(245), 80, 24, LayoutMode::Wrap);
    assert_eq!(ed.viewport().wrap_model().unwrap().total_rows(), 4);
    ed.assert_invariants();
}

#[test]
fn test_total_rows_is_sum_of_line_rows() {
    let lines = ["", "a", &"b".repeat(9), &"c".repeat(8), &"d".repeat(17)];
    let ed = editor(&lines.join("\n"), 9, 5, LayoutMode::Wrap);
    // Wrap width 8: 1 + 1 + 2 + 1 + 3
    assert_eq!(ed.viewport().wrap_model().unwrap().total_rows(), 8);
}

// ── Scrolling ──────────────────────────────────────────────────────────

#[test]
fn test_scroll_past_end_is_clamped() {
    let lines: Vec<String> = (0..40).map(|i| format!("row {i}")).collect();
    let mut ed = editor(&lines.join("\n"), 20, 10, LayoutMode::Fixed);
    assert_eq!(ed.scroll(25, Direction::Down).unwrap(), 25);
    assert_eq!(ed.scroll(25, Direction::Down).unwrap(), 5);
    assert_eq!(ed.viewport().vertical().pos, 30);
    assert_eq!(frame(&ed)[0], "row 30");
    assert_eq!(ed.scroll(100, Direction::Up).unwrap(), 30);
    ed.assert_invariants();
}

#[test]
fn test_zero_scroll_and_same_mode_are_no_ops() {
    let mut ed = editor("alpha\nbeta\ngamma\ndelta", 10, 2, LayoutMode::Wrap);
    ed.scroll(1, Direction::Down).unwrap();
    let anchor = ed.viewport().anchor();
    let vertical = ed.viewport().vertical();
    let caret = ed.caret().unwrap().clone();

    assert_eq!(ed.scroll(0, Direction::Up).unwrap(), 0);
    assert_eq!(ed.scroll(0, Direction::Down).unwrap(), 0);
    assert!(!ed.switch_mode(LayoutMode::Wrap));

    assert_eq!(ed.viewport().anchor(), anchor);
    assert_eq!(ed.viewport().vertical(), vertical);
    assert_eq!(ed.caret().unwrap(), &caret);
}

#[test]
fn test_horizontal_scroll_rejected_in_wrap() {
    let mut ed = editor("abc", 10, 2, LayoutMode::Wrap);
    assert_eq!(
        ed.scroll_to(Axis::Horizontal, 1).unwrap_err(),
        EditorError::InvalidMode {
            operation: "horizontal scroll",
            mode: LayoutMode::Wrap,
        }
    );
}

// ── Editing ────────────────────────────────────────────────────────────

#[test]
fn test_insert_in_span_middle_and_delete_restores() {
    let mut ed = editor("abcde", 20, 5, LayoutMode::Fixed);
    for _ in 0..3 {
        ed.navigate(Motion::Right);
    }
    ed.insert_char(b'!').unwrap();
    let first = ed.document().chain().first();
    let lens: Vec<usize> = ed
        .document()
        .line(first)
        .spans()
        .iter()
        .map(|s| s.len)
        .collect();
    assert_eq!(lens, vec![3, 1, 2]);

    ed.navigate(Motion::Left);
    ed.delete_char().unwrap();
    assert_eq!(text(&ed), "abcde");
    ed.assert_invariants();
}

#[test]
fn test_delete_line_break_after_empty_line() {
    let mut ed = editor("first\n\nsecond\nthird\nfourth", 10, 2, LayoutMode::Wrap);
    ed.navigate(Motion::Down);
    ed.scroll(1, Direction::Down).unwrap();
    let removed = ed.viewport().anchor().line;
    let second = ed.document().chain().nth(2).unwrap();

    ed.delete_forward().unwrap();

    assert!(!ed.document().chain().contains(removed));
    assert_eq!(ed.viewport().anchor().line, second);
    assert_eq!(ed.caret().unwrap().position().line, second);
    assert_eq!(ed.caret().unwrap().position().offset, 0);
    assert_eq!(frame(&ed), vec!["second", "third"]);
    ed.assert_invariants();
}

#[test]
fn test_typed_text_round_trips() {
    let mut ed = Editor::new(Document::new(), EditorOptions::default());
    let input = "The quick brown fox\njumps over\n\nthe lazy dog.";
    ed.type_text(input.as_bytes()).unwrap();
    assert_eq!(text(&ed), input);
    ed.assert_invariants();
}

#[test]
fn test_store_limit_reports_out_of_memory() {
    let doc = Document::with_store_limit(4);
    let mut ed = Editor::new(doc, EditorOptions::default());
    let err = ed.type_text(b"hello").unwrap_err();
    assert!(matches!(err, EditorError::OutOfMemory { .. }));
    assert_eq!(text(&ed), "hell");
    assert_eq!(ed.caret().unwrap().position().offset, 4);
    ed.assert_invariants();
}

// ── Mixed sessions ─────────────────────────────────────────────────────

fn random_session(mode: LayoutMode, seed: u64) {
    let mut rng = XorShift(seed);
    let mut ed = editor("seed line\n\nanother", 7, 4, mode);
    let mut shadow: Vec<Vec<u8>> = vec![b"seed line".to_vec(), Vec::new(), b"another".to_vec()];

    for _ in 0..600 {
        match rng.below(12) {
            0..=3 => {
                let byte = b'a' + rng.below(26) as u8;
                let pos = ed.caret().unwrap().position();
                shadow[pos.index].insert(pos.offset, byte);
                ed.insert_char(byte).unwrap();
            }
            4 => {
                let pos = ed.caret().unwrap().position();
                let tail = shadow[pos.index].split_off(pos.offset);
                shadow.insert(pos.index + 1, tail);
                ed.insert_line_break().unwrap();
            }
            5 | 6 => {
                let pos = ed.caret().unwrap().position();
                if pos.offset < shadow[pos.index].len() {
                    shadow[pos.index].remove(pos.offset);
                } else if pos.index + 1 < shadow.len() {
                    let next = shadow.remove(pos.index + 1);
                    shadow[pos.index].extend(next);
                }
                ed.delete_forward().unwrap();
            }
            7 => {
                let motion = [
                    Motion::Left,
                    Motion::Right,
                    Motion::Up,
                    Motion::Down,
                    Motion::Home,
                    Motion::End,
                    Motion::PageUp,
                    Motion::PageDown,
                ][rng.below(8) as usize];
                ed.navigate(motion);
            }
            8 => {
                let direction = if rng.below(2) == 0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                ed.scroll(rng.below(5) as usize, direction).unwrap();
            }
            9 => {
                ed.resize(GridSize::new(
                    3 + rng.below(10) as usize,
                    1 + rng.below(6) as usize,
                ));
            }
            10 => {
                let mode = if ed.mode() == LayoutMode::Fixed {
                    LayoutMode::Wrap
                } else {
                    LayoutMode::Fixed
                };
                ed.switch_mode(mode);
            }
            _ => {
                let pos = ed.caret().unwrap().position();
                if pos.index > 0 || pos.offset > 0 {
                    ed.navigate(Motion::Left);
                    let pos = ed.caret().unwrap().position();
                    if pos.offset < shadow[pos.index].len() {
                        shadow[pos.index].remove(pos.offset);
                    } else {
                        let next = shadow.remove(pos.index + 1);
                        shadow[pos.index].extend(next);
                    }
                    ed.delete_forward().unwrap();
                }
            }
        }
        ed.assert_invariants();
        let pos = ed.caret().unwrap().position();
        assert!(pos.offset <= ed.document().line(pos.line).char_count());
    }

    assert_eq!(ed.document().to_bytes(), shadow.join(&b'\n'));
}

#[test]
fn test_random_session_fixed() {
    random_session(LayoutMode::Fixed, 0x9E37_79B9_7F4A_7C15);
}

#[test]
fn test_random_session_wrap() {
    random_session(LayoutMode::Wrap, 0xD1B5_4A32_D192_ED03);
}

#[test]
fn test_random_session_other_seed() {
    random_session(LayoutMode::Fixed, 42);
}
