use keysmash::engine::layout::{
    LayoutConfig, LayoutResult, SessionLayout, Viewport, compute_layout,
};
use keysmash::engine::width::str_width;
use keysmash::engine::wrap::wrap;
use keysmash::session::input::{KeyInput, process_key};
use keysmash::session::state::SessionState;

const SAMPLES: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Supercalifragilisticexpialidocious and pneumonoultramicroscopicsilicovolcanoconiosis are long words.",
    "混合テキスト with 日本語 and English words side by side",
    "line one\n\nline three after a blank\n",
    "tabs\tand   runs   of    spaces",
];

fn full(state: &SessionState, width: u16, height: u16) -> Option<SessionLayout> {
    match compute_layout(state, Viewport::new(width, height), &LayoutConfig::default()) {
        LayoutResult::Full(layout) => Some(layout),
        LayoutResult::Degraded(_) => None,
    }
}

fn typed(text: &str, count: usize) -> SessionState {
    let mut state = SessionState::new(text, "sample.txt").unwrap();
    for ch in text.chars().take(count) {
        let key = if ch == '\n' {
            KeyInput::Newline
        } else {
            KeyInput::Character(ch)
        };
        process_key(&mut state, key);
    }
    state
}

#[test]
fn wrapped_lines_fit_every_budget() {
    for text in SAMPLES {
        for width in 2..50 {
            for line in wrap(text, width) {
                assert!(
                    str_width(&line) <= width,
                    "{line:?} wider than {width} for {text:?}"
                );
            }
        }
    }
}

#[test]
fn wrap_edge_cases() {
    assert!(wrap("", 10).is_empty());
    assert_eq!(wrap("\n", 10), vec!["", ""]);
    assert_eq!(wrap("a", 10), vec!["a"]);
}

#[test]
fn every_viewport_either_lays_out_or_degrades() {
    let state = typed(SAMPLES[0], 10);
    for width in 0..130 {
        for height in 0..50 {
            let result = compute_layout(&state, Viewport::new(width, height), &LayoutConfig::default());
            let expect_full = width >= 40 && height >= 15;
            assert_eq!(!result.is_degraded(), expect_full, "{width}x{height}");
        }
    }
}

#[test]
fn cursor_stays_on_screen_while_typing() {
    let text = SAMPLES.join(" ").repeat(4);
    for (width, height) in [(40, 15), (60, 18), (100, 30)] {
        for count in (0..text.chars().count()).step_by(17) {
            let state = typed(&text, count);
            if state.is_finished() {
                break;
            }
            let layout = full(&state, width, height).unwrap();
            let (x, y) = layout
                .cursor_cell()
                .unwrap_or_else(|| panic!("cursor hidden at {count} chars, {width}x{height}"));
            assert!(x < width);
            assert!(y >= layout.rows.input_start);
            assert!(y < layout.rows.input_start + layout.rows.input_rows);
        }
    }
}

#[test]
fn visible_lines_respect_region_heights() {
    let text = SAMPLES.join("\n").repeat(3);
    let state = typed(&text, text.chars().count() / 2);
    for height in 15..40 {
        let layout = full(&state, 50, height).unwrap();
        assert!(layout.reference.visible().len() <= usize::from(layout.rows.reference_rows));
        assert!(layout.input.visible().len() <= usize::from(layout.rows.input_rows));
        assert_eq!(layout.reference.classes.len(), layout.reference.visible().len());
        for line in layout.reference.lines.iter().chain(&layout.input.lines) {
            assert!(line.width() <= usize::from(layout.content_width));
        }
    }
}

#[test]
fn layout_is_a_pure_function_of_inputs() {
    let state = typed(SAMPLES[1], 40);
    let a = full(&state, 72, 20).unwrap();
    let _ = full(&state, 40, 15).unwrap();
    let b = full(&state, 72, 20).unwrap();
    assert_eq!(a, b);
}
