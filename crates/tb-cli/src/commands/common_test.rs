use super::*;

#[test]
fn column_width_uses_header_as_minimum() {
    assert_eq!(column_width("NAME", ["ab", "c"]), 4);
    assert_eq!(column_width("ID", ["longer cell"]), 11);
    assert_eq!(column_width("EMPTY", std::iter::empty()), 5);
}

#[test]
fn truncate_keeps_short_text() {
    assert_eq!(truncate("reel", 10), "reel");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
}

#[test]
fn truncate_marks_cut() {
    assert_eq!(truncate("a very long note", 10), "a very ...");
}
