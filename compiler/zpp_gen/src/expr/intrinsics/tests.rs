use super::{split_fmt, Intrinsic};
use pretty_assertions::assert_eq;

#[test]
fn split_fmt_opens_a_hole_at_each_percent() {
    assert_eq!(split_fmt("a % b % c"), vec!["a ", " b ", " c"]);
    assert_eq!(split_fmt("%"), vec!["", ""]);
    assert_eq!(split_fmt("plain"), vec!["plain"]);
}

#[test]
fn split_fmt_keeps_doubled_percent_literal() {
    assert_eq!(split_fmt("100%% of %"), vec!["100% of ", ""]);
    assert_eq!(split_fmt("%%%"), vec!["%", ""]);
}

#[test]
fn intrinsic_names_are_a_closed_set() {
    assert_eq!(Intrinsic::from_name("carr_mut"), Some(Intrinsic::Carr { mutable: true }));
    assert_eq!(
        Intrinsic::from_name("extern_call"),
        Some(Intrinsic::LibCall { external: true })
    );
    assert_eq!(Intrinsic::from_name("fmt"), Some(Intrinsic::Fmt));
    assert_eq!(Intrinsic::from_name("print"), None);
    assert_eq!(Intrinsic::from_name("panic!"), None);
}
