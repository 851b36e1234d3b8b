use std::io;

use spindle_utils::strings::*;

#[test]
fn join() {
    let cases: [(&str, &[&str]); 6] = [
        ("", &[]),
        ("AAA", &["AAA"]),
        ("AAA, BBB", &["AAA", "BBB"]),
        ("AAA, BBB, CCC", &["AAA", "BBB", "CCC"]),
        ("AAA, BBB, CCC, DDD", &["AAA", "BBB", "CCC", "DDD"]),
        ("AAA, BBB, CCC, DDD, EEE", &["AAA", "BBB", "CCC", "DDD", "EEE"]),
    ];

    for (expected, args) in cases {
        assert_eq!(str_join(", ", args), expected);
    }
}

#[test]
fn join_without_separator() {
    let args = vec![String::from("ab"), String::from("cd"), String::from("ef")];
    assert_eq!(str_join("", &args), "abcdef");
}

#[test]
fn join_ex() {
    const SEP: [&str; 3] = [": ", ", ", ", and "];

    let cases: [(&str, &[&str]); 6] = [
        ("", &[]),
        ("AAA", &["AAA"]),
        ("AAA: BBB", &["AAA", "BBB"]),
        ("AAA: BBB, and CCC", &["AAA", "BBB", "CCC"]),
        ("AAA: BBB, CCC, and DDD", &["AAA", "BBB", "CCC", "DDD"]),
        ("AAA: BBB, CCC, DDD, and EEE", &["AAA", "BBB", "CCC", "DDD", "EEE"]),
    ];

    for (expected, args) in cases {
        assert_eq!(str_join_ex(SEP, args), expected);
    }
}

#[test]
fn runes() -> io::Result<()> {
    let mut out = Vec::new();
    for ch in ['a', 'ß', '€', '🦀'] {
        write_rune(&mut out, ch)?;
    }

    assert_eq!(out, "aß€🦀".as_bytes());
    assert_eq!(out.len(), 1 + 2 + 3 + 4);

    Ok(())
}
