use jiwer_core::*;

fn no_measures() -> VisualizeOptions {
    VisualizeOptions {
        show_measures: false,
        ..Default::default()
    }
}

#[test]
fn test_word_insertion() {
    let output = process_words("this is a", "this is a test").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this is a ****\n",
        "HYP: this is a test\n",
        "                  I\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_word_deletion() {
    let output = process_words("this is a test", "this is a").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this is a test\n",
        "HYP: this is a ****\n",
        "                  D\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_word_substitution() {
    let output = process_words("this is a test", "this was a test").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this  is a test\n",
        "HYP: this was a test\n",
        "            S       \n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_word_all_three() {
    let output = process_words("this is a test of skill", "this was a messy test").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this  is a ***** test of skill\n",
        "HYP: this was a messy test ** *****\n",
        "            S       I       D     D\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_word_empty_hypothesis() {
    let output = process_words("empty", "").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: empty\n",
        "HYP: *****\n",
        "         D\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_word_multiple_sentences() {
    let output = process_words(["one", "two"], ["1", "2"]).unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: one\n",
        "HYP:   1\n",
        "       S\n",
        "\n",
        "=== SENTENCE 2 ===\n",
        "\n",
        "REF: two\n",
        "HYP:   2\n",
        "       S\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_word_skip_correct() {
    let output = process_words(
        ["perfect", "one", "two", "three"],
        ["perfect", "1", "2", "three"],
    )
    .unwrap();
    let expected = concat!(
        "=== SENTENCE 2 ===\n",
        "\n",
        "REF: one\n",
        "HYP:   1\n",
        "       S\n",
        "\n",
        "=== SENTENCE 3 ===\n",
        "\n",
        "REF: two\n",
        "HYP:   2\n",
        "       S\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_char_insertion() {
    let output = process_characters("this is a", "this is a test").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this is a*****\n",
        "HYP: this is a test\n",
        "              IIIII\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_char_deletion() {
    let output = process_characters("this is a test", "this is a").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this is a test\n",
        "HYP: this is a*****\n",
        "              DDDDD\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_char_substitution() {
    let output = process_characters("this is a test", "this iz a test").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this is a test\n",
        "HYP: this iz a test\n",
        "           S       \n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_char_all_three() {
    let output = process_characters("this is a test of skill", "this was a messy test").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this *is a tes*t of skill\n",
        "HYP: this was a messy te*st***\n",
        "          IS    S  IS SSD SDDD\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_char_empty_hypothesis() {
    let output = process_characters("empty", "").unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: empty\n",
        "HYP: *****\n",
        "     DDDDD\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_char_multiple_sentences() {
    let output = process_characters(["one", "two"], ["1", "2"]).unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: one\n",
        "HYP: 1**\n",
        "     SDD\n",
        "\n",
        "=== SENTENCE 2 ===\n",
        "\n",
        "REF: two\n",
        "HYP: 2**\n",
        "     SDD\n",
    );
    assert_eq!(visualize_alignment(&output, &no_measures()), expected);
}

#[test]
fn test_word_show_measures() {
    let output = process_words(
        "this test will  have a high word error rate",
        "no it will not",
    )
    .unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this test will have a high word error rate\n",
        "HYP:   no   it will  not * **** **** ***** ****\n",
        "        S    S         S D    D    D     D    D\n",
        "\n",
        "=== SUMMARY ===\n",
        "number of sentences: 1\n",
        "substitutions=3 deletions=5 insertions=0 hits=1\n",
        "\n",
        "mer=88.89%\n",
        "wil=97.22%\n",
        "wip=2.78%\n",
        "wer=88.89%\n",
    );
    assert_eq!(visualize_alignment(&output, &VisualizeOptions::default()), expected);
}

#[test]
fn test_char_show_measures() {
    let output = process_characters(
        "this test will  have a high word error rate",
        "no it will not",
    )
    .unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: this test will  have a high word error rate\n",
        "HYP: no** i**t will n*************o***********t*\n",
        "     SSDD SDD       SDDDDDDDDDDDDD DDDDDDDDDDD D\n",
        "\n",
        "=== SUMMARY ===\n",
        "number of sentences: 1\n",
        "substitutions=4 deletions=29 insertions=0 hits=10\n",
        "\n",
        "cer=76.74%\n",
    );
    assert_eq!(visualize_alignment(&output, &VisualizeOptions::default()), expected);
}

#[test]
fn test_multiple_sentences_with_summary() {
    let output = process_words(
        ["short one here", "quite a bit of longer sentence"],
        ["shoe order one", "quite bit of an even longest sentence here"],
    )
    .unwrap();
    let expected = concat!(
        "=== SENTENCE 1 ===\n",
        "\n",
        "REF: **** short one here\n",
        "HYP: shoe order one ****\n",
        "        I     S        D\n",
        "\n",
        "=== SENTENCE 2 ===\n",
        "\n",
        "REF: quite a bit of ** ****  longer sentence ****\n",
        "HYP: quite * bit of an even longest sentence here\n",
        "           D         I    I       S             I\n",
        "\n",
        "=== SUMMARY ===\n",
        "number of sentences: 2\n",
        "substitutions=2 deletions=2 insertions=4 hits=5\n",
        "\n",
        "mer=61.54%\n",
        "wil=74.75%\n",
        "wip=25.25%\n",
        "wer=88.89%\n",
    );
    assert_eq!(visualize_alignment(&output, &VisualizeOptions::default()), expected);
}

const ERROR_REFERENCE: [&str; 8] = ["sub", "sub", "sub", "sub", "sub", "this was", "del", "hit"];
const ERROR_HYPOTHESIS: [&str; 8] = ["bus", "bus", "bus", "usb", "bsu", "this was ins", "", "hit"];

#[test]
fn test_count_word_errors() {
    let output = process_words(ERROR_REFERENCE, ERROR_HYPOTHESIS).unwrap();
    let expected = concat!(
        "=== SUBSTITUTIONS ===\n",
        "sub --> bus = 3x\n",
        "sub --> usb = 1x\n",
        "sub --> bsu = 1x\n",
        "\n",
        "=== INSERTIONS ===\n",
        "ins = 1x\n",
        "\n",
        "=== DELETIONS ===\n",
        "del = 1x",
    );
    assert_eq!(visualize_error_counts(&output, &ErrorCountOptions::default()), expected);
}

#[test]
fn test_count_char_errors() {
    let output = process_characters(ERROR_REFERENCE, ERROR_HYPOTHESIS).unwrap();
    let expected = concat!(
        "=== SUBSTITUTIONS ===\n",
        "s --> b = 3x\n",
        "b --> s = 3x\n",
        "\n",
        "=== INSERTIONS ===\n",
        "u    = 1x\n",
        "b    = 1x\n",
        " ins = 1x\n",
        "\n",
        "=== DELETIONS ===\n",
        "u   = 1x\n",
        "b   = 1x\n",
        "del = 1x",
    );
    assert_eq!(visualize_error_counts(&output, &ErrorCountOptions::default()), expected);
}

#[test]
fn test_count_errors_top_k() {
    let output = process_words(ERROR_REFERENCE, ERROR_HYPOTHESIS).unwrap();
    let options = ErrorCountOptions {
        top_k: Some(1),
        ..Default::default()
    };
    let expected = concat!(
        "=== SUBSTITUTIONS ===\n",
        "sub --> bus = 3x\n",
        "\n",
        "=== INSERTIONS ===\n",
        "ins = 1x\n",
        "\n",
        "=== DELETIONS ===\n",
        "del = 1x",
    );
    assert_eq!(visualize_error_counts(&output, &options), expected);
}

#[test]
fn test_count_errors_selective_sections() {
    let output = process_words(ERROR_REFERENCE, ERROR_HYPOTHESIS).unwrap();
    let render = |s: bool, i: bool, d: bool| {
        visualize_error_counts(
            &output,
            &ErrorCountOptions {
                show_substitutions: s,
                show_insertions: i,
                show_deletions: d,
                top_k: None,
            },
        )
    };

    let (sub, ins, del) = (
        "=== SUBSTITUTIONS ===",
        "=== INSERTIONS ===",
        "=== DELETIONS ===",
    );

    let no_sub = render(false, true, true);
    assert!(!no_sub.contains(sub) && no_sub.contains(ins) && no_sub.contains(del));
    let no_ins = render(true, false, true);
    assert!(no_ins.contains(sub) && !no_ins.contains(ins) && no_ins.contains(del));
    let no_del = render(true, true, false);
    assert!(no_del.contains(sub) && no_del.contains(ins) && !no_del.contains(del));
}

#[test]
fn test_collect_error_counts() {
    let output = process_words(ERROR_REFERENCE, ERROR_HYPOTHESIS).unwrap();
    let counts = collect_error_counts(&output);

    assert_eq!(
        counts
            .substitutions
            .get(&("sub".to_string(), "bus".to_string())),
        3
    );
    assert_eq!(counts.insertions.get(&"ins".to_string()), 1);
    assert_eq!(counts.deletions.get(&"del".to_string()), 1);
    assert_eq!(counts.substitutions.len(), 3);
}
