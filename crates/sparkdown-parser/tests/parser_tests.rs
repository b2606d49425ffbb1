//! Integration tests for the Sparkdown parser.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use sparkdown_dom::{DomTree, ElementKind, NodeId};
use sparkdown_parser::{
    IssueKind, ParseOutput, ParseState, Parser, ParserConfig, ReaderSource, StrSource, Terminating,
    TokenKind, TokenRules, parse_str, parse_str_with, to_html,
};

/// Helper to render a subtree as `tag[child, child]`, text as a quoted string
fn shape(tree: &DomTree, id: NodeId) -> String {
    if let Some(text) = tree.as_text(id) {
        return format!("{text:?}");
    }
    let name = tree
        .kind(id)
        .and_then(ElementKind::tag_name)
        .unwrap_or("document");
    let children: Vec<String> = tree
        .children(id)
        .iter()
        .map(|&child| shape(tree, child))
        .collect();
    if children.is_empty() {
        name.to_string()
    } else {
        format!("{name}[{}]", children.join(", "))
    }
}

/// Helper to parse and return the shape of the whole document
fn parse_shape(input: &str) -> String {
    let output = parse_str(input);
    shape(&output.tree, NodeId::ROOT)
}

/// Helper to list issue kinds in order
fn issue_kinds(output: &ParseOutput) -> Vec<IssueKind> {
    output.issues.iter().map(|issue| issue.kind).collect()
}

// ========== Documented examples ==========

#[test]
fn test_heading() {
    let output = parse_str("# Title\n");
    assert_eq!(shape(&output.tree, NodeId::ROOT), "document[h1[\"Title\"]]");

    let h1 = output.tree.find_first(NodeId::ROOT, ElementKind::Heading1).unwrap();
    assert_eq!(output.tree.text_content(h1), "Title");
    assert!(output.tree.is_sealed(h1));
    assert!(output.issues.is_empty());
    assert!(output.unclosed.is_empty());
}

#[test]
fn test_strong_then_text() {
    let output = parse_str("**bold** text");
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[p[strong[\"bold\"], \" text\"]]"
    );
    let strong = output.tree.find_first(NodeId::ROOT, ElementKind::Strong).unwrap();
    assert!(output.tree.is_sealed(strong));
}

#[test]
fn test_rule_is_void() {
    let output = parse_str("---\n");
    assert_eq!(shape(&output.tree, NodeId::ROOT), "document[hr]");
    let hr = output.tree.find_first(NodeId::ROOT, ElementKind::Rule).unwrap();
    assert!(output.tree.children(hr).is_empty());
    assert!(output.tree.is_sealed(hr));
}

#[test]
fn test_unterminated_emphasis_stays_open() {
    let output = parse_str("*oops");
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[p[em[\"oops\"]]]"
    );

    let p = output.tree.find_first(NodeId::ROOT, ElementKind::Paragraph).unwrap();
    let em = output.tree.find_first(NodeId::ROOT, ElementKind::Emphasis).unwrap();
    assert!(!output.tree.is_sealed(em));
    assert!(output.tree.is_sealed(NodeId::ROOT));
    assert_eq!(output.unclosed, vec![p, em]);
    assert_eq!(
        issue_kinds(&output),
        vec![IssueKind::PrematureEndOfInput, IssueKind::PrematureEndOfInput]
    );
}

#[test]
fn test_emphasis_closes_before_paragraph() {
    let output = parse_str("*em* and then\n\n");
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[p[em[\"em\"], \" and then\"]]"
    );
    let p = output.tree.find_first(NodeId::ROOT, ElementKind::Paragraph).unwrap();
    let em = output.tree.find_first(NodeId::ROOT, ElementKind::Emphasis).unwrap();
    assert_eq!(output.tree.seal_order(), &[em, p, NodeId::ROOT]);
    assert!(output.issues.is_empty());
}

#[test]
fn test_blank_line_closes_open_emphasis() {
    let output = parse_str("*em and then\n\n");
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[p[em[\"em and then\"]]]"
    );
    let p = output.tree.find_first(NodeId::ROOT, ElementKind::Paragraph).unwrap();
    let em = output.tree.find_first(NodeId::ROOT, ElementKind::Emphasis).unwrap();
    assert_eq!(output.tree.seal_order(), &[em, p, NodeId::ROOT]);
    assert!(output.unclosed.is_empty());
}

// ========== Literal fallback ==========

#[test]
fn test_heading_too_deep_is_text() {
    let output = parse_str("###### x");
    assert_eq!(shape(&output.tree, NodeId::ROOT), "document[p[\"###### x\"]]");
    assert_eq!(output.issues[0].kind, IssueKind::UnrecognizedTrigger);
}

#[test]
fn test_runaway_run_is_text() {
    let output = parse_str("#######");
    assert_eq!(shape(&output.tree, NodeId::ROOT), "document[p[\"#######\"]]");
    assert_eq!(output.issues[0].kind, IssueKind::RunawayRun);
}

#[test]
fn test_wider_window_accepts_longer_runs() {
    let config = ParserConfig::default().with_window_capacity(10).unwrap();
    let output = parse_str_with("#######", &config);
    assert_eq!(shape(&output.tree, NodeId::ROOT), "document[p[\"#######\"]]");
    assert_eq!(output.issues[0].kind, IssueKind::UnrecognizedTrigger);
}

#[test]
fn test_spaced_star_is_text() {
    let output = parse_str("a * b");
    assert_eq!(shape(&output.tree, NodeId::ROOT), "document[p[\"a * b\"]]");
    assert_eq!(output.issues[0].kind, IssueKind::MisplacedMarkup);
    assert_eq!(output.issues[0].offset, 2);
}

#[test]
fn test_heading_mid_line_is_text() {
    let output = parse_str("x # y");
    assert_eq!(shape(&output.tree, NodeId::ROOT), "document[p[\"x # y\"]]");
    assert_eq!(output.issues[0].kind, IssueKind::MisplacedMarkup);
}

#[test]
fn test_leading_spaced_star_implies_paragraph() {
    assert_eq!(parse_shape("* item"), "document[p[\"* item\"]]");
}

// ========== Block structure ==========

#[test]
fn test_heading_closes_paragraph() {
    assert_eq!(
        parse_shape("text\n# Title"),
        "document[p[\"text\\n\"], h1[\"Title\"]]"
    );
}

#[test]
fn test_rule_closes_paragraph() {
    assert_eq!(parse_shape("para\n---\n"), "document[p[\"para\\n\"], hr]");
}

#[test]
fn test_star_rule() {
    assert_eq!(parse_shape("***\n"), "document[hr]");
}

#[test]
fn test_paragraphs() {
    assert_eq!(
        parse_shape("para one\n\npara two\n"),
        "document[p[\"para one\"], p[\"para two\\n\"]]"
    );
}

#[test]
fn test_heading_then_paragraph() {
    assert_eq!(
        parse_shape("# Title\n\nSome **bold** text."),
        "document[h1[\"Title\"], p[\"Some \", strong[\"bold\"], \" text.\"]]"
    );
}

#[test]
fn test_line_end_closes_heading_and_inline() {
    assert_eq!(
        parse_shape("# Heading with *em\nNext"),
        "document[h1[\"Heading with \", em[\"em\"]], p[\"Next\"]]"
    );
}

#[test]
fn test_line_break() {
    assert_eq!(
        parse_shape("line\\\nnext"),
        "document[p[\"line\", br, \"\\nnext\"]]"
    );
}

#[test]
fn test_line_break_still_ends_heading() {
    let output = parse_str("# a\\\nb");
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[h1[\"a\", br], p[\"b\"]]"
    );
    assert_eq!(issue_kinds(&output), vec![IssueKind::PrematureEndOfInput]);
    assert_eq!(output.unclosed.len(), 1);
}

#[test]
fn test_line_break_before_blank_line_splits_paragraph() {
    assert_eq!(
        parse_shape("a\\\n\nb"),
        "document[p[\"a\", br], p[\"b\"]]"
    );
}

#[test]
fn test_many_blank_lines_close_heading() {
    let output = parse_str("# Title\n\n\n\n\n\n\n\nBody");
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[h1[\"Title\"], p[\"Body\"]]"
    );
    assert_eq!(issue_kinds(&output), vec![IssueKind::PrematureEndOfInput]);
}

#[test]
fn test_many_blank_lines_split_paragraphs() {
    let output = parse_str("one\n\n\n\n\n\n\n\n\n\n\ntwo");
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[p[\"one\"], p[\"two\"]]"
    );
    assert!(!issue_kinds(&output).contains(&IssueKind::RunawayRun));
}

#[test]
fn test_whitespace_only_line_is_a_soft_break() {
    assert_eq!(parse_shape("one\n \ntwo"), "document[p[\"one\\n \\ntwo\"]]");
}

#[test]
fn test_crlf_input_matches_reader_source() {
    assert_eq!(
        parse_shape("# T\r\nbody"),
        "document[h1[\"T\"], p[\"body\"]]"
    );
}

#[test]
fn test_heading_deeper_than_h5_from_custom_rules_is_text() {
    let mut builder = TokenRules::builder();
    for level in 1..=6 {
        builder = builder.consuming('#', Terminating::Exact(' '), level, TokenKind::Heading(level));
    }
    let config = ParserConfig::new(6, builder.build()).unwrap();
    let output = parse_str_with("###### deep", &config);
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[p[\"###### deep\"]]"
    );
    assert_eq!(output.issues[0].kind, IssueKind::MisplacedMarkup);
}

// ========== Inline structure ==========

#[test]
fn test_underscore_variants() {
    assert_eq!(
        parse_shape("__a__ and _b_"),
        "document[p[strong[\"a\"], \" and \", em[\"b\"]]]"
    );
}

#[test]
fn test_nested_inline() {
    assert_eq!(
        parse_shape("**a *b* c**"),
        "document[p[strong[\"a \", em[\"b\"], \" c\"]]]"
    );
}

#[test]
fn test_mismatched_run_does_not_close() {
    assert_eq!(
        parse_shape("**a __b__ c**"),
        "document[p[strong[\"a \", strong[\"b\"], \" c\"]]]"
    );
}

// ========== Edge cases ==========

#[test]
fn test_empty_input() {
    let output = parse_str("");
    assert!(output.tree.children(NodeId::ROOT).is_empty());
    assert_eq!(output.tree.seal_order(), &[NodeId::ROOT]);
    assert!(output.issues.is_empty());
    assert_eq!(to_html(&output.tree), "");
}

#[test]
fn test_whitespace_only_input() {
    assert_eq!(parse_shape("   \n\n  "), "document");
}

#[test]
fn test_reader_source() {
    let config = ParserConfig::default();
    let output = Parser::new(ReaderSource::new("# T\r\nbody".as_bytes()), &config)
        .run()
        .unwrap();
    assert_eq!(
        shape(&output.tree, NodeId::ROOT),
        "document[h1[\"T\"], p[\"body\"]]"
    );
}

#[test]
fn test_parse_states() {
    let config = ParserConfig::default();
    let mut parser = Parser::new(StrSource::new("ab"), &config);
    assert_eq!(parser.state(), ParseState::Scanning);

    let mut states = Vec::new();
    loop {
        let state = parser.step().unwrap();
        states.push(state);
        if state == ParseState::Done {
            break;
        }
    }
    assert_eq!(
        states,
        vec![
            ParseState::Scanning,
            ParseState::Scanning,
            ParseState::Draining,
            ParseState::Done
        ]
    );
    assert_eq!(shape(parser.tree(), NodeId::ROOT), "document[p[\"ab\"]]");
}

#[test]
fn test_issues_are_in_input_order() {
    let output = parse_str("a - b *c");
    let offsets: Vec<usize> = output.issues.iter().map(|issue| issue.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
    assert_eq!(
        issue_kinds(&output),
        vec![
            IssueKind::UnrecognizedTrigger,
            IssueKind::PrematureEndOfInput,
            IssueKind::PrematureEndOfInput
        ]
    );
}

#[test]
fn test_independent_parses() {
    let first = parse_str("*open");
    let second = parse_str("plain");
    assert_eq!(first.unclosed.len(), 2);
    assert_eq!(shape(&second.tree, NodeId::ROOT), "document[p[\"plain\"]]");
}

// ========== Properties ==========

#[quickcheck]
fn prop_parse_yields_single_rooted_tree(input: String) -> bool {
    let tree = parse_str(&input).tree;
    tree.kind(NodeId::ROOT) == Some(ElementKind::Document)
        && tree.parent(NodeId::ROOT).is_none()
        && (1..tree.len()).all(|i| tree.parent(NodeId(i)).is_some())
}

#[quickcheck]
fn prop_no_adjacent_text_siblings(input: String) -> bool {
    let tree = parse_str(&input).tree;
    (0..tree.len()).all(|i| {
        tree.children(NodeId(i))
            .windows(2)
            .all(|pair| tree.as_text(pair[0]).is_none() || tree.as_text(pair[1]).is_none())
    })
}

#[quickcheck]
fn prop_plain_words_become_one_paragraph(input: String) -> TestResult {
    if input.is_empty() || !input.chars().all(char::is_alphanumeric) {
        return TestResult::discard();
    }
    let output = parse_str(&input);
    TestResult::from_bool(to_html(&output.tree) == format!("<p>{input}</p>"))
}
