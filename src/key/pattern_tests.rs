//! Tests for key pattern compilation and matching.

use super::pattern::*;

fn matches(pattern: &str, path: &str) -> bool {
    Pattern::compile(pattern).unwrap().matches(path)
}

mod wildcards {
    use super::*;

    #[test]
    fn literal_matches_whole_path_only() {
        assert!(matches("Net.host.power", "Net.host.power"));
        assert!(!matches("Net.host.power", "Net.host.powerful"));
        assert!(!matches("host.power", "Net.host.power"));
    }

    #[test]
    fn star_stays_within_one_segment() {
        assert!(matches("*.host.power", "Net.host.power"));
        assert!(!matches("*.power", "Net.host.power"));
    }

    #[test]
    fn star_matches_partial_segment() {
        assert!(matches("Net.ho*.power", "Net.host.power"));
        assert!(matches("Net.host*.power", "Net.host.power"));
    }

    #[test]
    fn star_spans_index_text() {
        assert!(matches("Net.*.power", "Net.node[4].power"));
    }

    #[test]
    fn double_star_crosses_segments() {
        assert!(matches("**.power", "Net.host.radio.power"));
        assert!(matches("Net.**", "Net.a.b.c"));
        assert!(!matches("**.power", "Net.host.gain"));
    }

    #[test]
    fn question_mark_matches_one_non_dot_char() {
        assert!(matches("Net.h?st.power", "Net.host.power"));
        assert!(!matches("Net?host.power", "Net.host.power"));
    }

    #[test]
    fn escape_makes_metacharacter_literal() {
        assert!(matches(r"Net.a\*b", "Net.a*b"));
        assert!(!matches(r"Net.a\*b", "Net.axb"));
    }

    #[test]
    fn many_stars_do_not_blow_up() {
        let pattern = "*a*a*a*a*a*a*a*a*a*a*a*b";
        let path = "a".repeat(60);
        assert!(!matches(pattern, &path));
    }
}

mod indices {
    use super::*;

    #[test]
    fn any_index_matches_concrete_index() {
        assert!(matches("Net.node[*].power", "Net.node[12].power"));
    }

    #[test]
    fn any_index_matches_wildcard_index() {
        assert!(matches("Net.node[*].power", "Net.node[*].power"));
    }

    #[test]
    fn single_index() {
        assert!(matches("Net.node[3].power", "Net.node[3].power"));
        assert!(!matches("Net.node[3].power", "Net.node[4].power"));
    }

    #[test]
    fn closed_range_is_inclusive() {
        assert!(matches("Net.node[1..5].power", "Net.node[1].power"));
        assert!(matches("Net.node[1..5].power", "Net.node[5].power"));
        assert!(!matches("Net.node[1..5].power", "Net.node[6].power"));
    }

    #[test]
    fn open_ranges() {
        assert!(matches("Net.node[6..].power", "Net.node[600].power"));
        assert!(!matches("Net.node[6..].power", "Net.node[5].power"));
        assert!(matches("Net.node[..2].power", "Net.node[0].power"));
    }

    #[test]
    fn index_list() {
        assert!(matches("Net.node[0,3..4].power", "Net.node[4].power"));
        assert!(!matches("Net.node[0,3..4].power", "Net.node[2].power"));
    }

    #[test]
    fn concrete_index_partially_matches_wildcard_path() {
        assert!(matches("Net.node[3].power", "Net.node[*].power"));
        assert!(matches("Net.node[1..5].power", "Net.node[*].power"));
    }

    #[test]
    fn index_requires_brackets_in_path() {
        assert!(!matches("Net.node[*].power", "Net.node.power"));
        assert!(!matches("Net.node[1].power", "Net.node[x].power"));
    }
}

mod braces {
    use super::*;

    #[test]
    fn choice_matches_any_alternative() {
        assert!(matches("Net.{client,server}.port", "Net.server.port"));
        assert!(!matches("Net.{client,server}.port", "Net.router.port"));
    }

    #[test]
    fn numeric_range_in_name() {
        assert!(matches("Net.host{1..3}.power", "Net.host2.power"));
        assert!(!matches("Net.host{1..3}.power", "Net.host4.power"));
        assert!(!matches("Net.host{1..3}.power", "Net.host.power"));
    }

    #[test]
    fn numeric_range_backtracks_over_digits() {
        assert!(matches("Net.host{1..3}0", "Net.host20"));
    }
}

mod malformed {
    use super::*;

    #[test]
    fn unclosed_bracket() {
        assert_eq!(
            Pattern::compile("a.b[3.c"),
            Err(PatternError::Unclosed {
                opener: '[',
                offset: 3
            })
        );
    }

    #[test]
    fn unclosed_brace() {
        assert!(matches!(
            Pattern::compile("a.{x,y"),
            Err(PatternError::Unclosed { opener: '{', .. })
        ));
    }

    #[test]
    fn empty_group() {
        assert!(matches!(
            Pattern::compile("a.b[].c"),
            Err(PatternError::EmptyGroup { opener: '[', .. })
        ));
    }

    #[test]
    fn non_numeric_bound() {
        assert!(matches!(
            Pattern::compile("a.b[1..x].c"),
            Err(PatternError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn dangling_escape() {
        assert_eq!(Pattern::compile("a.b\\"), Err(PatternError::DanglingEscape));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let error = Pattern::compile("a[").unwrap_err();
        assert_eq!(error.to_string(), "Unclosed '[' at offset 1");
    }
}
