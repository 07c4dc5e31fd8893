//! Variable expansion tests using rstest for parameterization.
//!
//! Every case expands one word against the same set of globals.

use ham_kernel::interpreter::{EvaluationContext, VariableDomain};
use ham_kernel::targets::TargetPool;
use ham_kernel::{Behavior, Compatibility, StringList};
use rstest::rstest;

fn globals() -> VariableDomain {
    let mut globals = VariableDomain::new();
    let mut set = |name: &str, words: &[&str]| globals.set(name, StringList::from(words));
    set("my_list", &["Ham", "is", "super", "fun"]);
    set("X", &["a", "b"]);
    set("Y", &["1", "2"]);
    set("UPPER", &["Foo", "BAR"]);
    set("F", &["src/main.c"]);
    set("LIB", &["lib/libz.a(inflate.o)"]);
    set("EMPTY", &[]);
    set("BLANK", &[""]);
    set("NAME", &["X"]);
    set("NAMES", &["X", "Y"]);
    set("SUFFIX", &[".o"]);
    set("SUFFIXES", &[".o", ".obj"]);
    set("SEP", &[":"]);
    set("QUALIFIED", &["X:U"]);
    set("INDEXES", &["1", "2"]);
    set("RANGE", &["2-3"]);
    globals
}

fn expand(compatibility: Compatibility, text: &str) -> Vec<String> {
    let mut globals = globals();
    let mut targets = TargetPool::new();
    let mut context = EvaluationContext::new(&mut globals, &mut targets);
    context.set_behavior(Behavior::new(compatibility));
    context.expand_string(text).into_iter().collect()
}

// ============================================================================
// Plain references and the product rule
// ============================================================================

#[rstest]
#[case::literal("plain", &["plain"])]
#[case::dollar_without_paren("$X", &["$X"])]
#[case::whole_variable("$(X)", &["a", "b"])]
#[case::prefix_suffix("x$(X)y", &["xay", "xby"])]
#[case::product("$(X)$(Y)", &["a1", "a2", "b1", "b2"])]
#[case::product_with_separator("$(X)-$(Y)", &["a-1", "a-2", "b-1", "b-2"])]
#[case::missing_annihilates("pre$(MISSING)post", &[])]
#[case::empty_annihilates("$(X)$(EMPTY)", &[])]
#[case::blank_element_survives("<$(BLANK)>", &["<>"])]
#[case::unterminated("$(X", &[])]
#[case::empty_name("$()", &[])]
fn expand_references(#[case] text: &str, #[case] expected: &[&str]) {
    assert_eq!(expand(Compatibility::Ham, text), expected);
}

// ============================================================================
// Subscripts
// ============================================================================

#[rstest]
#[case::single("$(my_list[2])", &["is"])]
#[case::range("$(my_list[2-3])", &["is", "super"])]
#[case::open_range("$(my_list[3-])", &["super", "fun"])]
#[case::past_end("$(my_list[9])", &[])]
#[case::range_past_end("$(my_list[3-9])", &["super", "fun"])]
#[case::zero_start("$(my_list[0-1])", &["Ham", "is"])]
#[case::descending("$(my_list[3-2])", &[])]
#[case::bad_subscript("$(my_list[x])", &[])]
#[case::huge_end_from_zero("$(my_list[0-18446744073709551615])", &["Ham", "is", "super", "fun"])]
#[case::huge_end("$(my_list[2-18446744073709551615])", &["is", "super", "fun"])]
#[case::end_beyond_usize("$(my_list[1-99999999999999999999999])", &[])]
#[case::with_modifier("$(my_list[1-2]:U)", &["HAM", "IS"])]
fn expand_subscripts(#[case] text: &str, #[case] expected: &[&str]) {
    assert_eq!(expand(Compatibility::Ham, text), expected);
}

// ============================================================================
// Modifiers
// ============================================================================

#[rstest]
#[case::base("$(F:B)", &["main"])]
#[case::suffix("$(F:S)", &[".c"])]
#[case::directory("$(F:D)", &["src"])]
#[case::base_and_suffix("$(F:BS)", &["main.c"])]
#[case::member("$(LIB:M)", &["(inflate.o)"])]
#[case::replace_suffix("$(F:S=.o)", &["src/main.o"])]
#[case::replace_directory("$(F:D=obj)", &["obj/main.c"])]
#[case::add_grist("$(F:G=src)", &["<src>src/main.c"])]
#[case::root("$(F:R=/top)", &["/top/src/main.c"])]
#[case::parent("$(F:P)", &["src"])]
#[case::select_then_replace("$(F:B:S=.o)", &["main.o"])]
#[case::upper("$(X:U)", &["A", "B"])]
#[case::lower("$(UPPER:L)", &["foo", "bar"])]
#[case::upper_wins("$(UPPER:LU)", &["FOO", "BAR"])]
#[case::join("$(X:J=,)", &["a,b"])]
#[case::join_nothing("$(X:J)", &["ab"])]
#[case::join_empty_list("$(EMPTY:J=,)", &[])]
#[case::empty_replacement("$(EMPTY:E=none)", &["none"])]
#[case::missing_replacement("$(MISSING:E=none)", &["none"])]
#[case::empty_replacement_unused("$(X:E=none)", &["a", "b"])]
#[case::replacement_keeps_colons_in_parens("$(X:S=(x))", &["a(x)", "b(x)"])]
#[case::unknown_letter_ends_segment("$(X:QU)", &["a", "b"])]
fn expand_modifiers(#[case] text: &str, #[case] expected: &[&str]) {
    assert_eq!(expand(Compatibility::Ham, text), expected);
}

// ============================================================================
// Recursive references
// ============================================================================

#[rstest]
#[case::indirect_name("$($(NAME))", &["a", "b"])]
#[case::indirect_names_concatenate("$($(NAMES))", &["a", "b", "1", "2"])]
#[case::indirect_modifier("$(F:S=$(SUFFIX))", &["src/main.o"])]
#[case::indirect_with_literal("<$($(NAME):U)>", &["<A>", "<B>"])]
#[case::expanded_separator_keeps_colon("$(X:J=$(SEP))", &["a:b"])]
#[case::expanded_name_is_taken_literally("$($(QUALIFIED))", &[])]
#[case::subscript_per_index("$(my_list[$(INDEXES)])", &["Ham", "is"])]
#[case::subscript_range_from_variable("$(my_list[$(RANGE)])", &["is", "super"])]
#[case::modifier_per_value("$(F:S=$(SUFFIXES))", &["src/main.o", "src/main.obj"])]
#[case::names_outermost("$($(NAMES)[$(INDEXES)])", &["a", "b", "1", "2"])]
#[case::empty_part_empties_reference("$(X:S=$(EMPTY))", &[])]
fn expand_recursive(#[case] text: &str, #[case] expected: &[&str]) {
    assert_eq!(expand(Compatibility::Ham, text), expected);
}

// ============================================================================
// Compatibility quirks
// ============================================================================

#[rstest]
#[case::ham_partial_join(Compatibility::Ham, "$(my_list[1-3]:J=-)", &["Ham-is-super"])]
#[case::ham_full_join(Compatibility::Ham, "$(my_list[1-4]:J=-)", &["Ham-is-super-fun"])]
#[case::jam_partial_join_is_lost(Compatibility::Jam, "$(my_list[1-3]:J=-)", &[""])]
#[case::jam_full_join(Compatibility::Jam, "$(my_list[1-4]:J=-)", &["Ham-is-super-fun"])]
#[case::jam_open_join(Compatibility::Jam, "$(my_list[2-]:J=-)", &["is-super-fun"])]
#[case::boost_partial_join(Compatibility::BoostJam, "$(my_list[1-3]:J=-)", &["Ham-is-super"])]
#[case::ham_join_then_upper(Compatibility::Ham, "$(X:U:J=,)", &["A,B"])]
#[case::jam_upper_then_join(Compatibility::Jam, "$(X:U:J=,)", &["A,B"])]
#[case::ham_root_no_double_slash(Compatibility::Ham, "$(F:R=/top/)", &["/top/src/main.c"])]
#[case::jam_root_double_slash(Compatibility::Jam, "$(F:R=/top/)", &["/top//src/main.c"])]
fn expand_with_behavior(
    #[case] compatibility: Compatibility,
    #[case] text: &str,
    #[case] expected: &[&str],
) {
    assert_eq!(expand(compatibility, text), expected);
}
