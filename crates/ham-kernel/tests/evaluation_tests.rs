//! End-to-end evaluation tests: Jam source in, output and variables out.

use ham_kernel::interpreter::{EvaluationContext, JumpCondition, OutputBuffer, VariableDomain};
use ham_kernel::targets::{TargetFlags, TargetPool};
use ham_kernel::{parse, Behavior, Compatibility, EvalError, StringList};
use rstest::rstest;

/// Everything a test wants to inspect after one evaluation.
struct Run {
    result: Result<StringList, EvalError>,
    output: String,
    errors: String,
    condition: JumpCondition,
    globals: VariableDomain,
    targets: TargetPool,
}

impl Run {
    fn global(&self, name: &str) -> Option<Vec<&str>> {
        self.globals
            .lookup(name)
            .map(|value| value.iter().map(String::as_str).collect())
    }
}

fn run_with(compatibility: Compatibility, source: &str) -> Run {
    let program = parse(source).expect("parse failed");
    let mut globals = VariableDomain::new();
    let mut targets = TargetPool::new();
    let output = OutputBuffer::new();
    let errors = OutputBuffer::new();
    let (result, condition) = {
        let mut context = EvaluationContext::new(&mut globals, &mut targets);
        context.set_behavior(Behavior::new(compatibility));
        context.set_output(output.clone());
        context.set_error_output(errors.clone());
        let result = context.evaluate(&program);
        (result, context.jump_condition())
    };
    Run {
        result,
        output: output.contents(),
        errors: errors.contents(),
        condition,
        globals,
        targets,
    }
}

fn run(source: &str) -> Run {
    run_with(Compatibility::Ham, source)
}

fn output_of(source: &str) -> String {
    let run = run(source);
    if let Err(err) = &run.result {
        panic!("evaluation failed: {err}");
    }
    run.output
}

// ============================================================================
// Echo and the trailing-space quirk
// ============================================================================

#[rstest]
#[case::ham(Compatibility::Ham, "a b\n")]
#[case::boost(Compatibility::BoostJam, "a b\n")]
#[case::jam(Compatibility::Jam, "a b \n")]
fn echo_trailing_space(#[case] compatibility: Compatibility, #[case] expected: &str) {
    let run = run_with(compatibility, "Echo a b ;");
    assert_eq!(run.output, expected);
}

#[test]
fn echo_aliases() {
    assert_eq!(output_of("ECHO x ; echo y ; Echo z ;"), "x\ny\nz\n");
}

// ============================================================================
// Assignments
// ============================================================================

#[test]
fn assignment_operators() {
    let run = run("A = 1 ; A += 2 3 ; B ?= x ; B ?= y ; C default = z ; D E = same ;");
    assert_eq!(run.global("A"), Some(vec!["1", "2", "3"]));
    assert_eq!(run.global("B"), Some(vec!["x"]));
    assert_eq!(run.global("C"), Some(vec!["z"]));
    assert_eq!(run.global("D"), Some(vec!["same"]));
    assert_eq!(run.global("E"), Some(vec!["same"]));
}

#[test]
fn assignment_names_are_expanded() {
    let run = run("WHICH = LEFT RIGHT ; $(WHICH) = value ; X_$(WHICH) = suffixed ;");
    assert_eq!(run.global("LEFT"), Some(vec!["value"]));
    assert_eq!(run.global("RIGHT"), Some(vec!["value"]));
    assert_eq!(run.global("X_LEFT"), Some(vec!["suffixed"]));
}

#[test]
fn on_target_assignment() {
    let run = run("CFLAGS on a.o b.o = -O2 ; CFLAGS on a.o += -g ; CFLAGS on b.o ?= ignored ;");
    assert_eq!(run.global("CFLAGS"), None);
    let flags = |name: &str| -> Vec<String> {
        run.targets
            .by_name(name)
            .and_then(|target| target.variables())
            .and_then(|vars| vars.lookup("CFLAGS"))
            .map(|value| value.iter().cloned().collect())
            .unwrap_or_default()
    };
    assert_eq!(flags("a.o"), vec!["-O2", "-g"]);
    assert_eq!(flags("b.o"), vec!["-O2"]);
}

#[test]
fn on_target_default_checks_presence_not_emptiness() {
    let run = run("V on t = ; V on t ?= filled ; W = [ on t return $(V:E=empty) ] ;");
    assert_eq!(run.global("W"), Some(vec!["empty"]));
}

// ============================================================================
// Conditions
// ============================================================================

#[rstest]
#[case::equal("a = a", true)]
#[case::not_equal_lists("$(PAIR) = a", false)]
#[case::trailing_empty_ignored("$(TRAILING) = a", true)]
#[case::not_equal("a != b", true)]
#[case::less("a < b", true)]
#[case::less_equal("b <= b", true)]
#[case::greater("b > a", true)]
#[case::greater_equal("a >= b", false)]
#[case::and("a && b", true)]
#[case::and_empty("a && $(NOTHING)", false)]
#[case::or("$(NOTHING) || b", true)]
#[case::not("! $(NOTHING)", true)]
#[case::not_truthy("! a", false)]
#[case::in_list_all("a in a b c", true)]
#[case::parenthesized("( a = b ) || ( c = c )", true)]
#[case::empty_string("\"\"", false)]
fn conditions(#[case] condition: &str, #[case] expected: bool) {
    let source = format!(
        "PAIR = a b ; TRAILING = a \"\" ;\nif {condition} {{ R = yes ; }} else {{ R = no ; }}"
    );
    let run = run(&source);
    let expected = if expected { "yes" } else { "no" };
    assert_eq!(run.global("R"), Some(vec![expected]), "condition: {condition}");
}

#[test]
fn in_list_is_a_subset_test() {
    let run = run(
        "L = a b ; R = a b c ; if $(L) in $(R) { Echo yes ; }\n\
         L = a d ; if $(L) in $(R) { Echo no ; } else { Echo subset-only ; }",
    );
    assert_eq!(run.output, "yes\nsubset-only\n");
}

#[test]
fn and_or_evaluate_both_sides() {
    let output = output_of(
        "rule Say X { Echo $(X) ; return $(X) ; }\n\
         if [ Say left ] || [ Say right ] { }\n\
         if $(NOTHING) && [ Say evaluated ] { }",
    );
    assert_eq!(output, "left\nright\nevaluated\n");
}

// ============================================================================
// Scopes
// ============================================================================

#[test]
fn nested_block_locals_do_not_leak() {
    let run = run(
        "X = outer ;\n\
         { local X = inner ; Echo $(X) ; { local X = innermost ; Echo $(X) ; } Echo $(X) ; }\n\
         Echo $(X) ;",
    );
    assert_eq!(run.output, "inner\ninnermost\ninner\nouter\n");
    assert_eq!(run.global("X"), Some(vec!["outer"]));
}

#[test]
fn assignment_to_declared_local_stays_local() {
    let run = run("X = global ; { local X ; X = changed ; Echo $(X) ; } Echo $(X) ;");
    assert_eq!(run.output, "changed\nglobal\n");
}

#[test]
fn assignment_without_local_writes_globals() {
    let run = run("{ { Y = deep ; } } Echo $(Y) ;");
    assert_eq!(run.output, "deep\n");
}

#[test]
fn rule_sees_caller_locals() {
    let output = output_of(
        "rule Peek { Echo $(SECRET:E=hidden) ; }\n\
         Peek ; { local SECRET = visible ; Peek ; }",
    );
    assert_eq!(output, "hidden\nvisible\n");
}

// ============================================================================
// Rules
// ============================================================================

#[test]
fn rule_returns_concatenated_parameters() {
    let run = run("rule Foo X : Y { return $(X) $(Y) ; }\nR = [ Foo a : b c ] ;");
    assert_eq!(run.global("R"), Some(vec!["a", "b", "c"]));
}

#[test]
fn rule_numbered_parameters() {
    let output = output_of(
        "rule Show { Echo $(1) / $(2) / $(<) / $(>) / $(3:E=none) ; }\n\
         Show one : two ;",
    );
    assert_eq!(output, "one / two / one / two / none\n");
}

#[test]
fn rule_value_is_last_statement() {
    let run = run("rule Last { X = ignored ; Y = kept ; }\nR = [ Last ] ;");
    assert_eq!(run.global("R"), Some(vec!["kept"]));
}

#[test]
fn rule_redefinition_replaces_body() {
    let output = output_of("rule R { Echo first ; }\nR ; rule R { Echo second ; }\nR ;");
    assert_eq!(output, "first\nsecond\n");
}

#[test]
fn dynamic_rule_names_call_each_rule() {
    let output = output_of(
        "rule A { Echo in-a ; return a ; }\n\
         rule B { Echo in-b ; return b ; }\n\
         NAMES = A B ; R = [ $(NAMES) ] ; Echo $(R) ;",
    );
    assert_eq!(output, "in-a\nin-b\na b\n");
}

#[test]
fn arguments_are_evaluated_before_the_rule_name() {
    let output = output_of(
        "rule Name { Echo name ; return Echo ; }\n\
         rule Arg { Echo arg ; return value ; }\n\
         [ Name ] [ Arg ] ;",
    );
    assert_eq!(output, "arg\nname\nvalue\n");
}

#[test]
fn unknown_rule_is_a_warning() {
    let run = run("Missing a b ; Echo still-running ;");
    assert!(run.result.is_ok());
    assert_eq!(run.errors, "warning: unknown rule Missing\n");
    assert_eq!(run.output, "still-running\n");
}

#[test]
fn actions_register_calls_on_targets() {
    let run = run(
        "actions together Link bind NEEDLIBS { ld -o $(<) $(>) $(NEEDLIBS) }\n\
         rule Link { Depends $(<) : $(>) ; }\n\
         Link app : main.o util.o ;",
    );
    let app = run.targets.by_name("app").unwrap();
    assert_eq!(app.actions_calls().len(), 1);
    let actions = app.actions_calls()[0].actions();
    assert_eq!(actions.actions(), " ld -o $(<) $(>) $(NEEDLIBS) ");
    assert_eq!(actions.variables(), &StringList::from(vec!["NEEDLIBS"]));
    assert_eq!(app.dependencies().len(), 2);
}

// ============================================================================
// Loops and jumps
// ============================================================================

#[test]
fn for_loop_variable_persists() {
    let run = run("for f in a b c { LAST = $(f) ; } ");
    assert_eq!(run.global("f"), Some(vec!["c"]));
    assert_eq!(run.global("LAST"), Some(vec!["c"]));
}

#[test]
fn for_loop_uses_existing_local() {
    let run = run("{ local f = keep ; for f in a b { } Echo $(f) ; } Echo $(f:E=unset) ;");
    assert_eq!(run.output, "b\nunset\n");
}

#[test]
fn break_stops_loop_and_clears() {
    let run = run("for x in 1 2 3 { if $(x) = 2 { break ; } Echo $(x) ; } Echo after ;");
    assert_eq!(run.output, "1\nafter\n");
    assert_eq!(run.condition, JumpCondition::None);
}

#[test]
fn while_with_break() {
    let run = run("X = go ; while $(X) { Echo loop ; break ; } Echo done ;");
    assert_eq!(run.output, "loop\ndone\n");
}

#[test]
fn return_leaves_loops_and_stops_at_rule() {
    let run = run(
        "rule Find X { for e in a b c { if $(e) = $(X) { return found-$(e) ; } } return none ; }\n\
         R = [ Find b ] ; Echo after ;",
    );
    assert_eq!(run.global("R"), Some(vec!["found-b"]));
    assert_eq!(run.output, "after\n");
    assert_eq!(run.condition, JumpCondition::None);
}

#[test]
fn exit_stops_everything() {
    let run = run(
        "rule Stop { Exit bye ; Echo unreachable ; }\n\
         for x in a b { while x { Stop ; } } Echo unreachable ;",
    );
    assert!(run.result.is_ok());
    assert_eq!(run.output, "bye\n");
    assert_eq!(run.condition, JumpCondition::Exit);
}

#[test]
fn switch_matches_first_element_only() {
    let output = output_of(
        "switch lib.a main.c { case *.c : Echo c ; case *.a : Echo archive ; case * : Echo other ; }\n\
         switch nothing { case x : Echo x ; }\n\
         switch main.c { case main.? : Echo single ; }",
    );
    assert_eq!(output, "archive\nsingle\n");
}

// ============================================================================
// Built-ins through the language
// ============================================================================

#[test]
fn target_flag_rules() {
    let run = run("NotFile all clean ; ALWAYS clean ; NoCare optional.h ; Temporary x.o ; LEAVES l ; NoUpdate dir ;");
    let flags = |name: &str| run.targets.by_name(name).unwrap().flags();
    assert!(flags("all").contains(TargetFlags::NOT_A_FILE));
    assert!(flags("clean").contains(TargetFlags::NOT_A_FILE | TargetFlags::BUILD_ALWAYS));
    assert!(flags("optional.h").contains(TargetFlags::IGNORE_IF_MISSING));
    assert!(flags("x.o").contains(TargetFlags::TEMPORARY));
    assert!(flags("l").contains(TargetFlags::DEPENDS_ON_LEAVES));
    assert!(flags("dir").contains(TargetFlags::DONT_UPDATE));
}

#[test]
fn match_rule_in_source() {
    let run = run(r"PARTS = [ Match ^(.*)\\.(.*)$ : archive.tar ] ;");
    assert_eq!(run.global("PARTS"), Some(vec!["archive", "tar"]));
}
