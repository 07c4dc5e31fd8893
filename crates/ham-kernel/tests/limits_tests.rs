//! Recursion limits for rule calls and includes.
//!
//! Evaluation recurses on the host stack, so these run on a thread with a
//! large stack.

use std::fs;
use std::thread;

use ham_kernel::interpreter::{
    EvaluationContext, OutputBuffer, VariableDomain, INCLUDE_DEPTH_LIMIT, RULE_CALL_DEPTH_LIMIT,
};
use ham_kernel::targets::TargetPool;
use ham_kernel::{parse, EvalError};

const STACK_SIZE: usize = 512 * 1024 * 1024;

fn on_big_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(f)
        .expect("spawn test thread")
        .join()
        .expect("test thread panicked")
}

/// Evaluate `source`, returning the error message kind and the length of
/// the global `COUNT`.
fn evaluate_counting(source: String) -> (Result<(), String>, usize) {
    on_big_stack(move || {
        let program = parse(&source).expect("parse failed");
        let mut globals = VariableDomain::new();
        let mut targets = TargetPool::new();
        let result = {
            let mut context = EvaluationContext::new(&mut globals, &mut targets);
            context.set_output(OutputBuffer::new());
            context.evaluate(&program).map(|_| ()).map_err(|err| match err {
                EvalError::RuleCallDepthExceeded { limit, .. } => format!("rule depth {limit}"),
                EvalError::IncludeDepthExceeded { limit, .. } => format!("include depth {limit}"),
                other => other.to_string(),
            })
        };
        let count = globals.lookup("COUNT").map_or(0, |value| value.len());
        (result, count)
    })
}

#[test]
fn unbounded_rule_recursion_stops_at_the_limit() {
    let source = "rule Recurse { COUNT += x ; Recurse ; }\nRecurse ;".to_string();
    let (result, count) = evaluate_counting(source);
    assert_eq!(result, Err(format!("rule depth {RULE_CALL_DEPTH_LIMIT}")));
    assert_eq!(count, RULE_CALL_DEPTH_LIMIT - 1);
}

#[test]
fn bounded_rule_recursion_below_the_limit_succeeds() {
    let list = vec!["n"; 1000].join(" ");
    let source = format!(
        "rule Down N {{ COUNT += x ; if $(N[2]) {{ Down $(N[2-]) ; }} }}\nDown {list} ;"
    );
    let (result, count) = evaluate_counting(source);
    assert_eq!(result, Ok(()));
    assert_eq!(count, 1000);
}

#[test]
fn self_include_stops_at_the_limit() {
    let dir = std::env::temp_dir().join(format!("ham-limits-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("self.jam");
    let path = file.to_string_lossy().into_owned();
    fs::write(&file, format!("COUNT += x ;\ninclude \"{path}\" ;\n")).unwrap();

    let (result, count) = evaluate_counting(format!("include \"{path}\" ;"));
    fs::remove_dir_all(&dir).ok();

    assert_eq!(result, Err(format!("include depth {INCLUDE_DEPTH_LIMIT}")));
    assert_eq!(count, INCLUDE_DEPTH_LIMIT - 1);
}
