use declcall_compiler::{Compilation, EvaluationContext};

fn main() {
    println!("=== Declcall Resolution Example ===\n");

    // Example 1: Free function overloads
    println!("Example 1: Free function overloads");
    println!("{}", "-".repeat(50));

    let source = r#"
int f(int);
int f(double);
"#;

    let compilation = Compilation::builder()
        .add_source("decls.cpp", source)
        .build();

    if compilation.has_errors() {
        println!("Compilation failed!");
        compilation.diagnostics().emit().unwrap();
        return;
    }

    for operand in ["f(1)", "f(1.5)"] {
        match compilation.resolve_operand(operand, EvaluationContext::ConstantExpression) {
            Ok(target) => println!(
                "  declcall({}) : {}",
                operand,
                target.ty.display(compilation.program())
            ),
            Err(diagnosis) => println!("  declcall({}) rejected: {:?}", operand, diagnosis),
        }
    }

    println!();

    // Example 2: Devirtualization through a qualified access
    println!("Example 2: Qualified member access");
    println!("{}", "-".repeat(50));

    let source = r#"
class B { virtual int f(int); };
class D : B { int f(int); };
D d;
"#;

    let compilation = Compilation::builder()
        .add_source("hierarchy.cpp", source)
        .build();

    for operand in ["d.f(1)", "d.B::f(1)"] {
        match compilation.resolve_operand(operand, EvaluationContext::ConstantExpression) {
            Ok(target) => {
                let devirtualized = target
                    .pointer
                    .as_ref()
                    .is_some_and(|p| p.is_devirtualized());
                println!(
                    "  declcall({}) : {}{}",
                    operand,
                    target.ty.display(compilation.program()),
                    if devirtualized { " (devirtualized)" } else { "" }
                );
            }
            Err(diagnosis) => println!("  declcall({}) rejected: {:?}", operand, diagnosis),
        }
    }
}
