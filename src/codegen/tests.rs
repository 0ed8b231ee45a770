//! Unit tests for the code generator.
//!
//! This module contains tests for:
//! - The scratch-register allocator (LIFO identity, exhaustion, double free)
//! - Label allocation
//! - Emitted instruction shapes for expressions, calls, and control flow
//! - Frame layout determinism

use crate::ast::decls::Decl;
use crate::ast::expressions::{BinaryOp, Expr};
use crate::ast::statements::Stmt;
use crate::ast::types::{Param, Type};
use crate::errors::errors::CodegenError;
use crate::resolver::resolver::resolve;

use super::codegen::generate;
use super::scratch::{Labels, Scratch};

fn generate_program(mut program: Vec<Decl>) -> Result<String, CodegenError> {
    let mut symbols = resolve(&mut program).unwrap();
    generate(&program, &mut symbols)
}

#[test]
fn test_scratch_allocates_lowest_free_register() {
    let mut scratch = Scratch::new();

    let a = scratch.alloc().unwrap();
    let b = scratch.alloc().unwrap();
    assert_eq!(a.name(), "%rbx");
    assert_eq!(b.name(), "%r10");

    scratch.free(a);
    let c = scratch.alloc().unwrap();
    assert_eq!(c.name(), "%rbx");
}

#[test]
fn test_scratch_lifo_discipline_reproduces_identities() {
    let mut scratch = Scratch::new();

    let first: Vec<_> = (0..7).map(|_| scratch.alloc().unwrap()).collect();
    for reg in first.iter().rev() {
        scratch.free(*reg);
    }

    let second: Vec<_> = (0..7).map(|_| scratch.alloc().unwrap()).collect();
    assert_eq!(first, second);
    assert!(!scratch.is_empty());
}

#[test]
fn test_scratch_exhaustion_is_fatal() {
    let mut scratch = Scratch::new();

    for _ in 0..7 {
        scratch.alloc().unwrap();
    }

    assert!(matches!(
        scratch.alloc(),
        Err(CodegenError::RegisterPoolExhausted)
    ));
}

#[test]
fn test_scratch_double_free_is_not_fatal() {
    let mut scratch = Scratch::new();

    let reg = scratch.alloc().unwrap();
    scratch.free(reg);
    // Logged as an anomaly; the pool state does not change.
    scratch.free(reg);
    assert!(scratch.is_empty());
}

#[test]
fn test_labels_are_monotone_and_unique() {
    let mut labels = Labels::new();

    let a = labels.create();
    let b = labels.create();
    let c = labels.create();

    assert_eq!(a.to_string(), ".L0");
    assert_eq!(b.to_string(), ".L1");
    assert_eq!(c.to_string(), ".L2");
}

#[test]
fn test_subtract_consumes_one_operand_register() {
    // f: function integer (a: integer, b: integer) = { return a - b; }
    let params = vec![
        Param::new("a", Type::Integer),
        Param::new("b", Type::Integer),
    ];
    let body = vec![Stmt::Return(Some(Expr::binary(
        BinaryOp::Sub,
        Expr::name("a"),
        Expr::name("b"),
    )))];
    let program =
        vec![Decl::new("f", Type::function(Type::Integer, params)).with_code(body)];

    let asm = generate_program(program).unwrap();

    // Operands load into the first two scratch registers, the subtract
    // combines them into the left one, and the result moves to %rax.
    assert!(asm.contains("subq %r10, %rbx"));
    assert!(asm.contains("movq %rbx, %rax"));
}

#[test]
fn test_function_frame_and_epilogue_shape() {
    let body = vec![
        Stmt::Decl(Box::new(
            Decl::new("x", Type::Integer).with_value(Expr::IntegerLiteral(1)),
        )),
        Stmt::Return(Some(Expr::name("x"))),
    ];
    let program = vec![Decl::new(
        "f",
        Type::function(Type::Integer, vec![Param::new("a", Type::Integer)]),
    )
    .with_code(body)];

    let asm = generate_program(program).unwrap();

    assert!(asm.contains(".global f"));
    assert!(asm.contains("f:"));
    assert!(asm.contains("pushq %rbp"));
    assert!(asm.contains("movq %rsp, %rbp"));
    // One parameter plus one local: 16 bytes reserved.
    assert!(asm.contains("subq $16, %rsp"));
    // The parameter lands in its frame slot from %rdi.
    assert!(asm.contains("movq %rdi, -8(%rbp)"));
    assert!(asm.contains(".f_epilogue:"));
    assert!(asm.contains("jmp .f_epilogue"));
    assert!(asm.trim_end().ends_with("ret"));
}

#[test]
fn test_frame_offsets_are_deterministic() {
    let make_program = || {
        vec![Decl::new("f", Type::function(Type::Void, vec![])).with_code(vec![
            Stmt::Decl(Box::new(
                Decl::new("x", Type::Integer).with_value(Expr::IntegerLiteral(1)),
            )),
            Stmt::Decl(Box::new(
                Decl::new("y", Type::Integer).with_value(Expr::IntegerLiteral(2)),
            )),
        ])]
    };

    let first = generate_program(make_program()).unwrap();
    let second = generate_program(make_program()).unwrap();

    assert_eq!(first, second);
    assert!(first.contains("movq %rbx, -8(%rbp)"));
    assert!(first.contains("movq %rbx, -16(%rbp)"));
}

#[test]
fn test_division_marshalls_through_fixed_registers() {
    let body = vec![Stmt::Return(Some(Expr::binary(
        BinaryOp::Div,
        Expr::name("a"),
        Expr::name("b"),
    )))];
    let params = vec![
        Param::new("a", Type::Integer),
        Param::new("b", Type::Integer),
    ];
    let program =
        vec![Decl::new("f", Type::function(Type::Integer, params)).with_code(body)];

    let asm = generate_program(program).unwrap();

    assert!(asm.contains("movq $0, %rdx"));
    assert!(asm.contains("movq %rbx, %rax"));
    assert!(asm.contains("idivq %r10"));
}

#[test]
fn test_call_saves_and_restores_in_reverse_order() {
    let proto = Decl::new(
        "g",
        Type::function(Type::Integer, vec![Param::new("a", Type::Integer)]),
    );
    let body = vec![Stmt::Return(Some(Expr::Call {
        callee: Box::new(Expr::name("g")),
        arguments: vec![Expr::IntegerLiteral(2)],
    }))];
    let caller = Decl::new("f", Type::function(Type::Integer, vec![])).with_code(body);

    let asm = generate_program(vec![proto, caller]).unwrap();

    let first_push = asm.find("pushq %rcx").unwrap();
    let last_pop = asm.rfind("popq %rcx").unwrap();
    let call = asm.find("call g").unwrap();
    assert!(first_push < call && call < last_pop);

    // The first-pushed register is the last popped.
    let lines: Vec<&str> = asm.lines().map(str::trim).collect();
    let pushes: Vec<&str> = lines
        .iter()
        .filter(|l| l.starts_with("pushq") && **l != "pushq %rbp")
        .copied()
        .collect();
    let pops: Vec<&str> = lines
        .iter()
        .filter(|l| l.starts_with("popq") && **l != "popq %rbp")
        .copied()
        .collect();
    let reversed: Vec<String> = pops
        .iter()
        .rev()
        .map(|l| l.replace("popq", "pushq"))
        .collect();
    assert_eq!(pushes, reversed);

    // The argument lands in %rdi and the return value is collected from
    // %rax after the restores.
    assert!(asm.contains("movq %rbx, %rdi"));
    let collect = asm.find("movq %rax, %rbx").unwrap();
    assert!(collect > last_pop);
}

#[test]
fn test_too_many_call_arguments_is_fatal() {
    let params: Vec<Param> = (0..7)
        .map(|i| Param::new(format!("p{}", i), Type::Integer))
        .collect();
    let proto = Decl::new("g", Type::function(Type::Integer, params));
    let arguments: Vec<Expr> = (0..7).map(Expr::IntegerLiteral).collect();
    let body = vec![Stmt::Return(Some(Expr::Call {
        callee: Box::new(Expr::name("g")),
        arguments,
    }))];
    let caller = Decl::new("f", Type::function(Type::Integer, vec![])).with_code(body);

    assert!(matches!(
        generate_program(vec![proto, caller]),
        Err(CodegenError::TooManyArguments { .. })
    ));
}

#[test]
fn test_if_else_lowering_uses_labels() {
    let body = vec![Stmt::If {
        condition: Expr::BooleanLiteral(true),
        body: Box::new(Stmt::Return(Some(Expr::IntegerLiteral(1)))),
        else_body: Some(Box::new(Stmt::Return(Some(Expr::IntegerLiteral(2))))),
    }];
    let program = vec![Decl::new("f", Type::function(Type::Integer, vec![])).with_code(body)];

    let asm = generate_program(program).unwrap();

    assert!(asm.contains("cmpq $0, %rbx"));
    assert!(asm.contains("je .L1"));
    assert!(asm.contains("jmp .L0"));
    assert!(asm.contains(".L0:"));
    assert!(asm.contains(".L1:"));
}

#[test]
fn test_for_loop_lowering() {
    // f: function void () = { i: integer; for (i = 0; i < 3; i++) { } }
    let body = vec![
        Stmt::Decl(Box::new(Decl::new("i", Type::Integer))),
        Stmt::For {
            init: Some(Expr::Assignment {
                target: Box::new(Expr::name("i")),
                value: Box::new(Expr::IntegerLiteral(0)),
            }),
            condition: Some(Expr::binary(
                BinaryOp::Lt,
                Expr::name("i"),
                Expr::IntegerLiteral(3),
            )),
            next: Some(Expr::unary(
                crate::ast::expressions::UnaryOp::Increment,
                Expr::name("i"),
            )),
            body: Box::new(Stmt::Block(vec![])),
        },
    ];
    let program = vec![Decl::new("f", Type::function(Type::Void, vec![])).with_code(body)];

    let asm = generate_program(program).unwrap();

    assert!(asm.contains(".L0:"));
    assert!(asm.contains("je .L1"));
    assert!(asm.contains("jmp .L0"));
    assert!(asm.contains(".L1:"));
    assert!(asm.contains("setl %bl"));
}

#[test]
fn test_global_data_emission() {
    let program = vec![
        Decl::new("x", Type::Integer).with_value(Expr::IntegerLiteral(42)),
        Decl::new("flag", Type::Boolean).with_value(Expr::BooleanLiteral(true)),
        Decl::new("zeroed", Type::Integer),
        Decl::new("a", Type::array(Type::Integer, 3)).with_value(Expr::ArrayLiteral(vec![
            Expr::IntegerLiteral(1),
            Expr::IntegerLiteral(2),
            Expr::IntegerLiteral(3),
        ])),
        Decl::new("greeting", Type::String)
            .with_value(Expr::StringLiteral("hi\n".to_string())),
    ];

    let asm = generate_program(program).unwrap();

    assert!(asm.contains(".data"));
    assert!(asm.contains("x:\n\t.quad 42"));
    assert!(asm.contains("flag:\n\t.quad 1"));
    assert!(asm.contains("zeroed:\n\t.quad 0"));
    assert!(asm.contains("a:\n\t.quad 1\n\t.quad 2\n\t.quad 3"));
    assert!(asm.contains("greeting:\n\t.string \"hi\\n\""));
}

#[test]
fn test_global_access_is_rip_relative() {
    let program = vec![
        Decl::new("x", Type::Integer).with_value(Expr::IntegerLiteral(1)),
        Decl::new("f", Type::function(Type::Integer, vec![]))
            .with_code(vec![Stmt::Return(Some(Expr::name("x")))]),
    ];

    let asm = generate_program(program).unwrap();
    assert!(asm.contains("movq x(%rip), %rbx"));
}

#[test]
fn test_string_literal_collects_into_data_section() {
    let program = vec![Decl::new("f", Type::function(Type::Void, vec![])).with_code(vec![
        Stmt::Print(vec![Expr::StringLiteral("hello".to_string())]),
    ])];

    let asm = generate_program(program).unwrap();

    assert!(asm.contains("leaq .L0(%rip), %rbx"));
    assert!(asm.contains(".L0:\n\t.string \"hello\""));
    assert!(asm.contains("call print_string"));
}

#[test]
fn test_subscript_scales_index_by_element_size() {
    let program = vec![
        Decl::new("a", Type::array(Type::Integer, 4)),
        Decl::new("f", Type::function(Type::Integer, vec![])).with_code(vec![Stmt::Return(
            Some(Expr::Subscript {
                array: Box::new(Expr::name("a")),
                index: Box::new(Expr::IntegerLiteral(2)),
            }),
        )]),
    ];

    let asm = generate_program(program).unwrap();

    assert!(asm.contains("leaq a(%rip), %rbx"));
    assert!(asm.contains("imulq $8, %r10"));
    assert!(asm.contains("addq %rbx, %r10"));
    assert!(asm.contains("movq (%r10), %r10"));
}

#[test]
fn test_local_array_initializer_stores_elementwise() {
    let decl = Decl::new("a", Type::array(Type::Integer, 2)).with_value(Expr::ArrayLiteral(
        vec![Expr::IntegerLiteral(7), Expr::IntegerLiteral(9)],
    ));
    let program = vec![Decl::new("f", Type::function(Type::Void, vec![]))
        .with_code(vec![Stmt::Decl(Box::new(decl))])];

    let asm = generate_program(program).unwrap();

    // Two elements at consecutive frame slots from the array base.
    assert!(asm.contains("movq %rbx, -16(%rbp)"));
    assert!(asm.contains("movq %rbx, -8(%rbp)"));
}

#[test]
fn test_non_constant_global_initializer_is_fatal() {
    let program = vec![
        Decl::new("x", Type::Integer).with_value(Expr::IntegerLiteral(1)),
        Decl::new("y", Type::Integer).with_value(Expr::name("x")),
    ];

    assert!(matches!(
        generate_program(program),
        Err(CodegenError::NonConstantGlobal { .. })
    ));
}

#[test]
fn test_negated_constant_global() {
    let program = vec![Decl::new("x", Type::Integer).with_value(Expr::unary(
        crate::ast::expressions::UnaryOp::Negate,
        Expr::IntegerLiteral(5),
    ))];

    let asm = generate_program(program).unwrap();
    assert!(asm.contains("x:\n\t.quad -5"));
}
