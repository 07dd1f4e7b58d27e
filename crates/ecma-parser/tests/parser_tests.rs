//! Whole-program parser acceptance tests: parse a source string and assert
//! directly on the resulting ESTree JSON shape (or the reported error).

use ecma_parser::{parse, EcmaVersion, RawOptions};
use serde_json::Value as Json;

fn parse_script(source: &str) -> Json {
    let opts = RawOptions { ecma_version: Some(EcmaVersion::Year(2022)), ..Default::default() }.resolve();
    match parse(source, opts) {
        Ok(program) => serde_json::to_value(program).unwrap(),
        Err(e) => serde_json::json!({ "error": e.message, "start": e.span.start, "end": e.span.end }),
    }
}

fn parse_module(source: &str) -> Json {
    let opts = RawOptions {
        ecma_version: Some(EcmaVersion::Year(2022)),
        source_type: Some(ecma_parser::SourceType::Module),
        ..Default::default()
    }
    .resolve();
    match parse(source, opts) {
        Ok(program) => serde_json::to_value(program).unwrap(),
        Err(e) => serde_json::json!({ "error": e.message, "start": e.span.start, "end": e.span.end }),
    }
}

fn ty(v: &Json) -> &str {
    v["type"].as_str().unwrap_or_else(|| panic!("expected a node with a type, got {v}"))
}

fn body(program: &Json) -> &Vec<Json> {
    program["body"].as_array().unwrap()
}

fn error_message(v: &Json) -> &str {
    v["error"].as_str().unwrap_or_else(|| panic!("expected an error, got {v}"))
}

// ── Statements ──────────────────────────────────────────────────────────

#[test]
fn variable_declarations() {
    let program = parse_script("var a = 1; let b = 2; const c = 3;");
    let stmts = body(&program);
    assert_eq!(stmts.len(), 3);
    for (stmt, kind) in stmts.iter().zip(["var", "let", "const"]) {
        assert_eq!(ty(stmt), "VariableDeclaration");
        assert_eq!(stmt["kind"], kind);
    }
}

#[test]
fn if_else_and_blocks() {
    let program = parse_script("if (a) { b(); } else if (c) { d(); } else { e(); }");
    let stmts = body(&program);
    assert_eq!(stmts.len(), 1);
    assert_eq!(ty(&stmts[0]), "IfStatement");
    assert_eq!(ty(&stmts[0]["alternate"]), "IfStatement");
    assert_eq!(ty(&stmts[0]["alternate"]["alternate"]), "BlockStatement");
}

#[test]
fn for_loop_forms() {
    let program = parse_script(
        "for (let i = 0; i < 10; i++) { x(i); } for (const k in obj) { y(k); } for (const v of list) { z(v); }",
    );
    let stmts = body(&program);
    assert_eq!(stmts.len(), 3);
    assert_eq!(ty(&stmts[0]), "ForStatement");
    assert_eq!(ty(&stmts[1]), "ForInStatement");
    assert_eq!(ty(&stmts[2]), "ForOfStatement");
}

#[test]
fn try_catch_finally() {
    let program = parse_script("try { risky(); } catch (e) { handle(e); } finally { cleanup(); }");
    let stmt = &body(&program)[0];
    assert_eq!(ty(stmt), "TryStatement");
    assert_eq!(ty(&stmt["handler"]["param"]), "Identifier");
    assert!(!stmt["finalizer"].is_null());
}

#[test]
fn try_catch_without_binding() {
    let program = parse_script("try { risky(); } catch { handle(); }");
    let stmt = &body(&program)[0];
    assert_eq!(ty(stmt), "TryStatement");
    assert!(stmt["handler"]["param"].is_null());
}

#[test]
fn labeled_break_and_continue() {
    let program = parse_script("outer: for (;;) { if (x) break outer; continue outer; }");
    let stmt = &body(&program)[0];
    assert_eq!(ty(stmt), "LabeledStatement");
    assert_eq!(stmt["label"]["name"], "outer");
}

#[test]
fn switch_with_default() {
    let program = parse_script("switch (x) { case 1: a(); break; default: b(); }");
    let stmt = &body(&program)[0];
    assert_eq!(ty(stmt), "SwitchStatement");
    let cases = stmt["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 2);
    assert!(!cases[0]["test"].is_null());
    assert!(cases[1]["test"].is_null());
}

#[test]
fn function_declaration_with_defaults_and_rest() {
    let program = parse_script("function f(a, b = 1, ...rest) { return a + b; }");
    let stmt = &body(&program)[0];
    assert_eq!(ty(stmt), "FunctionDeclaration");
    let params = stmt["params"].as_array().unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(ty(&params[0]), "Identifier");
    assert_eq!(ty(&params[1]), "AssignmentPattern");
    assert_eq!(ty(&params[2]), "RestElement");
}

#[test]
fn directive_prologue_enables_strict_mode() {
    let program = parse_script("\"use strict\"; var eval = 1;");
    assert_eq!(error_message(&program), "The keyword 'eval' is reserved");
}

// ── Expressions ─────────────────────────────────────────────────────────

#[test]
fn arrow_function_with_destructured_param() {
    let program = parse_script("const f = ({ a, b: [c, d] }) => a + c + d;");
    let decl = &body(&program)[0]["declarations"][0];
    let arrow = &decl["init"];
    assert_eq!(ty(arrow), "ArrowFunctionExpression");
    assert_eq!(ty(&arrow["params"][0]), "ObjectPattern");
}

#[test]
fn async_arrow_and_await() {
    let program = parse_script("const f = async (x) => await x;");
    let arrow = &body(&program)[0]["declarations"][0]["init"];
    assert_eq!(ty(arrow), "ArrowFunctionExpression");
    assert_eq!(arrow["async"], true);
    assert_eq!(ty(&arrow["body"]), "AwaitExpression");
}

#[test]
fn optional_chaining_wraps_in_chain_expression() {
    let program = parse_script("a?.b?.[c]?.(d);");
    let expr = &body(&program)[0]["expression"];
    assert_eq!(ty(expr), "ChainExpression");
    assert_eq!(ty(&expr["expression"]), "CallExpression");
    assert_eq!(expr["expression"]["optional"], true);
}

#[test]
fn nullish_coalescing() {
    let program = parse_script("const x = a ?? b;");
    let expr = &body(&program)[0]["declarations"][0]["init"];
    assert_eq!(ty(expr), "LogicalExpression");
    assert_eq!(expr["operator"], "??");
}

#[test]
fn logical_and_coalesce_mixing_is_rejected() {
    let program = parse_script("const x = a ?? b || c;");
    assert!(error_message(&program).contains("cannot be mixed"));
}

#[test]
fn unary_prefix_keywords() {
    let program = parse_script("typeof x; void 0; delete obj.prop;");
    let stmts = body(&program);
    for (stmt, (op, prefix)) in
        stmts.iter().zip([("typeof", true), ("void", true), ("delete", true)])
    {
        let expr = &stmt["expression"];
        assert_eq!(ty(expr), "UnaryExpression");
        assert_eq!(expr["operator"], op);
        assert_eq!(expr["prefix"], prefix);
    }
}

#[test]
fn in_and_instanceof_binary_expressions() {
    let program = parse_script("const a = key in obj; const b = x instanceof Foo;");
    let stmts = body(&program);
    let in_expr = &stmts[0]["declarations"][0]["init"];
    assert_eq!(ty(in_expr), "BinaryExpression");
    assert_eq!(in_expr["operator"], "in");
    let instanceof_expr = &stmts[1]["declarations"][0]["init"];
    assert_eq!(ty(instanceof_expr), "BinaryExpression");
    assert_eq!(instanceof_expr["operator"], "instanceof");
}

#[test]
fn regexp_literal_after_do_and_else() {
    let program = parse_script("do /re/.test(c); while (x);\nif (a) b(); else /re/.test(c);");
    let stmts = body(&program);
    assert_eq!(ty(&stmts[0]), "DoWhileStatement");
    let do_expr = &stmts[0]["body"]["expression"]["object"];
    assert_eq!(ty(do_expr), "Literal");
    let else_expr = &stmts[1]["alternate"]["expression"]["object"];
    assert_eq!(ty(else_expr), "Literal");
}

#[test]
fn yield_new_expression_argument() {
    let program = parse_script("function* g() { yield new Foo(); }");
    let gen = &body(&program)[0];
    let yield_expr = &gen["body"]["body"][0]["expression"];
    assert_eq!(ty(yield_expr), "YieldExpression");
    assert_eq!(ty(&yield_expr["argument"]), "NewExpression");
    assert_eq!(yield_expr["argument"]["callee"]["name"], "Foo");
}

#[test]
fn tagged_template_literal() {
    let program = parse_script("tag`hello ${name}!`;");
    let expr = &body(&program)[0]["expression"];
    assert_eq!(ty(expr), "TaggedTemplateExpression");
    assert_eq!(expr["tag"]["name"], "tag");
    let quasis = expr["quasi"]["quasis"].as_array().unwrap();
    assert_eq!(quasis.len(), 2);
    assert_eq!(expr["quasi"]["expressions"].as_array().unwrap().len(), 1);
}

#[test]
fn spread_in_call_and_array() {
    let program = parse_script("f(...args); const a = [1, ...rest, 2];");
    let stmts = body(&program);
    let call = &stmts[0]["expression"];
    assert_eq!(ty(&call["arguments"][0]), "SpreadElement");
    let array = &stmts[1]["declarations"][0]["init"];
    assert_eq!(ty(array), "ArrayExpression");
    assert_eq!(ty(&array["elements"][1]), "SpreadElement");
}

#[test]
fn object_with_shorthand_method_and_computed_key() {
    let program = parse_script("const o = { a, [b]: 1, m() { return 1; }, get g() { return 2; } };");
    let obj = &body(&program)[0]["declarations"][0]["init"];
    assert_eq!(ty(obj), "ObjectExpression");
    let props = obj["properties"].as_array().unwrap();
    assert_eq!(props.len(), 4);
    assert_eq!(props[0]["shorthand"], true);
    assert_eq!(props[1]["computed"], true);
    assert_eq!(props[2]["method"], true);
    assert_eq!(props[3]["kind"], "get");
}

#[test]
fn duplicate_proto_in_object_literal_is_rejected() {
    let program = parse_script("const o = { __proto__: a, __proto__: b };");
    assert_eq!(error_message(&program), "Redefinition of __proto__ property");
}

#[test]
fn new_target_meta_property() {
    let program = parse_script("function F() { return new.target; }");
    let fn_decl = &body(&program)[0];
    let ret = &fn_decl["body"]["body"][0];
    assert_eq!(ty(&ret["argument"]), "MetaProperty");
    assert_eq!(ret["argument"]["meta"]["name"], "new");
    assert_eq!(ret["argument"]["property"]["name"], "target");
}

// ── Classes ─────────────────────────────────────────────────────────────

#[test]
fn class_with_private_fields_and_methods() {
    let program = parse_script(
        "class C { #x = 1; get #y() { return this.#x; } set #y(v) { this.#x = v; } static #z = 2; static { C.#z = 3; } }",
    );
    let class = &body(&program)[0];
    assert_eq!(ty(class), "ClassDeclaration");
    let elements = class["body"]["body"].as_array().unwrap();
    assert_eq!(elements.len(), 5);
    assert_eq!(ty(&elements[0]), "PropertyDefinition");
    assert_eq!(ty(&elements[4]), "StaticBlock");
}

#[test]
fn class_extends_and_super_call() {
    let program = parse_script("class B extends A { constructor() { super(); } }");
    let class = &body(&program)[0];
    assert_eq!(class["superClass"]["name"], "A");
    let ctor_body = &class["body"]["body"][0]["value"]["body"]["body"];
    assert_eq!(ty(&ctor_body[0]["expression"]), "CallExpression");
    assert_eq!(ty(&ctor_body[0]["expression"]["callee"]), "Super");
}

#[test]
fn duplicate_private_field_is_rejected() {
    let program = parse_script("class C { #x = 1; #x = 2; }");
    assert_eq!(error_message(&program), "Identifier '#x' has already been declared");
}

// ── Modules ─────────────────────────────────────────────────────────────

#[test]
fn import_forms() {
    let program = parse_module("import def, { a, b as c } from \"mod\"; import * as ns from \"mod2\";");
    let stmts = body(&program);
    assert_eq!(ty(&stmts[0]), "ImportDeclaration");
    let specs = stmts[0]["specifiers"].as_array().unwrap();
    assert_eq!(ty(&specs[0]), "ImportDefaultSpecifier");
    assert_eq!(ty(&specs[1]), "ImportSpecifier");
    assert_eq!(specs[1]["imported"]["name"], "a");
    assert_eq!(specs[1]["local"]["name"], "c");
    assert_eq!(ty(&stmts[1]["specifiers"][0]), "ImportNamespaceSpecifier");
}

#[test]
fn export_forms() {
    let program = parse_module("export const x = 1; export default function f() {} export { x as y };");
    let stmts = body(&program);
    assert_eq!(ty(&stmts[0]), "ExportNamedDeclaration");
    assert!(!stmts[0]["declaration"].is_null());
    assert_eq!(ty(&stmts[1]), "ExportDefaultDeclaration");
    assert_eq!(ty(&stmts[2]), "ExportNamedDeclaration");
    assert_eq!(stmts[2]["specifiers"][0]["exported"]["name"], "y");
}

#[test]
fn duplicate_export_is_rejected() {
    let program = parse_module("export const x = 1; export { x }; export const y = 2; export { y as x };");
    assert!(error_message(&program).contains("Duplicate export"));
}

#[test]
fn exporting_an_undefined_binding_is_rejected() {
    let program = parse_module("export { neverDeclared };");
    assert!(error_message(&program).contains("is not defined"));
}

#[test]
fn top_level_await_requires_module() {
    let script = parse_script("await x;");
    assert_eq!(ty(&body(&script)[0]), "ExpressionStatement");
    assert_eq!(ty(&body(&script)[0]["expression"]), "Identifier");

    let module = parse_module("await x;");
    let stmt = &body(&module)[0];
    assert_eq!(ty(stmt), "ExpressionStatement");
    assert_eq!(ty(&stmt["expression"]), "AwaitExpression");
}

// ── Errors ──────────────────────────────────────────────────────────────

#[test]
fn unterminated_string_is_a_parse_error() {
    let program = parse_script("const s = \"abc;");
    assert!(program["error"].is_string());
}

#[test]
fn redeclaring_a_let_binding_is_rejected() {
    let program = parse_script("let x = 1; let x = 2;");
    assert!(error_message(&program).contains("has already been declared"));
}

#[test]
fn assigning_to_eval_in_strict_mode_is_rejected() {
    let program = parse_script("\"use strict\"; eval = 1;");
    assert_eq!(error_message(&program), "Assigning to 'eval' in strict mode");
}
