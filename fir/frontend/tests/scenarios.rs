use fir_frontend::{FirParser, Lexer, ParserState};
use fir_ir::{self as ir, GetName};
use fir_utils::{FirResult, GlobalPositionTable};

fn parse(src: &str) -> FirResult<ir::Circuit> {
    FirParser::parse_str("scenario.fir", src)
}

fn parse_type(src: &str) -> FirResult<ir::Type> {
    let file = GlobalPositionTable::get()
        .add_file("type.fir".to_string(), src.to_string());
    ParserState::new(Lexer::new(file)).parse_type("expected type")
}

const FOO: &str = "\
circuit Foo :
  module Foo :
    input a : UInt<8>
    output b : UInt<8>
    wire w : UInt<8>
    w <= a
    b <= w
";

#[test]
fn simple_module() {
    let circuit = parse(FOO).unwrap();
    assert_eq!(circuit.name, "Foo");
    assert_eq!(circuit.definitions.len(), 1);

    let module = circuit.find_module("Foo").unwrap();
    let module = module.borrow();
    assert_eq!(module.ports.len(), 2);
    assert_eq!(module.ports[0].name, "a");
    assert_eq!(module.ports[0].ty, ir::Type::UInt(Some(8)));
    assert_eq!(module.ports[0].direction(), ir::Direction::Input);
    assert_eq!(module.ports[1].name, "b");
    assert_eq!(module.ports[1].ty, ir::Type::UInt(Some(8)).flip());

    let wires: Vec<_> = module.wires().collect();
    assert_eq!(wires.len(), 1);
    assert_eq!(wires[0].name, "w");
    assert_eq!(wires[0].ty, ir::Type::UInt(Some(8)));

    let connects: Vec<_> = module
        .connects()
        .map(|c| (c.dest.name().to_string(), c.src.name().to_string()))
        .collect();
    assert_eq!(
        connects,
        vec![
            ("w".to_string(), "a".to_string()),
            ("b".to_string(), "w".to_string())
        ]
    );
    // Connect operands are the nodes themselves, not copies.
    let first = module.connects().next().unwrap();
    assert_eq!(first.src, ir::Value::Port(module.ports[0].clone()));
}

#[test]
fn extmodule_metadata() {
    let src = "\
circuit Top :
  extmodule Ext :
    input clk : Clock
    output out : UInt<8>
    defname = Bar
    parameter WIDTH = 8
";
    let circuit = parse(src).unwrap();
    assert_eq!(circuit.modules().count(), 0);
    let ext = circuit.ext_modules().next().unwrap();
    assert_eq!(ext.name(), "Ext");
    assert_eq!(ext.defname, Some("Bar".into()));
    assert_eq!(ext.parameters, vec![("WIDTH".into(), ir::Param::Int(8))]);
    assert_eq!(ext.ports.len(), 2);
}

#[test]
fn nested_bundle_type() {
    let ty = parse_type("{flip a : UInt<1>, b : {x: UInt<2>}[3]}").unwrap();
    let ir::Type::Bundle(fields) = &ty else {
        panic!("expected bundle, got {ty}")
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "a");
    assert_eq!(fields[0].ty, ir::Type::UInt(Some(1)).flip());
    assert_eq!(fields[1].name, "b");
    let inner = ir::Type::Bundle(vec![ir::BundleElement::new(
        "x",
        ir::Type::UInt(Some(2)),
    )]);
    assert_eq!(fields[1].ty, inner.vector(3));
}

#[test]
fn types_round_trip_through_display() {
    for src in [
        "Clock",
        "Reset",
        "AsyncReset",
        "UInt",
        "SInt<16>",
        "Analog<1>",
        "UInt<8>[2][3]",
        "{}",
        "{flip a : UInt<1>, b : {x : UInt<2>}[3]}",
        "{0 : SInt, flip 1 : {}[0]}[4]",
    ] {
        let ty = parse_type(src).unwrap();
        let printed = ty.to_string();
        assert_eq!(parse_type(&printed).unwrap(), ty, "printed as {printed}");
    }
}

#[test]
fn invalid_widths_and_sizes() {
    for (src, msg) in [
        ("UInt<-1>", "invalid width specifier"),
        ("SInt<99999999999>", "invalid width specifier"),
        ("UInt[-1]", "invalid size specifier"),
        ("UInt<abc>", "expected width"),
    ] {
        let err = parse_type(src).unwrap_err();
        assert_eq!(err.message(), msg, "for {src}");
        assert!(err.location().into_option().is_some());
    }

    let src = "\
circuit T :
  module T :
    wire w : UInt<-4>
";
    assert_eq!(parse(src).unwrap_err().message(), "invalid width specifier");
}

#[test]
fn redefinition_within_a_module() {
    let src = "\
circuit T :
  module T :
    wire w : UInt
    wire w : SInt
";
    let err = parse(src).unwrap_err();
    assert_eq!(err.message(), "redefinition of name 'w'");
    assert_eq!(err.location().get_line_col(), (4, 5));
    assert_eq!(err.annotations()[0].0.get_line_col(), (3, 5));
}

#[test]
fn same_names_in_different_modules() {
    let src = "\
circuit T :
  module A :
    input a : UInt
    wire w : UInt
    w <= a
  module T :
    input a : UInt
    wire w : UInt
    w <= a
";
    let circuit = parse(src).unwrap();
    assert_eq!(circuit.modules().count(), 2);
}

#[test]
fn undefined_names_in_connect() {
    for body in ["    x <= a\n", "    a <= x\n"] {
        let src = format!("circuit T :\n  module T :\n    input a : UInt\n{body}");
        let err = parse(&src).unwrap_err();
        assert_eq!(err.message(), "use of invalid name 'x'");
    }
}

#[test]
fn dedent_ends_the_module_body() {
    let src = "\
circuit T :
  module A :
    input a : UInt
  module T :
    output b : UInt
";
    let circuit = parse(src).unwrap();
    let a = circuit.find_module("A").unwrap();
    assert!(a.borrow().body.is_empty());
    assert_eq!(a.borrow().ports.len(), 1);

    // A wire at the module's own indentation is not part of its body.
    let src = "\
circuit T :
  module T :
    input a : UInt
  wire w : UInt
";
    assert_eq!(
        parse(src).unwrap_err().message(),
        "unexpected token in circuit"
    );
}

#[test]
fn lexical_errors_are_reported_once() {
    let src = "\
circuit T :
  module T :
    input a : UInt
    wire w : UInt<8> # oops
";
    let err = parse(src).unwrap_err();
    assert!(err.is_lexical());
    assert_eq!(err.message(), "unexpected character");
    assert!(err.annotations().is_empty());

    let err = parse("circuit T :\n  extmodule E :\n    parameter S = \"abc\n")
        .unwrap_err();
    assert_eq!(err.message(), "unterminated string");
}

#[test]
fn comments_are_ignored() {
    let src = "\
; leading comment
circuit Foo : ; trailing
  module Foo :
    input a : UInt<8>
    ; indented comment
    output b : UInt<8>
    b <= a
";
    let circuit = parse(src).unwrap();
    let module = circuit.find_module("Foo").unwrap();
    assert_eq!(module.borrow().ports.len(), 2);
    assert_eq!(module.borrow().connects().count(), 1);
}

#[test]
fn printed_circuit_parses_back() {
    let src = "\
circuit Top :
  module Top :
    input clk : Clock
    input in : {a : UInt<4>, flip b : SInt<2>}[2]
    output out : {a : UInt<4>, flip b : SInt<2>}[2]
    wire t : {a : UInt<4>, flip b : SInt<2>}[2]
    t <= in
    out <= t
  extmodule Black :
    input x : AsyncReset
    defname = BlackBox
    parameter DEPTH = 16
    parameter INIT = \"mem.hex\"
";
    let circuit = parse(src).unwrap();
    let printed = ir::Printer::circuit_to_string(&circuit);
    assert_eq!(printed, src);
    let again = parse(&printed).unwrap();
    assert_eq!(ir::Printer::circuit_to_string(&again), printed);
}

#[test]
fn parsed_signatures_lower_to_rtl() {
    let src = "\
circuit Top :
  extmodule Ext :
    input clk : Clock
    output out : UInt<8>
    defname = Bar
    parameter WIDTH = 8
  module Top :
    input in : {a : UInt<4>, flip b : SInt<2>}[2]
    input unused : UInt<0>
    output out : UInt<8>
";
    let circuit = parse(src).unwrap();
    let modules = ir::rtl::lower_circuit(&circuit).unwrap();
    assert_eq!(modules.len(), 2);

    let ext = modules[0].external.as_ref().unwrap();
    assert_eq!(ext.verilog_name, Some("Bar".into()));
    assert_eq!(ext.parameters, vec![("WIDTH".into(), ir::Param::Int(8))]);

    let top = &modules[1];
    assert!(top.external.is_none());
    let names: Vec<_> = top.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["in", "out"]);
    assert_eq!(top.ports[0].ty, ir::rtl::RtlType::Integer(12));
    assert_eq!(top.ports[1].direction, ir::rtl::PortDirection::Output);

    let src = "circuit T :\n  module T :\n    output o : SInt\n";
    let err = ir::rtl::lower_circuit(&parse(src).unwrap()).unwrap_err();
    assert_eq!(err.message(), "cannot lower this port type to RTL");
    assert_eq!(err.location().get_line_col(), (3, 12));
}
