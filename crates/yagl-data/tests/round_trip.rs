//! Binary and text paths must agree on every parameter expression form.

mod common;

use common::{grf, INFO_ACTION};
use strum::IntoEnumIterator;
use yagl_data::action0d::Action0DRecord;
use yagl_data::stream::{Reader, Writer};
use yagl_data::token_stream::TokenStream;
use yagl_data::{Document, Record};
use yagl_types::{ExpressionKind, Operation};

const PARAM: &[u8] = &[0x0D, 0x01, 0x00, 0x02, 0x00];
const SIGNED_MULTIPLY: &[u8] = &[0x0D, 0x02, 0x04, 0x03, 0x81];
const LITERAL: &[u8] = &[0x0D, 0x03, 0x81, 0xFF, 0x04, 0x78, 0x56, 0x34, 0x12];
const OTHER_GRF: &[u8] = &[0x0D, 0x04, 0x00, 0x03, 0xFE, 0x41, 0x42, 0x43, 0x44];
const PATCH: &[u8] = &[0x0D, 0x10, 0x00, 0x0E, 0xFE, 0xFF, 0xFF, 0x00, 0x00];
const RESOURCES: &[u8] = &[0x0D, 0x05, 0x00, 0x00, 0xFE, 0xFF, 0x0B, 0x08, 0x00];

fn all_forms() -> Vec<u8> {
    grf(
        &[
            (INFO_ACTION, PARAM),
            (INFO_ACTION, SIGNED_MULTIPLY),
            (INFO_ACTION, LITERAL),
            (INFO_ACTION, OTHER_GRF),
            (INFO_ACTION, PATCH),
            (INFO_ACTION, RESOURCES),
            (INFO_ACTION, &[0x08, 0x07, 0x01]),
        ],
        &[],
    )
}

fn expressions(doc: &Document) -> Vec<&Action0DRecord> {
    doc.records
        .iter()
        .filter_map(|record| match record {
            Record::ParameterExpression(expr) => Some(expr),
            _ => None,
        })
        .collect()
}

#[test]
fn binary_text_binary() {
    let bytes = all_forms();
    let doc = Document::read(&bytes).expect("read");
    let text = doc.print().expect("print");
    let reparsed = Document::parse(&text).expect("parse");
    assert_eq!(reparsed, doc);
    assert_eq!(reparsed.write(), bytes);
}

#[test]
fn printed_text_is_stable() {
    let doc = Document::read(&all_forms()).expect("read");
    let text = doc.print().expect("print");
    let again = Document::parse(&text).expect("parse").print().expect("print");
    assert_eq!(again, text);
}

#[test]
fn kind_is_derived_identically() {
    let doc = Document::read(&all_forms()).expect("read");
    let reparsed = Document::parse(&doc.print().expect("print")).expect("parse");
    let kinds: Vec<ExpressionKind> = expressions(&doc).iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ExpressionKind::Param,
            ExpressionKind::Param,
            ExpressionKind::Param,
            ExpressionKind::OtherGrf,
            ExpressionKind::Patch,
            ExpressionKind::Resources,
        ]
    );
    let reparsed_kinds: Vec<ExpressionKind> =
        expressions(&reparsed).iter().map(|e| e.kind()).collect();
    assert_eq!(reparsed_kinds, kinds);
}

#[test]
fn param_assignment_text() {
    let text = Document::read(&grf(&[(INFO_ACTION, PARAM)], &[]))
        .expect("read")
        .print()
        .expect("print");
    assert_eq!(
        text,
        "parameter_expression<Param> // Action0D\n\
         {\n    \
         expression: parameter[0x01] = parameter[0x02];\n    \
         not_if_defined: false;\n\
         }\n"
    );
}

#[test]
fn resources_example_reencodes() {
    let text = "parameter_expression<Resources> // Action0D\n\
                {\n    expression: parameter[0x05] = GRM_Reserve(Cargos, 0x0008);\n}\n";
    let doc = Document::parse(text).expect("parse");
    assert_eq!(doc.write(), grf(&[(INFO_ACTION, RESOURCES)], &[]));
}

#[test]
fn every_operator_round_trips() {
    for operation in Operation::iter() {
        for not_if_defined in [false, true] {
            let record = Action0DRecord {
                target: 0x01,
                operation,
                not_if_defined,
                source1: 0x02,
                source2: 0x83,
                data: 0,
            };

            let mut w = Writer::new();
            record.write(&mut w);
            let bytes = w.into_bytes();
            let mut r = Reader::new(&bytes[1..]);
            assert_eq!(Action0DRecord::read(&mut r).expect("read"), record, "{operation:?}");

            let mut text = String::new();
            record.print(&mut text, 0).expect("print");
            let mut ts = TokenStream::from_text(&text).expect("lex");
            assert_eq!(Action0DRecord::parse(&mut ts).expect("parse"), record, "{text}");
        }
    }
}

#[test]
fn data_presence_follows_sources() {
    let base = Action0DRecord::default();
    assert!(!base.has_data());
    let literal = Action0DRecord { source1: 0xFF, ..base.clone() };
    assert!(literal.has_data());
    let special = Action0DRecord { source2: 0xFE, ..base.clone() };
    assert!(special.has_data());
    let both = Action0DRecord { source1: 0xFF, source2: 0xFE, ..base.clone() };
    assert!(both.has_data());
    let wide = Action0DRecord { source2: 0xFF, ..base };
    assert!(wide.has_data());
}
