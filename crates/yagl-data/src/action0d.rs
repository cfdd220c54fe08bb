//! Action 0x0D: parameter expressions.
//!
//! The record has one binary layout but four textual forms. Which form applies
//! is decided by sentinel values in `source2` and `data`, see
//! [`ExpressionKind::classify`]. The kind is recomputed on demand and never
//! stored, so the binary and text paths cannot disagree about it.

use std::fmt::Write;

use yagl_types::{ExpressionKind, Feature, GrfLabel, GrmOperator, Operation};
use yagl_types::operation::Signedness;

use crate::descriptors::{
    pad, to_hex, BoolDescriptor, Descriptor, EnumDescriptor, LabelDescriptor, PrintError,
};
use crate::stream::{ReadError, Reader, Writer};
use crate::token_stream::{ParseError, TokenStream};
use crate::yagl_lexer::Token;

pub const ACTION_0D: u8 = 0x0D;
pub const RECORD_NAME: &str = "parameter_expression";

/// Operand byte meaning "use the `data` literal".
const LITERAL_OPERAND: u8 = 0xFF;
/// Operand bytes with this bit set address global variables.
const GLOBAL_VAR_BIT: u8 = 0x80;

const STR_EXPRESSION: &str = "expression";
const STR_PARAM: &str = "parameter";
const STR_GLOBAL_VAR: &str = "global_var";
const STR_PATCH_VAR: &str = "patch_var";
const STR_SOURCE2: &str = "source2";
const STR_SIGNED: &str = "signed";
const STR_UNSIGNED: &str = "unsigned";

static DESC_KIND: EnumDescriptor<ExpressionKind> = EnumDescriptor {
    name: "type",
    entries: &[
        (ExpressionKind::Param, "Param"),
        (ExpressionKind::Patch, "Patch"),
        (ExpressionKind::Resources, "Resources"),
        (ExpressionKind::OtherGrf, "OtherGRF"),
    ],
};

static DESC_OPERATOR: EnumDescriptor<Operation> = EnumDescriptor {
    name: "operator",
    entries: &[
        (Operation::Assignment, "Assignment"),
        (Operation::Addition, "Addition"),
        (Operation::Subtraction, "Subtraction"),
        (Operation::MultiplyUnsigned, "MultiplyUnsigned"),
        (Operation::MultiplySigned, "MultiplySigned"),
        (Operation::BitShiftUnsigned, "BitShiftUnsigned"),
        (Operation::BitShiftSigned, "BitShiftSigned"),
        (Operation::BitwiseAnd, "BitwiseAND"),
        (Operation::BitwiseOr, "BitwiseOR"),
        (Operation::DivideUnsigned, "DivideUnsigned"),
        (Operation::DivideSigned, "DivideSigned"),
        (Operation::ModuloUnsigned, "ModuloUnsigned"),
        (Operation::ModuloSigned, "ModuloSigned"),
    ],
};

static DESC_GRM_OP: EnumDescriptor<GrmOperator> = EnumDescriptor {
    name: "grm_operator",
    entries: &[
        (GrmOperator::Reserve, "GRM_Reserve"),
        (GrmOperator::Find, "GRM_Find"),
        (GrmOperator::Check, "GRM_Check"),
        (GrmOperator::Mark, "GRM_Mark"),
        (GrmOperator::FindNoFail, "GRM_FindNoFail"),
        (GrmOperator::CheckNoFail, "GRM_CheckNoFail"),
        (GrmOperator::GetOwner, "GRM_GetOwner"),
    ],
};

pub(crate) static DESC_FEATURE: EnumDescriptor<Feature> = EnumDescriptor {
    name: "feature",
    entries: &[
        (Feature::Trains, "Trains"),
        (Feature::Vehicles, "Vehicles"),
        (Feature::Ships, "Ships"),
        (Feature::Aircraft, "Aircraft"),
        (Feature::Stations, "Stations"),
        (Feature::Canals, "Canals"),
        (Feature::Bridges, "Bridges"),
        (Feature::Houses, "Houses"),
        (Feature::GlobalSettings, "GlobalSettings"),
        (Feature::IndustryTiles, "IndustryTiles"),
        (Feature::Industries, "Industries"),
        (Feature::Cargos, "Cargos"),
        (Feature::SoundEffects, "SoundEffects"),
        (Feature::Airports, "Airports"),
        (Feature::Signals, "Signals"),
        (Feature::Objects, "Objects"),
        (Feature::RailTypes, "RailTypes"),
        (Feature::AirportTiles, "AirportTiles"),
        (Feature::RoadTypes, "RoadTypes"),
        (Feature::TramTypes, "TramTypes"),
        (Feature::RoadStops, "RoadStops"),
        (Feature::Badges, "Badges"),
    ],
};

static DESC_NOT_IF_DEFINED: BoolDescriptor = BoolDescriptor {
    name: "not_if_defined",
};

static DESC_GRF_ID: LabelDescriptor = LabelDescriptor { name: "grf_id" };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action0DRecord {
    pub target: u8,
    pub operation: Operation,
    /// Only apply when the target parameter is not yet defined.
    pub not_if_defined: bool,
    pub source1: u8,
    pub source2: u8,
    /// Zero when absent from the stream.
    pub data: u32,
}

impl Default for Action0DRecord {
    fn default() -> Self {
        Self {
            target: 0,
            operation: Operation::Assignment,
            not_if_defined: false,
            source1: 0,
            source2: 0,
            data: 0,
        }
    }
}

/// One side of an expression as written in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Param(u8),
    GlobalVar(u8),
    Literal(u32),
}

/// The single `data` dword shared by every literal operand of a record.
#[derive(Default)]
struct LiteralSlot(Option<u32>);

impl LiteralSlot {
    fn bind(&mut self, value: u32, ts: &TokenStream) -> Result<(), ParseError> {
        match self.0 {
            Some(existing) if existing != value => Err(ts.structural(format!(
                "literal {} (all literal operands share one data value)",
                to_hex(existing)
            ))),
            _ => {
                self.0 = Some(value);
                Ok(())
            }
        }
    }

    /// Byte to store for an operand, binding its literal if it has one.
    fn operand_byte(&mut self, operand: Operand, ts: &TokenStream) -> Result<u8, ParseError> {
        match operand {
            Operand::Param(b) | Operand::GlobalVar(b) => Ok(b),
            Operand::Literal(v) => {
                self.bind(v, ts)?;
                Ok(LITERAL_OPERAND)
            }
        }
    }
}

impl Action0DRecord {
    /// `data` follows the four operand bytes only for literal or special operands.
    pub fn has_data(&self) -> bool {
        self.source1 == LITERAL_OPERAND || self.source2 >= ExpressionKind::SPECIAL_SOURCE
    }

    pub fn kind(&self) -> ExpressionKind {
        ExpressionKind::classify(self.source2, self.data)
    }

    /// Read the payload that follows the action opcode.
    pub fn read(r: &mut Reader) -> Result<Self, ReadError> {
        let target = r.read_u8()?;

        let op_offset = r.pos();
        let op_byte = r.read_u8()?;
        let not_if_defined = op_byte & Operation::NOT_IF_DEFINED != 0;
        let operation = Operation::from_repr(op_byte & !Operation::NOT_IF_DEFINED).ok_or(
            ReadError::InvalidValue {
                field: DESC_OPERATOR.name,
                value: op_byte.into(),
                offset: op_offset,
            },
        )?;

        let source1_offset = r.pos();
        let mut record = Self {
            target,
            operation,
            not_if_defined,
            source1: r.read_u8()?,
            source2: r.read_u8()?,
            data: 0,
        };
        let data_offset = r.pos();
        if record.has_data() {
            record.data = r.read_u32()?;
        }

        // Resource requests name their operator and feature symbolically.
        if record.kind() == ExpressionKind::Resources {
            if GrmOperator::from_repr(record.source1).is_none() {
                return Err(ReadError::InvalidValue {
                    field: DESC_GRM_OP.name,
                    value: record.source1.into(),
                    offset: source1_offset,
                });
            }
            let feature = record.feature_byte();
            if Feature::from_repr(feature).is_none() {
                return Err(ReadError::InvalidValue {
                    field: DESC_FEATURE.name,
                    value: feature.into(),
                    offset: data_offset + 1,
                });
            }
        }
        Ok(record)
    }

    /// Write the action opcode and payload.
    pub fn write(&self, w: &mut Writer) {
        w.write_u8(ACTION_0D);
        w.write_u8(self.target);
        let flag = if self.not_if_defined {
            Operation::NOT_IF_DEFINED
        } else {
            0
        };
        w.write_u8(self.operation as u8 | flag);
        w.write_u8(self.source1);
        w.write_u8(self.source2);
        if self.has_data() {
            w.write_u32(self.data);
        }
    }

    fn operand_text(&self, operand: u8) -> String {
        if operand == LITERAL_OPERAND {
            to_hex(self.data)
        } else if operand & GLOBAL_VAR_BIT != 0 {
            format!("{STR_GLOBAL_VAR}[{}]", to_hex(operand))
        } else {
            format!("{STR_PARAM}[{}]", to_hex(operand))
        }
    }

    pub fn print(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        let kind = self.kind();
        writeln!(
            out,
            "{}{RECORD_NAME}<{}> // Action0D",
            pad(indent),
            DESC_KIND.value_name(kind)?
        )?;
        writeln!(out, "{}{{", pad(indent))?;

        let inner = indent + 4;
        write!(
            out,
            "{}{STR_EXPRESSION}: {} = ",
            pad(inner),
            self.operand_text(self.target)
        )?;
        match kind {
            ExpressionKind::Param => self.print_param(out, inner)?,
            ExpressionKind::OtherGrf => self.print_other_grf(out, inner)?,
            ExpressionKind::Patch => self.print_patch(out, inner)?,
            ExpressionKind::Resources => self.print_resources(out, inner)?,
        }

        writeln!(out, "{}}}", pad(indent))?;
        Ok(())
    }

    fn print_param(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        write!(out, "{}", self.operand_text(self.source1))?;
        if self.operation != Operation::Assignment {
            write!(
                out,
                " {} {}",
                self.operation.infix(),
                self.operand_text(self.source2)
            )?;
            match self.operation.signedness() {
                Some(Signedness::Unsigned) => write!(out, ", {STR_UNSIGNED}")?,
                Some(Signedness::Signed) => write!(out, ", {STR_SIGNED}")?,
                None => {}
            }
        }
        writeln!(out, ";")?;

        // Assignment ignores source2 but the byte must survive a round trip.
        if self.operation == Operation::Assignment && self.source2 != 0 {
            writeln!(
                out,
                "{}{STR_SOURCE2}: {};",
                pad(indent),
                self.operand_text(self.source2)
            )?;
        }
        DESC_NOT_IF_DEFINED.print(&self.not_if_defined, out, indent)
    }

    fn print_other_grf(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        let grf_id = DESC_GRF_ID.print_value(&GrfLabel::from_dword(self.data))?;
        writeln!(out, "<{grf_id}>{};", self.operand_text(self.source1))?;
        self.print_special_trailer(out, indent)
    }

    fn print_patch(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        writeln!(out, "{STR_PATCH_VAR}[{}];", to_hex(self.source1))?;
        self.print_special_trailer(out, indent)
    }

    fn print_resources(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        let op = GrmOperator::from_repr(self.source1).ok_or(PrintError::UnmappedValue {
            descriptor: DESC_GRM_OP.name,
            value: self.source1.into(),
        })?;
        let feature_raw = self.feature_byte();
        let feature = Feature::from_repr(feature_raw).ok_or(PrintError::UnmappedValue {
            descriptor: DESC_FEATURE.name,
            value: feature_raw.into(),
        })?;
        writeln!(
            out,
            "{}({}, {});",
            DESC_GRM_OP.value_name(op)?,
            DESC_FEATURE.value_name(feature)?,
            to_hex(self.resource_number())
        )?;
        self.print_special_trailer(out, indent)
    }

    /// Fields the special-operand expressions have no room for.
    fn print_special_trailer(&self, out: &mut String, indent: usize) -> Result<(), PrintError> {
        if self.operation != Operation::Assignment {
            DESC_OPERATOR.print(&self.operation, out, indent)?;
        }
        if self.not_if_defined {
            DESC_NOT_IF_DEFINED.print(&self.not_if_defined, out, indent)?;
        }
        Ok(())
    }

    fn feature_byte(&self) -> u8 {
        (self.data >> 8) as u8
    }

    fn resource_number(&self) -> u16 {
        (self.data >> 16) as u16
    }

    fn resource_data(feature: Feature, number: u16) -> u32 {
        0xFF | (u32::from(feature as u8) << 8) | (u32::from(number) << 16)
    }

    pub fn parse(ts: &mut TokenStream) -> Result<Self, ParseError> {
        ts.match_ident(RECORD_NAME)?;
        ts.expect(&Token::OpenAngle)?;
        let kind = DESC_KIND.parse_value(ts)?;
        ts.expect(&Token::CloseAngle)?;
        ts.expect(&Token::OpenBrace)?;

        let mut record = Self::default();
        let mut literal = LiteralSlot::default();

        ts.match_ident(STR_EXPRESSION)?;
        ts.expect(&Token::Colon)?;
        let target = parse_operand(ts)?;
        record.target = literal.operand_byte(target, ts)?;
        ts.expect(&Token::Equals)?;
        match kind {
            ExpressionKind::Param => record.parse_param(ts, &mut literal)?,
            ExpressionKind::OtherGrf => record.parse_other_grf(ts, &mut literal)?,
            ExpressionKind::Patch => record.parse_patch(ts, &mut literal)?,
            ExpressionKind::Resources => record.parse_resources(ts, &mut literal)?,
        }
        ts.expect(&Token::SemiColon)?;

        while !ts.accept(&Token::CloseBrace) {
            match ts.peek().clone() {
                Token::Ident(s) if s == DESC_NOT_IF_DEFINED.name => {
                    record.not_if_defined = DESC_NOT_IF_DEFINED.parse(ts)?;
                }
                Token::Ident(s) if s == DESC_OPERATOR.name && kind != ExpressionKind::Param => {
                    record.operation = DESC_OPERATOR.parse(ts)?;
                }
                Token::Ident(s)
                    if s == STR_SOURCE2
                        && kind == ExpressionKind::Param
                        && record.operation == Operation::Assignment =>
                {
                    ts.next();
                    ts.expect(&Token::Colon)?;
                    let source2 = parse_operand(ts)?;
                    record.source2 = literal.operand_byte(source2, ts)?;
                    ts.expect(&Token::SemiColon)?;
                }
                _ => return Err(ts.structural("expression property or '}'")),
            }
        }

        record.data = literal.0.unwrap_or(0);
        if record.data != 0 && !record.has_data() {
            return Err(ts.structural("a literal source operand to carry the target literal"));
        }
        if record.kind() != kind {
            let derived = DESC_KIND.value_name(record.kind()).unwrap_or("?");
            return Err(ts.structural(format!(
                "{} expression (operands describe a {derived} expression)",
                DESC_KIND.value_name(kind).unwrap_or("?")
            )));
        }
        Ok(record)
    }

    /// `<source1> [<op> <source2>[, signed|unsigned]]`
    fn parse_param(&mut self, ts: &mut TokenStream, literal: &mut LiteralSlot) -> Result<(), ParseError> {
        let source1 = parse_operand(ts)?;
        self.source1 = literal.operand_byte(source1, ts)?;

        let Some(infix) = ts.peek().symbol().filter(|s| is_infix_operator(s)) else {
            self.operation = Operation::Assignment;
            return Ok(());
        };
        ts.next();
        let source2 = parse_operand(ts)?;
        self.source2 = literal.operand_byte(source2, ts)?;

        let signedness = if ts.accept(&Token::Comma) {
            let name = ts.ident()?;
            match name.as_str() {
                STR_SIGNED => Some(Signedness::Signed),
                STR_UNSIGNED => Some(Signedness::Unsigned),
                _ => return Err(ts.unknown_identifier("signedness", &name)),
            }
        } else {
            None
        };

        self.operation = Operation::from_infix(infix, signedness).ok_or_else(|| {
            ts.structural(format!("';' (operator '{infix}' has no signed form)"))
        })?;
        Ok(())
    }

    /// `<"ABCD">parameter[0xNN]`
    fn parse_other_grf(&mut self, ts: &mut TokenStream, literal: &mut LiteralSlot) -> Result<(), ParseError> {
        ts.expect(&Token::OpenAngle)?;
        let label = DESC_GRF_ID.parse_value(ts)?;
        ts.expect(&Token::CloseAngle)?;
        literal.bind(label.to_dword(), ts)?;

        let source1 = parse_operand(ts)?;
        self.source1 = literal.operand_byte(source1, ts)?;
        self.source2 = ExpressionKind::SPECIAL_SOURCE;
        Ok(())
    }

    /// `patch_var[0xNN]`
    fn parse_patch(&mut self, ts: &mut TokenStream, literal: &mut LiteralSlot) -> Result<(), ParseError> {
        ts.match_ident(STR_PATCH_VAR)?;
        self.source1 = parse_index(ts)?;
        self.source2 = ExpressionKind::SPECIAL_SOURCE;
        literal.bind(ExpressionKind::PATCH_DATA, ts)
    }

    /// `GRM_Op(<feature>, <number>)`
    fn parse_resources(&mut self, ts: &mut TokenStream, literal: &mut LiteralSlot) -> Result<(), ParseError> {
        let op = DESC_GRM_OP.parse_value(ts)?;
        ts.expect(&Token::OpenParen)?;
        let feature = DESC_FEATURE.parse_value(ts)?;
        ts.expect(&Token::Comma)?;
        let number = ts.match_u16()?;
        ts.expect(&Token::CloseParen)?;

        self.source1 = op as u8;
        self.source2 = ExpressionKind::SPECIAL_SOURCE;
        literal.bind(Self::resource_data(feature, number), ts)
    }
}

fn is_infix_operator(symbol: &str) -> bool {
    matches!(symbol, "+" | "-" | "*" | "<<" | "&" | "|" | "/" | "%")
}

/// `[<u8>]`
fn parse_index(ts: &mut TokenStream) -> Result<u8, ParseError> {
    ts.expect(&Token::OpenBracket)?;
    let index = ts.match_u8()?;
    ts.expect(&Token::CloseBracket)?;
    Ok(index)
}

fn parse_operand(ts: &mut TokenStream) -> Result<Operand, ParseError> {
    match ts.peek().clone() {
        Token::Integer(_) => Ok(Operand::Literal(ts.match_u32()?)),
        Token::Ident(s) if s == STR_PARAM => {
            ts.next();
            let (line, col) = ts.location();
            let index = parse_index(ts)?;
            if index & GLOBAL_VAR_BIT != 0 {
                return Err(ParseError::Range {
                    line,
                    col,
                    value: index.into(),
                    max: (GLOBAL_VAR_BIT - 1).into(),
                });
            }
            Ok(Operand::Param(index))
        }
        Token::Ident(s) if s == STR_GLOBAL_VAR => {
            ts.next();
            let (line, col) = ts.location();
            let index = parse_index(ts)?;
            if index & GLOBAL_VAR_BIT == 0 || index == LITERAL_OPERAND {
                return Err(ParseError::Range {
                    line,
                    col,
                    value: index.into(),
                    max: (LITERAL_OPERAND - 1).into(),
                });
            }
            Ok(Operand::GlobalVar(index))
        }
        _ => Err(ts.structural("parameter[..], global_var[..] or integer literal")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_bytes(bytes: &[u8]) -> Action0DRecord {
        assert_eq!(bytes[0], ACTION_0D);
        let mut r = Reader::new(&bytes[1..]);
        let record = Action0DRecord::read(&mut r).expect("read");
        assert!(r.is_empty(), "trailing bytes after record");
        record
    }

    fn to_bytes(record: &Action0DRecord) -> Vec<u8> {
        let mut w = Writer::new();
        record.write(&mut w);
        w.into_bytes()
    }

    fn printed(record: &Action0DRecord) -> String {
        let mut out = String::new();
        record.print(&mut out, 0).expect("print");
        out
    }

    fn parsed(text: &str) -> Result<Action0DRecord, ParseError> {
        let mut ts = TokenStream::from_text(text)?;
        let record = Action0DRecord::parse(&mut ts)?;
        assert!(ts.at_eof());
        Ok(record)
    }

    /// Bytes and text describe the same record in both directions.
    fn check(bytes: &[u8], text: &str) {
        let from_binary = from_bytes(bytes);
        assert_eq!(printed(&from_binary), text);
        let from_text = parsed(text).expect("parse");
        assert_eq!(from_text, from_binary);
        assert_eq!(from_text.kind(), from_binary.kind());
        assert_eq!(to_bytes(&from_text), bytes);
    }

    #[test]
    fn param_assignment() {
        check(
            &[0x0D, 0x01, 0x00, 0x02, 0x00],
            "parameter_expression<Param> // Action0D\n\
             {\n    \
             expression: parameter[0x01] = parameter[0x02];\n    \
             not_if_defined: false;\n\
             }\n",
        );
    }

    #[test]
    fn param_signed_operator() {
        check(
            &[0x0D, 0x03, 0x84, 0x01, 0x81],
            "parameter_expression<Param> // Action0D\n\
             {\n    \
             expression: parameter[0x03] = parameter[0x01] * global_var[0x81], signed;\n    \
             not_if_defined: true;\n\
             }\n",
        );
    }

    #[test]
    fn param_literal_source() {
        check(
            &[0x0D, 0x00, 0x01, 0xFF, 0x02, 0x78, 0x56, 0x34, 0x12],
            "parameter_expression<Param> // Action0D\n\
             {\n    \
             expression: parameter[0x00] = 0x12345678 + parameter[0x02];\n    \
             not_if_defined: false;\n\
             }\n",
        );
    }

    #[test]
    fn param_assignment_keeps_source2() {
        check(
            &[0x0D, 0x00, 0x00, 0x01, 0xFF, 0x05, 0x00, 0x00, 0x00],
            "parameter_expression<Param> // Action0D\n\
             {\n    \
             expression: parameter[0x00] = parameter[0x01];\n    \
             source2: 0x00000005;\n    \
             not_if_defined: false;\n\
             }\n",
        );
    }

    #[test]
    fn other_grf() {
        check(
            &[0x0D, 0x04, 0x00, 0x07, 0xFE, b'A', b'B', b'C', b'D'],
            "parameter_expression<OtherGRF> // Action0D\n\
             {\n    \
             expression: parameter[0x04] = <\"ABCD\">parameter[0x07];\n\
             }\n",
        );
    }

    #[test]
    fn patch_variable() {
        check(
            &[0x0D, 0x10, 0x80, 0x0B, 0xFE, 0xFF, 0xFF, 0x00, 0x00],
            "parameter_expression<Patch> // Action0D\n\
             {\n    \
             expression: parameter[0x10] = patch_var[0x0b];\n    \
             not_if_defined: true;\n\
             }\n",
        );
    }

    #[test]
    fn resources() {
        check(
            &[0x0D, 0x05, 0x00, 0x00, 0xFE, 0xFF, 0x0B, 0x08, 0x00],
            "parameter_expression<Resources> // Action0D\n\
             {\n    \
             expression: parameter[0x05] = GRM_Reserve(Cargos, 0x0008);\n\
             }\n",
        );
    }

    #[test]
    fn special_kind_keeps_operator() {
        check(
            &[0x0D, 0x05, 0x01, 0x06, 0xFE, 0xFF, 0x08, 0x01, 0x00],
            "parameter_expression<Resources> // Action0D\n\
             {\n    \
             expression: parameter[0x05] = GRM_GetOwner(GlobalSettings, 0x0001);\n    \
             operator: Addition;\n\
             }\n",
        );
    }

    #[test]
    fn data_presence() {
        let mut record = Action0DRecord::default();
        assert!(!record.has_data());
        record.source1 = 0xFF;
        assert!(record.has_data());
        record.source1 = 0x01;
        record.source2 = 0xFE;
        assert!(record.has_data());
        record.source2 = 0xFF;
        assert!(record.has_data());
        record.source1 = 0xFF;
        assert!(record.has_data());
        record.source2 = 0xFD;
        record.source1 = 0xFE;
        assert!(!record.has_data());
    }

    #[test]
    fn truncated_data_is_fatal() {
        let mut r = Reader::new(&[0x00, 0x00, 0xFF, 0x00, 0x01, 0x02]);
        assert!(matches!(
            Action0DRecord::read(&mut r),
            Err(ReadError::UnexpectedEof { offset: 4, needed: 4 })
        ));
    }

    #[test]
    fn unknown_operator_byte() {
        let mut r = Reader::new(&[0x00, 0x8D, 0x00, 0x00]);
        assert!(matches!(
            Action0DRecord::read(&mut r),
            Err(ReadError::InvalidValue { value: 0x8D, offset: 1, .. })
        ));
    }

    #[test]
    fn marker_rejected_on_single_form_operator() {
        let text = "parameter_expression<Param> { expression: parameter[0x01] = parameter[0x02] + parameter[0x03], signed; }";
        assert!(matches!(parsed(text), Err(ParseError::Structural { .. })));
    }

    #[test]
    fn missing_marker_means_unsigned() {
        let text = "parameter_expression<Param> { expression: parameter[0x01] = parameter[0x02] % parameter[0x03]; }";
        assert_eq!(parsed(text).expect("parse").operation, Operation::ModuloUnsigned);
    }

    #[test]
    fn declared_kind_must_match_operands() {
        // A label starting with 0xFF classifies as a resource request.
        let text = r#"parameter_expression<OtherGRF> { expression: parameter[0x01] = <"\xffABC">parameter[0x02]; }"#;
        assert!(matches!(parsed(text), Err(ParseError::Structural { .. })));
        let text = "parameter_expression<Param> { expression: parameter[0x01] = parameter[0x02] + global_var[0xfe]; }";
        assert!(matches!(parsed(text), Err(ParseError::Structural { .. })));
    }

    #[test]
    fn conflicting_literals() {
        let text = "parameter_expression<Param> { expression: parameter[0x01] = 0x05 + 0x06; }";
        assert!(matches!(parsed(text), Err(ParseError::Structural { .. })));
        let text = "parameter_expression<Param> { expression: parameter[0x01] = 0x05 + 0x05; }";
        let record = parsed(text).expect("parse");
        assert_eq!((record.source1, record.source2, record.data), (0xFF, 0xFF, 5));
    }

    #[test]
    fn operand_ranges() {
        let text = "parameter_expression<Param> { expression: parameter[0x80] = parameter[0x01]; }";
        assert!(matches!(parsed(text), Err(ParseError::Range { value: 0x80, .. })));
        let text = "parameter_expression<Param> { expression: global_var[0x10] = parameter[0x01]; }";
        assert!(matches!(parsed(text), Err(ParseError::Range { value: 0x10, .. })));
    }

    #[test]
    fn unknown_grm_operator_name() {
        let text = "parameter_expression<Resources> { expression: parameter[0x01] = GRM_Steal(Trains, 0x0001); }";
        assert!(matches!(
            parsed(text),
            Err(ParseError::UnknownIdentifier { descriptor: "grm_operator", .. })
        ));
    }

    #[test]
    fn resources_with_unknown_grm_operator() {
        let mut r = Reader::new(&[0x05, 0x00, 0x07, 0xFE, 0xFF, 0x0B, 0x08, 0x00]);
        assert!(matches!(
            Action0DRecord::read(&mut r),
            Err(ReadError::InvalidValue { field: "grm_operator", value: 0x07, offset: 2 })
        ));
    }

    #[test]
    fn resources_with_unknown_feature() {
        let mut r = Reader::new(&[0x05, 0x00, 0x00, 0xFE, 0xFF, 0x40, 0x08, 0x00]);
        assert!(matches!(
            Action0DRecord::read(&mut r),
            Err(ReadError::InvalidValue { field: "feature", value: 0x40, offset: 5 })
        ));
    }

    #[test]
    fn other_kinds_ignore_the_resource_tables() {
        // Same operand bytes, but the data low byte makes this OtherGRF.
        let mut r = Reader::new(&[0x05, 0x00, 0x07, 0xFE, 0x41, 0x40, 0x08, 0x00]);
        assert_eq!(Action0DRecord::read(&mut r).expect("read").kind(), ExpressionKind::OtherGrf);
    }

    #[test]
    fn unmapped_feature_fails_to_print() {
        let record = Action0DRecord {
            source2: 0xFE,
            data: 0x0001_40FF,
            ..Action0DRecord::default()
        };
        let mut out = String::new();
        assert!(matches!(
            record.print(&mut out, 0),
            Err(PrintError::UnmappedValue { descriptor: "feature", value: 0x40 })
        ));
    }
}
