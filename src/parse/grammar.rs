use winnow::ascii::{dec_int, till_line_ending};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{FieldDefinition, FieldSemantic, OperatorDefinition, OperatorKind};

use super::parser::ParsedCatalog;

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers & labels ---------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn label(input: &mut &str) -> ModalResult<String> {
    ws.parse_next(input)?;
    string_literal
        .context(StrContext::Expected(StrContextValue::Description("label")))
        .parse_next(input)
}

// -- Operators --------------------------------------------------------------

fn operator_kind(input: &mut &str) -> ModalResult<OperatorKind> {
    ws.parse_next(input)?;
    alt((
        "inclusion".value(OperatorKind::Inclusion),
        "exclusion".value(OperatorKind::Exclusion),
        "neutral".value(OperatorKind::Neutral),
    ))
    .parse_next(input)
}

fn operator_def(input: &mut &str) -> ModalResult<OperatorDefinition> {
    ws.parse_next(input)?;
    '-'.parse_next(input)?;
    ws.parse_next(input)?;

    let id = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "operator name",
        )))
        .parse_next(input)?;
    let label = cut_err(label).parse_next(input)?;
    let kind = opt(operator_kind).parse_next(input)?.unwrap_or_default();

    Ok(OperatorDefinition::new(id, label, kind))
}

// -- Field attributes -------------------------------------------------------

#[derive(Debug, Clone)]
enum FieldAttr {
    Exclusive(String),
    Toggle,
    Numeric,
    Range(String),
}

fn named_attr<'i>(
    keyword: &'static str,
    what: &'static str,
) -> impl Parser<&'i str, String, ErrMode<winnow::error::ContextError>> {
    preceded(
        (keyword, ws),
        cut_err(ident)
            .context(StrContext::Expected(StrContextValue::Description(what)))
            .map(str::to_owned),
    )
}

fn field_attr(input: &mut &str) -> ModalResult<FieldAttr> {
    ws.parse_next(input)?;
    alt((
        named_attr("exclusive", "partner field name").map(FieldAttr::Exclusive),
        named_attr("range", "range operator name").map(FieldAttr::Range),
        "toggle".value(FieldAttr::Toggle),
        "numeric".value(FieldAttr::Numeric),
    ))
    .parse_next(input)
}

fn apply_attrs(attrs: Vec<FieldAttr>) -> (Option<String>, FieldSemantic) {
    let mut exclusive_with = None;
    let mut semantic = FieldSemantic::Text;
    for attr in attrs {
        match attr {
            FieldAttr::Exclusive(partner) => exclusive_with = Some(partner),
            FieldAttr::Toggle => semantic = FieldSemantic::Toggle,
            FieldAttr::Numeric => {
                if !matches!(semantic, FieldSemantic::Numeric { .. }) {
                    semantic = FieldSemantic::Numeric {
                        range_operator: None,
                    };
                }
            }
            FieldAttr::Range(op) => {
                semantic = FieldSemantic::Numeric {
                    range_operator: Some(op),
                };
            }
        }
    }
    (exclusive_with, semantic)
}

// -- Field definitions ------------------------------------------------------

fn priority_annotation(input: &mut &str) -> ModalResult<u32> {
    let n: i64 = delimited(
        (ws, '(', ws, "priority", ws),
        cut_err(dec_int::<_, i64, _>),
        (ws, cut_err(')')),
    )
    .parse_next(input)?;
    u32::try_from(n).map_err(|_| ErrMode::from_input(input).cut())
}

fn field_def(input: &mut &str) -> ModalResult<FieldDefinition> {
    ws.parse_next(input)?;
    "field".parse_next(input)?;
    ws.parse_next(input)?;

    let id = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "field name",
        )))
        .parse_next(input)?;
    let label = cut_err(label).parse_next(input)?;
    let priority = cut_err(priority_annotation)
        .context(StrContext::Expected(StrContextValue::Description(
            "(priority N)",
        )))
        .parse_next(input)?;
    let attrs: Vec<FieldAttr> = repeat(0.., field_attr).parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let operators: Vec<OperatorDefinition> = repeat(0.., operator_def).parse_next(input)?;
    let (exclusive_with, semantic) = apply_attrs(attrs);

    Ok(FieldDefinition {
        id: id.to_owned(),
        label,
        priority,
        operators,
        exclusive_with,
        semantic,
    })
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_catalog(input: &mut &str) -> ModalResult<ParsedCatalog> {
    let fields: Vec<FieldDefinition> = repeat(0.., field_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(ParsedCatalog { fields })
}
