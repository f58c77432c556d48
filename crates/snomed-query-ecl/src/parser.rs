//! ECL parser implementation using nom.
//!
//! The grammar is the SNOMED CT Expression Constraint Language restricted to
//! simple and singly-refined constraints, extended with the productions the
//! query builder must recognise in order to reject them by name:
//!
//! ```text
//! expressionConstraint := refinedConstraint ((connective | "^") refinedConstraint)*
//! refinedConstraint    := subExpression [":" refinement]
//! subExpression        := ["<" | "<<" | ">" | ">>"] ["^"] focus
//! focus                := conceptReference | "*" | "(" expressionConstraint ")"
//! refinement           := subRefinement [(conjunction subRefinement)+ | (disjunction subRefinement)+]
//! subRefinement        := attributeSet | "{" attributeSet "}" | "(" refinement ")"
//! attributeSet         := subAttributeSet [(conjunction subAttributeSet)+ | (disjunction subAttributeSet)+]
//! subAttributeSet      := attribute | "(" attributeSet ")"
//! attribute            := attributeName [comparison]   ; comparison required outside a set
//! attributeName        := conceptReference | "*"
//! comparison           := numericOp "#" number | ("=" | "!=") ["#"] quotedString
//!                       | ("=" | "!=") subExpression
//! ```
//!
//! Bracket nesting is limited to [`MAX_NESTING_DEPTH`] levels so that
//! adversarial input cannot exhaust the stack of the recursive descent.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until, take_while},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, map, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many1,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::ast::{
    Attribute, AttributeName, AttributeSet, Comparison, ConceptReference, ConstraintOperator,
    EclExpression, ExpressionComparisonOperator, Focus, NumericComparisonOperator, Refinement,
    SubExpression,
};
use crate::error::{EclError, EclResult};

/// Deepest `(`/`{` nesting [`parse`] accepts.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parse an ECL expression string into a syntax tree.
///
/// Constructs outside the supported subset (compound constraints, attribute
/// sets, member-of, concrete comparisons) parse successfully; they are
/// rejected later by [`QueryBuilder`](crate::QueryBuilder). Only malformed
/// input is an error here.
///
/// # Examples
///
/// ```rust
/// use snomed_query_ecl::{parse, EclExpression};
///
/// let expr = parse("<< 404684003 |Clinical finding|").unwrap();
/// assert!(matches!(expr, EclExpression::Simple(_)));
///
/// // Recognised, even though the builder will reject it
/// let expr = parse("< 19829001 AND < 301867009").unwrap();
/// assert!(matches!(expr, EclExpression::And(_, _)));
/// ```
pub fn parse(input: &str) -> EclResult<EclExpression> {
    let input = input.trim();
    if input.is_empty() {
        return Err(EclError::EmptyExpression);
    }
    check_nesting(input)?;

    match all_consuming(expression_constraint)(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            Err(EclError::ParseError {
                position,
                message: format!("unexpected input at: '{}'", truncate(e.input, 20)),
            })
        }
        // Only complete-input parsers are used, so running out means the
        // expression stopped early.
        Err(nom::Err::Incomplete(_)) => Err(EclError::ParseError {
            position: input.len(),
            message: "unexpected end of input".to_string(),
        }),
    }
}

/// Rejects input whose brackets nest deeper than [`MAX_NESTING_DEPTH`].
///
/// Brackets inside `|term|` and `"string"` literals are not counted.
fn check_nesting(input: &str) -> EclResult<()> {
    let mut depth = 0usize;
    let mut in_term = false;
    let mut in_string = false;

    for (position, ch) in input.char_indices() {
        match ch {
            '|' if !in_string => in_term = !in_term,
            '"' if !in_term => in_string = !in_string,
            _ if in_term || in_string => {}
            '(' | '{' => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(EclError::NestingTooDeep {
                        position,
                        limit: MAX_NESTING_DEPTH,
                    });
                }
            }
            ')' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ============================================================================
// Top-level expression constraint
// ============================================================================

fn expression_constraint(input: &str) -> IResult<&str, EclExpression> {
    delimited(ws, compound_or_refined, ws)(input)
}

fn compound_or_refined(input: &str) -> IResult<&str, EclExpression> {
    // The refinement binds tighter than compound connectives, so it is
    // parsed first and the tail only sees what the refinement left behind.
    let (input, first) = refined_constraint(input)?;
    compound_tail(input, first)
}

fn compound_tail(mut input: &str, mut left: EclExpression) -> IResult<&str, EclExpression> {
    loop {
        let result = alt((
            preceded(mws, word_compound_operator),
            preceded(ws, comma_operator),
            preceded(ws, member_of_operator),
        ))(input);

        let Ok((remaining, op)) = result else {
            return Ok((input, left));
        };
        let (remaining, right) = preceded(ws, refined_constraint)(remaining)?;
        // Left associative
        left = match op {
            CompoundOp::And => EclExpression::And(Box::new(left), Box::new(right)),
            CompoundOp::Or => EclExpression::Or(Box::new(left), Box::new(right)),
            CompoundOp::Minus => EclExpression::Minus(Box::new(left), Box::new(right)),
            CompoundOp::MemberOf => EclExpression::MemberOf(Box::new(left), Box::new(right)),
        };
        input = remaining;
    }
}

#[derive(Debug, Clone, Copy)]
enum CompoundOp {
    And,
    Or,
    Minus,
    MemberOf,
}

fn word_compound_operator(input: &str) -> IResult<&str, CompoundOp> {
    alt((
        value(CompoundOp::And, tag_no_case("AND")),
        value(CompoundOp::Or, tag_no_case("OR")),
        value(CompoundOp::Minus, tag_no_case("MINUS")),
    ))(input)
}

fn comma_operator(input: &str) -> IResult<&str, CompoundOp> {
    value(CompoundOp::And, tag(","))(input)
}

/// Infix `^`, as in `73211009 ^ 700043003`.
fn member_of_operator(input: &str) -> IResult<&str, CompoundOp> {
    value(CompoundOp::MemberOf, char('^'))(input)
}

/// Parse `subExpression [":" refinement]`.
fn refined_constraint(input: &str) -> IResult<&str, EclExpression> {
    let (remaining, focus) = sub_expression(input)?;

    // Only consume whitespace when a refinement actually follows
    let trimmed = remaining.trim_start();
    if trimmed.starts_with(':') {
        let (rest, _) = ws(remaining)?;
        let (rest, _) = char(':')(rest)?;
        let (rest, _) = ws(rest)?;
        let (rest, refinement) = refinement(rest)?;
        Ok((rest, EclExpression::Refined { focus, refinement }))
    } else {
        Ok((remaining, EclExpression::Simple(focus)))
    }
}

// ============================================================================
// Sub-expression and focus
// ============================================================================

fn sub_expression(input: &str) -> IResult<&str, SubExpression> {
    let (input, operator) = opt(terminated(constraint_operator, ws))(input)?;
    let (input, member_of) = opt(terminated(char('^'), ws))(input)?;
    let (input, focus) = focus(input)?;

    Ok((
        input,
        SubExpression {
            operator,
            member_of: member_of.is_some(),
            focus,
        },
    ))
}

fn constraint_operator(input: &str) -> IResult<&str, ConstraintOperator> {
    alt((
        // Longer matches first
        value(ConstraintOperator::DescendantOrSelfOf, tag("<<")),
        value(ConstraintOperator::DescendantOf, tag("<")),
        value(ConstraintOperator::AncestorOrSelfOf, tag(">>")),
        value(ConstraintOperator::AncestorOf, tag(">")),
    ))(input)
}

fn focus(input: &str) -> IResult<&str, Focus> {
    alt((
        value(Focus::Wildcard, char('*')),
        map(concept_reference, Focus::Concept),
        map(
            delimited(
                pair(char('('), ws),
                compound_or_refined,
                pair(ws, char(')')),
            ),
            |inner| Focus::Nested(Box::new(inner)),
        ),
    ))(input)
}

fn concept_reference(input: &str) -> IResult<&str, ConceptReference> {
    let (input, digits) = digit1(input)?;
    let (input, term) = opt(preceded(ws, term_in_pipes))(input)?;

    Ok((
        input,
        ConceptReference {
            concept_id: digits.to_string(),
            term,
        },
    ))
}

fn term_in_pipes(input: &str) -> IResult<&str, String> {
    let (input, _) = char('|')(input)?;
    let (input, term) = take_while(|c| c != '|')(input)?;
    let (input, _) = char('|')(input)?;

    Ok((input, term.trim().to_string()))
}

// ============================================================================
// Whitespace handling
// ============================================================================

/// Optional whitespace
fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

/// Mandatory whitespace
fn mws(input: &str) -> IResult<&str, &str> {
    multispace1(input)
}

fn conjunction(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(mws, tag_no_case("AND"), ws),
        delimited(ws, tag(","), ws),
    ))(input)
}

fn disjunction(input: &str) -> IResult<&str, &str> {
    delimited(mws, tag_no_case("OR"), ws)(input)
}

// =============================================================================
// Refinement Parsing
// =============================================================================

fn refinement(input: &str) -> IResult<&str, Refinement> {
    let (input, first) = sub_refinement(input)?;

    if let Ok((rest, more)) = many1(preceded(conjunction, sub_refinement))(input) {
        let mut items = Vec::with_capacity(more.len() + 1);
        items.push(first);
        items.extend(more);
        return Ok((rest, Refinement::Conjunction(items)));
    }
    if let Ok((rest, more)) = many1(preceded(disjunction, sub_refinement))(input) {
        let mut items = Vec::with_capacity(more.len() + 1);
        items.push(first);
        items.extend(more);
        return Ok((rest, Refinement::Disjunction(items)));
    }

    Ok((input, first))
}

fn sub_refinement(input: &str) -> IResult<&str, Refinement> {
    alt((
        map(attribute_set, Refinement::Attributes),
        map(attribute_group, Refinement::Group),
        map(
            delimited(pair(char('('), ws), refinement, pair(ws, char(')'))),
            |inner| Refinement::Nested(Box::new(inner)),
        ),
    ))(input)
}

/// Parse an attribute group: `{ attributeSet }`
fn attribute_group(input: &str) -> IResult<&str, AttributeSet> {
    delimited(pair(char('{'), ws), attribute_set, pair(ws, char('}')))(input)
}

fn attribute_set(input: &str) -> IResult<&str, AttributeSet> {
    let start = input;
    let (input, first) = sub_attribute_set(input)?;

    if let Ok((rest, more)) = many1(preceded(conjunction, sub_attribute_set))(input) {
        let mut items = Vec::with_capacity(more.len() + 1);
        items.push(first);
        items.extend(more);
        return Ok((rest, AttributeSet::Conjunction(items)));
    }
    if let Ok((rest, more)) = many1(preceded(disjunction, sub_attribute_set))(input) {
        let mut items = Vec::with_capacity(more.len() + 1);
        items.push(first);
        items.extend(more);
        return Ok((rest, AttributeSet::Disjunction(items)));
    }

    // A name without a comparison may only appear as a set member
    if matches!(first, AttributeSet::Name(_)) {
        return Err(nom::Err::Error(Error::new(start, ErrorKind::Verify)));
    }
    Ok((input, first))
}

fn sub_attribute_set(input: &str) -> IResult<&str, AttributeSet> {
    alt((
        map(attribute, AttributeSet::Attribute),
        map(attribute_name, AttributeSet::Name),
        map(
            delimited(pair(char('('), ws), attribute_set, pair(ws, char(')'))),
            |inner| AttributeSet::Nested(Box::new(inner)),
        ),
    ))(input)
}

fn attribute_name(input: &str) -> IResult<&str, AttributeName> {
    alt((
        value(AttributeName::Wildcard, char('*')),
        map(concept_reference, AttributeName::Concept),
    ))(input)
}

/// Parse a single attribute: `name operator value`.
fn attribute(input: &str) -> IResult<&str, Attribute> {
    let (input, name) = attribute_name(input)?;
    let (input, _) = ws(input)?;
    let (input, comparison) = comparison(input)?;

    Ok((input, Attribute { name, comparison }))
}

fn comparison(input: &str) -> IResult<&str, Comparison> {
    alt((
        numeric_comparison,
        string_comparison,
        expression_comparison,
    ))(input)
}

fn expression_operator(input: &str) -> IResult<&str, ExpressionComparisonOperator> {
    alt((
        value(ExpressionComparisonOperator::NotEqual, tag("!=")),
        value(ExpressionComparisonOperator::Equal, char('=')),
    ))(input)
}

fn numeric_operator(input: &str) -> IResult<&str, NumericComparisonOperator> {
    alt((
        value(NumericComparisonOperator::LessThanOrEqual, tag("<=")),
        value(NumericComparisonOperator::GreaterThanOrEqual, tag(">=")),
        value(NumericComparisonOperator::NotEqual, tag("!=")),
        value(NumericComparisonOperator::Equal, char('=')),
        value(NumericComparisonOperator::LessThan, char('<')),
        value(NumericComparisonOperator::GreaterThan, char('>')),
    ))(input)
}

/// `>= #10`, `= #-3.5`
fn numeric_comparison(input: &str) -> IResult<&str, Comparison> {
    let (input, operator) = numeric_operator(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char('#')(input)?;
    let (input, number) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;

    Ok((
        input,
        Comparison::Numeric {
            operator,
            value: number.to_string(),
        },
    ))
}

/// `= "text"`, `!= #"text"`
fn string_comparison(input: &str) -> IResult<&str, Comparison> {
    let (input, operator) = expression_operator(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = opt(char('#'))(input)?;
    let (input, value) = quoted_string(input)?;

    Ok((input, Comparison::String { operator, value }))
}

/// `= 39057004`, `!= << 39057004`
fn expression_comparison(input: &str) -> IResult<&str, Comparison> {
    let (input, operator) = expression_operator(input)?;
    let (input, _) = ws(input)?;
    let (input, value) = sub_expression(input)?;

    Ok((input, Comparison::Expression { operator, value }))
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let (input, content) = take_until("\"")(input)?;
    let (input, _) = char('"')(input)?;
    Ok((input, content.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
