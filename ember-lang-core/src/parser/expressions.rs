use super::error::{Expected, ParseError};
use super::statements::parse_block_statement;
use crate::ast::{Expression, Identifier, InfixOperationKind, PrefixOperationKind};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

type PrefixFunction = fn(Token, &mut Parser) -> Result<Expression, ParseError>;
type InfixFunction = fn(Token, Expression, &mut Parser) -> Result<Expression, ParseError>;

pub fn precedence_of(token: &TokenKind) -> Precedence {
    infix_parsing_function(token)
        .map(|(precedence, _)| precedence)
        .unwrap_or(Precedence::Lowest)
}

pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let Some(prefix) = prefix_parsing_function(&parser.peek().kind) else {
        return Err(ParseError::no_prefix_function(parser.peek()));
    };
    let token = parser.next_token();
    let mut left_expression = prefix(token, parser)?;

    loop {
        let next_kind = &parser.peek().kind;
        if *next_kind == TokenKind::SemiColon {
            break;
        }
        let Some((next_precedence, infix)) = infix_parsing_function(next_kind) else {
            break;
        };
        if precedence >= next_precedence {
            break;
        }

        let operator = parser.next_token();
        left_expression = infix(operator, left_expression, parser)?;
    }

    Ok(left_expression)
}

/// Parses `element (separator element)* separator? terminator`, consuming the
/// terminator. The opening token must already be consumed.
pub(crate) fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    separator: TokenKind,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    loop {
        if parser.peek_is(&terminator) {
            parser.next_token();
            return Ok(elements);
        }
        if parser.peek_is(&TokenKind::Eof) {
            return Err(ParseError::unexpected_token(terminator, parser.peek()));
        }
        elements.push(parse_element(parser)?);

        if parser.peek_is(&separator) {
            parser.next_token();
        } else if parser.peek_is(&terminator) {
            parser.next_token();
            return Ok(elements);
        } else {
            return Err(ParseError::unexpected_token(separator, parser.peek()));
        }
    }
}

fn parse_identifier(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::Ident(name) => Ok(Expression::Identifier(Identifier { name })),
        _ => Err(ParseError::unexpected_other(Expected::Identifier, &token)),
    }
}

fn parse_integer_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    match &token.kind {
        TokenKind::Int(literal) => literal
            .parse()
            .map(Expression::IntegerLiteral)
            .map_err(|_| ParseError::InvalidInteger {
                literal: literal.clone(),
                line: token.line,
            }),
        _ => Err(ParseError::unexpected_other(Expected::Expression, &token)),
    }
}

fn parse_string_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::String(value) => Ok(Expression::StringLiteral(value.to_string())),
        _ => Err(ParseError::unexpected_other(Expected::Expression, &token)),
    }
}

fn parse_boolean_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::BooleanLiteral(token.kind == TokenKind::True))
}

fn parse_prefix_operation(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let kind = match token.kind {
        TokenKind::Bang => PrefixOperationKind::Bang,
        _ => PrefixOperationKind::Minus,
    };
    Ok(Expression::PrefixOperation(
        kind,
        Box::new(parse_expression(parser, Precedence::Prefix)?),
    ))
}

fn parse_grouped_expression(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

fn parse_array_literal(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let expressions = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral(expressions))
}

fn parse_hash_literal(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.open_brace();
    let pairs = parse_sequence(
        parser,
        |parser| {
            let key = parse_expression(parser, Precedence::Lowest)?;
            parser.expect_token(TokenKind::Colon)?;
            let value = parse_expression(parser, Precedence::Lowest)?;
            Ok((key, value))
        },
        TokenKind::Comma,
        TokenKind::RBrace,
    )?;
    parser.close_brace();
    Ok(Expression::HashLiteral(pairs))
}

fn parse_if_expression(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);
    parser.expect_token(TokenKind::RParen)?;

    let consequence = parse_block_statement(parser)?;

    let alternative = if parser.peek_is(&TokenKind::Else) {
        parser.next_token();
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

fn parse_function_literal(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_ident().map(|name| Identifier { name }),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral {
        parameters,
        body: body.into(),
    })
}

fn prefix_parsing_function(token: &TokenKind) -> Option<PrefixFunction> {
    let function: PrefixFunction = match token {
        TokenKind::Ident(_) => parse_identifier,
        TokenKind::Int(_) => parse_integer_literal,
        TokenKind::String(_) => parse_string_literal,
        TokenKind::True | TokenKind::False => parse_boolean_literal,
        TokenKind::Bang | TokenKind::Minus => parse_prefix_operation,
        TokenKind::LParen => parse_grouped_expression,
        TokenKind::LBracket => parse_array_literal,
        TokenKind::LBrace => parse_hash_literal,
        TokenKind::If => parse_if_expression,
        TokenKind::Function => parse_function_literal,
        _ => return None,
    };
    Some(function)
}

fn infix_kind(token: &TokenKind) -> Option<InfixOperationKind> {
    use InfixOperationKind as InfixKind;

    match token {
        TokenKind::Plus => Some(InfixKind::Plus),
        TokenKind::Minus => Some(InfixKind::Minus),
        TokenKind::LessThan => Some(InfixKind::LessThan),
        TokenKind::GreaterThan => Some(InfixKind::GreaterThan),
        TokenKind::Equal => Some(InfixKind::Equal),
        TokenKind::NotEqual => Some(InfixKind::NotEqual),
        TokenKind::Asterisk => Some(InfixKind::Multiply),
        TokenKind::Slash => Some(InfixKind::Divide),
        _ => None,
    }
}

fn parse_infix_operation(
    operator: Token,
    left: Expression,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let Some(kind) = infix_kind(&operator.kind) else {
        return Err(ParseError::unexpected_other(Expected::Expression, &operator));
    };
    let precedence = precedence_of(&operator.kind);

    Ok(Expression::InfixOperation(
        kind,
        Box::new(left),
        Box::new(parse_expression(parser, precedence)?),
    ))
}

fn parse_call_expression(
    _token: Token,
    left: Expression,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        function: Box::new(left),
        arguments,
    })
}

fn parse_index_expression(
    _token: Token,
    left: Expression,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::IndexExpression {
        left: Box::new(left),
        index: Box::new(index),
    })
}

fn infix_parsing_function(token: &TokenKind) -> Option<(Precedence, InfixFunction)> {
    let entry: (Precedence, InfixFunction) = match token {
        TokenKind::Equal | TokenKind::NotEqual => (Precedence::Equals, parse_infix_operation),
        TokenKind::LessThan | TokenKind::GreaterThan => {
            (Precedence::LessGreater, parse_infix_operation)
        }
        TokenKind::Plus | TokenKind::Minus => (Precedence::Sum, parse_infix_operation),
        TokenKind::Asterisk | TokenKind::Slash => (Precedence::Product, parse_infix_operation),
        TokenKind::LParen => (Precedence::Call, parse_call_expression),
        TokenKind::LBracket => (Precedence::Index, parse_index_expression),
        _ => return None,
    };
    Some(entry)
}
