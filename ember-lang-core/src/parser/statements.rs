use crate::ast::{BlockStatement, Identifier, LetStatement, ReturnStatement, Statement};
use crate::lexer::TokenKind;
use crate::parser::expressions::{parse_expression, parse_sequence, Precedence};
use crate::parser::{ParseError, Parser};

pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.peek().kind {
        TokenKind::Let => Ok(Statement::Let(parse_let_statement(parser)?)),
        TokenKind::Return => Ok(Statement::Return(parse_return_statement(parser)?)),
        _ => Ok(Statement::Expression(parse_expression_statement(parser)?)),
    }
}

fn parse_let_statement(parser: &mut Parser) -> Result<LetStatement, ParseError> {
    parser.expect_token(TokenKind::Let)?;
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser, Precedence::Lowest)?;
    expect_terminator(parser)?;

    Ok(LetStatement {
        identifier: Identifier { name },
        value,
    })
}

fn parse_return_statement(parser: &mut Parser) -> Result<ReturnStatement, ParseError> {
    parser.expect_token(TokenKind::Return)?;
    let value = parse_expression(parser, Precedence::Lowest)?;
    expect_terminator(parser)?;

    Ok(ReturnStatement { value })
}

/// `let` and `return` must be followed by `;`, even at the end of a block or
/// of the input. The `;` itself is consumed as the statement separator.
fn expect_terminator(parser: &mut Parser) -> Result<(), ParseError> {
    if parser.peek_is(&TokenKind::SemiColon) {
        Ok(())
    } else {
        Err(ParseError::unexpected_token(TokenKind::SemiColon, parser.peek()))
    }
}

fn parse_expression_statement(parser: &mut Parser) -> Result<crate::ast::Expression, ParseError> {
    parse_expression(parser, Precedence::Lowest)
}

/// `{` statements separated by `;` `}`.
pub(crate) fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    parser.expect_token(TokenKind::LBrace)?;
    parser.open_brace();
    let statements = parse_sequence(
        parser,
        parse_statement,
        TokenKind::SemiColon,
        TokenKind::RBrace,
    )?;
    parser.close_brace();
    Ok(BlockStatement { statements })
}
