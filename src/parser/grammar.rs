use super::lexer::{Lexer, Located, Token};
use crate::error::SchemaError;
use crate::schema::SchemaDef;

/// Parse schema text into a [`SchemaDef`]. The whole input must be one node.
pub fn parse_schema(input: &str) -> Result<SchemaDef, SchemaError> {
    let mut lexer = Lexer::new(input);
    let root = parse_node(&mut lexer)?;

    let tok = lexer.next_token();
    if tok.token != Token::Eof {
        return Err(unexpected(&tok, "end of input"));
    }
    Ok(root)
}

fn unexpected(tok: &Located, expected: &str) -> SchemaError {
    let found = match &tok.token {
        Token::Eof => "end of input".to_string(),
        Token::Unterminated => "unterminated string".to_string(),
        Token::Unexpected(c) => format!("'{}'", c),
        other => format!("{:?}", other),
    };
    SchemaError::Syntax {
        line: tok.line,
        message: format!("expected {}, found {}", expected, found),
    }
}

fn parse_node(lexer: &mut Lexer) -> Result<SchemaDef, SchemaError> {
    let tok = lexer.next_token();
    match tok.token {
        Token::LBrace => parse_mapping(lexer),
        Token::LBracket => parse_sequence(lexer),
        Token::Name(name) | Token::Quoted(name) => Ok(SchemaDef::Type(name)),
        _ => Err(unexpected(&tok, "'{', '[' or a type name")),
    }
}

fn parse_mapping(lexer: &mut Lexer) -> Result<SchemaDef, SchemaError> {
    let mut fields = Vec::new();

    loop {
        let tok = lexer.next_token();
        let key = match tok.token {
            Token::RBrace => break,
            Token::Name(name) | Token::Quoted(name) => name,
            _ => return Err(unexpected(&tok, "field name or '}'")),
        };

        let colon = lexer.next_token();
        if colon.token != Token::Colon {
            return Err(unexpected(&colon, "':'"));
        }

        fields.push((key, parse_node(lexer)?));

        let sep = lexer.next_token();
        match sep.token {
            Token::Comma => {}
            Token::RBrace => break,
            _ => return Err(unexpected(&sep, "',' or '}'")),
        }
    }

    Ok(SchemaDef::Map(fields))
}

fn parse_sequence(lexer: &mut Lexer) -> Result<SchemaDef, SchemaError> {
    let mut items = Vec::new();

    loop {
        if lexer.peek_token().token == Token::RBracket {
            lexer.next_token();
            break;
        }

        items.push(parse_node(lexer)?);

        let sep = lexer.next_token();
        match sep.token {
            Token::Comma => {}
            Token::RBracket => break,
            _ => return Err(unexpected(&sep, "',' or ']'")),
        }
    }

    Ok(SchemaDef::Seq(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player() {
        let def = parse_schema(
            r#"
            {
                health: varuint,
                jumping: boolean,
                position: [ int16 ],
                attributes: { str: uint8, agi: uint8, int: uint8 },
            }
        "#,
        )
        .unwrap();
        assert_eq!(
            def,
            SchemaDef::map([
                ("health", SchemaDef::ty("varuint")),
                ("jumping", SchemaDef::ty("boolean")),
                ("position", SchemaDef::seq([SchemaDef::ty("int16")])),
                (
                    "attributes",
                    SchemaDef::map([
                        ("str", SchemaDef::ty("uint8")),
                        ("agi", SchemaDef::ty("uint8")),
                        ("int", SchemaDef::ty("uint8")),
                    ])
                ),
            ])
        );
    }

    #[test]
    fn test_parse_json_document() {
        let def = parse_schema(r#"[ { "name": "string", "numbers": [ "varint" ], "age": "uint8" } ]"#)
            .unwrap();
        match def {
            SchemaDef::Seq(items) => {
                assert_eq!(items.len(), 1);
                assert!(matches!(&items[0], SchemaDef::Map(fields) if fields.len() == 3));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_bare_type_and_empty_containers() {
        assert_eq!(parse_schema(" string ").unwrap(), SchemaDef::ty("string"));
        assert_eq!(parse_schema("{}").unwrap(), SchemaDef::Map(vec![]));
        assert_eq!(parse_schema("[ ]").unwrap(), SchemaDef::Seq(vec![]));
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse_schema("{\n  a: uint8\n  b: uint8\n}").unwrap_err();
        match err {
            SchemaError::Syntax { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("',' or '}'"), "{}", message);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            parse_schema("{ a uint8 }"),
            Err(SchemaError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            parse_schema("uint8 uint8"),
            Err(SchemaError::Syntax { .. })
        ));
        assert!(matches!(parse_schema("[uint8"), Err(SchemaError::Syntax { .. })));
        assert!(matches!(parse_schema("{ 'a: x }"), Err(SchemaError::Syntax { .. })));
    }
}
