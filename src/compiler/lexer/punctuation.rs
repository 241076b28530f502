use crate::compiler::tokens::{Punctuation, Token, TokenKind};

use super::Lexer;

impl<'a> Lexer<'a> {
    fn push_punctuation(&mut self, punct: Punctuation, chars_consumed: usize) {
        let start = self.cursor;
        for _ in 0..chars_consumed {
            self.bump();
        }
        let span = self.span_from(start);
        self.tokens.push(Token::new(TokenKind::Punctuation(punct), span));
    }

    /// Longest match first; returns false when no punctuation starts here.
    pub fn check_punctuation(&mut self) -> bool {
        use crate::compiler::tokens::Punctuation::*;

        macro_rules! check_punct {
            ($str:expr, $punct:expr) => {{
                let matches = $str.chars().enumerate().all(|(i, expected)| self.peek_at(i) == Some(expected));
                if matches {
                    self.push_punctuation($punct, $str.chars().count());
                    return true;
                }
            }};
        }

        check_punct!("<<=", ShiftLeftEq);
        check_punct!(">>=", ShiftRightEq);

        check_punct!("&&", AmpAmp);
        check_punct!("||", PipePipe);
        check_punct!("==", EqEq);
        check_punct!("!=", NotEq);
        check_punct!("<=", LessThanOrEq);
        check_punct!(">=", GreaterThanOrEq);
        check_punct!("<<", ShiftLeft);
        check_punct!(">>", ShiftRight);
        check_punct!("++", PlusPlus);
        check_punct!("--", MinusMinus);
        check_punct!("+=", PlusEq);
        check_punct!("-=", MinusEq);
        check_punct!("*=", StarEq);
        check_punct!("/=", SlashEq);
        check_punct!("%=", PercentEq);
        check_punct!("&=", AmpEq);
        check_punct!("|=", PipeEq);
        check_punct!("^=", CaretEq);

        check_punct!("(", OpenParen);
        check_punct!(")", CloseParen);
        check_punct!("{", OpenBrace);
        check_punct!("}", CloseBrace);
        check_punct!("[", OpenBracket);
        check_punct!("]", CloseBracket);
        check_punct!(",", Comma);
        check_punct!(":", Colon);
        check_punct!(";", Semicolon);
        check_punct!("#", Hash);
        check_punct!("!", Bang);
        check_punct!("+", Plus);
        check_punct!("-", Minus);
        check_punct!("*", Star);
        check_punct!("/", Slash);
        check_punct!("%", Percent);
        check_punct!("=", Eq);
        check_punct!("<", LessThan);
        check_punct!(">", GreaterThan);
        check_punct!("&", Amp);
        check_punct!("|", Pipe);
        check_punct!("^", Caret);

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Interner;
    use crate::compiler::tokens::Punctuation::*;
    use crate::compiler::tokens::TokenKind::*;

    #[test]
    fn test_lex_punctuation() {
        let mut interner = Interner::new();
        let file = interner.get_or_intern("");
        let contents = r#"&&  !=  == <=
>=   ||    &    !
*    =  <>    |    ) (
    {   }  [  ]   , :
;   /   %   +   -
<<= >>= << >> ++ -- += -= *= /= %= &= |= ^= ^ #"#;
        let mut lexer = Lexer::new(&mut interner, file);

        lexer.tokenize(contents.chars().collect());

        let expected_tokens = vec![
            (Punctuation(AmpAmp), 1, (1, 2)),
            (Punctuation(NotEq), 1, (5, 6)),
            (Punctuation(EqEq), 1, (9, 10)),
            (Punctuation(LessThanOrEq), 1, (12, 13)),
            (Punctuation(GreaterThanOrEq), 2, (1, 2)),
            (Punctuation(PipePipe), 2, (6, 7)),
            (Punctuation(Amp), 2, (12, 12)),
            (Punctuation(Bang), 2, (17, 17)),
            (Punctuation(Star), 3, (1, 1)),
            (Punctuation(Eq), 3, (6, 6)),
            (Punctuation(LessThan), 3, (9, 9)),
            (Punctuation(GreaterThan), 3, (10, 10)),
            (Punctuation(Pipe), 3, (15, 15)),
            (Punctuation(CloseParen), 3, (20, 20)),
            (Punctuation(OpenParen), 3, (22, 22)),
            (Punctuation(OpenBrace), 4, (5, 5)),
            (Punctuation(CloseBrace), 4, (9, 9)),
            (Punctuation(OpenBracket), 4, (12, 12)),
            (Punctuation(CloseBracket), 4, (15, 15)),
            (Punctuation(Comma), 4, (19, 19)),
            (Punctuation(Colon), 4, (21, 21)),
            (Punctuation(Semicolon), 5, (1, 1)),
            (Punctuation(Slash), 5, (5, 5)),
            (Punctuation(Percent), 5, (9, 9)),
            (Punctuation(Plus), 5, (13, 13)),
            (Punctuation(Minus), 5, (17, 17)),
            (Punctuation(ShiftLeftEq), 6, (1, 3)),
            (Punctuation(ShiftRightEq), 6, (5, 7)),
            (Punctuation(ShiftLeft), 6, (9, 10)),
            (Punctuation(ShiftRight), 6, (12, 13)),
            (Punctuation(PlusPlus), 6, (15, 16)),
            (Punctuation(MinusMinus), 6, (18, 19)),
            (Punctuation(PlusEq), 6, (21, 22)),
            (Punctuation(MinusEq), 6, (24, 25)),
            (Punctuation(StarEq), 6, (27, 28)),
            (Punctuation(SlashEq), 6, (30, 31)),
            (Punctuation(PercentEq), 6, (33, 34)),
            (Punctuation(AmpEq), 6, (36, 37)),
            (Punctuation(PipeEq), 6, (39, 40)),
            (Punctuation(CaretEq), 6, (42, 43)),
            (Punctuation(Caret), 6, (45, 45)),
            (Punctuation(Hash), 6, (47, 47)),
        ];

        let tokens = lexer
            .tokens
            .iter()
            .map(|t| (t.kind, t.span.start.0, (t.span.start.1, t.span.end.1)))
            .collect::<Vec<_>>();

        assert!(lexer.errors.is_empty());
        assert_eq!(lexer.tokens.len() - 1, expected_tokens.len());
        for (i, token) in expected_tokens.iter().enumerate() {
            assert_eq!(&tokens[i], token);
        }
    }
}
