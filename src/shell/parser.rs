use super::command::*;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseErr {
    EmptyLine,
    UnknownCommand(String),
    IncorrectNArguments(String, usize, usize),
    InvalidDirection(String),
}

pub struct Parser {
}

impl Parser {
    fn lex(&self, command: &str) -> Vec<Token> {
        let mut words = command.split_whitespace();
        let head = words.next().map(|lexeme| match lexeme.to_ascii_lowercase().as_str() {
            "1" | "lookup" => Token::Lookup,
            "2" | "add" => Token::Add,
            "3" | "average" => Token::Average,
            "4" | "list" => Token::List,
            "5" | "quit" | "exit" => Token::Quit,
            "help" | "?" => Token::Help,
            _ => Token::String(lexeme.to_string()),
        });
        head.into_iter()
            .chain(words.map(|lexeme| Token::String(lexeme.to_string())))
            .collect()
    }

    pub fn parse(&mut self, code: &str) -> Result<Command, ParseErr> {
        let tokens = self.lex(code);
        if tokens.is_empty() { return Err(ParseErr::EmptyLine) }
        let args = tokens.len() - 1;

        match tokens[0] {
            Token::Lookup => {
                if args > 1 {
                    return Err(ParseErr::IncorrectNArguments("lookup".to_string(), args, 1));
                }
                Ok(Command::Lookup { rollno: tokens.get(1).map(|t| t.as_string()) })
            },
            Token::List => {
                if args > 2 {
                    return Err(ParseErr::IncorrectNArguments("list".to_string(), args, 2));
                }
                let ascending = match tokens.get(2) {
                    Some(token) => {
                        let word = token.as_string();
                        Some(parse_direction(&word).ok_or(ParseErr::InvalidDirection(word))?)
                    }
                    None => None,
                };
                Ok(Command::List { column: tokens.get(1).map(|t| t.as_string()), ascending })
            },
            Token::Add | Token::Average | Token::Help | Token::Quit => {
                if args != 0 {
                    return Err(ParseErr::IncorrectNArguments(tokens[0].as_string(), args, 0));
                }
                Ok(match tokens[0] {
                    Token::Add => Command::Add,
                    Token::Average => Command::Average,
                    Token::Help => Command::Help,
                    _ => Command::Quit,
                })
            },
            Token::String(ref unknown) => Err(ParseErr::UnknownCommand(unknown.clone())),
        }
    }
}

/// Reads a sort direction answer. A blank answer means ascending.
pub fn parse_direction(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" | "true" | "asc" | "ascending" => Some(true),
        "n" | "no" | "false" | "desc" | "descending" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub(crate) enum Token {
    String(String),

    Lookup,
    Add,
    Average,
    List,
    Help,
    Quit,
}

impl Token {
    pub fn as_string(&self) -> String {
        match self {
            Token::String(string) => string.to_string(),
            Token::Lookup => "lookup".to_string(),
            Token::Add => "add".to_string(),
            Token::Average => "average".to_string(),
            Token::List => "list".to_string(),
            Token::Help => "help".to_string(),
            Token::Quit => "quit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, ParseErr> {
        Parser {}.parse(line)
    }

    #[test]
    fn commands_and_aliases() {
        assert_eq!(parse("lookup 12"), Ok(Command::Lookup { rollno: Some("12".to_string()) }));
        assert_eq!(parse("1"), Ok(Command::Lookup { rollno: None }));
        assert_eq!(parse("ADD"), Ok(Command::Add));
        assert_eq!(parse("3"), Ok(Command::Average));
        assert_eq!(parse("  exit "), Ok(Command::Quit));
        assert_eq!(parse("5"), Ok(Command::Quit));
        assert_eq!(parse("?"), Ok(Command::Help));
    }

    #[test]
    fn arguments_keep_their_case() {
        // The command word is case-insensitive, arguments are not.
        assert_eq!(parse("lookup A7"), Ok(Command::Lookup { rollno: Some("A7".to_string()) }));
        assert_eq!(parse("list add"), Ok(Command::List { column: Some("add".to_string()), ascending: None }));
    }

    #[test]
    fn list_direction() {
        assert_eq!(
            parse("list Rollno desc"),
            Ok(Command::List { column: Some("Rollno".to_string()), ascending: Some(false) })
        );
        assert_eq!(
            parse("4 name y"),
            Ok(Command::List { column: Some("name".to_string()), ascending: Some(true) })
        );
        assert_eq!(parse("list name sideways"), Err(ParseErr::InvalidDirection("sideways".to_string())));
    }

    #[test]
    fn errors() {
        assert_eq!(parse("   "), Err(ParseErr::EmptyLine));
        assert_eq!(parse("delete 3"), Err(ParseErr::UnknownCommand("delete".to_string())));
        assert_eq!(parse("average now"), Err(ParseErr::IncorrectNArguments("average".to_string(), 1, 0)));
        assert_eq!(parse("lookup 1 2"), Err(ParseErr::IncorrectNArguments("lookup".to_string(), 2, 1)));
    }

    #[test]
    fn very_long_lines_are_counted() {
        let line = format!("lookup {}", vec!["x"; 299].join(" "));
        assert_eq!(parse(&line), Err(ParseErr::IncorrectNArguments("lookup".to_string(), 299, 1)));

        let line = format!("add {}", vec!["x"; 256].join(" "));
        assert_eq!(parse(&line), Err(ParseErr::IncorrectNArguments("add".to_string(), 256, 0)));
    }

    #[test]
    fn directions() {
        assert_eq!(parse_direction(""), Some(true));
        assert_eq!(parse_direction("Yes"), Some(true));
        assert_eq!(parse_direction("N"), Some(false));
        assert_eq!(parse_direction("maybe"), None);
    }
}
