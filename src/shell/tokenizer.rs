/// Upper bound on words kept from one line when nothing else is configured.
pub const MAX_WORDS: usize = 512;

pub type Token = String;

/// Split `line` into words.
///
/// Words are separated by whitespace. A backslash takes the next character
/// literally, so `a\ b` is one word. A word starting with `#` ends the line.
/// Words past `max_words` are dropped.
pub fn tokenize(line: &str, max_words: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        match chars.peek() {
            None | Some('#') => break,
            Some(_) if tokens.len() == max_words => {
                log::warn!("line has more than {} words, ignoring the rest", max_words);
                break;
            }
            Some(_) => {}
        }

        let mut token = Token::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            if c == '\\' {
                // a trailing backslash escapes nothing
                if let Some(escaped) = chars.next() {
                    token.push(escaped);
                }
            } else {
                token.push(c);
            }
        }
        tokens.push(token);
    }

    log::debug!("tokenized {:?}", tokens);
    tokens
}
