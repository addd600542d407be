use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use mython::lexer::Lexer;
use mython::token::Token;

/// Tokenizes a Mython source file (or stdin) and prints one token per line.
/// Parsing and evaluation are wired up by the host embedding the library.
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input_path = args.next();
    if args.next().is_some() {
        bail!("Only one input file is supported");
    }

    let source = if let Some(path) = input_path {
        fs::read_to_string(&path).with_context(|| format!("Reading {path}"))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    let mut lexer = Lexer::new(&source)?;
    loop {
        let token = lexer.current_token().clone();
        println!("{token}");
        if token == Token::Eof {
            return Ok(());
        }
        lexer.next_token()?;
    }
}
