use std::io::{self, BufRead};

use clap::Parser;
use clap::Subcommand;
use miette::IntoDiagnostic;
use miette::WrapErr;
use roman_calculator::Reply;
use roman_calculator::Session;
use roman_calculator::lex;
use roman_calculator::session::{self, BANNER};

/// A desk calculator for Roman numerals, with the letter O for zero.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Do not print the welcome text.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Also print a full report, pointing at the faulty character, to stderr
    /// for every line with an error.
    #[arg(short, long, global = true)]
    diagnostics: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the tokens of one line.
    Tokenize { expression: String },
    /// Evaluate each argument as a line of the same session.
    Eval {
        #[arg(required = true)]
        expressions: Vec<String>,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    match args.command {
        None => {
            if !args.quiet {
                for line in BANNER {
                    println!("[] {line}");
                }
            }

            let mut session = Session::new();
            for line in io::stdin().lock().lines() {
                let line = line
                    .into_diagnostic()
                    .wrap_err("reading a line from stdin failed")?;
                if !respond(session.process(&line), args.diagnostics) {
                    break;
                }
            }
        }
        Some(Commands::Tokenize { expression }) => {
            let line = match session::normalize(&expression) {
                Ok(line) => line,
                Err(reply) => {
                    println!("[] {reply}");
                    return Ok(());
                }
            };

            for token in lex::Lexer::new(&line) {
                let token = match token {
                    Ok(token) => token,
                    Err(e) => {
                        eprintln!("[] {e}");
                        if args.diagnostics {
                            eprintln!("{:?}", miette::Report::new(e));
                        }
                        std::process::exit(65);
                    }
                };
                println!("{token}");
            }
        }
        Some(Commands::Eval { expressions }) => {
            let mut session = Session::new();
            let mut failed = false;
            for expression in &expressions {
                let reply = session.process(expression);
                failed |= reply.is_error();
                if !respond(reply, args.diagnostics) {
                    break;
                }
            }
            if failed {
                std::process::exit(65);
            }
        }
    }
    Ok(())
}

/// Prints a reply. Returns `false` once the session should end.
fn respond(reply: Reply, diagnostics: bool) -> bool {
    println!("[] {reply}");
    match reply {
        Reply::Quit => false,
        Reply::Error(e) if diagnostics => {
            eprintln!("{:?}", miette::Report::new(e));
            true
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_line_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_subcommands_and_flags() {
        let args = Args::try_parse_from(["roman_calculator", "--quiet"]).unwrap();
        assert!(args.quiet);
        assert!(args.command.is_none());

        let args = Args::try_parse_from(["roman_calculator", "tokenize", "xiv + i"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Tokenize { expression }) if expression == "xiv + i"
        ));

        let args =
            Args::try_parse_from(["roman_calculator", "eval", "V", "+ III", "--diagnostics"])
                .unwrap();
        assert!(args.diagnostics);
        assert!(matches!(
            args.command,
            Some(Commands::Eval { expressions }) if expressions == ["V", "+ III"]
        ));

        assert!(Args::try_parse_from(["roman_calculator", "eval"]).is_err());
    }
}
