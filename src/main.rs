use clap::{Parser as ClapParser, Subcommand};
use sorrel_lang::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sorrel")]
#[command(about = "Sorrel - a small expression language with selection, projection and templates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and evaluate an expression
    Eval {
        /// The expression to evaluate
        expression: String,

        /// JSON root value (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the token stream of an expression
    Tokens {
        /// The expression to tokenize
        expression: String,
    },

    /// Print the parsed tree and canonical rendering of an expression
    Ast {
        /// The expression to parse
        expression: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            input,
            pretty,
            syntax_only,
        } => run_eval(expression, input, pretty, syntax_only),
        Commands::Tokens { expression } => match cli::render_tokens(&expression) {
            Ok(output) => {
                print!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Ast { expression } => match cli::outline_tree(&expression) {
            Ok(output) => {
                print!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    expression: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        expression,
        input,
        pretty,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .map_err(CliError::Json)?;
            println!("{}", json);
        }
    }
    Ok(())
}
