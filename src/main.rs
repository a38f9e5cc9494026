use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};
use simp::{parse, tokenize, Interpreter};

fn main() -> Result<(), String> {
    simp::logging::init_tracing();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        run_repl().map_err(|err| err.to_string())?;
    } else {
        run_script(&args[1])?
    }
    Ok(())
}

fn run_script(filename: &str) -> Result<(), String> {
    let source = std::fs::read_to_string(filename)
        .map_err(|err| format!("{filename}: {err}"))?;
    let value = Interpreter::new()
        .run(&source)
        .map_err(|err| err.to_string())?;
    println!("{value}");
    Ok(())
}

/// What the interactive loop prints for each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReplSettings {
    tokens: bool,
    ast: bool,
    eval: bool,
}

impl Default for ReplSettings {
    fn default() -> Self {
        Self {
            tokens: false,
            ast: false,
            eval: true,
        }
    }
}

impl ReplSettings {
    /// Applies commands such as `tokens on` or `ast off`. Returns `false` when
    /// `line` is not a settings command.
    fn apply(&mut self, line: &str) -> bool {
        let mut words = line.split_whitespace();
        let (Some(setting), Some(state), None) = (words.next(), words.next(), words.next()) else {
            return false;
        };
        let enabled = match state {
            "on" => true,
            "off" => false,
            _ => return false,
        };
        match setting {
            "tokens" => self.tokens = enabled,
            "ast" => self.ast = enabled,
            "eval" => self.eval = enabled,
            _ => return false,
        }
        true
    }
}

fn run_repl() -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    let mut interpreter = Interpreter::new();
    let mut settings = ReplSettings::default();
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                if line.trim().is_empty() || settings.apply(&line) {
                    continue;
                }
                // Errors end the line, not the session.
                if let Err(err) = evaluate_line(&mut interpreter, &line, settings) {
                    println!("{err}");
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

fn evaluate_line(
    interpreter: &mut Interpreter,
    line: &str,
    settings: ReplSettings,
) -> Result<(), simp::Error> {
    let tokens = tokenize(line)?;
    if settings.tokens {
        for token in &tokens {
            println!("{token}");
        }
    }
    let program = parse(&tokens)?;
    if settings.ast {
        println!("{program:#?}");
    }
    let value = interpreter.evaluate(&program)?;
    if settings.eval {
        println!("{value}");
    }
    Ok(())
}
