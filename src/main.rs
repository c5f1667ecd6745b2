// metalex: lexical and scope analyzer for C-family source files

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use metalex::analyzer::{report, Analysis};
use metalex::ui::App;

/// Command-line options
struct Options {
    path: String,
    /// Print the report to stdout instead of opening the UI
    dump: bool,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [--dump] <file>", program_name);
    eprintln!();
    eprintln!("Examples:");
    eprintln!(
        "  {} src/Main.java          # Browse tokens and scopes",
        program_name
    );
    eprintln!(
        "  {} --dump program.c       # Print tokens, scope tree and diagnostics",
        program_name
    );
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut path = None;
    let mut dump = false;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--dump" | "-d" => dump = true,
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{}'", flag)),
            file if path.is_none() => path = Some(file.to_string()),
            extra => return Err(format!("Unexpected argument '{}'", extra)),
        }
    }

    let path = path.ok_or_else(|| String::from("No input file provided"))?;
    Ok(Options { path, dump })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("metalex");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    if !Path::new(&options.path).exists() {
        eprintln!("Error: File '{}' not found", options.path);
        print_usage(program_name);
        std::process::exit(1);
    }

    // Read source code
    let source = fs::read_to_string(&options.path)?;

    eprintln!("Analyzing {}...", options.path);
    let analysis = match Analysis::run(source) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    eprintln!(
        "Found {} tokens on {} lines, {} scopes.",
        analysis.tokens().len(),
        analysis.lines().line_count(),
        analysis.scopes().len()
    );
    if let Some(problem) = analysis.first_problem() {
        eprintln!(
            "Warning: {} ({} diagnostics total)",
            problem,
            analysis.diagnostics().len()
        );
    }

    if options.dump {
        print!("{}", report::render(&analysis));
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(analysis);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("metalex")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(&args(&["--dump", "a.c"])).unwrap();
        assert!(options.dump);
        assert_eq!(options.path, "a.c");

        let options = parse_args(&args(&["a.c"])).unwrap();
        assert!(!options.dump);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--verbose", "a.c"])).is_err());
        assert!(parse_args(&args(&["a.c", "b.c"])).is_err());
    }
}
