use std::fs;

use owo_colors::OwoColorize;

use marl_lexer::Lexer;
use marl_parser::Parser;
use marl_syntax::error::Error;

fn render_error(kind: &str, source: &str, err: &Error) {
    eprintln!("{}: {}", kind.red().bold(), err.to_string().red());
    if let Some(location) = err.location() {
        eprintln!("  --> line {}, column {}", location.line, location.col);
        if let Some(src_line) = source.lines().nth(location.line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", location.line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = String::new();
            marker.push_str(&" ".repeat(line_num_str.len()));
            if location.col > 1 {
                marker.push_str(&" ".repeat(location.col - 1));
            }
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
}

fn parse_dump_flag(args: &[String]) -> bool {
    args.iter().skip(1).any(|a| a == "--ast" || a == "-a")
}

fn parse_path(args: &[String]) -> Option<&str> {
    args.iter()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .map(|a| a.as_str())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let path = match parse_path(&args) {
        Some(p) => p,
        None => {
            eprintln!("{}: usage: marl [--ast] <file.marl>", "error".red().bold());
            std::process::exit(2);
        }
    };

    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read {}: {}", path, e).red()
            );
            std::process::exit(1);
        }
    };

    let mut lexer = Lexer::new(&src);
    let tokens = match lexer.tokenize() {
        Ok(t) => t,
        Err(e) => {
            render_error("Lex error", &src, &e);
            std::process::exit(1);
        }
    };

    let mut parser = Parser::new(tokens);
    let module = match parser.parse() {
        Ok(m) => m,
        Err(e) => {
            render_error("Parse error", &src, &e);
            std::process::exit(1);
        }
    };

    if parse_dump_flag(&args) {
        println!("{:#?}", module);
    } else {
        println!(
            "{}: parsed {} function(s), {} record(s)",
            path,
            module.functions.len(),
            module.records.len()
        );
        for f in &module.functions {
            println!("  function {} ({} parameter(s))", f.name, f.parameters.len());
        }
        for r in &module.records {
            println!("  record {} ({} element(s))", r.name, r.elements.len());
        }
    }
}
