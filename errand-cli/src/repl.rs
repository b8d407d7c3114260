//! Interactive CLI surface: banner, help, exit, per-line dispatch.
//!
//! Pure I/O; no request ever terminates the loop.

use crate::dispatcher::{DispatchResult, RequestDispatcher};
use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};

const EXAMPLES: [&str; 5] = [
    "Translate 'Good Morning' into German and then multiply 5 and 6.",
    "Add 10 and 20, then translate 'Have a nice day' into German.",
    "Tell me the capital of Italy, then multiply 12 and 12.",
    "Add 2 and 2 and multiply 3 and 3.",
    "What is the distance between Earth and Mars?",
];

pub async fn run(dispatcher: &RequestDispatcher) {
    println!("{}", "🤖 errand - multi-step task agent".cyan());
    println!("{}", "Type 'quit' or 'exit' to stop".yellow());
    println!("{}\n", "Type 'help' to see example inputs".yellow());

    let stdin = io::stdin();
    loop {
        print!("{}", "You: ".green());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                log::error!("[REPL] Failed to read input: {}", e);
                break;
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        let result = dispatcher.dispatch(input).await;
        print_result(&result);
    }

    println!("{}", "Goodbye! 👋".cyan());
}

pub fn print_result(result: &DispatchResult) {
    println!("\n{}", "🤖 Agent:".blue());
    for line in result.response.lines() {
        if !result.success || line.starts_with('❌') {
            println!("  {}", line.red());
        } else {
            println!("  {}", line);
        }
    }
    println!();
}

fn print_help() {
    println!("\n{}", "📚 Example inputs:".cyan());
    for (i, example) in EXAMPLES.iter().enumerate() {
        println!("  {}. {}", i + 1, example);
    }
    println!();
}
