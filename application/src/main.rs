mod cmd_impl;

use std::io::{self, BufRead, Write};

use cmd_config::{MAX_ARG_BYTES, MAX_LINE_LEN, MAX_TOKENS, PROMPT};
use cmd_core::Dispatcher;

type CmdDispatcher = Dispatcher<'static, MAX_TOKENS, MAX_LINE_LEN, MAX_ARG_BYTES>;

fn main() {
    env_logger::init();

    let dispatcher = CmdDispatcher::new(cmd_impl::SIGNATURES);
    log::info!("command engine ready ({} commands)", dispatcher.table().len());

    println!("Commands: {}", dispatcher.table().len());
    print!("\n❗Type 'exit' to quit❗\n");

    let stdin = io::stdin();
    loop {
        print!("{PROMPT}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!("❗Exiting...");
                break;
            }
            Ok(_) => {}
        }

        let input = line.trim_end_matches(['\r', '\n']);
        if input == "exit" {
            println!("❗Exiting...");
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        match dispatcher.dispatch_from_line(input) {
            Ok(()) => println!("✅ Success: {input}"),
            Err(e) => println!("❌ Error: {e} for line '{input}'"),
        }
    }
}
