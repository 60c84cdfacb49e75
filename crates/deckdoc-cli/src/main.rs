use std::process;

fn main() {
    match deckdoc_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("deckdoc error: {err}");
            process::exit(1);
        }
    }
}
