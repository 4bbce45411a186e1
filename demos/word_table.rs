//! Builds a symbol table of the words in a text file and prints it in order.
//!
//! Each word is lowercased and stripped of punctuation, then stored with the
//! index of its last occurrence.
//!
//! ```text
//! cargo run --example word_table -- tale.txt [--verbose]
//! ```

use std::error::Error;
use std::{env, fs, process};

use llrb_table::LlrbMap;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn normalize(token: &str) -> Option<String> {
    let word: String = token
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect();
    (!word.is_empty()).then_some(word)
}

fn build(text: &str) -> LlrbMap<String, usize> {
    let mut st = LlrbMap::new();
    for (i, token) in text.split_whitespace().enumerate() {
        // Tokens that are all punctuation become `None` and are logged, not stored.
        st.put(normalize(token), i);
    }
    st
}

fn run(path: &str) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let st = build(&text);

    log::debug!("{} distinct words, height {:?}", st.len(), st.height());
    for key in st.keys() {
        if let Some(index) = st.get(Some(key.as_str()))? {
            println!("{key} {index}");
        }
    }
    Ok(())
}

fn main() {
    let mut verbose = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ => path = Some(arg),
        }
    }

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    if let Err(err) = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("word_table: logging disabled: {err}");
    }

    let Some(path) = path else {
        eprintln!("usage: word_table <file> [--verbose]");
        process::exit(2);
    };

    if let Err(err) = run(&path) {
        log::error!("{path}: {err}");
        process::exit(1);
    }
}
