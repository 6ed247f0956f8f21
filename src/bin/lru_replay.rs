//! CLI tool for lru-store - replays a cache operation script and outputs JSON
//!
//! Usage:
//!   lru_replay <script.txt>              # Output final cache JSON to stdout
//!   lru_replay <script.txt> -o out.json  # Output final cache JSON to file
//!
//! Script format, one command per line (`#` starts a comment):
//!
//! ```text
//! capacity 3
//! set a 1
//! get a
//! fetch b 2
//! getset c 3
//! del a
//! has a
//! resize 2
//! clear
//! ```
//!
//! `#` starts a comment only at the beginning of a word, so `set a x#y`
//! stores `x#y`. Lookup results are reported on stderr as they happen.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use lru_store::LruCache;

type Cache = LruCache<String, String>;

fn main() {
    let args: Vec<String> = env::args().collect();

    let Some(input_path) = args.get(1) else {
        eprintln!("Usage: lru_replay <script.txt> [-o output.json]");
        process::exit(1);
    };
    let output_path = match (args.get(2), args.get(3)) {
        (Some(flag), Some(path)) if flag == "-o" => Some(path),
        _ => None,
    };

    // Read script
    let script = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            process::exit(1);
        }
    };

    // Replay operations
    let cache = match replay(&script, &mut io::stderr()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error in {}: {}", input_path, e);
            process::exit(1);
        }
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&cache) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{json}") {
                eprintln!("Error writing stdout: {}", e);
                process::exit(1);
            }
        }
    }
}

fn replay<W: Write>(script: &str, log: &mut W) -> Result<Cache, String> {
    let mut cache: Option<Cache> = None;

    for (lineno, raw) in script.lines().enumerate() {
        let words: Vec<&str> = raw
            .split_whitespace()
            .take_while(|word| !word.starts_with('#'))
            .collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };
        let line = words.join(" ");
        let at = |msg: String| format!("line {}: {}", lineno + 1, msg);

        if command == "capacity" {
            if cache.is_some() {
                return Err(at("capacity already set, use `resize`".to_string()));
            }
            let [n] = args else {
                return Err(at(usage_error(command)));
            };
            let n = parse_count(n).map_err(&at)?;
            cache = Some(LruCache::new(n).map_err(|e| at(e.to_string()))?);
            continue;
        }

        let cache = cache
            .as_mut()
            .ok_or_else(|| at("script must start with `capacity <n>`".to_string()))?;

        let outcome = match (command, args) {
            ("set", [key, value]) => {
                cache.insert((*key).to_string(), (*value).to_string());
                None
            }
            ("get", [key]) => Some(describe(cache.get(*key))),
            ("fetch", [key, fallback]) => {
                Some(cache.fetch(*key, || (*fallback).to_string()).into_owned())
            }
            ("getset", [key, value]) => Some(
                cache
                    .get_or_insert_with((*key).to_string(), || (*value).to_string())
                    .clone(),
            ),
            ("del", [key]) => Some(describe(cache.remove(*key).as_ref())),
            ("has", [key]) => Some(cache.contains_key(*key).to_string()),
            ("resize", [n]) => {
                let n = parse_count(n).map_err(&at)?;
                cache.resize(n).map_err(|e| at(e.to_string()))?;
                None
            }
            ("clear", []) => {
                cache.clear();
                None
            }
            _ => return Err(at(usage_error(command))),
        };

        if let Some(result) = outcome {
            writeln!(log, "{line} -> {result}").map_err(|e| at(e.to_string()))?;
        }
    }

    cache.ok_or_else(|| "script never set `capacity`".to_string())
}

/// Usage line for known commands given the wrong arguments.
fn usage_error(command: &str) -> String {
    let usage = match command {
        "capacity" => "capacity <n>",
        "set" => "set <key> <value>",
        "get" => "get <key>",
        "fetch" => "fetch <key> <fallback>",
        "getset" => "getset <key> <value>",
        "del" => "del <key>",
        "has" => "has <key>",
        "resize" => "resize <n>",
        "clear" => "clear",
        _ => return format!("unrecognized command `{command}`"),
    };
    format!("usage: {usage}")
}

fn parse_count(text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|e| format!("invalid capacity `{text}`: {e}"))
}

fn describe(value: Option<&String>) -> String {
    value.map_or_else(|| "(absent)".to_string(), String::clone)
}
