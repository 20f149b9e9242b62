use approxdict::{compact, matcher, trie, word, DictError};
use clap::{arg, crate_version, Arg, ArgAction, Command};
use std::io::{BufRead, Write};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let long_help = "Examples:
---------
Compile:  `approxdict compile -i wordlist.txt -o dict.bin`
Query:    `echo \"t1 2 chein\" | approxdict query -d dict.bin`
Dump:     `approxdict dump -d dict.bin`";

    let formats = ["compact", "simple"];

    let mut main_cmd = Command::new("approxdict")
        .about("Approximate-string lookup over a static weighted dictionary")
        .after_long_help(long_help)
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("increase logging verbosity")
                .action(ArgAction::Count),
        );

    main_cmd = main_cmd.subcommand(
        Command::new("compile")
            .about("build a dictionary image from a word list")
            .arg(arg!(-i --input <PATH> "word-frequency source path").required(true))
            .arg(arg!(-o --output <PATH> "image output path").required(true))
            .arg(
                arg!(--format <FORMAT> "on-disk encoding")
                    .value_parser(formats)
                    .default_value("compact"),
            )
            .arg(arg!(--lenient "coerce zero-frequency entries to 1 instead of rejecting them")),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("query")
            .about("read (tag, max_distance, word) triples from stdin, print JSON matches")
            .arg(arg!(-d --dict <PATH> "compact image path").required(true)),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("dump")
            .about("list every word in a dictionary image")
            .arg(arg!(-d --dict <PATH> "compact image path").required(true))
            .arg(arg!(--dot "render as a Graphviz digraph instead of a word list"))
            .arg(arg!(--lookup <WORD> "print just this word's frequency (0 if absent)").required(false)),
    );

    let matches = main_cmd.get_matches();

    let verbosity = match matches.get_count("verbose") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(verbosity).init();

    if let Some(cmd) = matches.subcommand_matches("compile") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let format = cmd.get_one::<String>("format").expect(RCH);
        let lenient = cmd.get_flag("lenient");
        compile(path_in, path_out, format, lenient)?;
    }

    if let Some(cmd) = matches.subcommand_matches("query") {
        let path_dict = cmd.get_one::<String>("dict").expect(RCH);
        run_query(path_dict)?;
    }

    if let Some(cmd) = matches.subcommand_matches("dump") {
        let path_dict = cmd.get_one::<String>("dict").expect(RCH);
        let as_dot = cmd.get_flag("dot");
        let lookup = cmd.get_one::<String>("lookup").map(String::as_str);
        run_dump(path_dict, as_dot, lookup)?;
    }

    Ok(())
}

fn build_trie(path_in: &str, lenient: bool) -> Result<trie::RadixTrie, Box<dyn std::error::Error>> {
    let source = std::fs::File::open(path_in)?;
    let entries = word::read_entries(source)?;

    let mut dict = trie::RadixTrie::empty();
    for entry in entries {
        let freq = if entry.freq == 0 {
            if lenient {
                log::warn!(
                    "coercing zero frequency for {:?} to 1 (--lenient)",
                    String::from_utf8_lossy(&entry.word)
                );
                1
            } else {
                return Err(Box::new(DictError::ZeroFrequency { word: entry.word }));
            }
        } else {
            entry.freq
        };
        dict.insert(freq, &entry.word);
    }
    Ok(dict)
}

fn compile(
    path_in: &str,
    path_out: &str,
    format: &str,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dict = build_trie(path_in, lenient)?;
    let words_in = dict.iter().len();

    let mut out = std::fs::File::create(path_out)?;
    match format {
        "simple" => dict.serialize_simple(&mut out)?,
        _ => compact::write_compact(&dict, &mut out)?,
    }
    log::info!("compiled {words_in} words into {path_out} ({format} format)");
    Ok(())
}

/// Reads `(tag, max_distance, word)` triples from stdin until EOF, one per
/// line, printing a JSON array of matches for each.
fn run_query(path_dict: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path_dict)?;
    let map = unsafe { memmap2::Mmap::map(&file)? };
    let dict = compact::CompactTrie::new(&map)?;
    log::debug!("loaded dictionary image {path_dict} ({} bytes mapped)", map.len());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let _tag = tokens.next();
        let max_distance: Option<i64> = tokens.next().and_then(|t| t.parse().ok());
        let query = tokens.next().unwrap_or("");

        let results = match max_distance {
            Some(k) if k >= 0 && !query.is_empty() => {
                matcher::matches(dict.root(), query.as_bytes(), k as u32)
            }
            _ => Vec::new(),
        };

        let json: Vec<_> = results
            .iter()
            .map(|m| {
                serde_json::json!({
                    "word": String::from_utf8_lossy(&m.word),
                    "freq": m.freq,
                    "distance": m.distance,
                })
            })
            .collect();
        writeln!(out, "{}", serde_json::Value::Array(json))?;
    }
    Ok(())
}

fn run_dump(path_dict: &str, as_dot: bool, lookup: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path_dict)?;
    let map = unsafe { memmap2::Mmap::map(&file)? };
    let dict = compact::CompactTrie::new(&map)?;
    log::debug!("loaded dictionary image {path_dict} ({} bytes mapped)", map.len());

    if let Some(word) = lookup {
        println!("{}", dict.lookup(word.as_bytes()));
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if as_dot {
        let mut rebuilt = trie::RadixTrie::empty();
        for (word, freq) in dict.iter() {
            rebuilt.insert(freq, &word);
        }
        write!(out, "{}", rebuilt.to_dot())?;
    } else {
        for (word, freq) in dict.iter() {
            writeln!(out, "{}\t{}", String::from_utf8_lossy(&word), freq)?;
        }
    }
    Ok(())
}
