use std::env;
use std::fs;
use std::io;
use std::io::Write;
use std::process;

use sentree::{builtin, np_chunks, tokenize, Err, Grammar, ParseOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} [FILE] [options]

Parses the sentence in FILE, or prompts for sentences if no FILE is given.

Options:
  -h, --help             Print this message
  -g, --grammar GRAMMAR  Use the grammar in GRAMMAR instead of the built-in one
  -m, --max-trees N      Give up on sentences with more than N parses (default {})
  -c, --chart            Print the parse chart (defaults to not printing)",
    prog_name,
    ParseOptions::DEFAULT_MAX_TREES
  )
}

fn parse(g: &Grammar, sentence: &str, opts: &Args) -> Result<(), Err> {
  let words = tokenize(sentence);

  if opts.print_chart {
    if let Ok(chart) = g.parse_chart(&words) {
      println!("chart:\n{}", chart);
    }
  }

  let options = ParseOptions::default().with_max_trees(opts.max_trees);
  let trees = match g.parse_with(&words, &options) {
    Ok(trees) => trees,
    Err(e) => {
      println!("{}", e);
      return Ok(());
    }
  };

  if trees.is_empty() {
    println!("Could not parse sentence.");
    return Ok(());
  }

  let mut out = io::stdout().lock();
  for t in trees.iter() {
    writeln!(out, "{}\n", t)?;
    writeln!(out, "Noun Phrase Chunks")?;
    for np in np_chunks(t) {
      writeln!(out, "{}", np.leaves().collect::<Vec<_>>().join(" "))?;
    }
    writeln!(out)?;
  }

  Ok(())
}

struct Args {
  sentence_file: Option<String>,
  grammar_file: Option<String>,
  max_trees: usize,
  print_chart: bool,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let Some(prog_name) = iter.next() else {
      return Err(Self::make_error_message("bad argument vector", "sentree"));
    };

    let mut sentence_file: Option<String> = None;
    let mut grammar_file: Option<String> = None;
    let mut max_trees = ParseOptions::DEFAULT_MAX_TREES;
    let mut print_chart = false; // default to *not* printing the chart

    while let Some(o) = iter.next() {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-c" || o == "--chart" {
        print_chart = true;
      } else if o == "-g" || o == "--grammar" {
        match iter.next() {
          Some(path) => grammar_file = Some(path),
          None => return Err(Self::make_error_message("missing grammar file", prog_name)),
        }
      } else if o == "-m" || o == "--max-trees" {
        match iter.next().and_then(|n| n.parse().ok()) {
          Some(n) => max_trees = n,
          None => return Err(Self::make_error_message("--max-trees needs a number", prog_name)),
        }
      } else if sentence_file.is_none() {
        sentence_file = Some(o);
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    Ok(Self {
      sentence_file,
      grammar_file,
      max_trees,
      print_chart,
    })
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let g = match &opts.grammar_file {
    Some(path) => Grammar::read_from_file(path)?,
    None => builtin::grammar()?,
  };
  info!(start = g.start(), productions = g.productions().len(), "loaded grammar");

  if let Some(path) = &opts.sentence_file {
    let sentence = fs::read_to_string(path)?;
    return parse(&g, &sentence, &opts);
  }

  let mut input = String::new();
  loop {
    print!("Sentence: ");
    io::stdout().flush()?;

    input.clear();
    if io::stdin().read_line(&mut input)? == 0 {
      // ctrl+d
      return Ok(());
    }
    parse(&g, input.trim(), &opts)?;
  }
}
