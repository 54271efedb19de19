//! zsearch 命令行
//!
//! `zsearch [OPTIONS] <PATTERN> [FILE]`，没有 FILE 时读 stdin。
//! 每个匹配输出一行 `line:column: start..end: text`。
//! 退出码：有匹配 0，没有匹配 1，参数或 IO 错误 2。

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use zsearch::collation::{Collator, Strength};
use zsearch::search::pattern::PatternModel;
use zsearch::settings::{self, SearchSettings, SettingsError};
use zsearch::text::BreakKind;
use zsearch::{SearchError, StringSearch};

const USAGE: &str = "\
Usage: zsearch [OPTIONS] <PATTERN> [FILE]

Options:
  --strength <LEVEL>   primary | secondary | tertiary | quaternary | identical
  --canonical          match canonically equivalent accent orders
  --overlap            report overlapping matches
  --backward           search from the end of the text
  --breaks <KIND>      grapheme | character | word
  --shifted            ignore punctuation and whitespace (alternate shifted)
  --settings <PATH>    settings file (default: $XDG_CONFIG_HOME/zsearch/settings.json)
  --dump-pattern       print the compiled pattern before searching
  --count              print only the number of matches
  -h, --help           print this help";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    pattern: String,
    file: Option<PathBuf>,
    strength: Option<Strength>,
    canonical: bool,
    overlap: bool,
    backward: bool,
    breaks: Option<BreakKind>,
    shifted: bool,
    settings: Option<PathBuf>,
    dump_pattern: bool,
    count: bool,
    help: bool,
}

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(io::Error),
    Settings(SettingsError),
    Search(SearchError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Settings(e) => write!(f, "{}", e),
            CliError::Search(e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Settings(e)
    }
}

impl From<SearchError> for CliError {
    fn from(e: SearchError) -> Self {
        CliError::Search(e)
    }
}

fn main() -> ExitCode {
    let _logging = zsearch::logging::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("zsearch: {}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&args, &mut out) {
        Ok(0) => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::warn!(error = %e, "search failed");
            eprintln!("zsearch: {}", e);
            ExitCode::from(2)
        }
    }
}

fn parse_args<I>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut positional = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => {
                (name.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };

        match name.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--canonical" => parsed.canonical = true,
            "--overlap" => parsed.overlap = true,
            "--backward" => parsed.backward = true,
            "--shifted" => parsed.shifted = true,
            "--dump-pattern" => parsed.dump_pattern = true,
            "--count" => parsed.count = true,
            "--strength" => {
                let v = take_value("--strength", inline, &mut iter)?;
                parsed.strength = Some(
                    Strength::from_name(&v)
                        .ok_or_else(|| CliError::Usage(format!("unknown strength {:?}", v)))?,
                );
            }
            "--breaks" => {
                let v = take_value("--breaks", inline, &mut iter)?;
                parsed.breaks = Some(
                    BreakKind::from_name(&v)
                        .ok_or_else(|| CliError::Usage(format!("unknown break kind {:?}", v)))?,
                );
            }
            "--settings" => {
                parsed.settings = Some(PathBuf::from(take_value("--settings", inline, &mut iter)?));
            }
            "--" => {
                positional.extend(iter.by_ref());
                break;
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliError::Usage(format!("unknown option {}", other)));
            }
            _ => positional.push(arg),
        }
    }

    if parsed.help {
        return Ok(parsed);
    }

    let mut positional = positional.into_iter();
    parsed.pattern = positional
        .next()
        .ok_or_else(|| CliError::Usage("missing PATTERN".to_string()))?;
    parsed.file = positional.next().map(PathBuf::from);
    if let Some(extra) = positional.next() {
        return Err(CliError::Usage(format!("unexpected argument {}", extra)));
    }
    Ok(parsed)
}

fn take_value(
    flag: &str,
    inline: Option<String>,
    rest: &mut impl Iterator<Item = String>,
) -> Result<String, CliError> {
    inline
        .or_else(|| rest.next())
        .ok_or_else(|| CliError::Usage(format!("{} needs a value", flag)))
}

/// 文件设置加上命令行覆盖
fn resolve_settings(args: &CliArgs) -> Result<SearchSettings, CliError> {
    let mut resolved = match &args.settings {
        Some(path) => settings::load(path)?,
        None => settings::load_default()?,
    };
    if let Some(strength) = args.strength {
        resolved.strength = strength;
    }
    if let Some(breaks) = args.breaks {
        resolved.breaks = breaks;
    }
    resolved.alternate_shifted |= args.shifted;
    resolved.canonical |= args.canonical;
    resolved.overlapping |= args.overlap;
    Ok(resolved)
}

fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// 返回匹配个数
fn run(args: &CliArgs, out: &mut impl Write) -> Result<usize, CliError> {
    let resolved = resolve_settings(args)?;
    let text = read_input(args.file.as_deref())?;
    search_text(args, &resolved, text, out)
}

fn search_text(
    args: &CliArgs,
    resolved: &SearchSettings,
    text: String,
    out: &mut impl Write,
) -> Result<usize, CliError> {
    let collator = resolved.build_collator()?;
    if text.is_empty() {
        if args.count {
            writeln!(out, "0")?;
        }
        return Ok(0);
    }

    let mut search = StringSearch::new(&args.pattern, text, collator)?;
    resolved.apply(&mut search);
    if args.dump_pattern {
        write_pattern_dump(search.pattern_model(), search.collator(), out)?;
    }

    let mut found = Vec::new();
    let mut result = if args.backward {
        search.last()
    } else {
        search.first()
    };
    while let Some(range) = result.range() {
        found.push(range);
        result = if args.backward {
            search.previous()
        } else {
            search.next()
        };
    }
    tracing::debug!(matches = found.len(), backward = args.backward, "search finished");

    if args.count {
        writeln!(out, "{}", found.len())?;
    } else {
        let lines = LineIndex::new(search.target());
        for range in &found {
            writeln!(out, "{}", format_match(search.target(), &lines, range.clone()))?;
        }
    }
    Ok(found.len())
}

/// 行首偏移表，用来把字节偏移换成行列号
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(ix, _)| ix + 1));
        Self { starts }
    }

    /// 1 起始的行号和列号，列按 `char` 计
    fn line_col(&self, text: &str, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(ix) => ix,
            Err(ix) => ix - 1,
        };
        let col = text[self.starts[line]..offset].chars().count();
        (line + 1, col + 1)
    }
}

fn format_match(text: &str, lines: &LineIndex, range: std::ops::Range<usize>) -> String {
    let (line, col) = lines.line_col(text, range.start);
    let matched: String = text[range.clone()]
        .chars()
        .flat_map(|ch| {
            let escaped: Vec<char> = if ch.is_control() {
                ch.escape_default().collect()
            } else {
                vec![ch]
            };
            escaped
        })
        .collect();
    format!("{}:{}: {}..{}: {}", line, col, range.start, range.end, matched)
}

fn write_pattern_dump<C: Collator>(
    model: &PatternModel,
    collator: &C,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "pattern: {:?}", model.text())?;
    let ces: Vec<String> = model.ces().iter().map(|ce| format!("{:08X}", ce.raw())).collect();
    writeln!(out, "ces: [{}]", ces.join(", "))?;
    let weights: Vec<String> = model
        .ces()
        .iter()
        .map(|&ce| {
            let (p, s, t) = collator.decompose(ce);
            format!("{:04X}/{:02X}/{:02X}", p, s, t)
        })
        .collect();
    writeln!(out, "weights: [{}]", weights.join(", "))?;
    let pces: Vec<String> = model.pces().iter().map(|pce| format!("{:016X}", pce.raw())).collect();
    writeln!(out, "pces: [{}]", pces.join(", "))?;
    writeln!(out, "prefix_accents: {}", model.has_prefix_accents())?;
    writeln!(out, "suffix_accents: {}", model.has_suffix_accents())?;
    writeln!(out, "default_shift: {}", model.default_shift_size())?;

    let default = model.default_shift_size();
    for (label, table) in [("shift", model.shift_table()), ("back_shift", model.back_shift_table())] {
        let buckets: Vec<String> = table
            .iter()
            .enumerate()
            .filter(|(_, shift)| **shift != default)
            .map(|(bucket, shift)| format!("{}={}", bucket, shift))
            .collect();
        writeln!(out, "{}: {}", label, buckets.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/cli.rs"]
mod tests;
