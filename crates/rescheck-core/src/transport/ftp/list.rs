//! Parse FTP LIST output into entries.
//!
//! Understands the Unix `ls -l` layout most servers use and the MS-DOS
//! layout of IIS. Lines in neither format (e.g. `total 12`) are skipped.

use super::FtpFile;

/// Parses every recognisable line of a LIST response.
pub fn parse_list_output(raw: &str) -> Vec<FtpFile> {
    raw.lines().filter_map(parse_list_line).collect()
}

fn parse_list_line(line: &str) -> Option<FtpFile> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }
    parse_unix_line(line).or_else(|| parse_dos_line(line))
}

/// `-rw-r--r--   1 ftp ftp   1000 Jan 01 12:00 rhea2reactome.tsv`
fn parse_unix_line(line: &str) -> Option<FtpFile> {
    let kind = line.chars().next()?;
    if !matches!(kind, '-' | 'd' | 'l') {
        return None;
    }
    let (fields, rest) = split_fields(line, 8)?;
    let size = fields[4].parse::<u64>().ok()?;
    let name = match rest.split_once(" -> ") {
        Some((link, _target)) if kind == 'l' => link,
        _ => rest,
    };
    Some(FtpFile {
        name: base_name(name).to_string(),
        size,
    })
}

/// `01-01-20  12:00PM          1000 rhea2reactome.tsv`
fn parse_dos_line(line: &str) -> Option<FtpFile> {
    let (fields, rest) = split_fields(line, 3)?;
    if !fields[0].contains('-') || !fields[1].contains(':') {
        return None;
    }
    let size = if fields[2].eq_ignore_ascii_case("<DIR>") {
        0
    } else {
        fields[2].parse::<u64>().ok()?
    };
    Some(FtpFile {
        name: base_name(rest).to_string(),
        size,
    })
}

/// Splits off `n` whitespace-separated fields; the remainder is the name, which may contain spaces.
fn split_fields(line: &str, n: usize) -> Option<(Vec<&str>, &str)> {
    let mut fields = Vec::with_capacity(n);
    let mut rest = line.trim_start();
    for _ in 0..n {
        let end = rest.find(char::is_whitespace)?;
        fields.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    if rest.is_empty() {
        return None;
    }
    Some((fields, rest))
}

/// Some servers echo the full path given to LIST.
fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
