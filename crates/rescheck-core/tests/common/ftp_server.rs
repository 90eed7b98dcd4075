//! Minimal FTP server for integration tests.
//!
//! Serves an in-memory tree of files over a control connection plus one
//! passive (EPSV or PASV) data connection per transfer. Directories exist
//! implicitly as prefixes of file paths. Every command received is logged so
//! tests can check what the client sent.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

pub struct FtpServer {
    pub base: String,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FtpServer {
    /// Commands received so far, as sent (`PASS` included).
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Waits up to two seconds for a command starting with `verb`.
    pub fn wait_for(&self, verb: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if self.commands().iter().any(|c| c.starts_with(verb)) {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }
}

/// Starts a server in a background thread serving `files` (absolute paths).
/// `base` is the URL without a trailing slash (e.g. "ftp://127.0.0.1:12345").
pub fn start(files: Vec<(&str, Vec<u8>)>) -> FtpServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files: Arc<BTreeMap<String, Vec<u8>>> = Arc::new(
        files
            .into_iter()
            .map(|(path, body)| (path.to_string(), body))
            .collect(),
    );
    let commands = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&commands);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &files, &log));
        }
    });
    FtpServer {
        base: format!("ftp://127.0.0.1:{}", port),
        commands,
    }
}

fn handle(stream: TcpStream, files: &BTreeMap<String, Vec<u8>>, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut out = stream;
    reply(&mut out, "220 rescheck test server ready");

    let mut cwd = "/".to_string();
    let mut passive: Option<TcpListener> = None;
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let command = line.trim_end_matches(['\r', '\n']).to_string();
        log.lock().unwrap().push(command.clone());
        let (verb, arg) = command.split_once(' ').unwrap_or((command.as_str(), ""));

        match verb.to_ascii_uppercase().as_str() {
            "USER" => reply(&mut out, "331 Password required"),
            "PASS" => reply(&mut out, "230 Logged in"),
            "PWD" => reply(&mut out, &format!("257 \"{cwd}\" is the current directory")),
            "CWD" => {
                let target = resolve(&cwd, arg);
                if is_dir(files, &target) {
                    cwd = target;
                    reply(&mut out, "250 Directory changed");
                } else {
                    reply(&mut out, "550 No such directory");
                }
            }
            "TYPE" => reply(&mut out, "200 Type set"),
            "EPSV" => match open_passive() {
                Some((listener, port)) => {
                    passive = Some(listener);
                    reply(&mut out, &format!("229 Entering Extended Passive Mode (|||{port}|)"));
                }
                None => reply(&mut out, "425 Cannot open data connection"),
            },
            "PASV" => match open_passive() {
                Some((listener, port)) => {
                    passive = Some(listener);
                    reply(
                        &mut out,
                        &format!(
                            "227 Entering Passive Mode (127,0,0,1,{},{})",
                            port / 256,
                            port % 256
                        ),
                    );
                }
                None => reply(&mut out, "425 Cannot open data connection"),
            },
            "SIZE" => match files.get(&resolve(&cwd, arg)) {
                Some(body) => reply(&mut out, &format!("213 {}", body.len())),
                None => reply(&mut out, "550 No such file"),
            },
            "LIST" => {
                let listing = list(files, &resolve(&cwd, arg));
                send_data(&mut out, &mut passive, listing.as_bytes());
            }
            "RETR" => match files.get(&resolve(&cwd, arg)) {
                Some(body) => send_data(&mut out, &mut passive, body),
                None => reply(&mut out, "550 No such file"),
            },
            "QUIT" => {
                reply(&mut out, "221 Goodbye");
                return;
            }
            _ => reply(&mut out, "502 Command not implemented"),
        }
    }
}

fn reply(out: &mut TcpStream, text: &str) {
    let _ = out.write_all(format!("{text}\r\n").as_bytes());
}

fn open_passive() -> Option<(TcpListener, u16)> {
    let listener = TcpListener::bind("127.0.0.1:0").ok()?;
    let port = listener.local_addr().ok()?.port();
    Some((listener, port))
}

fn send_data(out: &mut TcpStream, passive: &mut Option<TcpListener>, data: &[u8]) {
    let Some(listener) = passive.take() else {
        reply(out, "425 Use EPSV or PASV first");
        return;
    };
    reply(out, "150 Opening data connection");
    match listener.accept() {
        Ok((mut data_stream, _)) => {
            let _ = data_stream.write_all(data);
        }
        Err(_) => {
            reply(out, "425 Cannot open data connection");
            return;
        }
    }
    reply(out, "226 Transfer complete");
}

/// Absolute path for `arg` seen from `cwd`, without a trailing slash.
fn resolve(cwd: &str, arg: &str) -> String {
    let joined = if arg.starts_with('/') {
        arg.to_string()
    } else if arg.is_empty() {
        cwd.to_string()
    } else {
        format!("{}/{}", cwd.trim_end_matches('/'), arg)
    };
    match joined.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn is_dir(files: &BTreeMap<String, Vec<u8>>, path: &str) -> bool {
    path == "/" || files.keys().any(|f| f.starts_with(&format!("{path}/")))
}

/// `ls -l` lines for a file or for the entries directly under a directory.
/// A missing path lists nothing.
fn list(files: &BTreeMap<String, Vec<u8>>, path: &str) -> String {
    if let Some(body) = files.get(path) {
        return unix_line('-', body.len(), path.rsplit('/').next().unwrap_or(path));
    }
    let prefix = if path == "/" { "/".to_string() } else { format!("{path}/") };
    let mut entries: BTreeMap<&str, Option<usize>> = BTreeMap::new();
    for (file, body) in files {
        let Some(rest) = file.strip_prefix(&prefix) else {
            continue;
        };
        match rest.split_once('/') {
            Some((dir, _)) => {
                entries.insert(dir, None);
            }
            None => {
                entries.insert(rest, Some(body.len()));
            }
        }
    }
    entries
        .into_iter()
        .map(|(name, size)| match size {
            Some(size) => unix_line('-', size, name),
            None => unix_line('d', 4096, name),
        })
        .collect()
}

fn unix_line(kind: char, size: usize, name: &str) -> String {
    let mode = if kind == 'd' { "drwxr-xr-x" } else { "-rw-r--r--" };
    format!("{mode}   1 ftp      ftp      {size:>8} Jan 01 12:00 {name}\r\n")
}
