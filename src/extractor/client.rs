use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;

use regex::Regex;
use url::Url;

use super::models::{ExtractorConfig, RawProgress};
use super::{ExtractError, ExtractedMedia, ExtractionClient, Result};
use crate::domain::ProgressEvent;

const PROGRESS_MARKER: &str = "[progress]";
const TITLE_MARKER: &str = "[title]";
const UNKNOWN_TITLE: &str = "Unknown Title";

const TRANSPORT_PATTERN: &str = r"(?i)unable to download|http error|^\[download\]|timed out|connection|network is unreachable|getaddrinfo|\bssl\b|giving up after";
const EXTRACTION_PATTERN: &str = r"(?i)^\[[^\]]+\]|unsupported url|unable to extract|is not a valid url";

/// Extraction client that drives the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlpClient {
    config: ExtractorConfig,
}

impl YtDlpClient {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, url: &Url, output_template: &str) -> Vec<String> {
        vec![
            "-f".to_owned(),
            self.config.format.clone(),
            "--newline".to_owned(),
            "--progress".to_owned(),
            "--progress-template".to_owned(),
            format!(
                "download:{}%(progress.{{status,downloaded_bytes,total_bytes,total_bytes_estimate}})j",
                PROGRESS_MARKER
            ),
            "--print".to_owned(),
            format!("after_move:{}%(title)s", TITLE_MARKER),
            "-o".to_owned(),
            output_template.to_owned(),
            "--".to_owned(),
            url.to_string(),
        ]
    }
}

impl ExtractionClient for YtDlpClient {
    fn extract(
        &self,
        url: &Url,
        output_template: &str,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<ExtractedMedia> {
        let args = self.build_args(url, output_template);
        log::debug!("spawning {} {:?}", self.config.binary.display(), args);

        let mut child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ExtractError::Other(format!(
                    "could not start {}: {}",
                    self.config.binary.display(),
                    e
                ))
            })?;

        // Drain stderr on its own thread so a chatty child never blocks on a full pipe
        let stderr_reader = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut lines = Vec::new();
                for_each_line(stderr, |line| {
                    log::debug!("yt-dlp: {}", line);
                    lines.push(line);
                });
                lines
            })
        });

        let mut title = None;
        if let Some(stdout) = child.stdout.take() {
            for_each_line(stdout, |line| {
                if let Some(event) = parse_progress_line(&line) {
                    on_progress(event);
                } else if let Some(found) = parse_title_line(&line) {
                    title = Some(found.to_string());
                }
            });
        }

        let status = child
            .wait()
            .map_err(|e| ExtractError::Other(format!("failed to wait for yt-dlp: {}", e)))?;
        let stderr_lines = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if status.success() {
            return Ok(ExtractedMedia {
                title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            });
        }

        Err(classify_failure(&stderr_lines)
            .unwrap_or_else(|| ExtractError::Other(format!("yt-dlp exited with {}", status))))
    }
}

/// Read `reader` to EOF, decoding each line lossily.
///
/// The pipe must stay open until the child exits, otherwise its next write
/// dies with SIGPIPE; output in a non-UTF-8 code page must not stop the loop.
fn for_each_line<R: Read>(reader: R, mut each: impl FnMut(String)) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                each(line.trim_end_matches(['\r', '\n']).to_string());
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("stopped reading yt-dlp output: {}", e);
                break;
            }
        }
    }
}

/// Parse a `--progress-template` line into a progress event
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let payload = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let raw: RawProgress = serde_json::from_str(payload.trim()).ok()?;

    Some(match raw.status.as_str() {
        "downloading" => ProgressEvent::Downloading {
            downloaded_bytes: raw.downloaded(),
            total_bytes: raw.total(),
        },
        "finished" => ProgressEvent::Finished,
        _ => ProgressEvent::Other(raw.status),
    })
}

pub fn parse_title_line(line: &str) -> Option<&str> {
    let title = line.trim().strip_prefix(TITLE_MARKER)?.trim();
    (!title.is_empty() && title != "NA").then_some(title)
}

/// Classify the last `ERROR:` line yt-dlp printed
pub fn classify_failure(stderr_lines: &[String]) -> Option<ExtractError> {
    let message = stderr_lines
        .iter()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:"))?
        .trim()
        .to_string();

    let is_transport = matches_pattern(TRANSPORT_PATTERN, &message);
    let is_extraction = matches_pattern(EXTRACTION_PATTERN, &message);

    Some(if is_transport {
        ExtractError::Transport(message)
    } else if is_extraction {
        ExtractError::Extraction(message)
    } else {
        ExtractError::Other(message)
    })
}

fn matches_pattern(pattern: &str, text: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.is_match(text))
}
