/// SIMPSON FID/SPE text reader
///
/// SIMPSON writes its simulated time-domain (FID) and frequency-domain (SPE)
/// results as plain text:
///
/// ```text
/// SIMP
/// NP=2048
/// SW=20000
/// REF=0
/// TYPE=SPE
/// DATA
/// 0.1234 -0.0021
/// ...            (exactly NP lines of "re im")
/// END
/// ```
///
///   - Line 1 is the literal `SIMP` marker (informational only)
///   - Header lines are `key=value`, split on the first `=`
///   - `NP` (points) and `SW` (spectral width, Hz) are required
///   - `REF` (reference offset, Hz) defaults to 0
///   - `TYPE` selects how the x-axis is built: FID → time in ms,
///     SPE → frequency in Hz centred on `-REF`
///
/// Parsing is permissive about the header and strict about the data block:
/// header oddities become [`FormatWarning`]s, a short or garbled data block
/// is an error.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First line of every SIMPSON data file
pub const MAGIC: &str = "SIMP";
/// Line separating the header from the sample block
pub const DATA_MARKER: &str = "DATA";
/// Prefix of the output line listing files written by a simulation
pub const OUTPUT_FILES_PREFIX: &str = "simview:";
/// Upper bound on the sample buffer reserved from the NP field
const MAX_PREALLOCATED_SAMPLES: usize = 65_536;

/// Time-domain or frequency-domain data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataKind {
    Fid,
    Spe,
}

impl DataKind {
    fn from_field(value: &str) -> Option<Self> {
        match value {
            "FID" => Some(DataKind::Fid),
            "SPE" => Some(DataKind::Spe),
            _ => None,
        }
    }

    /// Label of the physical x-axis
    pub fn axis_label(&self) -> &'static str {
        match self {
            DataKind::Fid => "time [ms]",
            DataKind::Spe => "frequency [Hz]",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Fid => write!(f, "FID"),
            DataKind::Spe => write!(f, "SPE"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FidSpeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing header field {0}")]
    MissingField(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidField { key: &'static str, value: String },
    #[error("Unknown TYPE {0:?} (expected FID or SPE)")]
    UnknownType(String),
    #[error("Data truncated: expected {expected} points, read {found}")]
    TruncatedData {
        expected: usize,
        found: usize,
        /// 1-based line number of a data line that failed to parse
        bad_line: Option<usize>,
    },
}

/// Non-fatal header anomaly
#[derive(Debug, Clone, PartialEq)]
pub enum FormatWarning {
    /// First line was not `SIMP`
    MissingMagic { found: String },
    /// Header line without `=`; it is skipped
    MalformedHeaderLine { line: usize, text: String },
    /// Key seen twice; the later value wins
    DuplicateField { key: String },
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatWarning::MissingMagic { found } => {
                write!(f, "not a SIMPSON file: first line is {:?}, expected {:?}", found, MAGIC)
            }
            FormatWarning::MalformedHeaderLine { line, text } => {
                write!(f, "header line {} has no '=': {:?}", line, text)
            }
            FormatWarning::DuplicateField { key } => {
                write!(f, "header field {} given more than once", key)
            }
        }
    }
}

/// Typed view of the header
#[derive(Debug, Clone, PartialEq)]
pub struct FidSpeHeader {
    pub np: usize,
    /// Spectral width in Hz
    pub sw: f64,
    /// Reference offset in Hz
    pub reference: f64,
    pub kind: DataKind,
    /// Every header field as written, including the typed ones
    pub fields: BTreeMap<String, String>,
}

impl FidSpeHeader {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|s| s.as_str())
    }
}

/// A successfully parsed file
#[derive(Debug, Clone)]
pub struct FidSpeData {
    pub header: FidSpeHeader,
    pub samples: Vec<Complex64>,
    pub x_axis: Vec<f64>,
    pub warnings: Vec<FormatWarning>,
}

impl FidSpeData {
    pub fn kind(&self) -> DataKind {
        self.header.kind
    }
}

/// Read and parse a FID/SPE file from disk
pub fn read_fidspe_file(path: &Path) -> Result<FidSpeData, FidSpeError> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Parse FID/SPE content held in memory
pub fn parse_str(content: &str) -> Result<FidSpeData, FidSpeError> {
    parse(content.as_bytes())
}

/// Parse a FID/SPE stream
pub fn parse<R: BufRead>(reader: R) -> Result<FidSpeData, FidSpeError> {
    let mut lines = reader.lines().enumerate();
    let mut warnings = Vec::new();

    let first = match lines.next() {
        Some((_, line)) => line?,
        None => String::new(),
    };
    if first != MAGIC {
        warnings.push(FormatWarning::MissingMagic { found: first });
    }

    // Header: key=value until DATA
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    for (idx, line) in lines.by_ref() {
        let line = line?;
        if line == DATA_MARKER {
            break;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                let key = key.trim().to_string();
                if fields.insert(key.clone(), value.trim().to_string()).is_some() {
                    warnings.push(FormatWarning::DuplicateField { key });
                }
            }
            None if line.trim().is_empty() => {}
            None => warnings.push(FormatWarning::MalformedHeaderLine {
                line: idx + 1,
                text: line,
            }),
        }
    }

    let np: usize = required(&fields, "NP")?;
    let sw: f64 = required(&fields, "SW")?;
    if !sw.is_finite() || sw == 0.0 {
        return Err(FidSpeError::InvalidField {
            key: "SW",
            value: fields["SW"].clone(),
        });
    }
    let reference: f64 = optional(&fields, "REF")?.unwrap_or(0.0);

    // Data block: exactly NP lines of "re im"
    let mut samples = Vec::with_capacity(np.min(MAX_PREALLOCATED_SAMPLES));
    while samples.len() < np {
        let Some((idx, line)) = lines.next() else {
            return Err(FidSpeError::TruncatedData {
                expected: np,
                found: samples.len(),
                bad_line: None,
            });
        };
        let line = line?;
        match parse_sample(&line) {
            Some(sample) => samples.push(sample),
            None => {
                return Err(FidSpeError::TruncatedData {
                    expected: np,
                    found: samples.len(),
                    bad_line: Some(idx + 1),
                })
            }
        }
    }

    let type_raw = fields.get("TYPE").ok_or(FidSpeError::MissingField("TYPE"))?;
    let kind =
        DataKind::from_field(type_raw).ok_or_else(|| FidSpeError::UnknownType(type_raw.clone()))?;

    let x_axis = build_x_axis(kind, np, sw, reference);

    Ok(FidSpeData {
        header: FidSpeHeader {
            np,
            sw,
            reference,
            kind,
            fields,
        },
        samples,
        x_axis,
        warnings,
    })
}

/// Physical x-axis for `np` points.
///
/// FID: `step = 1000/SW` ms starting at 0.
/// SPE: `step = SW/(NP-1)` Hz, shifted by `SW/2 - REF`.
pub fn build_x_axis(kind: DataKind, np: usize, sw: f64, reference: f64) -> Vec<f64> {
    let (step, corr) = match kind {
        DataKind::Spe => {
            // a single point has no spacing; it sits at -corr
            let step = if np > 1 { sw / (np - 1) as f64 } else { 0.0 };
            (step, sw / 2.0 - reference)
        }
        DataKind::Fid => (1.0e3 / sw, 0.0),
    };
    (0..np).map(|i| i as f64 * step - corr).collect()
}

fn required<T: FromStr>(
    fields: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<T, FidSpeError> {
    optional(fields, key)?.ok_or(FidSpeError::MissingField(key))
}

fn optional<T: FromStr>(
    fields: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<Option<T>, FidSpeError> {
    match fields.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| FidSpeError::InvalidField {
                key,
                value: raw.clone(),
            }),
    }
}

fn parse_sample(line: &str) -> Option<Complex64> {
    let mut parts = line.split_whitespace();
    let re = parts.next()?.parse::<f64>().ok()?;
    let im = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Complex64::new(re, im))
}

/// Result files announced by a finished simulation.
///
/// SIMPSON prints `simview: a.spe b.fid` when a script asks for its results
/// to be displayed. Only the last such line counts; names are resolved
/// against the simulation's working directory.
pub fn files_from_output(output: &str, workdir: &Path) -> Vec<PathBuf> {
    output
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(OUTPUT_FILES_PREFIX))
        .map(|names| {
            names
                .split_whitespace()
                .map(|name| workdir.join(name))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spe_file() -> String {
        "SIMP\nNP=4\nSW=100\nREF=0\nTYPE=SPE\nDATA\n1 0\n2 0.5\n3 -1\n4 2\nEND\n".to_string()
    }

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{} != {}", x, y);
        }
    }

    #[test]
    fn test_spe_axis() {
        let data = parse_str(&spe_file()).unwrap();
        assert_eq!(data.kind(), DataKind::Spe);
        assert_eq!(data.header.np, 4);
        assert_close(&data.x_axis, &[-50.0, -50.0 / 3.0, 50.0 / 3.0, 50.0]);
        assert_eq!(data.samples[1], Complex64::new(2.0, 0.5));
        assert!(data.warnings.is_empty());
    }

    #[test]
    fn test_fid_axis() {
        let text = "SIMP\nNP=3\nSW=1000\nTYPE=FID\nDATA\n1 0\n0.5 0.5\n0 1\n";
        let data = parse_str(text).unwrap();
        assert_eq!(data.kind(), DataKind::Fid);
        assert_close(&data.x_axis, &[0.0, 1.0, 2.0]);
        assert_eq!(data.header.reference, 0.0);
    }

    #[test]
    fn test_reference_shifts_spectrum() {
        let text = spe_file().replace("REF=0", "REF=10");
        let data = parse_str(&text).unwrap();
        assert!((data.x_axis[0] + 40.0).abs() < 1e-9);
        assert!((data.x_axis[3] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_magic_is_warning() {
        let text = spe_file().replacen("SIMP", "SOMETHING", 1);
        let data = parse_str(&text).unwrap();
        assert_eq!(
            data.warnings,
            vec![FormatWarning::MissingMagic {
                found: "SOMETHING".to_string()
            }]
        );
        assert_eq!(data.samples.len(), 4);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = spe_file().replace('\n', "\r\n");
        let data = parse_str(&text).unwrap();
        assert!(data.warnings.is_empty());
        assert_eq!(data.samples.len(), 4);
    }

    #[test]
    fn test_missing_np_and_sw() {
        let err = parse_str("SIMP\nSW=100\nTYPE=SPE\nDATA\n").unwrap_err();
        assert!(matches!(err, FidSpeError::MissingField("NP")));
        let err = parse_str("SIMP\nNP=1\nTYPE=SPE\nDATA\n1 1\n").unwrap_err();
        assert!(matches!(err, FidSpeError::MissingField("SW")));
    }

    #[test]
    fn test_invalid_np() {
        let err = parse_str("SIMP\nNP=four\nSW=100\nTYPE=SPE\nDATA\n").unwrap_err();
        match err {
            FidSpeError::InvalidField { key, value } => {
                assert_eq!(key, "NP");
                assert_eq!(value, "four");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type() {
        let text = spe_file().replace("TYPE=SPE", "TYPE=XYZ");
        let err = parse_str(&text).unwrap_err();
        assert!(matches!(err, FidSpeError::UnknownType(ref t) if t == "XYZ"));
    }

    #[test]
    fn test_truncated_data() {
        let text = "SIMP\nNP=5\nSW=100\nTYPE=SPE\nDATA\n1 0\n2 0\n3 0\n";
        let err = parse_str(text).unwrap_err();
        match err {
            FidSpeError::TruncatedData {
                expected,
                found,
                bad_line,
            } => {
                assert_eq!(expected, 5);
                assert_eq!(found, 3);
                assert_eq!(bad_line, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_huge_np_is_truncated_not_allocated() {
        let text = "SIMP\nNP=1000000000000000000\nSW=100\nTYPE=SPE\nDATA\n1 0\n2 0\n";
        let err = parse_str(text).unwrap_err();
        assert!(matches!(
            err,
            FidSpeError::TruncatedData {
                expected: 1_000_000_000_000_000_000,
                found: 2,
                bad_line: None,
            }
        ));
    }

    #[test]
    fn test_garbled_data_line() {
        let text = "SIMP\nNP=3\nSW=100\nTYPE=SPE\nDATA\n1 0\n2 oops\n3 0\n";
        let err = parse_str(text).unwrap_err();
        assert!(matches!(
            err,
            FidSpeError::TruncatedData {
                found: 1,
                bad_line: Some(7),
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_header_line_skipped() {
        let text = spe_file().replace("REF=0\n", "REF=0\ngarbage\n");
        let data = parse_str(&text).unwrap();
        assert!(matches!(
            data.warnings.as_slice(),
            [FormatWarning::MalformedHeaderLine { line: 5, .. }]
        ));
    }

    #[test]
    fn test_value_split_on_first_equals() {
        let text = spe_file().replace("REF=0\n", "REF=0\nNOTE=a=b\n");
        let data = parse_str(&text).unwrap();
        assert_eq!(data.header.get("NOTE"), Some("a=b"));
    }

    #[test]
    fn test_single_point_spectrum() {
        let text = "SIMP\nNP=1\nSW=100\nTYPE=SPE\nDATA\n1 0\n";
        let data = parse_str(text).unwrap();
        assert_eq!(data.x_axis, vec![-50.0]);
    }

    #[test]
    fn test_files_from_output_uses_last_line() {
        let output = "Executing test.in\nsimview: old.spe\nsome progress\nsimview: a.spe  b.fid\nProcess finished.\n";
        let files = files_from_output(output, Path::new("/work"));
        assert_eq!(
            files,
            vec![PathBuf::from("/work/a.spe"), PathBuf::from("/work/b.fid")]
        );
        assert!(files_from_output("nothing here", Path::new("/work")).is_empty());
    }

    #[test]
    fn test_read_file() {
        let path = std::env::temp_dir().join(format!("simview-{}.spe", uuid::Uuid::new_v4()));
        std::fs::write(&path, spe_file()).unwrap();
        let data = read_fidspe_file(&path).unwrap();
        assert_eq!(data.samples.len(), 4);
        let _ = std::fs::remove_file(&path);

        let missing = read_fidspe_file(Path::new("/definitely/not/here.spe"));
        assert!(matches!(missing, Err(FidSpeError::Io(_))));
    }
}
