//! Dot/bracket option paths (`display.grid[0].color`) and an immutable setter.

use crate::constants::MAX_INDEX_GAP;
use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn as_key(&self) -> String {
        match self {
            Segment::Key(k) => k.clone(),
            Segment::Index(i) => i.to_string(),
        }
    }

    fn empty_container(&self) -> Value {
        match self {
            Segment::Key(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        }
    }
}

/// A parsed option path. Most paths are short, hence the inline storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionPath {
    segments: SmallVec<[Segment; 4]>,
}

impl OptionPath {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<Vec<Segment>> for OptionPath {
    fn from(v: Vec<Segment>) -> Self {
        Self {
            segments: SmallVec::from_vec(v),
        }
    }
}

impl FromStr for OptionPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ConfigError::InvalidPath(s.to_string());
        if s.is_empty() {
            return Err(invalid());
        }
        let mut segments = SmallVec::new();
        for piece in s.split('.') {
            // `name[1][2]` -> Key(name), Index(1), Index(2); a bare `[0]` has no name
            let (name, mut rest) = match piece.find('[') {
                Some(i) => (&piece[..i], &piece[i..]),
                None => (piece, ""),
            };
            if name.is_empty() && rest.is_empty() {
                return Err(invalid());
            }
            if !name.is_empty() {
                segments.push(key_or_index(name));
            }
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(invalid)?;
                if !rest.starts_with('[') || close < 2 {
                    return Err(invalid());
                }
                let inner = rest[1..close].trim_matches(|c| c == '"' || c == '\'');
                if inner.is_empty() {
                    return Err(invalid());
                }
                segments.push(key_or_index(inner));
                rest = &rest[close + 1..];
            }
        }
        Ok(Self { segments })
    }
}

fn key_or_index(s: &str) -> Segment {
    match s.parse::<usize>() {
        Ok(i) if s.bytes().all(|b| b.is_ascii_digit()) => Segment::Index(i),
        _ => Segment::Key(s.to_string()),
    }
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

/// Return a copy of `root` with `value` stored at `path`.
///
/// Missing or non-container intermediates are replaced by an object, or by an
/// array when the following segment is an index. Arrays are padded with
/// `null` up to the written index, at most [`MAX_INDEX_GAP`] past their end;
/// a farther index is an invalid path.
pub fn set_at(root: &Value, path: &OptionPath, value: Value) -> Result<Value> {
    if path.is_empty() {
        return Err(ConfigError::InvalidPath(String::new()));
    }
    set_segments(root, path.segments(), value).ok_or_else(|| ConfigError::InvalidPath(path.to_string()))
}

fn set_segments(node: &Value, path: &[Segment], value: Value) -> Option<Value> {
    let Some((seg, rest)) = path.split_first() else {
        return Some(value);
    };
    let child_for = |existing: Option<&Value>| -> Option<Value> {
        let fresh = rest.first().map(Segment::empty_container).unwrap_or(Value::Null);
        let child = match existing {
            Some(v @ (Value::Object(_) | Value::Array(_))) => v,
            Some(v) if rest.is_empty() => v,
            _ => &fresh,
        };
        set_segments(child, rest, value.clone())
    };
    match (node, seg) {
        (Value::Object(m), seg) => {
            let key = seg.as_key();
            let mut out = m.clone();
            out.insert(key.clone(), child_for(m.get(&key))?);
            Some(Value::Object(out))
        }
        (Value::Array(a), Segment::Index(i)) => {
            if *i > a.len().saturating_add(MAX_INDEX_GAP) {
                return None;
            }
            let mut out = a.clone();
            if out.len() <= *i {
                out.resize(i.checked_add(1)?, Value::Null);
            }
            out[*i] = child_for(a.get(*i))?;
            Some(Value::Array(out))
        }
        (Value::Array(_), Segment::Key(_)) => None,
        (_, seg) => set_segments(&seg.empty_container(), path, value),
    }
}

/// Read the value at `path`, if every segment resolves.
pub fn get_at<'a>(root: &'a Value, path: &OptionPath) -> Option<&'a Value> {
    path.segments().iter().try_fold(root, |node, seg| match (node, seg) {
        (Value::Object(m), seg) => m.get(&seg.as_key()),
        (Value::Array(a), Segment::Index(i)) => a.get(*i),
        _ => None,
    })
}
