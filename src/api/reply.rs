//! Reply definitions
//!
//! Represents the result of an executed command.

use std::collections::HashMap;
use std::fmt;

use crate::storage::CollectionKind;

/// The result of [`Engine::execute`](crate::Engine::execute)
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The write succeeded and returns nothing
    Ok,

    /// HEXISTS, ZADD (member was new), ZREM (member was present)
    Bool(bool),

    /// HINCR, HGETINT
    Int(i64),

    /// HLEN, ZCARD
    Count(u64),

    /// ZSCORE
    Float(f64),

    /// HGET
    Value(Option<Vec<u8>>),

    /// HMGET, one slot per requested field
    Values(Vec<Option<Vec<u8>>>),

    /// ZRANGE / ZREVRANGE
    Members(Vec<Vec<u8>>),

    /// ZRANGE / ZREVRANGE with scores
    Scored(Vec<(Vec<u8>, f64)>),

    /// HSCAN, HRSCAN, HPREFIX
    Map(HashMap<Vec<u8>, Vec<u8>>),

    /// KIND
    Kind(Option<CollectionKind>),

    /// COLLECTIONS
    Collections(Vec<(String, CollectionKind)>),
}

/// Human-readable rendering, one item per line
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Bool(b) => write!(f, "{}", u8::from(*b)),
            Reply::Int(n) => write!(f, "{n}"),
            Reply::Count(n) => write!(f, "{n}"),
            Reply::Float(x) => write!(f, "{x}"),
            Reply::Value(value) => write_optional(f, value.as_deref()),
            Reply::Values(values) => write_lines(f, values.iter(), |f, value| {
                write_optional(f, value.as_deref())
            }),
            Reply::Members(members) => {
                write_lines(f, members.iter(), |f, member| write_bytes(f, member))
            }
            Reply::Scored(members) => write_lines(f, members.iter(), |f, (member, score)| {
                write_bytes(f, member)?;
                write!(f, " {score}")
            }),
            Reply::Map(map) => {
                let mut pairs: Vec<_> = map.iter().collect();
                pairs.sort();
                write_lines(f, pairs.into_iter(), |f, (field, value)| {
                    write_bytes(f, field)?;
                    f.write_str(" => ")?;
                    write_bytes(f, value)
                })
            }
            Reply::Kind(kind) => match kind {
                Some(kind) => write!(f, "{kind}"),
                None => f.write_str("none"),
            },
            Reply::Collections(collections) => {
                write_lines(f, collections.iter(), |f, (name, kind)| write!(f, "{name} ({kind})"))
            }
        }
    }
}

fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "{}", String::from_utf8_lossy(bytes))
}

fn write_optional(f: &mut fmt::Formatter<'_>, value: Option<&[u8]>) -> fmt::Result {
    match value {
        Some(bytes) => write_bytes(f, bytes),
        None => f.write_str("(nil)"),
    }
}

fn write_lines<I, T>(
    f: &mut fmt::Formatter<'_>,
    items: I,
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result
where
    I: Iterator<Item = T>,
{
    let mut empty = true;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        write_item(f, item)?;
        empty = false;
    }
    if empty {
        f.write_str("(empty)")?;
    }
    Ok(())
}
