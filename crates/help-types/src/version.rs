use std::cmp::Ordering;
use std::fmt;

use crate::error::TypesError;

/// A dotted-quadruple platform version, e.g. `8.3.27.1989`.
///
/// Ordering is lexicographic over the four numeric components — the same
/// rule `help-discovery` uses to pick the highest-versioned installation
/// and `help-index` uses to compare a discovered version against the one
/// recorded in the index's metadata table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Version {
    parts: [u64; 4],
}

impl Version {
    /// Parse a dotted-quadruple string like `"8.3.27.1989"`.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidVersion`] unless the string is exactly
    /// four dot-separated non-negative integers.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() != 4 {
            return Err(TypesError::InvalidVersion {
                raw: raw.to_owned(),
            });
        }

        let mut parts = [0u64; 4];
        for (i, segment) in segments.iter().enumerate() {
            parts[i] = segment.parse::<u64>().map_err(|_| TypesError::InvalidVersion {
                raw: raw.to_owned(),
            })?;
        }

        Ok(Self { parts })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.parts[0], self.parts[1], self.parts[2], self.parts[3]
        )
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_quadruple() {
        let v = Version::parse("8.3.27.1989").unwrap();
        assert_eq!(v.to_string(), "8.3.27.1989");
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(Version::parse("8.3.27").is_err());
        assert!(Version::parse("8.3.27.1989.1").is_err());
    }

    #[test]
    fn rejects_non_numeric_segment() {
        assert!(Version::parse("8.3.a.1989").is_err());
    }

    #[test]
    fn orders_lexicographically_by_component() {
        let low = Version::parse("8.3.20.1000").unwrap();
        let high = Version::parse("8.3.27.1").unwrap();
        assert!(high > low);

        let a = Version::parse("8.3.27.1989").unwrap();
        let b = Version::parse("8.10.1.1").unwrap();
        assert!(b > a, "second component dominates third/fourth");
    }
}
