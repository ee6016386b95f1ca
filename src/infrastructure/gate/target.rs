use std::fmt;

use super::GateError;

/// A TCP endpoint the gate waits on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitTarget {
    pub host: String,
    pub port: u16,
}

impl WaitTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "tcp://[{}]:{}", self.host, self.port)
        } else {
            write!(f, "tcp://{}:{}", self.host, self.port)
        }
    }
}

impl std::str::FromStr for WaitTarget {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_target(s)
    }
}

/// Parse `host:port`, `tcp://host:port` or `tcp://[v6addr]:port`
pub fn parse_target(input: &str) -> Result<WaitTarget, GateError> {
    let trimmed = input.trim();

    let rest = match trimmed.split_once("://") {
        Some(("tcp", rest)) => rest,
        Some((scheme, _)) => {
            return Err(GateError::invalid_target(
                input,
                format!("unsupported scheme '{}', only tcp is supported", scheme),
            ));
        }
        None => trimmed,
    };

    let (host, port) = match rest.strip_prefix('[') {
        Some(bracketed) => {
            let (host, after) = bracketed
                .split_once(']')
                .ok_or_else(|| GateError::invalid_target(input, "unterminated '['"))?;
            let port = after
                .strip_prefix(':')
                .ok_or_else(|| GateError::invalid_target(input, "missing port"))?;
            (host, port)
        }
        None => rest
            .rsplit_once(':')
            .ok_or_else(|| GateError::invalid_target(input, "missing port"))?,
    };

    if host.is_empty() {
        return Err(GateError::invalid_target(input, "missing host"));
    }

    let port: u16 = port
        .parse()
        .map_err(|_| GateError::invalid_target(input, format!("invalid port '{}'", port)))?;

    if port == 0 {
        return Err(GateError::invalid_target(input, "port must be non-zero"));
    }

    Ok(WaitTarget::new(host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_scheme() {
        assert_eq!(
            parse_target("postgres:5432").unwrap(),
            WaitTarget::new("postgres", 5432)
        );
        assert_eq!(
            parse_target("tcp://db.internal:6543").unwrap(),
            WaitTarget::new("db.internal", 6543)
        );
    }

    #[test]
    fn test_parse_ipv6() {
        let target = parse_target("tcp://[::1]:5432").unwrap();
        assert_eq!(target.host, "::1");
        assert_eq!(target.to_string(), "tcp://[::1]:5432");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_target("postgres").is_err());
        assert!(parse_target(":5432").is_err());
        assert!(parse_target("postgres:abc").is_err());
        assert!(parse_target("postgres:0").is_err());
        assert!(parse_target("postgres:70000").is_err());
        assert!(parse_target("http://postgres:80").is_err());
        assert!(parse_target("tcp://[::1").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let target: WaitTarget = "tcp://postgres:5432".parse().unwrap();
        assert_eq!(target.to_string(), "tcp://postgres:5432");
    }
}
