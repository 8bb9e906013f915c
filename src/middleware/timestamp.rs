//! Receipt timestamp.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{Flow, Middleware};
use crate::request::Request;

/// When the request entered its chain. Inserted by [`Timestamp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTime(pub DateTime<Utc>);

impl RequestTime {
    /// ISO-8601 / RFC 3339 with millisecond precision, e.g.
    /// `2024-05-01T09:30:00.123Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Stamps every request with a [`RequestTime`]. Never short-circuits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Timestamp;

impl Middleware for Timestamp {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn process(&self, req: &mut Request) -> Flow {
        req.extensions_mut().insert(RequestTime(Utc::now()));
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn stamps_and_continues() {
        let before = Utc::now();
        let mut req = Request::new(Method::Get, "/");
        assert!(matches!(Timestamp.process(&mut req), Flow::Continue));

        let stamped = req.extensions().get::<RequestTime>().copied().unwrap();
        assert!(stamped.0 >= before);
        let iso = stamped.to_iso8601();
        assert!(iso.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&iso).is_ok());
    }
}
