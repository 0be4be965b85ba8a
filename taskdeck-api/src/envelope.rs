/// Success response envelope
///
/// Every successful response is `{"ok": true, "data": ...}`; failures use
/// the matching shape in `crate::error`. Clients branch on `ok` alone.

use serde::Serialize;

/// Wrapper serializing a payload into the `{ok, data}` envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always true for successes
    pub ok: bool,

    /// Response payload
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload in a success envelope
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(Envelope::new(vec![1, 2, 3])).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_unit_payload_serializes_as_null() {
        let json = serde_json::to_value(Envelope::new(())).unwrap();
        assert_eq!(json["ok"], true);
        assert!(json["data"].is_null());
    }
}
