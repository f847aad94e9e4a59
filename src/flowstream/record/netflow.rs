//! Positional layout of the standard flow tuple.
//!
//! Operators are configured with field indices; this module names the
//! positions of the flow export schema so configurations read as field
//! names rather than bare numbers. Position 0 is always the generated
//! record identifier.

use crate::flowstream::record::{FieldValue, FlowRecord};

/// Seconds since the epoch at which the flow was observed (float)
pub const TIME_SECONDS: usize = 1;
/// Date the record was parsed, `YYYY-MM-DD`
pub const PARSE_DATE: usize = 2;
/// Human-readable timestamp of the flow
pub const DATE_TIME_STR: usize = 3;
/// IP layer protocol name, e.g. `TCP`
pub const IP_LAYER_PROTOCOL: usize = 4;
/// IP layer protocol number
pub const IP_LAYER_PROTOCOL_CODE: usize = 5;
/// Source IP address
pub const SOURCE_IP: usize = 6;
/// Destination IP address
pub const DEST_IP: usize = 7;
/// Source port
pub const SOURCE_PORT: usize = 8;
/// Destination port
pub const DEST_PORT: usize = 9;
/// More-fragments flag
pub const MORE_FRAGMENTS: usize = 10;
/// Continuation-fragment count
pub const COUNT_FRAGMENTS: usize = 11;
/// Flow duration in seconds (float)
pub const DURATION_SECONDS: usize = 12;
/// Payload bytes sent by the source
pub const SRC_PAYLOAD_BYTES: usize = 13;
/// Payload bytes sent by the destination
pub const DEST_PAYLOAD_BYTES: usize = 14;
/// Total bytes sent by the source
pub const SRC_TOTAL_BYTES: usize = 15;
/// Total bytes sent by the destination
pub const DEST_TOTAL_BYTES: usize = 16;
/// Packets sent by the source
pub const SRC_PACKET_COUNT: usize = 17;
/// Packets sent by the destination
pub const DEST_PACKET_COUNT: usize = 18;

/// Number of positions in a flow record, identifier included
pub const ARITY: usize = 19;

/// Build a well-formed flow record from the commonly varied fields
///
/// The remaining schema positions are filled with representative
/// defaults so the record always satisfies [`ARITY`].
#[allow(clippy::too_many_arguments)]
pub fn make_netflow(
    id: u64,
    time_seconds: f64,
    source_ip: &str,
    dest_ip: &str,
    source_port: i64,
    dest_port: i64,
    duration_seconds: f64,
) -> FlowRecord {
    FlowRecord::new(
        id,
        vec![
            FieldValue::Float(time_seconds),
            FieldValue::String("1970-01-01".to_string()),
            FieldValue::String("1970-01-01T00:00:00".to_string()),
            FieldValue::String("TCP".to_string()),
            FieldValue::Integer(6),
            FieldValue::String(source_ip.to_string()),
            FieldValue::String(dest_ip.to_string()),
            FieldValue::Integer(source_port),
            FieldValue::Integer(dest_port),
            FieldValue::Integer(0),
            FieldValue::Integer(0),
            FieldValue::Float(duration_seconds),
            FieldValue::Integer(0),
            FieldValue::Integer(0),
            FieldValue::Integer(0),
            FieldValue::Integer(0),
            FieldValue::Integer(0),
            FieldValue::Integer(0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_netflow_matches_schema() {
        let record = make_netflow(7, 123.5, "10.0.0.1", "192.168.0.1", 80, 443, 0.25);

        assert_eq!(record.arity(), ARITY);
        assert_eq!(record.id(), 7);
        assert_eq!(
            record.field(SOURCE_IP).unwrap(),
            &FieldValue::String("10.0.0.1".to_string())
        );
        assert_eq!(
            record.field(DEST_IP).unwrap(),
            &FieldValue::String("192.168.0.1".to_string())
        );
        assert_eq!(record.field(TIME_SECONDS).unwrap(), &FieldValue::Float(123.5));
        assert_eq!(
            record.field(DURATION_SECONDS).unwrap(),
            &FieldValue::Float(0.25)
        );
    }
}
