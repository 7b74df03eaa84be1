/// Random identifier used to correlate one connection's log lines.
///
/// Player ids come from the room registry; this one only exists for tracing spans.
pub fn conn_id() -> u64 {
    rand::random()
}
