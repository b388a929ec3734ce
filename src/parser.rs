use rosc::{OscError, OscMessage, OscPacket};

/// Decode one datagram into the messages it carries.
///
/// A datagram holds either a single message or a bundle; bundles are flattened
/// depth-first so the caller always sees a flat list. Bundle timestamps are not
/// interpreted.
pub fn parse_datagram(data: &[u8]) -> Result<Vec<OscMessage>, OscError> {
    let (_rest, packet) = rosc::decoder::decode_udp(data)?;
    let mut messages = Vec::new();
    flatten(packet, &mut messages);
    Ok(messages)
}

fn flatten(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(message) => out.push(message),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                flatten(inner, out);
            }
        }
    }
}
