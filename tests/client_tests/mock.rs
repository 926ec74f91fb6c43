//! Scripted daemon helpers

use std::os::unix::net::UnixStream;
use std::thread::{self, JoinHandle};

use sysmon::protocol::{
    read_packet, write_packet, encode_alert, Field, OpCode, Packet, ResultCode, PROTOCOL_VERSION,
};
use sysmon::{Alert, AlertTypeMap, Client, ClientConfig, Result};

/// Config with short timeouts so a broken test fails instead of hanging
pub fn test_config() -> ClientConfig {
    ClientConfig::builder()
        .read_timeout_ms(2000)
        .write_timeout_ms(2000)
        .build()
}

/// Run `script` as the daemon on one end of a socket pair
pub fn spawn_daemon<T, F>(script: F) -> (UnixStream, JoinHandle<T>)
where
    T: Send + 'static,
    F: FnOnce(UnixStream) -> T + Send + 'static,
{
    let (client, daemon) = UnixStream::pair().unwrap();
    let handle = thread::spawn(move || script(daemon));
    (client, handle)
}

/// Connect a client whose daemon accepts the handshake and then runs `script`
pub fn connected<T, F>(script: F) -> (Client, JoinHandle<T>)
where
    T: Send + 'static,
    F: FnOnce(UnixStream) -> T + Send + 'static,
{
    connected_with_types(AlertTypeMap::new(), script)
}

pub fn connected_with_types<T, F>(types: AlertTypeMap, script: F) -> (Client, JoinHandle<T>)
where
    T: Send + 'static,
    F: FnOnce(UnixStream) -> T + Send + 'static,
{
    let (stream, handle) = spawn_daemon(move |mut daemon| {
        accept_handshake(&mut daemon);
        script(daemon)
    });
    let client = Client::from_stream(stream, types, &test_config()).unwrap();
    (client, handle)
}

/// Read the VERSION packet and answer OK
pub fn accept_handshake(daemon: &mut UnixStream) {
    let packet = read_packet(daemon).unwrap();
    assert_eq!(packet.opcode, OpCode::Version);

    let mut reader = packet.reader();
    assert_eq!(reader.read_var(Field::Version).unwrap(), PROTOCOL_VERSION as u64);
    reader.finish().unwrap();

    send(daemon, &Packet::result(ResultCode::Ok, &[]));
}

pub fn send(daemon: &mut UnixStream, packet: &Packet) {
    write_packet(daemon, packet).unwrap();
}

pub fn send_matches(daemon: &mut UnixStream, count: u32) {
    send(daemon, &Packet::result(ResultCode::AlertMatches, &count.to_be_bytes()));
}

pub fn send_record(daemon: &mut UnixStream, alert: &Alert) {
    send(daemon, &Packet::new(OpCode::AlertRecord, encode_alert(alert).unwrap()));
}

pub fn recv(daemon: &mut UnixStream) -> Result<Packet> {
    read_packet(daemon)
}

/// Alert with a recognizable id and fixed stamp
pub fn alert(id: u64) -> Alert {
    let mut alert = Alert::new();
    alert
        .set_id(id)
        .set_stamp(Some(1_700_000_000 + id as u32))
        .set_type(1)
        .set_user(1000)
        .add_group(100)
        .set_description(format!("alert {}", id));
    alert
}
