//! Tests for FireMpqClient over loopback TCP
//!
//! These tests verify:
//! - Service probe and version capture
//! - Sessions opened through the client talk real sockets
//! - Config and handshake failures

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use firempq::{ClientConfig, FireMpqClient, FmpqError, PopOptions, PushMessage};

// =============================================================================
// Fake Server
// =============================================================================

/// Serve `connections` clients one after another, answering by keyword.
/// Returns every request line received.
fn spawn_server(greeting: &'static str, connections: usize) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..connections {
            let (stream, _) = listener.accept().unwrap();
            serve(stream, greeting, &mut seen);
        }
        seen
    });

    (addr, handle)
}

fn serve(stream: TcpStream, greeting: &str, seen: &mut Vec<String>) {
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);
    writer.write_all(greeting.as_bytes()).unwrap();

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let line = line.trim_end().to_string();
        let keyword = line.split(' ').next().unwrap_or("").to_string();
        seen.push(line);

        let reply: &[u8] = match keyword.as_str() {
            "QUIT" => return,
            "CTX" | "CRT" => b"+OK\n",
            "PUSH" => b"+MSG $3 m42\n",
            "POP" => b"+MSGS *1 %3 ID $3 m42 PL $11 hello world POPCNT :1\n",
            _ => b"-ERR 1 $15 unknown command\n",
        };
        if writer.write_all(reply).is_err() {
            return;
        }
    }
}

fn config_for(addr: &str) -> ClientConfig {
    ClientConfig::builder()
        .server_addr(addr)
        .read_timeout_ms(5000)
        .write_timeout_ms(5000)
        .build()
}

// =============================================================================
// Client Tests
// =============================================================================

#[test]
fn test_connect_records_version() {
    let (addr, server) = spawn_server("+HELLO 0.7.1\n", 1);

    let client = FireMpqClient::connect(config_for(&addr)).unwrap();
    assert_eq!(client.version(), "0.7.1");

    let seen = server.join().unwrap();
    assert_eq!(seen, vec!["QUIT"]);
}

#[test]
fn test_open_queue_push_and_pop() {
    let (addr, server) = spawn_server("+HELLO 0.7.1\n", 2);

    let client = FireMpqClient::connect(config_for(&addr)).unwrap();
    let mut queue = client.open_queue("jobs").unwrap();
    assert_eq!(queue.queue_name(), Some("jobs"));

    let id = queue.push(&PushMessage::new("hello world").unwrap()).unwrap();
    assert_eq!(id.as_deref(), Some("m42"));

    let messages = queue
        .pop(&PopOptions::builder().limit(1).build().unwrap())
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id(), "m42");
    assert_eq!(&messages[0].payload()[..], b"hello world");
    assert_eq!(messages[0].pop_count(), 1);

    queue.close().unwrap();

    let seen = server.join().unwrap();
    assert_eq!(
        seen,
        vec![
            "QUIT",
            "CTX $4 jobs",
            "PUSH PL $11 hello world",
            "POP LIMIT 1",
            "QUIT",
        ]
    );
}

#[test]
fn test_connect_bad_greeting() {
    let (addr, server) = spawn_server("+WELCOME\n", 1);

    let result = FireMpqClient::connect(config_for(&addr));
    assert!(matches!(result, Err(FmpqError::Handshake(_))));

    drop(result);
    server.join().unwrap();
}

#[test]
fn test_connect_refused() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };

    let result = FireMpqClient::connect(config_for(&addr));
    assert!(matches!(result, Err(FmpqError::Io(_))));
}

#[test]
fn test_invalid_config_rejected_before_dialing() {
    let config = ClientConfig::builder()
        .server_addr("127.0.0.1:1")
        .recv_buffer_size(0)
        .build();
    assert!(matches!(
        FireMpqClient::connect(config),
        Err(FmpqError::Config(_))
    ));

    let config = ClientConfig::builder().server_addr("  ").build();
    assert!(matches!(
        FireMpqClient::connect(config),
        Err(FmpqError::Config(_))
    ));
}

#[test]
fn test_default_config() {
    let config = ClientConfig::default();
    assert_eq!(config.server_addr, "127.0.0.1:9033");
    assert_eq!(config.recv_buffer_size, 4096);
    assert!(config.nodelay);
    assert!(config.validate().is_ok());
}
