//! Tests for the Command Encoder
//!
//! These tests verify:
//! - Exact request lines for every keyword
//! - Sparse encoding of optional arguments
//! - Batch items joined with NXT
//! - Encoded payloads survive tokenization unchanged

#[path = "../common/mod.rs"]
mod common;

use firempq::protocol::{encode_command, write_command, Command};
use firempq::{PopLockOptions, PopOptions, PushMessage, QueueOptions};

fn line(command: Command<'_>) -> String {
    String::from_utf8(encode_command(&command).to_vec()).unwrap()
}

// =============================================================================
// Queue Context Tests
// =============================================================================

#[test]
fn test_encode_context() {
    assert_eq!(line(Command::Context { queue: "jobs" }), "CTX $4 jobs\n");
}

#[test]
fn test_encode_create_without_options() {
    let options = QueueOptions::default();
    assert_eq!(
        line(Command::Create { queue: "jobs", options: &options }),
        "CRT jobs pqueue\n"
    );
}

#[test]
fn test_encode_create_with_options() {
    let options = QueueOptions::builder()
        .msg_ttl(5000)
        .max_size(100)
        .delay(0)
        .build()
        .unwrap();
    assert_eq!(
        line(Command::Create { queue: "jobs", options: &options }),
        "CRT jobs pqueue MSGTTL 5000 MAXSIZE 100 DELAY 0\n"
    );
}

#[test]
fn test_encode_set_config() {
    let options = QueueOptions::builder()
        .pop_limit(3)
        .lock_timeout(1000)
        .build()
        .unwrap();
    assert_eq!(
        line(Command::SetConfig { options: &options }),
        "SETCFG POPLIMIT 3 TIMEOUT 1000\n"
    );
}

// =============================================================================
// Push Tests
// =============================================================================

#[test]
fn test_encode_push_minimal() {
    let message = PushMessage::new("hello").unwrap();
    assert_eq!(line(Command::Push { message: &message }), "PUSH PL $5 hello\n");
}

#[test]
fn test_encode_push_all_fields() {
    let message = PushMessage::builder("hello")
        .id("m1")
        .priority(-2)
        .delay(10)
        .ttl(0)
        .sync_wait(true)
        .build()
        .unwrap();
    assert_eq!(
        line(Command::Push { message: &message }),
        "PUSH ID $2 m1 PRIORITY -2 DELAY 10 TTL 0 SYNCWAIT PL $5 hello\n"
    );
}

#[test]
fn test_encode_push_batch() {
    let messages = vec![
        PushMessage::new("a").unwrap(),
        PushMessage::builder("b").id("b").build().unwrap(),
        PushMessage::new("c").unwrap(),
    ];
    assert_eq!(
        line(Command::PushBatch { messages: &messages }),
        "PUSHB PL $1 a NXT ID $1 b PL $1 b NXT PL $1 c\n"
    );
}

#[test]
fn test_encoded_payload_tokenizes_back() {
    let payload: &[u8] = b"line one\nline two \x00";
    let message = PushMessage::builder(payload.to_vec()).id("x").build().unwrap();
    let encoded = encode_command(&Command::Push { message: &message });

    let tokens = common::tokens(&encoded);
    assert_eq!(tokens.len(), 5);
    assert_eq!(&tokens[0][..], b"PUSH");
    assert_eq!(&tokens[2][..], b"x");
    assert_eq!(&tokens[3][..], b"PL");
    assert_eq!(&tokens[4][..], payload);
}

// =============================================================================
// Pop Tests
// =============================================================================

#[test]
fn test_encode_pop_defaults() {
    let options = PopOptions::default();
    assert_eq!(line(Command::Pop { options: &options }), "POP\n");
}

#[test]
fn test_encode_pop_with_options() {
    let options = PopOptions::builder()
        .limit(10)
        .wait(500)
        .async_id("cb1")
        .build()
        .unwrap();
    assert_eq!(
        line(Command::Pop { options: &options }),
        "POP LIMIT 10 WAIT 500 ASYNC $3 cb1\n"
    );
}

#[test]
fn test_encode_pop_lock() {
    let options = PopLockOptions::builder()
        .limit(2)
        .lock_timeout(0)
        .build()
        .unwrap();
    assert_eq!(
        line(Command::PopLock { options: &options }),
        "POPLCK LIMIT 2 TIMEOUT 0\n"
    );

    let options = PopLockOptions::builder()
        .limit(1)
        .wait(100)
        .lock_timeout(30000)
        .async_id("a")
        .build()
        .unwrap();
    assert_eq!(
        line(Command::PopLock { options: &options }),
        "POPLCK LIMIT 1 WAIT 100 TIMEOUT 30000 ASYNC $1 a\n"
    );
}

// =============================================================================
// Delete / Unlock Tests
// =============================================================================

#[test]
fn test_encode_id_and_receipt_commands() {
    assert_eq!(line(Command::DeleteById { id: "m1" }), "DEL $2 m1\n");
    assert_eq!(line(Command::DeleteLockedById { id: "m1" }), "DELLCK $2 m1\n");
    assert_eq!(line(Command::DeleteByReceipt { receipt: "r-01" }), "RDEL $4 r-01\n");
    assert_eq!(line(Command::UnlockById { id: "m1" }), "UNLCK $2 m1\n");
    assert_eq!(line(Command::UnlockByReceipt { receipt: "r-01" }), "RUNLCK $4 r-01\n");
    assert_eq!(line(Command::Quit), "QUIT\n");
}

#[test]
fn test_keywords() {
    let pop = PopOptions::default();
    let lock = PopLockOptions::default();
    assert_eq!(Command::Context { queue: "q" }.keyword(), "CTX");
    assert_eq!(Command::Pop { options: &pop }.keyword(), "POP");
    assert_eq!(Command::PopLock { options: &lock }.keyword(), "POPLCK");
    assert_eq!(Command::PushBatch { messages: &[] }.keyword(), "PUSHB");
    assert_eq!(Command::UnlockByReceipt { receipt: "r" }.keyword(), "RUNLCK");
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_write_command_to_stream() {
    let mut out = Vec::new();
    write_command(&mut out, &Command::DeleteById { id: "abc" }).unwrap();
    write_command(&mut out, &Command::Quit).unwrap();
    assert_eq!(out, b"DEL $3 abc\nQUIT\n");
}
