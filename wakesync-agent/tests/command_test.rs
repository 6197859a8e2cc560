use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::Duration;

use wakesync_agent::configs::Wake;
use wakesync_agent::errors::{CommandError, WakeError};
use wakesync_agent::services::{WakeService, handle_payload};

fn loopback_service() -> (UdpSocket, WakeService) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let port = socket.local_addr().unwrap().port();

    let service = WakeService::new(&Wake {
        broadcast_addr: "127.0.0.1".to_string(),
        port,
    });

    (socket, service)
}

#[tokio::test]
async fn test_valid_command_is_normalized_and_sent() {
    let (socket, service) = loopback_service();

    let mac = handle_payload(&service, br#"{"mac":" aa:bb:cc:dd:ee:ff "}"#)
        .await
        .unwrap();
    assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");

    let mut buffer = [0u8; 256];
    let (received, _) = socket.recv_from(&mut buffer).unwrap();

    assert_eq!(received, 102);
    assert!(buffer[..6].iter().all(|byte| *byte == 0xFF));
    for chunk in buffer[6..102].chunks_exact(6) {
        assert_eq!(chunk, [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    let (socket, service) = loopback_service();

    let payload = br#"{"mac":"00:11:22:33:44:55","requested_by":"ops","ttl":3}"#;
    let mac = handle_payload(&service, payload).await.unwrap();
    assert_eq!(mac.to_string(), "00:11:22:33:44:55");

    let mut buffer = [0u8; 256];
    let (received, _) = socket.recv_from(&mut buffer).unwrap();
    assert_eq!(received, 102);
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let (socket, service) = loopback_service();
    socket.set_nonblocking(true).unwrap();

    let result = handle_payload(&service, b"not valid json").await;
    assert!(matches!(result, Err(CommandError::Decode(_))));

    let mut buffer = [0u8; 256];
    let error = socket.recv_from(&mut buffer).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::WouldBlock);
}

#[tokio::test]
async fn test_missing_mac_field_is_a_decode_error() {
    let (_socket, service) = loopback_service();

    let result = handle_payload(&service, br#"{"target":"AA:BB:CC:DD:EE:FF"}"#).await;
    assert!(matches!(result, Err(CommandError::Decode(_))));
}

#[tokio::test]
async fn test_invalid_address_is_rejected_before_sending() {
    let (socket, service) = loopback_service();
    socket.set_nonblocking(true).unwrap();

    let result = handle_payload(&service, br#"{"mac":"not-a-mac"}"#).await;
    assert!(matches!(
        result,
        Err(CommandError::Wake(WakeError::InvalidAddress(_)))
    ));

    let mut buffer = [0u8; 256];
    let error = socket.recv_from(&mut buffer).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::WouldBlock);
}

#[tokio::test]
async fn test_bad_message_does_not_stop_the_next_one() {
    let (socket, service) = loopback_service();

    assert!(handle_payload(&service, b"not valid json").await.is_err());
    assert!(
        handle_payload(&service, br#"{"mac":"garbage"}"#)
            .await
            .is_err()
    );

    let mac = handle_payload(&service, br#"{"mac":"de:ad:be:ef:00:01"}"#)
        .await
        .unwrap();
    assert_eq!(mac.to_string(), "DE:AD:BE:EF:00:01");

    let mut buffer = [0u8; 256];
    let (received, _) = socket.recv_from(&mut buffer).unwrap();
    assert_eq!(received, 102);
}
